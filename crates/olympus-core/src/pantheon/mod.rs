//! Pantheon - Persona Preset System
//!
//! Who the personas are and what each may do: capabilities, which labels it
//! may delegate to, and the local workflow it runs on the deterministic path.
//!
//! # Example
//!
//! ```rust,ignore
//! use olympus_core::pantheon::{PersonaCatalog, PersonaLoader};
//!
//! let catalog = PersonaCatalog::with_builtin().merge(PersonaLoader::new().load_all()?);
//! let zeus = catalog.get("zeus")?;
//! println!("{} - {}", zeus.persona.name, zeus.persona.title);
//! ```

mod catalog;
mod domain;
mod loader;
mod preset;

pub use catalog::PersonaCatalog;
pub use domain::Domain;
pub use loader::PersonaLoader;
pub use preset::{PersonaCapabilities, PersonaDelegation, PersonaInfo, PersonaPreset, PersonaWorkflow};
