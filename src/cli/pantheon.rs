//! `olympus pantheon` - list and inspect personas

use crate::config::AppConfig;
use anyhow::Result;
use olympus_core::{Domain, PersonaCatalog, PersonaLoader, PersonaPreset};

/// Built-in presets, overridden by the project directory, then the user directory
pub fn load_catalog(config: &AppConfig) -> Result<PersonaCatalog> {
    let mut catalog = PersonaCatalog::with_builtin()
        .merge(PersonaLoader::with_path(&config.pantheon_dir).load_all()?);
    if let Some(user) = PersonaLoader::user() {
        catalog = catalog.merge(user.load_all()?);
    }
    Ok(catalog)
}

/// Run pantheon command
pub fn run(name: Option<&str>, config: &AppConfig) -> Result<()> {
    let catalog = load_catalog(config)?;
    match name {
        Some(name) => show(catalog.get(name)?),
        None => list(&catalog),
    }
    Ok(())
}

fn list(catalog: &PersonaCatalog) {
    println!("\n🏛️  Olympus Pantheon\n");

    let (orchestrators, roles): (Vec<_>, Vec<_>) = catalog
        .presets()
        .into_iter()
        .partition(|p| p.persona.domain == Domain::Orchestrator);

    if !orchestrators.is_empty() {
        println!("  ORCHESTRATORS:");
        for preset in orchestrators {
            println!("    {}", preset.summary());
        }
        println!();
    }

    if !roles.is_empty() {
        println!("  ROLES:");
        for preset in roles {
            println!("    {}", preset.summary());
        }
        println!();
    }
}

fn show(preset: &PersonaPreset) {
    println!("\n🏛️  {} - {}\n", preset.persona.name, preset.persona.title);
    println!("  Domain:       {} (label: {})", preset.persona.domain, preset.label());
    if let Some(desc) = &preset.persona.description {
        println!("  Description:  {}", desc);
    }

    let caps: Vec<_> = preset.capability_set().into_iter().collect();
    println!(
        "  Capabilities: {}",
        if caps.is_empty() { "-".to_string() } else { caps.join(", ") }
    );
    println!(
        "  Delegates:    {}",
        if preset.delegates() {
            preset.delegation.delegates.join(", ")
        } else {
            "-".to_string()
        }
    );

    println!("  Workflow:");
    for (i, step) in preset.workflow.steps.iter().enumerate() {
        println!("    {}. {}", i + 1, step);
    }
    println!();
}
