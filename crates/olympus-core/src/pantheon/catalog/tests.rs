use super::*;

#[test]
fn test_builtin_pantheon() {
    let catalog = PersonaCatalog::with_builtin();
    assert_eq!(catalog.len(), 6);
    for name in ["zeus", "athena", "hephaestus", "apollo", "artemis", "hermes"] {
        assert!(catalog.get(name).is_ok(), "missing {}", name);
    }
}

#[test]
fn test_get_is_case_insensitive() {
    let catalog = PersonaCatalog::with_builtin();
    assert_eq!(catalog.get("ZEUS").unwrap().persona.name, "Zeus");
    assert!(matches!(catalog.get("odin"), Err(Error::UnknownPersona(_))));
}

#[test]
fn test_for_label_by_domain() {
    let catalog = PersonaCatalog::with_builtin();
    assert_eq!(catalog.for_label("coder").unwrap().persona.name, "Hephaestus");
    assert_eq!(catalog.for_label("orchestrator").unwrap().persona.name, "Zeus");
    assert_eq!(catalog.for_label("athena").unwrap().persona.name, "Athena");
    assert!(catalog.for_label("bard").is_none());
}

#[test]
fn test_root() {
    assert_eq!(PersonaCatalog::with_builtin().root().unwrap().name(), "Zeus");

    let custom = PersonaCatalog::new().merge([PersonaPreset::new(
        "Odin",
        "Allfather",
        Domain::Orchestrator,
    )]);
    assert_eq!(custom.root().unwrap().name(), "Odin");

    assert!(PersonaCatalog::new().root().is_err());
}

#[test]
fn test_merge_overrides() {
    let custom = PersonaPreset::new("Hermes", "Trickster", Domain::Researcher);
    let catalog = PersonaCatalog::with_builtin().merge([custom]);

    assert_eq!(catalog.len(), 6);
    assert_eq!(catalog.get("hermes").unwrap().persona.title, "Trickster");
}

#[test]
fn test_presets_ordered_by_domain() {
    let catalog = PersonaCatalog::with_builtin();
    let presets = catalog.presets();
    assert_eq!(presets[0].name(), "Zeus");
    assert_eq!(presets.len(), 6);
}

#[test]
fn test_capability_resolver() {
    let catalog = PersonaCatalog::with_builtin();
    let caps = catalog.capabilities_for("tester").unwrap();
    assert_eq!(caps.into_iter().collect::<Vec<_>>(), vec!["test"]);
    assert!(catalog.capabilities_for("bard").is_none());
}

#[test]
fn test_root_covers_every_delegate_capability() {
    let catalog = PersonaCatalog::with_builtin();
    let root = catalog.root().unwrap().capability_set();
    for preset in catalog.presets() {
        assert!(preset.capability_set().is_subset(&root), "{}", preset.name());
    }
}
