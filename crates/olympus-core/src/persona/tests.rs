use super::*;
use crate::config::SafetyConfig;
use crate::event_bus::{EventBus, OlympusEvent};
use crate::policy::Denial;
use crate::router::ExecutionPath;

const COMPLEX: &str =
    "Design scalable microservices with real-time ML, security compliance, and blockchain";

struct Fixture {
    catalog: Arc<PersonaCatalog>,
    lifecycle: Arc<LifecycleManager>,
}

impl Fixture {
    fn new(config: SafetyConfig) -> Self {
        let catalog = Arc::new(PersonaCatalog::with_builtin());
        let events = Arc::new(EventBus::default());
        events.init();
        let root_caps = catalog.root().unwrap().capability_set();
        let lifecycle = Arc::new(
            LifecycleManager::new(config, events)
                .with_root_capabilities(root_caps)
                .with_resolver(catalog.clone()),
        );
        Self { catalog, lifecycle }
    }

    fn nested(&self) -> Arc<NestedBackend> {
        Arc::new(NestedBackend::new(
            self.catalog.clone(),
            self.lifecycle.clone(),
            OrchestrationConfig::default(),
        ))
    }

    fn zeus(&self) -> Persona {
        Persona::root(
            self.catalog.root().unwrap().clone(),
            self.lifecycle.clone(),
            self.nested(),
            &OrchestrationConfig::default(),
        )
    }
}

#[test]
fn test_root_persona_identity() {
    let fixture = Fixture::new(SafetyConfig::default());
    let zeus = fixture.zeus();

    assert!(zeus.id().is_root());
    assert_eq!(zeus.depth(), 0);
    assert!(zeus.handle().is_none());
    assert_eq!(zeus.preset().name(), "Zeus");
}

#[test]
fn test_create_sub_agent_inherits_preset_capabilities() {
    let fixture = Fixture::new(SafetyConfig::default());
    let zeus = fixture.zeus();

    let coder = zeus.create_sub_agent("coder", CreateOptions::default()).unwrap();
    assert_eq!(coder.parent_id, AgentId::root());
    assert!(coder.has_capability("code"));
    assert!(!coder.has_capability("plan"));
}

#[test]
fn test_delegate_allow_list() {
    let fixture = Fixture::new(SafetyConfig::default());
    let zeus = fixture.zeus();

    let handle = zeus
        .create_sub_agent("coder", CreateOptions::delegating())
        .unwrap();
    let hephaestus = Persona::delegate(
        handle,
        fixture.catalog.get("hephaestus").unwrap().clone(),
        fixture.lifecycle.clone(),
        fixture.nested(),
        &OrchestrationConfig::default(),
    );
    assert_eq!(hephaestus.depth(), 1);

    let err = hephaestus
        .create_sub_agent("architect", CreateOptions::default())
        .unwrap_err();
    assert!(matches!(err, Error::CreationDenied(Denial::LabelNotPermitted)));

    let tester = hephaestus
        .create_sub_agent("tester", CreateOptions::default())
        .unwrap();
    assert_eq!(tester.depth, 2);
    // capabilities narrow down the chain
    assert!(tester.capabilities.iter().all(|c| c == "test"));
}

#[test]
fn test_delegate_list_denial_is_published() {
    let fixture = Fixture::new(SafetyConfig::default());
    let mut rx = fixture.lifecycle.events().subscribe();
    let handle = fixture
        .zeus()
        .create_sub_agent("architect", CreateOptions::delegating())
        .unwrap();
    let athena = Persona::delegate(
        handle.clone(),
        fixture.catalog.get("athena").unwrap().clone(),
        fixture.lifecycle.clone(),
        fixture.nested(),
        &OrchestrationConfig::default(),
    );

    let err = athena
        .create_sub_agent("coder", CreateOptions::default())
        .unwrap_err();
    assert!(matches!(err, Error::CreationDenied(Denial::LabelNotPermitted)));

    assert_eq!(rx.try_recv().unwrap().name(), "agent:created");
    match rx.try_recv().unwrap() {
        OlympusEvent::CreationDenied {
            parent_id,
            label,
            reason,
        } => {
            assert_eq!(parent_id, handle.id);
            assert_eq!(label, "coder");
            assert_eq!(reason, Denial::LabelNotPermitted);
        }
        other => panic!("unexpected event: {:?}", other),
    }
    assert_eq!(fixture.lifecycle.count_active(), 1);
}

#[test]
fn test_label_case_agrees_between_preset_and_policy() {
    let fixture =
        Fixture::new(SafetyConfig::default().with_allowed_labels(["coder", "architect"]));
    let zeus = fixture.zeus();

    let coder = zeus.create_sub_agent("Coder", CreateOptions::default()).unwrap();
    assert_eq!(coder.label, "Coder");

    let err = zeus
        .create_sub_agent("Tester", CreateOptions::default())
        .unwrap_err();
    assert!(matches!(err, Error::CreationDenied(Denial::LabelNotPermitted)));
}

#[test]
fn test_persona_without_delegates_is_unrestricted_by_preset() {
    let fixture = Fixture::new(SafetyConfig::default());
    let handle = fixture
        .lifecycle
        .create_sub_agent(&AgentId::root(), "tester", CreateOptions::default())
        .unwrap();
    let artemis = Persona::delegate(
        handle,
        fixture.catalog.get("artemis").unwrap().clone(),
        fixture.lifecycle.clone(),
        fixture.nested(),
        &OrchestrationConfig::default(),
    );

    // preset has no list, the handle has no delegation right
    let err = artemis
        .create_sub_agent("coder", CreateOptions::default())
        .unwrap_err();
    assert!(matches!(err, Error::DelegationNotPermitted(_)));
}

#[tokio::test]
async fn test_simple_task_runs_zeus_workflow() {
    let fixture = Fixture::new(SafetyConfig::default());
    let outcome = fixture.zeus().orchestrate("Write a function").await.unwrap();

    assert_eq!(outcome.path, ExecutionPath::Deterministic);
    assert!(outcome.output.starts_with("[Zeus@root]"));
    assert!(outcome.output.contains("verify result"));
}

#[tokio::test]
async fn test_nested_delegation_is_bounded_by_depth() {
    let fixture = Fixture::new(SafetyConfig::default().with_max_depth(3));
    let zeus = fixture.zeus();

    let outcome = zeus.orchestrate(COMPLEX).await.unwrap();
    assert_eq!(outcome.path, ExecutionPath::Delegated);

    let report = fixture.lifecycle.inspect();
    assert_eq!(report.max_depth_observed, 3);
    assert_eq!(report.total_records, 3);
    assert_eq!(report.active_count, 0);
    assert_eq!(zeus.metrics().sub_agents_created, 1);
}

#[tokio::test]
async fn test_nested_delegation_bounded_by_total_cap() {
    let fixture = Fixture::new(SafetyConfig::default().with_max_total_agents(2));
    let outcome = fixture.zeus().orchestrate(COMPLEX).await.unwrap();

    assert_eq!(outcome.path, ExecutionPath::Delegated);
    assert_eq!(fixture.lifecycle.inspect().max_depth_observed, 2);
    assert_eq!(fixture.lifecycle.count_active(), 0);
}

#[tokio::test]
async fn test_nested_backend_unknown_label() {
    let fixture = Fixture::new(SafetyConfig::default());
    let handle = fixture
        .lifecycle
        .create_sub_agent(&AgentId::root(), "bard", CreateOptions::default())
        .unwrap();

    let err = fixture.nested().execute(&handle, "sing").await.unwrap_err();
    assert!(matches!(err, Error::UnknownPersona(_)));
}
