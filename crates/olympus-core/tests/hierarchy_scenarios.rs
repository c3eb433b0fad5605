//! Hierarchy Scenario Tests
//!
//! End-to-end admission scenarios through the lifecycle manager

use olympus_core::{
    AgentId, ComplexityAnalyzer, CreateOptions, DeterministicWorkflow, Denial, Error, EventBus,
    ExecutionBackend, ExecutionPath, LifecycleManager, OrchestrationConfig, OrchestrationRouter,
    SafetyConfig, SafetyPolicy,
};
use std::sync::Arc;

fn manager(config: SafetyConfig) -> LifecycleManager {
    let events = Arc::new(EventBus::default());
    events.init();
    LifecycleManager::new(config, events)
}

fn create(manager: &LifecycleManager, parent: &AgentId) -> olympus_core::Result<AgentId> {
    manager
        .create_sub_agent(parent, "coder", CreateOptions::delegating())
        .map(|h| h.id)
}

#[test]
fn test_total_cap_scenario() {
    let manager = manager(SafetyConfig::default().with_max_total_agents(2).with_max_depth(3));
    let root = AgentId::root();

    let a = create(&manager, &root).unwrap();
    assert_eq!(manager.get_depth(&a).unwrap(), 1);
    assert_eq!(manager.count_active(), 1);

    let b = create(&manager, &root).unwrap();
    assert_eq!(manager.get_depth(&b).unwrap(), 1);
    assert_eq!(manager.count_active(), 2);

    let err = create(&manager, &root).unwrap_err();
    assert!(matches!(err, Error::CreationDenied(Denial::MaxTotalAgents)));
    assert!(err.to_string().contains("Maximum total agents reached"));

    assert!(manager.release(&a));
    assert_eq!(manager.count_active(), 1);

    let d = create(&manager, &root).unwrap();
    assert_eq!(manager.get_depth(&d).unwrap(), 1);
    assert_eq!(manager.count_active(), 2);
}

#[test]
fn test_depth_scenario() {
    let manager = manager(SafetyConfig::default().with_max_depth(2));

    let child = create(&manager, &AgentId::root()).unwrap();
    assert_eq!(manager.get_depth(&child).unwrap(), 1);

    let grandchild = create(&manager, &child).unwrap();
    assert_eq!(manager.get_depth(&grandchild).unwrap(), 2);

    let err = create(&manager, &grandchild).unwrap_err();
    assert!(err.to_string().contains("depth"));
    assert_eq!(manager.count_active(), 2);
}

#[test]
fn test_depth_limit_holds_for_every_bound() {
    for max_depth in 0..=5 {
        let manager = manager(SafetyConfig::default().with_max_depth(max_depth));
        let mut parent = AgentId::root();

        for expected in 1..=max_depth {
            parent = create(&manager, &parent).unwrap();
            assert_eq!(manager.get_depth(&parent).unwrap(), expected);
        }

        let err = create(&manager, &parent).unwrap_err();
        assert!(matches!(err, Error::CreationDenied(Denial::MaxDepthExceeded)));
    }
}

#[test]
fn test_total_cap_takes_precedence_over_depth() {
    let manager = manager(SafetyConfig::default().with_max_total_agents(1).with_max_depth(1));
    let only = create(&manager, &AgentId::root()).unwrap();

    // A child of `only` would exceed both limits
    let err = create(&manager, &only).unwrap_err();
    assert!(matches!(err, Error::CreationDenied(Denial::MaxTotalAgents)));
}

#[test]
fn test_policy_check_does_not_mutate() {
    let manager = manager(SafetyConfig::default().with_max_total_agents(0));
    let policy = SafetyPolicy::new(manager.policy().config().clone());

    let decision = policy
        .can_create(&olympus_core::HierarchyRegistry::new(), &AgentId::root(), "coder")
        .unwrap();
    assert!(!decision.allowed);
    assert_eq!(decision.reason, Some(Denial::MaxTotalAgents));
    assert_eq!(manager.inspect().total_records, 0);
}

#[test]
fn test_release_is_idempotent() {
    let manager = manager(SafetyConfig::default());
    let a = create(&manager, &AgentId::root()).unwrap();
    let _b = create(&manager, &AgentId::root()).unwrap();

    assert!(manager.release(&a));
    assert_eq!(manager.count_active(), 1);
    assert!(!manager.release(&a));
    assert_eq!(manager.count_active(), 1);
    assert!(!manager.release(&AgentId::new("never-existed")));
}

#[test]
fn test_depth_is_immutable() {
    let manager = manager(SafetyConfig::default().with_max_total_agents(20));
    let a = create(&manager, &AgentId::root()).unwrap();
    let a1 = create(&manager, &a).unwrap();

    let b = create(&manager, &AgentId::root()).unwrap();
    let b1 = create(&manager, &b).unwrap();
    let _b2 = create(&manager, &b1).unwrap();
    manager.release_tree(&b);

    assert_eq!(manager.get_depth(&a).unwrap(), 1);
    assert_eq!(manager.get_depth(&a1).unwrap(), 2);
    assert_eq!(manager.record(&a1).unwrap().parent_id, a);
}

#[test]
fn test_rate_limit_per_parent() {
    let manager = manager(
        SafetyConfig::default().with_rate_limit(2, std::time::Duration::from_secs(60)),
    );
    let a = create(&manager, &AgentId::root()).unwrap();
    create(&manager, &AgentId::root()).unwrap();

    let err = create(&manager, &AgentId::root()).unwrap_err();
    assert!(matches!(err, Error::CreationDenied(Denial::RateLimited)));

    // Another parent has its own budget
    assert!(create(&manager, &a).is_ok());
}

struct NeverCalled;

#[async_trait::async_trait]
impl ExecutionBackend for NeverCalled {
    async fn execute(
        &self,
        _agent: &olympus_core::AgentHandle,
        _task: &str,
    ) -> olympus_core::Result<String> {
        panic!("delegation must be denied");
    }
}

#[tokio::test]
async fn test_zero_cap_always_falls_back() {
    let manager = Arc::new(manager(SafetyConfig::default().with_max_total_agents(0)));
    let router = OrchestrationRouter::new(
        &OrchestrationConfig::default(),
        manager.clone(),
        Arc::new(NeverCalled),
    );
    let workflow = DeterministicWorkflow::new("zeus", vec!["plan".to_string()]);

    for task in [
        "Design scalable microservices with real-time ML, security compliance, and blockchain",
        "Maybe build a distributed kubernetes pipeline with react frontend, somehow, perhaps",
    ] {
        let outcome = router.route(&AgentId::root(), &workflow, task).await.unwrap();
        assert_eq!(outcome.path, ExecutionPath::Fallback);
        assert!(outcome.output.contains("1/1 plan"));
    }
    assert_eq!(manager.count_active(), 0);
    assert_eq!(router.metrics().fallbacks, 2);
}

#[test]
fn test_complexity_examples() {
    let analyzer = ComplexityAnalyzer::default();

    assert!(analyzer.analyze("Write a function").overall <= 3);
    assert!(
        analyzer
            .analyze(
                "Design scalable microservices with real-time ML, security compliance, and blockchain"
            )
            .overall
            >= 7
    );
    assert!(
        analyzer
            .analyze("Build a React dashboard with a Postgres API, Kubernetes deploy and an iOS app")
            .domain_count
            >= 4
    );

    let vague = analyzer.analyze("Maybe improve things somehow, not sure what is best");
    let specific = analyzer.analyze("Rename function parse_header to parse_headers in src/http.rs");
    assert!(vague.uncertainty > specific.uncertainty);
}
