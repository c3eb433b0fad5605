use super::*;
use crate::policy::Denial;
use std::sync::atomic::{AtomicUsize, Ordering};

fn manager(config: SafetyConfig) -> LifecycleManager {
    let events = Arc::new(EventBus::default());
    events.init();
    LifecycleManager::new(config, events)
}

fn root() -> AgentId {
    AgentId::root()
}

struct FixedResolver;

impl CapabilityResolver for FixedResolver {
    fn capabilities_for(&self, label: &str) -> Option<BTreeSet<String>> {
        match label {
            "coder" => Some(["code", "test", "deploy"].into_iter().map(String::from).collect()),
            _ => None,
        }
    }
}

#[test]
fn test_create_and_release() {
    let manager = manager(SafetyConfig::default());
    let handle = manager
        .create_sub_agent(&root(), "coder", CreateOptions::default())
        .unwrap();

    assert_eq!(handle.parent_id, root());
    assert_eq!(handle.depth, 1);
    assert_eq!(handle.label, "coder");
    assert!(!handle.can_delegate);
    assert!(handle.id.as_str().starts_with("coder-"));
    assert_eq!(manager.count_active(), 1);
    assert_eq!(manager.get_depth(&handle.id).unwrap(), 1);

    assert!(manager.release(&handle.id));
    assert_eq!(manager.count_active(), 0);
}

#[test]
fn test_release_is_idempotent() {
    let manager = manager(SafetyConfig::default());
    let a = manager.create_sub_agent(&root(), "coder", CreateOptions::default()).unwrap();
    let _b = manager.create_sub_agent(&root(), "coder", CreateOptions::default()).unwrap();

    assert!(manager.release(&a.id));
    assert_eq!(manager.count_active(), 1);
    assert!(!manager.release(&a.id));
    assert_eq!(manager.count_active(), 1);
    assert!(!manager.release(&AgentId::new("never-existed")));
}

#[test]
fn test_denial_becomes_error() {
    let manager = manager(SafetyConfig::default().with_max_total_agents(0));
    let err = manager
        .create_sub_agent(&root(), "coder", CreateOptions::default())
        .unwrap_err();

    assert!(matches!(err, Error::CreationDenied(Denial::MaxTotalAgents)));
    assert!(err.is_recoverable());
    assert_eq!(manager.count_active(), 0);
}

#[test]
fn test_delegation_requires_capability_flag() {
    let manager = manager(SafetyConfig::default());
    let leaf = manager
        .create_sub_agent(&root(), "coder", CreateOptions::default())
        .unwrap();

    let err = manager
        .create_sub_agent(&leaf.id, "tester", CreateOptions::default())
        .unwrap_err();
    assert!(matches!(err, Error::DelegationNotPermitted(ref id) if *id == leaf.id));
    assert!(err.is_recoverable());

    let orchestrator = manager
        .create_sub_agent(&root(), "orchestrator", CreateOptions::delegating())
        .unwrap();
    let child = manager
        .create_sub_agent(&orchestrator.id, "tester", CreateOptions::default())
        .unwrap();
    assert_eq!(child.depth, 2);
    assert_eq!(child.parent_id, orchestrator.id);
}

#[test]
fn test_released_parent_is_a_defect() {
    let manager = manager(SafetyConfig::default());
    let parent = manager
        .create_sub_agent(&root(), "orchestrator", CreateOptions::delegating())
        .unwrap();
    manager.release(&parent.id);

    let err = manager
        .create_sub_agent(&parent.id, "coder", CreateOptions::default())
        .unwrap_err();
    assert!(matches!(err, Error::UnknownParent(_)));
    assert!(err.is_defect());
}

#[test]
fn test_unknown_parent_is_not_found() {
    let manager = manager(SafetyConfig::default());
    let err = manager
        .create_sub_agent(&AgentId::new("ghost"), "coder", CreateOptions::default())
        .unwrap_err();
    assert!(matches!(err, Error::NotFound(_)));
}

#[test]
fn test_capabilities_never_exceed_parent() {
    let manager = manager(SafetyConfig::default())
        .with_root_capabilities(["code", "test", "review"])
        .with_resolver(Arc::new(FixedResolver));

    // resolver grants deploy, root does not hold it
    let coder = manager
        .create_sub_agent(&root(), "coder", CreateOptions::delegating())
        .unwrap();
    let expected: BTreeSet<String> = ["code", "test"].into_iter().map(String::from).collect();
    assert_eq!(coder.capabilities, expected);

    // unknown label inherits the parent's set
    let reviewer = manager
        .create_sub_agent(&coder.id, "reviewer", CreateOptions::default())
        .unwrap();
    assert_eq!(reviewer.capabilities, expected);
}

#[test]
fn test_options_narrow_capabilities() {
    let manager = manager(SafetyConfig::default()).with_root_capabilities(["code", "test"]);

    let handle = manager
        .create_sub_agent(
            &root(),
            "coder",
            CreateOptions::default().with_capabilities(["test", "admin"]),
        )
        .unwrap();

    assert!(handle.has_capability("test"));
    assert!(!handle.has_capability("code"));
    // narrowing never widens
    assert!(!handle.has_capability("admin"));
}

#[test]
fn test_cleanup_callbacks_run_in_order_and_failures_do_not_block() {
    let manager = manager(SafetyConfig::default());
    let handle = manager
        .create_sub_agent(&root(), "coder", CreateOptions::default())
        .unwrap();
    let order = Arc::new(Mutex::new(Vec::new()));

    let o = order.clone();
    manager
        .on_release(
            &handle.id,
            Box::new(move |_: &AgentId| -> anyhow::Result<()> {
                o.lock().unwrap().push(1);
                anyhow::bail!("socket already closed")
            }),
        )
        .unwrap();
    let o = order.clone();
    manager
        .on_release(
            &handle.id,
            Box::new(move |_: &AgentId| -> anyhow::Result<()> {
                o.lock().unwrap().push(2);
                Ok(())
            }),
        )
        .unwrap();

    let mut rx = manager.events().subscribe();
    assert!(manager.release(&handle.id));
    assert_eq!(*order.lock().unwrap(), vec![1, 2]);
    assert_eq!(manager.count_active(), 0);

    match rx.try_recv().unwrap() {
        OlympusEvent::AgentReleased {
            cleanup_failures, ..
        } => assert_eq!(cleanup_failures, 1),
        other => panic!("unexpected event: {:?}", other),
    }

    // callbacks run once
    manager.release(&handle.id);
    assert_eq!(order.lock().unwrap().len(), 2);
}

#[test]
fn test_on_release_unknown_agent() {
    let manager = manager(SafetyConfig::default());
    let err = manager
        .on_release(&AgentId::new("ghost"), Box::new(|_: &AgentId| Ok(())))
        .unwrap_err();
    assert!(matches!(err, Error::NotFound(_)));
}

#[test]
fn test_release_tree() {
    let manager = manager(SafetyConfig::default());
    let a = manager.create_sub_agent(&root(), "orchestrator", CreateOptions::delegating()).unwrap();
    let b = manager.create_sub_agent(&a.id, "orchestrator", CreateOptions::delegating()).unwrap();
    let _c = manager.create_sub_agent(&b.id, "coder", CreateOptions::default()).unwrap();
    let other = manager.create_sub_agent(&root(), "coder", CreateOptions::default()).unwrap();

    assert_eq!(manager.release_tree(&a.id), 3);
    assert_eq!(manager.count_active(), 1);
    assert!(manager.record(&other.id).unwrap().is_active());
    assert_eq!(manager.release_tree(&a.id), 0);

    assert_eq!(manager.release_tree(&root()), 1);
    assert_eq!(manager.count_active(), 0);
}

#[test]
fn test_cleanup_inactive_keeps_active() {
    let manager = manager(SafetyConfig::default());
    let a = manager.create_sub_agent(&root(), "coder", CreateOptions::default()).unwrap();
    let b = manager.create_sub_agent(&root(), "coder", CreateOptions::default()).unwrap();
    manager.release(&a.id);

    assert_eq!(manager.cleanup_inactive(Duration::ZERO), 1);
    assert!(manager.record(&a.id).is_none());
    assert!(manager.record(&b.id).is_some());
    assert_eq!(manager.cleanup_inactive(Duration::ZERO), 0);
}

#[test]
fn test_expire_older_than() {
    let manager = manager(SafetyConfig::default());
    let a = manager.create_sub_agent(&root(), "coder", CreateOptions::default()).unwrap();

    assert_eq!(manager.expire_older_than(Duration::from_secs(3600)), 0);
    std::thread::sleep(Duration::from_millis(5));
    assert_eq!(manager.expire_older_than(Duration::from_millis(1)), 1);
    assert!(!manager.record(&a.id).unwrap().is_active());
}

#[test]
fn test_events_emitted() {
    let manager = manager(SafetyConfig::default().with_max_total_agents(1));
    let mut rx = manager.events().subscribe();

    let a = manager.create_sub_agent(&root(), "coder", CreateOptions::default()).unwrap();
    let _ = manager.create_sub_agent(&root(), "coder", CreateOptions::default());
    manager.release(&a.id);

    let names: Vec<&str> = std::iter::from_fn(|| rx.try_recv().ok())
        .map(|e| e.name())
        .collect();
    assert_eq!(
        names,
        vec!["agent:created", "agent:creation-denied", "agent:released"]
    );
}

#[test]
fn test_hook_may_query_manager_state() {
    // hooks run after the lock is released
    let events = Arc::new(EventBus::default());
    events.init();
    let manager = Arc::new(LifecycleManager::new(SafetyConfig::default(), events.clone()));
    let seen = Arc::new(AtomicUsize::new(0));

    let weak = Arc::downgrade(&manager);
    let counter = seen.clone();
    events.add_hook(move |_: &OlympusEvent| {
        if let Some(m) = weak.upgrade() {
            counter.store(m.count_active(), Ordering::SeqCst);
        }
    });

    manager.create_sub_agent(&root(), "coder", CreateOptions::default()).unwrap();
    assert_eq!(seen.load(Ordering::SeqCst), 1);
}

#[test]
fn test_inspect() {
    let manager = manager(SafetyConfig::default());
    let a = manager.create_sub_agent(&root(), "orchestrator", CreateOptions::delegating()).unwrap();
    let _b = manager.create_sub_agent(&a.id, "coder", CreateOptions::default()).unwrap();
    let c = manager.create_sub_agent(&root(), "coder", CreateOptions::default()).unwrap();
    manager.release(&c.id);

    let report = manager.inspect();
    assert_eq!(report.active_count, 2);
    assert_eq!(report.total_records, 3);
    assert_eq!(report.max_depth_observed, 2);
    assert_eq!(report.creations_per_parent[&root()], 2);
    assert_eq!(report.creations_per_parent[&a.id], 1);
    assert_eq!(report.tree.node_count(), 3);

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["active_count"], 2);
    assert_eq!(json["creations_per_parent"]["root"], 2);
}

#[test]
fn test_concurrent_admission_respects_cap() {
    let manager = Arc::new(manager(
        SafetyConfig::default()
            .with_max_total_agents(3)
            .with_rate_limit(100, Duration::from_secs(60)),
    ));

    let threads: Vec<_> = (0..16)
        .map(|_| {
            let manager = manager.clone();
            std::thread::spawn(move || {
                manager
                    .create_sub_agent(&AgentId::root(), "coder", CreateOptions::default())
                    .is_ok()
            })
        })
        .collect();

    let admitted = threads
        .into_iter()
        .map(|t| t.join().unwrap())
        .filter(|ok| *ok)
        .count();
    assert_eq!(admitted, 3);
    assert_eq!(manager.count_active(), 3);
}

#[tokio::test]
async fn test_sweeper_stops_on_cancel() {
    let manager = Arc::new(manager(SafetyConfig::default()));
    let token = tokio_util::sync::CancellationToken::new();
    let task = spawn_sweeper(manager, crate::config::LifecycleConfig::default(), token.clone());

    token.cancel();
    tokio::time::timeout(Duration::from_secs(1), task)
        .await
        .expect("sweeper did not stop")
        .unwrap();
}

#[tokio::test]
async fn test_sweeper_expires_and_purges() {
    let manager = Arc::new(manager(SafetyConfig::default()));
    manager.create_sub_agent(&root(), "coder", CreateOptions::default()).unwrap();

    let config = crate::config::LifecycleConfig {
        retention_ms: 0,
        cleanup_interval_secs: 1,
        agent_ttl_secs: 1,
    };

    let token = tokio_util::sync::CancellationToken::new();
    let task = spawn_sweeper(manager.clone(), config, token.clone());

    tokio::time::sleep(Duration::from_millis(2500)).await;
    token.cancel();
    task.await.unwrap();

    assert_eq!(manager.count_active(), 0);
    assert_eq!(manager.inspect().total_records, 0);
}

#[test]
fn test_inspection_report_pretty_json() {
    let manager = manager(SafetyConfig::default());
    manager.create_sub_agent(&root(), "coder", CreateOptions::default()).unwrap();

    let json = manager.inspect().to_json_pretty().unwrap();
    assert!(json.contains("\"active_count\": 1"));
    assert!(json.contains("\"max_depth_observed\": 1"));
}
