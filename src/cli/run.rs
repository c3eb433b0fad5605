//! `olympus run` - orchestrate tasks through a persona

use super::pantheon::load_catalog;
use super::RunArgs;
use crate::backend::SimulatedBackend;
use crate::config::AppConfig;
use anyhow::{bail, Result};
use futures::future::join_all;
use olympus_core::{
    format_error_for_cli, spawn_sweeper, EventBus, ExecutionBackend, ExecutionPath,
    LifecycleManager, NestedBackend, OlympusEvent, Persona, TaskOutcome,
};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Run tasks concurrently and print their outcomes
pub async fn run(args: RunArgs, config: &AppConfig) -> Result<()> {
    let olympus = config.olympus()?;
    let catalog = Arc::new(load_catalog(config)?);

    let persona_name = args.persona.as_deref().unwrap_or(&config.persona);
    let preset = catalog.get(persona_name)?.clone();

    let events = Arc::new(EventBus::new(olympus.events.capacity));
    events.init();
    events.add_hook(|event: &OlympusEvent| debug!(event = event.name(), "Olympus event"));

    let lifecycle = Arc::new(
        LifecycleManager::new(olympus.safety.clone(), events.clone())
            .with_root_capabilities(preset.capability_set())
            .with_resolver(catalog.clone()),
    );

    let shutdown = CancellationToken::new();
    let sweeper = spawn_sweeper(lifecycle.clone(), olympus.lifecycle.clone(), shutdown.clone());

    let backend: Arc<dyn ExecutionBackend> = if args.nested {
        Arc::new(NestedBackend::new(
            catalog.clone(),
            lifecycle.clone(),
            olympus.orchestration.clone(),
        ))
    } else {
        Arc::new(SimulatedBackend::new(
            Duration::from_millis(args.latency_ms),
            args.fail_backend,
        ))
    };

    let persona = Persona::root(preset, lifecycle.clone(), backend, &olympus.orchestration);
    info!(persona = %persona.preset().name(), tasks = args.tasks.len(), "Starting run");

    let results = join_all(args.tasks.iter().map(|task| persona.orchestrate(task))).await;

    shutdown.cancel();
    let _ = sweeper.await;
    let report = lifecycle.inspect();
    let metrics = persona.metrics();
    events.shutdown();

    let failures = results.iter().filter(|r| r.is_err()).count();

    if args.json {
        let outcomes: Vec<serde_json::Value> = args
            .tasks
            .iter()
            .zip(&results)
            .map(|(task, result)| match result {
                Ok(outcome) => serde_json::json!({ "task": task, "outcome": outcome }),
                Err(e) => serde_json::json!({ "task": task, "error": e.to_string() }),
            })
            .collect();
        let doc = serde_json::json!({
            "persona": persona.preset().name(),
            "outcomes": outcomes,
            "metrics": metrics,
            "hierarchy": report,
        });
        println!("{}", serde_json::to_string_pretty(&doc)?);
    } else {
        for (task, result) in args.tasks.iter().zip(&results) {
            match result {
                Ok(outcome) => print_outcome(task, outcome),
                Err(e) => {
                    println!("\n❌ {}\n", task);
                    eprint!("{}", format_error_for_cli(e));
                }
            }
        }
        println!(
            "📈 deterministic={} delegated={} sub_agents_created={} fallbacks={}",
            metrics.deterministic, metrics.delegated, metrics.sub_agents_created, metrics.fallbacks
        );
        println!(
            "🌳 records={} active={} max_depth_observed={}",
            report.total_records, report.active_count, report.max_depth_observed
        );
    }

    if failures > 0 {
        bail!("{} of {} tasks failed", failures, args.tasks.len());
    }
    Ok(())
}

fn print_outcome(task: &str, outcome: &TaskOutcome) {
    let marker = match outcome.path {
        ExecutionPath::Deterministic => "⚙️ ",
        ExecutionPath::Delegated => "⚡",
        ExecutionPath::Fallback => "↩️ ",
    };
    println!(
        "\n{} {} (score {}, path {:?})",
        marker, task, outcome.score.overall, outcome.path
    );
    if let Some(id) = &outcome.delegate_id {
        println!("   delegate: {}", id);
    }
    if let Some(cause) = &outcome.fallback_cause {
        println!("   fallback: {}", cause);
    }
    for line in outcome.output.lines() {
        println!("   {}", line);
    }
    println!();
}
