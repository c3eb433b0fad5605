//! `olympus analyze` - complexity score of a task

use crate::config::AppConfig;
use anyhow::Result;
use olympus_core::ComplexityAnalyzer;

/// Score `task` and print the result
pub fn run(task: &str, json: bool, config: &AppConfig) -> Result<()> {
    let olympus = config.olympus()?;
    let score = ComplexityAnalyzer::from_config(&olympus.orchestration).analyze(task);

    if json {
        println!("{}", serde_json::to_string_pretty(&score)?);
        return Ok(());
    }

    let route = if score.overall > olympus.orchestration.threshold {
        "delegated"
    } else {
        "deterministic"
    };
    let domains = if score.domains.is_empty() {
        "-".to_string()
    } else {
        score.domains.join(", ")
    };

    println!("\n📊 Complexity\n");
    println!("  technical:    {}", score.technical);
    println!("  uncertainty:  {}", score.uncertainty);
    println!("  domains:      {} ({})", score.domain_count, domains);
    println!(
        "  overall:      {} (threshold {}, route: {})",
        score.overall, olympus.orchestration.threshold, route
    );
    Ok(())
}
