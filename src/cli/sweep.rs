use crate::models::InitiativedConfig;
use crate::services::run_capacity_sweep;
use crate::store::JsonStore;
use crate::Result;
use chrono::Utc;
use colored::Colorize;
use std::path::Path;

pub fn run(config_path: &Path, limit: Option<usize>) -> Result<()> {
    let config = InitiativedConfig::load(config_path)?;
    let mut store = JsonStore::load(&config.data_file)?;
    let limit = limit.unwrap_or(config.sweep.pending_limit);

    let pending_before = store.find(|item| item.is_pending()).len();
    println!("📊 {} initiatives pending, ceiling is {}", pending_before, limit);

    let outcome = run_capacity_sweep(&mut store, limit, &mut rand::thread_rng(), Utc::now())?;

    if outcome.throttled == 0 {
        println!("{}", "✅ Backlog already within the ceiling, nothing to do".green());
    } else {
        println!(
            "{}",
            format!(
                "✅ Responded to {} overflow initiatives, {} remain pending",
                outcome.throttled, outcome.kept
            )
            .green()
        );
    }

    Ok(())
}
