use crate::models::{DataMode, InitiativedConfig};
use crate::services::compute_statistics;
use crate::store::JsonStore;
use crate::Result;
use chrono::Utc;
use colored::Colorize;
use std::path::Path;

pub fn run(config_path: &Path, synthetic: bool, json: bool) -> Result<()> {
    let config = InitiativedConfig::load(config_path)?;
    let store = JsonStore::load(&config.data_file)?;

    let mode = if synthetic || store.is_empty() {
        DataMode::Synthetic
    } else {
        DataMode::Live
    };

    let report = compute_statistics(store.items(), mode, Utc::now(), &mut rand::thread_rng());

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    if report.synthetic {
        println!("{}", "⚠ Synthetic demo statistics (no real data yet)".yellow());
        println!();
    }

    println!("{}", "Summary".cyan().bold());
    println!("   Total:       {}", report.summary.total);
    println!("   Pending:     {}", report.summary.pending);
    println!("   Responded:   {}", report.summary.responded);
    println!("   Rate:        {}%", report.summary.response_rate);
    match report.summary.average_response_time_days {
        Some(days) => println!("   Avg. reply:  {} days", days),
        None => println!("   Avg. reply:  n/a"),
    }
    println!();

    println!("{}", "Categories".cyan().bold());
    for cat in &report.category_stats {
        if cat.total == 0 {
            continue;
        }
        println!(
            "   {:<28} {:>4} total  {:>4} pending  {:>5}%",
            cat.category.label(),
            cat.total,
            cat.pending,
            cat.response_rate
        );
    }
    println!();

    println!("{}", "Last six months".cyan().bold());
    for window in &report.monthly_stats {
        println!(
            "   {}  {:>4} submitted  {:>4} responded",
            window.month, window.total, window.responded
        );
    }
    println!();

    println!(
        "   Most problematic:  {}",
        report.most_problematic_category.category.label().red()
    );
    println!(
        "   Least problematic: {}",
        report.least_problematic_category.category.label().green()
    );

    Ok(())
}
