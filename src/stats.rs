//! Contact set statistics.
//!
//! Backs the `get_contact_stats` tool and `prospector stats`. Gives a quick
//! picture of outreach progress: state and stage distribution, high-value
//! targets, and average data quality.

use anyhow::Result;
use prospector_core::stats::{self, ContactStats};

use crate::config::Config;
use crate::csv_source::load_contacts;

/// Aggregate the full contact set, optionally broken down by `group_by`.
pub async fn contact_stats(config: &Config, group_by: Option<&str>) -> Result<ContactStats> {
    let contacts = load_contacts(config).await?;
    Ok(stats::aggregate(&contacts, group_by))
}

/// Run the stats command and print a summary.
pub async fn run_stats(config: &Config, group_by: Option<&str>, json: bool) -> Result<()> {
    let stats = contact_stats(config, group_by).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
        return Ok(());
    }

    println!("Prospector: Contact Stats");
    println!("==========================");
    println!();
    println!("  Source:      {}", config.data.path.display());
    println!("  Contacts:    {}", stats.total);
    println!("  Avg quality: {:.1}", stats.avg_quality_score);
    println!();
    println!("  High-value targets:");
    println!("    Executives:                  {}", stats.high_value_targets.executives);
    println!(
        "    Verified, not contacted:     {}",
        stats.high_value_targets.verified_not_contacted
    );
    println!(
        "    High quality, not contacted: {}",
        stats.high_value_targets.high_quality_not_contacted
    );

    if !stats.by_state.is_empty() {
        println!();
        println!("  By state:");
        for (state, count) in &stats.by_state {
            println!("    {:<28} {:>6}", state, count);
        }
    }

    if !stats.by_stage.is_empty() {
        println!();
        println!("  By stage:");
        for (stage, count) in &stats.by_stage {
            println!("    {:<28} {:>6}", stage, count);
        }
    }

    if let (Some(field), Some(breakdown)) = (group_by, &stats.breakdown) {
        println!();
        println!("  By {}:", field);
        for (key, count) in breakdown {
            println!("    {:<28} {:>6}", key, count);
        }
    }

    println!();
    Ok(())
}
