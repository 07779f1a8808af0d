//! Catalogue statistics overview.
//!
//! Prints the landing-page counts plus a per-programme breakdown. Used by
//! `spp stats` to confirm a data refresh produced what was expected.

use anyhow::Result;

use crate::catalog::Catalog;
use crate::config::Config;

/// Run the stats command: load the catalogue and print a summary.
pub fn run_stats(config: &Config) -> Result<()> {
    let catalog = Catalog::from_config(config)?;
    print_stats(&catalog, config);
    Ok(())
}

fn print_stats(catalog: &Catalog, config: &Config) {
    let stats = catalog.stats();

    println!("SPP Catalogue — Stats");
    println!("=====================");
    println!();
    println!("  Data root:   {}", config.data.root.display());
    println!("  Threshold:   {:.1}", catalog.relevance_threshold());
    println!();
    println!("  Programmes:  {}", stats.total_programs);
    println!("  Projects:    {}", stats.total_projects);
    println!(
        "  AI:          {} / {} ({}%)",
        stats.ai_relevant,
        stats.total_projects,
        percent(stats.ai_relevant, stats.total_projects)
    );
    println!(
        "  Wearables:   {} / {} ({}%)",
        stats.wearables_relevant,
        stats.total_projects,
        percent(stats.wearables_relevant, stats.total_projects)
    );

    if !stats.wissenschaftsbereiche.is_empty() {
        println!();
        println!("  Research areas:");
        for area in &stats.wissenschaftsbereiche {
            let label = if area.is_empty() { "(none)" } else { area };
            println!("    - {}", label);
        }
    }

    if !catalog.programs().is_empty() {
        println!();
        println!("  By programme:");
        println!(
            "  {:<12} {:>8} {:>6} {:>10}",
            "SPP", "PROJECTS", "AI", "WEARABLES"
        );
        println!("  {}", "-".repeat(40));

        let threshold = catalog.relevance_threshold();
        for program in catalog.programs() {
            let ai = program
                .projects
                .iter()
                .filter(|p| p.ai_score >= threshold)
                .count();
            let wear = program
                .projects
                .iter()
                .filter(|p| p.wearables_score >= threshold)
                .count();
            println!(
                "  {:<12} {:>8} {:>6} {:>10}",
                program.spp_number, program.projects_count, ai, wear
            );
        }
    }

    println!();
}

fn percent(part: usize, total: usize) -> usize {
    if total > 0 {
        (part * 100) / total
    } else {
        0
    }
}
