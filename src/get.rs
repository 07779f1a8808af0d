//! Programme retrieval by slug or number.
//!
//! Used by the `spp get` and `spp programs` commands and by the preview
//! server's `/api/programs` endpoint.

use anyhow::{bail, Result};
use serde::Serialize;

use crate::catalog::Catalog;
use crate::config::Config;
use crate::models::{Program, RelevanceTier};

/// One row of the programme index.
#[derive(Debug, Clone, Serialize)]
pub struct ProgramListing {
    pub slug: String,
    pub spp_number: String,
    pub title: String,
    pub wissenschaftsbereich: String,
    pub projects_count: usize,
    pub estimated_ai_relevance: f64,
    pub estimated_wearables_relevance: f64,
}

impl From<&Program> for ProgramListing {
    fn from(p: &Program) -> Self {
        Self {
            slug: p.slug.clone(),
            spp_number: p.spp_number.clone(),
            title: p.title.clone(),
            wissenschaftsbereich: p.wissenschaftsbereich.clone(),
            projects_count: p.projects_count,
            estimated_ai_relevance: p.estimated_ai_relevance,
            estimated_wearables_relevance: p.estimated_wearables_relevance,
        }
    }
}

/// All programmes in catalogue order.
pub fn program_listings(catalog: &Catalog) -> Vec<ProgramListing> {
    catalog.programs().iter().map(ProgramListing::from).collect()
}

pub fn run_programs(config: &Config) -> Result<()> {
    let catalog = Catalog::from_config(config)?;
    let listings = program_listings(&catalog);

    if listings.is_empty() {
        println!("No programmes.");
        return Ok(());
    }

    println!(
        "{:<14} {:<10} {:>8}  {}",
        "SLUG", "SPP", "PROJECTS", "TITLE"
    );
    for l in &listings {
        println!(
            "{:<14} {:<10} {:>8}  {}",
            l.slug, l.spp_number, l.projects_count, l.title
        );
    }
    println!();
    println!("{} programmes", listings.len());
    Ok(())
}

/// CLI entry point: print one programme's metadata, summary and projects.
pub fn run_get(config: &Config, key: &str) -> Result<()> {
    let catalog = Catalog::from_config(config)?;
    let program = match catalog.find_program(key) {
        Some(p) => p,
        None => bail!("programme not found: {}", key),
    };

    println!("--- Programme ---");
    println!("spp:          {}", program.spp_number);
    println!("slug:         {}", program.slug);
    println!("title:        {}", program.title);
    print_field("area", &program.wissenschaftsbereich);
    print_field("period", &program.period);
    print_field("beginn", &program.beginn);
    print_field("coordinator", &program.coordinator_name);
    print_field("contact", &program.contact_email);
    print_field("website", &program.website);
    print_field("url", &program.url);
    println!(
        "relevance:    ai {:.1}, wearables {:.1}",
        program.estimated_ai_relevance, program.estimated_wearables_relevance
    );
    println!();

    let description = if program.full_description.is_empty() {
        &program.description
    } else {
        &program.full_description
    };
    if !description.is_empty() {
        println!("--- Description ---");
        println!("{}", description);
        println!();
    }

    let summary = catalog.summary_markdown(&program.spp_number);
    if !summary.is_empty() {
        println!("--- Summary ---");
        println!("{}", summary.trim_end());
        println!();
    }

    println!("--- Projects ({}) ---", program.projects_count);
    for project in &program.projects {
        println!(
            "[{}] {} (ai {:.1} {}, wearables {:.1} {})",
            project.project_id,
            project.title,
            project.ai_score,
            RelevanceTier::from_score(project.ai_score).as_str(),
            project.wearables_score,
            RelevanceTier::from_score(project.wearables_score).as_str()
        );
        if !project.principal_investigator.is_empty() {
            println!("    {}", project.principal_investigator);
        }
    }

    Ok(())
}

fn print_field(label: &str, value: &str) {
    if !value.is_empty() {
        println!("{:<14}{}", format!("{}:", label), value);
    }
}
