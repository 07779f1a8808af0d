//! Project search over the loaded catalogue.
//!
//! [`project_views`] selects the candidate list (everything, or one focus
//! subset) and [`search_page`] applies a [`FilterState`] to it. Both the
//! `spp search` command and the preview server's `/api/projects` endpoint go
//! through these two functions, so the CLI and the browser always agree.

use anyhow::{bail, Result};
use serde::Serialize;

use crate::catalog::Catalog;
use crate::config::Config;
use crate::filter::{
    filter_projects, page_sequence, paginate, total_pages, FilterState, PageItem, SortKey,
};
use crate::models::{ProjectView, RelevanceTier};
use crate::render::Focus;

/// One page of filtered projects.
#[derive(Debug, Clone, Serialize)]
pub struct ProjectPage {
    /// Matches before pagination.
    pub total: usize,
    pub page: usize,
    pub pages: usize,
    pub pagination: Vec<PageItem>,
    pub projects: Vec<ProjectView>,
}

/// Candidate projects: the whole catalogue, or the projects passing the
/// relevance threshold for `focus`.
pub fn project_views(catalog: &Catalog, focus: Option<Focus>) -> Vec<ProjectView> {
    match focus {
        None => catalog.all_projects().iter().map(ProjectView::from).collect(),
        Some(Focus::Ai) => catalog
            .ai_projects()
            .into_iter()
            .map(ProjectView::from)
            .collect(),
        Some(Focus::Wearables) => catalog
            .wearables_projects()
            .into_iter()
            .map(ProjectView::from)
            .collect(),
    }
}

/// Filters, sorts and slices `views` according to `state`.
pub fn search_page(views: &[ProjectView], state: &FilterState) -> ProjectPage {
    let matches = filter_projects(views, state);
    let page = state.page.max(1);
    ProjectPage {
        total: matches.len(),
        page,
        pages: total_pages(matches.len()),
        pagination: page_sequence(matches.len(), page),
        projects: paginate(&matches, page)
            .iter()
            .map(|p| (*p).clone())
            .collect(),
    }
}

/// CLI arguments of `spp search`, before validation.
#[derive(Debug, Clone, Default)]
pub struct SearchArgs {
    pub query: Option<String>,
    pub score: f64,
    pub sort: String,
    pub spp: Option<String>,
    pub page: usize,
    pub focus: Option<String>,
}

pub fn run_search(config: &Config, args: SearchArgs) -> Result<()> {
    let sort = match SortKey::parse(&args.sort) {
        Some(sort) => sort,
        None => bail!(
            "Unknown sort key: {}. Use score, title, or pi.",
            args.sort
        ),
    };
    let focus = match args.focus.as_deref() {
        None => None,
        Some(f) => match Focus::parse(f) {
            Some(focus) => Some(focus),
            None => bail!("Unknown focus: {}. Use ai or wearables.", f),
        },
    };

    let catalog = Catalog::from_config(config)?;

    // Accept a slug as well as the programme number.
    let spp = match args.spp.as_deref() {
        None => String::new(),
        Some(key) => match catalog.find_program(key) {
            Some(program) => program.spp_number.clone(),
            None => bail!("programme not found: {}", key),
        },
    };

    let state = FilterState {
        q: args.query.unwrap_or_default(),
        score: args.score,
        sort,
        page: args.page,
        spp,
        tab: String::new(),
    };

    let views = project_views(&catalog, focus);
    let result = search_page(&views, &state);

    if result.projects.is_empty() {
        println!("No results.");
        return Ok(());
    }

    let offset = (result.page - 1) * crate::filter::PAGE_SIZE;
    for (i, p) in result.projects.iter().enumerate() {
        println!(
            "{}. [{:.1}] {} / {}",
            offset + i + 1,
            p.combined,
            p.spp,
            p.title
        );
        println!(
            "    ai: {:.1} ({})  wearables: {:.1} ({})",
            p.ai,
            RelevanceTier::from_score(p.ai).as_str(),
            p.wear,
            RelevanceTier::from_score(p.wear).as_str()
        );
        if !p.pi.is_empty() {
            println!("    pi: {}", p.pi);
        }
        if !p.funding.is_empty() {
            println!("    funding: {}", p.funding);
        }
        if !p.url.is_empty() {
            println!("    url: {}", p.url);
        }
        println!("    id: {}", p.id);
        println!();
    }

    println!(
        "Page {} of {} ({} matching projects)",
        result.page, result.pages, result.total
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn view(id: &str, combined: f64) -> ProjectView {
        ProjectView {
            id: id.to_string(),
            title: format!("Project {}", id),
            pi: String::new(),
            keywords: String::new(),
            funding: String::new(),
            url: String::new(),
            ai: combined,
            wear: 0.0,
            combined,
            ai_kw: String::new(),
            wear_kw: String::new(),
            abstract_text: String::new(),
            subject_area: String::new(),
            dfg_class: String::new(),
            spp: "SPP 1".to_string(),
            spp_slug: "spp-1".to_string(),
        }
    }

    #[test]
    fn test_search_page_counts_and_slices() {
        let views: Vec<ProjectView> = (0..60).map(|i| view(&i.to_string(), 1.0)).collect();
        let state = FilterState {
            page: 3,
            ..Default::default()
        };
        let page = search_page(&views, &state);
        assert_eq!(page.total, 60);
        assert_eq!(page.pages, 3);
        assert_eq!(page.projects.len(), 10);
        assert_eq!(page.projects[0].id, "50");
        assert_eq!(
            page.pagination,
            vec![PageItem::Page(1), PageItem::Page(2), PageItem::Page(3)]
        );
    }

    #[test]
    fn test_search_page_past_the_end_is_empty() {
        let views = vec![view("a", 1.0)];
        let state = FilterState {
            page: 4,
            ..Default::default()
        };
        let page = search_page(&views, &state);
        assert_eq!(page.total, 1);
        assert!(page.projects.is_empty());
        assert!(page.pagination.is_empty());
    }

    #[test]
    fn test_page_zero_reports_page_one() {
        let views = vec![view("a", 1.0)];
        let state = FilterState {
            page: 0,
            ..Default::default()
        };
        let page = search_page(&views, &state);
        assert_eq!(page.page, 1);
        assert_eq!(page.projects.len(), 1);
    }

    #[test]
    fn test_page_serializes_ellipsis_as_null() {
        let views: Vec<ProjectView> = (0..200).map(|i| view(&i.to_string(), 0.0)).collect();
        let page = search_page(&views, &FilterState::default());
        let json = serde_json::to_value(&page).unwrap();
        assert_eq!(json["pagination"], serde_json::json!([1, 2, 3, null, 8]));
        assert_eq!(json["projects"][0]["sppSlug"], "spp-1");
    }
}
