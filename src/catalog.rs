//! The unified programme/project model.
//!
//! [`Catalog::load`] reads the four raw inputs once through a [`DataSource`]
//! and joins them by `spp_number`:
//!
//! | Input | Role |
//! |-------|------|
//! | programme summaries | one [`Program`] each, defines order |
//! | programme details | title and contact metadata |
//! | scored project CSV | one [`Project`] per row, scores |
//! | raw project files | description text, investigator names, backfill |
//!
//! Missing cross references never drop an entity; the affected fields are
//! left empty or zero. The built catalogue is immutable and owned by the
//! caller: construct it once at startup and share it by reference (or `Arc`).

use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::Result;
use crate::extract::{clean_description, parse_investigators};
use crate::models::{
    parse_score, slugify, Program, Project, RawProgramDetail, RawProgramSummary, RawProject,
    RawProjectFile, ScoredProjectRow,
};
use crate::sources::FsDataSource;
use crate::traits::DataSource;

/// Landing-page counts.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CatalogStats {
    pub total_programs: usize,
    pub total_projects: usize,
    pub ai_relevant: usize,
    pub wearables_relevant: usize,
    /// Distinct `wissenschaftsbereich` values, first-seen order.
    pub wissenschaftsbereiche: Vec<String>,
}

/// Joined programmes and their flattened projects.
pub struct Catalog {
    programs: Vec<Program>,
    all_projects: Vec<Project>,
    relevance_threshold: f64,
    source: Arc<dyn DataSource + Send + Sync>,
}

impl Catalog {
    /// Reads and joins all inputs. Each `read_*` method of `source` is
    /// called exactly once; summary Markdown is read on demand.
    pub fn load(
        source: Arc<dyn DataSource + Send + Sync>,
        relevance_threshold: f64,
    ) -> Result<Self> {
        let summaries = source.read_summaries()?;
        let details = source.read_details()?;
        let rows = source.read_scored_rows()?;
        let files = source.read_project_files()?;
        debug!(
            summaries = summaries.len(),
            details = details.len(),
            rows = rows.len(),
            files = files.len(),
            "raw inputs loaded"
        );

        let programs = join_programs(&summaries, &details, &rows, &files);
        let all_projects: Vec<Project> = programs
            .iter()
            .flat_map(|p| p.projects.iter().cloned())
            .collect();

        info!(
            programs = programs.len(),
            projects = all_projects.len(),
            "catalog built"
        );

        Ok(Self {
            programs,
            all_projects,
            relevance_threshold,
            source,
        })
    }

    /// Loads from the filesystem layout configured under `[data]`.
    pub fn from_config(config: &Config) -> Result<Self> {
        let source = Arc::new(FsDataSource::new(&config.data));
        Self::load(source, config.relevance.threshold)
    }

    pub fn programs(&self) -> &[Program] {
        &self.programs
    }

    /// Every project of every programme, programme order then CSV order.
    pub fn all_projects(&self) -> &[Project] {
        &self.all_projects
    }

    /// Projects whose AI score reaches the relevance threshold.
    pub fn ai_projects(&self) -> Vec<&Project> {
        self.all_projects
            .iter()
            .filter(|p| p.ai_score >= self.relevance_threshold)
            .collect()
    }

    /// Projects whose wearables score reaches the relevance threshold.
    pub fn wearables_projects(&self) -> Vec<&Project> {
        self.all_projects
            .iter()
            .filter(|p| p.wearables_score >= self.relevance_threshold)
            .collect()
    }

    pub fn relevance_threshold(&self) -> f64 {
        self.relevance_threshold
    }

    pub fn stats(&self) -> CatalogStats {
        let mut seen = HashSet::new();
        let wissenschaftsbereiche = self
            .programs
            .iter()
            .map(|p| p.wissenschaftsbereich.clone())
            .filter(|w| seen.insert(w.clone()))
            .collect();

        CatalogStats {
            total_programs: self.programs.len(),
            total_projects: self.all_projects.len(),
            ai_relevant: self.ai_projects().len(),
            wearables_relevant: self.wearables_projects().len(),
            wissenschaftsbereiche,
        }
    }

    pub fn program_by_slug(&self, slug: &str) -> Option<&Program> {
        self.programs.iter().find(|p| p.slug == slug)
    }

    pub fn program_by_number(&self, spp_number: &str) -> Option<&Program> {
        self.programs.iter().find(|p| p.spp_number == spp_number)
    }

    /// Looks a programme up by slug first, then by its number.
    pub fn find_program(&self, key: &str) -> Option<&Program> {
        self.program_by_slug(key)
            .or_else(|| self.program_by_number(key))
    }

    /// The programme's Markdown summary, or `""` if there is none.
    pub fn summary_markdown(&self, spp_number: &str) -> String {
        match self.source.read_summary_markdown(spp_number) {
            Ok(Some(markdown)) => markdown,
            Ok(None) => String::new(),
            Err(e) => {
                warn!(spp = spp_number, error = %e, "unreadable summary markdown");
                String::new()
            }
        }
    }
}

/// Joins the raw inputs into programmes, in summary order.
pub fn join_programs(
    summaries: &[RawProgramSummary],
    details: &[RawProgramDetail],
    rows: &[ScoredProjectRow],
    files: &[RawProjectFile],
) -> Vec<Program> {
    let details_by_spp: HashMap<&str, &RawProgramDetail> = details
        .iter()
        .map(|d| (d.spp_number.as_str(), d))
        .collect();

    let mut rows_by_spp: HashMap<&str, Vec<&ScoredProjectRow>> = HashMap::new();
    for row in rows {
        rows_by_spp.entry(row.spp_number.as_str()).or_default().push(row);
    }

    let files_by_spp: HashMap<&str, &RawProjectFile> = files
        .iter()
        .map(|f| (f.spp_number.as_str(), f))
        .collect();

    let known: HashSet<&str> = summaries.iter().map(|s| s.spp_number.as_str()).collect();
    let orphan_rows: usize = rows_by_spp
        .iter()
        .filter(|(spp, _)| !known.contains(*spp))
        .map(|(_, rows)| rows.len())
        .sum();
    if orphan_rows > 0 {
        warn!(
            rows = orphan_rows,
            "project rows reference programmes missing from the summaries"
        );
    }
    for spp in files_by_spp.keys().filter(|spp| !known.contains(*spp)) {
        warn!(spp = %spp, "raw project file for unknown programme");
    }

    summaries
        .iter()
        .map(|summary| {
            let spp = summary.spp_number.as_str();
            build_program(
                summary,
                details_by_spp.get(spp).copied(),
                rows_by_spp.get(spp).map(Vec::as_slice).unwrap_or_default(),
                files_by_spp.get(spp).copied(),
            )
        })
        .collect()
}

fn build_program(
    summary: &RawProgramSummary,
    detail: Option<&RawProgramDetail>,
    rows: &[&ScoredProjectRow],
    raw_file: Option<&RawProjectFile>,
) -> Program {
    let raw_projects: HashMap<&str, &RawProject> = raw_file
        .map(|f| {
            f.projects
                .iter()
                .map(|p| (p.project_id.as_str(), p))
                .collect()
        })
        .unwrap_or_default();

    let projects: Vec<Project> = rows
        .iter()
        .map(|row| build_project(row, raw_projects.get(row.project_id.as_str()).copied()))
        .collect();

    if raw_file.is_none() && !projects.is_empty() {
        debug!(
            spp = %summary.spp_number,
            "no raw project file; investigators and descriptions left empty"
        );
    }

    let projects_count = if projects.is_empty() {
        raw_file.map(|f| f.projects_count).unwrap_or(0)
    } else {
        projects.len()
    };

    let detail = detail.cloned().unwrap_or_default();

    Program {
        spp_number: summary.spp_number.clone(),
        title: first_non_empty(&[&detail.title, &summary.title]),
        url: summary.url.clone(),
        beginn: summary.beginn.clone(),
        bundesland: summary.bundesland.clone(),
        int_bezug: summary.int_bezug.clone(),
        variante: summary.variante.clone(),
        wissenschaftsbereich: summary.wissenschaftsbereich.clone(),
        description: summary.description.clone(),
        full_description: detail.full_description.clone(),
        period: summary.period.clone(),
        projects_url: summary.projects_url.clone(),
        detail_page_url: summary.detail_page_url.clone(),
        website: first_non_empty(&[&summary.website, detail.extra_str("website")]),
        coordinator_name: detail.coordinator_name,
        contact_email: detail.contact_email,
        funding_period: detail.funding_period,
        funding_start: detail.funding_start,
        funding_end: detail.funding_end,
        subject_area: detail.subject_area,
        estimated_ai_relevance: summary.estimated_ai_relevance,
        estimated_wearables_relevance: summary.estimated_wearables_relevance,
        projects_count,
        projects,
        slug: slugify(&summary.spp_number),
    }
}

fn build_project(row: &ScoredProjectRow, raw: Option<&RawProject>) -> Project {
    let raw_title = raw.map(|r| r.title.as_str()).unwrap_or_default();
    let raw_url = raw.map(|r| r.url.as_str()).unwrap_or_default();
    let raw_funding = raw.and_then(|r| r.funding_period.as_deref()).unwrap_or_default();
    let raw_description = raw.and_then(|r| r.description.as_deref()).unwrap_or_default();
    let raw_subject = raw.and_then(|r| r.subject_area.as_deref()).unwrap_or_default();

    Project {
        project_id: row.project_id.clone(),
        spp_number: row.spp_number.clone(),
        spp_title: row.spp_title.clone(),
        title: first_non_empty(&[&row.title, raw_title]),
        full_title: row.full_title.clone(),
        principal_investigator: raw.map(parse_investigators).unwrap_or_default(),
        institution: row.institution.clone(),
        funding_period: first_non_empty(&[&row.funding_period, raw_funding]),
        abstract_text: row.abstract_text.clone(),
        description: clean_description(raw_description),
        keywords: row.keywords.clone(),
        dfg_classification: row.dfg_classification.clone(),
        subject_area: raw_subject.to_string(),
        url: first_non_empty(&[&row.url, raw_url]),
        wearables_score: parse_score(&row.wearables_score),
        ai_score: parse_score(&row.ai_score),
        combined_score: parse_score(&row.combined_score),
        matched_wearables_keywords: row.matched_wearables_keywords.clone(),
        matched_ai_keywords: row.matched_ai_keywords.clone(),
    }
}

/// First non-empty candidate, or `""`.
fn first_non_empty(candidates: &[&str]) -> String {
    candidates
        .iter()
        .find(|s| !s.is_empty())
        .map(|s| s.to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(spp: &str, title: &str, area: &str) -> RawProgramSummary {
        RawProgramSummary {
            spp_number: spp.to_string(),
            title: title.to_string(),
            wissenschaftsbereich: area.to_string(),
            ..Default::default()
        }
    }

    fn row(spp: &str, id: &str, title: &str, ai: &str, wear: &str) -> ScoredProjectRow {
        ScoredProjectRow {
            spp_number: spp.to_string(),
            project_id: id.to_string(),
            title: title.to_string(),
            ai_score: ai.to_string(),
            wearables_score: wear.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_detail_title_preferred_over_summary() {
        let summaries = vec![summary("SPP 1", "Summary title", "Lebenswissenschaften")];
        let details = vec![RawProgramDetail {
            spp_number: "SPP 1".to_string(),
            title: "Detail title".to_string(),
            coordinator_name: "Prof. C".to_string(),
            ..Default::default()
        }];
        let programs = join_programs(&summaries, &details, &[], &[]);
        assert_eq!(programs[0].title, "Detail title");
        assert_eq!(programs[0].coordinator_name, "Prof. C");
        assert_eq!(programs[0].slug, "spp-1");
    }

    #[test]
    fn test_missing_detail_degrades_to_empty() {
        let programs = join_programs(&[summary("SPP 2", "Only summary", "")], &[], &[], &[]);
        let p = &programs[0];
        assert_eq!(p.title, "Only summary");
        assert_eq!(p.full_description, "");
        assert_eq!(p.website, "");
        assert!(p.projects.is_empty());
        assert_eq!(p.projects_count, 0);
    }

    #[test]
    fn test_website_falls_back_to_detail_extra() {
        let mut detail = RawProgramDetail {
            spp_number: "SPP 3".to_string(),
            ..Default::default()
        };
        detail.extra.insert(
            "website".to_string(),
            serde_json::Value::String("https://spp3.de".to_string()),
        );
        let programs = join_programs(&[summary("SPP 3", "T", "")], &[detail], &[], &[]);
        assert_eq!(programs[0].website, "https://spp3.de");
    }

    #[test]
    fn test_rows_without_raw_counterpart_are_kept() {
        let rows = vec![row("SPP 1", "42", "Scored", "2.0", "x")];
        let programs = join_programs(&[summary("SPP 1", "T", "")], &[], &rows, &[]);
        let project = &programs[0].projects[0];
        assert_eq!(project.title, "Scored");
        assert_eq!(project.principal_investigator, "");
        assert_eq!(project.description, "");
        assert_eq!(project.ai_score, 2.0);
        assert_eq!(project.wearables_score, 0.0);
        assert_eq!(programs[0].projects_count, 1);
    }

    #[test]
    fn test_raw_json_backfills_and_supplies_description() {
        let rows = vec![row("SPP 1", "42", "", "", "")];
        let files = vec![RawProjectFile {
            spp_number: "SPP 1".to_string(),
            projects_count: 9,
            projects: vec![RawProject {
                project_id: "42".to_string(),
                title: "Raw title".to_string(),
                url: "https://gepris.dfg.de/gepris/projekt/42".to_string(),
                funding_period: Some("2020 bis 2023".to_string()),
                subject_area: Some("Informatik".to_string()),
                description: Some(
                    "Wir untersuchen Sensoren.DFG-VerfahrenSchwerpunktprogrammeMitverantwortlichDr. A; Dr. B"
                        .to_string(),
                ),
                ..Default::default()
            }],
            ..Default::default()
        }];
        let programs = join_programs(&[summary("SPP 1", "T", "")], &[], &rows, &files);
        let project = &programs[0].projects[0];
        assert_eq!(project.title, "Raw title");
        assert_eq!(project.url, "https://gepris.dfg.de/gepris/projekt/42");
        assert_eq!(project.funding_period, "2020 bis 2023");
        assert_eq!(project.subject_area, "Informatik");
        assert_eq!(project.description, "Wir untersuchen Sensoren.");
        assert_eq!(project.principal_investigator, "Dr. A; Dr. B");
        // Joined rows win over the file's declared count.
        assert_eq!(programs[0].projects_count, 1);
    }

    #[test]
    fn test_projects_count_falls_back_to_raw_file() {
        let files = vec![RawProjectFile {
            spp_number: "SPP 1".to_string(),
            projects_count: 17,
            ..Default::default()
        }];
        let programs = join_programs(&[summary("SPP 1", "T", "")], &[], &[], &files);
        assert_eq!(programs[0].projects_count, 17);
    }

    #[test]
    fn test_csv_order_preserved_within_programme() {
        let rows = vec![
            row("SPP 2", "b", "B", "0", "0"),
            row("SPP 1", "a", "A", "0", "0"),
            row("SPP 2", "c", "C", "0", "0"),
        ];
        let programs = join_programs(
            &[summary("SPP 1", "One", ""), summary("SPP 2", "Two", "")],
            &[],
            &rows,
            &[],
        );
        let ids: Vec<&str> = programs[1]
            .projects
            .iter()
            .map(|p| p.project_id.as_str())
            .collect();
        assert_eq!(ids, vec!["b", "c"]);
    }

    #[test]
    fn test_orphan_rows_do_not_create_programmes() {
        let rows = vec![row("SPP 9", "x", "X", "0", "0")];
        let programs = join_programs(&[summary("SPP 1", "One", "")], &[], &rows, &[]);
        assert_eq!(programs.len(), 1);
        assert!(programs[0].projects.is_empty());
    }
}
