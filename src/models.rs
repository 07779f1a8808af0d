//! Core data models used throughout the catalogue.
//!
//! The `Raw*` types mirror the files produced by the scraping pipeline and
//! are deserialized as-is. [`Program`] and [`Project`] are the unified model
//! built by [`crate::catalog`].

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

/// Programme summary from `spp_programs_analyzed.json`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawProgramSummary {
    #[serde(deserialize_with = "lenient_string")]
    pub spp_number: String,
    #[serde(deserialize_with = "lenient_string")]
    pub title: String,
    #[serde(deserialize_with = "lenient_string")]
    pub url: String,
    #[serde(deserialize_with = "lenient_string")]
    pub beginn: String,
    #[serde(deserialize_with = "lenient_string")]
    pub bundesland: String,
    #[serde(deserialize_with = "lenient_string")]
    pub int_bezug: String,
    #[serde(deserialize_with = "lenient_string")]
    pub variante: String,
    #[serde(deserialize_with = "lenient_string")]
    pub wissenschaftsbereich: String,
    #[serde(deserialize_with = "lenient_string")]
    pub description: String,
    #[serde(deserialize_with = "lenient_string")]
    pub period: String,
    #[serde(deserialize_with = "lenient_string")]
    pub projects_url: String,
    #[serde(deserialize_with = "lenient_string")]
    pub detail_page_url: String,
    #[serde(deserialize_with = "lenient_string")]
    pub website: String,
    #[serde(deserialize_with = "lenient_f64")]
    pub estimated_wearables_relevance: f64,
    #[serde(deserialize_with = "lenient_f64")]
    pub estimated_ai_relevance: f64,
}

/// Programme detail from `spp_programs_detailed.json`. Keys not modelled
/// here are kept in `extra`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawProgramDetail {
    #[serde(deserialize_with = "lenient_string")]
    pub spp_number: String,
    #[serde(deserialize_with = "lenient_string")]
    pub title: String,
    #[serde(deserialize_with = "lenient_string")]
    pub full_description: String,
    #[serde(deserialize_with = "lenient_string")]
    pub coordinator_name: String,
    #[serde(deserialize_with = "lenient_string")]
    pub contact_email: String,
    #[serde(deserialize_with = "lenient_string")]
    pub funding_period: String,
    #[serde(deserialize_with = "lenient_string")]
    pub funding_start: String,
    #[serde(deserialize_with = "lenient_string")]
    pub funding_end: String,
    #[serde(deserialize_with = "lenient_string")]
    pub subject_area: String,
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl RawProgramDetail {
    /// String value of an unmodelled key, or `""`.
    pub fn extra_str(&self, key: &str) -> &str {
        self.extra
            .get(key)
            .and_then(|v| v.as_str())
            .unwrap_or_default()
    }
}

/// One file under `raw/projects/`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawProjectFile {
    #[serde(deserialize_with = "lenient_string")]
    pub spp_number: String,
    #[serde(deserialize_with = "lenient_string")]
    pub spp_title: String,
    #[serde(deserialize_with = "lenient_string")]
    pub spp_url: String,
    #[serde(deserialize_with = "lenient_usize")]
    pub projects_count: usize,
    pub projects: Vec<RawProject>,
}

/// A scraped project with free-text description.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawProject {
    #[serde(deserialize_with = "lenient_string")]
    pub project_id: String,
    #[serde(deserialize_with = "lenient_string")]
    pub url: String,
    #[serde(deserialize_with = "lenient_string")]
    pub title: String,
    pub subject_area: Option<String>,
    pub funding_period: Option<String>,
    pub description: Option<String>,
    pub investigators: Option<String>,
}

/// A row of `processed/all_projects.csv`. All columns are text; scores are
/// parsed during the join.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ScoredProjectRow {
    pub project_id: String,
    pub spp_number: String,
    pub spp_title: String,
    pub title: String,
    pub full_title: String,
    pub institution: String,
    pub funding_period: String,
    #[serde(rename = "abstract")]
    pub abstract_text: String,
    pub keywords: String,
    pub dfg_classification: String,
    pub url: String,
    pub wearables_score: String,
    pub ai_score: String,
    pub combined_score: String,
    pub matched_wearables_keywords: String,
    pub matched_ai_keywords: String,
}

/// A priority programme with its joined projects.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Program {
    pub spp_number: String,
    pub title: String,
    pub url: String,
    pub beginn: String,
    pub bundesland: String,
    pub int_bezug: String,
    pub variante: String,
    pub wissenschaftsbereich: String,
    pub description: String,
    pub full_description: String,
    pub period: String,
    pub projects_url: String,
    pub detail_page_url: String,
    pub coordinator_name: String,
    pub contact_email: String,
    pub funding_period: String,
    pub funding_start: String,
    pub funding_end: String,
    pub subject_area: String,
    pub website: String,
    pub estimated_ai_relevance: f64,
    pub estimated_wearables_relevance: f64,
    pub projects_count: usize,
    pub projects: Vec<Project>,
    pub slug: String,
}

/// A funded project. `spp_number`/`spp_title` refer back to its programme.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Project {
    pub project_id: String,
    pub spp_number: String,
    pub spp_title: String,
    pub title: String,
    pub full_title: String,
    pub principal_investigator: String,
    pub institution: String,
    pub funding_period: String,
    #[serde(rename = "abstract")]
    pub abstract_text: String,
    pub description: String,
    pub keywords: String,
    pub dfg_classification: String,
    pub subject_area: String,
    pub url: String,
    pub wearables_score: f64,
    pub ai_score: f64,
    pub combined_score: f64,
    pub matched_wearables_keywords: String,
    pub matched_ai_keywords: String,
}

/// Compact per-project record used for filtering and card rendering.
///
/// Serialized with the field names the client-side filter script reads.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectView {
    pub id: String,
    pub title: String,
    pub pi: String,
    pub keywords: String,
    pub funding: String,
    pub url: String,
    pub ai: f64,
    pub wear: f64,
    pub combined: f64,
    pub ai_kw: String,
    pub wear_kw: String,
    #[serde(rename = "abstract")]
    pub abstract_text: String,
    pub subject_area: String,
    pub dfg_class: String,
    pub spp: String,
    pub spp_slug: String,
}

impl From<&Project> for ProjectView {
    fn from(p: &Project) -> Self {
        Self {
            id: p.project_id.clone(),
            title: p.title.clone(),
            pi: p.principal_investigator.clone(),
            keywords: p.keywords.clone(),
            funding: p.funding_period.clone(),
            url: p.url.clone(),
            ai: p.ai_score,
            wear: p.wearables_score,
            combined: p.combined_score,
            ai_kw: p.matched_ai_keywords.clone(),
            wear_kw: p.matched_wearables_keywords.clone(),
            abstract_text: p.abstract_text.clone(),
            subject_area: p.subject_area.clone(),
            dfg_class: p.dfg_classification.clone(),
            spp: p.spp_number.clone(),
            spp_slug: slugify(&p.spp_number),
        }
    }
}

/// Coarse bucket for a relevance score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelevanceTier {
    High,
    Medium,
    Low,
    None,
}

impl RelevanceTier {
    pub fn from_score(score: f64) -> Self {
        if score >= 3.0 {
            RelevanceTier::High
        } else if score >= 1.0 {
            RelevanceTier::Medium
        } else if score > 0.0 {
            RelevanceTier::Low
        } else {
            RelevanceTier::None
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RelevanceTier::High => "high",
            RelevanceTier::Medium => "medium",
            RelevanceTier::Low => "low",
            RelevanceTier::None => "none",
        }
    }
}

/// URL-safe programme key: whitespace runs become `-`, then lowercased.
pub fn slugify(spp_number: &str) -> String {
    let mut slug = String::with_capacity(spp_number.len());
    let mut in_space = false;
    for ch in spp_number.chars() {
        if ch.is_whitespace() {
            if !in_space {
                slug.push('-');
            }
            in_space = true;
        } else {
            slug.extend(ch.to_lowercase());
            in_space = false;
        }
    }
    slug
}

/// Accepts strings, numbers and null for text fields; the scraper is not
/// consistent about `spp_number` being quoted.
fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::String(s)) => s,
        Some(serde_json::Value::Number(n)) => n.to_string(),
        Some(serde_json::Value::Bool(b)) => b.to_string(),
        _ => String::new(),
    })
}

fn lenient_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(serde_json::Value::String(s)) => parse_score(&s),
        _ => 0.0,
    })
}

fn lenient_usize<'de, D>(deserializer: D) -> Result<usize, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::Number(n)) => n.as_u64().unwrap_or(0) as usize,
        Some(serde_json::Value::String(s)) => s.trim().parse().unwrap_or(0),
        _ => 0,
    })
}

/// Parses a score cell. Anything that is not a finite number yields 0.
pub fn parse_score(text: &str) -> f64 {
    match text.trim().parse::<f64>() {
        Ok(v) if v.is_finite() => v,
        _ => 0.0,
    }
}
