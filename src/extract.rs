//! Text extraction from scraped GEPRIS project descriptions.
//!
//! The scraper stores the project page as one blob: the abstract followed by
//! metadata sections whose German labels are fused into the text without
//! delimiters ("...Abstract.DFG-VerfahrenSchwerpunktprogrammeMitverantwortlich
//! Dr. A; Dr. B"). This module recovers investigator names from those labels
//! and strips the metadata tail from the abstract.
//!
//! Extraction is heuristic and never fails: unmatched or truncated input
//! yields fewer names or an empty string.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::RawProject;

/// Labels that terminate a captured section.
const SECTION_END: &str = "(?:Ehemalige|Kooperationspartner|Mitverantwortlich|DFG-Verfahren|Beteiligte|Internationale|Teilprojekt|$)";

/// A labelled section to scan for names.
struct NamePattern {
    regex: Regex,
    /// Former applicants carry a ", bis MM/YYYY" suffix.
    strip_until_date: bool,
}

/// Scanned in this order; names are emitted in pattern order, not in the
/// order the labels appear in the text.
static NAME_PATTERNS: Lazy<Vec<NamePattern>> = Lazy::new(|| {
    let build = |label: &str, strip_until_date: bool| NamePattern {
        regex: Regex::new(&format!("(?s){}(.*?){}", label, SECTION_END))
            .expect("valid section regex"),
        strip_until_date,
    };
    vec![
        build("Mitverantwortliche?", false),
        build(
            r"Kooperationspartner(?:innen\s*/\s*Kooperationspartner|in(?:nen)?|n)?",
            false,
        ),
        build(r"Ehemalige[rs]?\s*Antragsteller(?:in(?:nen)?)?", true),
    ]
});

static UNTIL_DATE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r",\s*bis\s+\d{1,2}/\d{4}$").expect("valid date regex"));

static METADATA_START: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"DFG-Verfahren|Mitverantwortlich|Ehemalige[rs]?\s*Antragsteller|Kooperationspartner|Teilprojektleiter",
    )
    .expect("valid metadata regex")
});

/// Returns the project's investigators as `"Name A; Name B"`.
///
/// A non-blank `investigators` field wins outright. Otherwise names are
/// collected from the co-responsible, cooperation-partner and
/// former-applicant sections of the description, in that order.
pub fn parse_investigators(raw: &RawProject) -> String {
    if let Some(explicit) = raw.investigators.as_deref() {
        let explicit = explicit.trim();
        if !explicit.is_empty() {
            return explicit.to_string();
        }
    }

    let description = raw.description.as_deref().unwrap_or_default();
    extract_names(description).join("; ")
}

/// Names from every labelled section of `description`, in pattern order.
pub fn extract_names(description: &str) -> Vec<String> {
    let mut names = Vec::new();

    for pattern in NAME_PATTERNS.iter() {
        let Some(caps) = pattern.regex.captures(description) else {
            continue;
        };
        let Some(section) = caps.get(1) else {
            continue;
        };

        for part in section.as_str().split(';') {
            let mut name = collapse_whitespace(part);
            if pattern.strip_until_date {
                name = UNTIL_DATE.replace(&name, "").trim().to_string();
            }
            if !name.is_empty() {
                names.push(name);
            }
        }
    }

    names
}

/// Cuts the GEPRIS metadata tail off a description.
///
/// Text is returned unchanged when no marker is found or the description
/// starts with one.
pub fn clean_description(description: &str) -> String {
    match METADATA_START.find(description) {
        Some(m) if m.start() > 0 => description[..m.start()].trim().to_string(),
        _ => description.to_string(),
    }
}

fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}
