//! Project filtering, sorting and pagination.
//!
//! Pure functions over [`ProjectView`] slices; the same [`FilterState`] drives
//! the CLI `search` command, the `render` command and the preview server.

use serde::Serialize;
use std::cmp::Ordering;

use crate::models::ProjectView;

/// Projects per page.
pub const PAGE_SIZE: usize = 25;

/// Sort order for project lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    /// Combined score, highest first.
    #[default]
    Score,
    /// Title, alphabetical.
    Title,
    /// Investigator names, alphabetical.
    Pi,
}

impl SortKey {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "score" => Some(SortKey::Score),
            "title" => Some(SortKey::Title),
            "pi" => Some(SortKey::Pi),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::Score => "score",
            SortKey::Title => "title",
            SortKey::Pi => "pi",
        }
    }
}

/// Query state shared by the list views. Round-trips through the URL query
/// string (see [`crate::url_state`]).
#[derive(Debug, Clone, PartialEq)]
pub struct FilterState {
    /// Free-text query; every whitespace-separated term must match.
    pub q: String,
    /// Minimum combined score; `0` disables the filter.
    pub score: f64,
    pub sort: SortKey,
    /// 1-indexed page number.
    pub page: usize,
    /// Programme number to restrict to; empty disables the filter.
    pub spp: String,
    /// Active tab on the focus page (`ai` or `wearables`).
    pub tab: String,
}

impl Default for FilterState {
    fn default() -> Self {
        Self {
            q: String::new(),
            score: 0.0,
            sort: SortKey::Score,
            page: 1,
            spp: String::new(),
            tab: String::new(),
        }
    }
}

/// Applies query, score threshold and programme filters, then sorts.
///
/// Sorting is stable: records that compare equal keep their input order.
pub fn filter_projects<'a>(data: &'a [ProjectView], state: &FilterState) -> Vec<&'a ProjectView> {
    let terms: Vec<String> = state
        .q
        .to_lowercase()
        .split_whitespace()
        .map(str::to_string)
        .collect();

    let mut results: Vec<&ProjectView> = data
        .iter()
        .filter(|p| terms.is_empty() || matches_terms(p, &terms))
        .filter(|p| state.score <= 0.0 || p.combined >= state.score)
        .filter(|p| state.spp.is_empty() || p.spp == state.spp)
        .collect();

    match state.sort {
        SortKey::Score => results.sort_by(|a, b| {
            b.combined
                .partial_cmp(&a.combined)
                .unwrap_or(Ordering::Equal)
        }),
        SortKey::Title => results.sort_by(|a, b| locale_cmp(&a.title, &b.title)),
        SortKey::Pi => results.sort_by(|a, b| locale_cmp(&a.pi, &b.pi)),
    }

    results
}

fn matches_terms(p: &ProjectView, terms: &[String]) -> bool {
    let haystack = format!(
        "{} {} {} {} {}",
        p.title, p.pi, p.keywords, p.ai_kw, p.wear_kw
    )
    .to_lowercase();
    terms.iter().all(|t| haystack.contains(t.as_str()))
}

/// Number of pages needed for `total` items.
pub fn total_pages(total: usize) -> usize {
    total.div_ceil(PAGE_SIZE)
}

/// The items on a 1-indexed page. Page 0 is treated as page 1; pages past
/// the end are empty.
pub fn paginate<T>(items: &[T], page: usize) -> &[T] {
    let start = (page.max(1) - 1).saturating_mul(PAGE_SIZE);
    if start >= items.len() {
        return &[];
    }
    let end = (start + PAGE_SIZE).min(items.len());
    &items[start..end]
}

/// One entry of the pagination control. Serializes as the page number, or
/// `null` for an ellipsis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum PageItem {
    Page(usize),
    Ellipsis,
}

/// First page, last page and `current ± 2`, with one ellipsis per gap.
///
/// Empty when everything fits on a single page.
pub fn page_sequence(total: usize, current: usize) -> Vec<PageItem> {
    let pages = total_pages(total);
    if pages <= 1 {
        return Vec::new();
    }

    let mut items = Vec::new();
    for i in 1..=pages {
        let in_window = i + 2 >= current && i <= current + 2;
        if i == 1 || i == pages || in_window {
            items.push(PageItem::Page(i));
        } else if items.last() != Some(&PageItem::Ellipsis) {
            items.push(PageItem::Ellipsis);
        }
    }
    items
}

/// Case- and accent-insensitive comparison for German and English titles,
/// falling back to accent, then case, to keep the order total.
pub fn locale_cmp(a: &str, b: &str) -> Ordering {
    collation_key(a)
        .cmp(&collation_key(b))
        .then_with(|| a.to_lowercase().cmp(&b.to_lowercase()))
        .then_with(|| b.cmp(a))
}

fn collation_key(s: &str) -> String {
    let mut key = String::with_capacity(s.len());
    for ch in s.chars().flat_map(char::to_lowercase) {
        match ch {
            'ä' | 'á' | 'à' | 'â' | 'ã' | 'å' => key.push('a'),
            'ö' | 'ó' | 'ò' | 'ô' | 'õ' | 'ø' => key.push('o'),
            'ü' | 'ú' | 'ù' | 'û' => key.push('u'),
            'é' | 'è' | 'ê' | 'ë' => key.push('e'),
            'í' | 'ì' | 'î' | 'ï' => key.push('i'),
            'ç' => key.push('c'),
            'ñ' => key.push('n'),
            'ß' => key.push_str("ss"),
            c => key.push(c),
        }
    }
    key
}

#[cfg(test)]
mod tests {
    use super::*;

    fn view(id: &str, title: &str, pi: &str, combined: f64) -> ProjectView {
        ProjectView {
            id: id.to_string(),
            title: title.to_string(),
            pi: pi.to_string(),
            keywords: String::new(),
            funding: String::new(),
            url: String::new(),
            ai: 0.0,
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

    fn ids(results: &[&ProjectView]) -> Vec<String> {
        results.iter().map(|p| p.id.clone()).collect()
    }

    #[test]
    fn test_empty_state_keeps_everything_in_order() {
        let data = vec![view("a", "A", "", 1.0), view("b", "B", "", 1.0), view("c", "C", "", 1.0)];
        let results = filter_projects(&data, &FilterState::default());
        assert_eq!(ids(&results), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_default_sort_is_combined_descending() {
        let data = vec![view("a", "A", "", 0.5), view("b", "B", "", 3.0), view("c", "C", "", 1.0)];
        let results = filter_projects(&data, &FilterState::default());
        assert_eq!(ids(&results), vec!["b", "c", "a"]);
    }

    #[test]
    fn test_every_term_must_match() {
        let mut data = vec![
            view("a", "Soft robotic gripper", "Dr. Meier", 0.0),
            view("b", "Robotic arm", "Dr. Huber", 0.0),
        ];
        data[1].ai_kw = "machine learning".to_string();

        let state = FilterState {
            q: "ROBOTIC  meier".to_string(),
            ..Default::default()
        };
        assert_eq!(ids(&filter_projects(&data, &state)), vec!["a"]);

        let state = FilterState {
            q: "learning".to_string(),
            ..Default::default()
        };
        assert_eq!(ids(&filter_projects(&data, &state)), vec!["b"]);
    }

    #[test]
    fn test_score_threshold_and_programme_filter() {
        let mut data = vec![view("a", "A", "", 0.5), view("b", "B", "", 2.0), view("c", "C", "", 4.0)];
        data[2].spp = "SPP 2".to_string();

        let state = FilterState {
            score: 1.0,
            ..Default::default()
        };
        assert_eq!(ids(&filter_projects(&data, &state)), vec!["c", "b"]);

        let state = FilterState {
            score: 1.0,
            spp: "SPP 1".to_string(),
            ..Default::default()
        };
        assert_eq!(ids(&filter_projects(&data, &state)), vec!["b"]);
    }

    #[test]
    fn test_title_and_pi_sorts_are_locale_aware() {
        let data = vec![
            view("z", "Zellbiologie", "Zeller", 0.0),
            view("o", "Ökologie", "Özdemir", 0.0),
            view("a", "akustik", "Adler", 0.0),
        ];
        let state = FilterState {
            sort: SortKey::Title,
            ..Default::default()
        };
        assert_eq!(ids(&filter_projects(&data, &state)), vec!["a", "o", "z"]);

        let state = FilterState {
            sort: SortKey::Pi,
            ..Default::default()
        };
        assert_eq!(ids(&filter_projects(&data, &state)), vec!["a", "o", "z"]);
    }

    #[test]
    fn test_paginate() {
        let items: Vec<usize> = (0..60).collect();
        assert_eq!(paginate(&items, 1).len(), 25);
        assert_eq!(paginate(&items, 3), &items[50..60]);
        assert!(paginate(&items, 4).is_empty());
        assert_eq!(paginate(&items, 0), paginate(&items, 1));
        assert!(paginate::<usize>(&[], 1).is_empty());
    }

    #[test]
    fn test_page_sequence_single_page_is_empty() {
        assert!(page_sequence(0, 1).is_empty());
        assert!(page_sequence(25, 1).is_empty());
    }

    #[test]
    fn test_page_sequence_window_and_gaps() {
        use PageItem::*;
        // 20 pages, current 10
        assert_eq!(
            page_sequence(500, 10),
            vec![Page(1), Ellipsis, Page(8), Page(9), Page(10), Page(11), Page(12), Ellipsis, Page(20)]
        );
        assert_eq!(
            page_sequence(500, 1),
            vec![Page(1), Page(2), Page(3), Ellipsis, Page(20)]
        );
        assert_eq!(page_sequence(100, 2), vec![Page(1), Page(2), Page(3), Page(4)]);
    }

    #[test]
    fn test_page_sequence_invariants() {
        for total in [26, 51, 130, 251, 1000] {
            let pages = total_pages(total);
            for current in 1..=pages {
                let seq = page_sequence(total, current);
                assert_eq!(seq.first(), Some(&PageItem::Page(1)));
                assert_eq!(seq.last(), Some(&PageItem::Page(pages)));
                assert!(seq.contains(&PageItem::Page(current)));
                for pair in seq.windows(2) {
                    assert!(
                        !(pair[0] == PageItem::Ellipsis && pair[1] == PageItem::Ellipsis),
                        "adjacent ellipses for total={} current={}",
                        total,
                        current
                    );
                }
            }
        }
    }

    #[test]
    fn test_sort_key_round_trip() {
        for key in [SortKey::Score, SortKey::Title, SortKey::Pi] {
            assert_eq!(SortKey::parse(key.as_str()), Some(key));
        }
        assert_eq!(SortKey::parse("date"), None);
    }
}
