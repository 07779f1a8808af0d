//! [`FilterState`] ⇄ URL query string.
//!
//! Recognized parameters: `q`, `score`, `sort`, `page`, `spp`, `tab`. Reading
//! takes the first occurrence of each and ignores empty or unparsable
//! values. Writing omits every parameter that holds its default, so the
//! default state produces a bare path.

use url::form_urlencoded;

use crate::filter::{FilterState, SortKey};

/// Parses a query string (with or without the leading `?`).
pub fn read_url_state(query: &str) -> FilterState {
    let mut state = FilterState::default();
    let mut seen: Vec<String> = Vec::new();

    for (key, value) in form_urlencoded::parse(query.trim_start_matches('?').as_bytes()) {
        if seen.iter().any(|k| *k == key) {
            continue;
        }
        seen.push(key.to_string());
        if value.is_empty() {
            continue;
        }

        match &*key {
            "q" => state.q = value.into_owned(),
            "score" => {
                if let Ok(score) = value.trim().parse::<f64>() {
                    if score.is_finite() {
                        state.score = score;
                    }
                }
            }
            "sort" => {
                if let Some(sort) = SortKey::parse(&value) {
                    state.sort = sort;
                }
            }
            "page" => {
                if let Ok(page) = value.trim().parse::<usize>() {
                    state.page = page;
                }
            }
            "spp" => state.spp = value.into_owned(),
            "tab" => state.tab = value.into_owned(),
            _ => {}
        }
    }

    state
}

/// The query string for `state`, without the leading `?`. Empty for the
/// default state.
pub fn to_query_string(state: &FilterState) -> String {
    let mut params = form_urlencoded::Serializer::new(String::new());
    if !state.q.is_empty() {
        params.append_pair("q", &state.q);
    }
    if state.score > 0.0 {
        params.append_pair("score", &state.score.to_string());
    }
    if state.sort != SortKey::Score {
        params.append_pair("sort", state.sort.as_str());
    }
    if state.page > 1 {
        params.append_pair("page", &state.page.to_string());
    }
    if !state.spp.is_empty() {
        params.append_pair("spp", &state.spp);
    }
    if !state.tab.is_empty() && state.tab != "ai" {
        params.append_pair("tab", &state.tab);
    }
    params.finish()
}

/// `path` with the state's query string appended, or `path` alone.
pub fn write_url_state(path: &str, state: &FilterState) -> String {
    let qs = to_query_string(state);
    if qs.is_empty() {
        path.to_string()
    } else {
        format!("{}?{}", path, qs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_state_writes_bare_path() {
        assert_eq!(
            write_url_state("/programs/spp-1/", &FilterState::default()),
            "/programs/spp-1/"
        );
    }

    #[test]
    fn test_tab_ai_is_a_default() {
        let state = FilterState {
            tab: "ai".to_string(),
            ..Default::default()
        };
        assert_eq!(to_query_string(&state), "");

        let state = FilterState {
            tab: "wearables".to_string(),
            ..Default::default()
        };
        assert_eq!(to_query_string(&state), "tab=wearables");
    }

    #[test]
    fn test_round_trip() {
        let state = FilterState {
            q: "soft robotics & more".to_string(),
            score: 2.5,
            sort: SortKey::Pi,
            page: 3,
            spp: "SPP 2433".to_string(),
            tab: "wearables".to_string(),
        };
        let url = write_url_state("/focus/", &state);
        assert_eq!(
            url,
            "/focus/?q=soft+robotics+%26+more&score=2.5&sort=pi&page=3&spp=SPP+2433&tab=wearables"
        );
        let (_, query) = url.split_once('?').unwrap();
        assert_eq!(read_url_state(query), state);
    }

    #[test]
    fn test_whole_scores_written_without_fraction() {
        let state = FilterState {
            score: 2.0,
            ..Default::default()
        };
        assert_eq!(to_query_string(&state), "score=2");
    }

    #[test]
    fn test_read_ignores_bad_values() {
        let state = read_url_state("?score=abc&page=x&sort=date&q=&unknown=1");
        assert_eq!(state, FilterState::default());
    }

    #[test]
    fn test_read_takes_first_occurrence() {
        let state = read_url_state("q=first&q=second&page=2&page=5");
        assert_eq!(state.q, "first");
        assert_eq!(state.page, 2);
    }
}
