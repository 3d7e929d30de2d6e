//! Relevance scoring and ranking of page fragments

use serde::Serialize;

use crate::highlight::wrap_marks;
use crate::page::Fragment;

/// Maximum number of ranked results returned per query
pub const MAX_RESULTS: usize = 10;

/// A ranked match for one query
///
/// Borrows its fragment from the page index; results are rebuilt per query
/// and discarded on the next one.
#[derive(Debug, Serialize)]
pub struct SearchResult<'a> {
    /// The matched fragment
    pub fragment: &'a Fragment,
    /// Additive relevance score
    pub relevance: u32,
    /// Original-case text with match occurrences wrapped in `<mark>` tags
    pub highlighted_text: String,
}

/// Score a fragment's text against a query
///
/// Case-insensitive and additive: +100 for exact equality, +50 for each
/// whitespace-delimited word starting with the query, +10 for containing the
/// query anywhere. The bonuses stack.
pub fn score(fragment_text: &str, query: &str) -> u32 {
    let text = fragment_text.to_lowercase();
    let query = query.to_lowercase();

    let mut relevance = 0;

    if text == query {
        relevance += 100;
    }

    for word in text.split_whitespace() {
        if word.starts_with(query.as_str()) {
            relevance += 50;
        }
    }

    if text.contains(query.as_str()) {
        relevance += 10;
    }

    relevance
}

/// Rank fragments against a query
///
/// Only fragments containing the query participate. Results are ordered by
/// score descending; the sort is stable, so ties stay in document order. At
/// most [`MAX_RESULTS`] results are returned.
pub fn rank<'a>(fragments: &'a [Fragment], query: &str) -> Vec<SearchResult<'a>> {
    let needle = query.to_lowercase();

    let mut results: Vec<SearchResult<'a>> = fragments
        .iter()
        .filter(|fragment| fragment.text.contains(needle.as_str()))
        .map(|fragment| SearchResult {
            relevance: score(&fragment.text, &needle),
            highlighted_text: wrap_marks(&fragment.original_text, query),
            fragment,
        })
        .collect();

    results.sort_by(|a, b| b.relevance.cmp(&a.relevance));
    results.truncate(MAX_RESULTS);
    results
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::SourceKind;

    fn fragment(text: &str, ordinal: usize) -> Fragment {
        Fragment {
            text: text.to_lowercase(),
            original_text: text.to_string(),
            kind: SourceKind::Paragraph,
            ordinal,
        }
    }

    #[test]
    fn word_prefix_and_substring_bonuses_stack() {
        assert_eq!(score("powershell driver", "driver"), 60);
        assert_eq!(score("driver class", "driver"), 60);
    }

    #[test]
    fn exact_match_collects_every_bonus() {
        assert_eq!(score("driver", "driver"), 160);
    }

    #[test]
    fn scoring_is_case_insensitive() {
        assert_eq!(score("PowerShell Driver", "DRIVER"), 60);
    }

    #[test]
    fn non_matching_text_scores_zero() {
        assert_eq!(score("other text", "driver"), 0);
    }

    #[test]
    fn ties_keep_document_order() {
        let fragments = vec![
            fragment("PowerShell Driver", 0),
            fragment("Driver Class", 1),
            fragment("Other text", 2),
        ];

        let results = rank(&fragments, "driver");
        let texts: Vec<&str> = results
            .iter()
            .map(|r| r.fragment.original_text.as_str())
            .collect();

        assert_eq!(texts, vec!["PowerShell Driver", "Driver Class"]);
        assert_eq!(results[0].relevance, 60);
        assert_eq!(results[1].relevance, 60);
    }

    #[test]
    fn exact_match_ranks_first() {
        let fragments = vec![
            fragment("PowerShell Driver", 0),
            fragment("driver", 1),
            fragment("Driver Class", 2),
        ];

        let results = rank(&fragments, "driver");
        assert_eq!(results[0].fragment.original_text, "driver");
        assert_eq!(results[0].relevance, 160);
    }

    #[test]
    fn results_are_limited() {
        let fragments: Vec<Fragment> = (0..25)
            .map(|i| fragment(&format!("driver entry {i}"), i))
            .collect();

        assert_eq!(rank(&fragments, "driver").len(), MAX_RESULTS);
    }

    #[test]
    fn matches_are_wrapped_for_display() {
        let fragments = vec![fragment("PowerShell Driver", 0)];
        let results = rank(&fragments, "driver");
        assert_eq!(
            results[0].highlighted_text,
            "PowerShell <mark>Driver</mark>"
        );
    }
}
