//! Reversible highlighting of query matches in text content
//!
//! The highlighter operates on an owned [`Container`] of text nodes, the
//! crate's stand-in for whatever rendering surface actually displays the
//! text. Highlighting splits each node into alternating marked and unmarked
//! segments; clearing merges the segments back so the node's exact original
//! text and structure are restored. Matching is case-insensitive while the
//! marked substrings keep their original casing, and one node may carry any
//! number of non-contiguous marks.

use std::ops::Range;

/// A run of text within a node, optionally carrying a highlight mark
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    /// The original-case text of this run
    pub text: String,
    /// Whether this run is highlighted
    pub marked: bool,
}

/// One text node of the display surface
#[derive(Debug, Clone)]
pub struct TextNode {
    segments: Vec<Segment>,
}

impl TextNode {
    fn new(text: impl Into<String>) -> Self {
        Self {
            segments: vec![Segment {
                text: text.into(),
                marked: false,
            }],
        }
    }

    /// The node's runs, in order
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// The node's full text, independent of marking
    pub fn text(&self) -> String {
        self.segments.iter().map(|s| s.text.as_str()).collect()
    }

    fn merge(&mut self) {
        if self.segments.len() > 1 || self.segments.iter().any(|s| s.marked) {
            let text = self.text();
            self.segments = vec![Segment {
                text,
                marked: false,
            }];
        }
    }

    fn split(&mut self, query_lower: &str) {
        self.merge();
        let text = std::mem::take(&mut self.segments[0].text);
        let ranges = match_ranges(&text, query_lower);

        if ranges.is_empty() {
            self.segments[0].text = text;
            return;
        }

        let mut segments = Vec::new();
        let mut cursor = 0;
        for range in ranges {
            if range.start > cursor {
                segments.push(Segment {
                    text: text[cursor..range.start].to_string(),
                    marked: false,
                });
            }
            segments.push(Segment {
                text: text[range.clone()].to_string(),
                marked: true,
            });
            cursor = range.end;
        }
        if cursor < text.len() {
            segments.push(Segment {
                text: text[cursor..].to_string(),
                marked: false,
            });
        }

        self.segments = segments;
    }
}

/// An owned group of text nodes that can be highlighted and cleared
#[derive(Debug, Clone, Default)]
pub struct Container {
    nodes: Vec<TextNode>,
}

impl Container {
    /// Create a container from one text run per node
    pub fn from_texts<I, S>(texts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            nodes: texts.into_iter().map(TextNode::new).collect(),
        }
    }

    /// Append a text node
    pub fn push_text(&mut self, text: impl Into<String>) {
        self.nodes.push(TextNode::new(text));
    }

    /// The container's nodes, in order
    pub fn nodes(&self) -> &[TextNode] {
        &self.nodes
    }

    /// The serialized text content of every node
    pub fn text(&self) -> String {
        self.nodes.iter().map(|n| n.text()).collect()
    }

    /// Mark every case-insensitive occurrence of `query` in the container
    ///
    /// Any previous marks are removed first, so repeated calls (with the same
    /// or a different query) never nest or accumulate. A blank query only
    /// clears.
    pub fn highlight(&mut self, query: &str) {
        let query_lower = query.trim().to_lowercase();
        if query_lower.is_empty() {
            self.clear();
            return;
        }
        for node in &mut self.nodes {
            node.split(&query_lower);
        }
    }

    /// Remove every mark, restoring each node's original single text run
    pub fn clear(&mut self) {
        for node in &mut self.nodes {
            node.merge();
        }
    }
}

/// Byte ranges of every case-insensitive, non-overlapping occurrence of
/// `query_lower` in `text`, expressed against the original text
fn match_ranges(text: &str, query_lower: &str) -> Vec<Range<usize>> {
    // Lowercase the text one character at a time, remembering where each
    // original character landed. A character may lowercase to several
    // characters; matches must line up with original character boundaries.
    let mut lowered = String::new();
    let mut boundaries = Vec::new();
    for (original_offset, ch) in text.char_indices() {
        boundaries.push((lowered.len(), original_offset));
        for lower in ch.to_lowercase() {
            lowered.push(lower);
        }
    }
    boundaries.push((lowered.len(), text.len()));

    let to_original = |lowered_offset: usize| -> Option<usize> {
        boundaries
            .binary_search_by_key(&lowered_offset, |&(lower, _)| lower)
            .ok()
            .map(|i| boundaries[i].1)
    };

    let mut ranges = Vec::new();
    let mut position = 0;
    while let Some(found) = lowered[position..].find(query_lower) {
        let start = position + found;
        let end = start + query_lower.len();
        position = end;

        if let (Some(original_start), Some(original_end)) = (to_original(start), to_original(end)) {
            ranges.push(original_start..original_end);
        }
    }
    ranges
}

/// Wrap every match in `<mark>` tags, preserving the original casing
///
/// Used for one-off display strings such as ranked search result snippets.
pub fn wrap_marks(text: &str, query: &str) -> String {
    let query_lower = query.trim().to_lowercase();
    if query_lower.is_empty() {
        return text.to_string();
    }

    let mut output = String::with_capacity(text.len());
    let mut cursor = 0;
    for range in match_ranges(text, &query_lower) {
        output.push_str(&text[cursor..range.start]);
        output.push_str("<mark>");
        output.push_str(&text[range.clone()]);
        output.push_str("</mark>");
        cursor = range.end;
    }
    output.push_str(&text[cursor..]);
    output
}

#[cfg(test)]
mod tests {
    use super::*;

    fn container() -> Container {
        Container::from_texts(["ChromeDriver クラスの使い方", "EdgeDriver も同様です"])
    }

    #[test]
    fn round_trip_restores_exact_text() {
        let mut c = container();
        let before = c.text();
        c.highlight("driver");
        c.clear();
        assert_eq!(c.text(), before);
        assert!(c.nodes().iter().all(|n| n.segments().len() == 1));
    }

    #[test]
    fn marks_preserve_original_casing() {
        let mut c = Container::from_texts(["PowerShell Driver"]);
        c.highlight("driver");
        let marked: Vec<&Segment> = c.nodes()[0]
            .segments()
            .iter()
            .filter(|s| s.marked)
            .collect();
        assert_eq!(marked.len(), 1);
        assert_eq!(marked[0].text, "Driver");
    }

    #[test]
    fn one_node_may_carry_multiple_marks() {
        let mut c = Container::from_texts(["driver の driver テスト driver"]);
        c.highlight("driver");
        let marked = c.nodes()[0].segments().iter().filter(|s| s.marked).count();
        assert_eq!(marked, 3);
    }

    #[test]
    fn rehighlighting_never_nests_marks() {
        let mut c = container();
        c.highlight("driver");
        c.highlight("driver");
        c.highlight("クラス");
        let marked: Vec<String> = c
            .nodes()
            .iter()
            .flat_map(|n| n.segments())
            .filter(|s| s.marked)
            .map(|s| s.text.clone())
            .collect();
        assert_eq!(marked, vec!["クラス".to_string()]);
        assert_eq!(c.text(), container().text());
    }

    #[test]
    fn highlight_after_clear_is_supported() {
        let mut c = container();
        c.highlight("driver");
        c.clear();
        c.highlight("edge");
        let marked = c
            .nodes()
            .iter()
            .flat_map(|n| n.segments())
            .filter(|s| s.marked)
            .count();
        assert_eq!(marked, 1);
    }

    #[test]
    fn blank_query_only_clears() {
        let mut c = container();
        c.highlight("driver");
        c.highlight("  ");
        assert!(c.nodes().iter().all(|n| n.segments().len() == 1));
    }

    #[test]
    fn matching_is_case_insensitive_on_both_sides() {
        let mut c = Container::from_texts(["CHROMEDRIVER chromedriver ChromeDriver"]);
        c.highlight("ChromeDriver");
        let marked = c.nodes()[0].segments().iter().filter(|s| s.marked).count();
        assert_eq!(marked, 3);
    }

    #[test]
    fn wrap_marks_wraps_each_occurrence() {
        assert_eq!(
            wrap_marks("Driver を使う driver", "driver"),
            "<mark>Driver</mark> を使う <mark>driver</mark>"
        );
        assert_eq!(wrap_marks("no match here", "driver"), "no match here");
    }
}
