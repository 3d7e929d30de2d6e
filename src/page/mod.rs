//! # Page Index Module
//!
//! This module builds a flat, queryable index of the text-bearing elements of
//! a rendered documentation page. Headings, paragraphs, list items and code
//! are collected in document order into [`Fragment`]s, which the search module
//! ranks against user queries.
//!
//! ## Key Components
//!
//! - `Fragment`: one unit of indexed page text
//! - `SourceKind`: the kind of element a fragment was collected from
//! - `PageIndex`: the full index for one page snapshot
//!
//! The index reflects only the page snapshot it was built from; content
//! injected afterwards (chat messages, status banners) is never part of it.

mod extract;

pub use extract::collect_fragments;

use serde::{Deserialize, Serialize};

/// Minimum trimmed length (in characters) for an element to be indexed
pub const MIN_FRAGMENT_CHARS: usize = 3;

/// The kind of element a fragment was collected from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SourceKind {
    /// `<h1>` page title
    Heading1,
    /// `<h2>` section heading
    Heading2,
    /// `<h3>` subsection heading
    Heading3,
    /// `<h4>` subsection heading
    Heading4,
    /// `<p>` paragraph
    Paragraph,
    /// `<li>` list item
    ListItem,
    /// Inline `<code>`
    Code,
    /// `<pre>` code block
    CodeBlock,
}

impl SourceKind {
    /// Map an HTML tag name to a source kind
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "h1" => Some(Self::Heading1),
            "h2" => Some(Self::Heading2),
            "h3" => Some(Self::Heading3),
            "h4" => Some(Self::Heading4),
            "p" => Some(Self::Paragraph),
            "li" => Some(Self::ListItem),
            "code" => Some(Self::Code),
            "pre" => Some(Self::CodeBlock),
            _ => None,
        }
    }

    /// Display label shown next to a search result
    pub fn label(&self) -> &'static str {
        match self {
            Self::Heading1 => "タイトル",
            Self::Heading2 => "見出し",
            Self::Heading3 | Self::Heading4 => "小見出し",
            Self::Paragraph => "段落",
            Self::ListItem => "リスト",
            Self::Code => "コード",
            Self::CodeBlock => "コードブロック",
        }
    }
}

/// One unit of indexed page text
///
/// Immutable once collected. `text` is the lowercase-normalized form used for
/// matching; `original_text` preserves the page's casing for display.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Fragment {
    /// Lowercase-normalized text used for matching
    pub text: String,
    /// Original text as it appears on the page
    pub original_text: String,
    /// Kind of element the text came from
    pub kind: SourceKind,
    /// Position of the element among the page's searchable elements
    pub ordinal: usize,
}

/// The searchable index for one page snapshot
#[derive(Debug, Clone, Default)]
pub struct PageIndex {
    fragments: Vec<Fragment>,
}

impl PageIndex {
    /// Build an index from raw HTML
    ///
    /// Collects every text-bearing element of interest in document order,
    /// skipping elements whose trimmed text is [`MIN_FRAGMENT_CHARS`] or
    /// fewer characters. An empty document yields an empty index.
    pub fn from_html(html: &str) -> Self {
        Self {
            fragments: collect_fragments(html),
        }
    }

    /// Rebuild the index from a new snapshot, fully replacing prior state
    pub fn rebuild(&mut self, html: &str) {
        self.fragments = collect_fragments(html);
    }

    /// The indexed fragments, in document order
    pub fn fragments(&self) -> &[Fragment] {
        &self.fragments
    }

    /// Number of indexed fragments
    pub fn len(&self) -> usize {
        self.fragments.len()
    }

    /// Whether the index holds no fragments
    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }
}
