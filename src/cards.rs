//! Visibility filtering of pre-rendered content cards
//!
//! Cards are the class/note blocks of an overview page. They are never
//! created or destroyed by a query; filtering only toggles each card between
//! shown and dimmed. A card matches when the lowercased concatenation of its
//! visible text and its optional `data-searchable` keywords contains the
//! lowercased query.

use scraper::{Html, Selector};
use serde::Serialize;
use tracing::debug;

/// CSS selector matching the card blocks of an overview page
const CARD_SELECTOR: &str = ".class-card, .note-card";

/// Attribute carrying extra searchable keywords
const SEARCHABLE_ATTR: &str = "data-searchable";

/// Whether a card is currently displayed or dimmed out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    /// The card is displayed normally
    Shown,
    /// The card is dimmed out by the active filter
    Dimmed,
}

/// A pre-rendered content block toggled by the filter
#[derive(Debug, Clone, Serialize)]
pub struct Card {
    /// The card's rendered text
    pub visible_text: String,
    /// Extra keywords from the card's `data-searchable` attribute
    pub searchable_text: Option<String>,
    /// Current visibility, mutated in place by [`apply`]
    pub visibility: Visibility,
}

impl Card {
    /// Create a shown card from its text and optional extra keywords
    pub fn new(visible_text: impl Into<String>, searchable_text: Option<String>) -> Self {
        Self {
            visible_text: visible_text.into(),
            searchable_text,
            visibility: Visibility::Shown,
        }
    }

    fn matches(&self, needle: &str) -> bool {
        let combined = format!(
            "{} {}",
            self.visible_text,
            self.searchable_text.as_deref().unwrap_or_default()
        )
        .to_lowercase();
        combined.contains(needle)
    }
}

/// Apply a query to a card set, returning the number of shown cards
///
/// A blank query resets every card to shown. The assignment depends only on
/// the cards' text and the query, so re-running with the same inputs is
/// idempotent; the caller uses the returned count to decide whether to render
/// a "no results" state.
pub fn apply(cards: &mut [Card], query: &str) -> usize {
    let needle = query.trim().to_lowercase();

    if needle.is_empty() {
        for card in cards.iter_mut() {
            card.visibility = Visibility::Shown;
        }
        return cards.len();
    }

    let mut shown = 0;
    for card in cards.iter_mut() {
        if card.matches(&needle) {
            card.visibility = Visibility::Shown;
            shown += 1;
        } else {
            card.visibility = Visibility::Dimmed;
        }
    }

    debug!("Card filter left {shown} of {} cards shown", cards.len());
    shown
}

/// Harvest the card blocks from an overview page snapshot
pub fn collect_cards(html: &str) -> Vec<Card> {
    let document = Html::parse_document(html);
    let selector = match Selector::parse(CARD_SELECTOR) {
        Ok(selector) => selector,
        Err(_) => return Vec::new(),
    };

    document
        .select(&selector)
        .map(|element| {
            let visible_text = element.text().collect::<String>().trim().to_string();
            let searchable_text = element
                .value()
                .attr(SEARCHABLE_ATTR)
                .map(|attr| attr.to_string());
            Card::new(visible_text, searchable_text)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cards() -> Vec<Card> {
        vec![
            Card::new(
                "ChromeDriver クラス",
                Some("chrome ブラウザ 自動化".to_string()),
            ),
            Card::new("EdgeDriver クラス", None),
            Card::new("共通エラー処理", None),
        ]
    }

    #[test]
    fn blank_query_shows_every_card() {
        let mut cards = cards();
        apply(&mut cards, "edge");
        let shown = apply(&mut cards, "");
        assert_eq!(shown, cards.len());
        assert!(cards.iter().all(|c| c.visibility == Visibility::Shown));
    }

    #[test]
    fn attribute_keywords_participate_in_matching() {
        let mut cards = cards();
        let shown = apply(&mut cards, "ブラウザ");
        assert_eq!(shown, 1);
        assert_eq!(cards[0].visibility, Visibility::Shown);
        assert_eq!(cards[1].visibility, Visibility::Dimmed);
    }

    #[test]
    fn matching_is_case_insensitive() {
        let mut cards = cards();
        assert_eq!(apply(&mut cards, "EDGEDRIVER"), 1);
    }

    #[test]
    fn reapplying_the_same_query_is_idempotent() {
        let mut cards = cards();
        let first = apply(&mut cards, "エラー");
        let snapshot: Vec<Visibility> = cards.iter().map(|c| c.visibility).collect();
        let second = apply(&mut cards, "エラー");
        assert_eq!(first, second);
        assert_eq!(
            snapshot,
            cards.iter().map(|c| c.visibility).collect::<Vec<_>>()
        );
    }

    #[test]
    fn unmatched_query_dims_everything() {
        let mut cards = cards();
        assert_eq!(apply(&mut cards, "firefox"), 0);
        assert!(cards.iter().all(|c| c.visibility == Visibility::Dimmed));
    }

    #[test]
    fn collects_cards_with_searchable_attribute() {
        let html = r#"
            <html><body>
                <div class="class-card" data-searchable="chrome selenium">
                    <h3>ChromeDriver</h3><p>Chrome 自動操作</p>
                </div>
                <div class="note-card"><p>補足メモ</p></div>
                <div class="other"><p>無関係</p></div>
            </body></html>
        "#;
        let cards = collect_cards(html);
        assert_eq!(cards.len(), 2);
        assert_eq!(cards[0].searchable_text.as_deref(), Some("chrome selenium"));
        assert!(cards[0].visible_text.contains("ChromeDriver"));
        assert!(cards[1].searchable_text.is_none());
    }
}
