//! Fragment collection from rendered page HTML

use scraper::{Html, Selector};
use tracing::debug;

use super::{Fragment, MIN_FRAGMENT_CHARS, SourceKind};

/// CSS selector matching every text-bearing element of interest
const SEARCHABLE_SELECTOR: &str = "h1, h2, h3, h4, p, li, code, pre";

/// Collect the searchable fragments of a page in document order
///
/// Each matched element gets an ordinal for its position in the selection;
/// elements whose trimmed text is too short are skipped but still consume
/// their ordinal, so surviving fragments keep their document positions.
pub fn collect_fragments(html: &str) -> Vec<Fragment> {
    let document = Html::parse_document(html);

    // The selector is a compile-time constant; parsing it cannot fail.
    let selector = match Selector::parse(SEARCHABLE_SELECTOR) {
        Ok(selector) => selector,
        Err(_) => return Vec::new(),
    };

    let mut fragments = Vec::new();
    for (ordinal, element) in document.select(&selector).enumerate() {
        let Some(kind) = SourceKind::from_tag(element.value().name()) else {
            continue;
        };

        let original_text = element.text().collect::<String>().trim().to_string();
        if original_text.chars().count() <= MIN_FRAGMENT_CHARS {
            continue;
        }

        fragments.push(Fragment {
            text: original_text.to_lowercase(),
            original_text,
            kind,
            ordinal,
        });
    }

    debug!("Collected {} fragments from page", fragments.len());
    fragments
}
