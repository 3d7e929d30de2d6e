//! Sorting and filtering of documentation tables
//!
//! Detail pages carry method and error-code tables. Sorting compares a
//! column numerically when both cells parse as numbers and as strings
//! otherwise; filtering mirrors the card filter at row granularity, toggling
//! visibility without removing rows.

use std::cmp::Ordering;

use scraper::{Html, Selector};

/// Sort rows by a column, numeric-aware
///
/// When both cells parse as numbers the comparison is numeric, so an
/// error-code column orders 2 before 10. The sort is stable; rows with
/// missing cells sort as empty strings.
pub fn sort_rows(rows: &mut [Vec<String>], column: usize) {
    rows.sort_by(|a, b| {
        let left = a.get(column).map(String::as_str).unwrap_or_default();
        let right = b.get(column).map(String::as_str).unwrap_or_default();
        compare_cells(left, right)
    });
}

fn compare_cells(left: &str, right: &str) -> Ordering {
    let left = left.trim();
    let right = right.trim();

    if let (Ok(a), Ok(b)) = (left.parse::<f64>(), right.parse::<f64>()) {
        return a.partial_cmp(&b).unwrap_or(Ordering::Equal);
    }

    left.cmp(right)
}

/// Visibility of each row under a query
///
/// A row is visible when any of its cells contains the lowercased query; a
/// blank query shows every row. Rows are never removed, only hidden, so
/// re-filtering with another query needs no reset step.
pub fn filter_rows(rows: &[Vec<String>], query: &str) -> Vec<bool> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return vec![true; rows.len()];
    }

    rows.iter()
        .map(|row| {
            row.iter()
                .any(|cell| cell.to_lowercase().contains(needle.as_str()))
        })
        .collect()
}

/// Harvest the body rows of every table on a page
pub fn collect_table_rows(html: &str) -> Vec<Vec<String>> {
    let document = Html::parse_document(html);
    let row_selector = match Selector::parse("table tbody tr") {
        Ok(selector) => selector,
        Err(_) => return Vec::new(),
    };
    let cell_selector = match Selector::parse("td") {
        Ok(selector) => selector,
        Err(_) => return Vec::new(),
    };

    document
        .select(&row_selector)
        .map(|row| {
            row.select(&cell_selector)
                .map(|cell| cell.text().collect::<String>().trim().to_string())
                .collect()
        })
        .collect()
}
