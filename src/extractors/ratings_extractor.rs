//! Ratings histogram extraction
//!
//! The ratings page shows a total count and one bar per star, five stars
//! first.

use scraper::Html;

use super::{element_text, selector, strategy_for, MarkupSelectors, MarkupVersion};
use crate::models::{Histogram, Ratings};

/// Extract the rating total and histogram from a ratings page.
pub fn extract_ratings(html: &str, version: MarkupVersion) -> Ratings {
    let document = Html::parse_document(html);
    strategy_for(version).ratings(&document)
}

pub(crate) fn ratings_from_document(document: &Html, selectors: &MarkupSelectors) -> Ratings {
    let ratings = selector(selectors.rating_total)
        .and_then(|sel| document.select(&sel).next())
        .map(|el| parse_count(&element_text(&el)))
        .unwrap_or(0);

    let per_star: Vec<u64> = match selector(selectors.rating_per_star) {
        Some(sel) => document
            .select(&sel)
            .take(5)
            .map(|el| parse_count(&element_text(&el)))
            .collect(),
        None => vec![],
    };

    Ratings {
        ratings,
        histogram: Histogram::from_descending(&per_star),
    }
}

/// First number in `text`, ignoring thousands separators, so labels before
/// the count are skipped. An abbreviated count such as "1.2K" is expanded.
/// Text without any digit counts as zero.
pub fn parse_count(text: &str) -> u64 {
    let Some(start) = text.find(|c: char| c.is_ascii_digit()) else {
        return 0;
    };
    let rest = &text[start..];
    let run_len = rest
        .find(|c: char| !(c.is_ascii_digit() || is_separator(c)))
        .unwrap_or(rest.len());
    let run = &rest[..run_len];

    match abbreviation(&rest[run_len..]) {
        Some(multiplier) => expand(run, multiplier),
        None => run
            .chars()
            .filter(char::is_ascii_digit)
            .collect::<String>()
            .parse()
            .unwrap_or(0),
    }
}

fn is_separator(c: char) -> bool {
    matches!(c, ',' | '.' | ' ' | '\u{a0}' | '\u{202f}')
}

/// Multiplier for a standalone `K`/`M` suffix; "57 Kommentare" has none.
fn abbreviation(suffix: &str) -> Option<f64> {
    let mut chars = suffix.chars();
    let multiplier = match chars.next()? {
        'K' | 'k' => 1_000.0,
        'M' | 'm' => 1_000_000.0,
        _ => return None,
    };
    match chars.next() {
        Some(c) if c.is_alphabetic() => None,
        _ => Some(multiplier),
    }
}

/// `run` read as a decimal, with either `.` or `,` as the point.
fn expand(run: &str, multiplier: f64) -> u64 {
    let decimal: String = run
        .trim_end_matches(is_separator)
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '\u{202f}')
        .map(|c| if c == ',' { '.' } else { c })
        .collect();

    match decimal.parse::<f64>() {
        Ok(value) => (value * multiplier).round() as u64,
        Err(_) => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RATINGS_PAGE: &str = r#"
    <html>
    <body>
        <div class="rating-count">1,234 Ratings</div>
        <div class="vote"><span class="total">900</span></div>
        <div class="vote"><span class="total">200</span></div>
        <div class="vote"><span class="total">80</span></div>
        <div class="vote"><span class="total">30</span></div>
        <div class="vote"><span class="total">24</span></div>
    </body>
    </html>
    "#;

    #[test]
    fn test_extract_ratings() {
        let result = extract_ratings(RATINGS_PAGE, MarkupVersion::Current);

        assert_eq!(result.ratings, 1234);
        assert_eq!(result.histogram.get(5), Some(900));
        assert_eq!(result.histogram.get(4), Some(200));
        assert_eq!(result.histogram.get(1), Some(24));
        assert_eq!(result.histogram.sum(), 1234);
    }

    #[test]
    fn test_missing_markup_zero_fills() {
        let html = "<html><body><p>nothing</p></body></html>";
        let result = extract_ratings(html, MarkupVersion::Current);

        assert_eq!(result.ratings, 0);
        assert_eq!(result.histogram.iter().count(), 5);
        assert_eq!(result.histogram.sum(), 0);
    }

    #[test]
    fn test_unparseable_total_is_zero() {
        let html = r#"<div class="rating-count">No Ratings</div>
            <div class="vote"><span class="total">3</span></div>"#;
        let result = extract_ratings(html, MarkupVersion::Current);

        assert_eq!(result.ratings, 0);
        assert_eq!(result.histogram.get(5), Some(3));
        assert_eq!(result.histogram.get(4), Some(0));
    }

    #[test]
    fn test_parse_count() {
        assert_eq!(parse_count("12"), 12);
        assert_eq!(parse_count(" 1.234.567 Bewertungen"), 1234567);
        assert_eq!(parse_count("4\u{a0}321"), 4321);
        assert_eq!(parse_count("abc"), 0);
        assert_eq!(parse_count(""), 0);
    }

    #[test]
    fn test_parse_count_skips_leading_label() {
        assert_eq!(parse_count("Ratings: 57"), 57);
        assert_eq!(parse_count("Оценок: 1 234"), 1234);
        assert_eq!(parse_count("Note\u{202f}: 9\u{202f}876 avis"), 9876);
        assert_eq!(parse_count("57 Kommentare"), 57);
    }

    #[test]
    fn test_parse_count_abbreviated() {
        assert_eq!(parse_count("1.2K Ratings"), 1200);
        assert_eq!(parse_count("3,4 M"), 3_400_000);
        assert_eq!(parse_count("15k"), 15_000);
    }

    #[test]
    fn test_labelled_total_on_page() {
        let html = r#"<div class="rating-count">Оценок: 1 234</div>"#;
        assert_eq!(extract_ratings(html, MarkupVersion::Current).ratings, 1234);
    }
}
