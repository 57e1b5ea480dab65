//! Version history extraction
//!
//! Entries are returned in page order, most recent first.

use scraper::Html;

use super::{first_text, selector, strategy_for, MarkupSelectors, MarkupVersion};
use crate::models::VersionEntry;

pub fn extract_version_history(html: &str, version: MarkupVersion) -> Vec<VersionEntry> {
    let document = Html::parse_document(html);
    strategy_for(version).version_history(&document)
}

pub(crate) fn versions_from_document(
    document: &Html,
    selectors: &MarkupSelectors,
) -> Vec<VersionEntry> {
    let Some(item) = selector(selectors.version_item) else {
        return vec![];
    };
    let date = selector(selectors.version_date);

    document
        .select(&item)
        .map(|article| {
            let release_date = date
                .as_ref()
                .and_then(|sel| article.select(sel).next())
                .and_then(|el| el.value().attr("datetime"))
                .unwrap_or_default()
                .to_string();

            VersionEntry {
                version_display: first_text(&article, selectors.version_label).unwrap_or_default(),
                release_date,
                release_notes: first_text(&article, selectors.version_notes),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_version_history() {
        let html = r#"
        <html>
        <body>
            <dialog data-testid="dialog">
                <article>
                    <h4>2.1.0</h4>
                    <time datetime="2024-05-01T00:00:00.000Z">May 1, 2024</time>
                    <div data-testid="truncate-text">
                        Bug fixes and
                        performance improvements.
                    </div>
                </article>
                <article>
                    <h4> 2.0.0 </h4>
                    <time>Jan 2024</time>
                </article>
            </dialog>
            <article><h4>not in the dialog</h4></article>
        </body>
        </html>
        "#;

        let history = extract_version_history(html, MarkupVersion::Current);

        assert_eq!(history.len(), 2);
        assert_eq!(history[0].version_display, "2.1.0");
        assert_eq!(history[0].release_date, "2024-05-01T00:00:00.000Z");
        assert!(history[0].release_notes.as_deref().unwrap().starts_with("Bug fixes and"));
        assert!(history[0].release_notes.as_deref().unwrap().ends_with("improvements."));

        assert_eq!(history[1].version_display, "2.0.0");
        assert_eq!(history[1].release_date, "");
        assert_eq!(history[1].release_notes, None);
    }

    #[test]
    fn test_missing_notes_are_omitted_when_serialized() {
        let html = r#"<dialog><article><h4>1.0</h4><time datetime="2023-01-01">x</time></article></dialog>"#;
        let history = extract_version_history(html, MarkupVersion::Current);

        let json = serde_json::to_value(&history).unwrap();
        assert_eq!(
            json,
            serde_json::json!([{"versionDisplay": "1.0", "releaseDate": "2023-01-01"}])
        );
    }

    #[test]
    fn test_no_dialog_yields_empty_history() {
        let html = "<article><h4>1.0</h4></article>";
        assert!(extract_version_history(html, MarkupVersion::Current).is_empty());
    }

    #[test]
    fn test_legacy_markup() {
        let html = r#"
        <div class="we-modal__content">
            <li class="version-history__item">
                <h4 class="version-history__item__version-number">5.4</h4>
                <time datetime="2022-03-04T00:00:00.000Z">Mar 4, 2022</time>
                <div class="version-history__item__release-notes"><p>New stickers</p></div>
            </li>
        </div>
        "#;

        let history = extract_version_history(html, MarkupVersion::Legacy);
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].version_display, "5.4");
        assert_eq!(history[0].release_notes.as_deref(), Some("New stickers"));
    }
}
