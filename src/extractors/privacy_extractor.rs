//! App privacy extraction
//!
//! Neither field of [`PrivacyDetails`] is ever set to an empty value: no
//! match means the field is left out.

use scraper::{ElementRef, Html};

use super::{element_text, first_text, selector, strategy_for, MarkupSelectors, MarkupVersion};
use crate::models::{PrivacyDetails, PrivacyType};

const POLICY_LABEL: &str = "Privacy Policy";

pub fn extract_privacy(html: &str, version: MarkupVersion) -> PrivacyDetails {
    let document = Html::parse_document(html);
    strategy_for(version).privacy(&document)
}

pub(crate) fn privacy_from_document(
    document: &Html,
    selectors: &MarkupSelectors,
) -> PrivacyDetails {
    let privacy_types = privacy_types(document, selectors);

    PrivacyDetails {
        privacy_policy_url: policy_url(document, selectors),
        privacy_types: (!privacy_types.is_empty()).then_some(privacy_types),
    }
}

/// href of the first link labelled as the privacy policy.
fn policy_url(document: &Html, selectors: &MarkupSelectors) -> Option<String> {
    let sel = selector(selectors.policy_link)?;

    let link = document.select(&sel).find(|el| {
        el.value()
            .attr("aria-label")
            .is_some_and(|label| label.contains(POLICY_LABEL))
    })?;

    link.value()
        .attr("href")
        .map(str::trim)
        .filter(|href| !href.is_empty())
        .map(String::from)
}

fn privacy_types(document: &Html, selectors: &MarkupSelectors) -> Vec<PrivacyType> {
    let (Some(section), Some(category)) = (
        selector(selectors.privacy_section),
        selector(selectors.privacy_category),
    ) else {
        return vec![];
    };

    let mut types = Vec::new();
    for section_el in document.select(&section) {
        // A section without a purpose heading cannot be attributed.
        let Some(purpose) = first_text(&section_el, selectors.privacy_purpose) else {
            continue;
        };

        for category_el in section_el.select(&category) {
            if let Some(privacy_type) = category_type(&category_el, &purpose, selectors) {
                types.push(privacy_type);
            }
        }
    }
    types
}

/// `None` for category items without a name or without any data type.
fn category_type(
    category_el: &ElementRef,
    purpose: &str,
    selectors: &MarkupSelectors,
) -> Option<PrivacyType> {
    let data_category = first_text(category_el, selectors.privacy_category_name)?;

    let data_type = selector(selectors.privacy_data_type)?;
    let data_types: Vec<String> = category_el
        .select(&data_type)
        .map(|el| element_text(&el))
        .filter(|t| !t.is_empty())
        .collect();

    if data_types.is_empty() {
        return None;
    }

    Some(PrivacyType {
        purpose: purpose.to_string(),
        data_category,
        data_types,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const PRIVACY_PAGE: &str = r#"
    <html>
    <body>
        <a data-test-id="external-link" aria-label="Developer Website" href="https://example.com">Site</a>
        <a data-test-id="external-link" aria-label="Privacy Policy (opens in a new window)" href="https://example.com/privacy">Policy</a>
        <a data-test-id="external-link" aria-label="Privacy Policy" href="https://example.com/second">Again</a>

        <section class="purpose-section">
            <h3>Data Used to Track You</h3>
            <ul>
                <li class="purpose-category">
                    <span class="category-title">Identifiers</span>
                    <ul><li class="privacy-data-type">Device ID</li></ul>
                </li>
            </ul>
        </section>
        <section class="purpose-section">
            <h3>Data Linked to You</h3>
            <ul>
                <li class="purpose-category">
                    <span class="category-title">Contact Info</span>
                    <ul>
                        <li class="privacy-data-type">Email Address</li>
                        <li class="privacy-data-type">Name</li>
                    </ul>
                </li>
                <li class="purpose-category">
                    <span class="category-title">Usage Data</span>
                </li>
            </ul>
        </section>
        <section class="purpose-section">
            <h3>Data Not Collected</h3>
        </section>
    </body>
    </html>
    "#;

    #[test]
    fn test_extract_privacy() {
        let details = extract_privacy(PRIVACY_PAGE, MarkupVersion::Current);

        assert_eq!(details.privacy_policy_url.as_deref(), Some("https://example.com/privacy"));

        let types = details.privacy_types.unwrap();
        assert_eq!(types.len(), 2);
        assert_eq!(types[0].purpose, "Data Used to Track You");
        assert_eq!(types[0].data_category, "Identifiers");
        assert_eq!(types[0].data_types, vec!["Device ID"]);
        assert_eq!(types[1].purpose, "Data Linked to You");
        assert_eq!(types[1].data_types, vec!["Email Address", "Name"]);
    }

    #[test]
    fn test_nothing_found_omits_both_fields() {
        let html = r#"<a data-test-id="external-link" aria-label="Support" href="https://example.com">x</a>
            <section class="purpose-section"><h3>Data Not Collected</h3></section>"#;
        let details = extract_privacy(html, MarkupVersion::Current);

        assert_eq!(details, PrivacyDetails::default());
        assert_eq!(serde_json::to_string(&details).unwrap(), "{}");
    }

    #[test]
    fn test_empty_policy_href_is_absent() {
        let html = r#"<a data-test-id="external-link" aria-label="Privacy Policy" href=" ">x</a>"#;
        assert!(extract_privacy(html, MarkupVersion::Current).privacy_policy_url.is_none());
    }

    #[test]
    fn test_legacy_markup() {
        let html = r#"
        <a class="link icon--external" aria-label="Privacy Policy" href="https://legacy.example.com/p">Privacy Policy</a>
        <div class="app-privacy__modal-section">
            <h2 class="privacy-type__heading">Data Not Linked to You</h2>
            <div class="privacy-type__grid">
                <div class="privacy-type__grid-content">
                    <h3>Diagnostics</h3>
                    <ul class="privacy-type__data-category-list"><li>Crash Data</li></ul>
                </div>
            </div>
        </div>
        "#;

        let details = extract_privacy(html, MarkupVersion::Legacy);
        assert_eq!(details.privacy_policy_url.as_deref(), Some("https://legacy.example.com/p"));
        let types = details.privacy_types.unwrap();
        assert_eq!(types[0].data_category, "Diagnostics");
        assert_eq!(types[0].data_types, vec!["Crash Data"]);
    }
}
