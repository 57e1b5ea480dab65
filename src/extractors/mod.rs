//! HTML extraction modules
//!
//! Each module extracts one semantic target from a scraped page. Which CSS
//! selectors they use is decided by a [`MarkupStrategy`], keyed by
//! [`MarkupVersion`]: when the store changes its markup, add a strategy with
//! a new selector table instead of editing the extraction logic.

mod privacy_extractor;
mod ratings_extractor;
mod screenshot_extractor;
mod version_extractor;

pub use privacy_extractor::*;
pub use ratings_extractor::*;
pub use screenshot_extractor::*;
pub use version_extractor::*;

use scraper::{ElementRef, Html, Selector};
use serde::{Deserialize, Serialize};

use crate::models::{PrivacyDetails, Ratings, Screenshots, VersionEntry};

/// Markup generation of the scraped pages.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MarkupVersion {
    /// Current app pages (dialog-based version history, testid attributes)
    #[default]
    Current,
    /// Pre-redesign pages built from `we-*` components
    Legacy,
}

/// Selector table for one markup generation.
#[derive(Debug)]
pub struct MarkupSelectors {
    pub rating_total: &'static str,
    pub rating_per_star: &'static str,

    pub screenshots_handheld: &'static str,
    pub screenshots_tablet: &'static str,
    pub screenshots_living_room: &'static str,
    /// One image slot inside a device container
    pub image_slot: &'static str,
    /// Elements inside a slot carrying `srcset`
    pub image_candidates: &'static str,

    /// Version blocks, already scoped to the dialog region
    pub version_item: &'static str,
    pub version_label: &'static str,
    pub version_date: &'static str,
    pub version_notes: &'static str,

    pub policy_link: &'static str,
    pub privacy_section: &'static str,
    pub privacy_purpose: &'static str,
    pub privacy_category: &'static str,
    pub privacy_category_name: &'static str,
    pub privacy_data_type: &'static str,
}

pub static CURRENT_SELECTORS: MarkupSelectors = MarkupSelectors {
    rating_total: ".rating-count",
    rating_per_star: ".vote .total",

    screenshots_handheld: "#product_media_phone_",
    screenshots_tablet: "#product_media_pad_",
    screenshots_living_room: "#product_media_appletv_",
    image_slot: "picture",
    image_candidates: "source[srcset], img[srcset]",

    version_item: "dialog article",
    version_label: "h4",
    version_date: "time",
    version_notes: "[data-testid=\"truncate-text\"]",

    policy_link: "a[data-test-id=\"external-link\"][aria-label]",
    privacy_section: "section.purpose-section",
    privacy_purpose: "h3",
    privacy_category: "li.purpose-category",
    privacy_category_name: ".category-title",
    privacy_data_type: "li.privacy-data-type",
};

pub static LEGACY_SELECTORS: MarkupSelectors = MarkupSelectors {
    rating_total: ".rating-count",
    rating_per_star: ".vote .total",

    screenshots_handheld: ".we-screenshot-viewer__screenshots-list--iphone",
    screenshots_tablet: ".we-screenshot-viewer__screenshots-list--ipad",
    screenshots_living_room: ".we-screenshot-viewer__screenshots-list--appletv",
    image_slot: "picture.we-artwork",
    image_candidates: "source[srcset]",

    version_item: ".we-modal__content .version-history__item",
    version_label: ".version-history__item__version-number",
    version_date: "time",
    version_notes: ".version-history__item__release-notes",

    policy_link: "a.link.icon--external[aria-label]",
    privacy_section: ".app-privacy__modal-section",
    privacy_purpose: ".privacy-type__heading",
    privacy_category: ".privacy-type__grid",
    privacy_category_name: ".privacy-type__grid-content h3",
    privacy_data_type: ".privacy-type__data-category-list li",
};

/// Extraction behavior for one markup generation.
///
/// The provided methods run the shared extraction logic over
/// [`selectors`](MarkupStrategy::selectors); a strategy only overrides one
/// when its markup needs different logic, not just different selectors.
pub trait MarkupStrategy: Sync {
    fn version(&self) -> MarkupVersion;

    fn selectors(&self) -> &MarkupSelectors;

    fn ratings(&self, document: &Html) -> Ratings {
        ratings_from_document(document, self.selectors())
    }

    fn screenshots(&self, document: &Html) -> Screenshots {
        screenshots_from_document(document, self.selectors())
    }

    fn version_history(&self, document: &Html) -> Vec<VersionEntry> {
        versions_from_document(document, self.selectors())
    }

    fn privacy(&self, document: &Html) -> PrivacyDetails {
        privacy_from_document(document, self.selectors())
    }
}

struct CurrentMarkup;
struct LegacyMarkup;

impl MarkupStrategy for CurrentMarkup {
    fn version(&self) -> MarkupVersion {
        MarkupVersion::Current
    }

    fn selectors(&self) -> &MarkupSelectors {
        &CURRENT_SELECTORS
    }
}

impl MarkupStrategy for LegacyMarkup {
    fn version(&self) -> MarkupVersion {
        MarkupVersion::Legacy
    }

    fn selectors(&self) -> &MarkupSelectors {
        &LEGACY_SELECTORS
    }
}

pub fn strategy_for(version: MarkupVersion) -> &'static dyn MarkupStrategy {
    match version {
        MarkupVersion::Current => &CurrentMarkup,
        MarkupVersion::Legacy => &LegacyMarkup,
    }
}

/// Parse a static selector; a bad one matches nothing.
pub(crate) fn selector(s: &str) -> Option<Selector> {
    Selector::parse(s).ok()
}

pub(crate) fn element_text(el: &ElementRef) -> String {
    el.text().collect::<String>().trim().to_string()
}

/// Text of the first element under `scope` matching `sel`.
pub(crate) fn first_text(scope: &ElementRef, sel: &str) -> Option<String> {
    let sel = selector(sel)?;
    scope.select(&sel).next().map(|el| element_text(&el))
}
