//! Catalog JSON entry to [`App`] mapping

use serde::Deserialize;
use serde_json::Value;

use crate::error::{Error, Result};
use crate::models::App;
use crate::validate::validate;

/// A catalog entry as the search and lookup endpoints send it.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawApp {
    pub kind: Option<String>,
    pub track_id: Option<u64>,
    pub bundle_id: Option<String>,
    pub track_name: Option<String>,
    pub track_view_url: Option<String>,
    pub description: Option<String>,
    pub artwork_url512: Option<String>,
    pub artwork_url100: Option<String>,
    pub artwork_url60: Option<String>,
    pub genres: Vec<String>,
    pub genre_ids: Vec<Value>,
    pub primary_genre_name: Option<String>,
    pub primary_genre_id: Option<u64>,
    pub content_advisory_rating: Option<String>,
    #[serde(rename = "languageCodesISO2A")]
    pub language_codes: Vec<String>,
    pub file_size_bytes: Option<Value>,
    pub minimum_os_version: Option<String>,
    pub release_date: Option<String>,
    pub current_version_release_date: Option<String>,
    pub release_notes: Option<String>,
    pub version: Option<String>,
    pub price: Option<f64>,
    pub currency: Option<String>,
    pub artist_id: Option<u64>,
    pub artist_name: Option<String>,
    pub artist_view_url: Option<String>,
    pub seller_url: Option<String>,
    pub average_user_rating: Option<f64>,
    pub user_rating_count: Option<u64>,
    pub average_user_rating_for_current_version: Option<f64>,
    pub user_rating_count_for_current_version: Option<u64>,
    pub screenshot_urls: Vec<String>,
    pub ipad_screenshot_urls: Vec<String>,
    pub appletv_screenshot_urls: Vec<String>,
    pub supported_devices: Vec<String>,
}

/// Only `kind == "software"` entries are apps; the endpoints mix in artists
/// and other media.
pub fn is_software(entry: &Value) -> bool {
    entry.get("kind").and_then(Value::as_str) == Some("software")
}

/// Validate one software entry. An entry must carry at least one of
/// `trackId` and `bundleId`.
pub fn validate_entry(entry: Value) -> Result<RawApp> {
    let raw: RawApp = validate(entry, "catalog app entry")?;
    if raw.track_id.is_none() && raw.bundle_id.is_none() {
        return Err(Error::validation(
            "catalog app entry has neither trackId nor bundleId",
        ));
    }
    Ok(raw)
}

fn scalar_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Total, pure mapping from a validated entry to the canonical record.
pub fn normalize(raw: RawApp) -> App {
    let price = raw.price.unwrap_or(0.0);

    App {
        id: raw.track_id,
        app_id: raw.bundle_id,
        title: raw.track_name,
        url: raw.track_view_url,
        description: raw.description,
        icon: raw.artwork_url512.or(raw.artwork_url100).or(raw.artwork_url60),
        genres: raw.genres,
        genre_ids: raw.genre_ids.iter().map(scalar_to_string).collect(),
        primary_genre: raw.primary_genre_name,
        primary_genre_id: raw.primary_genre_id,
        content_rating: raw.content_advisory_rating,
        languages: raw.language_codes,
        size: raw.file_size_bytes.as_ref().map(scalar_to_string),
        required_os_version: raw.minimum_os_version,
        updated: raw
            .current_version_release_date
            .or_else(|| raw.release_date.clone()),
        released: raw.release_date,
        release_notes: raw.release_notes,
        version: raw.version,
        price,
        currency: raw.currency,
        free: price == 0.0,
        developer_id: raw.artist_id,
        developer: raw.artist_name,
        developer_url: raw.artist_view_url,
        developer_website: raw.seller_url,
        score: raw.average_user_rating,
        reviews: raw.user_rating_count,
        current_version_score: raw.average_user_rating_for_current_version,
        current_version_reviews: raw.user_rating_count_for_current_version,
        screenshots: raw.screenshot_urls,
        ipad_screenshots: raw.ipad_screenshot_urls,
        appletv_screenshots: raw.appletv_screenshot_urls,
        supported_devices: raw.supported_devices,
        ratings: None,
        histogram: None,
    }
}

/// Filter `results` to software entries, then validate and normalize each.
pub fn normalize_results(results: Vec<Value>) -> Result<Vec<App>> {
    results
        .into_iter()
        .filter(is_software)
        .map(|entry| validate_entry(entry).map(normalize))
        .collect()
}
