//! Records returned to callers
//!
//! Every record is built fresh per call and serialized with the camelCase
//! field names the catalog itself uses.

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

/// Canonical app record.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct App {
    /// Numeric track id
    pub id: Option<u64>,
    /// Bundle identifier
    pub app_id: Option<String>,
    pub title: Option<String>,
    pub url: Option<String>,
    pub description: Option<String>,
    pub icon: Option<String>,
    pub genres: Vec<String>,
    pub genre_ids: Vec<String>,
    pub primary_genre: Option<String>,
    pub primary_genre_id: Option<u64>,
    pub content_rating: Option<String>,
    pub languages: Vec<String>,
    pub size: Option<String>,
    pub required_os_version: Option<String>,
    pub released: Option<String>,
    pub updated: Option<String>,
    pub release_notes: Option<String>,
    pub version: Option<String>,
    pub price: f64,
    pub currency: Option<String>,
    pub free: bool,
    pub developer_id: Option<u64>,
    pub developer: Option<String>,
    pub developer_url: Option<String>,
    pub developer_website: Option<String>,
    /// Average rating from the catalog API
    pub score: Option<f64>,
    /// Rating count from the catalog API
    pub reviews: Option<u64>,
    pub current_version_score: Option<f64>,
    pub current_version_reviews: Option<u64>,
    pub screenshots: Vec<String>,
    pub ipad_screenshots: Vec<String>,
    pub appletv_screenshots: Vec<String>,
    pub supported_devices: Vec<String>,
    /// Total from the ratings page, only set by the ratings enrichment.
    /// Not reconciled with `reviews`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ratings: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub histogram: Option<Histogram>,
}

impl App {
    pub fn has_screenshots(&self) -> bool {
        !(self.screenshots.is_empty()
            && self.ipad_screenshots.is_empty()
            && self.appletv_screenshots.is_empty())
    }

    pub fn set_screenshots(&mut self, shots: Screenshots) {
        self.screenshots = shots.handheld;
        self.ipad_screenshots = shots.tablet;
        self.appletv_screenshots = shots.living_room;
    }
}

/// Per-star review counts. All five stars are always present.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Histogram {
    counts: [u64; 5],
}

impl Histogram {
    /// Build from counts listed five stars first, as rating pages show them.
    /// Missing trailing entries count as zero; extras are ignored.
    pub fn from_descending(counts: &[u64]) -> Self {
        let mut histogram = Histogram::default();
        for (i, count) in counts.iter().take(5).enumerate() {
            histogram.counts[4 - i] = *count;
        }
        histogram
    }

    /// Count for `star` (1..=5); `None` for any other value.
    pub fn get(&self, star: u8) -> Option<u64> {
        match star {
            1..=5 => Some(self.counts[star as usize - 1]),
            _ => None,
        }
    }

    /// `(star, count)` pairs from one to five stars.
    pub fn iter(&self) -> impl Iterator<Item = (u8, u64)> + '_ {
        self.counts
            .iter()
            .enumerate()
            .map(|(i, count)| (i as u8 + 1, *count))
    }

    pub fn sum(&self) -> u64 {
        self.counts.iter().sum()
    }
}

impl Serialize for Histogram {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(5))?;
        for (star, count) in self.iter() {
            map.serialize_entry(&star.to_string(), &count)?;
        }
        map.end()
    }
}

/// Result of the ratings operation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Ratings {
    pub ratings: u64,
    pub histogram: Histogram,
}

/// Screenshot URLs per device class.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Screenshots {
    pub handheld: Vec<String>,
    pub tablet: Vec<String>,
    pub living_room: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionEntry {
    pub version_display: String,
    /// ISO-8601 date, empty when the page carries none
    pub release_date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub release_notes: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PrivacyDetails {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub privacy_policy_url: Option<String>,
    /// Never `Some` of an empty list
    #[serde(skip_serializing_if = "Option::is_none")]
    pub privacy_types: Option<Vec<PrivacyType>>,
}

/// One data category declared under one purpose.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PrivacyType {
    pub purpose: String,
    pub data_category: String,
    pub data_types: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Suggestion {
    pub term: String,
}

/// One search page: full records, or bare ids in ids-only mode.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SearchResults {
    Apps(Vec<App>),
    Ids(Vec<u64>),
}

impl SearchResults {
    pub fn len(&self) -> usize {
        match self {
            SearchResults::Apps(apps) => apps.len(),
            SearchResults::Ids(ids) => ids.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub id: String,
    pub user_name: String,
    pub user_url: String,
    pub version: String,
    pub score: u8,
    pub title: String,
    pub text: String,
    pub updated: String,
}
