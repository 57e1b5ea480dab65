//! Customer reviews RSS feed (JSON flavour)

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::models::Review;
use crate::validate::{parse_json, validate, OneOrMany};

/// The feed only serves this many pages.
pub const MAX_REVIEW_PAGE: u32 = 10;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ReviewSort {
    #[default]
    Recent,
    Helpful,
}

impl ReviewSort {
    /// Path segment the feed expects.
    pub fn as_path(&self) -> &'static str {
        match self {
            ReviewSort::Recent => "mostrecent",
            ReviewSort::Helpful => "mosthelpful",
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct Label {
    #[serde(default)]
    label: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Author {
    name: Label,
    uri: Label,
}

#[derive(Debug, Deserialize)]
struct FeedEntry {
    id: Label,
    #[serde(default)]
    author: Author,
    #[serde(rename = "im:version", default)]
    version: Label,
    #[serde(rename = "im:rating", default)]
    rating: Label,
    #[serde(default)]
    title: Label,
    #[serde(default)]
    content: Label,
    #[serde(default)]
    updated: Label,
}

#[derive(Debug, Deserialize)]
struct Feed {
    #[serde(default)]
    entry: OneOrMany<FeedEntry>,
}

#[derive(Debug, Deserialize)]
struct FeedResponse {
    feed: Feed,
}

impl From<FeedEntry> for Review {
    fn from(entry: FeedEntry) -> Self {
        Review {
            id: entry.id.label,
            user_name: entry.author.name.label,
            user_url: entry.author.uri.label,
            version: entry.version.label,
            score: entry.rating.label.trim().parse().unwrap_or(0),
            title: entry.title.label,
            text: entry.content.label,
            updated: entry.updated.label,
        }
    }
}

/// Parse a reviews feed body. A feed without entries has no reviews.
pub fn parse_reviews(body: &str) -> Result<Vec<Review>> {
    let response: FeedResponse = validate(parse_json(body, "reviews feed")?, "reviews feed")?;
    Ok(response
        .feed
        .entry
        .into_vec()
        .into_iter()
        .map(Review::from)
        .collect())
}
