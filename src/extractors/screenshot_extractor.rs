//! Screenshot URL extraction
//!
//! App pages render each screenshot as a `<picture>` with several
//! responsive-image candidates. For every slot the widest candidate wins and
//! its size token is rewritten to one canonical rendition, which also makes
//! the different renditions of one image collapse into a single URL.

use regex::Regex;
use scraper::{ElementRef, Html};

use super::{selector, strategy_for, MarkupSelectors, MarkupVersion};
use crate::models::Screenshots;

/// Size/format suffix every screenshot URL is rewritten to.
pub const CANONICAL_SIZE_TOKEN: &str = "392x696bb.png";

/// One `url width` pair from a `srcset` attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SrcsetCandidate {
    pub url: String,
    /// Width descriptor in pixels, 0 when the candidate has none
    pub width: u32,
}

/// Extract screenshot URLs for the three device classes from an app page.
pub fn extract_screenshots(html: &str, version: MarkupVersion) -> Screenshots {
    let document = Html::parse_document(html);
    strategy_for(version).screenshots(&document)
}

pub(crate) fn screenshots_from_document(
    document: &Html,
    selectors: &MarkupSelectors,
) -> Screenshots {
    let size_token = Regex::new(r"/\d+x\d+[a-z]*\.(?:webp|jpe?g|png)$").ok();

    let device = |container: &str| -> Vec<String> {
        device_screenshots(document, container, selectors, size_token.as_ref())
    };

    Screenshots {
        handheld: device(selectors.screenshots_handheld),
        tablet: device(selectors.screenshots_tablet),
        living_room: device(selectors.screenshots_living_room),
    }
}

fn device_screenshots(
    document: &Html,
    container: &str,
    selectors: &MarkupSelectors,
    size_token: Option<&Regex>,
) -> Vec<String> {
    let (Some(container), Some(slot)) = (selector(container), selector(selectors.image_slot))
    else {
        return vec![];
    };

    let mut urls: Vec<String> = Vec::new();
    for container_el in document.select(&container) {
        for slot_el in container_el.select(&slot) {
            let Some(best) = best_candidate(&slot_el, selectors) else {
                continue;
            };
            let url = normalize_size(&best.url, size_token);
            if !urls.contains(&url) {
                urls.push(url);
            }
        }
    }
    urls
}

/// Widest candidate in one image slot; on ties the first one seen wins.
fn best_candidate(slot: &ElementRef, selectors: &MarkupSelectors) -> Option<SrcsetCandidate> {
    let mut candidates: Vec<SrcsetCandidate> = Vec::new();

    if let Some(sel) = selector(selectors.image_candidates) {
        for el in slot.select(&sel) {
            if let Some(srcset) = el.value().attr("srcset") {
                candidates.extend(parse_srcset(srcset));
            }
        }
    }

    if candidates.is_empty() {
        let img = selector("img[src]")?;
        let src = slot.select(&img).next()?.value().attr("src")?.trim();
        if !src.is_empty() {
            candidates.push(SrcsetCandidate {
                url: src.to_string(),
                width: 0,
            });
        }
    }

    candidates
        .into_iter()
        .fold(None, |best: Option<SrcsetCandidate>, c| match best {
            Some(b) if b.width >= c.width => Some(b),
            _ => Some(c),
        })
}

/// Parse a `srcset` attribute into its candidates.
///
/// Candidates without a `w` descriptor get width 0; empty entries are skipped.
pub fn parse_srcset(srcset: &str) -> Vec<SrcsetCandidate> {
    srcset
        .split(',')
        .filter_map(|candidate| {
            let mut parts = candidate.split_whitespace();
            let url = parts.next()?;
            let width = parts
                .next()
                .and_then(|d| d.strip_suffix('w'))
                .and_then(|w| w.parse().ok())
                .unwrap_or(0);
            Some(SrcsetCandidate {
                url: url.to_string(),
                width,
            })
        })
        .collect()
}

/// Replace the trailing `/<w>x<h><crop>.<ext>` token with the canonical one.
/// URLs without a size token are returned unchanged.
fn normalize_size(url: &str, size_token: Option<&Regex>) -> String {
    match size_token {
        Some(re) => re
            .replace(url, format!("/{}", CANONICAL_SIZE_TOKEN).as_str())
            .into_owned(),
        None => url.to_string(),
    }
}
