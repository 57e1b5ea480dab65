//! Catalog operations
//!
//! Every operation is a short, strictly sequential chain of blocking
//! requests. Nothing is cached between calls; the client only holds its
//! configuration and transport.

use scraper::Html;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;
use url::Url;

use crate::config::{ClientConfig, RequestOptions};
use crate::error::{Error, Result};
use crate::extractors::{strategy_for, MarkupStrategy};
use crate::models::{
    App, PrivacyDetails, Ratings, Review, SearchResults, Suggestion, VersionEntry,
};
use crate::normalize::{is_software, normalize, normalize_results, validate_entry};
use crate::paginate::{Page, DEFAULT_PAGE_SIZE};
use crate::reviews::{parse_reviews, ReviewSort, MAX_REVIEW_PAGE};
use crate::storefront::storefront;
use crate::suggest::parse_suggestions;
use crate::transport::{HttpRequest, Transport, UreqTransport};
use crate::validate::{parse_json, validate, CatalogResponse};

/// Input of [`AppStore::app`]. One of `id` and `app_id` is required; `id`
/// wins when both are set.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AppRequest {
    pub id: Option<u64>,
    pub app_id: Option<String>,
    pub country: Option<String>,
    pub lang: Option<String>,
    /// Also fetch the ratings page for a histogram
    pub ratings: bool,
    pub options: RequestOptions,
}

impl AppRequest {
    pub fn by_id(id: u64) -> Self {
        Self {
            id: Some(id),
            ..Default::default()
        }
    }

    pub fn by_bundle_id(app_id: impl Into<String>) -> Self {
        Self {
            app_id: Some(app_id.into()),
            ..Default::default()
        }
    }

    pub fn with_ratings(mut self) -> Self {
        self.ratings = true;
        self
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SearchRequest {
    pub term: String,
    /// Page size, 50 when unset
    pub num: Option<u32>,
    /// 1-indexed page, 1 when unset
    pub page: Option<u32>,
    pub country: Option<String>,
    pub lang: Option<String>,
    /// Return bare track ids instead of records
    pub ids_only: bool,
    pub options: RequestOptions,
}

impl SearchRequest {
    pub fn new(term: impl Into<String>) -> Self {
        Self {
            term: term.into(),
            ..Default::default()
        }
    }
}

/// Input of the operations that read one app's HTML pages: ratings,
/// version history and privacy.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AppPageRequest {
    pub id: Option<u64>,
    pub country: Option<String>,
    pub options: RequestOptions,
}

impl AppPageRequest {
    pub fn new(id: u64) -> Self {
        Self {
            id: Some(id),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SuggestRequest {
    pub term: String,
    pub options: RequestOptions,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DeveloperRequest {
    pub dev_id: Option<u64>,
    pub country: Option<String>,
    pub lang: Option<String>,
    pub options: RequestOptions,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ReviewsRequest {
    pub id: Option<u64>,
    pub country: Option<String>,
    /// 1..=10, 1 when unset
    pub page: Option<u32>,
    pub sort: ReviewSort,
    pub options: RequestOptions,
}

/// What the lookup endpoint is queried by.
#[derive(Debug, Clone, Copy)]
pub(crate) enum LookupKey<'a> {
    /// Track id, or an artist id when listing a developer's apps
    Id(u64),
    BundleId(&'a str),
}

/// App Store catalog client.
#[derive(Debug, Clone)]
pub struct AppStore<T = UreqTransport> {
    transport: T,
    config: ClientConfig,
}

impl AppStore<UreqTransport> {
    pub fn new() -> Self {
        Self::with_config(ClientConfig::default())
    }

    pub fn with_config(config: ClientConfig) -> Self {
        let transport = UreqTransport::new(config.user_agent.clone());
        Self { transport, config }
    }
}

impl Default for AppStore<UreqTransport> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Transport> AppStore<T> {
    pub fn with_transport(transport: T, config: ClientConfig) -> Self {
        Self { transport, config }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub(crate) fn strategy(&self) -> &'static dyn MarkupStrategy {
        strategy_for(self.config.markup)
    }

    /// Requested country, or the configured default. Must be a two-letter code.
    pub(crate) fn country(&self, requested: Option<&str>) -> Result<String> {
        let country = requested
            .unwrap_or(&self.config.default_country)
            .trim()
            .to_ascii_lowercase();
        if country.len() != 2 || !country.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(Error::invalid(format!("'{}' is not a country code", country)));
        }
        Ok(country)
    }

    pub(crate) fn fetch(&self, request: HttpRequest) -> Result<String> {
        debug!(url = %request.url, "GET");
        let response = self.transport.get(&request)?;
        debug!(status = response.status, bytes = response.body.len(), "response");
        Ok(response.body)
    }

    fn endpoint(&self, base: &str, params: &[(&str, &str)]) -> Result<String> {
        Url::parse_with_params(base, params)
            .map(String::from)
            .map_err(|e| Error::invalid(format!("bad endpoint '{}': {}", base, e)))
    }

    fn catalog(
        &self,
        url: String,
        options: &RequestOptions,
        what: &str,
    ) -> Result<CatalogResponse> {
        let body = self.fetch(HttpRequest::new(url, options))?;
        let response: CatalogResponse = validate(parse_json(&body, what)?, what)?;
        debug!(what, result_count = ?response.result_count, results = response.results.len());
        Ok(response)
    }

    /// Software entries the lookup endpoint returns for `key`.
    pub(crate) fn lookup(
        &self,
        key: LookupKey<'_>,
        country: &str,
        lang: Option<&str>,
        options: &RequestOptions,
    ) -> Result<Vec<App>> {
        let (key_name, key_value) = match key {
            LookupKey::Id(id) => ("id", id.to_string()),
            LookupKey::BundleId(bundle_id) => ("bundleId", bundle_id.to_string()),
        };
        let mut params = vec![
            (key_name, key_value.as_str()),
            ("country", country),
            ("entity", "software"),
        ];
        if let Some(lang) = lang {
            params.push(("lang", lang));
        }

        let url = self.endpoint(&self.config.endpoints.lookup, &params)?;
        let response = self.catalog(url, options, "lookup response")?;
        normalize_results(response.results)
    }

    /// Search the catalog, one page at a time.
    pub fn search(&self, req: &SearchRequest) -> Result<SearchResults> {
        let term = req.term.trim();
        if term.is_empty() {
            return Err(Error::invalid("term is required"));
        }
        let page = Page::new(req.num.unwrap_or(DEFAULT_PAGE_SIZE), req.page.unwrap_or(1))?;
        let country = self.country(req.country.as_deref())?;

        let limit = page.limit().to_string();
        let mut params = vec![
            ("term", term),
            ("country", country.as_str()),
            ("media", "software"),
            ("entity", "software"),
            ("limit", limit.as_str()),
        ];
        if let Some(lang) = req.lang.as_deref() {
            params.push(("lang", lang));
        }

        let url = self.endpoint(&self.config.endpoints.search, &params)?;
        let response = self.catalog(url, &req.options, "search response")?;

        let software: Vec<Value> = response.results.into_iter().filter(is_software).collect();
        let window = page.window(software);

        if req.ids_only {
            let ids = window
                .iter()
                .filter_map(|entry| entry.get("trackId").and_then(Value::as_u64))
                .collect();
            return Ok(SearchResults::Ids(ids));
        }

        let apps = window
            .into_iter()
            .map(|entry| validate_entry(entry).map(normalize))
            .collect::<Result<Vec<_>>>()?;
        Ok(SearchResults::Apps(apps))
    }

    /// Rating total and per-star histogram from the ratings page.
    pub fn ratings(&self, req: &AppPageRequest) -> Result<Ratings> {
        let id = req.id.ok_or_else(|| Error::invalid("id is required"))?;
        let country = self.country(req.country.as_deref())?;
        self.ratings_for(id, &country, &req.options)
    }

    pub(crate) fn ratings_for(
        &self,
        id: u64,
        country: &str,
        options: &RequestOptions,
    ) -> Result<Ratings> {
        let storefront = storefront(country)
            .ok_or_else(|| Error::invalid(format!("no storefront for country '{}'", country)))?;

        let url = format!(
            "{}/{}/customer-reviews/id{}?displayable-kind=11",
            self.config.endpoints.store, country, id
        );
        let request = HttpRequest::new(url, options)
            .header("X-Apple-Store-Front", format!("{},12", storefront));

        let body = self.fetch(request)?;
        if body.trim().is_empty() {
            return Err(Error::NotFound);
        }
        Ok(self.strategy().ratings(&self.parse_page(&body)))
    }

    fn parse_page(&self, body: &str) -> Html {
        debug!(markup = ?self.strategy().version(), "parsing page");
        Html::parse_document(body)
    }

    /// Fetch and parse the HTML app page.
    pub(crate) fn app_page(
        &self,
        id: u64,
        country: &str,
        options: &RequestOptions,
    ) -> Result<Html> {
        let url = format!("{}/{}/app/id{}", self.config.endpoints.app_page, country, id);
        let body = self.fetch(HttpRequest::new(url, options))?;
        Ok(self.parse_page(&body))
    }

    /// Version history as listed on the app page, most recent first.
    pub fn version_history(&self, req: &AppPageRequest) -> Result<Vec<VersionEntry>> {
        let id = req.id.ok_or_else(|| Error::invalid("id is required"))?;
        let country = self.country(req.country.as_deref())?;
        let document = self.app_page(id, &country, &req.options)?;
        Ok(self.strategy().version_history(&document))
    }

    /// Privacy policy link and declared data collection.
    pub fn privacy(&self, req: &AppPageRequest) -> Result<PrivacyDetails> {
        let id = req.id.ok_or_else(|| Error::invalid("id is required"))?;
        let country = self.country(req.country.as_deref())?;
        let document = self.app_page(id, &country, &req.options)?;
        Ok(self.strategy().privacy(&document))
    }

    /// Autocomplete terms for a partial search term.
    pub fn suggest(&self, req: &SuggestRequest) -> Result<Vec<Suggestion>> {
        let term = req.term.trim();
        if term.is_empty() {
            return Err(Error::invalid("term is required"));
        }

        let url = self.endpoint(
            &self.config.endpoints.suggest,
            &[("clientApplication", "Software"), ("term", term)],
        )?;
        let body = self.fetch(HttpRequest::new(url, &req.options))?;
        parse_suggestions(&body)
    }

    /// All apps published by one developer.
    pub fn developer(&self, req: &DeveloperRequest) -> Result<Vec<App>> {
        let dev_id = req.dev_id.ok_or_else(|| Error::invalid("devId is required"))?;
        let country = self.country(req.country.as_deref())?;

        let apps = self.lookup(LookupKey::Id(dev_id), &country, req.lang.as_deref(), &req.options)?;
        if apps.is_empty() {
            return Err(Error::NotFound);
        }
        Ok(apps)
    }

    /// One page of customer reviews.
    pub fn reviews(&self, req: &ReviewsRequest) -> Result<Vec<Review>> {
        let id = req.id.ok_or_else(|| Error::invalid("id is required"))?;
        let page = req.page.unwrap_or(1);
        if !(1..=MAX_REVIEW_PAGE).contains(&page) {
            return Err(Error::invalid(format!(
                "page must be between 1 and {}",
                MAX_REVIEW_PAGE
            )));
        }
        let country = self.country(req.country.as_deref())?;

        let url = format!(
            "{}/{}/rss/customerreviews/page={}/id={}/sortby={}/json",
            self.config.endpoints.store,
            country,
            page,
            id,
            req.sort.as_path()
        );
        let body = self.fetch(HttpRequest::new(url, &req.options))?;
        parse_reviews(&body)
    }
}

#[cfg(test)]
impl AppStore<crate::transport::fake::FakeTransport> {
    pub(crate) fn transport_calls(&self) -> Vec<HttpRequest> {
        self.transport.calls()
    }
}
