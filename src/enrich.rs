//! App details: primary lookup plus optional enrichments
//!
//! The lookup is authoritative and its failures are returned to the caller.
//! Enrichments run afterwards, in order, and each returns its own `Result`;
//! [`best_effort`] is the only place such a result is dropped.

use tracing::{debug, warn};

use crate::client::{AppRequest, AppStore, LookupKey};
use crate::config::RequestOptions;
use crate::error::{Error, Result};
use crate::models::{App, Screenshots};
use crate::transport::Transport;

/// Turn a failed enrichment into "no data".
fn best_effort<T>(step: &str, result: Result<T>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) => {
            debug!(step, error = %e, "enrichment skipped");
            None
        }
    }
}

impl<T: Transport> AppStore<T> {
    /// Full details for one app, looked up by track id or bundle id.
    ///
    /// When the catalog has no screenshots at all they are scraped from the
    /// app page instead. With `ratings` set the rating histogram is added when
    /// it can be fetched; failing to fetch it never fails the call.
    pub fn app(&self, req: &AppRequest) -> Result<App> {
        let key = match (req.id, req.app_id.as_deref().map(str::trim)) {
            (Some(id), _) => LookupKey::Id(id),
            (None, Some(app_id)) if !app_id.is_empty() => LookupKey::BundleId(app_id),
            _ => return Err(Error::invalid("either id or appId is required")),
        };
        let country = self.country(req.country.as_deref())?;

        let mut app = self
            .lookup(key, &country, req.lang.as_deref(), &req.options)?
            .into_iter()
            .next()
            .ok_or(Error::NotFound)?;

        if !app.has_screenshots() {
            let scraped = best_effort(
                "screenshots",
                self.scrape_screenshots(app.id, &country, &req.options),
            );
            if scraped.is_none() {
                warn!(id = ?app.id, "screenshot fallback failed, leaving screenshots empty");
            }
            app.set_screenshots(scraped.unwrap_or_default());
        }

        if req.ratings {
            let ratings = app
                .id
                .ok_or_else(|| Error::invalid("ratings need a track id"))
                .and_then(|id| self.ratings_for(id, &country, &req.options));
            if let Some(ratings) = best_effort("ratings", ratings) {
                app.ratings = Some(ratings.ratings);
                app.histogram = Some(ratings.histogram);
            }
        }

        Ok(app)
    }

    fn scrape_screenshots(
        &self,
        id: Option<u64>,
        country: &str,
        options: &RequestOptions,
    ) -> Result<Screenshots> {
        let id = id.ok_or_else(|| Error::invalid("screenshot fallback needs a track id"))?;
        let document = self.app_page(id, country, options)?;
        Ok(self.strategy().screenshots(&document))
    }
}
