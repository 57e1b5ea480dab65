//! HTTP boundary
//!
//! The core only ever issues GET requests through [`Transport`]. The default
//! implementation uses a blocking `ureq` agent built per call so that each
//! request's timeout and proxy are honored.

use std::time::Duration;

use crate::config::RequestOptions;
use crate::error::{Error, Result};

/// A GET request as the core describes it.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub options: RequestOptions,
}

impl HttpRequest {
    pub fn new(url: impl Into<String>, options: &RequestOptions) -> Self {
        Self {
            url: url.into(),
            headers: vec![],
            options: options.clone(),
        }
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }
}

#[derive(Debug, Clone, Default)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

/// Issues one HTTP GET and returns the whole body.
///
/// Implementations must map non-2xx responses to [`Error::Status`].
pub trait Transport {
    fn get(&self, request: &HttpRequest) -> Result<HttpResponse>;
}

/// Blocking transport backed by `ureq`.
#[derive(Debug, Clone)]
pub struct UreqTransport {
    user_agent: String,
}

impl UreqTransport {
    pub fn new(user_agent: impl Into<String>) -> Self {
        Self {
            user_agent: user_agent.into(),
        }
    }

    fn agent(&self, options: &RequestOptions) -> Result<ureq::Agent> {
        let proxy = match options.proxy.as_deref() {
            Some(uri) => Some(ureq::Proxy::new(uri).map_err(|e| {
                Error::invalid(format!("bad proxy '{}': {}", uri, e))
            })?),
            None => None,
        };

        let config = ureq::Agent::config_builder()
            .timeout_global(options.timeout_secs.map(Duration::from_secs))
            .user_agent(self.user_agent.as_str())
            .proxy(proxy)
            .http_status_as_error(false)
            .build();

        Ok(ureq::Agent::new_with_config(config))
    }
}

impl Transport for UreqTransport {
    fn get(&self, request: &HttpRequest) -> Result<HttpResponse> {
        let agent = self.agent(&request.options)?;
        let transport_err = |e: ureq::Error| Error::Transport {
            url: request.url.clone(),
            message: e.to_string(),
        };

        let mut builder = agent.get(request.url.as_str());
        for (name, value) in request.headers.iter().chain(&request.options.headers) {
            builder = builder.header(name.as_str(), value.as_str());
        }

        let resp = builder.call().map_err(transport_err)?;
        let status = resp.status().as_u16();
        if !resp.status().is_success() {
            return Err(Error::Status {
                status,
                url: request.url.clone(),
            });
        }

        let body = resp.into_body().read_to_string().map_err(transport_err)?;

        Ok(HttpResponse { status, body })
    }
}

/// In-memory transport for tests: serves canned bodies by URL prefix and
/// records every request it sees.
#[cfg(test)]
pub(crate) mod fake {
    use std::sync::Mutex;

    use super::*;

    #[derive(Default)]
    pub(crate) struct FakeTransport {
        routes: Vec<(String, std::result::Result<String, u16>)>,
        calls: Mutex<Vec<HttpRequest>>,
    }

    impl FakeTransport {
        pub(crate) fn new() -> Self {
            Self::default()
        }

        /// First registered prefix that matches wins.
        pub(crate) fn route(mut self, prefix: &str, body: &str) -> Self {
            self.routes.push((prefix.to_string(), Ok(body.to_string())));
            self
        }

        pub(crate) fn fail(mut self, prefix: &str, status: u16) -> Self {
            self.routes.push((prefix.to_string(), Err(status)));
            self
        }

        pub(crate) fn calls(&self) -> Vec<HttpRequest> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl Transport for FakeTransport {
        fn get(&self, request: &HttpRequest) -> Result<HttpResponse> {
            self.calls.lock().unwrap().push(request.clone());

            let route = self
                .routes
                .iter()
                .find(|(prefix, _)| request.url.starts_with(prefix.as_str()));

            match route {
                Some((_, Ok(body))) => Ok(HttpResponse {
                    status: 200,
                    body: body.clone(),
                }),
                Some((_, Err(status))) => Err(Error::Status {
                    status: *status,
                    url: request.url.clone(),
                }),
                None => Err(Error::Transport {
                    url: request.url.clone(),
                    message: "connection refused".to_string(),
                }),
            }
        }
    }
}
