//! HTTP fetching that never fails loudly.
//!
//! Upstream sites time out, redirect in loops and answer with error pages.
//! None of that may abort an aggregation run, so the [`Fetch`] trait reports
//! every failure as `None` and leaves logging to the fetch site.
//!
//! # Architecture
//!
//! - [`Fetch`]: The seam the pipeline talks to
//! - [`HttpFetcher`]: `reqwest` implementation with timeout, user agent and a
//!   three-hop redirect limit
//! - `MockFetcher` (tests only): canned bodies keyed by URL

use reqwest::{Client, redirect};
use std::error::Error;
use std::time::{Duration, Instant};
use tracing::{debug, instrument, warn};

/// Browser-like user agent; several sources serve bots a stripped page.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// Redirect hops followed before giving up.
pub const MAX_REDIRECTS: usize = 3;

/// Retrieve a page body.
///
/// Implementors must not panic or return errors: transport failures are
/// `None`, and a non-2xx response still yields whatever body came back.
pub trait Fetch {
    /// Fetch `url` and return its body, or `None` on transport failure.
    async fn fetch(&self, url: &str) -> Option<String>;
}

/// [`Fetch`] implementation backed by a shared `reqwest` client.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Build a fetcher with the given per-request timeout and user agent.
    ///
    /// # Errors
    ///
    /// Returns an error if the TLS backend cannot be initialised.
    pub fn new(timeout: Duration, user_agent: &str) -> Result<Self, Box<dyn Error>> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .redirect(redirect::Policy::limited(MAX_REDIRECTS))
            .build()?;
        Ok(Self { client })
    }
}

impl Fetch for HttpFetcher {
    #[instrument(level = "debug", skip(self))]
    async fn fetch(&self, url: &str) -> Option<String> {
        let t0 = Instant::now();
        let response = match self.client.get(url).send().await {
            Ok(response) => response,
            Err(e) => {
                warn!(%url, elapsed_ms = t0.elapsed().as_millis() as u64, error = %e, "Fetch failed");
                return None;
            }
        };

        let status = response.status();
        if !status.is_success() {
            debug!(%url, %status, "Non-success status; using body anyway");
        }

        match response.text().await {
            Ok(body) => {
                debug!(%url, bytes = body.len(), elapsed_ms = t0.elapsed().as_millis() as u64, "Fetched");
                Some(body)
            }
            Err(e) => {
                warn!(%url, error = %e, "Reading response body failed");
                None
            }
        }
    }
}

#[cfg(test)]
pub(crate) use mock::MockFetcher;

#[cfg(test)]
mod mock {
    use super::Fetch;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// Serves canned bodies; unknown URLs behave like transport failures.
    #[derive(Debug, Default)]
    pub(crate) struct MockFetcher {
        responses: HashMap<String, String>,
        requests: Mutex<Vec<String>>,
    }

    impl MockFetcher {
        pub(crate) fn new() -> Self {
            Self::default()
        }

        pub(crate) fn with(mut self, url: &str, body: impl Into<String>) -> Self {
            self.responses.insert(url.to_string(), body.into());
            self
        }

        /// URLs requested so far, in order.
        pub(crate) fn requests(&self) -> Vec<String> {
            self.requests.lock().unwrap().clone()
        }
    }

    impl Fetch for MockFetcher {
        async fn fetch(&self, url: &str) -> Option<String> {
            self.requests.lock().unwrap().push(url.to_string());
            self.responses.get(url).cloned()
        }
    }
}
