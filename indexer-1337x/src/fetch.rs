use leetscrape_indexer_prelude::{Fetch, IndexerError, IndexerErrorReason};
use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE};
use std::time::Duration;

use super::NAME;

/// Blocking HTTP client presenting itself as a desktop browser.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(user_agent: &str, timeout: Duration) -> Result<Self, IndexerError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("text/html,application/xhtml+xml;q=0.9,*/*;q=0.8"),
        );
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.5"));

        Client::builder()
            .user_agent(user_agent)
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map(|client| Self { client })
            .map_err(|err| {
                IndexerError::new(
                    NAME,
                    IndexerErrorReason::UnableToBuildClient {
                        cause: err.to_string(),
                    },
                )
            })
    }

    fn fetch_page(&self, url: &str) -> Result<String, IndexerError> {
        let res = self
            .client
            .get(url)
            .send()
            .and_then(|res| res.error_for_status())
            .map_err(|cause| {
                IndexerError::new(
                    NAME,
                    IndexerErrorReason::UnableToQuery {
                        url: url.to_string(),
                        cause: cause.to_string(),
                    },
                )
            })?;
        let body = res.text().map_err(|err| {
            IndexerError::new(
                NAME,
                IndexerErrorReason::UnableToRead {
                    url: url.to_string(),
                    cause: err.to_string(),
                },
            )
        })?;
        if body.trim().is_empty() {
            return Err(IndexerError::new(
                NAME,
                IndexerErrorReason::EmptyContent {
                    url: url.to_string(),
                },
            ));
        }
        Ok(body)
    }
}

impl Fetch for HttpFetcher {
    fn fetch(&self, url: &str) -> Option<String> {
        match self.fetch_page(url) {
            Ok(body) => Some(body),
            Err(error) => {
                tracing::warn!("{error}");
                None
            }
        }
    }
}
