//! Live adapter for the `PageFetcher` port using reqwest.

use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE};
use reqwest::redirect::Policy;
use reqwest::Client;

use crate::config::FetchConfig;
use crate::error::{Error, FetchError};
use crate::ports::fetcher::{FetchFuture, PageFetcher, PageResponse};

/// Live fetcher issuing real HTTP requests with the configured headers.
pub struct LiveFetcher {
    client: Client,
    config: FetchConfig,
}

impl LiveFetcher {
    /// Creates a fetcher whose client carries the configured user agent and
    /// redirect limit.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Http`] if the client cannot be built.
    pub fn new(config: FetchConfig) -> Result<Self, Error> {
        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .redirect(Policy::limited(config.max_redirects))
            .build()?;
        Ok(Self { client, config })
    }
}

impl PageFetcher for LiveFetcher {
    fn fetch_page(&self, url: &str) -> FetchFuture<'_, PageResponse> {
        let url = url.to_string();

        Box::pin(async move {
            let response = self
                .client
                .get(&url)
                .header(ACCEPT, self.config.accept.as_str())
                .header(ACCEPT_LANGUAGE, self.config.accept_language.as_str())
                .timeout(self.config.page_timeout())
                .send()
                .await
                .map_err(|e| FetchError::from_reqwest(&url, &e))?;

            let status = response.status();
            if !status.is_success() {
                return Err(FetchError::Status { url, status: status.as_u16() });
            }

            let body = response.text().await.map_err(|e| FetchError::from_reqwest(&url, &e))?;
            Ok(PageResponse { status: status.as_u16(), body })
        })
    }

    fn check_exists(&self, url: &str) -> FetchFuture<'_, u16> {
        let url = url.to_string();

        Box::pin(async move {
            let response = self
                .client
                .head(&url)
                .header(ACCEPT, "*/*")
                .timeout(self.config.exists_timeout())
                .send()
                .await
                .map_err(|e| FetchError::from_reqwest(&url, &e))?;
            Ok(response.status().as_u16())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn unreachable_host_is_a_fetch_error() {
        let config = FetchConfig { page_timeout_ms: 500, ..FetchConfig::default() };
        let fetcher = LiveFetcher::new(config).unwrap();
        let result = fetcher.fetch_page("http://127.0.0.1:1/").await;
        assert!(matches!(
            result,
            Err(FetchError::Network { .. } | FetchError::Timeout { .. })
        ));
    }
}
