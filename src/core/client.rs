use crate::core::params::RequestParameters;
use crate::domain::ports::SearchTransport;
use crate::utils::error::{RankError, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

pub const DEFAULT_ENDPOINT: &str = "https://yandex.com/search/xml/";
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);
pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_secs(15);

/// HTTP client for the XML search API.
///
/// Cloning is cheap: clones share one connection pool, which is what every
/// worker of a batch uses.
#[derive(Debug, Clone)]
pub struct SearchApiClient {
    client: Client,
    endpoint: String,
    folder_id: String,
    api_key: String,
}

impl SearchApiClient {
    pub fn new(endpoint: &str, folder_id: &str, api_key: &str) -> Result<Self> {
        Self::with_timeouts(
            endpoint,
            folder_id,
            api_key,
            DEFAULT_CONNECT_TIMEOUT,
            DEFAULT_READ_TIMEOUT,
        )
    }

    pub fn with_timeouts(
        endpoint: &str,
        folder_id: &str,
        api_key: &str,
        connect_timeout: Duration,
        read_timeout: Duration,
    ) -> Result<Self> {
        let client = Client::builder()
            .connect_timeout(connect_timeout)
            .read_timeout(read_timeout)
            .build()
            .map_err(|e| RankError::InvalidConfiguration {
                message: format!("failed to create HTTP client: {}", e),
            })?;

        Ok(Self {
            client,
            endpoint: endpoint.to_string(),
            folder_id: folder_id.to_string(),
            api_key: api_key.to_string(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl SearchTransport for SearchApiClient {
    async fn fetch_page(&self, params: &RequestParameters, page: u32) -> Result<String> {
        let mut query = vec![
            ("folderid", self.folder_id.clone()),
            ("apikey", self.api_key.clone()),
        ];
        query.extend(params.page_pairs(page));

        tracing::debug!(
            "Requesting page {} for \"{}\" (lr={}, groupby={})",
            page,
            params.query(),
            params.region(),
            params.group_by()
        );
        let response = self.client.get(&self.endpoint).query(&query).send().await?;

        let status = response.status();
        tracing::debug!("API response status: {}", status);

        // The request URL carries the API key, so only the endpoint is reported.
        if !status.is_success() {
            return Err(RankError::HttpStatus {
                status: status.as_u16(),
                url: self.endpoint.clone(),
            });
        }

        Ok(response.text().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::retry::RetryPolicy;
    use httpmock::prelude::*;

    fn params() -> RequestParameters {
        RequestParameters::build("rust async", 225, "deep", None, None).unwrap()
    }

    #[tokio::test]
    async fn test_fetch_page_sends_all_parameters() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(GET)
                .path("/search/xml/")
                .query_param("folderid", "folder-1")
                .query_param("apikey", "secret")
                .query_param("query", "rust async")
                .query_param("sortby", "rlv")
                .query_param("lr", "225")
                .query_param("groupby", "attr=d.mode=deep.groups-on-page=10.docs-in-group=1")
                .query_param("maxpassages", "1")
                .query_param("page", "2");
            then.status(200)
                .header("Content-Type", "text/xml")
                .body("<domain>a.com</domain>");
        });

        let client = SearchApiClient::new(&server.url("/search/xml/"), "folder-1", "secret").unwrap();
        let body = client.fetch_page(&params(), 2).await.unwrap();

        api_mock.assert();
        assert_eq!(body, "<domain>a.com</domain>");
    }

    #[tokio::test]
    async fn test_non_success_status_is_reported_without_credentials() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(GET).path("/search/xml/");
            then.status(401);
        });

        let client = SearchApiClient::new(&server.url("/search/xml/"), "folder-1", "secret").unwrap();
        let err = client.fetch_page(&params(), 0).await.unwrap_err();

        api_mock.assert();
        match err {
            RankError::HttpStatus { status, url } => {
                assert_eq!(status, 401);
                assert!(!url.contains("secret"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_refused_connection_is_transient() {
        let client = SearchApiClient::with_timeouts(
            "http://127.0.0.1:1/search/xml/",
            "folder-1",
            "secret",
            Duration::from_millis(500),
            Duration::from_millis(500),
        )
        .unwrap();

        let err = client.fetch_page(&params(), 0).await.unwrap_err();
        assert!(err.is_retryable(), "expected a transient error, got {:?}", err);
        assert!(!err.to_string().contains("secret"));
    }

    #[tokio::test]
    async fn test_redirect_loop_is_not_retryable() {
        let server = MockServer::start();
        let looping = server.url("/search/xml/");
        let api_mock = server.mock(|when, then| {
            when.method(GET).path("/search/xml/");
            then.status(302).header("Location", looping.as_str());
        });

        let client = SearchApiClient::new(&server.url("/search/xml/"), "folder-1", "secret").unwrap();
        let params = params();
        let (client, params) = (&client, &params);
        let err = RetryPolicy::new(5, Duration::from_millis(1))
            .run("redirect loop", move || client.fetch_page(params, 0))
            .await
            .unwrap_err();

        assert!(matches!(err, RankError::RequestFailed { .. }), "got {:?}", err);
        assert!(!err.to_string().contains("secret"));
        // One attempt: the initial request plus reqwest's ten followed redirects.
        api_mock.assert_hits(11);
    }

    #[tokio::test]
    async fn test_malformed_endpoint_is_not_retryable() {
        let client = SearchApiClient::new("not a url", "folder-1", "secret").unwrap();

        let err = client.fetch_page(&params(), 0).await.unwrap_err();
        assert!(matches!(err, RankError::RequestFailed { .. }), "got {:?}", err);
        assert!(!err.is_retryable());
    }
}
