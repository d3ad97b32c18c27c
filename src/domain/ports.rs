use crate::core::params::RequestParameters;
use crate::utils::error::Result;
use async_trait::async_trait;
use std::time::Duration;

/// Fetches the raw payload of one result page for one query.
///
/// Implementations are shared by every worker, so they must be usable
/// concurrently through `&self`.
#[async_trait]
pub trait SearchTransport: Send + Sync {
    async fn fetch_page(&self, params: &RequestParameters, page: u32) -> Result<String>;
}

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn api_key(&self) -> &str;
    fn folder_id(&self) -> &str;
    fn endpoint(&self) -> &str;
    fn domains_path(&self) -> &str;
    fn queries_path(&self) -> &str;
    fn output_path(&self) -> &str;
    fn region(&self) -> u32;
    fn top_domains(&self) -> usize;
    fn workers(&self) -> usize;
    fn grouping_mode(&self) -> &str;
    fn groups_on_page(&self) -> Option<u32>;
    fn docs_in_group(&self) -> Option<u32>;

    fn sort_by(&self) -> &str {
        crate::core::params::DEFAULT_SORT_BY
    }

    fn max_passages(&self) -> u32 {
        crate::core::params::DEFAULT_MAX_PASSAGES
    }

    fn connect_timeout(&self) -> Duration {
        crate::core::client::DEFAULT_CONNECT_TIMEOUT
    }

    fn read_timeout(&self) -> Duration {
        crate::core::client::DEFAULT_READ_TIMEOUT
    }

    fn retry_attempts(&self) -> u32 {
        crate::core::retry::DEFAULT_MAX_ATTEMPTS
    }

    fn retry_delay(&self) -> Duration {
        crate::core::retry::DEFAULT_DELAY
    }

    fn domain_pattern(&self) -> &str {
        crate::core::extractor::DEFAULT_DOMAIN_PATTERN
    }

    fn delimiter(&self) -> u8 {
        b','
    }
}
