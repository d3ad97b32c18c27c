use crate::core::client::SearchApiClient;
use crate::core::extractor::PageExtractor;
use crate::core::orchestrator::BatchOrchestrator;
use crate::core::params::ParamsTemplate;
use crate::core::resolver::PaginatedResolver;
use crate::core::retry::RetryPolicy;
use crate::domain::model::{Query, ResultMatrix};
use crate::domain::ports::{ConfigProvider, SearchTransport, Storage};
use crate::utils::error::{RankError, Result};
use std::sync::Arc;

/// Reads the domain and query lists, ranks every query and writes the matrix.
pub struct RankEngine<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
    transport: Arc<dyn SearchTransport>,
}

impl<S: Storage, C: ConfigProvider> RankEngine<S, C> {
    /// Uses the HTTP search client described by `config`.
    pub fn new(storage: S, config: C) -> Result<Self> {
        let client = SearchApiClient::with_timeouts(
            config.endpoint(),
            config.folder_id(),
            config.api_key(),
            config.connect_timeout(),
            config.read_timeout(),
        )?;
        Ok(Self::with_transport(storage, config, Arc::new(client)))
    }

    pub fn with_transport(storage: S, config: C, transport: Arc<dyn SearchTransport>) -> Self {
        Self {
            storage,
            config,
            transport,
        }
    }

    pub fn config(&self) -> &C {
        &self.config
    }

    /// Returns the output path once the matrix has been written. Nothing is
    /// written when any query fails.
    pub async fn run(&self) -> Result<String> {
        let domains = self.read_list(self.config.domains_path()).await?;
        let queries = Query::enumerate(self.read_list(self.config.queries_path()).await?);
        tracing::info!("Domains = {:?}", domains);
        tracing::info!(
            "Ranking {} queries, top {} results, {} workers",
            queries.len(),
            self.config.top_domains(),
            self.config.workers()
        );

        let matrix = self.rank(&queries, &domains).await?;

        let data = matrix.to_delimited(self.config.delimiter())?;
        tracing::debug!("Writing {} rows ({} bytes)", matrix.rows().len(), data.len());
        self.storage
            .write_file(self.config.output_path(), &data)
            .await?;

        Ok(self.config.output_path().to_string())
    }

    pub async fn rank(&self, queries: &[Query], domains: &[String]) -> Result<ResultMatrix> {
        let resolver = PaginatedResolver::new(Arc::clone(&self.transport))
            .with_extractor(PageExtractor::new(self.config.domain_pattern())?)
            .with_retry_policy(RetryPolicy::new(
                self.config.retry_attempts(),
                self.config.retry_delay(),
            ));
        let orchestrator = BatchOrchestrator::new(resolver, self.config.workers());
        let template = ParamsTemplate::from_config(&self.config);

        orchestrator
            .run(queries, domains, &template, self.config.top_domains())
            .await
    }

    async fn read_list(&self, path: &str) -> Result<Vec<String>> {
        let data = self.storage.read_file(path).await?;
        let lines = parse_lines(&data).map_err(|e| RankError::InvalidConfigValueError {
            field: path.to_string(),
            value: String::new(),
            reason: e.to_string(),
        })?;
        tracing::debug!("Read {} entries from {}", lines.len(), path);
        Ok(lines)
    }
}

/// One entry per non-blank line, surrounding whitespace removed.
pub fn parse_lines(data: &[u8]) -> std::result::Result<Vec<String>, std::str::Utf8Error> {
    let text = std::str::from_utf8(data)?;
    Ok(text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect())
}
