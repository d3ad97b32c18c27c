use crate::core::extractor::PageExtractor;
use crate::core::params::RequestParameters;
use crate::core::rank_index::RankIndex;
use crate::core::retry::RetryPolicy;
use crate::domain::ports::SearchTransport;
use crate::utils::error::{RankError, Result};
use std::sync::Arc;

/// Walks result pages of one query until `count` domain occurrences are ranked.
pub struct PaginatedResolver<T: SearchTransport + ?Sized> {
    transport: Arc<T>,
    extractor: PageExtractor,
    retry: RetryPolicy,
}

impl<T: SearchTransport + ?Sized> PaginatedResolver<T> {
    pub fn new(transport: Arc<T>) -> Self {
        Self {
            transport,
            extractor: PageExtractor::default(),
            retry: RetryPolicy::default(),
        }
    }

    pub fn with_extractor(mut self, extractor: PageExtractor) -> Self {
        self.extractor = extractor;
        self
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Requests pages 0, 1, 2, ... and assigns every extracted domain the next
    /// global position. Returns as soon as the `count`-th position is taken,
    /// so domains later on the same page are left unranked.
    ///
    /// A page without domains ends the walk with `PrematureExhaustion`.
    pub async fn resolve(&self, params: &RequestParameters, count: usize) -> Result<RankIndex> {
        if count == 0 {
            return Err(RankError::InvalidRequest {
                message: "count must be greater than 0".to_string(),
            });
        }

        let mut index = RankIndex::new();
        let mut position = 0;
        let mut page = 0u32;

        loop {
            let transport = &self.transport;
            let operation = format!("page {} of \"{}\"", page, params.query());
            let body = self
                .retry
                .run(&operation, move || transport.fetch_page(params, page))
                .await?;

            let domains = self.extractor.extract(&body);
            if domains.is_empty() {
                return Err(RankError::PrematureExhaustion {
                    query: params.query().to_string(),
                    page,
                    collected: position,
                    requested: count,
                });
            }

            for domain in domains {
                index.record(domain, position);
                position += 1;
                if position == count {
                    return Ok(index);
                }
            }

            page += 1;
        }
    }
}
