use crate::core::params::ParamsTemplate;
use crate::core::pool::WorkerPool;
use crate::core::resolver::PaginatedResolver;
use crate::domain::model::{Query, ResultMatrix, ResultRow};
use crate::domain::ports::SearchTransport;
use crate::utils::error::Result;
use std::sync::Arc;
use tracing::Instrument;

pub const DEFAULT_WORKERS: usize = 10;

/// Resolves a batch of queries concurrently and assembles the rank matrix.
pub struct BatchOrchestrator<T: SearchTransport + ?Sized + 'static> {
    resolver: Arc<PaginatedResolver<T>>,
    pool: WorkerPool,
}

impl<T: SearchTransport + ?Sized + 'static> BatchOrchestrator<T> {
    pub fn new(resolver: PaginatedResolver<T>, workers: usize) -> Self {
        Self {
            resolver: Arc::new(resolver),
            pool: WorkerPool::new(workers),
        }
    }

    pub fn workers(&self) -> usize {
        self.pool.workers()
    }

    /// Runs one task per query and returns the header row followed by one row
    /// per query, ordered by `Query::index` (which must run 1..=len).
    ///
    /// Any failing query fails the whole batch; no partial matrix is returned.
    pub async fn run(
        &self,
        queries: &[Query],
        domains: &[String],
        template: &ParamsTemplate,
        count: usize,
    ) -> Result<ResultMatrix> {
        let target_domains = Arc::new(domains.to_vec());

        let tasks = queries
            .iter()
            .map(|query| {
                let span = tracing::info_span!("query", index = query.index, text = %query.text);
                let task = analyse_query(
                    Arc::clone(&self.resolver),
                    query.clone(),
                    Arc::clone(&target_domains),
                    template.clone(),
                    count,
                );
                (query.index, task.instrument(span))
            })
            .collect();

        let slots = self.pool.run_indexed(tasks, queries.len() + 1).await?;

        let mut rows: Vec<Option<Vec<String>>> = slots
            .into_iter()
            .map(|slot| slot.map(|row| row.cells))
            .collect();
        rows[0] = Some(ResultMatrix::header_for(domains));

        ResultMatrix::from_slots(rows)
    }
}

async fn analyse_query<T: SearchTransport + ?Sized>(
    resolver: Arc<PaginatedResolver<T>>,
    query: Query,
    domains: Arc<Vec<String>>,
    template: ParamsTemplate,
    count: usize,
) -> Result<ResultRow> {
    tracing::info!("Analyzing query \"{}\"", query.text);

    let params = template.params_for(&query.text)?;
    let index = resolver.resolve(&params, count).await?;
    tracing::debug!("Domains order: {:?}", index);

    Ok(index.to_row(&query, &domains))
}
