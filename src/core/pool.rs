use crate::utils::error::{RankError, Result};
use std::future::Future;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

/// Runs index-tagged tasks on at most `workers` tasks at a time and places
/// each result in the slot named by its index, whatever order they finish in.
#[derive(Debug, Clone, Copy)]
pub struct WorkerPool {
    workers: usize,
}

impl WorkerPool {
    pub fn new(workers: usize) -> Self {
        Self {
            workers: workers.max(1),
        }
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Returns `slots` entries; an entry stays `None` only if no task carried its index.
    ///
    /// The first failure observed while collecting aborts every task still
    /// queued or running and is returned as is.
    pub async fn run_indexed<T, Fut>(
        &self,
        tasks: Vec<(usize, Fut)>,
        slots: usize,
    ) -> Result<Vec<Option<T>>>
    where
        T: Send + 'static,
        Fut: Future<Output = Result<T>> + Send + 'static,
    {
        let semaphore = Arc::new(Semaphore::new(self.workers));
        let mut set = JoinSet::new();

        for (index, task) in tasks {
            if index >= slots {
                return Err(RankError::TaskFailed {
                    message: format!("task index {} is outside of {} result slots", index, slots),
                });
            }

            let semaphore = Arc::clone(&semaphore);
            set.spawn(async move {
                let _permit = semaphore
                    .acquire_owned()
                    .await
                    .map_err(|e| RankError::TaskFailed {
                        message: e.to_string(),
                    })?;
                task.await.map(|value| (index, value))
            });
        }

        let mut results: Vec<Option<T>> = (0..slots).map(|_| None).collect();

        while let Some(joined) = set.join_next().await {
            let outcome = joined.map_err(|e| RankError::TaskFailed {
                message: e.to_string(),
            });

            match outcome.and_then(|inner| inner) {
                Ok((index, value)) => results[index] = Some(value),
                Err(e) => {
                    set.abort_all();
                    return Err(e);
                }
            }
        }

        Ok(results)
    }
}

impl Default for WorkerPool {
    fn default() -> Self {
        Self::new(10)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[tokio::test]
    async fn test_results_follow_index_not_completion_order() {
        // later indices finish first
        let delays = [40u64, 5, 30, 0, 20, 10];
        let tasks = delays
            .iter()
            .enumerate()
            .map(|(i, delay)| {
                let delay = *delay;
                (i + 1, async move {
                    tokio::time::sleep(Duration::from_millis(delay)).await;
                    Ok::<_, RankError>(format!("row {}", i + 1))
                })
            })
            .collect();

        let results = WorkerPool::new(3).run_indexed(tasks, 7).await.unwrap();

        assert!(results[0].is_none());
        for (i, slot) in results.iter().enumerate().skip(1) {
            assert_eq!(slot.as_deref(), Some(format!("row {}", i).as_str()));
        }
    }

    #[tokio::test]
    async fn test_never_exceeds_worker_count() {
        let running = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));

        let tasks = (0..12)
            .map(|i| {
                let running = Arc::clone(&running);
                let peak = Arc::clone(&peak);
                (i, async move {
                    let now = running.fetch_add(1, Ordering::SeqCst) + 1;
                    peak.fetch_max(now, Ordering::SeqCst);
                    tokio::time::sleep(Duration::from_millis(10)).await;
                    running.fetch_sub(1, Ordering::SeqCst);
                    Ok::<_, RankError>(i)
                })
            })
            .collect();

        let results = WorkerPool::new(4).run_indexed(tasks, 12).await.unwrap();

        assert!(results.iter().all(Option::is_some));
        assert!(peak.load(Ordering::SeqCst) <= 4);
    }

    #[tokio::test]
    async fn test_first_failure_is_returned() {
        let tasks: Vec<(usize, _)> = (1..=3)
            .map(|i| {
                (i, async move {
                    if i == 2 {
                        Err(RankError::InvalidRequest {
                            message: "count must be greater than 0".to_string(),
                        })
                    } else {
                        tokio::time::sleep(Duration::from_millis(50)).await;
                        Ok::<_, RankError>(i)
                    }
                })
            })
            .collect();

        let err = WorkerPool::new(3).run_indexed(tasks, 4).await.unwrap_err();
        assert!(matches!(err, RankError::InvalidRequest { .. }));
    }

    #[tokio::test]
    async fn test_panicking_task_is_reported() {
        let tasks = vec![(0usize, async {
            if true {
                panic!("worker blew up");
            }
            Ok::<(), RankError>(())
        })];

        let err = WorkerPool::new(1).run_indexed(tasks, 1).await.unwrap_err();
        assert!(matches!(err, RankError::TaskFailed { .. }));
    }

    #[tokio::test]
    async fn test_out_of_range_index_is_rejected() {
        let tasks = vec![(5usize, async { Ok::<(), RankError>(()) })];
        let err = WorkerPool::new(1).run_indexed(tasks, 2).await.unwrap_err();
        assert!(matches!(err, RankError::TaskFailed { .. }));
    }
}
