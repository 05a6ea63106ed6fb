//! Named, bounded worker pools

use futures::future::join_all;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::debug;

/// Available parallelism, capped
pub fn default_width(cap: usize) -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
        .min(cap.max(1))
}

/// A fixed number of permits shared by every job submitted to the pool
///
/// Jobs run concurrently up to the pool width. Results are returned in
/// submission order whatever order the jobs complete in.
#[derive(Debug, Clone)]
pub struct WorkerPool {
    name: &'static str,
    width: usize,
    permits: Arc<Semaphore>,
}

impl WorkerPool {
    /// Create a pool; a zero width is treated as one
    pub fn new(name: &'static str, width: usize) -> Self {
        let width = width.max(1);
        Self {
            name,
            width,
            permits: Arc::new(Semaphore::new(width)),
        }
    }

    /// Pool name, used in logs
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Maximum number of concurrent jobs
    pub fn width(&self) -> usize {
        self.width
    }

    /// Run `job` over every item and collect the outputs in input order
    ///
    /// `job` receives each item with its 0-based submission index.
    pub async fn run_ordered<I, F, Fut, T>(&self, items: I, job: F) -> Vec<T>
    where
        I: IntoIterator,
        F: Fn(usize, I::Item) -> Fut,
        Fut: Future<Output = T>,
    {
        let jobs: Vec<_> = items
            .into_iter()
            .enumerate()
            .map(|(index, item)| {
                let permits = Arc::clone(&self.permits);
                let work = job(index, item);
                async move {
                    // The semaphore is never closed; a failed acquire runs unthrottled
                    let _permit = permits.acquire_owned().await.ok();
                    work.await
                }
            })
            .collect();

        debug!(pool = self.name, width = self.width, jobs = jobs.len(), "Dispatching");
        join_all(jobs).await
    }
}
