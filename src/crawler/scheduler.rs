//! Bounded fan-out of independent fetch-and-parse units
//!
//! This module handles:
//! - Spawning one task per unit into a `JoinSet`
//! - Limiting in-flight units with a shared semaphore
//! - Collecting per-unit results into slots indexed by input position
//! - Coarse progress reporting from the collecting side
//!
//! A failing or panicking unit only fills its own slot with an error; its
//! siblings keep running.

use crate::MigrationError;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

/// Completed/total counter for one fan-out stage
#[derive(Debug, Clone)]
pub struct StageProgress {
    label: String,
    total: usize,
    completed: usize,
    step: usize,
}

impl StageProgress {
    /// Creates a counter that logs roughly every tenth of `total`
    pub fn new(label: impl Into<String>, total: usize) -> Self {
        Self {
            label: label.into(),
            total,
            completed: 0,
            step: (total / 10).max(1),
        }
    }

    /// Records one finished unit, logging on step boundaries and at the end
    pub fn record(&mut self) {
        self.completed += 1;

        if self.completed % self.step == 0 || self.completed == self.total {
            tracing::info!(
                "{}: {}/{} ({:.0}%)",
                self.label,
                self.completed,
                self.total,
                self.percent()
            );
        }
    }

    pub fn completed(&self) -> usize {
        self.completed
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn percent(&self) -> f64 {
        if self.total == 0 {
            return 100.0;
        }
        self.completed as f64 / self.total as f64 * 100.0
    }
}

/// Runs `task` over every input with at most `width` units in flight
///
/// The returned vector has one entry per input, in input order, whatever the
/// completion order was.
///
/// # Example
///
/// ```
/// use letterboxd_trakt::crawler::fan_out;
///
/// # #[tokio::main]
/// # async fn main() {
/// let doubled = fan_out(vec![1, 2, 3], 2, "doubling", |n| async move { Ok(n * 2) }).await;
/// let values: Vec<i32> = doubled.into_iter().map(Result::unwrap).collect();
/// assert_eq!(values, vec![2, 4, 6]);
/// # }
/// ```
pub async fn fan_out<T, R, F, Fut>(
    inputs: Vec<T>,
    width: usize,
    label: &str,
    task: F,
) -> Vec<Result<R, MigrationError>>
where
    T: Send + 'static,
    R: Send + 'static,
    F: Fn(T) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<R, MigrationError>> + Send + 'static,
{
    let total = inputs.len();
    let semaphore = Arc::new(Semaphore::new(width.max(1)));
    let task = Arc::new(task);
    let mut join_set = JoinSet::new();

    for (index, input) in inputs.into_iter().enumerate() {
        let semaphore = Arc::clone(&semaphore);
        let task = Arc::clone(&task);

        join_set.spawn(async move {
            let result = match semaphore.acquire_owned().await {
                Ok(_permit) => task(input).await,
                Err(_) => Err(MigrationError::Task("worker pool closed".to_string())),
            };
            (index, result)
        });
    }

    let mut slots: Vec<Option<Result<R, MigrationError>>> = (0..total).map(|_| None).collect();
    let mut progress = StageProgress::new(label, total);

    while let Some(joined) = join_set.join_next().await {
        match joined {
            Ok((index, result)) => slots[index] = Some(result),
            Err(e) => tracing::error!("{}: task aborted: {}", label, e),
        }
        progress.record();
    }

    slots
        .into_iter()
        .map(|slot| {
            slot.unwrap_or_else(|| Err(MigrationError::Task(format!("{}: task panicked", label))))
        })
        .collect()
}
