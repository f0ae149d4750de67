//! Blocking bridge for async embedding calls.
//!
//! The calling pipelines treat a provider call as a single synchronous
//! unit of work. The executor owns a small dedicated tokio runtime and
//! enforces the caller-supplied deadline.

use std::future::Future;
use std::sync::{Arc, mpsc};
use std::time::Duration;

use tokio::runtime::Builder as TokioRuntimeBuilder;

use crate::error::{CallaError, Result};

/// Executor for running async embedding operations from sync callers.
#[derive(Clone)]
pub struct EmbedderExecutor {
    runtime: Arc<tokio::runtime::Runtime>,
}

impl EmbedderExecutor {
    /// Create a new executor with its own tokio runtime.
    pub fn new() -> Result<Self> {
        let runtime = TokioRuntimeBuilder::new_multi_thread()
            .worker_threads(2)
            .enable_all()
            .build()
            .map_err(|err| {
                CallaError::internal(format!("failed to initialize embedder runtime: {err}"))
            })?;
        Ok(Self {
            runtime: Arc::new(runtime),
        })
    }

    /// Run an async future to completion and wait for its result.
    pub fn run<F, T>(&self, future: F) -> Result<T>
    where
        F: Future<Output = Result<T>> + Send + 'static,
        T: Send + 'static,
    {
        let (tx, rx) = mpsc::channel();
        let handle = self.runtime.handle().clone();
        handle.spawn(async move {
            let _ = tx.send(future.await);
        });
        rx.recv()
            .map_err(|err| CallaError::internal(format!("embedder task channel closed: {err}")))?
    }

    /// Run an async future with a deadline. Exceeding it fails with
    /// [`CallaError::Timeout`]; the future is dropped, never half-applied.
    pub fn run_with_timeout<F, T>(&self, future: F, timeout: Duration) -> Result<T>
    where
        F: Future<Output = Result<T>> + Send + 'static,
        T: Send + 'static,
    {
        self.run(async move {
            match tokio::time::timeout(timeout, future).await {
                Ok(result) => result,
                Err(_) => Err(CallaError::Timeout(format!(
                    "embedding call exceeded deadline of {timeout:?}"
                ))),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_returns_future_output() {
        let executor = EmbedderExecutor::new().unwrap();
        let value = executor.run(async { Ok(21 * 2) }).unwrap();
        assert_eq!(value, 42);
    }

    #[test]
    fn deadline_exceeded_is_a_timeout() {
        let executor = EmbedderExecutor::new().unwrap();
        let err = executor
            .run_with_timeout(
                async {
                    tokio::time::sleep(Duration::from_secs(5)).await;
                    Ok(())
                },
                Duration::from_millis(10),
            )
            .unwrap_err();
        assert!(matches!(err, CallaError::Timeout(_)));
    }

    #[test]
    fn fast_future_beats_deadline() {
        let executor = EmbedderExecutor::new().unwrap();
        let value = executor
            .run_with_timeout(async { Ok("done") }, Duration::from_secs(1))
            .unwrap();
        assert_eq!(value, "done");
    }
}
