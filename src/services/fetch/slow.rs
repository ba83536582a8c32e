//! Slow fetch backend for testing
//!
//! This module provides a decorator/wrapper around any ChildrenBackend that
//! adds a configurable delay to simulate a slow server. It also records
//! every request, which is how tests check that a node is fetched exactly
//! once.

use super::backend::ChildrenBackend;
use async_trait::async_trait;
use std::collections::HashMap;
use std::io;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

/// Metrics tracking for fetch operations
#[derive(Debug, Clone, Default)]
pub struct FetchMetrics {
    /// Number of get calls
    pub get_calls: usize,
    /// Number of get calls per URL
    pub calls_by_url: HashMap<String, usize>,
    /// Total time spent in artificial delays
    pub total_delay_time: Duration,
}

impl FetchMetrics {
    /// Create new empty metrics
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset all metrics to zero
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Number of requests made for `url`
    pub fn calls_for(&self, url: &str) -> usize {
        self.calls_by_url.get(url).copied().unwrap_or(0)
    }
}

/// Slow backend wrapper for testing
pub struct SlowBackend {
    /// The underlying real backend
    inner: Arc<dyn ChildrenBackend>,
    /// Delay applied before every request
    delay: Duration,
    /// Metrics tracking
    metrics: Arc<Mutex<FetchMetrics>>,
}

impl SlowBackend {
    /// Create a new slow backend
    pub fn new(inner: Arc<dyn ChildrenBackend>, delay: Duration) -> Self {
        Self {
            inner,
            delay,
            metrics: Arc::new(Mutex::new(FetchMetrics::new())),
        }
    }

    /// Wrap a backend without adding delay, only counting requests
    pub fn counting(inner: Arc<dyn ChildrenBackend>) -> Self {
        Self::new(inner, Duration::ZERO)
    }

    /// Get a snapshot of current metrics
    pub async fn metrics(&self) -> FetchMetrics {
        self.metrics.lock().await.clone()
    }

    /// Reset metrics to zero
    pub async fn reset_metrics(&self) {
        self.metrics.lock().await.reset();
    }
}

#[async_trait]
impl ChildrenBackend for SlowBackend {
    async fn get(&self, url: &str) -> io::Result<String> {
        {
            let mut metrics = self.metrics.lock().await;
            metrics.get_calls += 1;
            *metrics.calls_by_url.entry(url.to_string()).or_insert(0) += 1;
        }

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
            self.metrics.lock().await.total_delay_time += self.delay;
        }

        self.inner.get(url).await
    }
}
