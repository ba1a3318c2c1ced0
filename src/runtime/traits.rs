//! Trait abstractions for runtime timing
//!
//! The pipeline never sleeps directly; it asks a [`Timer`]. Tests swap in a
//! timer that records the requested durations and returns immediately.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

/// Source of suspensions between pipeline stages
#[async_trait]
pub trait Timer: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

#[async_trait]
impl<T: Timer + ?Sized> Timer for Arc<T> {
    async fn sleep(&self, duration: Duration) {
        (**self).sleep(duration).await;
    }
}

// ============================================================================
// Production Adapters
// ============================================================================

/// Timer backed by `tokio::time`, optionally sped up
#[derive(Debug, Clone)]
pub struct TokioTimer {
    speedup: u32,
}

impl TokioTimer {
    pub fn new(speedup: u32) -> Self {
        Self {
            speedup: speedup.max(1),
        }
    }

    /// Real duration slept for a simulated `duration`
    pub fn scaled(&self, duration: Duration) -> Duration {
        duration / self.speedup
    }
}

impl Default for TokioTimer {
    fn default() -> Self {
        Self::new(1)
    }
}

#[async_trait]
impl Timer for TokioTimer {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(self.scaled(duration)).await;
    }
}
