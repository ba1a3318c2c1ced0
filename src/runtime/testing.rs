//! Mock implementations for testing
//!
//! These mocks let the pipeline run without real waiting or real randomness.

use super::traits::Timer;
use super::ConversationRuntime;
use crate::persona::PersonaTable;
use crate::random::RandomSource;
use crate::store::ConversationStore;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

// ============================================================================
// Recording Timer
// ============================================================================

/// Timer that records every requested suspension and returns immediately
#[derive(Default)]
pub struct RecordingTimer {
    sleeps: Mutex<Vec<Duration>>,
}

impl RecordingTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Durations requested so far, in order
    pub fn recorded(&self) -> Vec<Duration> {
        self.sleeps.lock().unwrap().clone()
    }

    pub fn total(&self) -> Duration {
        self.sleeps.lock().unwrap().iter().sum()
    }
}

#[async_trait]
impl Timer for RecordingTimer {
    async fn sleep(&self, duration: Duration) {
        self.sleeps.lock().unwrap().push(duration);
    }
}

// ============================================================================
// Scripted Random
// ============================================================================

/// Random source that replays queued values.
///
/// `range` pops from the range queue (clamped into bounds) and falls back to
/// the lower bound; `unit` pops from the unit queue and falls back to 0.0.
#[derive(Debug, Default)]
pub struct ScriptedRandom {
    ranges: VecDeque<u64>,
    units: VecDeque<f64>,
    draws: usize,
}

impl ScriptedRandom {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_ranges(mut self, values: impl IntoIterator<Item = u64>) -> Self {
        self.ranges.extend(values);
        self
    }

    pub fn with_units(mut self, values: impl IntoIterator<Item = f64>) -> Self {
        self.units.extend(values);
        self
    }

    /// Number of draws taken so far
    pub fn draws(&self) -> usize {
        self.draws
    }
}

impl RandomSource for ScriptedRandom {
    fn range(&mut self, low: u64, high: u64) -> u64 {
        self.draws += 1;
        self.ranges
            .pop_front()
            .map_or(low, |v| v.clamp(low, high - 1))
    }

    fn unit(&mut self) -> f64 {
        self.draws += 1;
        self.units.pop_front().unwrap_or(0.0)
    }
}

// ============================================================================
// Test Runtime
// ============================================================================

/// Runtime over the built-in personas with a recording timer
pub fn test_runtime<R: RandomSource>(
    random: R,
) -> (
    ConversationRuntime<R, Arc<RecordingTimer>>,
    Arc<RecordingTimer>,
) {
    let timer = Arc::new(RecordingTimer::new());
    let store = ConversationStore::new(Arc::new(PersonaTable::builtin()));
    let runtime = ConversationRuntime::new(store, random, Arc::clone(&timer));
    (runtime, timer)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scripted_random_replays_and_clamps() {
        let mut random = ScriptedRandom::new().with_ranges([5, 100]).with_units([0.5]);
        assert_eq!(random.range(0, 10), 5);
        assert_eq!(random.range(10, 40), 39);
        assert_eq!(random.range(10, 40), 10);
        assert!((random.unit() - 0.5).abs() < f64::EPSILON);
        assert!(random.unit().abs() < f64::EPSILON);
        assert_eq!(random.draws(), 5);
    }

    #[tokio::test]
    async fn test_recording_timer_totals() {
        let timer = RecordingTimer::new();
        timer.sleep(Duration::from_millis(1000)).await;
        timer.sleep(Duration::from_millis(1500)).await;
        assert_eq!(timer.total(), Duration::from_millis(2500));
    }
}
