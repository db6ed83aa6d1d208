//! Progress tracking and callbacks for metric runs.
//!
//! This module provides progress tracking, callbacks, and monitoring
//! capabilities for histogram accumulation. Within a run only the first
//! worker (or the first piece) reports, so the reported fraction is that
//! worker's share of rows visited.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};

use crate::metric::JointStatistics;

/// Progress information for an accumulation in flight.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressInfo {
    /// Fraction of the reporting worker's rows visited, in `[0, 1]`.
    pub fraction: f64,
    /// Time elapsed since start.
    pub elapsed: Duration,
    /// Estimated remaining time.
    pub estimated_remaining: Option<Duration>,
}

impl ProgressInfo {
    /// Create new progress information.
    pub fn new(fraction: f64, elapsed: Duration) -> Self {
        Self {
            fraction,
            elapsed,
            estimated_remaining: None,
        }
    }

    /// Calculate progress percentage.
    pub fn progress_percent(&self) -> f64 {
        self.fraction * 100.0
    }

    /// Calculate estimated remaining time.
    pub fn calculate_remaining(&mut self) {
        if self.fraction > 0.0 {
            let total = self.elapsed.as_secs_f64() / self.fraction;
            let remaining = (total - self.elapsed.as_secs_f64()).max(0.0);
            self.estimated_remaining = Some(Duration::from_secs_f64(remaining));
        }
    }
}

/// Outcome of a completed run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    /// Wall time from start to the end of reduction.
    pub elapsed: Duration,
    /// Final statistics.
    pub statistics: JointStatistics,
}

/// Progress callback trait for monitoring metric runs.
pub trait ProgressCallback: Send + Sync {
    /// Called as the reporting worker advances.
    fn on_progress(&self, info: &ProgressInfo);

    /// Called when a run starts.
    fn on_start(&self) {}

    /// Called when a run completes successfully.
    fn on_complete(&self, _summary: &RunSummary) {}

    /// Called when a run is aborted.
    fn on_error(&self, _error: &str) {}
}

/// Console progress callback that logs to tracing.
#[derive(Debug, Clone)]
pub struct ConsoleProgressCallback {
    /// Log interval in whole percent.
    pub log_interval: usize,
}

impl Default for ConsoleProgressCallback {
    fn default() -> Self {
        Self { log_interval: 10 }
    }
}

impl ConsoleProgressCallback {
    /// Create a new console progress callback logging every `log_interval`
    /// percent.
    pub fn new(log_interval: usize) -> Self {
        Self {
            log_interval: log_interval.max(1),
        }
    }

    fn should_log(&self, info: &ProgressInfo) -> bool {
        let percent = info.progress_percent().round() as usize;
        percent % self.log_interval.max(1) == 0 || info.fraction >= 1.0
    }
}

impl ProgressCallback for ConsoleProgressCallback {
    fn on_progress(&self, info: &ProgressInfo) {
        if self.should_log(info) {
            let remaining = info
                .estimated_remaining
                .map(|d| format!("{:.2}s", d.as_secs_f64()))
                .unwrap_or_else(|| "N/A".to_string());
            tracing::info!(
                "Histogram accumulation {:.1}% | Elapsed: {:.2}s | ETA: {}",
                info.progress_percent(),
                info.elapsed.as_secs_f64(),
                remaining
            );
        }
    }

    fn on_start(&self) {
        tracing::info!("Mutual information run started");
    }

    fn on_complete(&self, summary: &RunSummary) {
        tracing::info!(
            "Mutual information run completed in {:.2}s: MI {:.6}, NMI {:.6} over {} voxels",
            summary.elapsed.as_secs_f64(),
            summary.statistics.mutual_information,
            summary.statistics.normalized_mutual_information,
            summary.statistics.voxel_count
        );
    }

    fn on_error(&self, error: &str) {
        tracing::error!("Mutual information run failed: {}", error);
    }
}

/// History callback that records every event.
#[derive(Debug, Clone, Default)]
pub struct HistoryCallback {
    history: Arc<Mutex<Vec<ProgressInfo>>>,
    summaries: Arc<Mutex<Vec<RunSummary>>>,
    errors: Arc<Mutex<Vec<String>>>,
}

impl HistoryCallback {
    /// Create a new history callback.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the recorded progress reports.
    pub fn get_history(&self) -> Vec<ProgressInfo> {
        self.history.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Summaries of completed runs.
    pub fn summaries(&self) -> Vec<RunSummary> {
        self.summaries.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Messages of aborted runs.
    pub fn errors(&self) -> Vec<String> {
        self.errors.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Clear the history.
    pub fn clear(&self) {
        self.history.lock().unwrap_or_else(PoisonError::into_inner).clear();
        self.summaries.lock().unwrap_or_else(PoisonError::into_inner).clear();
        self.errors.lock().unwrap_or_else(PoisonError::into_inner).clear();
    }
}

impl ProgressCallback for HistoryCallback {
    fn on_progress(&self, info: &ProgressInfo) {
        self.history.lock().unwrap_or_else(PoisonError::into_inner).push(info.clone());
    }

    fn on_complete(&self, summary: &RunSummary) {
        self.summaries.lock().unwrap_or_else(PoisonError::into_inner).push(summary.clone());
    }

    fn on_error(&self, error: &str) {
        self.errors.lock().unwrap_or_else(PoisonError::into_inner).push(error.to_string());
    }
}

/// Progress tracker that fans events out to registered callbacks.
#[derive(Clone, Default)]
pub struct ProgressTracker {
    /// Registered callbacks.
    callbacks: Vec<Arc<dyn ProgressCallback>>,
    /// Start time.
    start_time: Arc<Mutex<Option<Instant>>>,
}

impl ProgressTracker {
    /// Create a new progress tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a callback.
    pub fn add_callback(&mut self, callback: Arc<dyn ProgressCallback>) {
        self.callbacks.push(callback);
    }

    /// Whether any callback is registered.
    pub fn is_empty(&self) -> bool {
        self.callbacks.is_empty()
    }

    fn elapsed(&self) -> Duration {
        let start_time = *self.start_time.lock().unwrap_or_else(PoisonError::into_inner);
        start_time.map(|t| t.elapsed()).unwrap_or(Duration::ZERO)
    }

    /// Start tracking.
    pub fn start(&self) {
        *self.start_time.lock().unwrap_or_else(PoisonError::into_inner) = Some(Instant::now());
        for callback in &self.callbacks {
            callback.on_start();
        }
    }

    /// Update progress.
    pub fn update(&self, fraction: f64) {
        let mut info = ProgressInfo::new(fraction.clamp(0.0, 1.0), self.elapsed());
        info.calculate_remaining();
        for callback in &self.callbacks {
            callback.on_progress(&info);
        }
    }

    /// Complete tracking.
    pub fn complete(&self, statistics: JointStatistics) {
        let summary = RunSummary {
            elapsed: self.elapsed(),
            statistics,
        };
        for callback in &self.callbacks {
            callback.on_complete(&summary);
        }
    }

    /// Report error.
    pub fn error(&self, error: &str) {
        for callback in &self.callbacks {
            callback.on_error(error);
        }
    }
}

impl std::fmt::Debug for ProgressTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProgressTracker")
            .field("callbacks", &self.callbacks.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_info() {
        let info = ProgressInfo::new(0.25, Duration::from_secs(10));
        assert_eq!(info.progress_percent(), 25.0);
    }

    #[test]
    fn test_progress_info_remaining() {
        let mut info = ProgressInfo::new(0.25, Duration::from_secs(10));
        info.calculate_remaining();
        let remaining = info.estimated_remaining.unwrap().as_secs_f64();
        assert!((remaining - 30.0).abs() < 1e-6);

        let mut info = ProgressInfo::new(0.0, Duration::from_secs(1));
        info.calculate_remaining();
        assert!(info.estimated_remaining.is_none());
    }

    #[test]
    fn test_history_callback() {
        let callback = HistoryCallback::new();
        callback.on_progress(&ProgressInfo::new(0.5, Duration::ZERO));
        callback.on_progress(&ProgressInfo::new(1.0, Duration::ZERO));
        callback.on_error("boom");

        let history = callback.get_history();
        assert_eq!(history.len(), 2);
        assert_eq!(history[1].fraction, 1.0);
        assert_eq!(callback.errors(), vec!["boom".to_string()]);

        callback.clear();
        assert!(callback.get_history().is_empty());
    }

    #[test]
    fn test_console_log_interval() {
        let console = ConsoleProgressCallback::new(25);
        assert!(console.should_log(&ProgressInfo::new(0.5, Duration::ZERO)));
        assert!(!console.should_log(&ProgressInfo::new(0.3, Duration::ZERO)));
        assert!(console.should_log(&ProgressInfo::new(1.0, Duration::ZERO)));
    }

    #[test]
    fn test_console_zero_interval_logs_every_step() {
        let console = ConsoleProgressCallback { log_interval: 0 };
        assert!(console.should_log(&ProgressInfo::new(0.5, Duration::ZERO)));
        assert!(console.should_log(&ProgressInfo::new(0.37, Duration::ZERO)));
        console.on_progress(&ProgressInfo::new(0.5, Duration::ZERO));
    }

    #[test]
    fn test_progress_tracker() {
        let history = Arc::new(HistoryCallback::new());
        let mut tracker = ProgressTracker::new();
        assert!(tracker.is_empty());
        tracker.add_callback(history.clone());
        tracker.add_callback(Arc::new(ConsoleProgressCallback::default()));

        tracker.start();
        tracker.update(0.5);
        tracker.update(1.5);
        tracker.complete(JointStatistics::default());

        let reports = history.get_history();
        assert_eq!(reports.len(), 2);
        assert_eq!(reports[1].fraction, 1.0);
        assert_eq!(history.summaries().len(), 1);
    }
}
