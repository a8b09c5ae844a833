//! Elapsed time, words-per-minute, accuracy and progress derived from a
//! [`MatchCursor`] and a monotonic clock.
//!
//! Nothing here is stored between queries except the start/stop instants, so a
//! snapshot can be taken at any time and is identical for identical inputs.

use std::time::{Duration, Instant};

use crate::matcher::{MatchCursor, ReferenceText};

/// Standard word length used for words-per-minute
pub const CHARS_PER_WORD: f64 = 5.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub elapsed_ms: u64,
    pub wpm: u32,
    /// Percentage, 100 before the first keystroke
    pub accuracy: u32,
    /// Percentage of the reference text confirmed
    pub progress: u32,
}

impl Default for MetricsSnapshot {
    fn default() -> Self {
        Self {
            elapsed_ms: 0,
            wpm: 0,
            accuracy: 100,
            progress: 0,
        }
    }
}

impl MetricsSnapshot {
    /// Elapsed time as `MM:SS`
    pub fn clock(&self) -> String {
        let minutes = self.elapsed_ms / 60_000;
        let seconds = (self.elapsed_ms % 60_000) / 1000;
        format!("{minutes:02}:{seconds:02}")
    }
}

pub fn words_per_minute(position: usize, elapsed: Duration) -> u32 {
    let elapsed_minutes = elapsed.as_secs_f64() / 60.0;
    if elapsed_minutes == 0.0 {
        return 0;
    }
    ((position as f64 / CHARS_PER_WORD) / elapsed_minutes).round() as u32
}

pub fn accuracy(position: usize, error_count: usize) -> u32 {
    let total = position + error_count;
    if total == 0 {
        return 100;
    }
    ((position as f64 / total as f64) * 100.0).round() as u32
}

pub fn progress(position: usize, length: usize) -> u32 {
    if length == 0 {
        return 0;
    }
    ((position as f64 / length as f64) * 100.0).round() as u32
}

/// Start/stop timing for one typing session
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MetricsTracker {
    started_at: Option<Instant>,
    stopped_at: Option<Instant>,
}

impl MetricsTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Captures the start instant once. Returns true only on the call that started timing.
    pub fn start(&mut self, now: Instant) -> bool {
        if self.started_at.is_some() {
            return false;
        }
        self.started_at = Some(now);
        true
    }

    /// Freezes timing; later snapshots report the elapsed time up to `now`
    pub fn stop(&mut self, now: Instant) {
        if self.started_at.is_some() && self.stopped_at.is_none() {
            self.stopped_at = Some(now);
        }
    }

    pub fn has_started(&self) -> bool {
        self.started_at.is_some()
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped_at.is_some()
    }

    pub fn is_running(&self) -> bool {
        self.has_started() && !self.is_stopped()
    }

    pub fn elapsed(&self, now: Instant) -> Duration {
        match (self.started_at, self.stopped_at) {
            (None, _) => Duration::ZERO,
            (Some(start), Some(stop)) => stop.saturating_duration_since(start),
            (Some(start), None) => now.saturating_duration_since(start),
        }
    }

    pub fn snapshot(
        &self,
        cursor: &MatchCursor,
        text: &ReferenceText,
        now: Instant,
    ) -> MetricsSnapshot {
        let elapsed = self.elapsed(now);
        MetricsSnapshot {
            elapsed_ms: elapsed.as_millis() as u64,
            wpm: words_per_minute(cursor.position, elapsed),
            accuracy: accuracy(cursor.position, cursor.error_count),
            progress: progress(cursor.position, text.len()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matcher::submit_char;

    #[test]
    fn test_defaults_before_first_keystroke() {
        let tracker = MetricsTracker::new();
        let text = ReferenceText::new("hello");
        let snapshot = tracker.snapshot(&MatchCursor::new(), &text, Instant::now());

        assert_eq!(snapshot, MetricsSnapshot::default());
        assert_eq!(snapshot.accuracy, 100);
        assert_eq!(snapshot.wpm, 0);
        assert_eq!(snapshot.progress, 0);
    }

    #[test]
    fn test_wpm_hello_world_in_one_minute() {
        let text = ReferenceText::new("hello world");
        let mut cursor = MatchCursor::new();
        for c in "hello world".chars() {
            submit_char(&mut cursor, &text, c);
        }

        let start = Instant::now();
        let mut tracker = MetricsTracker::new();
        tracker.start(start);
        let snapshot = tracker.snapshot(&cursor, &text, start + Duration::from_secs(60));

        assert_eq!(snapshot.wpm, 2);
        assert_eq!(snapshot.progress, 100);
        assert_eq!(snapshot.elapsed_ms, 60_000);
    }

    #[test]
    fn test_accuracy_formula() {
        assert_eq!(accuracy(8, 2), 80);
        assert_eq!(accuracy(0, 0), 100);
        assert_eq!(accuracy(0, 3), 0);
        assert_eq!(accuracy(2, 1), 67);
    }

    #[test]
    fn test_progress_formula() {
        assert_eq!(progress(0, 0), 0);
        assert_eq!(progress(1, 3), 33);
        assert_eq!(progress(2, 3), 67);
    }

    #[test]
    fn test_wpm_zero_elapsed() {
        assert_eq!(words_per_minute(10, Duration::ZERO), 0);
    }

    #[test]
    fn test_start_is_idempotent() {
        let t0 = Instant::now();
        let mut tracker = MetricsTracker::new();

        assert!(tracker.start(t0));
        assert!(!tracker.start(t0 + Duration::from_secs(5)));
        assert_eq!(
            tracker.elapsed(t0 + Duration::from_secs(10)),
            Duration::from_secs(10)
        );
    }

    #[test]
    fn test_stop_freezes_elapsed() {
        let t0 = Instant::now();
        let mut tracker = MetricsTracker::new();
        tracker.start(t0);
        tracker.stop(t0 + Duration::from_secs(3));

        assert!(tracker.is_stopped());
        assert!(!tracker.is_running());
        assert_eq!(
            tracker.elapsed(t0 + Duration::from_secs(100)),
            Duration::from_secs(3)
        );
    }

    #[test]
    fn test_snapshot_idempotent() {
        let text = ReferenceText::new("abc");
        let mut cursor = MatchCursor::new();
        submit_char(&mut cursor, &text, 'a');
        submit_char(&mut cursor, &text, 'x');

        let t0 = Instant::now();
        let mut tracker = MetricsTracker::new();
        tracker.start(t0);
        let now = t0 + Duration::from_millis(1500);

        assert_eq!(
            tracker.snapshot(&cursor, &text, now),
            tracker.snapshot(&cursor, &text, now)
        );
    }

    #[test]
    fn test_clock_format() {
        let snapshot = MetricsSnapshot {
            elapsed_ms: 125_400,
            ..MetricsSnapshot::default()
        };
        assert_eq!(snapshot.clock(), "02:05");
        assert_eq!(MetricsSnapshot::default().clock(), "00:00");
    }
}
