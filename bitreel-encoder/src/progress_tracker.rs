//! Progress tracking with ETA estimation

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

/// Thread-safe progress counter that reports through `log`.
///
/// Shared by reference across rayon workers; each finished item calls
/// [`ProgressTracker::increment`].
pub struct ProgressTracker {
    total: u64,
    processed: AtomicU64,
    start_time: Instant,
    label: String,
    report_interval: u64,
}

impl ProgressTracker {
    /// Creates a tracker that reports every `report_interval` items
    pub fn new(total: u64, label: &str, report_interval: u64) -> Self {
        Self {
            total,
            processed: AtomicU64::new(0),
            start_time: Instant::now(),
            label: label.to_string(),
            report_interval: report_interval.max(1),
        }
    }

    /// Items processed so far
    pub fn processed(&self) -> u64 {
        self.processed.load(Ordering::Relaxed)
    }

    /// Counts one finished item and reports on interval boundaries
    pub fn increment(&self) {
        let current = self.processed.fetch_add(1, Ordering::Relaxed) + 1;
        if current % self.report_interval == 0 || current == self.total {
            self.report(current);
        }
    }

    fn report(&self, current: u64) {
        let elapsed_secs = self.start_time.elapsed().as_secs_f64();

        if current < self.total {
            let percent = current as f64 / self.total as f64 * 100.0;
            let rate = current as f64 / elapsed_secs.max(f64::EPSILON);
            let remaining = (self.total - current) as f64 / rate;
            log::info!(
                "{} {}/{} ({:.1}%) - elapsed: {} - ETA: {}",
                self.label,
                current,
                self.total,
                percent,
                format_duration(elapsed_secs),
                format_duration(remaining),
            );
        } else {
            log::info!(
                "{} {}/{} (100.0%) - completed in {}",
                self.label,
                current,
                self.total,
                format_duration(elapsed_secs),
            );
        }
    }
}

/// Formats seconds into a human-readable duration string
pub fn format_duration(secs: f64) -> String {
    if secs < 60.0 {
        format!("{:.1}s", secs)
    } else if secs < 3600.0 {
        let mins = (secs / 60.0).floor() as u64;
        let remaining = secs - (mins as f64 * 60.0);
        format!("{}m {:.0}s", mins, remaining)
    } else {
        let hours = (secs / 3600.0).floor() as u64;
        let remaining = secs - (hours as f64 * 3600.0);
        let mins = (remaining / 60.0).floor() as u64;
        format!("{}h {}m {:.0}s", hours, mins, remaining - mins as f64 * 60.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rayon::prelude::*;

    #[test]
    fn test_counts_across_threads() {
        let tracker = ProgressTracker::new(100, "Frames", 10);
        (0..100).into_par_iter().for_each(|_| tracker.increment());
        assert_eq!(tracker.processed(), 100);
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(4.3), "4.3s");
        assert_eq!(format_duration(125.0), "2m 5s");
        assert_eq!(format_duration(3725.0), "1h 2m 5s");
    }
}
