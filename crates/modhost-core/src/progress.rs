//! Progress Monitor
//!
//! Converts raw load-progress signals into a 0-100% indicator.
//! [`compute_percent`] is pure; the lifecycle machine calls it on every
//! progress tick and forces 100% on explicit load completion.

/// Percentage reported when a load completes or progress is indeterminate.
pub const COMPLETE_PERCENT: f64 = 100.0;

/// A single progress observation. Transient, never persisted.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ProgressSample {
    pub loaded_bytes: Option<f64>,
    pub total_bytes: Option<f64>,
    pub dependencies_remaining: Option<u32>,
}

impl ProgressSample {
    /// Sample with known byte counts.
    pub fn bytes(loaded: f64, total: f64) -> Self {
        Self {
            loaded_bytes: Some(loaded),
            total_bytes: Some(total),
            dependencies_remaining: None,
        }
    }

    /// Build a sample from a platform progress event.
    ///
    /// When `length_computable` is false the byte counts are meaningless
    /// and are dropped.
    pub fn from_event(length_computable: bool, loaded: f64, total: f64) -> Self {
        if length_computable {
            Self::bytes(loaded, total)
        } else {
            Self::default()
        }
    }

    /// Sample carrying only a dependency counter tick.
    pub fn dependencies(remaining: u32) -> Self {
        Self {
            dependencies_remaining: Some(remaining),
            ..Self::default()
        }
    }
}

/// Compute the load percentage for a sample, always within `[0, 100]`.
///
/// Indeterminate progress (no byte counts, or a total of zero or less)
/// reports 100 rather than 0 so the bar never looks stuck.
pub fn compute_percent(sample: &ProgressSample) -> f64 {
    match (sample.loaded_bytes, sample.total_bytes) {
        (Some(loaded), Some(total)) if total > 0.0 => {
            let percent = 100.0 * loaded / total;
            if percent.is_nan() {
                COMPLETE_PERCENT
            } else {
                percent.clamp(0.0, 100.0)
            }
        }
        _ => COMPLETE_PERCENT,
    }
}

/// Extract a byte-progress sample from a runtime status line.
///
/// Binary-module runtimes report download progress as free text ending
/// in a `(loaded/total)` group, e.g. `"Downloading data... (120/4096)"`.
pub fn parse_status_progress(text: &str) -> Option<ProgressSample> {
    let open = text.rfind('(')?;
    let close = open + text[open..].find(')')?;
    let (loaded, total) = text[open + 1..close].split_once('/')?;
    let loaded: f64 = loaded.trim().parse().ok()?;
    let total: f64 = total.trim().parse().ok()?;
    Some(ProgressSample::bytes(loaded, total))
}

/// Tracks the dependency counter reported by binary-module runtimes.
///
/// Runtimes report only the number of outstanding dependencies; the
/// total is the high-water mark seen so far.
#[derive(Clone, Debug, Default)]
pub struct DependencyTracker {
    total: u32,
    remaining: u32,
}

impl DependencyTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a counter tick and return the status line to display.
    pub fn update(&mut self, remaining: u32) -> String {
        self.total = self.total.max(remaining);
        self.remaining = remaining;
        self.status_text()
    }

    pub fn total(&self) -> u32 {
        self.total
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    pub fn is_resolved(&self) -> bool {
        self.remaining == 0
    }

    fn status_text(&self) -> String {
        if self.remaining == 0 {
            "All downloads complete.".to_string()
        } else {
            format!(
                "Preparing... ({}/{})",
                self.total - self.remaining,
                self.total
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percent_exact_ratio() {
        assert!((compute_percent(&ProgressSample::bytes(250.0, 1000.0)) - 25.0).abs() < 1e-9);
        assert!((compute_percent(&ProgressSample::bytes(1.0, 3.0)) - 100.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_percent_monotonic_in_loaded() {
        let total = 4096.0;
        let mut last = 0.0;
        for loaded in (0..=4096).step_by(64) {
            let p = compute_percent(&ProgressSample::bytes(loaded as f64, total));
            assert!(p >= last, "{} < {} at loaded={}", p, last, loaded);
            last = p;
        }
        assert_eq!(last, 100.0);
    }

    #[test]
    fn test_percent_indeterminate_is_complete() {
        assert_eq!(compute_percent(&ProgressSample::default()), 100.0);
        assert_eq!(compute_percent(&ProgressSample::from_event(false, 10.0, 100.0)), 100.0);
        assert_eq!(compute_percent(&ProgressSample::bytes(10.0, 0.0)), 100.0);
        assert_eq!(compute_percent(&ProgressSample::bytes(10.0, -5.0)), 100.0);
        assert_eq!(compute_percent(&ProgressSample::dependencies(3)), 100.0);
    }

    #[test]
    fn test_percent_clamped() {
        assert_eq!(compute_percent(&ProgressSample::bytes(2000.0, 1000.0)), 100.0);
        assert_eq!(compute_percent(&ProgressSample::bytes(-10.0, 1000.0)), 0.0);
    }

    #[test]
    fn test_parse_status_progress() {
        let sample = parse_status_progress("Downloading data... (120/4096)").unwrap();
        assert_eq!(sample, ProgressSample::bytes(120.0, 4096.0));
        assert!(parse_status_progress("Running...").is_none());
        assert!(parse_status_progress("Downloading (abc/4096)").is_none());
        assert!(parse_status_progress("Broken (12/").is_none());
    }

    #[test]
    fn test_dependency_tracker_status() {
        let mut deps = DependencyTracker::new();
        assert_eq!(deps.update(4), "Preparing... (0/4)");
        assert_eq!(deps.update(1), "Preparing... (3/4)");
        // Late-registered dependency does not shrink the total
        assert_eq!(deps.update(2), "Preparing... (2/4)");
        assert_eq!(deps.update(0), "All downloads complete.");
        assert!(deps.is_resolved());
        assert_eq!(deps.total(), 4);
    }
}
