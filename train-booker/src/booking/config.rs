//! Refresh timing for the booking loop.

use std::time::Duration;

/// Timing parameters for the booking loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingConfig {
    /// Shortest wait between passes (milliseconds).
    pub refresh_min_ms: u64,

    /// Longest wait between passes (milliseconds).
    /// The actual wait is drawn uniformly from the window so requests do
    /// not arrive on a fixed period.
    pub refresh_max_ms: u64,

    /// Pause after resubmitting a search before reading rows (milliseconds).
    pub settle_ms: u64,
}

impl BookingConfig {
    /// Create a new configuration with the given parameters.
    pub fn new(refresh_min_ms: u64, refresh_max_ms: u64, settle_ms: u64) -> Self {
        Self {
            refresh_min_ms,
            refresh_max_ms,
            settle_ms,
        }
    }

    /// Set the refresh window.
    pub fn with_refresh_window(mut self, min: Duration, max: Duration) -> Self {
        self.refresh_min_ms = duration_ms(min);
        self.refresh_max_ms = duration_ms(max);
        self
    }

    /// Set the settle pause.
    pub fn with_settle(mut self, settle: Duration) -> Self {
        self.settle_ms = duration_ms(settle);
        self
    }

    /// Returns the shortest refresh wait as a Duration.
    pub fn refresh_min(&self) -> Duration {
        Duration::from_millis(self.refresh_min_ms)
    }

    /// Returns the longest refresh wait as a Duration.
    pub fn refresh_max(&self) -> Duration {
        Duration::from_millis(self.refresh_max_ms)
    }

    /// Returns the settle pause as a Duration.
    pub fn settle(&self) -> Duration {
        Duration::from_millis(self.settle_ms)
    }
}

impl Default for BookingConfig {
    fn default() -> Self {
        Self {
            refresh_min_ms: 2_000,
            refresh_max_ms: 4_000,
            settle_ms: 500,
        }
    }
}

fn duration_ms(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = BookingConfig::default();

        assert_eq!(config.refresh_min_ms, 2_000);
        assert_eq!(config.refresh_max_ms, 4_000);
        assert_eq!(config.settle_ms, 500);
    }

    #[test]
    fn duration_methods() {
        let config = BookingConfig::default();

        assert_eq!(config.refresh_min(), Duration::from_secs(2));
        assert_eq!(config.refresh_max(), Duration::from_secs(4));
        assert_eq!(config.settle(), Duration::from_millis(500));
    }

    #[test]
    fn builder_setters() {
        let config = BookingConfig::default()
            .with_refresh_window(Duration::from_secs(5), Duration::from_secs(9))
            .with_settle(Duration::ZERO);

        assert_eq!(config, BookingConfig::new(5_000, 9_000, 0));
    }
}
