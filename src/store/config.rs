//! Store Configuration
//!
//! Construction-time settings for an engine instance. The engine is
//! embedded, so configuration is a plain struct owned by the caller; there
//! is no file or environment layer.

use std::path::PathBuf;
use std::time::Duration;

/// Engine configuration
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Directory holding the log pair (default: current directory)
    pub data_dir: PathBuf,

    /// Interval between expiry sweeps (default: 60s)
    pub reap_interval: Duration,

    /// Whether to spawn the background reaper (default: true)
    pub run_reaper: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("."),
            reap_interval: Duration::from_secs(60),
            run_reaper: true,
        }
    }
}

impl StoreConfig {
    /// Create a config for the given directory, defaults otherwise
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            ..Default::default()
        }
    }

    /// Disable the background reaper; expiry still happens on read and
    /// during compaction
    pub fn without_reaper(mut self) -> Self {
        self.run_reaper = false;
        self
    }

    /// Override the sweep interval
    pub fn with_reap_interval(mut self, interval: Duration) -> Self {
        self.reap_interval = interval;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = StoreConfig::default();
        assert_eq!(config.data_dir, PathBuf::from("."));
        assert_eq!(config.reap_interval, Duration::from_secs(60));
        assert!(config.run_reaper);
    }

    #[test]
    fn test_builder_helpers() {
        let config = StoreConfig::new("/tmp/db")
            .without_reaper()
            .with_reap_interval(Duration::from_millis(50));

        assert_eq!(config.data_dir, PathBuf::from("/tmp/db"));
        assert!(!config.run_reaper);
        assert_eq!(config.reap_interval, Duration::from_millis(50));
    }
}
