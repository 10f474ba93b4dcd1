//! Scraper runtime configuration.

use std::time::Duration;

/// Runtime configuration for the listing scraper.
///
/// Built by the CLI from its config file plus flag overrides; no
/// module-level state anywhere in the pipeline.
#[derive(Debug, Clone)]
pub struct ScrapeConfig {
    /// Base URL of the listing source (trailing slash included)
    pub base_url: String,
    /// User-agent the source requires
    pub user_agent: String,
    /// Per-request timeout
    pub timeout: Duration,
    /// Total attempts per page, transient failures included
    pub max_attempts: u32,
    /// Worker threads for scanning days in parallel
    pub workers: usize,
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self {
            base_url: "https://www.release.tdnet.info/inbs/".to_string(),
            user_agent: concat!(
                "Mozilla/5.0 (Windows NT 10.0; Win64; x64) ",
                "AppleWebKit/537.36 (KHTML, like Gecko) ",
                "Chrome/123.0.0.0 Safari/537.36",
            )
            .to_string(),
            timeout: Duration::from_secs(20),
            max_attempts: 3,
            workers: 4,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = ScrapeConfig::default();
        assert!(config.base_url.ends_with('/'));
        assert_eq!(config.max_attempts, 3);
        assert_eq!(config.timeout, Duration::from_secs(20));
        assert!(config.workers >= 1);
    }
}
