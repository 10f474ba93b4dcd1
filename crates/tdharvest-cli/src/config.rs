//! Configuration loading from TOML files

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;
use tdharvest_scrape::ScrapeConfig;

/// Global configuration for tdharvest
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub source: SourceSection,
    pub store: StoreSection,
    pub output: OutputSection,
    pub http: HttpSection,
    pub workers: WorkersSection,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SourceSection {
    pub base_url: String,
    pub user_agent: String,
}

impl Default for SourceSection {
    fn default() -> Self {
        let d = ScrapeConfig::default();
        Self {
            base_url: d.base_url,
            user_agent: d.user_agent,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StoreSection {
    pub db_path: PathBuf,
}

impl Default for StoreSection {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from("tdnet.duckdb"),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputSection {
    pub dir: PathBuf,
}

impl Default for OutputSection {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("."),
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct HttpSection {
    pub timeout_secs: u64,
    pub max_attempts: u32,
}

impl Default for HttpSection {
    fn default() -> Self {
        Self {
            timeout_secs: 20,
            max_attempts: 3,
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct WorkersSection {
    pub scan: usize,
    pub max: usize,
}

impl Default for WorkersSection {
    fn default() -> Self {
        Self { scan: 4, max: 16 }
    }
}

impl Config {
    /// Load configuration from default locations
    ///
    /// Search order:
    /// 1. ./tdharvest.toml (current directory)
    /// 2. ~/.config/tdharvest/config.toml
    ///
    /// If no config file found, returns default config.
    pub fn load() -> Result<Self> {
        let local_config = PathBuf::from("tdharvest.toml");
        if local_config.exists() {
            return Self::from_file(&local_config);
        }

        if let Some(config_dir) = directories::ProjectDirs::from("", "", "tdharvest") {
            let user_config = config_dir.config_dir().join("config.toml");
            if user_config.exists() {
                return Self::from_file(&user_config);
            }
        }

        log::debug!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Load configuration from a specific file
    pub fn from_file(path: &PathBuf) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Scraper configuration with an optional worker-count override,
    /// clamped to the configured maximum.
    pub fn scrape_config(&self, workers: Option<usize>) -> ScrapeConfig {
        ScrapeConfig {
            base_url: self.source.base_url.clone(),
            user_agent: self.source.user_agent.clone(),
            timeout: Duration::from_secs(self.http.timeout_secs),
            max_attempts: self.http.max_attempts,
            workers: workers
                .unwrap_or(self.workers.scan)
                .clamp(1, self.workers.max),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = Config::default();
        assert!(config.source.base_url.starts_with("https://"));
        assert_eq!(config.store.db_path, PathBuf::from("tdnet.duckdb"));
        assert_eq!(config.http.timeout_secs, 20);
        assert_eq!(config.http.max_attempts, 3);
        assert!(config.workers.scan >= 1);
    }

    #[test]
    fn parse_config_toml() {
        let toml = r#"
[source]
base_url = "https://mirror.example/inbs/"

[store]
db_path = "/data/tdnet.duckdb"

[http]
timeout_secs = 10

[workers]
scan = 2
max = 8
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.source.base_url, "https://mirror.example/inbs/");
        assert_eq!(config.store.db_path, PathBuf::from("/data/tdnet.duckdb"));
        assert_eq!(config.http.timeout_secs, 10);
        // Unset sections keep defaults
        assert_eq!(config.http.max_attempts, 3);
        assert_eq!(config.workers.scan, 2);
    }

    #[test]
    fn scrape_config_clamps_workers() {
        let config = Config::default();
        assert_eq!(config.scrape_config(Some(999)).workers, config.workers.max);
        assert_eq!(config.scrape_config(Some(0)).workers, 1);
        assert_eq!(config.scrape_config(None).workers, config.workers.scan);
    }
}
