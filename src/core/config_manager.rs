// src/core/config_manager.rs
//! Configuration: config.yaml section for the current ENVIRONMENT, then
//! environment variable overrides.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::extraction::{SelectorStrategy, DEFAULT_SETTLE_DELAY_MS};

pub const CONFIG_FILE: &str = "config.yaml";

#[derive(Debug, Clone)]
pub struct ConfigManager {
    pub environment: String,
    pub paths: PathsConfig,
    pub service: ServiceConfig,
    pub extraction: ExtractionConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    pub database_path: PathBuf,
    pub log_path: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            database_path: PathBuf::from("apply_assist.db"),
            log_path: PathBuf::from("/tmp/apply-assist.log"),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub generation_url: String,
    pub timeout_seconds: u64,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            generation_url: "http://127.0.0.1:8000".to_string(),
            timeout_seconds: 60,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    pub settle_delay_ms: u64,
    pub fetch_timeout_seconds: u64,
    pub selectors: SelectorStrategy,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            settle_delay_ms: DEFAULT_SETTLE_DELAY_MS,
            fetch_timeout_seconds: 30,
            selectors: SelectorStrategy::default(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct EnvironmentSection {
    paths: PathsConfig,
    service: ServiceConfig,
    extraction: ExtractionConfig,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ConfigFile {
    local: EnvironmentSection,
    production: EnvironmentSection,
}

impl ConfigManager {
    /// Load from an explicit file; a missing file means built-in defaults.
    pub fn load_from(path: &Path, env: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let environment = env("ENVIRONMENT").unwrap_or_else(|| "local".to_string());

        let config_file = if path.exists() {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            serde_yaml::from_str::<ConfigFile>(&content)
                .with_context(|| format!("Failed to parse {}", path.display()))?
        } else {
            ConfigFile::default()
        };

        let section = match environment.as_str() {
            "production" => config_file.production,
            _ => config_file.local,
        };

        let mut config = Self {
            environment,
            paths: section.paths,
            service: section.service,
            extraction: section.extraction,
        };
        config.apply_overrides(env);
        config.paths.database_path = config.resolve_path(&config.paths.database_path)?;
        config.paths.log_path = config.resolve_path(&config.paths.log_path)?;
        Ok(config)
    }

    fn apply_overrides(&mut self, env: impl Fn(&str) -> Option<String>) {
        if let Some(url) = env("GENERATION_SERVICE_URL") {
            self.service.generation_url = url;
        }
        if let Some(path) = env("PROFILE_DB_PATH") {
            self.paths.database_path = PathBuf::from(path);
        }
        if let Some(path) = env("APPLY_ASSIST_LOG") {
            self.paths.log_path = PathBuf::from(path);
        }
    }

    fn resolve_path(&self, path: &Path) -> Result<PathBuf> {
        if path.is_absolute() {
            return Ok(path.to_path_buf());
        }
        let base_dir = if self.environment == "production" {
            PathBuf::from("/app")
        } else {
            std::env::current_dir().context("Failed to get current directory")?
        };
        Ok(base_dir.join(path))
    }

    /// Ensure the database and log directories exist
    pub async fn ensure_directories(&self) -> Result<()> {
        use crate::core::FsOps;

        for path in [&self.paths.database_path, &self.paths.log_path] {
            if let Some(parent) = path.parent() {
                FsOps::ensure_dir_exists(parent).await?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::tempdir;

    fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn missing_file_uses_defaults() {
        let dir = tempdir().unwrap();
        let config = ConfigManager::load_from(&dir.path().join("config.yaml"), env_from(&[])).unwrap();
        assert_eq!(config.environment, "local");
        assert_eq!(config.service.generation_url, "http://127.0.0.1:8000");
        assert_eq!(config.extraction.settle_delay_ms, DEFAULT_SETTLE_DELAY_MS);
        assert_eq!(config.paths.log_path, PathBuf::from("/tmp/apply-assist.log"));
        assert!(config.paths.database_path.is_absolute());
    }

    #[test]
    fn environment_selects_section() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(
            &path,
            r#"
local:
  service:
    generation_url: http://localhost:9000
production:
  paths:
    database_path: data/profile.db
  service:
    generation_url: https://assist.example.com
    timeout_seconds: 15
  extraction:
    settle_delay_ms: 2500
"#,
        )
        .unwrap();

        let local = ConfigManager::load_from(&path, env_from(&[])).unwrap();
        assert_eq!(local.service.generation_url, "http://localhost:9000");
        assert_eq!(local.service.timeout_seconds, 60);

        let prod = ConfigManager::load_from(&path, env_from(&[("ENVIRONMENT", "production")])).unwrap();
        assert_eq!(prod.service.generation_url, "https://assist.example.com");
        assert_eq!(prod.service.timeout_seconds, 15);
        assert_eq!(prod.extraction.settle_delay_ms, 2500);
        assert_eq!(prod.paths.database_path, PathBuf::from("/app/data/profile.db"));
        assert_eq!(prod.extraction.selectors, SelectorStrategy::default());
    }

    #[test]
    fn env_overrides_win_over_file() {
        let dir = tempdir().unwrap();
        let config = ConfigManager::load_from(
            &dir.path().join("config.yaml"),
            env_from(&[
                ("GENERATION_SERVICE_URL", "http://10.0.0.5:8000"),
                ("PROFILE_DB_PATH", "/var/lib/assist/profile.db"),
                ("APPLY_ASSIST_LOG", "/var/log/assist.log"),
            ]),
        )
        .unwrap();
        assert_eq!(config.service.generation_url, "http://10.0.0.5:8000");
        assert_eq!(config.paths.database_path, PathBuf::from("/var/lib/assist/profile.db"));
        assert_eq!(config.paths.log_path, PathBuf::from("/var/log/assist.log"));
    }

    #[test]
    fn shipped_config_uses_the_same_sites_in_every_environment() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join(CONFIG_FILE);
        let local = ConfigManager::load_from(&path, env_from(&[])).unwrap();
        let prod = ConfigManager::load_from(&path, env_from(&[("ENVIRONMENT", "production")])).unwrap();

        assert_eq!(local.extraction.selectors, prod.extraction.selectors);
        assert_eq!(prod.extraction.selectors.sites.len(), 6);
        assert!(prod.extraction.selectors.site_for("www.indeed.com").is_some());
        assert!(prod
            .extraction
            .selectors
            .site_for("www.linkedin.com")
            .unwrap()
            .job_description
            .iter()
            .any(|selector| selector == ".show-more-less-html__markup"));
        assert_eq!(prod.extraction.settle_delay_ms, 2000);
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "local: [not, a, mapping").unwrap();
        assert!(ConfigManager::load_from(&path, env_from(&[])).is_err());
    }
}
