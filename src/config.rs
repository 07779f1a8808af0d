//! TOML configuration for the catalogue.
//!
//! Every path under `[data]` is relative to `data.root` unless absolute.
//! Only `[data].root` is required; the rest falls back to the layout the
//! scraping pipeline produces.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub data: DataConfig,
    #[serde(default)]
    pub relevance: RelevanceConfig,
    #[serde(default)]
    pub site: SiteConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DataConfig {
    pub root: PathBuf,
    #[serde(default = "default_summaries_path")]
    pub summaries_path: PathBuf,
    #[serde(default = "default_details_path")]
    pub details_path: PathBuf,
    #[serde(default = "default_projects_csv")]
    pub projects_csv: PathBuf,
    #[serde(default = "default_projects_dir")]
    pub projects_dir: PathBuf,
    #[serde(default = "default_projects_glob")]
    pub projects_glob: String,
    #[serde(default = "default_summaries_dir")]
    pub summaries_dir: PathBuf,
}

fn default_summaries_path() -> PathBuf {
    PathBuf::from("raw/spp_programs_analyzed.json")
}
fn default_details_path() -> PathBuf {
    PathBuf::from("raw/spp_programs_detailed.json")
}
fn default_projects_csv() -> PathBuf {
    PathBuf::from("processed/all_projects.csv")
}
fn default_projects_dir() -> PathBuf {
    PathBuf::from("raw/projects")
}
fn default_projects_glob() -> String {
    "*.json".to_string()
}
fn default_summaries_dir() -> PathBuf {
    PathBuf::from("spp_summaries")
}

impl DataConfig {
    /// Resolves a configured path against `root`.
    pub fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct RelevanceConfig {
    /// Minimum per-domain score for the AI and wearables subsets.
    #[serde(default = "default_threshold")]
    pub threshold: f64,
}

impl Default for RelevanceConfig {
    fn default() -> Self {
        Self {
            threshold: default_threshold(),
        }
    }
}

fn default_threshold() -> f64 {
    1.0
}

#[derive(Debug, Deserialize, Clone)]
pub struct SiteConfig {
    /// Prefix for generated programme links, e.g. `/` or `/spp/`.
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
        }
    }
}

fn default_base_url() -> String {
    "/".to_string()
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

fn default_bind() -> String {
    "127.0.0.1:4321".to_string()
}

impl Config {
    /// Defaults for a data root in the working directory, used when no
    /// config file exists.
    pub fn minimal() -> Self {
        Self {
            data: DataConfig {
                root: PathBuf::from("./data"),
                summaries_path: default_summaries_path(),
                details_path: default_details_path(),
                projects_csv: default_projects_csv(),
                projects_dir: default_projects_dir(),
                projects_glob: default_projects_glob(),
                summaries_dir: default_summaries_dir(),
            },
            relevance: RelevanceConfig::default(),
            site: SiteConfig::default(),
            server: ServerConfig::default(),
        }
    }
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: Config = toml::from_str(&content).with_context(|| "Failed to parse config file")?;
    validate(&config)?;
    Ok(config)
}

fn validate(config: &Config) -> Result<()> {
    if config.data.root.as_os_str().is_empty() {
        anyhow::bail!("data.root must not be empty");
    }

    if config.data.projects_glob.trim().is_empty() {
        anyhow::bail!("data.projects_glob must not be empty");
    }

    if !(config.relevance.threshold > 0.0) {
        anyhow::bail!("relevance.threshold must be > 0");
    }

    let base = &config.site.base_url;
    if !base.starts_with('/') || !base.ends_with('/') {
        anyhow::bail!("site.base_url must start and end with '/', got '{}'", base);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_toml_uses_defaults() {
        let cfg: Config = toml::from_str("[data]\nroot = \"/srv/data\"\n").unwrap();
        assert!(validate(&cfg).is_ok());
        assert_eq!(cfg.relevance.threshold, 1.0);
        assert_eq!(cfg.site.base_url, "/");
        assert_eq!(
            cfg.data.resolve(&cfg.data.projects_csv),
            PathBuf::from("/srv/data/processed/all_projects.csv")
        );
    }

    #[test]
    fn test_absolute_paths_are_not_rebased() {
        let cfg: Config = toml::from_str(
            "[data]\nroot = \"/srv/data\"\nprojects_csv = \"/tmp/scores.csv\"\n",
        )
        .unwrap();
        assert_eq!(
            cfg.data.resolve(&cfg.data.projects_csv),
            PathBuf::from("/tmp/scores.csv")
        );
    }

    #[test]
    fn test_rejects_bad_base_url() {
        let cfg: Config =
            toml::from_str("[data]\nroot = \"d\"\n[site]\nbase_url = \"spp\"\n").unwrap();
        let err = validate(&cfg).unwrap_err();
        assert!(err.to_string().contains("site.base_url"));
    }

    #[test]
    fn test_rejects_non_positive_threshold() {
        let cfg: Config =
            toml::from_str("[data]\nroot = \"d\"\n[relevance]\nthreshold = 0.0\n").unwrap();
        assert!(validate(&cfg).is_err());
    }
}
