use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;

pub mod defaults;

use defaults::*;

use crate::errors::{AppError, AppResult};
use crate::extract::AnchorFilter;
use crate::models::{ChannelTarget, MergePolicy};
use crate::scoring::ScoringWeights;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default)]
    pub extraction: ExtractionConfig,
    #[serde(default)]
    pub scoring: ScoringConfig,
    #[serde(default)]
    pub update: UpdateConfig,
    #[serde(default)]
    pub aggregate: AggregateConfig,
    pub catalog: Option<CatalogConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Per-request timeout, humantime format ("20s", "1m")
    #[serde(default = "default_http_timeout")]
    pub timeout: String,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// Extra headers sent with every request
    #[serde(default)]
    pub headers: HashMap<String, String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExtractionConfig {
    #[serde(default)]
    pub anchor_filter: AnchorFilter,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScoringConfig {
    #[serde(default)]
    pub weights: ScoringWeights,
    /// Hosts (and their subdomains) known to serve real streams
    #[serde(default)]
    pub provider_domains: Vec<String>,
}

/// Single-channel flow: resolve each channel from its page and reconcile it
/// into the playlist
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateConfig {
    #[serde(default = "default_update_output")]
    pub output_path: PathBuf,
    #[serde(default = "default_merge_in_place")]
    pub policy: MergePolicy,
    #[serde(default)]
    pub channels: Vec<ChannelConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChannelConfig {
    /// Name as written in the playlist
    pub name: String,
    /// Identifier the site uses in its URLs, if it differs from the name
    pub slug: Option<String>,
    /// Page the stream link is scraped from
    pub page_url: String,
}

/// Multi-source flow: pull remote playlists and keep tagged entries
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AggregateConfig {
    #[serde(default = "default_aggregate_output")]
    pub output_path: PathBuf,
    #[serde(default = "default_replace")]
    pub policy: MergePolicy,
    #[serde(default)]
    pub sources: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Catalog flow: discover channels on a collection page and query
/// endpoints for their streams
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    pub page_url: String,
    #[serde(default = "default_catalog_output")]
    pub output_path: PathBuf,
    #[serde(default = "default_replace")]
    pub policy: MergePolicy,
    /// Endpoint templates with an `{id}` placeholder
    #[serde(default)]
    pub api_templates: Vec<String>,
    /// Endpoint templates with a `{slug}` placeholder
    #[serde(default)]
    pub slug_templates: Vec<String>,
}

fn default_http_timeout() -> String {
    DEFAULT_HTTP_TIMEOUT.to_string()
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

fn default_update_output() -> PathBuf {
    PathBuf::from(DEFAULT_UPDATE_OUTPUT)
}

fn default_aggregate_output() -> PathBuf {
    PathBuf::from(DEFAULT_AGGREGATE_OUTPUT)
}

fn default_catalog_output() -> PathBuf {
    PathBuf::from(DEFAULT_CATALOG_OUTPUT)
}

fn default_merge_in_place() -> MergePolicy {
    MergePolicy::MergeInPlace
}

fn default_replace() -> MergePolicy {
    MergePolicy::Replace
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout: default_http_timeout(),
            user_agent: default_user_agent(),
            headers: HashMap::new(),
        }
    }
}

impl Default for UpdateConfig {
    fn default() -> Self {
        Self {
            output_path: default_update_output(),
            policy: default_merge_in_place(),
            channels: Vec::new(),
        }
    }
}

impl Default for AggregateConfig {
    fn default() -> Self {
        Self {
            output_path: default_aggregate_output(),
            policy: default_replace(),
            sources: Vec::new(),
            tags: Vec::new(),
        }
    }
}

impl HttpConfig {
    pub fn timeout(&self) -> AppResult<Duration> {
        humantime::parse_duration(&self.timeout)
            .map_err(|e| AppError::config(format!("invalid http.timeout '{}': {e}", self.timeout)))
    }
}

impl ChannelConfig {
    pub fn target(&self) -> ChannelTarget {
        ChannelTarget {
            name: self.name.clone(),
            slug: self.slug.clone(),
        }
    }
}

impl Config {
    pub fn load_from_file(config_file: &str) -> Result<Self> {
        let config = if std::path::Path::new(&config_file).exists() {
            let contents = std::fs::read_to_string(config_file)
                .with_context(|| format!("reading {config_file}"))?;
            toml::from_str(&contents).with_context(|| format!("parsing {config_file}"))?
        } else {
            let default_config = Self::default();
            let contents = toml::to_string_pretty(&default_config)?;
            std::fs::write(config_file, contents)?;
            info!("Created default config file: {}", config_file);
            default_config
        };

        let config: Config = config;
        config.validate()?;
        Ok(config)
    }

    /// Reject values that would only fail later, mid-run
    pub fn validate(&self) -> Result<()> {
        self.http.timeout()?;

        for channel in &self.update.channels {
            if channel.name.trim().is_empty() {
                bail!("update.channels: channel name must not be empty");
            }
            check_url("update.channels.page_url", &channel.page_url)?;
        }
        for source in &self.aggregate.sources {
            check_url("aggregate.sources", source)?;
        }
        if let Some(catalog) = &self.catalog {
            check_url("catalog.page_url", &catalog.page_url)?;
            for template in &catalog.api_templates {
                if !template.contains("{id}") {
                    bail!("catalog.api_templates: '{template}' has no {{id}} placeholder");
                }
            }
            for template in &catalog.slug_templates {
                if !template.contains("{slug}") {
                    bail!("catalog.slug_templates: '{template}' has no {{slug}} placeholder");
                }
            }
        }
        Ok(())
    }
}

fn check_url(field: &str, value: &str) -> Result<()> {
    url::Url::parse(value)
        .map(|_| ())
        .with_context(|| format!("{field}: invalid URL '{value}'"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const SAMPLE: &str = r#"
[http]
timeout = "5s"
user_agent = "test-agent"

[http.headers]
Referer = "https://tv.example.com/"

[extraction]
anchor_filter = "all"

[scoring]
provider_domains = ["cdn.example.tv"]

[scoring.weights]
slug = 70

[update]
output_path = "out/test.m3u"

[[update.channels]]
name = "ТНТ +2"
slug = "tnt2"
page_url = "https://tv.example.com/live"

[aggregate]
sources = ["https://lists.example.com/a.m3u", "https://lists.example.com/b.m3u"]
tags = ["ТНТ"]
policy = "merge_in_place"

[catalog]
page_url = "https://tv.example.com/collections/free"
api_templates = ["https://api.example.com/channels/{id}"]
"#;

    #[test]
    fn test_parse_sample() {
        let config: Config = toml::from_str(SAMPLE).unwrap();
        config.validate().unwrap();

        assert_eq!(config.http.timeout().unwrap(), Duration::from_secs(5));
        assert_eq!(config.http.headers["Referer"], "https://tv.example.com/");
        assert_eq!(config.extraction.anchor_filter, AnchorFilter::All);
        assert_eq!(config.scoring.weights.slug, 70);
        assert_eq!(config.scoring.weights.keyword, 10);
        assert_eq!(config.update.policy, MergePolicy::MergeInPlace);
        assert_eq!(config.update.channels[0].target().slug_source(), "tnt2");
        assert_eq!(config.aggregate.policy, MergePolicy::MergeInPlace);
        let catalog = config.catalog.unwrap();
        assert_eq!(catalog.policy, MergePolicy::Replace);
        assert!(catalog.slug_templates.is_empty());
    }

    #[test]
    fn test_missing_file_writes_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        let path = path.to_str().unwrap();

        let config = Config::load_from_file(path).unwrap();
        assert_eq!(config.http.timeout, DEFAULT_HTTP_TIMEOUT);
        assert_eq!(config.aggregate.policy, MergePolicy::Replace);

        let reloaded = Config::load_from_file(path).unwrap();
        assert_eq!(reloaded.update.output_path, PathBuf::from(DEFAULT_UPDATE_OUTPUT));
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = Config::default();
        config.http.timeout = "soon".to_string();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.aggregate.sources.push("not a url".to_string());
        assert!(config.validate().is_err());

        let config: Config = toml::from_str(
            "[catalog]\npage_url = \"https://tv.example.com/\"\napi_templates = [\"https://api.example.com/x\"]\n",
        )
        .unwrap();
        assert!(config.validate().is_err());
    }
}
