/*!
common/src/lib.rs

Shared configuration types for Newsping.

This file provides:
- Config data structures (deserialized from TOML)
- An async loader for a TOML config file, with default/override merging
*/

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Crawler configuration (ranking page to pull headlines from)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrawlerConfig {
    /// Ranking page URL, e.g. "https://media.naver.com/press/052/ranking"
    pub base_url: String,
    pub user_agent: Option<String>,
    /// Ranking type appended as ?type=..., e.g. "popular"
    pub category: Option<String>,
    /// How many headlines to take from the top of the ranking
    pub limit: Option<usize>,
}

/// Politeness / fetching configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchConfig {
    pub timeout_seconds: Option<u64>,
}

/// Remote LLM config (used if `llm.adapter = "remote"`)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteLlmConfig {
    pub api_url: Option<String>,
    pub api_key_env: Option<String>,
    pub model: Option<String>,
    pub timeout_seconds: Option<u64>,
    pub max_tokens: Option<usize>,
}

/// LLM top-level config grouping adapter selection and remote specifics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    pub adapter: Option<String>, // "remote", "dummy"
    pub remote: Option<RemoteLlmConfig>,
}

/// KakaoTalk delivery configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KakaoConfig {
    /// Friends default-send endpoint
    pub api_url: Option<String>,
    /// Self-memo endpoint, used when no receiver UUIDs are configured
    pub memo_api_url: Option<String>,
    /// Name of the env var holding the access token
    pub token_env: Option<String>,
    #[serde(default)]
    pub receiver_uuids: Vec<String>,
    pub template_id: Option<String>,
}

/// Message rendering defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageConfig {
    /// Advisory summary length passed into the summarization prompt
    pub max_summary_length: Option<usize>,
    /// How many keywords the prompt asks the model for
    pub max_keywords: Option<usize>,
}

/// Top-level application configuration (deserialized from config.toml)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub crawler: CrawlerConfig,
    pub fetch: Option<FetchConfig>,
    pub llm: Option<LlmConfig>,
    pub kakao: Option<KakaoConfig>,
    pub message: Option<MessageConfig>,
}

impl Config {
    /// Load configuration from a TOML file asynchronously.
    ///
    /// Example:
    ///   let cfg = Config::from_file("config.toml").await?;
    pub async fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let data = tokio::fs::read_to_string(path.as_ref())
            .await
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;
        let cfg: Config = toml::from_str(&data).context("Failed to parse TOML configuration")?;
        Ok(cfg)
    }

    /// Load configuration with an optional default file and an optional override file.
    /// If both are present, they are merged (override takes precedence).
    pub async fn load_with_defaults(default_path: Option<&Path>, override_path: Option<&Path>) -> Result<Self> {
        let mut config_value = toml::Value::Table(toml::map::Map::new());

        if let Some(path) = default_path {
            if path.exists() {
                let data = tokio::fs::read_to_string(path).await
                    .with_context(|| format!("Failed to read default config: {}", path.display()))?;
                let val: toml::Value = toml::from_str(&data)
                    .context("Failed to parse default configuration")?;
                merge_toml(&mut config_value, val);
            }
        }

        if let Some(path) = override_path {
            if path.exists() {
                let data = tokio::fs::read_to_string(path).await
                    .with_context(|| format!("Failed to read override config: {}", path.display()))?;
                let val: toml::Value = toml::from_str(&data)
                    .context("Failed to parse override configuration")?;
                merge_toml(&mut config_value, val);
            }
        }

        let cfg: Config = config_value.try_into().context("Failed to parse merged configuration")?;
        Ok(cfg)
    }

    /// Effective fetch timeout with the project-wide default.
    pub fn fetch_timeout_seconds(&self) -> u64 {
        self.fetch
            .as_ref()
            .and_then(|f| f.timeout_seconds)
            .unwrap_or(10)
    }
}

fn merge_toml(a: &mut toml::Value, b: toml::Value) {
    match (a, b) {
        (toml::Value::Table(a_map), toml::Value::Table(b_map)) => {
            for (k, v) in b_map {
                if let Some(a_val) = a_map.get_mut(&k) {
                    merge_toml(a_val, v);
                } else {
                    a_map.insert(k, v);
                }
            }
        }
        (a_val, b_val) => *a_val = b_val,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_from_string() {
        let toml = r#"
            [crawler]
            base_url = "https://media.naver.com/press/052/ranking"
            limit = 3

            [llm]
            adapter = "dummy"

            [kakao]
            token_env = "KAKAO_ACCESS_TOKEN"
            receiver_uuids = ["uuid-1", "uuid-2"]

            [message]
            max_summary_length = 200
        "#;

        let cfg: Config = toml::from_str(toml).expect("parse config");
        assert_eq!(cfg.crawler.limit, Some(3));
        assert_eq!(cfg.llm.as_ref().and_then(|l| l.adapter.as_deref()), Some("dummy"));
        assert_eq!(cfg.kakao.as_ref().map(|k| k.receiver_uuids.len()), Some(2));
        assert_eq!(cfg.message.as_ref().and_then(|m| m.max_summary_length), Some(200));
        // fetch section absent: default timeout applies
        assert_eq!(cfg.fetch_timeout_seconds(), 10);
    }

    #[tokio::test]
    async fn load_with_defaults_merges_override() {
        let dir = std::env::temp_dir().join(format!("newsping_cfg_{}", std::process::id()));
        std::fs::create_dir_all(&dir).expect("create temp dir");

        let default_path = dir.join("config.default.toml");
        std::fs::write(
            &default_path,
            r#"
            [crawler]
            base_url = "https://example.com/ranking"
            limit = 3

            [message]
            max_keywords = 5
            "#,
        )
        .expect("write default");

        let override_path = dir.join("config.toml");
        std::fs::write(
            &override_path,
            r#"
            [crawler]
            limit = 1
            "#,
        )
        .expect("write override");

        let cfg = Config::load_with_defaults(Some(&default_path), Some(&override_path))
            .await
            .expect("load merged config");

        // Override wins on limit, default survives elsewhere
        assert_eq!(cfg.crawler.limit, Some(1));
        assert_eq!(cfg.crawler.base_url, "https://example.com/ranking");
        assert_eq!(cfg.message.as_ref().and_then(|m| m.max_keywords), Some(5));
    }
}
