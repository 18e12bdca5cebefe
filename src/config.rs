//! # Discovery Configuration
//!
//! Loaded from an explicit path, `$DISCOVERY_CONFIG_PATH`, or the
//! `config/discovery.{toml,json}` fallbacks. Every field has a default, so an
//! empty file (or no file at all) yields a working configuration with the
//! built-in query set.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use serde::Deserialize;

pub const ENV_CONFIG_PATH: &str = "DISCOVERY_CONFIG_PATH";

/// Default client identity for robots checks and probes.
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (compatible; JobSourceBot/0.2; +https://example.local)";

/// Search queries targeting common ATS platforms.
fn default_queries() -> Vec<String> {
    [
        r#"site:boards-api.greenhouse.io "v1/boards" "jobs""#,
        r#"site:boards.greenhouse.io "embed/job_board?for=""#,
        r#"site:jobs.lever.co "jobs""#,
        r#"site:myworkdayjobs.com "jobs""#,
        "site:jobs.ashbyhq.com",
        "site:careers.smartrecruiters.com",
        r#"site:successfactors.com "career" OR "careers""#,
    ]
    .into_iter()
    .map(str::to_string)
    .collect()
}

fn default_per_query_limit() -> usize {
    20
}

fn default_max_batch() -> usize {
    200
}

fn default_probe_concurrency() -> usize {
    8
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

fn default_export_limit() -> usize {
    500
}

fn default_request_timeout_secs() -> u64 {
    15
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DiscoveryConfig {
    /// Search queries issued per run.
    #[serde(default = "default_queries")]
    pub queries: Vec<String>,
    /// Result limit per query.
    #[serde(default = "default_per_query_limit")]
    pub per_query_limit: usize,
    /// Cap on unique sources validated per run (applied after dedup).
    #[serde(default = "default_max_batch")]
    pub max_batch: usize,
    /// Concurrent in-flight compliance/probe checks.
    #[serde(default = "default_probe_concurrency")]
    pub probe_concurrency: usize,
    /// Client identity for all outbound requests in a run.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// Cap on the exported catalog.
    #[serde(default = "default_export_limit")]
    pub export_limit: usize,
    /// Per-request timeout for robots fetches and probes.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            queries: default_queries(),
            per_query_limit: default_per_query_limit(),
            max_batch: default_max_batch(),
            probe_concurrency: default_probe_concurrency(),
            user_agent: default_user_agent(),
            export_limit: default_export_limit(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl DiscoveryConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Load from an explicit path. Supports TOML or JSON.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading discovery config from {}", path.display()))?;
        let ext = path
            .extension()
            .and_then(|s| s.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();
        parse_config(&content, ext.as_str())
    }

    /// Load using env var + fallbacks:
    /// 1) $DISCOVERY_CONFIG_PATH
    /// 2) config/discovery.toml
    /// 3) config/discovery.json
    /// 4) built-in defaults
    pub fn load_default() -> Result<Self> {
        if let Ok(p) = std::env::var(ENV_CONFIG_PATH) {
            let pb = PathBuf::from(p);
            if pb.exists() {
                return Self::load_from(&pb);
            }
            return Err(anyhow!("{ENV_CONFIG_PATH} points to a non-existent path"));
        }
        let toml_p = PathBuf::from("config/discovery.toml");
        if toml_p.exists() {
            return Self::load_from(&toml_p);
        }
        let json_p = PathBuf::from("config/discovery.json");
        if json_p.exists() {
            return Self::load_from(&json_p);
        }
        Ok(Self::default())
    }
}

fn parse_config(s: &str, hint_ext: &str) -> Result<DiscoveryConfig> {
    let try_toml = hint_ext == "toml" || !s.trim_start().starts_with('{');
    if try_toml {
        if let Ok(v) = toml::from_str(s) {
            return Ok(v);
        }
    }
    if let Ok(v) = serde_json::from_str(s) {
        return Ok(v);
    }
    if !try_toml {
        if let Ok(v) = toml::from_str(s) {
            return Ok(v);
        }
    }
    Err(anyhow!("unsupported discovery config format"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_yields_defaults() {
        let cfg = parse_config("", "toml").unwrap();
        assert_eq!(cfg, DiscoveryConfig::default());
        assert_eq!(cfg.queries.len(), 7);
        assert_eq!(cfg.max_batch, 200);
    }

    #[test]
    fn toml_overrides_selected_fields() {
        let cfg = parse_config(
            r#"
            queries = ["site:jobs.lever.co"]
            per_query_limit = 5
            probe_concurrency = 2
            "#,
            "toml",
        )
        .unwrap();
        assert_eq!(cfg.queries, vec!["site:jobs.lever.co".to_string()]);
        assert_eq!(cfg.per_query_limit, 5);
        assert_eq!(cfg.probe_concurrency, 2);
        // Untouched fields keep their defaults.
        assert_eq!(cfg.export_limit, 500);
        assert_eq!(cfg.user_agent, DEFAULT_USER_AGENT);
    }

    #[test]
    fn json_is_accepted_too() {
        let cfg = parse_config(r#"{"max_batch": 50, "request_timeout_secs": 3}"#, "json").unwrap();
        assert_eq!(cfg.max_batch, 50);
        assert_eq!(cfg.request_timeout(), Duration::from_secs(3));
    }

    #[test]
    fn garbage_is_rejected() {
        assert!(parse_config("not = [valid", "toml").is_err());
    }
}
