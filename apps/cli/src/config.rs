//! CLI configuration: optional YAML file, then environment, then flags.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CliConfig {
    /// Remote scenario API root. When unset, scenarios go to SQLite.
    pub api_url: Option<String>,
    pub api_token: Option<String>,
    pub http_timeout_secs: u64,
    /// Directory holding the persisted store snapshot.
    pub data_dir: PathBuf,
    pub db_url: String,
    /// Identity that owns rows in the on-device database.
    pub owner: String,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            api_url: None,
            api_token: None,
            http_timeout_secs: 30,
            data_dir: PathBuf::from("saves"),
            db_url: persistence::default_sqlite_url().to_string(),
            owner: "local".to_string(),
        }
    }
}

/// Values given on the command line; they win over file and environment.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ConfigOverrides {
    pub api_url: Option<String>,
    pub db_url: Option<String>,
    pub data_dir: Option<PathBuf>,
}

impl CliConfig {
    pub fn from_yaml(text: &str) -> Result<Self> {
        serde_yaml::from_str(text).context("invalid config file")
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        Self::from_yaml(&text)
    }

    /// Overlay `PLANNER_*` variables read through `var`.
    pub fn apply_env(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(v) = var("PLANNER_API_URL").filter(|v| !v.is_empty()) {
            self.api_url = Some(v);
        }
        if let Some(v) = var("PLANNER_API_TOKEN").filter(|v| !v.is_empty()) {
            self.api_token = Some(v);
        }
        if let Some(v) = var("PLANNER_DATA_DIR").filter(|v| !v.is_empty()) {
            self.data_dir = PathBuf::from(v);
        }
        if let Some(v) = var("PLANNER_DB_URL").filter(|v| !v.is_empty()) {
            self.db_url = v;
        }
    }

    pub fn apply_overrides(&mut self, o: &ConfigOverrides) {
        if let Some(v) = &o.api_url {
            self.api_url = Some(v.clone());
        }
        if let Some(v) = &o.db_url {
            self.db_url = v.clone();
        }
        if let Some(v) = &o.data_dir {
            self.data_dir = v.clone();
        }
    }

    /// File (if any), then process environment, then flags.
    pub fn load(path: Option<&Path>, overrides: &ConfigOverrides) -> Result<Self> {
        let mut cfg = match path {
            Some(p) => Self::from_file(p)?,
            None => Self::default(),
        };
        cfg.apply_env(|k| std::env::var(k).ok());
        cfg.apply_overrides(overrides);
        Ok(cfg)
    }

    pub fn http_config(&self) -> Option<persistence::HttpConfig> {
        let url = self.api_url.as_ref()?;
        let mut http = persistence::HttpConfig::new(url.clone());
        http.bearer_token = self.api_token.clone();
        http.timeout = Duration::from_secs(self.http_timeout_secs);
        Some(http)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn partial_yaml_keeps_defaults() {
        let cfg = CliConfig::from_yaml("api_url: https://planner.test/api\nowner: nurse-ed\n").unwrap();
        assert_eq!(cfg.api_url.as_deref(), Some("https://planner.test/api"));
        assert_eq!(cfg.owner, "nurse-ed");
        assert_eq!(cfg.http_timeout_secs, 30);
        assert_eq!(cfg.db_url, persistence::default_sqlite_url());
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(CliConfig::from_yaml("api_ulr: x\n").is_err());
    }

    #[test]
    fn env_then_flags_take_precedence() {
        let env: HashMap<&str, &str> = [
            ("PLANNER_API_URL", "http://env/api"),
            ("PLANNER_DATA_DIR", "/tmp/env-data"),
            ("PLANNER_API_TOKEN", ""),
        ]
        .into_iter()
        .collect();
        let mut cfg = CliConfig::default();
        cfg.apply_env(|k| env.get(k).map(|v| v.to_string()));
        assert_eq!(cfg.api_url.as_deref(), Some("http://env/api"));
        assert_eq!(cfg.data_dir, PathBuf::from("/tmp/env-data"));
        assert_eq!(cfg.api_token, None);

        cfg.apply_overrides(&ConfigOverrides {
            api_url: Some("http://flag/api".into()),
            ..Default::default()
        });
        assert_eq!(cfg.api_url.as_deref(), Some("http://flag/api"));
        assert_eq!(cfg.data_dir, PathBuf::from("/tmp/env-data"));
    }

    #[test]
    fn http_config_only_with_url() {
        let mut cfg = CliConfig::default();
        assert!(cfg.http_config().is_none());
        cfg.api_url = Some("http://h".into());
        cfg.api_token = Some("t".into());
        cfg.http_timeout_secs = 5;
        let http = cfg.http_config().unwrap();
        assert_eq!(http.bearer_token.as_deref(), Some("t"));
        assert_eq!(http.timeout, Duration::from_secs(5));
    }

    #[test]
    fn config_file_is_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("planner.yaml");
        std::fs::write(&path, "http_timeout_secs: 12\n").unwrap();
        let cfg = CliConfig::from_file(&path).unwrap();
        assert_eq!(cfg.http_timeout_secs, 12);
        assert!(CliConfig::from_file(&dir.path().join("missing.yaml")).is_err());
    }
}
