use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::collector::MAX_COMMENTS_TO_FETCH;

const DEFAULT_ENV_PREFIX: &str = "SENTITUBE";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Config {
    #[serde(default)]
    pub backend: BackendConfig,
    #[serde(default)]
    pub fetch: FetchConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BackendConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    // No deadline unless one is configured; a slow backend stalls the run
    // rather than failing it.
    #[serde(default, with = "humantime_serde")]
    pub request_timeout: Option<Duration>,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            user_agent: default_user_agent(),
            request_timeout: None,
        }
    }
}

fn default_base_url() -> String {
    crate::backend::DEFAULT_BASE_URL.to_string()
}

fn default_user_agent() -> String {
    format!("sentitube/{}", crate::VERSION)
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FetchConfig {
    #[serde(default = "default_max_comments")]
    pub max_comments: usize,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            max_comments: default_max_comments(),
        }
    }
}

fn default_max_comments() -> usize {
    MAX_COMMENTS_TO_FETCH
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct OutputConfig {
    #[serde(default)]
    pub chart_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
    pub config_file: Option<PathBuf>,
    pub env_prefix: Option<String>,
}

pub fn load(options: LoadOptions) -> Result<Config> {
    let mut cfg = Config::default();

    if let Some(path) = options.config_file.as_ref() {
        if path.exists() {
            let from_file = read_config_file(path)?;
            cfg = merge_config(cfg, from_file);
        }
    } else if let Some(default_path) = default_config_path() {
        if default_path.exists() {
            let from_file = read_config_file(&default_path)?;
            cfg = merge_config(cfg, from_file);
        }
    }

    let prefix = options.env_prefix.as_deref().unwrap_or(DEFAULT_ENV_PREFIX);
    cfg = merge_config(cfg, load_env(prefix));

    Ok(cfg)
}

fn read_config_file(path: &Path) -> Result<Config> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file at {}", path.display()))?;
    let config: Config = serde_yaml::from_str(&data)
        .with_context(|| format!("Failed to parse config file at {}", path.display()))?;
    Ok(config)
}

fn merge_config(mut base: Config, other: Config) -> Config {
    if !other.backend.base_url.is_empty() {
        base.backend.base_url = other.backend.base_url;
    }
    if !other.backend.user_agent.is_empty() {
        base.backend.user_agent = other.backend.user_agent;
    }
    if other.backend.request_timeout.is_some() {
        base.backend.request_timeout = other.backend.request_timeout;
    }

    if other.fetch.max_comments != 0 {
        base.fetch.max_comments = other.fetch.max_comments;
    }

    if other.output.chart_dir.is_some() {
        base.output.chart_dir = other.output.chart_dir;
    }

    base
}

fn load_env(prefix: &str) -> Config {
    let mut map: HashMap<String, String> = HashMap::new();
    let upper_prefix = format!("{}_", prefix.to_uppercase());

    for (key, value) in env::vars() {
        if let Some(stripped) = key.strip_prefix(&upper_prefix) {
            let normalized = stripped.to_ascii_lowercase().replace("__", ".");
            map.insert(normalized, value);
        }
    }

    // The env layer merges over the file layer; it starts empty so keys the
    // environment never set cannot reset file values to defaults.
    let mut cfg = Config {
        backend: BackendConfig {
            base_url: String::new(),
            user_agent: String::new(),
            request_timeout: None,
        },
        fetch: FetchConfig { max_comments: 0 },
        output: OutputConfig::default(),
    };

    for (key, value) in map {
        apply_env_value(&mut cfg, &key, value);
    }

    cfg
}

fn apply_env_value(cfg: &mut Config, key: &str, value: String) {
    match key {
        "backend.base_url" => cfg.backend.base_url = value,
        "backend.user_agent" => cfg.backend.user_agent = value,
        "backend.request_timeout" => {
            if let Ok(duration) = humantime::parse_duration(&value) {
                cfg.backend.request_timeout = Some(duration);
            }
        }
        "fetch.max_comments" => {
            if let Ok(parsed) = value.parse::<usize>() {
                cfg.fetch.max_comments = parsed;
            }
        }
        "output.chart_dir" => cfg.output.chart_dir = Some(PathBuf::from(value)),
        _ => {}
    }
}

fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("sentitube").join("config.yaml"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn load_defaults_without_files() {
        let cfg = load(LoadOptions {
            config_file: Some(PathBuf::from("/nonexistent/sentitube.yaml")),
            env_prefix: Some("SENTITUBE_TEST_NONE".into()),
        })
        .unwrap();
        assert_eq!(cfg.backend.base_url, "http://127.0.0.1:5000");
        assert_eq!(cfg.fetch.max_comments, 5000);
        assert!(cfg.backend.request_timeout.is_none());
        assert!(cfg.output.chart_dir.is_none());
    }

    #[test]
    fn config_file_overrides_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        fs::write(
            &path,
            "backend:\n  base_url: http://10.0.0.5:5000\n  request_timeout: 30s\noutput:\n  chart_dir: /tmp/sentitube-charts\n",
        )
        .unwrap();

        let cfg = load(LoadOptions {
            config_file: Some(path),
            env_prefix: Some("SENTITUBE_TEST_FILE".into()),
        })
        .unwrap();
        assert_eq!(cfg.backend.base_url, "http://10.0.0.5:5000");
        assert_eq!(cfg.backend.request_timeout, Some(Duration::from_secs(30)));
        assert_eq!(
            cfg.output.chart_dir,
            Some(PathBuf::from("/tmp/sentitube-charts"))
        );
        assert_eq!(cfg.fetch.max_comments, 5000);
    }

    #[test]
    fn env_overrides_file_and_defaults() {
        env::set_var("SENTITUBE_TEST_ENV_BACKEND__BASE_URL", "http://envhost:5000");
        env::set_var("SENTITUBE_TEST_ENV_FETCH__MAX_COMMENTS", "250");
        env::set_var("SENTITUBE_TEST_ENV_BACKEND__REQUEST_TIMEOUT", "45s");

        let cfg = load(LoadOptions {
            config_file: Some(PathBuf::from("/nonexistent/sentitube.yaml")),
            env_prefix: Some("SENTITUBE_TEST_ENV".into()),
        })
        .unwrap();
        assert_eq!(cfg.backend.base_url, "http://envhost:5000");
        assert_eq!(cfg.fetch.max_comments, 250);
        assert_eq!(cfg.backend.request_timeout, Some(Duration::from_secs(45)));

        env::remove_var("SENTITUBE_TEST_ENV_BACKEND__BASE_URL");
        env::remove_var("SENTITUBE_TEST_ENV_FETCH__MAX_COMMENTS");
        env::remove_var("SENTITUBE_TEST_ENV_BACKEND__REQUEST_TIMEOUT");
    }

    #[test]
    fn unparseable_env_values_are_ignored() {
        env::set_var("SENTITUBE_TEST_BAD_BACKEND__REQUEST_TIMEOUT", "soonish");
        env::set_var("SENTITUBE_TEST_BAD_FETCH__MAX_COMMENTS", "many");

        let cfg = load(LoadOptions {
            config_file: Some(PathBuf::from("/nonexistent/sentitube.yaml")),
            env_prefix: Some("SENTITUBE_TEST_BAD".into()),
        })
        .unwrap();
        assert!(cfg.backend.request_timeout.is_none());
        assert_eq!(cfg.fetch.max_comments, 5000);

        env::remove_var("SENTITUBE_TEST_BAD_BACKEND__REQUEST_TIMEOUT");
        env::remove_var("SENTITUBE_TEST_BAD_FETCH__MAX_COMMENTS");
    }
}
