//! Configuration for Moodping.
//!
//! Raw TOML (`~/.moodping/config.toml`) deserializes into [`MoodpingConfig`],
//! whose fields are all optional. [`MoodpingConfig::resolve`] validates it into a
//! [`ResolvedConfig`] at the parse boundary; everything downstream consumes the
//! resolved form only.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;
use url::Url;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";
pub const DEFAULT_EVENT_QUEUE_CAPACITY: usize = 64;
pub const BASE_URL_ENV_VAR: &str = "MOODPING_BASE_URL";

const APP_DIR_NAME: &str = ".moodping";
const CONFIG_FILE_NAME: &str = "config.toml";
const STORAGE_FILE_NAME: &str = "storage.json";

const fn default_true() -> bool {
    true
}

#[derive(Debug, Default, Deserialize)]
pub struct MoodpingConfig {
    pub server: Option<ServerConfig>,
    pub events: Option<EventsConfig>,
    pub storage: Option<StorageConfig>,
    pub app: Option<AppConfig>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ServerConfig {
    pub base_url: Option<String>,
    /// Per-request timeout. Requests wait indefinitely when unset.
    pub request_timeout_secs: Option<u64>,
}

#[derive(Debug, Deserialize)]
pub struct EventsConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    pub queue_capacity: Option<usize>,
}

impl Default for EventsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            queue_capacity: None,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct StorageConfig {
    /// Path of the durable key-value file holding the user id.
    pub path: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct AppConfig {
    pub locale: Option<String>,
    /// Use ASCII-only glyphs for markers and spinners.
    #[serde(default)]
    pub ascii_only: bool,
    /// Enable a high-contrast color palette.
    #[serde(default)]
    pub high_contrast: bool,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config at {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config at {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("invalid server base_url {value:?}: {source}")]
    InvalidBaseUrl {
        value: String,
        source: url::ParseError,
    },
    #[error("server base_url must use http or https, got {0:?}")]
    UnsupportedScheme(String),
    #[error("events.queue_capacity must be at least 1")]
    ZeroQueueCapacity,
    #[error("server.request_timeout_secs must be at least 1")]
    ZeroTimeout,
    #[error("unknown locale {0:?} (expected \"ko\" or \"en\")")]
    UnknownLocale(String),
    #[error("could not determine a home directory for storage")]
    NoStorageDir,
}

/// Language of user-facing alert text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Locale {
    #[default]
    Korean,
    English,
}

impl Locale {
    pub fn parse(raw: &str) -> Result<Self, ConfigError> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "ko" | "ko-kr" | "korean" => Ok(Self::Korean),
            "en" | "en-us" | "english" => Ok(Self::English),
            other => Err(ConfigError::UnknownLocale(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct UiOptions {
    pub ascii_only: bool,
    pub high_contrast: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventSettings {
    pub enabled: bool,
    pub queue_capacity: usize,
}

/// Fully validated configuration.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub base_url: Url,
    pub request_timeout: Option<Duration>,
    pub events: EventSettings,
    pub storage_path: PathBuf,
    pub locale: Locale,
    pub ui: UiOptions,
}

impl MoodpingConfig {
    /// Load `~/.moodping/config.toml`. A missing file is `Ok(None)`.
    pub fn load() -> Result<Option<Self>, ConfigError> {
        let Some(path) = config_path() else {
            return Ok(None);
        };
        if !path.exists() {
            return Ok(None);
        }
        Self::load_from(&path).map(Some)
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| {
            tracing::warn!("Failed to read config at {:?}: {}", path, source);
            ConfigError::Read {
                path: path.to_path_buf(),
                source,
            }
        })?;

        toml::from_str(&content).map_err(|source| {
            tracing::warn!("Failed to parse config at {:?}: {}", path, source);
            ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            }
        })
    }

    /// Resolve against the process environment (`MOODPING_BASE_URL` wins over
    /// `server.base_url`).
    pub fn resolve(&self) -> Result<ResolvedConfig, ConfigError> {
        self.resolve_with(|name| env::var(name).ok())
    }

    /// Resolve with an explicit environment lookup.
    pub fn resolve_with<F>(&self, lookup: F) -> Result<ResolvedConfig, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let server = self.server.as_ref();
        let raw_base = lookup(BASE_URL_ENV_VAR)
            .filter(|value| !value.trim().is_empty())
            .or_else(|| server.and_then(|s| s.base_url.clone()))
            .map(|value| expand_env_vars_with(&value, &lookup))
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let base_url = parse_base_url(&raw_base)?;

        let request_timeout = match server.and_then(|s| s.request_timeout_secs) {
            Some(0) => return Err(ConfigError::ZeroTimeout),
            Some(secs) => Some(Duration::from_secs(secs)),
            None => None,
        };

        let events = match &self.events {
            Some(events) => {
                let capacity = events
                    .queue_capacity
                    .unwrap_or(DEFAULT_EVENT_QUEUE_CAPACITY);
                if capacity == 0 {
                    return Err(ConfigError::ZeroQueueCapacity);
                }
                EventSettings {
                    enabled: events.enabled,
                    queue_capacity: capacity,
                }
            }
            None => EventSettings {
                enabled: true,
                queue_capacity: DEFAULT_EVENT_QUEUE_CAPACITY,
            },
        };

        let storage_path = match self.storage.as_ref().and_then(|s| s.path.as_deref()) {
            Some(raw) => expand_home(&expand_env_vars_with(raw, &lookup)),
            None => app_dir()
                .map(|dir| dir.join(STORAGE_FILE_NAME))
                .ok_or(ConfigError::NoStorageDir)?,
        };

        let app = self.app.as_ref();
        let locale = match app.and_then(|a| a.locale.as_deref()) {
            Some(raw) => Locale::parse(raw)?,
            None => Locale::default(),
        };
        let ui = app.map_or_else(UiOptions::default, |a| UiOptions {
            ascii_only: a.ascii_only,
            high_contrast: a.high_contrast,
        });

        Ok(ResolvedConfig {
            base_url,
            request_timeout,
            events,
            storage_path,
            locale,
            ui,
        })
    }
}

fn parse_base_url(raw: &str) -> Result<Url, ConfigError> {
    let trimmed = raw.trim();
    // Endpoint paths are joined relative to the base, so it must end in '/'.
    let with_slash = if trimmed.ends_with('/') {
        trimmed.to_string()
    } else {
        format!("{trimmed}/")
    };
    let url = Url::parse(&with_slash).map_err(|source| ConfigError::InvalidBaseUrl {
        value: trimmed.to_string(),
        source,
    })?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(ConfigError::UnsupportedScheme(other.to_string())),
    }
}

fn expand_home(raw: &str) -> PathBuf {
    if let Some(rest) = raw.strip_prefix("~/")
        && let Some(home) = dirs::home_dir()
    {
        return home.join(rest);
    }
    PathBuf::from(raw)
}

/// Replace `${VAR}` references with values from the environment.
/// Unset variables expand to the empty string; an unclosed `${` is kept as-is.
pub fn expand_env_vars(value: &str) -> String {
    expand_env_vars_with(value, &|name: &str| env::var(name).ok())
}

fn expand_env_vars_with<F>(value: &str, lookup: &F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    let mut out = String::with_capacity(value.len());
    let mut rest = value;

    while let Some(start) = rest.find("${") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let Some(end) = after.find('}') else {
            out.push_str(&rest[start..]);
            return out;
        };
        let name = &after[..end];
        if !name.is_empty() {
            out.push_str(&lookup(name).unwrap_or_default());
        }
        rest = &after[end + 1..];
    }

    out.push_str(rest);
    out
}

/// `~/.moodping`, the home of config, durable storage and logs.
pub fn app_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(APP_DIR_NAME))
}

pub fn config_path() -> Option<PathBuf> {
    app_dir().map(|dir| dir.join(CONFIG_FILE_NAME))
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::{
        ConfigError, DEFAULT_EVENT_QUEUE_CAPACITY, Locale, MoodpingConfig, expand_env_vars_with,
    };

    fn no_env(_: &str) -> Option<String> {
        None
    }

    fn parse(toml_src: &str) -> MoodpingConfig {
        toml::from_str(toml_src).expect("valid toml")
    }

    #[test]
    fn empty_config_resolves_to_defaults() {
        let mut config = parse("");
        config.storage = Some(super::StorageConfig {
            path: Some("/tmp/moodping-test/storage.json".to_string()),
        });
        let resolved = config.resolve_with(no_env).unwrap();

        assert_eq!(resolved.base_url.as_str(), "http://localhost:8000/");
        assert_eq!(resolved.request_timeout, None);
        assert!(resolved.events.enabled);
        assert_eq!(resolved.events.queue_capacity, DEFAULT_EVENT_QUEUE_CAPACITY);
        assert_eq!(resolved.locale, Locale::Korean);
        assert!(!resolved.ui.ascii_only);
    }

    #[test]
    fn full_config_is_resolved() {
        let config = parse(
            r#"
            [server]
            base_url = "https://mood.example.com/app"
            request_timeout_secs = 15

            [events]
            enabled = false
            queue_capacity = 8

            [storage]
            path = "/var/lib/moodping/store.json"

            [app]
            locale = "en"
            ascii_only = true
            high_contrast = true
            "#,
        );
        let resolved = config.resolve_with(no_env).unwrap();

        assert_eq!(resolved.base_url.as_str(), "https://mood.example.com/app/");
        assert_eq!(resolved.request_timeout, Some(Duration::from_secs(15)));
        assert!(!resolved.events.enabled);
        assert_eq!(resolved.events.queue_capacity, 8);
        assert_eq!(
            resolved.storage_path,
            std::path::PathBuf::from("/var/lib/moodping/store.json")
        );
        assert_eq!(resolved.locale, Locale::English);
        assert!(resolved.ui.ascii_only);
        assert!(resolved.ui.high_contrast);
    }

    #[test]
    fn env_override_wins_over_file() {
        let config = parse(
            r#"
            [server]
            base_url = "http://file.example"
            [storage]
            path = "/tmp/s.json"
            "#,
        );
        let resolved = config
            .resolve_with(|name| {
                (name == super::BASE_URL_ENV_VAR).then(|| "http://env.example:9000".to_string())
            })
            .unwrap();
        assert_eq!(resolved.base_url.as_str(), "http://env.example:9000/");
    }

    #[test]
    fn rejects_zero_queue_capacity() {
        let config = parse("[events]\nqueue_capacity = 0\n[storage]\npath = \"/tmp/s.json\"");
        assert!(matches!(
            config.resolve_with(no_env),
            Err(ConfigError::ZeroQueueCapacity)
        ));
    }

    #[test]
    fn rejects_non_http_base_url() {
        let config = parse("[server]\nbase_url = \"ftp://example.com\"\n[storage]\npath = \"/tmp/s.json\"");
        assert!(matches!(
            config.resolve_with(no_env),
            Err(ConfigError::UnsupportedScheme(_))
        ));
    }

    #[test]
    fn rejects_unknown_locale() {
        let config = parse("[app]\nlocale = \"fr\"\n[storage]\npath = \"/tmp/s.json\"");
        assert!(matches!(
            config.resolve_with(no_env),
            Err(ConfigError::UnknownLocale(_))
        ));
    }

    #[test]
    fn load_from_reports_parse_errors_with_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[server\nbase_url = 1").unwrap();

        let err = MoodpingConfig::load_from(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().contains("config.toml"));
    }

    #[test]
    fn load_from_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[server]\nbase_url = \"http://127.0.0.1:8080\"\n").unwrap();

        let config = MoodpingConfig::load_from(&path).unwrap();
        assert_eq!(
            config.server.unwrap().base_url.as_deref(),
            Some("http://127.0.0.1:8080")
        );
    }

    #[test]
    fn expand_env_vars_cases() {
        let lookup = |name: &str| match name {
            "HOST" => Some("mood.example".to_string()),
            "PORT" => Some("9000".to_string()),
            _ => None,
        };
        assert_eq!(expand_env_vars_with("plain", &lookup), "plain");
        assert_eq!(
            expand_env_vars_with("http://${HOST}:${PORT}", &lookup),
            "http://mood.example:9000"
        );
        assert_eq!(expand_env_vars_with("a${MISSING}b", &lookup), "ab");
        assert_eq!(expand_env_vars_with("x ${} y", &lookup), "x  y");
        assert_eq!(expand_env_vars_with("keep ${OPEN", &lookup), "keep ${OPEN");
        assert_eq!(expand_env_vars_with("${HOST}${PORT}", &lookup), "mood.example9000");
    }
}
