//! # Configuration
//!
//! Centralizes all settings with a clear override hierarchy:
//! defaults → config file → env vars → CLI flags.
//!
//! Config lives at `~/.chatdesk/config.toml`. If missing on first run, a
//! commented-out default is generated so users can discover all options.

use clap::ValueEnum;
use log::{LevelFilter, debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

// ============================================================================
// Config Structs (all fields Option<T> for sparse TOML)
// ============================================================================

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct ChatdeskConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub auth: AuthConfig,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct GeneralConfig {
    pub theme: Option<Theme>,
    pub log_level: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct ApiConfig {
    pub base_url: Option<String>,
    pub chat_prefix: Option<String>,
    pub user_prefix: Option<String>,
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct AuthConfig {
    pub domain: Option<String>,
    pub client_id: Option<String>,
    pub audience: Option<String>,
    pub access_token: Option<String>,
}

/// Colour scheme of the terminal UI.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Dark => Theme::Light,
            Theme::Light => Theme::Dark,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Theme::Dark => "dark",
            Theme::Light => "light",
        }
    }
}

// ============================================================================
// Defaults
// ============================================================================

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000";
pub const DEFAULT_CHAT_PREFIX: &str = "/chat/";
pub const DEFAULT_USER_PREFIX: &str = "/user/";
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;
pub const DEFAULT_LOG_LEVEL: LevelFilter = LevelFilter::Debug;

// ============================================================================
// Resolved Config (concrete values, no Options)
// ============================================================================

/// Settings of the external identity provider. Chatdesk itself only uses the
/// access token; the rest is shown to the user and logged for diagnostics.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AuthSettings {
    pub domain: Option<String>,
    pub client_id: Option<String>,
    pub audience: Option<String>,
    pub access_token: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedConfig {
    pub api_base_url: String,
    pub chat_prefix: String,
    pub user_prefix: String,
    pub timeout_secs: u64,
    pub auth: AuthSettings,
    /// False with `--no-auth`: run with the offline auth mock.
    pub use_auth: bool,
    pub theme: Theme,
    pub log_level: LevelFilter,
}

/// Values given on the command line (None = not specified).
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub api_url: Option<String>,
    pub theme: Option<Theme>,
    pub log_level: Option<String>,
    pub no_auth: bool,
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "config I/O error: {e}"),
            ConfigError::Parse(e) => write!(f, "config parse error: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Loading
// ============================================================================

/// Returns the path to `~/.chatdesk/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".chatdesk").join("config.toml"))
}

/// Load config from `~/.chatdesk/config.toml`.
///
/// If the file doesn't exist, generates a commented-out default and
/// returns `ChatdeskConfig::default()`. If it exists but is malformed,
/// returns `ConfigError::Parse`.
pub fn load_config() -> Result<ChatdeskConfig, ConfigError> {
    match config_path() {
        Some(path) => load_config_from(&path),
        None => {
            warn!("Could not determine home directory, using default config");
            Ok(ChatdeskConfig::default())
        }
    }
}

pub fn load_config_from(path: &Path) -> Result<ChatdeskConfig, ConfigError> {
    if !path.exists() {
        info!("No config file found, generating default at {}", path.display());
        generate_default_config(path);
        return Ok(ChatdeskConfig::default());
    }

    let contents = fs::read_to_string(path).map_err(ConfigError::Io)?;
    let config: ChatdeskConfig = toml::from_str(&contents).map_err(ConfigError::Parse)?;
    info!("Loaded config from {}", path.display());
    debug!("Config: {:?}", redacted(&config));
    Ok(config)
}

/// Debug view of the config with the access token masked.
fn redacted(config: &ChatdeskConfig) -> String {
    format!(
        "general={:?} api={:?} auth(domain={:?}, client_id={:?}, audience={:?}, token={})",
        config.general,
        config.api,
        config.auth.domain,
        config.auth.client_id,
        config.auth.audience,
        if config.auth.access_token.is_some() { "<set>" } else { "<unset>" }
    )
}

const DEFAULT_CONFIG: &str = r#"# Chatdesk Configuration
# All settings are optional; defaults are used for anything not specified.
# Override hierarchy: defaults → this file → env vars → CLI flags.

# [general]
# theme = "dark"                     # "dark" or "light" (toggle with Ctrl+T)
# log_level = "debug"                # "error", "warn", "info", "debug", "trace"

# [api]
# base_url = "http://localhost:8000" # Or set API_URL, or pass --api-url
# chat_prefix = "/chat/"             # Or CHAT_PREFIX; older backends use "/api/chat/"
# user_prefix = "/user/"             # Or USER_PREFIX
# timeout_secs = 60

# [auth]
# domain = "example.eu.auth0.com"    # Or AUTH0_DOMAIN
# client_id = "..."                  # Or AUTH0_CLIENT_ID
# audience = "https://chat-api"      # Or AUTH0_AUDIENCE
# access_token = "eyJ..."            # Or CHATDESK_TOKEN
"#;

/// Generates a commented-out default config file at the given path.
fn generate_default_config(path: &Path) {
    if let Some(parent) = path.parent()
        && let Err(e) = fs::create_dir_all(parent)
    {
        warn!("Failed to create config directory: {}", e);
        return;
    }
    if let Err(e) = fs::write(path, DEFAULT_CONFIG) {
        warn!("Failed to write default config: {}", e);
    }
}

// ============================================================================
// Resolution
// ============================================================================

/// Resolve the final config by collapsing: defaults → config file → env vars → CLI.
pub fn resolve(config: &ChatdeskConfig, cli: &CliOverrides) -> ResolvedConfig {
    resolve_with(config, cli, |key| std::env::var(key).ok())
}

/// Same as [`resolve`] with an explicit environment lookup.
pub fn resolve_with<F>(config: &ChatdeskConfig, cli: &CliOverrides, env: F) -> ResolvedConfig
where
    F: Fn(&str) -> Option<String>,
{
    let env = |key: &str| env(key).filter(|v| !v.trim().is_empty());

    // API base URL: CLI → env → config → default
    let api_base_url = cli
        .api_url
        .clone()
        .or_else(|| env("API_URL"))
        .or_else(|| config.api.base_url.clone())
        .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string());

    let chat_prefix = env("CHAT_PREFIX")
        .or_else(|| config.api.chat_prefix.clone())
        .unwrap_or_else(|| DEFAULT_CHAT_PREFIX.to_string());

    let user_prefix = env("USER_PREFIX")
        .or_else(|| config.api.user_prefix.clone())
        .unwrap_or_else(|| DEFAULT_USER_PREFIX.to_string());

    let auth = AuthSettings {
        domain: env("AUTH0_DOMAIN").or_else(|| config.auth.domain.clone()),
        client_id: env("AUTH0_CLIENT_ID").or_else(|| config.auth.client_id.clone()),
        audience: env("AUTH0_AUDIENCE").or_else(|| config.auth.audience.clone()),
        access_token: env("CHATDESK_TOKEN").or_else(|| config.auth.access_token.clone()),
    };

    let log_level = cli
        .log_level
        .as_deref()
        .or(config.general.log_level.as_deref())
        .map(parse_log_level)
        .unwrap_or(DEFAULT_LOG_LEVEL);

    ResolvedConfig {
        api_base_url,
        chat_prefix,
        user_prefix,
        timeout_secs: config.api.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS),
        auth,
        use_auth: !cli.no_auth,
        theme: cli.theme.or(config.general.theme).unwrap_or_default(),
        log_level,
    }
}

fn parse_log_level(raw: &str) -> LevelFilter {
    LevelFilter::from_str(raw.trim()).unwrap_or_else(|_| {
        warn!("Unknown log level {:?}, using {}", raw, DEFAULT_LOG_LEVEL);
        DEFAULT_LOG_LEVEL
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_resolve_uses_defaults_when_empty() {
        let resolved = resolve_with(&ChatdeskConfig::default(), &CliOverrides::default(), no_env);
        assert_eq!(resolved.api_base_url, DEFAULT_API_BASE_URL);
        assert_eq!(resolved.chat_prefix, "/chat/");
        assert_eq!(resolved.user_prefix, "/user/");
        assert_eq!(resolved.timeout_secs, 60);
        assert_eq!(resolved.theme, Theme::Dark);
        assert_eq!(resolved.log_level, LevelFilter::Debug);
        assert_eq!(resolved.auth, AuthSettings::default());
        assert!(resolved.use_auth);
    }

    #[test]
    fn test_config_values_override_defaults() {
        let config = ChatdeskConfig {
            general: GeneralConfig {
                theme: Some(Theme::Light),
                log_level: Some("warn".to_string()),
            },
            api: ApiConfig {
                base_url: Some("https://chat.example.com".to_string()),
                chat_prefix: Some("/api/chat/".to_string()),
                user_prefix: None,
                timeout_secs: Some(5),
            },
            ..Default::default()
        };
        let resolved = resolve_with(&config, &CliOverrides::default(), no_env);
        assert_eq!(resolved.api_base_url, "https://chat.example.com");
        assert_eq!(resolved.chat_prefix, "/api/chat/");
        assert_eq!(resolved.user_prefix, "/user/");
        assert_eq!(resolved.timeout_secs, 5);
        assert_eq!(resolved.theme, Theme::Light);
        assert_eq!(resolved.log_level, LevelFilter::Warn);
    }

    #[test]
    fn test_env_overrides_config() {
        let config = ChatdeskConfig {
            api: ApiConfig {
                base_url: Some("https://from-file".to_string()),
                ..Default::default()
            },
            auth: AuthConfig {
                access_token: Some("file-token".to_string()),
                domain: Some("file.auth0.com".to_string()),
                ..Default::default()
            },
            ..Default::default()
        };
        let env = env_of(&[
            ("API_URL", "https://from-env"),
            ("CHATDESK_TOKEN", "env-token"),
            ("AUTH0_AUDIENCE", "https://chat-api"),
        ]);
        let resolved = resolve_with(&config, &CliOverrides::default(), env);
        assert_eq!(resolved.api_base_url, "https://from-env");
        assert_eq!(resolved.auth.access_token.as_deref(), Some("env-token"));
        assert_eq!(resolved.auth.domain.as_deref(), Some("file.auth0.com"));
        assert_eq!(resolved.auth.audience.as_deref(), Some("https://chat-api"));
    }

    #[test]
    fn test_blank_env_values_are_ignored() {
        let resolved = resolve_with(
            &ChatdeskConfig::default(),
            &CliOverrides::default(),
            env_of(&[("API_URL", "  ")]),
        );
        assert_eq!(resolved.api_base_url, DEFAULT_API_BASE_URL);
    }

    #[test]
    fn test_cli_wins_over_everything() {
        let config = ChatdeskConfig {
            general: GeneralConfig {
                theme: Some(Theme::Dark),
                log_level: Some("info".to_string()),
            },
            ..Default::default()
        };
        let cli = CliOverrides {
            api_url: Some("http://cli:9000".to_string()),
            theme: Some(Theme::Light),
            log_level: Some("trace".to_string()),
            no_auth: true,
        };
        let resolved = resolve_with(&config, &cli, env_of(&[("API_URL", "http://env")]));
        assert_eq!(resolved.api_base_url, "http://cli:9000");
        assert_eq!(resolved.theme, Theme::Light);
        assert_eq!(resolved.log_level, LevelFilter::Trace);
        assert!(!resolved.use_auth);
    }

    #[test]
    fn test_unknown_log_level_falls_back() {
        let cli = CliOverrides {
            log_level: Some("loud".to_string()),
            ..Default::default()
        };
        let resolved = resolve_with(&ChatdeskConfig::default(), &cli, no_env);
        assert_eq!(resolved.log_level, DEFAULT_LOG_LEVEL);
    }

    #[test]
    fn test_toml_parses_all_sections() {
        let toml_str = r#"
[general]
theme = "light"
log_level = "info"

[api]
base_url = "http://10.0.0.5:8000"
chat_prefix = "/api/chat/"
timeout_secs = 30

[auth]
domain = "tenant.eu.auth0.com"
client_id = "abc123"
audience = "https://chat-api"
"#;
        let config: ChatdeskConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.general.theme, Some(Theme::Light));
        assert_eq!(config.api.base_url.as_deref(), Some("http://10.0.0.5:8000"));
        assert_eq!(config.api.timeout_secs, Some(30));
        assert_eq!(config.auth.client_id.as_deref(), Some("abc123"));
        assert!(config.auth.access_token.is_none());
    }

    #[test]
    fn test_sparse_toml_parses() {
        // Only override one thing; everything else stays default
        let toml_str = r#"
[api]
base_url = "http://localhost:9999"
"#;
        let config: ChatdeskConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.api.base_url.as_deref(), Some("http://localhost:9999"));
        assert!(config.api.chat_prefix.is_none());
        assert!(config.general.theme.is_none());
        assert!(config.auth.domain.is_none());
    }

    #[test]
    fn test_generated_default_config_is_valid_toml() {
        let config: ChatdeskConfig = toml::from_str(DEFAULT_CONFIG).unwrap();
        assert!(config.api.base_url.is_none());
    }

    #[test]
    fn test_missing_file_generates_default() {
        let dir = std::env::temp_dir().join(format!("chatdesk-config-{}", std::process::id()));
        let path = dir.join("config.toml");
        let _ = fs::remove_dir_all(&dir);

        let config = load_config_from(&path).unwrap();
        assert!(config.api.base_url.is_none());
        assert!(path.exists());

        fs::write(&path, "[api\nbase_url = ").unwrap();
        assert!(matches!(load_config_from(&path), Err(ConfigError::Parse(_))));
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_theme_toggle() {
        assert_eq!(Theme::Dark.toggled(), Theme::Light);
        assert_eq!(Theme::Light.toggled().label(), "dark");
    }
}
