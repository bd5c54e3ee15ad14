//! # Configuration
//!
//! Centralizes all settings with a clear override hierarchy:
//! defaults → config file → env vars → CLI flags.
//!
//! Config lives at `~/.zelda/config.toml`. If missing on first run, a
//! commented-out default is generated so users can discover all options.

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use crate::core::storage::zelda_home;

// ============================================================================
// Config Structs (all fields Option<T> for sparse TOML)
// ============================================================================

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct ZeldaConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub weather: WeatherConfig,
    #[serde(default)]
    pub news: NewsConfig,
    #[serde(default)]
    pub mail: MailConfig,
    #[serde(default)]
    pub bank: BankConfig,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct GeneralConfig {
    pub user: Option<String>,
    pub refresh_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct WeatherConfig {
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub city: Option<String>,
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct NewsConfig {
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub country: Option<String>,
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct MailConfig {
    pub smtp_server: Option<String>,
    pub smtp_port: Option<u16>,
    pub smtp_username: Option<String>,
    pub smtp_password: Option<String>,
    pub sender_email: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct BankConfig {
    pub database: Option<String>,
}

// ============================================================================
// Defaults
// ============================================================================

pub const DEFAULT_USER: &str = "guest";
pub const DEFAULT_REFRESH_SECS: u64 = 600;
pub const DEFAULT_TIMEOUT_SECS: u64 = 5;
pub const DEFAULT_WEATHER_BASE_URL: &str = "https://api.openweathermap.org/data/2.5";
pub const DEFAULT_WEATHER_CITY: &str = "London";
pub const DEFAULT_NEWS_BASE_URL: &str = "https://newsapi.org/v2";
pub const DEFAULT_NEWS_COUNTRY: &str = "us";
pub const DEFAULT_SMTP_PORT: u16 = 587;
pub const DEFAULT_BANK_DATABASE: &str = "bank.db";

// ============================================================================
// Resolved Config (concrete values, no Options)
// ============================================================================

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub user: String,
    pub refresh_secs: u64,
    pub weather: ResolvedWeather,
    pub news: ResolvedNews,
    pub mail: Option<SmtpSettings>,
    pub bank_database: PathBuf,
}

#[derive(Debug, Clone)]
pub struct ResolvedWeather {
    pub api_key: Option<String>,
    pub base_url: String,
    pub city: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone)]
pub struct ResolvedNews {
    pub api_key: Option<String>,
    pub base_url: String,
    pub country: String,
    pub timeout_secs: u64,
}

/// Complete SMTP settings. Only produced when server, credentials and
/// sender are all present.
#[derive(Clone)]
pub struct SmtpSettings {
    pub server: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub sender_email: String,
}

impl fmt::Debug for SmtpSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SmtpSettings")
            .field("server", &self.server)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("sender_email", &self.sender_email)
            .finish()
    }
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

/// Returns the path to `~/.zelda/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    zelda_home().map(|h| h.join("config.toml"))
}

/// Load config from `~/.zelda/config.toml`.
///
/// If the file doesn't exist, generates a commented-out default and
/// returns `ZeldaConfig::default()`. If it exists but is malformed,
/// returns `ConfigError::Parse`.
pub fn load_config() -> Result<ZeldaConfig, ConfigError> {
    let path = match config_path() {
        Some(p) => p,
        None => {
            warn!("Could not determine home directory, using default config");
            return Ok(ZeldaConfig::default());
        }
    };
    load_config_from(&path)
}

pub fn load_config_from(path: &Path) -> Result<ZeldaConfig, ConfigError> {
    if !path.exists() {
        info!("No config file found, generating default at {}", path.display());
        generate_default_config(path);
        return Ok(ZeldaConfig::default());
    }

    let contents = fs::read_to_string(path).map_err(ConfigError::Io)?;
    let config: ZeldaConfig = toml::from_str(&contents).map_err(ConfigError::Parse)?;
    info!("Loaded config from {}", path.display());
    debug!("Config sections: weather key set = {}, mail server set = {}",
        config.weather.api_key.is_some(),
        config.mail.smtp_server.is_some());
    Ok(config)
}

/// Generates a commented-out default config file at the given path.
fn generate_default_config(path: &Path) {
    let default_content = r#"# Zelda Configuration
# All settings are optional; defaults are used for anything not specified.
# Override hierarchy: defaults → this file → env vars → CLI flags.

# [general]
# user = "guest"                     # Or set ZELDA_USER; selects ~/.zelda/users/<user>/
# refresh_secs = 600                 # Dashboard weather/news refresh interval

# [weather]
# api_key = "..."                    # Or set WEATHER_API_KEY (OpenWeatherMap)
# base_url = "https://api.openweathermap.org/data/2.5"
# city = "London"                    # Or set WEATHER_CITY
# timeout_secs = 5

# [news]
# api_key = "..."                    # Or set NEWS_API_KEY (newsapi.org)
# base_url = "https://newsapi.org/v2"
# country = "us"
# timeout_secs = 5

# [mail]
# smtp_server = "smtp.example.com"   # Or set SMTP_SERVER
# smtp_port = 587                    # Or set SMTP_PORT
# smtp_username = "me@example.com"   # Or set SMTP_USERNAME
# smtp_password = "..."              # Or set SMTP_PASSWORD
# sender_email = "me@example.com"    # Or set SENDER_EMAIL

# [bank]
# database = "~/.zelda/bank.db"      # Or set BANK_DATABASE
"#;

    if let Some(parent) = path.parent()
        && let Err(e) = fs::create_dir_all(parent)
    {
        warn!("Failed to create config directory: {}", e);
        return;
    }
    if let Err(e) = fs::write(path, default_content) {
        warn!("Failed to write default config: {}", e);
    }
}

// ============================================================================
// Resolution
// ============================================================================

/// Source of environment overrides. Production reads the process env;
/// tests pass a closure over a fixed map.
pub trait EnvSource {
    fn var(&self, key: &str) -> Option<String>;
}

pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok().filter(|v| !v.trim().is_empty())
    }
}

impl<F: Fn(&str) -> Option<String>> EnvSource for F {
    fn var(&self, key: &str) -> Option<String> {
        self(key)
    }
}

/// Resolve the final config by collapsing: defaults → config file → env vars → CLI.
pub fn resolve(config: &ZeldaConfig, cli_user: Option<&str>) -> ResolvedConfig {
    resolve_with_env(config, cli_user, &ProcessEnv)
}

pub fn resolve_with_env(
    config: &ZeldaConfig,
    cli_user: Option<&str>,
    env: &dyn EnvSource,
) -> ResolvedConfig {
    // User: CLI → env → config → default
    let user = cli_user
        .map(|s| s.to_string())
        .or_else(|| env.var("ZELDA_USER"))
        .or_else(|| config.general.user.clone())
        .unwrap_or_else(|| DEFAULT_USER.to_string());

    let weather = ResolvedWeather {
        api_key: env
            .var("WEATHER_API_KEY")
            .or_else(|| config.weather.api_key.clone()),
        base_url: env
            .var("WEATHER_BASE_URL")
            .or_else(|| config.weather.base_url.clone())
            .unwrap_or_else(|| DEFAULT_WEATHER_BASE_URL.to_string()),
        city: env
            .var("WEATHER_CITY")
            .or_else(|| config.weather.city.clone())
            .unwrap_or_else(|| DEFAULT_WEATHER_CITY.to_string()),
        timeout_secs: config.weather.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS),
    };

    let news = ResolvedNews {
        api_key: env.var("NEWS_API_KEY").or_else(|| config.news.api_key.clone()),
        base_url: env
            .var("NEWS_BASE_URL")
            .or_else(|| config.news.base_url.clone())
            .unwrap_or_else(|| DEFAULT_NEWS_BASE_URL.to_string()),
        country: config
            .news
            .country
            .clone()
            .unwrap_or_else(|| DEFAULT_NEWS_COUNTRY.to_string()),
        timeout_secs: config.news.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS),
    };

    ResolvedConfig {
        user,
        refresh_secs: config
            .general
            .refresh_secs
            .unwrap_or(DEFAULT_REFRESH_SECS)
            .max(30),
        weather,
        news,
        mail: resolve_mail(&config.mail, env),
        bank_database: resolve_bank_database(&config.bank, env),
    }
}

/// SMTP settings: env wins per field. Anything missing → no mail transport.
fn resolve_mail(mail: &MailConfig, env: &dyn EnvSource) -> Option<SmtpSettings> {
    let server = env.var("SMTP_SERVER").or_else(|| mail.smtp_server.clone())?;
    let port = match env.var("SMTP_PORT") {
        Some(raw) => match raw.parse::<u16>() {
            Ok(port) => port,
            Err(e) => {
                warn!("Ignoring invalid SMTP_PORT '{}': {}", raw, e);
                mail.smtp_port.unwrap_or(DEFAULT_SMTP_PORT)
            }
        },
        None => mail.smtp_port.unwrap_or(DEFAULT_SMTP_PORT),
    };
    let username = env
        .var("SMTP_USERNAME")
        .or_else(|| mail.smtp_username.clone())?;
    let password = env
        .var("SMTP_PASSWORD")
        .or_else(|| mail.smtp_password.clone())?;
    let sender_email = env
        .var("SENDER_EMAIL")
        .or_else(|| mail.sender_email.clone())
        .unwrap_or_else(|| username.clone());

    Some(SmtpSettings {
        server,
        port,
        username,
        password,
        sender_email,
    })
}

/// Bank database path: env → config → `~/.zelda/bank.db`. A leading `~/` expands to home.
fn resolve_bank_database(bank: &BankConfig, env: &dyn EnvSource) -> PathBuf {
    match env.var("BANK_DATABASE").or_else(|| bank.database.clone()) {
        Some(raw) => expand_home(&raw),
        None => zelda_home()
            .map(|h| h.join(DEFAULT_BANK_DATABASE))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_BANK_DATABASE)),
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

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_default_config_parses() {
        let config = ZeldaConfig::default();
        assert!(config.general.user.is_none());
        assert!(config.mail.smtp_server.is_none());
    }

    #[test]
    fn test_resolve_uses_defaults_when_empty() {
        let config = ZeldaConfig::default();
        let resolved = resolve_with_env(&config, None, &env_of(&[]));
        assert_eq!(resolved.user, DEFAULT_USER);
        assert_eq!(resolved.refresh_secs, DEFAULT_REFRESH_SECS);
        assert_eq!(resolved.weather.base_url, DEFAULT_WEATHER_BASE_URL);
        assert_eq!(resolved.weather.city, DEFAULT_WEATHER_CITY);
        assert_eq!(resolved.news.country, DEFAULT_NEWS_COUNTRY);
        assert!(resolved.weather.api_key.is_none());
        assert!(resolved.mail.is_none());
        assert!(resolved.bank_database.ends_with(DEFAULT_BANK_DATABASE));
    }

    #[test]
    fn test_env_overrides_config() {
        let config = ZeldaConfig {
            general: GeneralConfig {
                user: Some("from-file".to_string()),
                refresh_secs: Some(120),
            },
            weather: WeatherConfig {
                api_key: Some("file-key".to_string()),
                city: Some("Paris".to_string()),
                ..Default::default()
            },
            ..Default::default()
        };
        let env = env_of(&[("ZELDA_USER", "from-env"), ("WEATHER_API_KEY", "env-key")]);
        let resolved = resolve_with_env(&config, None, &env);
        assert_eq!(resolved.user, "from-env");
        assert_eq!(resolved.weather.api_key.as_deref(), Some("env-key"));
        assert_eq!(resolved.weather.city, "Paris");
        assert_eq!(resolved.refresh_secs, 120);
    }

    #[test]
    fn test_cli_user_wins() {
        let env = env_of(&[("ZELDA_USER", "from-env")]);
        let resolved = resolve_with_env(&ZeldaConfig::default(), Some("cli"), &env);
        assert_eq!(resolved.user, "cli");
    }

    #[test]
    fn test_refresh_has_a_floor() {
        let config = ZeldaConfig {
            general: GeneralConfig {
                refresh_secs: Some(1),
                ..Default::default()
            },
            ..Default::default()
        };
        let resolved = resolve_with_env(&config, None, &env_of(&[]));
        assert_eq!(resolved.refresh_secs, 30);
    }

    #[test]
    fn test_mail_requires_server_and_credentials() {
        let partial = env_of(&[("SMTP_SERVER", "smtp.example.com")]);
        assert!(resolve_with_env(&ZeldaConfig::default(), None, &partial).mail.is_none());

        let full = env_of(&[
            ("SMTP_SERVER", "smtp.example.com"),
            ("SMTP_PORT", "2525"),
            ("SMTP_USERNAME", "me@example.com"),
            ("SMTP_PASSWORD", "hunter22"),
        ]);
        let mail = resolve_with_env(&ZeldaConfig::default(), None, &full)
            .mail
            .unwrap();
        assert_eq!(mail.port, 2525);
        assert_eq!(mail.sender_email, "me@example.com");
        assert!(!format!("{mail:?}").contains("hunter22"));
    }

    #[test]
    fn test_invalid_smtp_port_falls_back() {
        let env = env_of(&[
            ("SMTP_SERVER", "smtp.example.com"),
            ("SMTP_PORT", "not-a-port"),
            ("SMTP_USERNAME", "me"),
            ("SMTP_PASSWORD", "pw"),
        ]);
        let mail = resolve_with_env(&ZeldaConfig::default(), None, &env)
            .mail
            .unwrap();
        assert_eq!(mail.port, DEFAULT_SMTP_PORT);
    }

    #[test]
    fn test_bank_database_from_env() {
        let env = env_of(&[("BANK_DATABASE", "/tmp/custom.db")]);
        let resolved = resolve_with_env(&ZeldaConfig::default(), None, &env);
        assert_eq!(resolved.bank_database, PathBuf::from("/tmp/custom.db"));
    }

    #[test]
    fn test_toml_round_trip() {
        let toml_str = r#"
[general]
user = "alice"
refresh_secs = 300

[weather]
api_key = "w-123"
city = "Oslo"

[news]
country = "gb"

[mail]
smtp_server = "smtp.example.com"
smtp_port = 465

[bank]
database = "/var/lib/zelda/bank.db"
"#;
        let config: ZeldaConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.general.user.as_deref(), Some("alice"));
        assert_eq!(config.weather.city.as_deref(), Some("Oslo"));
        assert_eq!(config.news.country.as_deref(), Some("gb"));
        assert_eq!(config.mail.smtp_port, Some(465));
        assert_eq!(config.bank.database.as_deref(), Some("/var/lib/zelda/bank.db"));
    }

    #[test]
    fn test_sparse_toml_parses() {
        let config: ZeldaConfig = toml::from_str("[news]\napi_key = \"n\"\n").unwrap();
        assert_eq!(config.news.api_key.as_deref(), Some("n"));
        assert!(config.general.user.is_none());
        assert!(config.mail.smtp_server.is_none());
    }

    #[test]
    fn test_missing_file_generates_template() {
        let path = std::env::temp_dir()
            .join(format!("zelda-config-{}", uuid::Uuid::new_v4()))
            .join("config.toml");
        let config = load_config_from(&path).unwrap();
        assert!(config.general.user.is_none());
        let template = fs::read_to_string(&path).unwrap();
        // The template must itself parse (everything is commented out)
        let reparsed: ZeldaConfig = toml::from_str(&template).unwrap();
        assert!(reparsed.weather.api_key.is_none());
        fs::remove_dir_all(path.parent().unwrap()).unwrap();
    }

    #[test]
    fn test_malformed_file_is_parse_error() {
        let dir = std::env::temp_dir().join(format!("zelda-config-{}", uuid::Uuid::new_v4()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.toml");
        fs::write(&path, "[general\nuser = ").unwrap();
        assert!(matches!(load_config_from(&path), Err(ConfigError::Parse(_))));
        fs::remove_dir_all(dir).unwrap();
    }
}
