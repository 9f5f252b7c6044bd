use serde::Deserialize;

/// Application settings, loaded from a TOML file with env-var overrides
/// for the values that differ per deployment.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub server: ServerSettings,
    pub database: DatabaseSettings,
    pub sweeper: SweeperSettings,
    pub rate_limit: RateLimitSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseSettings {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SweeperSettings {
    pub enabled: bool,
    pub interval_secs: u64,
    pub max_age_minutes: i64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RateLimitSettings {
    pub enabled: bool,
    pub max_requests: u32,
    pub window_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    pub json_format: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server: ServerSettings::default(),
            database: DatabaseSettings::default(),
            sweeper: SweeperSettings::default(),
            rate_limit: RateLimitSettings::default(),
            logging: LoggingSettings::default(),
        }
    }
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
        }
    }
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            url: "postgres://localhost:5432/turnstile".to_string(),
            max_connections: 5,
        }
    }
}

impl Default for SweeperSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            interval_secs: 300,
            max_age_minutes: 30,
        }
    }
}

impl Default for RateLimitSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            max_requests: 60,
            window_secs: 60,
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self { json_format: false }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("failed to parse {0}: {1}")]
    Parse(String, String),
}

impl Settings {
    /// Reads `TURNSTILE_CONFIG` (default `config/default.toml`); a missing
    /// file falls back to defaults, a malformed one is an error.
    pub fn load() -> Result<Self, SettingsError> {
        let path =
            std::env::var("TURNSTILE_CONFIG").unwrap_or_else(|_| "config/default.toml".to_string());

        let mut settings: Settings = match std::fs::read_to_string(&path) {
            Ok(raw) => {
                toml::from_str(&raw).map_err(|e| SettingsError::Parse(path, e.to_string()))?
            }
            Err(_) => Settings::default(),
        };

        if let Ok(url) = std::env::var("DATABASE_URL") {
            settings.database.url = url;
        }
        if let Some(port) = std::env::var("SERVER_PORT")
            .ok()
            .and_then(|p| p.parse().ok())
        {
            settings.server.port = port;
        }

        Ok(settings)
    }
}
