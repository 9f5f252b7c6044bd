mod settings;

pub use settings::{
    DatabaseSettings, LoggingSettings, RateLimitSettings, ServerSettings, Settings, SettingsError,
    SweeperSettings,
};
