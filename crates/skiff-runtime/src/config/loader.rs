//! Configuration loader using figment.
//!
//! Sources are layered, lowest to highest priority:
//!
//! 1. Built-in defaults
//! 2. User config file (`~/.config/skiff/skiff.toml`, when searched)
//! 3. Profile-specific file (`skiff.{profile}.toml`)
//! 4. Main file (`skiff.toml`, or an explicit path)
//! 5. Environment variables (`SKIFF_*`)
//!
//! File sources require the `toml-config` feature *(default)*.
//!
//! # Environment Variable Mapping
//!
//! Variables use the `SKIFF_` prefix with `__` as the nesting separator:
//!
//! - `SKIFF_BOT__USER_ID=bot-1` → `bot.user_id = "bot-1"`
//! - `SKIFF_LOGGING__LEVEL=debug` → `logging.level = "debug"`
//!
//! # Example
//!
//! ```rust,ignore
//! use skiff_runtime::config::{ConfigLoader, load_config};
//!
//! // Search the current directory, then apply env overrides
//! let config = load_config()?;
//!
//! // Load from a specific file with a profile
//! let config = ConfigLoader::new()
//!     .file("./config/skiff.toml")
//!     .profile(Profile::Production)
//!     .load()?;
//! ```

use std::path::PathBuf;

use figment::Figment;
#[cfg(feature = "toml-config")]
use figment::providers::{Format, Toml};
use figment::providers::{Env, Serialized};
use tracing::debug;

use super::error::ConfigResult;
use super::schema::SkiffConfig;
use super::validation;

/// Configuration profile for environment-specific settings.
#[derive(Debug, Clone, Default)]
pub enum Profile {
    /// Development profile (default).
    #[default]
    Development,
    /// Production profile.
    Production,
    /// Custom profile name.
    Custom(String),
}

impl Profile {
    /// Returns the profile name as a string.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Development => "development",
            Self::Production => "production",
            Self::Custom(name) => name,
        }
    }

    /// Creates a profile from `SKIFF_PROFILE` or defaults to Development.
    pub fn from_env() -> Self {
        std::env::var("SKIFF_PROFILE")
            .map(|p| match p.to_lowercase().as_str() {
                "production" | "prod" => Self::Production,
                "development" | "dev" => Self::Development,
                other => Self::Custom(other.to_string()),
            })
            .unwrap_or_default()
    }
}

impl std::fmt::Display for Profile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Configuration loader with figment-based multi-source support.
pub struct ConfigLoader {
    profile: Profile,
    search_current_dir: bool,
    search_user_dir: bool,
    explicit_file: Option<PathBuf>,
    with_env: bool,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigLoader {
    /// Creates a loader with defaults and env overrides only.
    pub fn new() -> Self {
        Self {
            profile: Profile::from_env(),
            search_current_dir: false,
            search_user_dir: false,
            explicit_file: None,
            with_env: true,
        }
    }

    /// Also searches `skiff.toml` (and the profile file) in the current
    /// directory.
    pub fn with_current_dir(mut self) -> Self {
        self.search_current_dir = true;
        self
    }

    /// Also searches the user config directory
    /// (`~/.config/skiff/skiff.toml` on Linux).
    pub fn with_user_dir(mut self) -> Self {
        self.search_user_dir = true;
        self
    }

    /// Loads a specific file (highest-priority file source).
    pub fn file(mut self, path: impl Into<PathBuf>) -> Self {
        self.explicit_file = Some(path.into());
        self
    }

    /// Selects the profile (defaults to `SKIFF_PROFILE` or development).
    pub fn profile(mut self, profile: Profile) -> Self {
        self.profile = profile;
        self
    }

    /// Disables the `SKIFF_*` environment variable layer.
    pub fn without_env(mut self) -> Self {
        self.with_env = false;
        self
    }

    /// Merges all sources, extracts, and validates.
    pub fn load(self) -> ConfigResult<SkiffConfig> {
        let mut figment = Figment::from(Serialized::defaults(SkiffConfig::default()));

        #[cfg(feature = "toml-config")]
        {
            if self.search_user_dir
                && let Some(dir) = dirs::config_dir()
            {
                figment = figment.merge(Toml::file(dir.join("skiff").join("skiff.toml")));
            }
            if self.search_current_dir {
                figment = figment.merge(Toml::file(format!("skiff.{}.toml", self.profile)));
                figment = figment.merge(Toml::file("skiff.toml"));
            }
            if let Some(path) = &self.explicit_file {
                figment = figment.merge(Toml::file(path));
            }
        }

        if self.with_env {
            figment = figment.merge(Env::prefixed("SKIFF_").split("__"));
        }

        let config: SkiffConfig = figment.extract()?;
        validation::validate(&config)?;
        debug!(profile = %self.profile, "configuration loaded");
        Ok(config)
    }
}

/// Loads configuration from the default locations.
///
/// Searches the current directory and applies `SKIFF_*` env overrides.
pub fn load_config() -> ConfigResult<SkiffConfig> {
    ConfigLoader::new().with_current_dir().load()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::LogLevel;

    #[test]
    fn env_layer_provides_the_bot_id() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("SKIFF_BOT__USER_ID", "bot-env");
            jail.set_env("SKIFF_LOGGING__LEVEL", "debug");

            let config = ConfigLoader::new().load().expect("loads from env");
            assert_eq!(config.bot.user_id, "bot-env");
            assert_eq!(config.logging.level, LogLevel::Debug);
            Ok(())
        });
    }

    #[test]
    fn missing_bot_id_fails_validation() {
        figment::Jail::expect_with(|_jail| {
            assert!(ConfigLoader::new().load().is_err());
            Ok(())
        });
    }

    #[cfg(feature = "toml-config")]
    #[test]
    fn env_overrides_file() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(
                "skiff.toml",
                r#"
                    [bot]
                    user_id = "bot-file"

                    [dispatch]
                    channel_capacity = 16
                "#,
            )?;
            jail.set_env("SKIFF_BOT__USER_ID", "bot-env");

            let config = ConfigLoader::new()
                .with_current_dir()
                .load()
                .expect("loads merged config");
            assert_eq!(config.bot.user_id, "bot-env");
            assert_eq!(config.dispatch.channel_capacity, 16);
            Ok(())
        });
    }

    #[cfg(feature = "toml-config")]
    #[test]
    fn main_file_overrides_profile_file() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(
                "skiff.development.toml",
                r#"
                    [bot]
                    user_id = "bot-profile"

                    [dispatch]
                    shutdown_grace_ms = 100
                "#,
            )?;
            jail.create_file(
                "skiff.toml",
                r#"
                    [bot]
                    user_id = "bot-main"
                "#,
            )?;

            let config = ConfigLoader::new()
                .profile(Profile::Development)
                .with_current_dir()
                .load()
                .expect("loads merged config");
            assert_eq!(config.bot.user_id, "bot-main");
            assert_eq!(config.dispatch.shutdown_grace_ms, 100);
            Ok(())
        });
    }
}
