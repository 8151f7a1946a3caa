//! Configuration loading and validation.

pub mod error;
pub mod loader;
pub mod schema;
pub mod validation;

pub use error::{ConfigError, ConfigResult};
pub use loader::{ConfigLoader, Profile, load_config};
pub use schema::{
    BotSettings, DispatchSettings, LogFormat, LogLevel, LogOutput, LoggingConfig, SkiffConfig,
};
pub use validation::validate;
