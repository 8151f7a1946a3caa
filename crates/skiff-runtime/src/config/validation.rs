//! Post-load configuration checks.

use super::error::{ConfigError, ConfigResult};
use super::schema::SkiffConfig;

/// Validates a loaded configuration.
///
/// Called by the loader after all sources are merged; programmatically
/// built configs should run it before use.
pub fn validate(config: &SkiffConfig) -> ConfigResult<()> {
    if config.bot.user_id.trim().is_empty() {
        return Err(ConfigError::Invalid {
            field: "bot.user_id",
            reason: "must not be empty; the self-filter needs the bot's own id".to_owned(),
        });
    }

    if config.dispatch.channel_capacity == 0 {
        return Err(ConfigError::Invalid {
            field: "dispatch.channel_capacity",
            reason: "must be at least 1".to_owned(),
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> SkiffConfig {
        let mut config = SkiffConfig::default();
        config.bot.user_id = "bot-1".to_owned();
        config
    }

    #[test]
    fn accepts_a_complete_config() {
        validate(&valid()).unwrap();
    }

    #[test]
    fn rejects_empty_bot_id() {
        let mut config = valid();
        config.bot.user_id = "   ".to_owned();
        let err = validate(&config).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                field: "bot.user_id",
                ..
            }
        ));
    }

    #[test]
    fn rejects_zero_channel_capacity() {
        let mut config = valid();
        config.dispatch.channel_capacity = 0;
        assert!(validate(&config).is_err());
    }
}
