//! Runtime configuration from environment variables, validated at startup.

use burrito_club_core::sms;
use thiserror::Error;

const PLACEHOLDERS: [&str; 3] = ["${date}", "${items}", "${price}"];

/// Errors raised while reading the configuration.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// `SMS_TEMPLATE` is set but misses a required placeholder.
    #[error("SMS_TEMPLATE is missing the {0} placeholder")]
    MissingPlaceholder(&'static str),
}

/// Settings read once at startup.
#[derive(Clone, Debug)]
pub struct Config {
    /// Template for the `get sms` summary. Supports the `${date}`,
    /// `${items}` and `${price}` placeholders.
    pub sms_template: String,
}

impl Config {
    /// Reads the configuration from the process environment, falling back
    /// to defaults for anything unset.
    ///
    /// # Errors
    ///
    /// [`ConfigError::MissingPlaceholder`] when a set `SMS_TEMPLATE` lacks
    /// one of the required placeholders. Better to refuse at startup than
    /// to text the shop a broken summary.
    pub fn from_env() -> Result<Self, ConfigError> {
        match std::env::var("SMS_TEMPLATE") {
            Ok(template) => {
                for placeholder in PLACEHOLDERS {
                    if !template.contains(placeholder) {
                        return Err(ConfigError::MissingPlaceholder(placeholder));
                    }
                }
                Ok(Self {
                    sms_template: template,
                })
            },
            Err(_) => Ok(Self::default()),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            sms_template: sms::DEFAULT_TEMPLATE.to_string(),
        }
    }
}
