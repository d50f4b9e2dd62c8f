//! Screen configuration, installed once for the whole process

use once_cell::sync::{Lazy, OnceCell};
use serde::{Deserialize, Serialize};
use tagtext_util::result_ext::ResultExt as _;

static REF: OnceCell<NfcConfig> = OnceCell::new();
static DEFAULT: Lazy<NfcConfig> = Lazy::new(NfcConfig::default);

const MAX_LANGUAGE_CODE_LENGTH: usize = 63;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, uniffi::Record)]
#[serde(default)]
pub struct NfcConfig {
    /// Prompt while waiting for a tag to read
    pub read_prompt: String,

    /// Prompt while waiting for a tag to write
    pub write_prompt: String,

    /// Text the write field starts with
    pub default_write_text: String,

    /// Language code of written text records
    pub text_language: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, thiserror::Error, uniffi::Error)]
pub enum ConfigError {
    #[error("unable to parse config: {0}")]
    Parse(String),

    #[error("invalid config: {0}")]
    Invalid(String),

    #[error("config is already initialized")]
    AlreadyInitialized,
}

impl Default for NfcConfig {
    fn default() -> Self {
        Self {
            read_prompt: "Approach tag to read".to_string(),
            write_prompt: "Approach tag to write".to_string(),
            default_write_text: "Hello from React Native NFC!".to_string(),
            text_language: tagtext_nfc::encoder::DEFAULT_LANGUAGE.to_string(),
        }
    }
}

impl NfcConfig {
    /// Parse a config from JSON, missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json).map_err_str(ConfigError::Parse)?;
        config.validate()?;

        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.text_language.is_empty() {
            return Err(ConfigError::Invalid("text_language is empty".to_string()));
        }

        if self.text_language.len() > MAX_LANGUAGE_CODE_LENGTH {
            return Err(ConfigError::Invalid(format!(
                "text_language is {} bytes, max {MAX_LANGUAGE_CODE_LENGTH}",
                self.text_language.len()
            )));
        }

        Ok(())
    }

    /// Install the process wide config, can only be done once
    pub fn init(self) -> Result<(), ConfigError> {
        self.validate()?;
        REF.set(self).map_err(|_| ConfigError::AlreadyInitialized)
    }

    /// The installed config, or the defaults if none was installed
    pub fn global() -> &'static Self {
        REF.get().unwrap_or(&*DEFAULT)
    }
}

#[uniffi::export]
fn nfc_config_from_json(json: String) -> Result<NfcConfig, ConfigError> {
    NfcConfig::from_json(&json)
}

#[uniffi::export]
fn init_nfc_config(config: NfcConfig) -> Result<(), ConfigError> {
    config.init()
}

#[uniffi::export]
fn default_nfc_config() -> NfcConfig {
    NfcConfig::default()
}
