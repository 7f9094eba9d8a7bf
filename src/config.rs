use crate::error::{Result, StegoError};
use crate::header::Compatibility;
use crate::lsb::capacity::validate_max_bits;
use crate::pipeline::crypto::EncryptionAlgorithm;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Per-operation settings shared by embed and extract
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StegoConfig {
    /// Upper bound for the low-order bits used per colour channel (1..=8)
    pub max_bits_per_channel: u8,
    pub use_compression: bool,
    pub use_encryption: bool,
    /// Never written to disk with the rest of the config
    #[serde(skip_serializing)]
    pub password: Option<String>,
    pub encryption_algorithm: EncryptionAlgorithm,
    pub compatibility: Compatibility,
}

impl Default for StegoConfig {
    fn default() -> Self {
        Self {
            max_bits_per_channel: 8,
            use_compression: true,
            use_encryption: false,
            password: None,
            encryption_algorithm: EncryptionAlgorithm::default(),
            compatibility: Compatibility::default(),
        }
    }
}

impl StegoConfig {
    /// Config with encryption switched on for the given password
    pub fn with_password(password: impl Into<String>) -> Self {
        Self {
            use_encryption: true,
            password: Some(password.into()),
            ..Default::default()
        }
    }

    /// Load a config from a JSON file; missing fields keep their defaults
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let data = std::fs::read(path)?;
        let config: Self = serde_json::from_slice(&data)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<()> {
        validate_max_bits(self.max_bits_per_channel)?;
        if self.use_encryption && self.password().is_none() {
            return Err(StegoError::InvalidConfig(
                "encryption enabled without a password".into(),
            ));
        }
        Ok(())
    }

    /// The password, treating an empty string as absent
    pub fn password(&self) -> Option<&str> {
        self.password.as_deref().filter(|p| !p.is_empty())
    }
}
