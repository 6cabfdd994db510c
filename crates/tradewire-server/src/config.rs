//! Server configuration.

use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use tradewire_contract::{PROTOCOL_MAX, PROTOCOL_MIN};

/// Errors loading a configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// A wallet seeded into the ledger at startup.
#[derive(Debug, Clone, Deserialize)]
pub struct SeedWallet {
    /// Asset symbol.
    pub asset: String,
    /// Opening balance, as a decimal literal.
    pub balance: String,
    /// Opening reserved amount, as a decimal literal.
    #[serde(default)]
    pub reserved: Option<String>,
}

/// Server configuration settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Minimum supported protocol version.
    pub protocol_min: i32,
    /// Maximum supported protocol version.
    pub protocol_max: i32,
    /// Whether calls must carry the API key header.
    pub require_api_key: bool,
    /// Quote asset that buy orders reserve against.
    pub quote_asset: String,
    /// Wallets seeded into the ledger at startup.
    pub wallets: Vec<SeedWallet>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            protocol_min: PROTOCOL_MIN,
            protocol_max: PROTOCOL_MAX,
            require_api_key: true,
            quote_asset: "USDT".to_string(),
            wallets: vec![
                SeedWallet {
                    asset: "BTC".to_string(),
                    balance: "12.00".to_string(),
                    reserved: Some("1.00".to_string()),
                },
                SeedWallet {
                    asset: "USDT".to_string(),
                    balance: "100000.00".to_string(),
                    reserved: None,
                },
            ],
        }
    }
}

impl ServerConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&text)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_cover_demo_ledger() {
        let config = ServerConfig::default();
        assert!(config.require_api_key);
        assert_eq!(config.wallets[0].asset, "BTC");
        assert_eq!(config.wallets[0].balance, "12.00");
    }

    #[test]
    fn test_load_from_toml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
require_api_key = false
quote_asset = "USD"

[[wallets]]
asset = "ETH"
balance = "3.5"
"#
        )
        .unwrap();

        let config = ServerConfig::load(file.path()).unwrap();
        assert!(!config.require_api_key);
        assert_eq!(config.quote_asset, "USD");
        assert_eq!(config.wallets.len(), 1);
        assert_eq!(config.wallets[0].reserved, None);
        // Unspecified fields keep their defaults.
        assert_eq!(config.protocol_min, PROTOCOL_MIN);
    }

    #[test]
    fn test_load_rejects_malformed_toml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "wallets = 3").unwrap();
        assert!(matches!(
            ServerConfig::load(file.path()),
            Err(ConfigError::Parse(_))
        ));
    }
}
