use crate::error::ConfigError;
use log::warn;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Deserialize;
use std::path::Path;

pub const DEALER_KEY: &str = "dealer";

/// Settings a dealer is constructed from
///
/// Decimal fields are written as strings in TOML, e.g. `initial_capital = "10000"`.
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct DealerConfig {
    pub initial_capital: Decimal,
}

impl Default for DealerConfig {
    fn default() -> Self {
        DealerConfig {
            initial_capital: dec!(10000),
        }
    }
}

/// Looks up the `dealer` entry of a generic configuration table and parses
/// its nested table into a [`DealerConfig`].
pub fn read_dealer_from_config(config: &toml::value::Table) -> Result<DealerConfig, ConfigError> {
    let root = config
        .get(DEALER_KEY)
        .ok_or_else(|| ConfigError::MissingKey(DEALER_KEY.to_string()))?;
    if !root.is_table() {
        return Err(ConfigError::Invalid {
            key: DEALER_KEY.to_string(),
            reason: format!("expected a table, found {}", root.type_str()),
        });
    }
    root.clone()
        .try_into::<DealerConfig>()
        .map_err(|e| ConfigError::Invalid {
            key: DEALER_KEY.to_string(),
            reason: e.to_string(),
        })
}

/// Configuration of a backtest run read from a TOML file
#[derive(Debug, Clone, Default)]
pub struct RuntimeConfig {
    pub dealer: DealerConfig,
}

impl RuntimeConfig {
    pub fn new() -> Self {
        RuntimeConfig {
            dealer: DealerConfig::default(),
        }
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let table: toml::value::Table = toml::from_str(contents)?;
        Ok(RuntimeConfig {
            dealer: read_dealer_from_config(&table)?,
        })
    }

    /// Reads the file at `path`, falling back to defaults when it cannot be read
    pub fn from_toml<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = match std::fs::read_to_string(path.as_ref()) {
            Ok(c) => c,
            Err(e) => {
                warn!(
                    "Something went wrong reading the runtime config file {}, {:?}",
                    path.as_ref().display(),
                    e
                );
                return Ok(RuntimeConfig::new());
            }
        };
        Self::from_toml_str(&contents)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_read_dealer() {
        let table: toml::value::Table =
            toml::from_str("[dealer]\ninitial_capital = \"2500.5\"\n").unwrap();
        let config = read_dealer_from_config(&table).unwrap();
        assert_eq!(config.initial_capital, dec!(2500.5));
    }

    #[test]
    fn test_read_dealer_defaults() {
        let table: toml::value::Table = toml::from_str("[dealer]\n").unwrap();
        assert_eq!(read_dealer_from_config(&table).unwrap(), DealerConfig::default());
    }

    #[test]
    fn test_missing_dealer_key() {
        let table: toml::value::Table = toml::from_str("[broker]\nname = \"x\"\n").unwrap();
        let err = read_dealer_from_config(&table).unwrap_err();
        assert!(matches!(err, ConfigError::MissingKey(ref k) if k == "dealer"));
        assert_eq!(err.to_string(), "'dealer' key not found");
    }

    #[test]
    fn test_dealer_not_a_table() {
        let table: toml::value::Table = toml::from_str("dealer = 5\n").unwrap();
        assert!(matches!(
            read_dealer_from_config(&table),
            Err(ConfigError::Invalid { .. })
        ));
    }

    #[test]
    fn test_from_toml_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[dealer]\ninitial_capital = \"42\"").unwrap();
        let config = RuntimeConfig::from_toml(file.path()).unwrap();
        assert_eq!(config.dealer.initial_capital, dec!(42));
    }

    #[test]
    fn test_from_toml_missing_file_uses_defaults() {
        let config = RuntimeConfig::from_toml("/nonexistent/dealer.toml").unwrap();
        assert_eq!(config.dealer, DealerConfig::default());
    }
}
