//! # Till Configuration
//!
//! Configuration management for the register shell.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Command Line Flags (highest priority)                              │
//! │     --currency eur   --json                                            │
//! │                                                                         │
//! │  2. Environment Variables                                              │
//! │     TILL_CURRENCY=eur                                                  │
//! │     TILL_DENOMINATIONS=1,2,5                                           │
//! │                                                                         │
//! │  3. TOML Config File                                                   │
//! │     ~/.config/till/till.toml (Linux)                                   │
//! │     ~/Library/Application Support/com.till.register/till.toml (macOS)  │
//! │                                                                         │
//! │  4. Default Values (lowest priority)                                   │
//! │     usd coins, empty register, text output                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # till.toml
//! [register]
//! name = "Front Till"
//! currency = "usd"            # usd | eur | gbp | cad
//! denominations = [1, 2, 3]   # optional, replaces the currency's coins
//!
//! [[float]]                    # opening float, loaded at startup
//! denomination = 25
//! count = 40
//!
//! [output]
//! json = false
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use till_core::validation::validate_count;
use till_core::{Currency, DenominationTable, Register, TillError};

// =============================================================================
// Config Error
// =============================================================================

/// Configuration error types.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid value for {key}: '{value}'")]
    InvalidValue { key: String, value: String },

    #[error("Float entry uses denomination {0}, which the register does not accept")]
    UnknownFloatDenomination(i64),

    #[error("Invalid register setup: {0}")]
    Register(#[from] TillError),
}

// =============================================================================
// Sections
// =============================================================================

/// `[register]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterSection {
    /// Human-readable register name (e.g., "Front Till").
    #[serde(default = "default_register_name")]
    pub name: String,

    /// Built-in coin table to use.
    #[serde(default)]
    pub currency: Currency,

    /// Custom coin values. When set, replaces the currency's coins.
    #[serde(default)]
    pub denominations: Option<Vec<i64>>,
}

fn default_register_name() -> String {
    "Till".to_string()
}

impl Default for RegisterSection {
    fn default() -> Self {
        RegisterSection {
            name: default_register_name(),
            currency: Currency::default(),
            denominations: None,
        }
    }
}

/// One `[[float]]` entry: coins loaded into the register at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FloatEntry {
    pub denomination: i64,
    pub count: i64,
}

/// `[output]` section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputSection {
    /// Print results as JSON lines instead of text.
    #[serde(default)]
    pub json: bool,
}

// =============================================================================
// Till Config
// =============================================================================

/// Complete shell configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TillConfig {
    #[serde(default)]
    pub register: RegisterSection,

    #[serde(default)]
    pub float: Vec<FloatEntry>,

    #[serde(default)]
    pub output: OutputSection,
}

impl TillConfig {
    /// Loads configuration from file and environment.
    ///
    /// ## Loading Order
    /// 1. Start with defaults
    /// 2. Load from the given file, or the platform config file (if it exists)
    /// 3. Override with environment variables
    /// 4. Validate
    pub fn load(config_path: Option<PathBuf>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading till config from file");
                config = Self::from_file(&path)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;

        Ok(config)
    }

    /// Parses a config file without applying overrides.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(toml::from_str(&contents)?)
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let table = self.table()?;

        for entry in &self.float {
            if !table.contains(entry.denomination) {
                return Err(ConfigError::UnknownFloatDenomination(entry.denomination));
            }
            validate_count(entry.count)?;
        }

        Ok(())
    }

    /// Applies environment variable overrides.
    ///
    /// `lookup` returns the value of a variable, if set.
    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(name) = lookup("TILL_NAME") {
            self.register.name = name;
        }

        if let Some(code) = lookup("TILL_CURRENCY") {
            debug!(currency = %code, "Overriding currency from environment");
            self.register.currency = code.parse::<Currency>().map_err(|_| ConfigError::InvalidValue {
                key: "TILL_CURRENCY".to_string(),
                value: code.clone(),
            })?;
        }

        if let Some(list) = lookup("TILL_DENOMINATIONS") {
            debug!(denominations = %list, "Overriding denominations from environment");
            self.register.denominations = Some(parse_denomination_list(&list).ok_or_else(
                || ConfigError::InvalidValue {
                    key: "TILL_DENOMINATIONS".to_string(),
                    value: list.clone(),
                },
            )?);
        }

        if let Some(flag) = lookup("TILL_JSON") {
            self.output.json = parse_bool(&flag).ok_or_else(|| ConfigError::InvalidValue {
                key: "TILL_JSON".to_string(),
                value: flag.clone(),
            })?;
        }

        Ok(())
    }

    /// Returns the default config file path for this platform.
    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "till", "register")
            .map(|dirs| dirs.config_dir().join("till.toml"))
    }

    // =========================================================================
    // Register Construction
    // =========================================================================

    /// Builds the coin table: custom denominations win over the currency.
    pub fn table(&self) -> Result<DenominationTable, ConfigError> {
        match &self.register.denominations {
            Some(values) => Ok(DenominationTable::build(values)?),
            None => Ok(self.register.currency.table()),
        }
    }

    /// Builds the register and loads the opening float.
    pub fn build_register(&self) -> Result<Register, ConfigError> {
        let mut register = Register::new(self.table()?);

        for entry in &self.float {
            if !register.is_valid_coin(entry.denomination) {
                return Err(ConfigError::UnknownFloatDenomination(entry.denomination));
            }
            register.add_coins(entry.denomination, entry.count)?;
        }

        info!(
            name = %self.register.name,
            table = %register.table(),
            total = register.total(),
            "Register ready"
        );
        Ok(register)
    }
}

/// Parses `"1, 5, 10"`. Returns None if any item is not an integer.
fn parse_denomination_list(list: &str) -> Option<Vec<i64>> {
    list.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(|item| item.parse().ok())
        .collect()
}

fn parse_bool(flag: &str) -> Option<bool> {
    match flag.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = TillConfig::default();
        assert_eq!(config.register.name, "Till");
        assert_eq!(config.register.currency, Currency::Usd);
        assert!(config.float.is_empty());
        assert!(!config.output.json);

        let register = config.build_register().unwrap();
        assert_eq!(register.table().values(), &[1, 5, 10, 25, 50]);
        assert_eq!(register.total(), 0);
    }

    #[test]
    fn test_parse_full_file() {
        let config: TillConfig = toml::from_str(
            r#"
            [register]
            name = "Front Till"
            currency = "eur"

            [[float]]
            denomination = 200
            count = 2

            [[float]]
            denomination = 5
            count = 10

            [output]
            json = true
            "#,
        )
        .unwrap();

        assert_eq!(config.register.name, "Front Till");
        assert_eq!(config.register.currency, Currency::Eur);
        assert_eq!(config.float.len(), 2);
        assert!(config.output.json);

        config.validate().unwrap();
        let register = config.build_register().unwrap();
        assert_eq!(register.total(), 450);
        assert_eq!(register.coin_count(), 12);
    }

    #[test]
    fn test_custom_denominations_replace_currency() {
        let config: TillConfig = toml::from_str(
            r#"
            [register]
            currency = "cad"
            denominations = [3, 1, 2, 2]
            "#,
        )
        .unwrap();
        let register = config.build_register().unwrap();
        assert_eq!(register.table().values(), &[1, 2, 3]);
    }

    #[test]
    fn test_validate_rejects_bad_setups() {
        let mut config = TillConfig::default();
        config.register.denominations = Some(vec![2, 5]);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Register(TillError::InvalidDenominations { .. }))
        ));

        let mut config = TillConfig::default();
        config.float.push(FloatEntry {
            denomination: 3,
            count: 1,
        });
        assert!(matches!(
            config.validate(),
            Err(ConfigError::UnknownFloatDenomination(3))
        ));

        let mut config = TillConfig::default();
        config.float.push(FloatEntry {
            denomination: 25,
            count: -4,
        });
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Register(TillError::InvalidCount(-4)))
        ));
    }

    #[test]
    fn test_env_overrides() {
        let mut config = TillConfig::default();
        config
            .apply_env_overrides(env(&[
                ("TILL_NAME", "Back Till"),
                ("TILL_CURRENCY", "GBP"),
                ("TILL_DENOMINATIONS", "1, 4, 9"),
                ("TILL_JSON", "yes"),
            ]))
            .unwrap();

        assert_eq!(config.register.name, "Back Till");
        assert_eq!(config.register.currency, Currency::Gbp);
        assert_eq!(config.register.denominations, Some(vec![1, 4, 9]));
        assert!(config.output.json);
    }

    #[test]
    fn test_env_overrides_reject_garbage() {
        for (key, value) in [
            ("TILL_CURRENCY", "doubloon"),
            ("TILL_DENOMINATIONS", "1,five"),
            ("TILL_JSON", "maybe"),
        ] {
            let mut config = TillConfig::default();
            let err = config.apply_env_overrides(env(&[(key, value)])).unwrap_err();
            assert!(
                matches!(&err, ConfigError::InvalidValue { key: k, .. } if k == key),
                "{}",
                err
            );
        }
    }

    #[test]
    fn test_from_file_and_parse_errors() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[register]\nname = \"Kiosk\"\ndenominations = [1, 7]").unwrap();
        let config = TillConfig::from_file(file.path()).unwrap();
        assert_eq!(config.register.name, "Kiosk");
        assert_eq!(config.table().unwrap().values(), &[1, 7]);

        let mut bad = tempfile::NamedTempFile::new().unwrap();
        writeln!(bad, "[register\nname = ").unwrap();
        assert!(matches!(
            TillConfig::from_file(bad.path()),
            Err(ConfigError::Parse(_))
        ));

        let missing = file.path().with_extension("missing");
        assert!(matches!(
            TillConfig::from_file(&missing),
            Err(ConfigError::Read { .. })
        ));
    }

    #[test]
    fn test_parse_helpers() {
        assert_eq!(parse_denomination_list("1,5, 10,"), Some(vec![1, 5, 10]));
        assert_eq!(parse_denomination_list("1;5"), None);
        assert_eq!(parse_bool("ON"), Some(true));
        assert_eq!(parse_bool("0"), Some(false));
    }
}
