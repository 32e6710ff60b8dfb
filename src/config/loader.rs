//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading engine
//! configuration from YAML files.

use chrono::NaiveDate;
use std::fs;
use std::path::Path;

use crate::error::{EngineError, EngineResult};

use super::types::{EngineConfig, HolidaysConfig};

/// Loads and provides access to engine configuration.
///
/// # Directory Structure
///
/// ```text
/// config/default/
/// ├── engine.yaml     # Required: dedup rule, slots, collation, metrics
/// └── holidays.yaml   # Optional: default public holidays
/// ```
///
/// # Example
///
/// ```no_run
/// use attendance_engine::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config/default").unwrap();
/// println!("Company: {}", loader.config().company.name);
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config: EngineConfig,
    public_holidays: Vec<NaiveDate>,
}

impl ConfigLoader {
    /// Loads configuration from the specified directory.
    ///
    /// # Returns
    ///
    /// Returns a `ConfigLoader` instance on success, or an error if:
    /// - `engine.yaml` is missing
    /// - Any file contains invalid YAML or misses a required field
    /// - A value is out of range (e.g. zero slot capacity)
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();

        let config = Self::load_yaml::<EngineConfig>(&path.join("engine.yaml"))?;
        Self::validate(&config)?;

        let holidays_path = path.join("holidays.yaml");
        let holidays = if holidays_path.exists() {
            Self::load_yaml::<HolidaysConfig>(&holidays_path)?
        } else {
            HolidaysConfig::default()
        };

        Ok(Self {
            config,
            public_holidays: holidays.public_holidays,
        })
    }

    /// Builds a loader from an in-memory configuration, validating it.
    pub fn from_config(config: EngineConfig, public_holidays: Vec<NaiveDate>) -> EngineResult<Self> {
        Self::validate(&config)?;
        Ok(Self {
            config,
            public_holidays,
        })
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> EngineResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| EngineError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    fn validate(config: &EngineConfig) -> EngineResult<()> {
        if config.slots.capacity == 0 {
            return Err(invalid("slots.capacity", "must be at least 1"));
        }
        if config.data_sheet.columns == 0 {
            return Err(invalid("data_sheet.columns", "must be at least 1"));
        }
        if config.metrics.unpaid_break_minutes < 0 {
            return Err(invalid("metrics.unpaid_break_minutes", "must not be negative"));
        }
        if config.metrics.suspicious_early_clock_in_minutes < 0 {
            return Err(invalid(
                "metrics.suspicious_early_clock_in_minutes",
                "must not be negative",
            ));
        }
        if config.shift_rules.night_keyword.trim().is_empty() {
            return Err(invalid("shift_rules.night_keyword", "must not be empty"));
        }
        if config.shift_rules.afternoon_keyword.trim().is_empty() {
            return Err(invalid("shift_rules.afternoon_keyword", "must not be empty"));
        }
        Ok(())
    }

    /// Returns the underlying engine configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Public holidays used when a request does not supply its own.
    pub fn default_public_holidays(&self) -> &[NaiveDate] {
        &self.public_holidays
    }
}

fn invalid(field: &str, message: &str) -> EngineError {
    EngineError::InvalidConfig {
        field: field.to_string(),
        message: message.to_string(),
    }
}
