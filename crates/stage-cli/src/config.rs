//! Run configuration from environment variables.

use std::path::PathBuf;

use stage_engine::EngineConfig;
use thiserror::Error;

/// Directory holding one CSV file per lookup table.
pub const TABLES_PATH_VAR: &str = "STAGE_TABLES_PATH";
/// CSV file of records to recode.
pub const INPUT_PATH_VAR: &str = "STAGE_INPUT_PATH";
/// CSV file the recodes are written to.
pub const OUTPUT_PATH_VAR: &str = "STAGE_OUTPUT_PATH";
/// Optional JSON file for the run summary.
pub const SUMMARY_PATH_VAR: &str = "STAGE_SUMMARY_PATH";
/// Collaborative Stage field version of the input records.
pub const CS_VERSION_VAR: &str = "STAGE_CS_VERSION";

const DEFAULT_TABLES_PATH: &str = "./tables";
const DEFAULT_INPUT_PATH: &str = "./records.csv";
const DEFAULT_OUTPUT_PATH: &str = "./recodes.csv";

/// Errors in the run configuration.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// A numeric variable did not parse.
    #[error("Invalid value for {var}: {value:?} is not a non-negative integer")]
    InvalidNumber {
        /// The variable name.
        var: &'static str,
        /// The rejected value.
        value: String,
    },
}

/// Settings for one recode run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    /// Directory of table files.
    pub tables_path: PathBuf,
    /// Record CSV to read.
    pub input_path: PathBuf,
    /// Recode CSV to write.
    pub output_path: PathBuf,
    /// Where to write the JSON run summary, if anywhere.
    pub summary_path: Option<PathBuf>,
    /// Engine settings.
    pub engine: EngineConfig,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            tables_path: PathBuf::from(DEFAULT_TABLES_PATH),
            input_path: PathBuf::from(DEFAULT_INPUT_PATH),
            output_path: PathBuf::from(DEFAULT_OUTPUT_PATH),
            summary_path: None,
            engine: EngineConfig::default(),
        }
    }
}

impl RunConfig {
    /// Reads the configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Reads the configuration through a variable lookup. Unset and empty
    /// variables take their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |var: &str| lookup(var).filter(|value| !value.is_empty());
        let defaults = Self::default();

        let engine = match get(CS_VERSION_VAR) {
            Some(value) => EngineConfig {
                cs_version: value.trim().parse().map_err(|_| ConfigError::InvalidNumber {
                    var: CS_VERSION_VAR,
                    value,
                })?,
            },
            None => defaults.engine,
        };

        Ok(Self {
            tables_path: get(TABLES_PATH_VAR).map_or(defaults.tables_path, PathBuf::from),
            input_path: get(INPUT_PATH_VAR).map_or(defaults.input_path, PathBuf::from),
            output_path: get(OUTPUT_PATH_VAR).map_or(defaults.output_path, PathBuf::from),
            summary_path: get(SUMMARY_PATH_VAR).map(PathBuf::from),
            engine,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn make_lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |var| vars.get(var).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = RunConfig::from_lookup(make_lookup(&[])).unwrap();
        assert_eq!(config, RunConfig::default());
        assert_eq!(config.tables_path, PathBuf::from("./tables"));
        assert_eq!(config.engine.cs_version, 12);
        assert!(config.summary_path.is_none());
    }

    #[test]
    fn test_overrides() {
        let config = RunConfig::from_lookup(make_lookup(&[
            (TABLES_PATH_VAR, "/data/tables"),
            (INPUT_PATH_VAR, "in.csv"),
            (OUTPUT_PATH_VAR, "out.csv"),
            (SUMMARY_PATH_VAR, "summary.json"),
            (CS_VERSION_VAR, "10"),
        ]))
        .unwrap();

        assert_eq!(config.tables_path, PathBuf::from("/data/tables"));
        assert_eq!(config.input_path, PathBuf::from("in.csv"));
        assert_eq!(config.output_path, PathBuf::from("out.csv"));
        assert_eq!(config.summary_path, Some(PathBuf::from("summary.json")));
        assert_eq!(config.engine.cs_version, 10);
    }

    #[test]
    fn test_empty_values_take_defaults() {
        let config = RunConfig::from_lookup(make_lookup(&[
            (TABLES_PATH_VAR, ""),
            (SUMMARY_PATH_VAR, ""),
            (CS_VERSION_VAR, ""),
        ]))
        .unwrap();
        assert_eq!(config, RunConfig::default());
    }

    #[test]
    fn test_invalid_cs_version() {
        let err = RunConfig::from_lookup(make_lookup(&[(CS_VERSION_VAR, "v12")])).unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvalidNumber {
                var: CS_VERSION_VAR,
                value: "v12".to_string(),
            }
        );
    }
}
