//! Session configuration loaded from TOML.
//!
//! ```toml
//! log_level = "debug"
//!
//! [prefill]
//! firstName = "Hasya"
//! city = "Staten Island"
//!
//! [reveal]
//! answer_ms = 150
//! ```

use crate::core::{Answers, Field, RawData};
use crate::reveal::RevealTimings;
use directories::ProjectDirs;
use serde::{Deserialize, Deserializer};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const CONFIG_FILE: &str = "config.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct FormConfig {
    /// Values known before the session starts
    #[serde(deserialize_with = "deserialize_prefill")]
    pub prefill: RawData,
    pub reveal: RevealTimings,
    /// Overrides the verbosity-derived filter when set
    pub log_level: Option<String>,
}

impl Default for FormConfig {
    fn default() -> Self {
        Self {
            prefill: default_prefill(),
            reveal: RevealTimings::default(),
            log_level: None,
        }
    }
}

impl FormConfig {
    /// Load from `path`; a missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn parse(contents: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(contents)
    }

    /// Load from `explicit` if given, else from the platform config dir.
    pub fn discover(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        match explicit.map(Path::to_path_buf).or_else(default_path) {
            Some(path) => Self::load(&path),
            None => Ok(Self::default()),
        }
    }

    pub fn answers(&self) -> Answers {
        Answers::with_prefill(&self.prefill)
    }
}

/// Platform config location, if a home directory can be determined.
pub fn default_path() -> Option<PathBuf> {
    ProjectDirs::from("com", "chatform", "chatform").map(|dirs| dirs.config_dir().join(CONFIG_FILE))
}

/// Prefill keys are field names as they appear in snapshots (`firstName`).
fn deserialize_prefill<'de, D>(deserializer: D) -> Result<RawData, D::Error>
where
    D: Deserializer<'de>,
{
    BTreeMap::<String, String>::deserialize(deserializer)?
        .into_iter()
        .map(|(name, value)| {
            name.parse::<Field>()
                .map(|field| (field, value))
                .map_err(serde::de::Error::custom)
        })
        .collect()
}

fn default_prefill() -> RawData {
    RawData::from([
        (Field::FirstName, "Hasya".to_string()),
        (Field::LastName, "Ram".to_string()),
        (
            Field::Address,
            "45 E 42nd St, New York, NY 10017, USA".to_string(),
        ),
        (Field::AptUnit, "4".to_string()),
        (Field::HouseNumber, "25".to_string()),
        (Field::StreetName, "Staten Island Ferry".to_string()),
        (Field::City, "Staten Island".to_string()),
        (Field::State, "New York".to_string()),
        (Field::PostalCode, "10301".to_string()),
    ])
}
