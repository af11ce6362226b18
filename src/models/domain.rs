use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

use crate::core::{MalformedPreferenceError, PreferenceModel, PreferenceTable};

/// Size limits applied to incoming markets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchingLimits {
    /// Largest number of agents accepted on either side
    pub max_agents_per_side: usize,
    /// Most matchings returned by one enumeration
    pub max_enumerated: usize,
}

impl MatchingLimits {
    /// Whether a market with the given side sizes fits within the limits
    pub fn admits(&self, proposers: usize, responders: usize) -> bool {
        proposers <= self.max_agents_per_side && responders <= self.max_agents_per_side
    }
}

impl Default for MatchingLimits {
    fn default() -> Self {
        Self {
            max_agents_per_side: 500,
            max_enumerated: 1000,
        }
    }
}

/// Errors raised while reading a market file
#[derive(Error, Debug)]
pub enum MarketFileError {
    #[error("cannot read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot parse {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}

/// A two-sided market as written in a TOML file
///
/// ```toml
/// [proposers]
/// H1 = ["S1", "S2"]
///
/// [responders]
/// S1 = ["H1"]
/// S2 = ["H1"]
/// ```
///
/// Agents keep the order in which the file lists them.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Market {
    pub proposers: PreferenceTable,
    pub responders: PreferenceTable,
}

impl Market {
    pub fn from_toml_str(contents: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(contents)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, MarketFileError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| MarketFileError::Read {
            path: path.display().to_string(),
            source,
        })?;

        Self::from_toml_str(&contents).map_err(|source| MarketFileError::Parse {
            path: path.display().to_string(),
            source,
        })
    }

    /// Validate the market into a model
    pub fn into_model(self) -> Result<PreferenceModel, MalformedPreferenceError> {
        PreferenceModel::new(self.proposers, self.responders)
    }
}
