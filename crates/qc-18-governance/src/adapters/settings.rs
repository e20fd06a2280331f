//! # TOML Settings
//!
//! Loads the governor deployment settings from a TOML file.
//!
//! ```toml
//! [governor]
//! owner = "0x00000000000000000000000000000000000000aa"
//!
//! [parameters]
//! voting_delay = 86400
//! voting_period = 604800
//! proposal_threshold = 16
//! quorum_numerator = 4
//! late_quorum_extension = 86400
//!
//! [bounds]
//! quorum_denominator = 100
//! voting_delay = { min = 60, max = 604800 }
//! # ... one table per parameter
//!
//! [domain]
//! name = "QuantumGovernor"
//! version = "1"
//! chain_id = 1
//! verifying_contract = "0x00000000000000000000000000000000000000bb"
//! ```
//!
//! `[parameters]`, `[bounds]` and `[domain]` fall back to their defaults
//! when omitted. Values are validated against the bounds on load.

use crate::domain::{Address, BallotDomain, ConfigBounds, ConfigStore, GovernanceConfig, GovernanceError};
use crate::service::ServiceConfig;
use serde::Deserialize;
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Settings loading errors.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// File I/O error.
    #[error("failed to read {path}: {error}")]
    Io {
        /// Path of the file that failed to load.
        path: String,
        /// Error message from the I/O operation.
        error: String,
    },

    /// TOML syntax or schema error.
    #[error("failed to parse settings: {0}")]
    Parse(String),

    /// Address field is not 20 hex-encoded bytes.
    #[error("invalid address for {field}: {value}")]
    InvalidAddress {
        /// Settings key.
        field: &'static str,
        /// Rejected value.
        value: String,
    },

    /// Bounds or parameters rejected by the config store.
    #[error("invalid governance settings: {0}")]
    Invalid(#[from] GovernanceError),
}

#[derive(Debug, Deserialize)]
struct SettingsFile {
    governor: GovernorSection,
    #[serde(default)]
    parameters: GovernanceConfig,
    #[serde(default)]
    bounds: ConfigBounds,
    domain: Option<DomainSection>,
}

#[derive(Debug, Deserialize)]
struct GovernorSection {
    owner: String,
}

#[derive(Debug, Deserialize)]
struct DomainSection {
    name: String,
    version: String,
    chain_id: u64,
    verifying_contract: String,
}

/// TOML-backed settings provider.
pub struct TomlSettings;

impl TomlSettings {
    /// Loads and validates settings from a file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<ServiceConfig, SettingsError> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| SettingsError::Io {
            path: path.as_ref().display().to_string(),
            error: e.to_string(),
        })?;
        Self::parse(&content)
    }

    /// Parses and validates settings from TOML text.
    pub fn parse(content: &str) -> Result<ServiceConfig, SettingsError> {
        let file: SettingsFile =
            toml::from_str(content).map_err(|e| SettingsError::Parse(e.to_string()))?;

        let owner = parse_address("governor.owner", &file.governor.owner)?;
        let domain = match file.domain {
            Some(section) => BallotDomain {
                verifying_contract: parse_address(
                    "domain.verifying_contract",
                    &section.verifying_contract,
                )?,
                name: section.name,
                version: section.version,
                chain_id: section.chain_id,
            },
            None => BallotDomain::default(),
        };

        ConfigStore::new(file.bounds.clone(), file.parameters.clone(), 0)?;

        Ok(ServiceConfig {
            owner,
            bounds: file.bounds,
            initial: file.parameters,
            domain,
        })
    }
}

fn parse_address(field: &'static str, value: &str) -> Result<Address, SettingsError> {
    Address::from_hex(value).ok_or_else(|| SettingsError::InvalidAddress {
        field,
        value: value.to_string(),
    })
}
