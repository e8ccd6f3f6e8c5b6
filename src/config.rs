//! Client configuration and environment loading

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::api::constants::DEFAULT_HOST;

/// How custom-field definitions are handed back to the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Representation {
    /// Mapping keyed by each definition's name
    #[default]
    Hash,
    /// Raw ordered list as the server returned it
    List,
}

impl FromStr for Representation {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "hash" => Ok(Representation::Hash),
            "list" => Ok(Representation::List),
            other => Err(anyhow::anyhow!(
                "Unknown representation '{}' (expected 'hash' or 'list')",
                other
            )),
        }
    }
}

/// Configuration for a Capsule CRM account session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Bearer token for the account
    pub token: String,
    /// API host, overridable for testing or regional accounts
    pub host: String,
    /// Gates verbose request/response dumps at debug log level
    pub debug: bool,
    /// Custom-field definition representation mode
    pub representation: Representation,
}

impl Config {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            host: DEFAULT_HOST.to_string(),
            debug: false,
            representation: Representation::default(),
        }
    }

    /// Override the API host
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    /// Enable or disable debug dumps
    pub fn debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Choose the custom-field representation mode
    pub fn representation(mut self, representation: Representation) -> Self {
        self.representation = representation;
        self
    }

    /// Load configuration from `CAPSULE_*` environment variables.
    ///
    /// Reads `CAPSULE_TOKEN` (required), `CAPSULE_HOST`, `CAPSULE_DEBUG`
    /// and `CAPSULE_FIELDS_AS`. A `.env` file is honored if present.
    pub fn from_env() -> Result<Self> {
        // Load .env file if it exists
        dotenvy::dotenv().ok();

        let token = std::env::var("CAPSULE_TOKEN")?;
        let mut config = Config::new(token);

        if let Ok(host) = std::env::var("CAPSULE_HOST") {
            config.host = host;
        }
        if let Ok(debug) = std::env::var("CAPSULE_DEBUG") {
            config.debug = debug == "1" || debug.eq_ignore_ascii_case("true");
        }
        if let Ok(mode) = std::env::var("CAPSULE_FIELDS_AS") {
            config.representation = mode.parse()?;
        }

        Ok(config)
    }
}
