//! Configuration management
//!
//! Settings are read with the following priority:
//! 1. Environment variables
//! 2. `agenda.toml` in the working directory
//! 3. Default values
//!
//! `${VAR_NAME}` placeholders inside the file are expanded from the
//! environment before parsing.

use std::path::Path;

use agenda_contacts::ContactsConfig;
use serde::{Deserialize, Serialize};

use crate::Error;

/// Default configuration file name
pub const CONFIG_FILE: &str = "agenda.toml";

/// Main configuration for agenda
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Contacts API settings
    #[serde(default)]
    pub api: ContactsConfig,
}

impl Config {
    /// Replace `${VAR_NAME}` with the value returned by `lookup`.
    ///
    /// Unknown variables expand to the empty string.
    fn expand_vars(value: &str, lookup: &impl Fn(&str) -> Option<String>) -> String {
        let mut result = String::new();
        let mut chars = value.chars().peekable();

        while let Some(c) = chars.next() {
            if c == '$' && chars.peek() == Some(&'{') {
                chars.next();

                let mut var_name = String::new();
                for c in chars.by_ref() {
                    if c == '}' {
                        break;
                    }
                    var_name.push(c);
                }

                if let Some(env_value) = lookup(&var_name) {
                    result.push_str(&env_value);
                }
            } else {
                result.push(c);
            }
        }

        result
    }

    /// Parse TOML text, expanding placeholders through `lookup`
    fn from_toml_str(
        content: &str,
        lookup: &impl Fn(&str) -> Option<String>,
    ) -> crate::Result<Self> {
        let expanded = Self::expand_vars(content, lookup);
        let config: Config = toml::from_str(&expanded)
            .map_err(|e| Error::Config(format!("Failed to parse TOML: {}", e)))?;
        Ok(config)
    }

    /// Load configuration from a TOML file
    ///
    /// Environment variables override values from the file.
    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> crate::Result<Self> {
        let path = path.as_ref();

        let toml_content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Failed to read config file: {}", e)))?;

        let mut cfg = Self::from_toml_str(&toml_content, &env_lookup)?;
        cfg.apply_overrides(&env_lookup)?;
        cfg.validate()?;

        Ok(cfg)
    }

    /// Load configuration from the default location
    ///
    /// Uses `./agenda.toml` when present, otherwise environment variables only.
    pub fn load() -> crate::Result<Self> {
        if Path::new(CONFIG_FILE).exists() {
            return Self::from_toml_file(CONFIG_FILE);
        }

        Self::from_env()
    }

    /// Load configuration from environment variables
    pub fn from_env() -> crate::Result<Self> {
        let mut cfg = Self::default();
        cfg.apply_overrides(&env_lookup)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Override settings with values from `lookup`
    fn apply_overrides(&mut self, lookup: &impl Fn(&str) -> Option<String>) -> crate::Result<()> {
        if let Some(url) = lookup("AGENDA_API_URL") {
            if !url.is_empty() {
                self.api.base_url = url;
            }
        }

        if let Some(secs) = lookup("AGENDA_API_TIMEOUT_SECS") {
            let secs = secs.trim().parse::<u64>().map_err(|_| {
                Error::Config(format!("AGENDA_API_TIMEOUT_SECS is not a number: {}", secs))
            })?;
            self.api.timeout_secs = Some(secs);
        }

        Ok(())
    }

    fn validate(&self) -> crate::Result<()> {
        if self.api.base_url.trim().is_empty() {
            return Err(Error::Config("api.base_url must not be empty".to_string()));
        }
        Ok(())
    }
}

fn env_lookup(name: &str) -> Option<String> {
    std::env::var(name).ok()
}
