//! Sweep configuration.
//!
//! Loaded from a JSON file when one exists, otherwise built-in defaults, then
//! overridden by command-line flags. Workflows receive it explicitly.
use crate::dashboard::DEFAULT_BASE_URL;
use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const CONFIG_SCHEMA_VERSION: u32 = 1;
pub const CONFIG_FILE_NAME: &str = "config.json";
const CONFIG_DIR_NAME: &str = "guest-sweep";

pub const DEFAULT_IMPORT_NETWORK_NAME: &str = "Meraki Wireless Account Deletion";
pub const DEFAULT_IMPORT_SSID_NAME: &str = "Meraki Auth SSID";

/// Highest SSID slot a Meraki wireless network exposes.
const MAX_SSID_NUMBER: u8 = 14;

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct SweepConfig {
    pub schema_version: u32,
    pub base_url: String,
    /// Account type the sweep targets, compared case-insensitively.
    pub account_type: String,
    /// E-mail suffixes (e.g. `@example.com`) whose holders are never deleted.
    pub excluded_domains: Vec<String>,
    pub older_than_days: u32,
    /// Log mutating API calls instead of sending them.
    pub simulate: bool,
    pub request_timeout_secs: Option<u64>,
    pub import: ImportConfig,
}

/// Settings for the CSV import round trip.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct ImportConfig {
    pub network_name: String,
    pub ssid_number: u8,
    pub ssid_name: String,
    /// Exact `Account type` value selected from the CSV and used on creation.
    pub account_type: String,
    pub authorization_minutes: u32,
    pub password_length: usize,
    pub email_password_to_user: bool,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            schema_version: CONFIG_SCHEMA_VERSION,
            base_url: DEFAULT_BASE_URL.to_string(),
            account_type: "guest".to_string(),
            excluded_domains: Vec::new(),
            older_than_days: 0,
            simulate: false,
            request_timeout_secs: None,
            import: ImportConfig::default(),
        }
    }
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            network_name: DEFAULT_IMPORT_NETWORK_NAME.to_string(),
            ssid_number: 0,
            ssid_name: DEFAULT_IMPORT_SSID_NAME.to_string(),
            account_type: "Guest".to_string(),
            authorization_minutes: 5,
            password_length: crate::password::DEFAULT_PASSWORD_LENGTH,
            email_password_to_user: false,
        }
    }
}

/// `<config dir>/guest-sweep/config.json`, when the platform has a config dir.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
}

/// Load the config at `explicit`, or the default path if it exists, or defaults.
///
/// An explicit path that does not exist is an error.
pub fn resolve_config(explicit: Option<&Path>) -> Result<SweepConfig> {
    if let Some(path) = explicit {
        return load_config(path);
    }
    match default_config_path() {
        Some(path) if path.is_file() => load_config(&path),
        _ => Ok(SweepConfig::default()),
    }
}

pub fn load_config(path: &Path) -> Result<SweepConfig> {
    let bytes = fs::read(path).with_context(|| format!("read config {}", path.display()))?;
    let config: SweepConfig = serde_json::from_slice(&bytes)
        .with_context(|| format!("parse config JSON {}", path.display()))?;
    validate_config(&config).with_context(|| format!("invalid config {}", path.display()))?;
    Ok(config)
}

/// Persist a config in a stable, pretty JSON format.
pub fn write_config(path: &Path, config: &SweepConfig) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("create config dir {}", parent.display()))?;
    }
    let text = serde_json::to_string_pretty(config).context("serialize config")?;
    fs::write(path, text.as_bytes()).with_context(|| format!("write {}", path.display()))?;
    Ok(())
}

pub fn validate_config(config: &SweepConfig) -> Result<()> {
    if config.schema_version != CONFIG_SCHEMA_VERSION {
        return Err(anyhow!(
            "unsupported config schema_version {}",
            config.schema_version
        ));
    }
    if !(config.base_url.starts_with("https://") || config.base_url.starts_with("http://")) {
        return Err(anyhow!("base_url must be an http(s) URL: {}", config.base_url));
    }
    if config.account_type.trim().is_empty() {
        return Err(anyhow!("account_type must not be empty"));
    }
    if let Some(blank) = config
        .excluded_domains
        .iter()
        .position(|domain| domain.trim().is_empty())
    {
        return Err(anyhow!("excluded_domains[{blank}] is empty"));
    }
    if config.request_timeout_secs == Some(0) {
        return Err(anyhow!("request_timeout_secs must be positive when set"));
    }

    let import = &config.import;
    if import.network_name.trim().is_empty() {
        return Err(anyhow!("import.network_name must not be empty"));
    }
    if import.account_type.trim().is_empty() {
        return Err(anyhow!("import.account_type must not be empty"));
    }
    if import.ssid_number > MAX_SSID_NUMBER {
        return Err(anyhow!(
            "import.ssid_number must be between 0 and {MAX_SSID_NUMBER}"
        ));
    }
    if import.authorization_minutes == 0 {
        return Err(anyhow!("import.authorization_minutes must be positive"));
    }
    if !(8..=128).contains(&import.password_length) {
        return Err(anyhow!("import.password_length must be between 8 and 128"));
    }
    Ok(())
}

/// Command-line values that take precedence over the file.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub older_than_days: Option<u32>,
    pub excluded_domains: Vec<String>,
    pub simulate: bool,
}

impl SweepConfig {
    /// Apply flag overrides. Excluded domains from flags are added to the file's.
    pub fn with_overrides(mut self, overrides: &ConfigOverrides) -> Result<Self> {
        if let Some(days) = overrides.older_than_days {
            self.older_than_days = days;
        }
        for domain in &overrides.excluded_domains {
            if !self.excluded_domains.contains(domain) {
                self.excluded_domains.push(domain.clone());
            }
        }
        self.simulate |= overrides.simulate;
        validate_config(&self)?;
        Ok(self)
    }

    pub fn criteria(&self) -> crate::filter::FilterCriteria {
        crate::filter::FilterCriteria {
            account_type: self.account_type.clone(),
            excluded_domains: self.excluded_domains.clone(),
            older_than_days: self.older_than_days,
        }
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
