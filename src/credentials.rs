//! API key lookup.
use crate::prompt::Prompter;
use anyhow::{anyhow, Result};

pub const API_KEY_ENV: &str = "MERAKI_DASHBOARD_API_KEY";

/// Use `env_value` when it is non-blank, otherwise ask without echo.
pub fn resolve_api_key(env_value: Option<String>, prompter: &mut dyn Prompter) -> Result<String> {
    if let Some(key) = env_value.filter(|key| !key.trim().is_empty()) {
        tracing::debug!("using API key from {API_KEY_ENV}");
        return Ok(key.trim().to_string());
    }
    let key = prompter.read_secret("Enter your Meraki API key: ")?;
    let key = key.trim();
    if key.is_empty() {
        return Err(anyhow!("no API key provided (set {API_KEY_ENV} or enter one)"));
    }
    Ok(key.to_string())
}
