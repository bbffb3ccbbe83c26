//! Dashboard records as this tool sees them.
//!
//! Field names follow the Dashboard API v1 JSON (camelCase on the wire).
//! Records are read-only here; changes go through the repository.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Top-level tenant.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct Organization {
    pub id: String,
    pub name: String,
}

/// A network inside an organization.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Network {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub organization_id: String,
    #[serde(default)]
    pub product_types: Vec<String>,
}

/// One SSID authorization attached to an auth user.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Authorization {
    #[serde(default)]
    pub ssid_number: Option<u8>,
    #[serde(default)]
    pub authorized_at: Option<String>,
    #[serde(default)]
    pub expires_at: Option<String>,
}

/// A Meraki auth user (guest account) on one network.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct GuestAccount {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub account_type: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub authorizations: Vec<Authorization>,
    /// Not part of the API payload; set by the repository after a fetch.
    #[serde(skip)]
    pub network_id: String,
}

/// Authorization window requested when creating a guest.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NewAuthorization {
    pub ssid_number: u8,
    pub expires_at: DateTime<Utc>,
}

/// Payload for creating a guest account.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NewGuestAccount {
    pub email: String,
    pub name: String,
    pub password: String,
    pub account_type: String,
    pub email_password_to_user: bool,
    pub authorizations: Vec<NewAuthorization>,
}

/// Payload for creating a network.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NewNetwork {
    pub name: String,
    pub product_types: Vec<String>,
}

/// SSID settings that put a splash page in front of Meraki RADIUS auth.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct GuestSsidSettings {
    #[serde(skip)]
    pub number: u8,
    pub name: String,
    pub enabled: bool,
    pub auth_mode: String,
    pub splash_page: String,
}

pub const SPLASH_MERAKI_RADIUS: &str = "Password-protected with Meraki RADIUS";

impl GuestSsidSettings {
    /// Disabled open SSID with the Meraki RADIUS splash page.
    pub fn open_with_radius_splash(number: u8, name: &str) -> Self {
        Self {
            number,
            name: name.to_string(),
            enabled: false,
            auth_mode: "open".to_string(),
            splash_page: SPLASH_MERAKI_RADIUS.to_string(),
        }
    }
}
