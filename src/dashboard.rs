//! Blocking Dashboard API v1 client.
//!
//! One [`ureq::Agent`] per client; every call runs on the caller's thread and
//! returns a typed [`ApiError`] on failure. There are no retries.
//!
//! # Simulation
//!
//! With `simulate` set, reads still hit the API but every mutating call is
//! logged and answered locally, so a dry run shows exactly what would be
//! created or deleted.
use crate::error::ApiError;
use crate::model::{
    GuestAccount, GuestSsidSettings, Network, NewGuestAccount, NewNetwork, Organization,
};
use crate::repository::{AccountRepository, ApiResult};
use chrono::Utc;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use ureq::http::Response;
use ureq::{Agent, Body};

pub const DEFAULT_BASE_URL: &str = "https://api.meraki.com/api/v1";

const USER_AGENT: &str = concat!("guest-sweep/", env!("CARGO_PKG_VERSION"));
const NETWORKS_PER_PAGE: u32 = 1000;
const SIMULATED_ID_PREFIX: &str = "simulated-";

/// Connection settings for [`DashboardClient`].
#[derive(Debug, Clone)]
pub struct ClientOptions {
    pub base_url: String,
    pub simulate: bool,
    pub timeout: Option<Duration>,
}

pub struct DashboardClient {
    agent: Agent,
    base_url: String,
    authorization: String,
    simulate: bool,
}

impl std::fmt::Debug for DashboardClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DashboardClient")
            .field("base_url", &self.base_url)
            .field("simulate", &self.simulate)
            .finish_non_exhaustive()
    }
}

impl DashboardClient {
    pub fn new(api_key: &str, options: &ClientOptions) -> Self {
        let config = Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(options.timeout)
            .build();
        Self {
            agent: Agent::new_with_config(config),
            base_url: options.base_url.trim_end_matches('/').to_string(),
            authorization: format!("Bearer {}", api_key.trim()),
            simulate: options.simulate,
        }
    }

    pub fn is_simulated(&self) -> bool {
        self.simulate
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn get<T: DeserializeOwned>(&self, url: &str, path: &str) -> ApiResult<(T, Option<String>)> {
        tracing::debug!(%url, "GET");
        let mut response = self
            .agent
            .get(url)
            .header("Authorization", self.authorization.as_str())
            .header("Accept", "application/json")
            .header("User-Agent", USER_AGENT)
            .call()?;
        check_status(&mut response, path)?;
        let next = response
            .headers()
            .get("link")
            .and_then(|value| value.to_str().ok())
            .and_then(next_page_link);
        let value = decode(&mut response, path)?;
        Ok((value, next))
    }

    /// Follow `Link: rel=next` headers until the last page.
    fn get_all_pages<T: DeserializeOwned>(&self, path: &str) -> ApiResult<Vec<T>> {
        let mut items = Vec::new();
        let mut next = Some(self.url(path));
        while let Some(url) = next.take() {
            let (page, following): (Vec<T>, _) = self.get(&url, path)?;
            items.extend(page);
            next = following.filter(|candidate| *candidate != url);
        }
        Ok(items)
    }

    fn send<B: Serialize, T: DeserializeOwned>(
        &self,
        method: &str,
        path: &str,
        body: &B,
    ) -> ApiResult<T> {
        let url = self.url(path);
        tracing::debug!(%url, method, "send");
        let request = match method {
            "PUT" => self.agent.put(url.as_str()),
            _ => self.agent.post(url.as_str()),
        };
        let mut response = request
            .header("Authorization", self.authorization.as_str())
            .header("Accept", "application/json")
            .header("User-Agent", USER_AGENT)
            .send_json(body)?;
        check_status(&mut response, path)?;
        decode(&mut response, path)
    }

    fn delete(&self, path: &str) -> ApiResult<()> {
        let url = self.url(path);
        tracing::debug!(%url, "DELETE");
        let mut response = self
            .agent
            .delete(url.as_str())
            .header("Authorization", self.authorization.as_str())
            .header("User-Agent", USER_AGENT)
            .call()?;
        check_status(&mut response, path)
    }
}

impl AccountRepository for DashboardClient {
    fn list_organizations(&self) -> ApiResult<Vec<Organization>> {
        self.get_all_pages("/organizations")
    }

    fn list_networks(&self, organization_id: &str) -> ApiResult<Vec<Network>> {
        let path = format!(
            "/organizations/{}/networks?perPage={NETWORKS_PER_PAGE}",
            encode_segment(organization_id)
        );
        self.get_all_pages(&path)
    }

    fn list_guest_accounts(&self, network_id: &str) -> ApiResult<Vec<GuestAccount>> {
        if self.simulate && network_id.starts_with(SIMULATED_ID_PREFIX) {
            tracing::info!(network_id, "simulate: simulated network has no stored accounts");
            return Ok(Vec::new());
        }
        let path = format!("/networks/{}/merakiAuthUsers", encode_segment(network_id));
        let (mut accounts, _): (Vec<GuestAccount>, _) = self.get(&self.url(&path), &path)?;
        for account in &mut accounts {
            account.network_id = network_id.to_string();
        }
        Ok(accounts)
    }

    fn create_guest_account(
        &self,
        network_id: &str,
        account: &NewGuestAccount,
    ) -> ApiResult<GuestAccount> {
        if self.simulate {
            tracing::info!(network_id, email = %account.email, "simulate: create guest account");
            return Ok(GuestAccount {
                id: format!("{SIMULATED_ID_PREFIX}{}", account.email),
                name: account.name.clone(),
                email: account.email.clone(),
                account_type: account.account_type.clone(),
                created_at: Utc::now(),
                authorizations: Vec::new(),
                network_id: network_id.to_string(),
            });
        }
        let path = format!("/networks/{}/merakiAuthUsers", encode_segment(network_id));
        let mut created: GuestAccount = self.send("POST", &path, account)?;
        created.network_id = network_id.to_string();
        Ok(created)
    }

    fn delete_account(&self, network_id: &str, account_id: &str) -> ApiResult<()> {
        if self.simulate {
            tracing::info!(network_id, account_id, "simulate: delete guest account");
            return Ok(());
        }
        let path = format!(
            "/networks/{}/merakiAuthUsers/{}?delete=true",
            encode_segment(network_id),
            encode_segment(account_id)
        );
        self.delete(&path)
    }

    fn create_network(&self, organization_id: &str, network: &NewNetwork) -> ApiResult<Network> {
        if self.simulate {
            tracing::info!(organization_id, name = %network.name, "simulate: create network");
            return Ok(Network {
                id: format!("{SIMULATED_ID_PREFIX}network"),
                name: network.name.clone(),
                organization_id: organization_id.to_string(),
                product_types: network.product_types.clone(),
            });
        }
        let path = format!("/organizations/{}/networks", encode_segment(organization_id));
        self.send("POST", &path, network)
    }

    fn configure_guest_ssid(
        &self,
        network_id: &str,
        settings: &GuestSsidSettings,
    ) -> ApiResult<()> {
        if self.simulate {
            tracing::info!(network_id, ssid = settings.number, "simulate: configure SSID");
            return Ok(());
        }
        let path = format!(
            "/networks/{}/wireless/ssids/{}",
            encode_segment(network_id),
            settings.number
        );
        let _: serde_json::Value = self.send("PUT", &path, settings)?;
        Ok(())
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    errors: Vec<String>,
}

fn check_status(response: &mut Response<Body>, path: &str) -> ApiResult<()> {
    let status = response.status();
    if status.is_success() {
        return Ok(());
    }
    let body = response.body_mut().read_to_string().unwrap_or_default();
    let reason = status.canonical_reason().unwrap_or("unknown");
    let err = ApiError::from_status(status.as_u16(), reason, path, error_messages(&body));
    tracing::debug!(status = status.as_u16(), path, error = %err, "request failed");
    Err(err)
}

fn decode<T: DeserializeOwned>(response: &mut Response<Body>, path: &str) -> ApiResult<T> {
    response
        .body_mut()
        .read_json::<T>()
        .map_err(|source| ApiError::Decode {
            path: path.to_string(),
            source,
        })
}

/// Messages from a Dashboard `{"errors": [...]}` body, or the raw text.
pub(crate) fn error_messages(body: &str) -> Vec<String> {
    if let Ok(parsed) = serde_json::from_str::<ErrorBody>(body) {
        if !parsed.errors.is_empty() {
            return parsed.errors;
        }
    }
    let trimmed = body.trim();
    if trimmed.is_empty() {
        Vec::new()
    } else {
        vec![trimmed.to_string()]
    }
}

/// The `rel=next` target of an RFC 8288 `Link` header, if any.
pub(crate) fn next_page_link(header: &str) -> Option<String> {
    header.split(',').find_map(|entry| {
        let mut parts = entry.split(';');
        let target = parts.next()?.trim();
        let is_next = parts.any(|param| {
            let param = param.trim();
            param == "rel=next" || param == "rel=\"next\""
        });
        if !is_next {
            return None;
        }
        target
            .strip_prefix('<')
            .and_then(|rest| rest.strip_suffix('>'))
            .map(str::to_string)
    })
}

/// Percent-encode one path segment (RFC 3986 unreserved set kept as-is).
pub(crate) fn encode_segment(raw: &str) -> String {
    urlencoding::encode(raw).into_owned()
}
