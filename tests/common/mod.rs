//! Shared test infrastructure for workflow integration tests.
//!
//! `FakeDashboard` is an in-memory repository that records every call, and
//! `ScriptedPrompter` replays operator answers while capturing the transcript.
#![allow(dead_code)]

use chrono::{DateTime, TimeDelta, TimeZone, Utc};
use guest_sweep::error::ApiError;
use guest_sweep::model::{
    GuestAccount, GuestSsidSettings, Network, NewGuestAccount, NewNetwork, Organization,
};
use guest_sweep::prompt::Prompter;
use guest_sweep::repository::{AccountRepository, ApiResult};
use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet, VecDeque};

pub fn frozen_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
}

pub fn account(id: &str, account_type: &str, email: &str, age_days: i64) -> GuestAccount {
    GuestAccount {
        id: id.to_string(),
        name: format!("name-{id}"),
        email: email.to_string(),
        account_type: account_type.to_string(),
        created_at: frozen_now() - TimeDelta::days(age_days),
        authorizations: Vec::new(),
        network_id: String::new(),
    }
}

pub fn network(id: &str, name: &str) -> Network {
    Network {
        id: id.to_string(),
        name: name.to_string(),
        organization_id: "O_1".to_string(),
        product_types: vec!["wireless".to_string()],
    }
}

/// Every mutating or listing call the fake saw, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    ListOrganizations,
    ListNetworks(String),
    ListGuests(String),
    Create { network_id: String, email: String },
    Delete { network_id: String, account_id: String },
    CreateNetwork(String),
    ConfigureSsid { network_id: String, number: u8 },
}

#[derive(Default)]
pub struct FakeDashboard {
    pub organizations: Vec<Organization>,
    pub networks: RefCell<Vec<Network>>,
    pub accounts: RefCell<BTreeMap<String, Vec<GuestAccount>>>,
    pub failing_deletes: BTreeSet<String>,
    pub failing_creates: BTreeSet<String>,
    pub failing_listings: BTreeSet<String>,
    pub fail_network_listing: bool,
    /// `created_at` stamped on accounts created through the fake.
    pub creation_time: Option<DateTime<Utc>>,
    pub calls: RefCell<Vec<Call>>,
    pub created_payloads: RefCell<Vec<NewGuestAccount>>,
}

impl FakeDashboard {
    pub fn with_org(name: &str) -> Self {
        Self {
            organizations: vec![Organization {
                id: "O_1".to_string(),
                name: name.to_string(),
            }],
            ..Self::default()
        }
    }

    pub fn add_network(&self, network: Network, accounts: Vec<GuestAccount>) {
        self.accounts.borrow_mut().insert(network.id.clone(), accounts);
        self.networks.borrow_mut().push(network);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    pub fn delete_attempts(&self) -> Vec<String> {
        self.calls
            .borrow()
            .iter()
            .filter_map(|call| match call {
                Call::Delete { account_id, .. } => Some(account_id.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn remaining(&self, network_id: &str) -> Vec<String> {
        self.accounts
            .borrow()
            .get(network_id)
            .map(|accounts| accounts.iter().map(|a| a.id.clone()).collect())
            .unwrap_or_default()
    }

    fn record(&self, call: Call) {
        self.calls.borrow_mut().push(call);
    }
}

fn server_error(message: &str) -> ApiError {
    ApiError::from_status(500, "Internal Server Error", "/fake", vec![message.to_string()])
}

impl AccountRepository for FakeDashboard {
    fn list_organizations(&self) -> ApiResult<Vec<Organization>> {
        self.record(Call::ListOrganizations);
        Ok(self.organizations.clone())
    }

    fn list_networks(&self, organization_id: &str) -> ApiResult<Vec<Network>> {
        self.record(Call::ListNetworks(organization_id.to_string()));
        if self.fail_network_listing {
            return Err(server_error("networks unavailable"));
        }
        Ok(self.networks.borrow().clone())
    }

    fn list_guest_accounts(&self, network_id: &str) -> ApiResult<Vec<GuestAccount>> {
        self.record(Call::ListGuests(network_id.to_string()));
        if self.failing_listings.contains(network_id) {
            return Err(server_error("listing failed"));
        }
        let mut accounts = self
            .accounts
            .borrow()
            .get(network_id)
            .cloned()
            .ok_or_else(|| ApiError::from_status(404, "Not Found", network_id, Vec::new()))?;
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
        self.record(Call::Create {
            network_id: network_id.to_string(),
            email: account.email.clone(),
        });
        self.created_payloads.borrow_mut().push(account.clone());
        if self.failing_creates.contains(&account.email) {
            return Err(ApiError::from_status(
                400,
                "Bad Request",
                "/merakiAuthUsers",
                vec!["Email is invalid".to_string()],
            ));
        }
        let created = GuestAccount {
            id: format!("id-{}", account.email),
            name: account.name.clone(),
            email: account.email.clone(),
            account_type: account.account_type.clone(),
            created_at: self.creation_time.unwrap_or_else(frozen_now),
            authorizations: Vec::new(),
            network_id: network_id.to_string(),
        };
        self.accounts
            .borrow_mut()
            .entry(network_id.to_string())
            .or_default()
            .push(created.clone());
        Ok(created)
    }

    fn delete_account(&self, network_id: &str, account_id: &str) -> ApiResult<()> {
        self.record(Call::Delete {
            network_id: network_id.to_string(),
            account_id: account_id.to_string(),
        });
        if self.failing_deletes.contains(account_id) {
            return Err(server_error("delete refused"));
        }
        if let Some(accounts) = self.accounts.borrow_mut().get_mut(network_id) {
            accounts.retain(|account| account.id != account_id);
        }
        Ok(())
    }

    fn create_network(&self, organization_id: &str, new: &NewNetwork) -> ApiResult<Network> {
        self.record(Call::CreateNetwork(new.name.clone()));
        let created = Network {
            id: "N_import".to_string(),
            name: new.name.clone(),
            organization_id: organization_id.to_string(),
            product_types: new.product_types.clone(),
        };
        self.add_network(created.clone(), Vec::new());
        Ok(created)
    }

    fn configure_guest_ssid(
        &self,
        network_id: &str,
        settings: &GuestSsidSettings,
    ) -> ApiResult<()> {
        self.record(Call::ConfigureSsid {
            network_id: network_id.to_string(),
            number: settings.number,
        });
        Ok(())
    }
}

/// Replays canned answers; running out behaves like a closed stdin.
pub struct ScriptedPrompter {
    answers: VecDeque<String>,
    pub transcript: Vec<String>,
}

impl ScriptedPrompter {
    pub fn new(answers: &[&str]) -> Self {
        Self {
            answers: answers.iter().map(|answer| answer.to_string()).collect(),
            transcript: Vec::new(),
        }
    }

    pub fn saw(&self, needle: &str) -> bool {
        self.transcript.iter().any(|line| line.contains(needle))
    }

    pub fn unused_answers(&self) -> usize {
        self.answers.len()
    }
}

impl Prompter for ScriptedPrompter {
    fn read_line(&mut self, prompt: &str) -> anyhow::Result<Option<String>> {
        self.transcript.push(prompt.to_string());
        Ok(self.answers.pop_front())
    }

    fn read_secret(&mut self, prompt: &str) -> anyhow::Result<String> {
        self.transcript.push(prompt.to_string());
        Ok(self.answers.pop_front().unwrap_or_default())
    }

    fn say(&mut self, line: &str) -> anyhow::Result<()> {
        self.transcript.push(line.to_string());
        Ok(())
    }
}
