//! CSV import round trip.
//!
//! Legacy accounts must exist on the platform before they can be deleted, so
//! each selected row is re-created on a dedicated network with a short
//! authorization window and then removed by the normal per-network sweep.
use super::{log_api_error, select_organization, sweep_network, NetworkReport, WorkflowContext};
use crate::config::ImportConfig;
use crate::filter::FilterCriteria;
use crate::legacy_csv::{self, LegacyAccount};
use crate::model::{GuestSsidSettings, Network, NewAuthorization, NewGuestAccount, NewNetwork};
use crate::password::generate_password;
use anyhow::{Context, Result};
use chrono::{DateTime, Local, TimeDelta, Utc};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub rows_selected: usize,
    pub created: usize,
    pub creation_failed: usize,
    pub network_created: bool,
    pub sweep: Option<NetworkReport>,
}

/// Import `csv_path` (or a path typed at the prompt) and delete the result.
pub fn run_import(ctx: &mut WorkflowContext<'_>, csv_path: Option<&Path>) -> Result<ImportSummary> {
    let mut summary = ImportSummary::default();
    let Some(path) = resolve_csv_path(ctx, csv_path)? else {
        ctx.say("No file selected")?;
        return Ok(summary);
    };

    let config = ctx.config;
    let local_now = ctx.clock.now().with_timezone(&Local).naive_local();
    let rows = legacy_csv::load_candidates(
        &path,
        &config.import.account_type,
        config.older_than_days,
        local_now,
    )?;
    summary.rows_selected = rows.len();
    ctx.say(format!("Total Accounts: {}", rows.len()))?;
    if rows.is_empty() {
        return Ok(summary);
    }

    let Some(organization) = select_organization(ctx)? else {
        return Ok(summary);
    };
    let (network, created) = ensure_import_network(ctx, &organization.id)?;
    summary.network_created = created;

    for row in &rows {
        ctx.say(&row.email)?;
        let request = new_guest_account(row, &config.import, ctx.clock.now());
        match ctx.repo.create_guest_account(&network.id, &request) {
            Ok(account) => {
                tracing::debug!(account_id = %account.id, email = %account.email, "guest created");
                summary.created += 1;
            }
            Err(err) => {
                tracing::warn!(email = %row.email, error = %err, "guest creation failed");
                ctx.say(format!("Failed to create: {}", row.email))?;
                summary.creation_failed += 1;
            }
        }
    }

    // Rows were already aged by the CSV filter; the re-created accounts are new.
    let criteria = FilterCriteria {
        older_than_days: 0,
        ..config.criteria()
    };
    summary.sweep = Some(sweep_network(ctx, &network, &criteria)?);
    Ok(summary)
}

fn resolve_csv_path(
    ctx: &mut WorkflowContext<'_>,
    explicit: Option<&Path>,
) -> Result<Option<PathBuf>> {
    if let Some(path) = explicit {
        return Ok(Some(path.to_path_buf()));
    }
    let answer = ctx.prompter.read_line("Path to the CSV export: ")?;
    Ok(answer
        .map(|line| line.trim().trim_matches('"').to_string())
        .filter(|line| !line.is_empty())
        .map(PathBuf::from))
}

/// Find the reserved import network, creating and configuring it if needed.
///
/// Returns the network and whether it was created now.
fn ensure_import_network(
    ctx: &mut WorkflowContext<'_>,
    organization_id: &str,
) -> Result<(Network, bool)> {
    let config = ctx.config;
    let import = &config.import;
    let networks = ctx
        .repo
        .list_networks(organization_id)
        .inspect_err(|err| log_api_error("list networks", err))
        .with_context(|| format!("list networks of organization {organization_id}"))?;
    if let Some(existing) = networks
        .into_iter()
        .find(|network| network.name == import.network_name)
    {
        tracing::info!(network_id = %existing.id, "reusing import network");
        return Ok((existing, false));
    }

    let network_name = import.network_name.clone();
    let ssid = GuestSsidSettings::open_with_radius_splash(import.ssid_number, &import.ssid_name);
    ctx.say(format!(
        "Create temporary network \"{network_name}\" so imported users can be authorised and then deleted"
    ))?;
    ctx.confirm()?;

    let network = ctx
        .repo
        .create_network(
            organization_id,
            &NewNetwork {
                name: network_name.clone(),
                product_types: vec!["wireless".to_string()],
            },
        )
        .inspect_err(|err| log_api_error("create network", err))
        .with_context(|| format!("create network {network_name}"))?;
    ctx.repo
        .configure_guest_ssid(&network.id, &ssid)
        .inspect_err(|err| log_api_error("configure SSID", err))
        .with_context(|| format!("configure SSID {} on {}", ssid.number, network.id))?;
    ctx.say("Temporary Network Setup")?;
    Ok((network, true))
}

/// Creation payload for one CSV row, authorized for a short window from `now`.
pub(crate) fn new_guest_account(
    row: &LegacyAccount,
    import: &ImportConfig,
    now: DateTime<Utc>,
) -> NewGuestAccount {
    let email = row.email.trim().to_string();
    let name = match row.description.trim() {
        "" => email.clone(),
        description => description.to_string(),
    };
    NewGuestAccount {
        email,
        name,
        password: generate_password(import.password_length),
        account_type: import.account_type.clone(),
        email_password_to_user: import.email_password_to_user,
        authorizations: vec![NewAuthorization {
            ssid_number: import.ssid_number,
            expires_at: now + TimeDelta::minutes(i64::from(import.authorization_minutes)),
        }],
    }
}
