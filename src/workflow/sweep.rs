use super::{log_api_error, select_organization, WorkflowContext};
use crate::filter::{run_pipeline, FilterCriteria, FilterStage};
use crate::model::Network;
use anyhow::{Context, Result};

/// Why a network produced no deletions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    FetchFailed,
    NoAccounts,
    NoCandidates(FilterStage),
}

/// What happened on one network.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkReport {
    pub network_id: String,
    pub network_name: String,
    pub total_accounts: usize,
    pub candidates: usize,
    /// Ids of deleted accounts, in deletion order.
    pub deleted: Vec<String>,
    /// Ids whose deletion failed.
    pub failed: Vec<String>,
    pub skipped: Option<SkipReason>,
}

impl NetworkReport {
    fn new(network: &Network) -> Self {
        Self {
            network_id: network.id.clone(),
            network_name: network.name.clone(),
            total_accounts: 0,
            candidates: 0,
            deleted: Vec::new(),
            failed: Vec::new(),
            skipped: None,
        }
    }

    fn skip(mut self, reason: SkipReason) -> Self {
        self.skipped = Some(reason);
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SweepSummary {
    pub networks: Vec<NetworkReport>,
}

impl SweepSummary {
    pub fn deleted_count(&self) -> usize {
        self.networks.iter().map(|report| report.deleted.len()).sum()
    }

    pub fn failed_count(&self) -> usize {
        self.networks.iter().map(|report| report.failed.len()).sum()
    }
}

/// Delete aged guest accounts across every network of one organization.
pub fn run_sweep(ctx: &mut WorkflowContext<'_>) -> Result<SweepSummary> {
    let Some(organization) = select_organization(ctx)? else {
        return Ok(SweepSummary::default());
    };

    let criteria = ctx.config.criteria();
    ctx.say(format!(
        "This will remove all {} users older than {} days.",
        criteria.account_type, criteria.older_than_days
    ))?;
    ctx.say("These email domains will be ignored:")?;
    for domain in &criteria.excluded_domains {
        ctx.say(domain)?;
    }

    let networks = ctx
        .repo
        .list_networks(&organization.id)
        .inspect_err(|err| log_api_error("list networks", err))
        .with_context(|| format!("list networks of organization {}", organization.id))?;
    ctx.say(format!("Found {} networks.", networks.len()))?;
    ctx.confirm()?;

    let mut summary = SweepSummary::default();
    for network in &networks {
        summary.networks.push(sweep_network(ctx, network, &criteria)?);
    }

    ctx.say(format!(
        "Done: {} deleted, {} failed across {} networks.",
        summary.deleted_count(),
        summary.failed_count(),
        summary.networks.len()
    ))?;
    Ok(summary)
}

/// Fetch, filter, confirm and delete on a single network.
///
/// A fetch failure skips the network; a delete failure skips the account.
/// Only cancellation and prompt I/O errors are returned.
pub fn sweep_network(
    ctx: &mut WorkflowContext<'_>,
    network: &Network,
    criteria: &FilterCriteria,
) -> Result<NetworkReport> {
    let mut report = NetworkReport::new(network);

    let accounts = match ctx.repo.list_guest_accounts(&network.id) {
        Ok(accounts) => accounts,
        Err(err) => {
            log_api_error("list guest accounts", &err);
            ctx.say(format!(
                "Failed to fetch users for network {} {}: {err}",
                network.name, network.id
            ))?;
            return Ok(report.skip(SkipReason::FetchFailed));
        }
    };
    report.total_accounts = accounts.len();
    ctx.say(format!(
        "Network: {} {} - Total Users: {}",
        network.name,
        network.id,
        accounts.len()
    ))?;
    if accounts.is_empty() {
        return Ok(report.skip(SkipReason::NoAccounts));
    }

    let outcome = run_pipeline(&accounts, criteria, ctx.clock.now());
    if let Some(stage) = outcome.emptied_at {
        tracing::debug!(network_id = %network.id, %stage, "no deletion candidates");
        return Ok(report.skip(SkipReason::NoCandidates(stage)));
    }
    report.candidates = outcome.candidates.len();

    ctx.say(format!("Found {} to delete.", outcome.candidates.len()))?;
    ctx.confirm()?;

    for account in &outcome.candidates {
        match ctx.repo.delete_account(&network.id, &account.id) {
            Ok(()) => {
                ctx.say(format!("Deleted: {}", account.name))?;
                report.deleted.push(account.id.clone());
            }
            Err(err) => {
                tracing::warn!(
                    network_id = %network.id,
                    account_id = %account.id,
                    error = %err,
                    "delete failed"
                );
                ctx.say(format!("Failed to delete: {}", account.name))?;
                report.failed.push(account.id.clone());
            }
        }
    }
    Ok(report)
}
