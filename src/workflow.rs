//! Interactive workflows: aged-guest sweep and CSV import round trip.
//!
//! Everything a workflow touches arrives through [`WorkflowContext`]: the
//! repository, the operator prompter, the config and the clock.
mod import;
mod select;
mod sweep;

pub use import::{run_import, ImportSummary};
pub use select::{select_function, select_organization, MenuChoice};
pub use sweep::{run_sweep, sweep_network, NetworkReport, SkipReason, SweepSummary};

use crate::config::SweepConfig;
use crate::error::ApiError;
use crate::prompt::{confirm_continue, Prompter};
use crate::repository::AccountRepository;
use anyhow::Result;
use chrono::{DateTime, Utc};

/// Source of "now" for age cutoffs and authorization windows.
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock that never moves.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

pub struct WorkflowContext<'a> {
    pub repo: &'a dyn AccountRepository,
    pub prompter: &'a mut dyn Prompter,
    pub config: &'a SweepConfig,
    pub clock: &'a dyn Clock,
}

impl<'a> WorkflowContext<'a> {
    pub fn new(
        repo: &'a dyn AccountRepository,
        prompter: &'a mut dyn Prompter,
        config: &'a SweepConfig,
        clock: &'a dyn Clock,
    ) -> Self {
        Self {
            repo,
            prompter,
            config,
            clock,
        }
    }

    pub(crate) fn say(&mut self, line: impl AsRef<str>) -> Result<()> {
        self.prompter.say(line.as_ref())
    }

    pub(crate) fn confirm(&mut self) -> Result<()> {
        confirm_continue(&mut *self.prompter)
    }
}

/// Show the function menu and run the chosen workflow.
pub fn run_menu(ctx: &mut WorkflowContext<'_>) -> Result<()> {
    match select_function(&mut *ctx.prompter)? {
        MenuChoice::Sweep => run_sweep(ctx).map(|_| ()),
        MenuChoice::Import => run_import(ctx, None).map(|_| ()),
    }
}

/// Log an API failure with its status, reason and messages.
pub(crate) fn log_api_error(action: &str, err: &ApiError) {
    match err {
        ApiError::Status {
            status,
            reason,
            messages,
        } => tracing::error!(action, status, reason = %reason, error = %messages.join("; "), "Meraki API error"),
        other => tracing::error!(action, status = ?other.status(), error = %other, "Meraki API error"),
    }
}
