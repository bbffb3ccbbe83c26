//! Account filters and the fixed-order pipeline that chains them.
//!
//! Every function here is pure: inputs are borrowed, each stage returns a new
//! `Vec` in input order, and the clock is passed in rather than read.
use crate::model::GuestAccount;
use chrono::{DateTime, TimeDelta, Utc};
use std::fmt;

/// Keep accounts whose type tag matches `account_type`, ignoring case.
pub fn filter_by_account_type(accounts: &[GuestAccount], account_type: &str) -> Vec<GuestAccount> {
    let wanted = account_type.to_lowercase();
    accounts
        .iter()
        .filter(|account| account.account_type.to_lowercase() == wanted)
        .cloned()
        .collect()
}

/// Drop accounts whose e-mail ends with any of `excluded_suffixes`.
pub fn filter_by_excluded_domains(
    accounts: &[GuestAccount],
    excluded_suffixes: &[String],
) -> Vec<GuestAccount> {
    accounts
        .iter()
        .filter(|account| {
            !excluded_suffixes
                .iter()
                .any(|suffix| account.email.ends_with(suffix.as_str()))
        })
        .cloned()
        .collect()
}

/// Keep accounts created at or before `now - threshold_days`.
pub fn filter_by_age(
    accounts: &[GuestAccount],
    threshold_days: u32,
    now: DateTime<Utc>,
) -> Vec<GuestAccount> {
    let cutoff = age_cutoff(now, threshold_days);
    accounts
        .iter()
        .filter(|account| account.created_at <= cutoff)
        .cloned()
        .collect()
}

/// `now - threshold_days`, clamped to the earliest representable instant.
pub fn age_cutoff(now: DateTime<Utc>, threshold_days: u32) -> DateTime<Utc> {
    now.checked_sub_signed(TimeDelta::days(i64::from(threshold_days)))
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}

/// Parameters for one pipeline run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterCriteria {
    pub account_type: String,
    pub excluded_domains: Vec<String>,
    pub older_than_days: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterStage {
    AccountType,
    ExcludedDomains,
    Age,
}

impl FilterStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            FilterStage::AccountType => "account type",
            FilterStage::ExcludedDomains => "excluded domains",
            FilterStage::Age => "age",
        }
    }
}

impl fmt::Display for FilterStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of [`run_pipeline`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineOutcome {
    /// Accounts that passed every stage, in input order.
    pub candidates: Vec<GuestAccount>,
    /// The stage that left nothing, if the pipeline stopped early.
    pub emptied_at: Option<FilterStage>,
}

impl PipelineOutcome {
    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }
}

/// Apply type, domain and age filters in that order.
///
/// Stops at the first stage that produces an empty list.
pub fn run_pipeline(
    accounts: &[GuestAccount],
    criteria: &FilterCriteria,
    now: DateTime<Utc>,
) -> PipelineOutcome {
    let stopped = |stage| PipelineOutcome {
        candidates: Vec::new(),
        emptied_at: Some(stage),
    };

    let by_type = filter_by_account_type(accounts, &criteria.account_type);
    if by_type.is_empty() {
        return stopped(FilterStage::AccountType);
    }

    let by_domain = filter_by_excluded_domains(&by_type, &criteria.excluded_domains);
    if by_domain.is_empty() {
        return stopped(FilterStage::ExcludedDomains);
    }

    let by_age = filter_by_age(&by_domain, criteria.older_than_days, now);
    if by_age.is_empty() {
        return stopped(FilterStage::Age);
    }

    PipelineOutcome {
        candidates: by_age,
        emptied_at: None,
    }
}

#[cfg(test)]
#[path = "filter_tests.rs"]
mod tests;
