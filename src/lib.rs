//! Bulk cleanup of Meraki guest accounts.
//!
//! The reusable core is [`filter`] (pure predicates and the fixed-order
//! pipeline) and [`workflow`] (confirmation-gated, best-effort deletion).
//! [`dashboard`] is the blocking HTTP implementation of
//! [`repository::AccountRepository`].
pub mod cli;
pub mod config;
pub mod credentials;
pub mod dashboard;
pub mod error;
pub mod filter;
pub mod legacy_csv;
pub mod model;
pub mod password;
pub mod prompt;
pub mod repository;
pub mod workflow;
