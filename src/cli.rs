//! CLI argument parsing.
//!
//! With no subcommand the tool shows its interactive menu; subcommands jump
//! straight to one workflow. Every destructive step still asks for
//! confirmation.
use crate::config::ConfigOverrides;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "guest-sweep",
    version,
    about = "Delete aged guest accounts from Meraki wireless networks",
    after_help = "Environment:\n  MERAKI_DASHBOARD_API_KEY  Dashboard API key (prompted for when unset)\n  RUST_LOG                  Log filter (default guest_sweep=warn)\n\nExamples:\n  guest-sweep\n  guest-sweep sweep --older-than-days 30 --exclude-domain @example.com\n  guest-sweep import --csv legacy_accounts.csv --simulate\n  guest-sweep init-config"
)]
pub struct RootArgs {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Delete aged guest accounts across one organization
    Sweep,
    Import(ImportArgs),
    InitConfig(InitConfigArgs),
}

/// Options shared by every command.
#[derive(Args, Debug, Default)]
pub struct GlobalArgs {
    /// Config file (defaults to <config dir>/guest-sweep/config.json when present)
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Only delete accounts at least this many days old
    #[arg(long, value_name = "DAYS", global = true)]
    pub older_than_days: Option<u32>,

    /// Never delete accounts whose e-mail ends with SUFFIX (repeatable)
    #[arg(long = "exclude-domain", value_name = "SUFFIX", global = true)]
    pub exclude_domains: Vec<String>,

    /// Log create/delete calls instead of sending them
    #[arg(long, global = true)]
    pub simulate: bool,

    /// Emit debug logs to stderr
    #[arg(long, global = true)]
    pub verbose: bool,
}

impl GlobalArgs {
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            older_than_days: self.older_than_days,
            excluded_domains: self.exclude_domains.clone(),
            simulate: self.simulate,
        }
    }
}

/// Re-create legacy accounts from a CSV export, then delete them.
#[derive(Args, Debug)]
pub struct ImportArgs {
    /// CSV export to import (prompted for when omitted)
    #[arg(long, value_name = "PATH")]
    pub csv: Option<PathBuf>,
}

/// Write a config file with the default settings.
#[derive(Args, Debug)]
pub struct InitConfigArgs {
    /// Where to write (defaults to the standard config path)
    #[arg(long, value_name = "PATH")]
    pub out: Option<PathBuf>,

    /// Overwrite an existing file
    #[arg(long)]
    pub force: bool,
}
