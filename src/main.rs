use anyhow::{anyhow, Result};
use clap::Parser;
use guest_sweep::cli::{Command, InitConfigArgs, RootArgs};
use guest_sweep::config::{self, SweepConfig};
use guest_sweep::credentials::{resolve_api_key, API_KEY_ENV};
use guest_sweep::dashboard::{ClientOptions, DashboardClient};
use guest_sweep::error::is_cancelled;
use guest_sweep::prompt::{ConsolePrompter, Prompter};
use guest_sweep::workflow::{self, SystemClock, WorkflowContext};
use std::time::Duration;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let args = RootArgs::parse();
    init_tracing(args.global.verbose);

    if let Some(Command::InitConfig(init)) = &args.command {
        return cmd_init_config(init);
    }

    let config = config::resolve_config(args.global.config.as_deref())?
        .with_overrides(&args.global.overrides())?;

    let mut prompter = ConsolePrompter::stdio();
    match run(&args, &config, &mut prompter) {
        Err(err) if is_cancelled(&err) => {
            tracing::info!("cancelled at confirmation prompt");
            println!("Aborted.");
            Ok(())
        }
        other => other,
    }
}

fn run(args: &RootArgs, config: &SweepConfig, prompter: &mut dyn Prompter) -> Result<()> {
    let api_key = resolve_api_key(std::env::var(API_KEY_ENV).ok(), prompter)?;
    let client = DashboardClient::new(
        &api_key,
        &ClientOptions {
            base_url: config.base_url.clone(),
            simulate: config.simulate,
            timeout: config.request_timeout_secs.map(Duration::from_secs),
        },
    );
    if client.is_simulated() {
        prompter.say("Simulation mode: create and delete calls are logged, not sent.")?;
    }

    let clock = SystemClock;
    let mut ctx = WorkflowContext::new(&client, prompter, config, &clock);
    match &args.command {
        None => workflow::run_menu(&mut ctx),
        Some(Command::Sweep) => workflow::run_sweep(&mut ctx).map(|_| ()),
        Some(Command::Import(import)) => {
            workflow::run_import(&mut ctx, import.csv.as_deref()).map(|_| ())
        }
        Some(Command::InitConfig(_)) => Ok(()),
    }
}

fn cmd_init_config(args: &InitConfigArgs) -> Result<()> {
    let path = match &args.out {
        Some(path) => path.clone(),
        None => config::default_config_path()
            .ok_or_else(|| anyhow!("no config directory on this platform; pass --out"))?,
    };
    if path.is_file() && !args.force {
        return Err(anyhow!(
            "config already exists at {} (use --force to overwrite)",
            path.display()
        ));
    }
    config::write_config(&path, &SweepConfig::default())?;
    println!("wrote {}", path.display());
    Ok(())
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose {
        "guest_sweep=debug"
    } else {
        "guest_sweep=warn"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
