//! # Listwarden
//!
//! Filter-list lifecycle daemon: keeps DNS block- and allow-list
//! subscriptions downloaded, validated and active.

mod bootstrap;
mod commands;
mod di;

use clap::{Parser, Subcommand};
use listwarden_domain::{CliOverrides, FilterKind, RefreshFlags};
use mimalloc::MiMalloc;
use std::path::Path;
use tokio_util::sync::CancellationToken;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[derive(Parser)]
#[command(name = "listwarden")]
#[command(version)]
#[command(about = "Downloads, validates and activates DNS filter lists")]
struct Cli {
    /// Path to the TOML config file (created on first run)
    #[arg(short = 'c', long, default_value = "listwarden.toml")]
    config: String,

    /// Directory for downloaded filter content
    #[arg(long)]
    data_dir: Option<String>,

    /// Hours between refreshes of a filter (0 disables periodic refresh)
    #[arg(long)]
    update_interval: Option<u32>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Activate filters and refresh them periodically (default)
    Serve,
    /// Refresh filters now
    Refresh {
        /// Ignore the refresh interval and re-download every enabled filter
        #[arg(short, long)]
        force: bool,
        /// Only refresh allow-lists
        #[arg(long, conflicts_with = "blocklists")]
        allowlists: bool,
        /// Only refresh block-lists
        #[arg(long)]
        blocklists: bool,
    },
    /// Show all subscriptions
    List,
    /// Subscribe to a new list
    Add {
        url: String,
        #[arg(short, long, default_value = "")]
        name: String,
        /// Add as an allow-list
        #[arg(long)]
        allowlist: bool,
    },
    /// Unsubscribe and delete the list's content
    Remove {
        url: String,
        #[arg(long)]
        allowlist: bool,
    },
    /// Change a subscription's properties
    Edit {
        url: String,
        #[arg(long)]
        allowlist: bool,
        #[arg(long)]
        enabled: Option<bool>,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        new_url: Option<String>,
    },
    /// Replace the custom user rules
    Rules { rules: Vec<String> },
    /// Turn filtering on or off and change the refresh interval
    Settings {
        #[arg(long)]
        enabled: Option<bool>,
        /// Hours between refreshes of a filter (0 disables periodic refresh)
        #[arg(long)]
        interval: Option<u32>,
    },
}

fn kind(allowlist: bool) -> FilterKind {
    if allowlist {
        FilterKind::Allowlist
    } else {
        FilterKind::Blocklist
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let overrides = CliOverrides {
        data_dir: cli.data_dir,
        update_interval_hours: cli.update_interval,
        log_level: cli.log_level,
    };
    let first_run = !Path::new(&cli.config).exists();
    let config = bootstrap::load_config(&cli.config, overrides)?;

    bootstrap::init_logging(&config.logging);
    bootstrap::log_config(&cli.config, &config);

    let shutdown = CancellationToken::new();
    let services =
        di::FilteringServices::new(&config, Path::new(&cli.config), shutdown.clone()).await?;
    services.store.initialize().await;

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => commands::serve(services, shutdown, first_run).await,
        Command::Refresh {
            force,
            allowlists,
            blocklists,
        } => {
            let mut flags = if allowlists {
                RefreshFlags::only(FilterKind::Allowlist)
            } else if blocklists {
                RefreshFlags::only(FilterKind::Blocklist)
            } else {
                RefreshFlags::all()
            };
            if force {
                flags = flags.forced();
            }
            commands::refresh(&services, flags).await
        }
        Command::List => {
            commands::list(&services).await;
            Ok(())
        }
        Command::Add {
            url,
            name,
            allowlist,
        } => commands::add(&services, url, name, kind(allowlist)).await,
        Command::Remove { url, allowlist } => {
            commands::remove(&services, &url, kind(allowlist)).await
        }
        Command::Edit {
            url,
            allowlist,
            enabled,
            name,
            new_url,
        } => commands::edit(&services, &url, kind(allowlist), enabled, name, new_url).await,
        Command::Rules { rules } => commands::set_rules(&services, rules).await,
        Command::Settings { enabled, interval } => {
            commands::settings(&services, enabled, interval).await
        }
    }
}
