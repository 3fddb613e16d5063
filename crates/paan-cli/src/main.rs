//! PAAN portal CLI - browse tier-gated portal content from the terminal.
//!
//! Usage:
//!   paan access "Gold Member" --tier "Associate Member"   Check one tier pair
//!   paan tiers ["Founding Agency (Tier 1)" ...]           Show the tier ladder or normalize labels
//!   paan stats events                                     Stats bar for a section
//!   paan list offers --filter available                   Filtered, accessible-first list
//!   paan login --email ada@example.com                    Sign in and save the session
//!   paan logout                                           Forget the saved session

mod commands;
mod config;
mod render;

use std::io;
use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use paan_core::{Section, SortKey, StatsFilter};
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use commands::{ListOptions, Portal, Source, View};

/// PAAN member portal in the terminal
#[derive(Parser)]
#[command(name = "paan", version, about = "Browse tier-gated PAAN portal content")]
struct Cli {
    /// Write logs to a daily-rotated file in this directory instead of stderr
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct SourceArgs {
    /// Read section rows from a JSON file instead of Supabase
    #[arg(long)]
    input: Option<PathBuf>,

    /// Read event registrations from a JSON file
    #[arg(long)]
    registrations: Option<PathBuf>,

    /// View as this member tier (e.g. "Full Member")
    #[arg(long)]
    tier: Option<String>,
}

impl From<SourceArgs> for Source {
    fn from(args: SourceArgs) -> Self {
        Source {
            input: args.input,
            registrations: args.registrations,
            tier: args.tier,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Check whether a member tier may access content of a given tier
    Access {
        /// Tier required by the content
        content_tier: String,

        /// Member tier (defaults to Free Member)
        #[arg(long)]
        tier: Option<String>,
    },

    /// Show the tier ladder, or how given labels normalize
    Tiers {
        labels: Vec<String>,
    },

    /// Show the stats bar for a section
    Stats {
        /// events, offers, resources, market-intel, opportunities, updates, access-hubs
        section: Section,

        #[command(flatten)]
        source: SourceArgs,

        /// Print buckets as JSON
        #[arg(long)]
        json: bool,
    },

    /// List a section's items, accessible first
    List {
        section: Section,

        #[command(flatten)]
        source: SourceArgs,

        /// total, available, restricted, categories, registered
        #[arg(long)]
        filter: Option<StatsFilter>,

        /// Only items in this category
        #[arg(long)]
        category: Option<String>,

        /// Free-text search over title and category
        #[arg(long)]
        search: Option<String>,

        /// Override the section's ordering: dateAsc, dateDesc, lexical
        #[arg(long)]
        sort: Option<SortKey>,

        /// Print items as JSON
        #[arg(long)]
        json: bool,
    },

    /// Sign in to the portal and save the session
    Login {
        #[arg(long)]
        email: Option<String>,
    },

    /// Forget the saved session
    Logout,
}

/// Initialize the tracing subscriber for logging.
/// Use RUST_LOG to control the level (e.g., RUST_LOG=debug); defaults to warn.
fn init_tracing(log_dir: Option<&Path>) -> Option<WorkerGuard> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    match log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "paan.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            tracing_subscriber::registry()
                .with(fmt::layer().with_writer(writer).with_ansi(false))
                .with(filter)
                .init();
            Some(guard)
        }
        None => {
            tracing_subscriber::registry()
                .with(fmt::layer().with_writer(io::stderr))
                .with(filter)
                .init();
            None
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    let _guard = init_tracing(cli.log_dir.as_deref());
    info!("paan starting");

    match cli.command {
        Commands::Access { content_tier, tier } => {
            commands::access(&content_tier, tier.as_deref());
        }
        Commands::Tiers { labels } => {
            commands::tiers(&labels);
        }
        Commands::Stats { section, source, json } => {
            let portal = Portal::open()?;
            commands::section(&portal, section, &source.into(), View::Stats { json }).await?;
        }
        Commands::List {
            section,
            source,
            filter,
            category,
            search,
            sort,
            json,
        } => {
            let portal = Portal::open()?;
            let opts = ListOptions {
                filter,
                category,
                search,
                sort,
                json,
            };
            commands::section(&portal, section, &source.into(), View::List(opts)).await?;
        }
        Commands::Login { email } => {
            let mut portal = Portal::open()?;
            commands::login(&mut portal, email).await?;
        }
        Commands::Logout => {
            let mut portal = Portal::open()?;
            commands::logout(&mut portal)?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_list_arguments() {
        let cli = Cli::try_parse_from([
            "paan", "list", "market-intel", "--filter", "available", "--tier", "Full Member", "--sort", "dateDesc",
        ])
        .expect("parse");
        match cli.command {
            Commands::List { section, filter, source, sort, .. } => {
                assert_eq!(section, Section::MarketIntel);
                assert_eq!(filter, Some(StatsFilter::Available));
                assert_eq!(source.tier.as_deref(), Some("Full Member"));
                assert_eq!(sort, Some(SortKey::DateDesc));
            }
            _ => panic!("expected list command"),
        }
    }

    #[test]
    fn test_cli_rejects_unknown_section() {
        assert!(Cli::try_parse_from(["paan", "stats", "gallery"]).is_err());
    }

    #[test]
    fn test_cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
