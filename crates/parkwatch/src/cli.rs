//! Clap derive structures for the `parkwatch` CLI.

use std::path::PathBuf;
use std::str::FromStr;

use clap::{Args, Parser, Subcommand, ValueEnum};

use parkwatch_core::FacilityCategory;

// ── Top-Level CLI ────────────────────────────────────────────────────

/// parkwatch -- live parking occupancy from the command line
#[derive(Debug, Parser)]
#[command(
    name = "parkwatch",
    version,
    about = "Query and watch live parking-occupancy data",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Config file path (defaults to the platform config dir)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Feed base URL (overrides the config file)
    #[arg(long, short = 'e', env = "PARKWATCH_ENDPOINT", global = true)]
    pub endpoint: Option<String>,

    /// Feed API key
    #[arg(long, env = "PARKWATCH_API_KEY", global = true, hide_env = true)]
    pub api_key: Option<String>,

    /// Output format
    #[arg(long, short = 'o', default_value = "table", global = true)]
    pub output: OutputFormat,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Accept self-signed TLS certificates
    #[arg(long, short = 'k', global = true)]
    pub insecure: bool,

    /// Request timeout in seconds (overrides the config file)
    #[arg(long, global = true)]
    pub timeout: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
    JsonCompact,
    Plain,
}

// ── Commands ─────────────────────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List facilities from one refresh of the feed
    List(ListArgs),

    /// Show one facility with per-spot detail
    Show(ShowArgs),

    /// Run periodic sync and print every state transition
    Watch(WatchArgs),
}

#[derive(Debug, Args)]
pub struct ListArgs {
    /// Case-insensitive substring match on name and address
    #[arg(long, short = 's')]
    pub search: Option<String>,

    /// Only show these categories (repeatable: garage, street, lot)
    #[arg(long, short = 'c', value_parser = parse_category)]
    pub category: Vec<FacilityCategory>,
}

#[derive(Debug, Args)]
pub struct ShowArgs {
    /// Facility id
    pub id: u64,
}

#[derive(Debug, Args)]
pub struct WatchArgs {
    /// Sync cadence in seconds (overrides the config file)
    #[arg(long, short = 'i')]
    pub interval: Option<u64>,

    #[command(flatten)]
    pub filter: ListArgs,
}

fn parse_category(raw: &str) -> Result<FacilityCategory, String> {
    FacilityCategory::from_str(raw)
        .map_err(|_| format!("unknown category '{raw}' (expected garage, street, or lot)"))
}
