// crates/zt_cli/src/args.rs
//
// Deterministic, offline CLI argument surface. No networked inputs: the
// input document is a local JSON file, outputs land in a local directory.

use std::path::PathBuf;

use clap::Parser;
use zt_core::Strategy;

/// Parsed CLI arguments.
#[derive(Debug, Parser, Clone)]
#[command(
    name = "zt",
    disable_help_subcommand = true,
    about = "Offline, deterministic workshop allocation engine"
)]
pub struct Args {
    /// Input JSON document (config + workshops + participants).
    #[arg(long)]
    pub input: PathBuf,

    /// Seed override. Accepts decimal u64 or 0x-hex (up to 16 hex digits).
    #[arg(long, value_parser = parse_seed)]
    pub seed: Option<u64>,

    /// Seed phrase: numeric strings parse as u64, anything else is hashed.
    #[arg(long, conflicts_with = "seed")]
    pub seed_phrase: Option<String>,

    /// Strategy override: greedy | fair | solver (unknown tokens fall back to greedy).
    #[arg(long, value_parser = parse_strategy)]
    pub strategy: Option<Strategy>,

    /// Output directory for result.json and run_record.json.
    #[arg(long, default_value = ".")]
    pub out: PathBuf,

    /// Compute and print the summary without writing any artifacts.
    #[arg(long)]
    pub dry_run: bool,

    /// Pretty-print the summary JSON on stdout.
    #[arg(long)]
    pub pretty: bool,

    /// Suppress non-essential logs.
    #[arg(long)]
    pub quiet: bool,
}

/// Seed parser: decimal u64 or 0x-prefixed hex (1..=16 nybbles).
pub fn parse_seed(s: &str) -> Result<u64, String> {
    let t = s.trim();
    if let Some(hex) = t.strip_prefix("0x").or_else(|| t.strip_prefix("0X")) {
        if hex.is_empty() || hex.len() > 16 {
            return Err("hex seed must be 1..=16 hex digits".into());
        }
        u64::from_str_radix(hex, 16).map_err(|e| e.to_string())
    } else {
        t.parse::<u64>().map_err(|e| e.to_string())
    }
}

fn parse_strategy(s: &str) -> Result<Strategy, String> {
    Ok(Strategy::parse_lenient(s))
}
