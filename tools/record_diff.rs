// SPDX-License-Identifier: MIT
//! Report override records that are identical to their master
//!
//! Reads JSON record trees produced by a plugin loader:
//!
//! ```text
//! record-diff --master Oblivion.json --plugin MyMod.json [--ids 13344,1A2B]
//! ```

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use beth_record_equiv::{
    find_identical_overrides, EditorNameMode, MasterIndex, PluginFile, RecordComparer, RulesConfig,
};

#[derive(Parser)]
#[command(name = "record-diff", about = "Find override records identical to their master")]
struct Cli {
    /// Master record dumps, in load order
    #[arg(long = "master", required = true)]
    masters: Vec<PathBuf>,

    /// Plugin record dump to check
    #[arg(long)]
    plugin: PathBuf,

    /// TOML rules file (defaults to BETH_* environment variables)
    #[arg(long)]
    config: Option<PathBuf>,

    /// independent | mirror-current
    #[arg(long)]
    editor_name_mode: Option<EditorNameMode>,

    /// Only check these record ids (hex, comma separated)
    #[arg(long, value_delimiter = ',', value_parser = parse_id)]
    ids: Vec<u32>,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,
}

fn parse_id(s: &str) -> Result<u32, String> {
    let digits = s.trim().trim_start_matches("0x").trim_start_matches("0X");
    u32::from_str_radix(digits, 16).map_err(|e| format!("invalid record id {s:?}: {e}"))
}

fn load_plugin(path: &Path) -> Result<PluginFile> {
    let data = std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    PluginFile::from_json_slice(&data)
        .with_context(|| format!("Failed to parse {}", path.display()))
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => RulesConfig::from_toml_file(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => RulesConfig::from_env().context("Invalid BETH_* environment")?,
    };
    if let Some(mode) = cli.editor_name_mode {
        config = config.with_editor_name_mode(mode);
    }
    info!("Editor name mode: {}", config.editor_name_mode.name());

    let masters = cli
        .masters
        .iter()
        .map(|path| load_plugin(path))
        .collect::<Result<Vec<_>>>()?;
    let index = MasterIndex::from_masters(&masters);
    info!("Indexed {} master records from {} files", index.len(), masters.len());

    let plugin = load_plugin(&cli.plugin)?;
    let ids: Option<HashSet<u32>> = if cli.ids.is_empty() {
        None
    } else {
        Some(cli.ids.iter().copied().collect())
    };

    let report = find_identical_overrides(
        &plugin,
        &index,
        ids.as_ref(),
        &RecordComparer::new(config),
    );

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        for id in &report.identical {
            println!("{id:08X}");
        }
        println!("{}", report.summary());
    }

    Ok(())
}
