//! Hierarchy filter CLI
//!
//! Filters a hierarchy JSON document against a detection result and prints
//! the outcome as JSON.
//!
//! # Usage
//!
//! ```bash
//! ps_lab_filter --hierarchy org.json --detection detected.json
//! ps_lab_filter --hierarchy org.json --detection detected.json \
//!     --permission-type PSG --names Sales_Bundle,Support_Bundle
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use serde::de::DeserializeOwned;
use tracing::info;

use ps_lab::{filter, DetectionResult, FilterPayload, Node, PermissionType};

#[derive(Parser, Debug)]
#[command(name = "ps_lab_filter")]
#[command(version = "0.1.0")]
#[command(about = "Prune a permission-set hierarchy to the nodes a detection result touches")]
struct Args {
    /// Full hierarchy JSON (root node with branch children)
    #[arg(long)]
    hierarchy: PathBuf,

    /// Detection result JSON (array of detected permission sets)
    #[arg(long)]
    detection: PathBuf,

    /// Scope of the query: PSG, PS or User
    #[arg(long, env = "PS_LAB_PERMISSION_TYPE")]
    permission_type: Option<PermissionType>,

    /// Comma-separated target API names
    #[arg(long)]
    names: Option<String>,

    /// Print compact JSON
    #[arg(long)]
    compact: bool,
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("Failed to parse {}", path.display()))
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let hierarchy: Node = read_json(&args.hierarchy)?;
    let detection: DetectionResult = read_json(&args.detection)?;
    let payload = FilterPayload::new(args.permission_type, args.names.as_deref());

    let outcome = filter(Some(&hierarchy), &detection, &payload);
    info!(
        matched = outcome.has_results(),
        highlighted = outcome.highlighted_ids.len(),
        "filter complete"
    );

    let json = if args.compact {
        serde_json::to_string(&outcome)?
    } else {
        serde_json::to_string_pretty(&outcome)?
    };
    println!("{}", json);
    Ok(())
}
