//! Mediashelf CLI: upload, delete and inspect stored media.
//!
//! Configuration comes from `MEDIASHELF_*` variables (and `.env`). `--dry-run` swaps
//! the configured store for an in-memory one.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use mediashelf_cli::{derive_hash, extension_of, guess_mime_type, init_tracing};
use mediashelf_core::{FileAsset, StorageBackend, UploadConfig};
use mediashelf_processing::{DeleteOrchestrator, ObjectPlan, UploadOrchestrator, VariantPlanner};
use mediashelf_storage::create_storage;

const BACKEND_VAR: &str = "MEDIASHELF_STORAGE_BACKEND";

#[derive(Parser)]
#[command(name = "mediashelf", about = "Store media and derived image variants")]
struct Cli {
    /// Use an in-memory store instead of the configured backend
    #[arg(long, global = true)]
    dry_run: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Upload a file and its variants
    Upload {
        /// Path to the file to upload
        file: PathBuf,
        /// Logical folder inside the bucket
        #[arg(long)]
        path: Option<String>,
        /// Override the derived file hash
        #[arg(long)]
        hash: Option<String>,
    },
    /// Delete a file and every variant derived from it
    Delete {
        #[arg(long)]
        hash: String,
        /// Extension of the original, e.g. `.png`
        #[arg(long)]
        ext: String,
        #[arg(long)]
        path: Option<String>,
    },
    /// Print the keys an upload of this file would write
    Keys {
        #[arg(long)]
        hash: String,
        #[arg(long)]
        ext: String,
        #[arg(long)]
        path: Option<String>,
    },
}

fn load_config(memory: bool) -> anyhow::Result<UploadConfig> {
    let vars: Vec<(String, String)> = if memory {
        std::env::vars()
            .filter(|(key, _)| key != BACKEND_VAR)
            .chain(std::iter::once((
                BACKEND_VAR.to_string(),
                StorageBackend::Memory.to_string(),
            )))
            .collect()
    } else {
        std::env::vars().collect()
    };

    UploadConfig::from_vars(vars).context("Invalid MEDIASHELF_* configuration")
}

fn placeholder(hash: String, ext: &str, path: Option<String>) -> FileAsset {
    let file = FileAsset::new(hash, ext, guess_mime_type(ext), Vec::new());
    match path {
        Some(path) => file.with_path(path),
        None => file,
    }
}

fn print_json(value: &serde_json::Value) -> anyhow::Result<()> {
    let out = serde_json::to_string_pretty(value).context("Serialize output")?;
    println!("{}", out);
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Commands::Upload { file, path, hash } => {
            let config = Arc::new(load_config(cli.dry_run)?);
            let storage = create_storage(&config.store)
                .await
                .context("Failed to create storage backend")?;
            let uploader = UploadOrchestrator::new(storage, config)?;

            let data = tokio::fs::read(&file)
                .await
                .with_context(|| format!("Failed to read {}", file.display()))?;
            let ext = extension_of(&file);
            let hash = hash.unwrap_or_else(|| derive_hash(&file, &data));

            let mut asset = FileAsset::new(hash, &ext, guess_mime_type(&ext), data);
            if let Some(path) = path {
                asset = asset.with_path(path);
            }

            let report = uploader
                .upload(&mut asset)
                .await
                .with_context(|| format!("Failed to upload {}", file.display()))?;

            let render_failures: Vec<String> =
                report.render_failures.iter().map(|e| e.to_string()).collect();
            print_json(&serde_json::json!({
                "hash": asset.hash,
                "key": report.primary_key,
                "public_url": report.public_url,
                "variant_keys": report.variant_keys,
                "render_failures": render_failures,
            }))?;
        }
        Commands::Delete { hash, ext, path } => {
            let config = Arc::new(load_config(cli.dry_run)?);
            let storage = create_storage(&config.store)
                .await
                .context("Failed to create storage backend")?;
            let deleter = DeleteOrchestrator::new(storage, config)?;

            let asset = placeholder(hash, &ext, path);
            let report = deleter.delete(&asset).await;

            let failures: Vec<serde_json::Value> = report
                .failures
                .iter()
                .map(|(key, e)| serde_json::json!({ "key": key, "error": e.to_string() }))
                .collect();
            print_json(&serde_json::json!({
                "removed": report.removed,
                "already_absent": report.already_absent,
                "failures": failures,
            }))?;

            report.into_result().context("Delete incomplete")?;
        }
        Commands::Keys { hash, ext, path } => {
            let config = load_config(true)?;
            let planner = VariantPlanner::new(&config)?;
            let asset = placeholder(hash, &ext, path);
            let plan = ObjectPlan::for_file(&planner, &config, &asset);

            print_json(&serde_json::json!({ "keys": plan.keys() }))?;
        }
    }

    Ok(())
}
