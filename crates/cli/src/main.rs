//! `n8n-workflows` CLI entry-point.
//!
//! Available sub-commands:
//! - `backup`   — export workflows from the n8n database to JSON files.
//! - `deploy`   — write workflow JSON files back into the n8n database.
//! - `list`     — show the workflows stored in n8n.
//! - `registry` — show the static workflow catalog.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use ops::{BatchReport, ListScope, SyncConfig, SyncError, DEFAULT_NAME_PREFIX};
use registry::Registry;
use tracing::debug;
use tracing_subscriber::EnvFilter;

mod report;

#[derive(Parser)]
#[command(
    name = "n8n-workflows",
    about = "Back up, deploy and list n8n workflows",
    version
)]
struct Cli {
    #[command(flatten)]
    paths: PathArgs,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args)]
struct PathArgs {
    /// n8n SQLite database [default: ~/.n8n/database.sqlite]
    #[arg(long, global = true, env = "N8N_DB_PATH")]
    database: Option<PathBuf>,

    /// Directory holding the latest copy of each workflow.
    #[arg(long, global = true, env = "N8N_WORKFLOWS_DIR", default_value = "workflows")]
    workflows_dir: PathBuf,

    /// Directory receiving timestamped backup copies.
    #[arg(long, global = true, env = "N8N_BACKUPS_DIR", default_value = "backups")]
    backups_dir: PathBuf,

    /// Name prefix selecting the workflows this project manages.
    #[arg(long, global = true, env = "N8N_WORKFLOW_PREFIX", default_value = DEFAULT_NAME_PREFIX)]
    prefix: String,
}

#[derive(Subcommand)]
enum Command {
    /// Export workflows from the n8n database to JSON files.
    Backup {
        /// n8n workflow id, or `all` for every matching workflow (default).
        target: Option<String>,
    },
    /// Deploy workflow JSON files to the n8n database.
    Deploy {
        /// Registry key, or `all`.
        target: Option<String>,
    },
    /// List workflows stored in n8n.
    List {
        /// Every workflow in the database.
        #[arg(long, conflicts_with = "catalyst")]
        all: bool,
        /// Only workflows matching the name prefix (default).
        #[arg(long)]
        catalyst: bool,
    },
    /// Show the static workflow registry.
    Registry,
}

impl PathArgs {
    fn into_config(self) -> Result<SyncConfig, SyncError> {
        let mut config = match self.database {
            Some(path) => SyncConfig::with_database(path),
            None => SyncConfig::from_home()?,
        };
        config.workflows_dir = self.workflows_dir;
        config.backups_dir = self.backups_dir;
        config.name_prefix = self.prefix;
        debug!(?config, "resolved configuration");
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let registry = Registry::builtin();

    match run(cli.command, cli.paths, &registry).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("❌ {e:#}");
            ExitCode::FAILURE
        }
    }
}

/// Dispatch one sub-command. Paths are only resolved by commands that touch
/// the database or the workflow files.
async fn run(command: Command, paths: PathArgs, registry: &Registry) -> anyhow::Result<ExitCode> {
    match command {
        Command::Registry => {
            print!("{}", report::registry_catalog(registry));
            Ok(ExitCode::SUCCESS)
        }
        Command::Backup { target } => {
            let config = paths.into_config()?;
            match target.as_deref() {
                None | Some("all") => backup_all(&config).await,
                Some(id) => backup_one(&config, id).await,
            }
        }
        Command::Deploy { target: None } => {
            eprintln!("❌ Error: Please specify a workflow name or \"all\"");
            eprint!("{}", report::deploy_usage(registry));
            Ok(ExitCode::FAILURE)
        }
        Command::Deploy { target: Some(target) } => {
            let config = paths.into_config()?;
            if target == "all" {
                deploy_all(&config, registry).await
            } else {
                deploy_one(&config, registry, &target).await
            }
        }
        Command::List { all, .. } => {
            let config = paths.into_config()?;
            let scope = if all { ListScope::All } else { ListScope::Matching };
            match scope {
                ListScope::All => println!("📋 Listing all n8n workflows...\n"),
                ListScope::Matching => println!("📋 Listing {} workflows...\n", config.name_prefix),
            }
            let listing = ops::list_workflows(&config, scope)
                .await
                .context("Failed to list workflows")?;
            print!("{listing}");
            Ok(ExitCode::SUCCESS)
        }
    }
}

async fn backup_one(config: &SyncConfig, id: &str) -> anyhow::Result<ExitCode> {
    println!("🚀 Backing up workflow: {id}\n");
    let summary = ops::backup_workflow(config, id).await.context("Backup failed")?;
    println!("✅ Successfully backed up!");
    println!("   Name: {}", summary.name);
    print!("{}", report::backup_details(&summary));
    Ok(ExitCode::SUCCESS)
}

async fn deploy_one(config: &SyncConfig, registry: &Registry, target: &str) -> anyhow::Result<ExitCode> {
    println!("🚀 Deploying workflow: {target}\n");
    match ops::deploy(config, registry, target).await {
        Ok(summary) => {
            println!("✅ Successfully deployed!");
            println!("   Name: {}", summary.name);
            print!("{}", report::deploy_details(&summary));
            Ok(ExitCode::SUCCESS)
        }
        Err(e @ SyncError::UnknownWorkflow { .. }) => {
            eprintln!("❌ Error: {e}");
            eprint!("{}", report::available_workflows(registry));
            Ok(ExitCode::FAILURE)
        }
        Err(e) => Err(anyhow::Error::new(e).context("Deployment failed")),
    }
}

async fn backup_all(config: &SyncConfig) -> anyhow::Result<ExitCode> {
    println!("🔍 Finding all {} workflows...\n", config.name_prefix);
    let batch = ops::backup_matching(config).await.context("Backup failed")?;

    if batch.is_empty() {
        println!("⚠️  No {} workflows found", config.name_prefix);
        return Ok(ExitCode::SUCCESS);
    }

    for entry in &batch.entries {
        match &entry.result {
            Ok(summary) => {
                println!("✅ Backed up: {}", summary.name);
                println!("{}", report::backup_details(summary));
            }
            Err(e) => eprintln!("❌ Failed to backup {}: {}\n", entry.target, report::error_chain(e)),
        }
    }
    println!("✨ Backup complete! ({} ok, {} failed)", batch.succeeded(), batch.failed());
    Ok(batch_exit_code(&batch))
}

async fn deploy_all(config: &SyncConfig, registry: &Registry) -> anyhow::Result<ExitCode> {
    println!("🚀 Deploying all workflows...\n");
    let batch = ops::deploy_all(config, registry).await.context("Deployment failed")?;

    for entry in &batch.entries {
        match &entry.result {
            Ok(summary) => {
                println!("✅ Deployed: {}", summary.name);
                println!("{}", report::deploy_details(summary));
            }
            Err(e) => eprintln!("❌ Failed to deploy {}: {}\n", entry.target, report::error_chain(e)),
        }
    }
    println!("✨ Deployment complete! ({} ok, {} failed)", batch.succeeded(), batch.failed());
    Ok(batch_exit_code(&batch))
}

/// A batch fails only when it attempted records and none of them worked.
fn batch_exit_code<T>(report: &BatchReport<T>) -> ExitCode {
    if report.all_failed() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
