mod table;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use tracing::info;
use validator::Validate;

use crate::application::LeadWorkflow;
use crate::domain::error::{AppError, Result};
use crate::domain::workflow_config::WorkflowConfig;
use crate::infrastructure::config::ConfigService;
use crate::infrastructure::csv::export_file_name;
use crate::infrastructure::leads_api::HttpLeadsBackend;

pub use table::{render_rows, status_summary};

#[derive(Parser, Debug)]
#[command(
    name = "smart-leads",
    version,
    about = "Search business leads, validate WhatsApp presence and export CSV"
)]
pub struct Cli {
    /// Path to a TOML configuration file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Backend address, overriding the configuration
    #[arg(long, global = true, value_name = "URL")]
    pub api_base: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show the backend's validation provider and search mode
    Status,
    /// Search leads for a city and export them as CSV
    Search(SearchArgs),
    /// Import a CSV file, validate its phone numbers and export the result
    ValidateCsv(ValidateCsvArgs),
}

#[derive(Args, Debug)]
pub struct SearchArgs {
    /// City or region to search in
    #[arg(long)]
    pub city: String,

    /// Business segment, e.g. "padaria"
    #[arg(long, default_value = "")]
    pub segment: String,

    /// Number of leads to request (non-numeric values use the default)
    #[arg(long)]
    pub total: Option<String>,

    /// Validate numbers after the search even if auto_validate is off
    #[arg(long)]
    pub validate: bool,

    /// Output path for the CSV export
    #[arg(long, value_name = "PATH")]
    pub out: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct ValidateCsvArgs {
    /// CSV file with a name, phone and/or address header
    #[arg(long, value_name = "PATH")]
    pub file: PathBuf,

    /// Output path for the CSV export
    #[arg(long, value_name = "PATH")]
    pub out: Option<PathBuf>,
}

fn load_config(cli: &Cli) -> Result<WorkflowConfig> {
    ConfigService::load_dotenv();
    let service = match &cli.config {
        Some(path) => ConfigService::with_path(path),
        None => ConfigService::new(),
    };
    let mut config = service.load()?;
    if let Some(api_base) = &cli.api_base {
        config.api_base = api_base.clone();
        config
            .validate()
            .map_err(|e| AppError::ConfigError(format!("Invalid --api-base: {}", e)))?;
    }
    Ok(config)
}

fn build_workflow(config: WorkflowConfig) -> Result<LeadWorkflow> {
    let backend = HttpLeadsBackend::new(&config)?;
    Ok(LeadWorkflow::new(config, Arc::new(backend)))
}

async fn write_export(out: Option<PathBuf>, csv: &str) -> Result<PathBuf> {
    let path = out.unwrap_or_else(|| PathBuf::from(export_file_name(chrono::Utc::now())));
    tokio::fs::write(&path, csv).await.map_err(|e| {
        AppError::IoError(format!("Failed to write {}: {}", path.display(), e))
    })?;
    info!(path = %path.display(), bytes = csv.len(), "CSV exported");
    Ok(path)
}

async fn read_upload(path: &Path) -> Result<Vec<u8>> {
    tokio::fs::read(path)
        .await
        .map_err(|e| AppError::IoError(format!("Failed to read {}: {}", path.display(), e)))
}

pub async fn execute(cli: Cli) -> Result<()> {
    let mut config = load_config(&cli)?;

    match cli.command {
        Commands::Status => {
            let workflow = build_workflow(config)?;
            let status = workflow.backend_status().await?;
            let or_dash = |v: Option<String>| v.unwrap_or_else(|| "-".to_string());
            println!("Validator:     {}", or_dash(status.validation_provider));
            println!("Search mode:   {}", or_dash(status.search_mode));
            println!(
                "Google Places: {}",
                match status.has_places {
                    Some(true) => "configured",
                    Some(false) => "not configured",
                    None => "-",
                }
            );
        }
        Commands::Search(args) => {
            if args.validate {
                config.auto_validate = true;
            }
            let workflow = build_workflow(config)?;
            let total = workflow.parse_total(args.total.as_deref().unwrap_or(""));
            let outcome = workflow
                .run_search_pipeline(&args.city, &args.segment, Some(total))
                .await?;

            print!("{}", render_rows(&outcome.rows));
            let path = write_export(args.out, &outcome.csv).await?;
            println!("Done. {} contacts ({}).", outcome.total, status_summary(&outcome.rows));
            println!("Saved {}", path.display());
        }
        Commands::ValidateCsv(args) => {
            let workflow = build_workflow(config)?;
            let bytes = read_upload(&args.file).await?;
            let outcome = workflow.run_import_pipeline(&bytes).await?;
            if let Some(problem) = outcome.problem {
                return Err(problem);
            }

            print!("{}", render_rows(&outcome.rows));
            if let Some(csv) = outcome.csv {
                let path = write_export(args.out, &csv).await?;
                println!("Done. {} rows ({}).", outcome.rows.len(), status_summary(&outcome.rows));
                println!("Saved {}", path.display());
            }
        }
    }

    Ok(())
}
