use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::Config;
use crate::models::ExportFormat;

/// Draft invoices from a description, edit them and export them.
#[derive(Debug, Parser)]
#[command(name = "invoice_drafter", version)]
pub struct Cli {
    /// Invoice backend root [env: INVOICE_API_URL]
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Directory exported files are saved to [env: INVOICE_DOWNLOAD_DIR]
    #[arg(long, global = true)]
    pub download_dir: Option<PathBuf>,

    /// Log file used by the editor [env: INVOICE_LOG_FILE]
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Open the interactive editor (default)
    Edit {
        /// Pre-fill the prompt
        #[arg(long)]
        prompt: Option<String>,
    },
    /// Generate a draft and print it as JSON
    Generate {
        prompt: String,
        /// Write the draft here instead of stdout
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Export a saved draft through the backend
    Export {
        #[arg(long)]
        input: PathBuf,
        /// pdf, xml, csv or json
        #[arg(long)]
        format: ExportFormat,
    },
}

impl Cli {
    /// Command-line flags win over the environment.
    pub fn apply_overrides(&self, mut config: Config) -> Config {
        if let Some(api_url) = &self.api_url {
            config.api_url = api_url.clone();
        }
        if let Some(dir) = &self.download_dir {
            config.download_dir = dir.clone();
        }
        if let Some(log_file) = &self.log_file {
            config.log_file = log_file.clone();
        }
        config
    }
}
