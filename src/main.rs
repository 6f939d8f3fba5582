use std::io;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen},
};
use tui::{backend::CrosstermBackend, Terminal};

use invoice_drafter::{
    api::HttpInvoiceApi,
    app::{self, App},
    cli::{Cli, Command},
    commands, config, logging,
};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = cli.apply_overrides(config::init()?);
    let api = HttpInvoiceApi::new(&config.api_url, config.request_timeout())?;

    match cli.command {
        Some(Command::Generate { prompt, out }) => {
            logging::init_stderr();
            let draft = commands::generate(&api, &prompt, out.as_deref(), &mut io::stdout()).await?;
            eprint!("{}", commands::summary(&draft));
        }
        Some(Command::Export { input, format }) => {
            logging::init_stderr();
            let path = commands::export(&api, &input, format, &config.download_dir).await?;
            println!("{}", path.display());
        }
        Some(Command::Edit { prompt }) => run_editor(config, api, prompt).await?,
        None => run_editor(config, api, None).await?,
    }

    Ok(())
}

async fn run_editor(config: config::Config, api: HttpInvoiceApi, prompt: Option<String>) -> Result<()> {
    logging::init_file(&config.log_file)?;
    tracing::info!(api_url = %api.base_url(), "starting editor");

    // Setup terminal
    terminal::enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(Arc::new(api), config.download_dir.clone(), prompt);
    let result = app::run(&mut terminal, &mut app).await;

    // Restore terminal
    terminal::disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = &result {
        tracing::error!(error = %format!("{:#}", err), "editor stopped");
        println!("Error: {}", err);
    }

    result
}
