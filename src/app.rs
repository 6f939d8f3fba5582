//! Screen switching, background requests and the terminal event loop.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{error, info};
use tui::{backend::Backend, Frame, Terminal};

use crate::api::{ApiError, InvoiceApi};
use crate::document::InvoiceDocument;
use crate::download;
use crate::models::{ExportFormat, InvoiceDraft};
use crate::ui::editor::{self, EditorAction, EditorState, Status, render_editor};
use crate::ui::prompt::{self, GENERATION_FAILED, PromptAction, PromptState, render_prompt};

const TICK: Duration = Duration::from_millis(100);

// Represents the current screen in the app
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AppScreen {
    Prompt,
    Editor,
}

/// Result of a background request, applied on the UI loop.
#[derive(Debug)]
pub enum Outcome {
    Generated(Result<InvoiceDraft, ApiError>),
    Exported(ExportFormat, Result<PathBuf>),
}

// Main application state
pub struct App {
    api: Arc<dyn InvoiceApi>,
    download_dir: PathBuf,
    screen: AppScreen,
    prompt_state: PromptState,
    editor_state: Option<EditorState>,
    tx: UnboundedSender<Outcome>,
    rx: UnboundedReceiver<Outcome>,
}

impl App {
    pub fn new(api: Arc<dyn InvoiceApi>, download_dir: PathBuf, prompt: Option<String>) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            api,
            download_dir,
            screen: AppScreen::Prompt,
            prompt_state: PromptState::new(prompt),
            editor_state: None,
            tx,
            rx,
        }
    }

    pub fn screen(&self) -> AppScreen {
        self.screen
    }

    pub fn prompt_state(&self) -> &PromptState {
        &self.prompt_state
    }

    pub fn editor_state(&self) -> Option<&EditorState> {
        self.editor_state.as_ref()
    }

    /// Handles one key press. Returns `true` when the app should quit.
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return true;
        }

        match self.screen {
            AppScreen::Prompt => match prompt::handle_key(&mut self.prompt_state, key) {
                Some(PromptAction::Generate(text)) => self.spawn_generate(text),
                Some(PromptAction::BackToEditor) => self.screen = AppScreen::Editor,
                Some(PromptAction::Exit) => return true,
                None => {}
            },
            AppScreen::Editor => {
                let Some(state) = self.editor_state.as_mut() else {
                    self.screen = AppScreen::Prompt;
                    return false;
                };
                match editor::handle_key(state, key) {
                    Some(EditorAction::Export(format)) => self.spawn_export(format),
                    Some(EditorAction::NewPrompt) => self.screen = AppScreen::Prompt,
                    Some(EditorAction::Exit) => return true,
                    None => {}
                }
            }
        }
        false
    }

    fn spawn_generate(&mut self, text: String) {
        self.prompt_state.start_generating();

        let api = Arc::clone(&self.api);
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = api.generate_template(&text).await;
            let _ = tx.send(Outcome::Generated(result));
        });
    }

    fn spawn_export(&mut self, format: ExportFormat) {
        let Some(state) = self.editor_state.as_mut() else {
            return;
        };
        state.start_export(format);

        let draft = state.document().draft().clone();
        let api = Arc::clone(&self.api);
        let dir = self.download_dir.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = async {
                let file = api.export(format, &draft).await?;
                let path = tokio::task::spawn_blocking(move || download::save(&dir, &file)).await??;
                Ok::<_, anyhow::Error>(path)
            }
            .await;
            let _ = tx.send(Outcome::Exported(format, result));
        });
    }

    /// Applies a finished request. Failures never touch the document.
    pub fn apply(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Generated(Ok(draft)) => {
                info!(items = draft.items.len(), "loaded generated invoice");
                let document = InvoiceDocument::new(draft);
                match self.editor_state.as_mut() {
                    Some(state) => state.load(document),
                    None => self.editor_state = Some(EditorState::new(document)),
                }
                self.prompt_state.generation_succeeded();
                self.screen = AppScreen::Editor;
            }
            Outcome::Generated(Err(err)) => {
                error!(error = %err, "error generating template");
                self.prompt_state.generation_failed();
                if let (AppScreen::Editor, Some(state)) = (self.screen, self.editor_state.as_mut()) {
                    state.set_status(Status::Error(GENERATION_FAILED.to_string()));
                }
            }
            Outcome::Exported(_, Ok(path)) => {
                if let Some(state) = self.editor_state.as_mut() {
                    state.export_finished(Status::Info(format!("Saved {}", path.display())));
                }
            }
            Outcome::Exported(format, Err(err)) => {
                error!(error = %format!("{:#}", err), %format, "error exporting invoice");
                if let Some(state) = self.editor_state.as_mut() {
                    state.export_finished(Status::Error(format!(
                        "Failed to export as {}. Check the log file and the backend.",
                        format
                    )));
                }
            }
        }
    }

    /// Applies every outcome that has already arrived.
    pub fn drain_outcomes(&mut self) {
        while let Ok(outcome) = self.rx.try_recv() {
            self.apply(outcome);
        }
    }

    /// Waits for the next request to finish and applies it.
    pub async fn wait_for_outcome(&mut self) -> bool {
        match self.rx.recv().await {
            Some(outcome) => {
                self.apply(outcome);
                true
            }
            None => false,
        }
    }

    pub fn render<B: Backend>(&mut self, frame: &mut Frame<B>) {
        match (self.screen, self.editor_state.as_mut()) {
            (AppScreen::Editor, Some(state)) => render_editor(frame, state),
            _ => render_prompt(frame, &self.prompt_state),
        }
    }
}

pub async fn run<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()> {
    loop {
        terminal.draw(|f| app.render(f))?;

        if event::poll(TICK)? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Release && app.handle_key(key) {
                    break;
                }
            }
        }

        app.drain_outcomes();
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::RequestError;
    use crate::models::ExportedFile;
    use async_trait::async_trait;

    struct Unreachable;

    #[async_trait]
    impl InvoiceApi for Unreachable {
        async fn generate_template(&self, _prompt: &str) -> Result<InvoiceDraft, ApiError> {
            Err(ApiError::Generation(RequestError::EmptyPrompt))
        }

        async fn export(
            &self,
            format: ExportFormat,
            _invoice: &InvoiceDraft,
        ) -> Result<ExportedFile, ApiError> {
            Err(ApiError::Export {
                format,
                source: RequestError::Server {
                    status: 500,
                    body: "down".into(),
                },
            })
        }
    }

    fn app() -> App {
        App::new(Arc::new(Unreachable), PathBuf::from("."), None)
    }

    #[test]
    fn generated_draft_opens_editor() {
        let mut app = app();
        app.apply(Outcome::Generated(Ok(InvoiceDraft {
            company_name: "Acme".into(),
            ..Default::default()
        })));
        assert_eq!(app.screen(), AppScreen::Editor);
        assert_eq!(
            app.editor_state().unwrap().document().draft().company_name,
            "Acme"
        );
    }

    #[test]
    fn failed_generation_keeps_document() {
        let mut app = app();
        app.apply(Outcome::Generated(Ok(InvoiceDraft {
            company_name: "Acme".into(),
            ..Default::default()
        })));
        app.apply(Outcome::Generated(Err(ApiError::Generation(
            RequestError::EmptyPrompt,
        ))));
        assert_eq!(
            app.editor_state().unwrap().document().draft().company_name,
            "Acme"
        );
        assert_eq!(app.prompt_state().error.as_deref(), Some(GENERATION_FAILED));
    }

    #[test]
    fn ctrl_c_quits_anywhere() {
        let mut app = app();
        let key = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert!(app.handle_key(key));
    }

    #[tokio::test]
    async fn failed_export_reports_error() {
        let mut app = app();
        app.apply(Outcome::Generated(Ok(InvoiceDraft::default())));
        assert!(!app.handle_key(KeyEvent::new(KeyCode::Char('x'), KeyModifiers::NONE)));
        assert!(app.editor_state().unwrap().is_exporting());

        assert!(app.wait_for_outcome().await);
        let state = app.editor_state().unwrap();
        assert!(!state.is_exporting());
        assert_eq!(
            state.status(),
            Some(&Status::Error(
                "Failed to export as xml. Check the log file and the backend.".into()
            ))
        );
    }
}
