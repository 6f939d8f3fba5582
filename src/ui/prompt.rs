use crossterm::event::{KeyCode, KeyEvent};
use tui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Span, Spans},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

pub const DEFAULT_PROMPT: &str = "An invoice for a freelance graphic designer with tax";
pub const GENERATION_FAILED: &str =
    "Failed to generate template. Check the log file and the backend.";

pub enum PromptAction {
    Generate(String),
    BackToEditor,
    Exit,
}

// Represents the state of the prompt screen
pub struct PromptState {
    pub prompt: String,
    pub error: Option<String>,
    generating: bool,
    has_document: bool,
}

impl PromptState {
    pub fn new(prompt: Option<String>) -> Self {
        Self {
            prompt: prompt.unwrap_or_else(|| DEFAULT_PROMPT.to_string()),
            error: None,
            generating: false,
            has_document: false,
        }
    }

    pub fn is_generating(&self) -> bool {
        self.generating
    }

    /// Marks a generation as in flight and clears the previous error.
    pub fn start_generating(&mut self) {
        self.generating = true;
        self.error = None;
    }

    pub fn generation_succeeded(&mut self) {
        self.generating = false;
        self.has_document = true;
    }

    pub fn generation_failed(&mut self) {
        self.generating = false;
        self.error = Some(GENERATION_FAILED.to_string());
    }
}

pub fn render_prompt<B: Backend>(frame: &mut Frame<B>, state: &PromptState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(2)
        .constraints(
            [
                Constraint::Length(4), // Title
                Constraint::Length(3), // Prompt
                Constraint::Min(3),    // Status
                Constraint::Length(3), // Help
            ]
            .as_ref(),
        )
        .split(frame.size());

    let title = Paragraph::new(vec![
        Spans::from(Span::styled(
            "AI Invoice Creator",
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        )),
        Spans::from("Describe the invoice you need, and let AI do the rest."),
    ])
    .block(Block::default().borders(Borders::ALL));
    frame.render_widget(title, chunks[0]);

    let cursor = if state.generating { "" } else { "|" };
    let input = Paragraph::new(Spans::from(vec![
        Span::styled("Prompt: ", Style::default().fg(Color::Yellow)),
        Span::raw(format!("{}{}", state.prompt, cursor)),
    ]))
    .block(Block::default().borders(Borders::ALL));
    frame.render_widget(input, chunks[1]);

    let status = if state.generating {
        Paragraph::new("Generating your template, please wait...")
            .style(Style::default().fg(Color::Gray))
    } else if let Some(error) = &state.error {
        Paragraph::new(error.as_str()).style(Style::default().fg(Color::Red))
    } else {
        Paragraph::new("")
    };
    frame.render_widget(
        status
            .wrap(Wrap { trim: true })
            .block(Block::default().borders(Borders::ALL)),
        chunks[2],
    );

    let help_text = match (state.generating, state.has_document) {
        (true, true) => "Generating... | Esc - Back to editor",
        (true, false) => "Generating... | Esc - Quit",
        (false, true) => "Enter - Generate | Esc - Back to editor",
        (false, false) => "Enter - Generate | Esc - Quit",
    };
    let help = Paragraph::new(help_text)
        .style(Style::default().fg(Color::Gray))
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(help, chunks[3]);
}

pub fn handle_key(state: &mut PromptState, key: KeyEvent) -> Option<PromptAction> {
    match key.code {
        KeyCode::Esc if state.has_document => return Some(PromptAction::BackToEditor),
        KeyCode::Esc => return Some(PromptAction::Exit),
        // Disabled until the running request resolves.
        KeyCode::Enter if state.generating => {}
        KeyCode::Enter => return Some(PromptAction::Generate(state.prompt.clone())),
        KeyCode::Char(c) if !state.generating => state.prompt.push(c),
        KeyCode::Backspace if !state.generating => {
            state.prompt.pop();
        }
        _ => {}
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn starts_with_default_prompt() {
        assert_eq!(PromptState::new(None).prompt, DEFAULT_PROMPT);
        assert_eq!(PromptState::new(Some("x".into())).prompt, "x");
    }

    #[test]
    fn typing_edits_prompt() {
        let mut state = PromptState::new(Some(String::new()));
        for c in "ab".chars() {
            handle_key(&mut state, key(KeyCode::Char(c)));
        }
        handle_key(&mut state, key(KeyCode::Backspace));
        handle_key(&mut state, key(KeyCode::Char('c')));
        assert_eq!(state.prompt, "ac");
    }

    #[test]
    fn enter_requests_generation() {
        let mut state = PromptState::new(Some("invoice for a designer".into()));
        match handle_key(&mut state, key(KeyCode::Enter)) {
            Some(PromptAction::Generate(prompt)) => assert_eq!(prompt, "invoice for a designer"),
            _ => panic!("expected a generate action"),
        }
    }

    #[test]
    fn enter_is_disabled_while_generating() {
        let mut state = PromptState::new(None);
        state.start_generating();
        assert!(handle_key(&mut state, key(KeyCode::Enter)).is_none());
        handle_key(&mut state, key(KeyCode::Char('z')));
        assert_eq!(state.prompt, DEFAULT_PROMPT);
    }

    #[test]
    fn failure_sets_error_and_reenables() {
        let mut state = PromptState::new(None);
        state.start_generating();
        state.generation_failed();
        assert!(!state.is_generating());
        assert_eq!(state.error.as_deref(), Some(GENERATION_FAILED));

        state.start_generating();
        assert!(state.error.is_none());
    }

    #[test]
    fn esc_depends_on_document() {
        let mut state = PromptState::new(None);
        assert!(matches!(handle_key(&mut state, key(KeyCode::Esc)), Some(PromptAction::Exit)));
        state.start_generating();
        state.generation_succeeded();
        assert!(matches!(
            handle_key(&mut state, key(KeyCode::Esc)),
            Some(PromptAction::BackToEditor)
        ));
    }
}
