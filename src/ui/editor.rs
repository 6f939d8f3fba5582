use crossterm::event::{KeyCode, KeyEvent};
use tui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Span, Spans},
    widgets::{Block, Borders, Cell, List, ListItem, ListState, Paragraph, Row, Table, TableState},
    Frame,
};

use crate::document::{Field, InvoiceDocument, ItemField};
use crate::models::ExportFormat;
use crate::ui::components::popup::render_error;

const HEADER_ROWS: usize = Field::ALL.len();

pub enum EditorAction {
    Export(ExportFormat),
    NewPrompt,
    Exit,
}

// Message shown in the status bar
#[derive(Debug, Clone, PartialEq)]
pub enum Status {
    Info(String),
    Error(String),
}

// Which part of the form the cursor is on
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Cursor {
    Header(Field),
    Item(usize, ItemField),
}

// Represents the editor state
pub struct EditorState {
    document: InvoiceDocument,
    row: usize,
    column: ItemField,
    editing: Option<String>,
    exporting: Option<ExportFormat>,
    status: Option<Status>,
    show_error: Option<String>,
    header_list_state: ListState,
    items_table_state: TableState,
}

impl EditorState {
    pub fn new(document: InvoiceDocument) -> Self {
        Self {
            document,
            row: 0,
            column: ItemField::Description,
            editing: None,
            exporting: None,
            status: None,
            show_error: None,
            header_list_state: ListState::default(),
            items_table_state: TableState::default(),
        }
    }

    /// Replaces the document after a new generation. An export already in
    /// flight keeps the export keys disabled.
    pub fn load(&mut self, document: InvoiceDocument) {
        let exporting = self.exporting;
        *self = Self::new(document);
        self.exporting = exporting;
    }

    pub fn document(&self) -> &InvoiceDocument {
        &self.document
    }

    pub fn status(&self) -> Option<&Status> {
        self.status.as_ref()
    }

    pub fn is_exporting(&self) -> bool {
        self.exporting.is_some()
    }

    pub fn is_editing(&self) -> bool {
        self.editing.is_some()
    }

    fn row_count(&self) -> usize {
        HEADER_ROWS + self.document.items().len()
    }

    pub fn cursor(&self) -> Cursor {
        if self.row < HEADER_ROWS {
            Cursor::Header(Field::ALL[self.row])
        } else {
            Cursor::Item(self.row - HEADER_ROWS, self.column)
        }
    }

    pub fn next_row(&mut self) {
        self.row = (self.row + 1) % self.row_count();
    }

    pub fn previous_row(&mut self) {
        self.row = if self.row == 0 {
            self.row_count() - 1
        } else {
            self.row - 1
        };
    }

    pub fn start_editing(&mut self) {
        let value = match self.cursor() {
            Cursor::Header(field) => self.document.field(field),
            Cursor::Item(index, field) => self.document.item_field(index, field).unwrap_or_default(),
        };
        self.editing = Some(value);
    }

    pub fn cancel_editing(&mut self) {
        self.editing = None;
    }

    /// Writes the edit buffer back through the document's setters.
    pub fn commit_editing(&mut self) {
        if let Some(value) = self.editing.take() {
            match self.cursor() {
                Cursor::Header(field) => self.document.set_field(field, &value),
                Cursor::Item(index, field) => self.document.set_item_field(index, field, &value),
            }
        }
    }

    fn edit_buffer(&mut self, key: KeyCode) {
        if let Some(value) = self.editing.as_mut() {
            match key {
                KeyCode::Char(c) => value.push(c),
                KeyCode::Backspace => {
                    value.pop();
                }
                _ => {}
            }
        }
    }

    /// Appends an item, selects it and starts editing its description.
    pub fn add_line_item(&mut self) {
        let index = self.document.add_item();
        self.row = HEADER_ROWS + index;
        self.column = ItemField::Description;
        self.start_editing();
    }

    pub fn delete_line_item(&mut self) {
        if let Cursor::Item(index, _) = self.cursor() {
            self.document.remove_item(index);
            if self.row >= self.row_count() {
                self.row = self.row_count() - 1;
            }
            self.editing = None;
        }
    }

    pub fn next_column(&mut self) {
        self.column = self.column.next();
    }

    pub fn previous_column(&mut self) {
        self.column = self.column.previous();
    }

    pub fn set_status(&mut self, status: Status) {
        self.status = Some(status);
    }

    pub fn start_export(&mut self, format: ExportFormat) {
        self.exporting = Some(format);
        self.status = Some(Status::Info(format!("Exporting as {}...", format)));
    }

    pub fn export_finished(&mut self, status: Status) {
        self.exporting = None;
        if let Status::Error(message) = &status {
            self.show_error = Some(message.clone());
        }
        self.status = Some(status);
    }
}

pub fn render_editor<B: Backend>(frame: &mut Frame<B>, state: &mut EditorState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints(
            [
                Constraint::Length(3),  // Title
                Constraint::Length(14), // Header fields
                Constraint::Min(6),     // Line items
                Constraint::Length(5),  // Totals
                Constraint::Length(3),  // Help
            ]
            .as_ref(),
        )
        .split(frame.size());

    let title = Paragraph::new("Edit & Export Invoice")
        .style(Style::default().fg(Color::Cyan))
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(title, chunks[0]);

    render_header(frame, state, chunks[1]);
    render_items(frame, state, chunks[2]);
    render_totals(frame, state, chunks[3]);

    let help_text = if state.editing.is_some() {
        "Enter - Save field | Esc - Cancel editing"
    } else if state.exporting.is_some() {
        "Up/Down - Navigate | Enter - Edit | A - Add item | D - Delete item | (export running) | G - New prompt | Q - Quit"
    } else {
        "Up/Down - Navigate | Tab - Column | Enter - Edit | A - Add | D - Delete | P/X/C/J - Export PDF/XML/CSV/JSON | G - New prompt | Q - Quit"
    };
    let help = Paragraph::new(help_text)
        .style(Style::default().fg(Color::Gray))
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(help, chunks[4]);

    if let Some(error) = &state.show_error {
        render_error(frame, error);
    }
}

fn render_header<B: Backend>(frame: &mut Frame<B>, state: &mut EditorState, area: Rect) {
    let cursor = state.cursor();
    let items: Vec<ListItem> = Field::ALL
        .iter()
        .map(|field| {
            let selected = cursor == Cursor::Header(*field);
            let label_style = if selected {
                Style::default().fg(Color::Yellow)
            } else {
                Style::default()
            };
            let value = match (&state.editing, selected) {
                (Some(buffer), true) => Span::styled(
                    format!("{}|", buffer),
                    Style::default().add_modifier(Modifier::BOLD),
                ),
                _ => Span::raw(state.document.field(*field)),
            };
            ListItem::new(Spans::from(vec![
                Span::styled(format!("{}: ", field.label()), label_style),
                value,
            ]))
        })
        .collect();

    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title("Invoice"))
        .highlight_style(Style::default().fg(Color::Yellow));

    match cursor {
        Cursor::Header(_) => state.header_list_state.select(Some(state.row)),
        Cursor::Item(..) => state.header_list_state.select(None),
    }
    frame.render_stateful_widget(list, area, &mut state.header_list_state);
}

fn render_items<B: Backend>(frame: &mut Frame<B>, state: &mut EditorState, area: Rect) {
    let cursor = state.cursor();

    let header_cells = ["Description", "Qty", "Unit Price", "Total"]
        .iter()
        .map(|h| Cell::from(*h).style(Style::default().fg(Color::Yellow)));
    let header = Row::new(header_cells).height(1).bottom_margin(1);

    let rows = state.document.items().iter().enumerate().map(|(index, item)| {
        let cell = |field: ItemField, text: String| {
            if cursor == Cursor::Item(index, field) {
                match &state.editing {
                    Some(buffer) => Cell::from(format!("{}|", buffer))
                        .style(Style::default().add_modifier(Modifier::BOLD)),
                    None => Cell::from(text)
                        .style(Style::default().add_modifier(Modifier::UNDERLINED)),
                }
            } else {
                Cell::from(text)
            }
        };
        Row::new(vec![
            cell(ItemField::Description, item.description.clone()),
            cell(ItemField::Quantity, item.quantity.to_string()),
            cell(ItemField::UnitPrice, format!("{:.2}", item.unit_price)),
            Cell::from(format!("${:.2}", item.line_total())),
        ])
    });

    let widths = [
        Constraint::Percentage(50),
        Constraint::Percentage(15),
        Constraint::Percentage(15),
        Constraint::Percentage(20),
    ];
    let table = Table::new(rows)
        .header(header)
        .block(Block::default().title("Items").borders(Borders::ALL))
        .highlight_style(Style::default().bg(Color::Blue).fg(Color::White))
        .widths(&widths);

    match cursor {
        Cursor::Item(index, _) => state.items_table_state.select(Some(index)),
        Cursor::Header(_) => state.items_table_state.select(None),
    }
    frame.render_stateful_widget(table, area, &mut state.items_table_state);
}

fn render_totals<B: Backend>(frame: &mut Frame<B>, state: &EditorState, area: Rect) {
    let doc = &state.document;
    let mut lines = vec![Spans::from(format!("Subtotal: ${:.2}", doc.subtotal()))];
    if let Some(rate) = doc.draft().tax_rate {
        lines.push(Spans::from(format!("Tax ({}%): ${:.2}", rate, doc.tax_amount())));
    }
    lines.push(Spans::from(Span::styled(
        format!("Total: ${:.2}", doc.total()),
        Style::default().add_modifier(Modifier::BOLD),
    )));

    let mut notes: Vec<Spans> = [Field::Date, Field::DueDate]
        .iter()
        .filter_map(|field| doc.date_warning(*field))
        .map(|warning| Spans::from(Span::styled(warning, Style::default().fg(Color::Yellow))))
        .collect();
    match &state.status {
        Some(Status::Info(message)) => notes.push(Spans::from(Span::styled(
            message.clone(),
            Style::default().fg(Color::Green),
        ))),
        Some(Status::Error(message)) => notes.push(Spans::from(Span::styled(
            message.clone(),
            Style::default().fg(Color::Red),
        ))),
        None => {}
    }

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)].as_ref())
        .split(area);

    frame.render_widget(
        Paragraph::new(notes).block(Block::default().borders(Borders::ALL).title("Status")),
        columns[0],
    );
    frame.render_widget(
        Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title("Totals")),
        columns[1],
    );
}

pub fn handle_key(state: &mut EditorState, key: KeyEvent) -> Option<EditorAction> {
    // Any key dismisses the error popup
    if state.show_error.take().is_some() {
        return None;
    }

    if state.editing.is_some() {
        match key.code {
            KeyCode::Enter => state.commit_editing(),
            KeyCode::Esc => state.cancel_editing(),
            KeyCode::Tab => {
                state.commit_editing();
                if matches!(state.cursor(), Cursor::Item(..)) {
                    state.next_column();
                    state.start_editing();
                }
            }
            code => state.edit_buffer(code),
        }
        return None;
    }

    match key.code {
        KeyCode::Char('q') => return Some(EditorAction::Exit),
        KeyCode::Char('g') | KeyCode::Esc => return Some(EditorAction::NewPrompt),
        KeyCode::Up => state.previous_row(),
        KeyCode::Down => state.next_row(),
        KeyCode::Tab => state.next_column(),
        KeyCode::BackTab => state.previous_column(),
        KeyCode::Enter => state.start_editing(),
        KeyCode::Char('a') => state.add_line_item(),
        KeyCode::Char('d') => state.delete_line_item(),
        KeyCode::Char(c) if !state.is_exporting() => {
            let format = match c {
                'p' => ExportFormat::Pdf,
                'x' => ExportFormat::Xml,
                'c' => ExportFormat::Csv,
                'j' => ExportFormat::Json,
                _ => return None,
            };
            return Some(EditorAction::Export(format));
        }
        _ => {}
    }
    None
}
