//! Terminal browser for a directory of documents.

use anyhow::Result;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
};
use relative_path::RelativePathBuf;
use std::{
    io::{Stdout, stdout},
    path::Path,
};
use zon_report_engine::io::{Corpus, CorpusEntry};
use zon_report_engine::{RenderError, Renderer};

/// What the right-hand panel shows for one document.
struct DocumentView {
    path: RelativePathBuf,
    title: String,
    ok: bool,
    lines: Vec<String>,
}

impl DocumentView {
    fn new(entry: &CorpusEntry, renderer: &Renderer) -> Self {
        let raw = match &entry.source {
            Ok(raw) => raw,
            Err(e) => {
                return Self {
                    path: entry.path.clone(),
                    title: entry.path.to_string(),
                    ok: false,
                    lines: vec![format!("Error reading file: {e}")],
                };
            }
        };

        let title = raw
            .pointer("/meta/title")
            .and_then(|t| t.as_str())
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| entry.path.to_string());

        let mut lines = vec![
            format!("File: {}", entry.path),
            format!("Id: {}", entry.document_id().unwrap_or("-")),
            format!(
                "Version: {}",
                raw.get("version").and_then(|v| v.as_str()).unwrap_or("-")
            ),
            String::new(),
        ];

        let ok = match renderer.render(raw) {
            Ok(page) => {
                lines.push("Navigation".to_string());
                if page.navigation.is_empty() {
                    lines.push("  (none)".to_string());
                }
                for entry in &page.navigation {
                    lines.push(format!("  • {}  #{}", entry.label, entry.anchor));
                }
                lines.push(String::new());
                lines.push(format!("Warnings ({})", page.warnings.len()));
                for warning in &page.warnings {
                    lines.push(format!("  ⚠ {warning}"));
                }
                true
            }
            Err(e) => {
                lines.push(format!("✗ {e}"));
                if let RenderError::Schema(schema) = &e {
                    for violation in &schema.violations {
                        lines.push(format!("  {violation}"));
                    }
                }
                false
            }
        };

        Self {
            path: entry.path.clone(),
            title,
            ok,
            lines,
        }
    }
}

struct App {
    views: Vec<DocumentView>,
    list_state: ListState,
}

impl App {
    fn new(corpus: &Corpus, renderer: &Renderer) -> Self {
        let views: Vec<_> = corpus
            .entries()
            .iter()
            .map(|entry| DocumentView::new(entry, renderer))
            .collect();

        let mut list_state = ListState::default();
        if !views.is_empty() {
            list_state.select(Some(0));
        }
        Self { views, list_state }
    }

    fn next(&mut self) {
        if self.views.is_empty() {
            return;
        }
        let i = match self.list_state.selected() {
            Some(i) => (i + 1) % self.views.len(),
            None => 0,
        };
        self.list_state.select(Some(i));
    }

    fn previous(&mut self) {
        if self.views.is_empty() {
            return;
        }
        let i = match self.list_state.selected() {
            Some(0) | None => self.views.len() - 1,
            Some(i) => i - 1,
        };
        self.list_state.select(Some(i));
    }

    fn selected(&self) -> Option<&DocumentView> {
        self.list_state.selected().and_then(|i| self.views.get(i))
    }
}

pub fn run(renderer: &Renderer, input_dir: &Path) -> Result<()> {
    let corpus = Corpus::load(input_dir)?;
    let mut app = App::new(&corpus, renderer);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        println!("{err:?}");
    }

    Ok(())
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<Stdout>>, app: &mut App) -> Result<()> {
    loop {
        terminal.draw(|f| ui(f, app))?;

        if let Event::Key(key) = event::read()? {
            match key.code {
                KeyCode::Char('q') | KeyCode::Esc => return Ok(()),
                KeyCode::Down | KeyCode::Char('j') => app.next(),
                KeyCode::Up | KeyCode::Char('k') => app.previous(),
                _ => {}
            }
        }
    }
}

fn ui(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .margin(1)
        .constraints([Constraint::Percentage(35), Constraint::Percentage(65)].as_ref())
        .split(f.area());

    let items: Vec<ListItem> = app
        .views
        .iter()
        .map(|view| {
            let (mark, color) = if view.ok {
                ("✓ ", Color::Green)
            } else {
                ("✗ ", Color::Red)
            };
            ListItem::new(vec![
                Line::from(vec![
                    Span::styled(mark, Style::default().fg(color)),
                    Span::raw(view.title.clone()),
                ]),
                Line::from(Span::styled(
                    format!("  {}", view.path),
                    Style::default().fg(Color::DarkGray),
                )),
            ])
        })
        .collect();

    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title("Documents"))
        .highlight_style(Style::default().bg(Color::Yellow).fg(Color::Black));

    f.render_stateful_widget(list, chunks[0], &mut app.list_state);

    let content_text: Vec<Line> = match app.selected() {
        Some(view) => view
            .lines
            .iter()
            .map(|line| Line::from(vec![Span::raw(line.clone())]))
            .collect(),
        None => vec![Line::from("No documents found")],
    };

    let content = Paragraph::new(content_text)
        .block(Block::default().borders(Borders::ALL).title("Details"))
        .wrap(ratatui::widgets::Wrap { trim: false });

    f.render_widget(content, chunks[1]);

    let help_text = Line::from(vec![
        Span::raw("q: Quit | "),
        Span::raw("↑/k: Previous | "),
        Span::raw("↓/j: Next"),
    ]);
    let help = Paragraph::new(vec![help_text]).block(Block::default());

    let bottom_chunk = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(3)].as_ref())
        .split(f.area());

    f.render_widget(help, bottom_chunk[1]);
}
