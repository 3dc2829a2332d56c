mod feedback;
mod render;

use anyhow::{Context, Result, bail};
use chat_answer_config::Config;
use chat_answer_engine::{
    EscapeSanitizer, RawAnswer, ResolvedCitation, Sanitizer, build_tree, citation_label,
    prepare_answer, reference_count_label,
};
use crossterm::{
    event::{self, Event, KeyCode},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use feedback::{FeedbackPanel, LogSink, offered_reasons};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
};
use render::{LineRenderer, plain_text};
use std::{
    env,
    io::{Stdout, stdout},
    path::PathBuf,
    process,
};

struct App {
    answer_lines: Vec<Line<'static>>,
    citations: Vec<ResolvedCitation>,
    labels: Vec<String>,
    citation_state: ListState,
    citation_content: Vec<String>,
    feedback: Option<FeedbackPanel<LogSink>>,
    status: String,
}

impl App {
    fn new(answer: &RawAnswer, config: &Config) -> Result<Self> {
        let sanitizer: Option<&dyn Sanitizer> = if config.sanitize_answer {
            Some(&EscapeSanitizer)
        } else {
            None
        };
        let Some(parsed) = prepare_answer(answer, sanitizer) else {
            bail!("Answer has no text to render");
        };

        let tree = build_tree(&parsed.markup_text);
        let error_color = config
            .math_error_color
            .parse::<Color>()
            .unwrap_or(Color::Red);
        let answer_lines = LineRenderer::new(error_color).render(&tree);

        let labels = parsed
            .citations
            .iter()
            .enumerate()
            .map(|(i, c)| citation_label(c, i + 1, config.label_limit()))
            .collect();

        let feedback = if config.feedback_enabled {
            FeedbackPanel::new(answer, LogSink::default())
        } else {
            None
        };

        let mut app = Self {
            answer_lines,
            citations: parsed.citations,
            labels,
            citation_state: ListState::default(),
            citation_content: Vec::new(),
            feedback,
            status: String::new(),
        };

        if !app.citations.is_empty() {
            app.citation_state.select(Some(0));
        }

        Ok(app)
    }

    fn next_citation(&mut self) {
        if self.citations.is_empty() {
            return;
        }
        let i = match self.citation_state.selected() {
            Some(i) => (i + 1) % self.citations.len(),
            None => 0,
        };
        self.citation_state.select(Some(i));
    }

    fn previous_citation(&mut self) {
        if self.citations.is_empty() {
            return;
        }
        let i = match self.citation_state.selected() {
            Some(0) | None => self.citations.len() - 1,
            Some(i) => i - 1,
        };
        self.citation_state.select(Some(i));
    }

    /// Shows the selected citation's source text.
    fn open_selected_citation(&mut self) {
        if let Some(index) = self.citation_state.selected()
            && let Some(citation) = self.citations.get(index)
        {
            let mut content = vec![self.labels[index].clone(), String::new()];
            if let Some(title) = &citation.citation.title {
                content.insert(1, title.clone());
            }
            if let Some(url) = &citation.citation.url {
                content.push(url.clone());
                content.push(String::new());
            }
            content.extend(citation.content().lines().map(str::to_string));
            self.citation_content = content;
        }
    }

    fn like(&mut self) {
        if let Some(panel) = &mut self.feedback {
            self.status = match panel.like() {
                Ok(state) => format!("Feedback: {state}"),
                Err(e) => format!("Error: {e}"),
            };
        }
    }

    fn dislike(&mut self) {
        if let Some(panel) = &mut self.feedback {
            self.status = match panel.dislike() {
                Ok(_) if panel.dialog_open => "Why wasn't this response helpful?".to_string(),
                Ok(state) => format!("Feedback: {state}"),
                Err(e) => format!("Error: {e}"),
            };
        }
    }

    fn dialog_open(&self) -> bool {
        self.feedback.as_ref().is_some_and(|panel| panel.dialog_open)
    }

    fn handle_dialog_key(&mut self, code: KeyCode) {
        let Some(panel) = &mut self.feedback else {
            return;
        };
        match code {
            KeyCode::Char(c) if c.is_ascii_digit() => panel.toggle_reason_key(c),
            KeyCode::Enter | KeyCode::Char('s') => {
                self.status = match panel.submit_reasons() {
                    Ok(()) => "Thanks for your feedback".to_string(),
                    Err(e) => format!("Error: {e}"),
                };
            }
            KeyCode::Esc => {
                panel.cancel_dialog();
                self.status.clear();
            }
            _ => {}
        }
    }

    /// Answer and citation list as plain text.
    fn plain_output(&self) -> Vec<String> {
        let mut out: Vec<String> = self.answer_lines.iter().map(plain_text).collect();
        if !self.labels.is_empty() {
            out.push(String::new());
            out.push(reference_count_label(self.labels.len()));
            out.extend(
                self.labels
                    .iter()
                    .enumerate()
                    .map(|(i, label)| format!("[{}] {label}", i + 1)),
            );
        }
        out
    }
}

fn main() -> Result<()> {
    let mut args: Vec<String> = env::args().collect();
    let plain = args.iter().any(|a| a == "--plain");
    args.retain(|a| a != "--plain");

    env_logger::Builder::from_default_env()
        .filter_level(if plain {
            log::LevelFilter::Info
        } else {
            log::LevelFilter::Warn
        })
        .init();

    let config_path = Config::config_path();
    let config = match Config::load_or_default() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: Failed to load config file: {e}");
            process::exit(1);
        }
    };

    let answer_path = if args.len() == 2 {
        PathBuf::from(&args[1])
    } else if args.len() == 1 {
        match &config.answer_path {
            Some(path) => path.clone(),
            None => {
                eprintln!("Error: No answer file provided and none set in config");
                eprintln!("Usage: {} [--plain] <answer.json>", args[0]);
                eprintln!(
                    "Or set answer_path in the config file at {}",
                    config_path.display()
                );
                process::exit(1);
            }
        }
    } else {
        eprintln!("Usage: {} [--plain] [answer.json]", args[0]);
        process::exit(1);
    };

    let json = std::fs::read_to_string(&answer_path)
        .with_context(|| format!("Failed to read answer file {}", answer_path.display()))?;
    let answer = RawAnswer::from_json(&json)?;
    let mut app = App::new(&answer, &config)?;

    if plain {
        for line in app.plain_output() {
            println!("{line}");
        }
        return Ok(());
    }

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
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
            if app.dialog_open() {
                app.handle_dialog_key(key.code);
                continue;
            }
            match key.code {
                KeyCode::Char('q') => return Ok(()),
                KeyCode::Down | KeyCode::Char('j') => app.next_citation(),
                KeyCode::Up | KeyCode::Char('k') => app.previous_citation(),
                KeyCode::Enter | KeyCode::Char(' ') => app.open_selected_citation(),
                KeyCode::Char('l') => app.like(),
                KeyCode::Char('d') => app.dislike(),
                _ => {}
            }
        }
    }
}

fn ui(f: &mut Frame, app: &mut App) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(2)].as_ref())
        .split(f.area());

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .margin(1)
        .constraints([Constraint::Percentage(65), Constraint::Percentage(35)].as_ref())
        .split(rows[0]);

    let side = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)].as_ref())
        .split(columns[1]);

    // Answer panel
    let answer_text = if app.answer_lines.is_empty() {
        vec![Line::from("(empty answer)")]
    } else {
        app.answer_lines.clone()
    };
    let answer = Paragraph::new(answer_text)
        .block(Block::default().borders(Borders::ALL).title("Answer"))
        .wrap(Wrap { trim: false });
    f.render_widget(answer, columns[0]);

    // Citation list
    let citation_items: Vec<ListItem> = app
        .labels
        .iter()
        .enumerate()
        .map(|(i, label)| {
            ListItem::new(Line::from(vec![
                Span::styled(format!("{} ", i + 1), Style::default().fg(Color::Magenta)),
                Span::raw(label.clone()),
            ]))
        })
        .collect();
    let citations = List::new(citation_items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(reference_count_label(app.labels.len())),
        )
        .highlight_style(Style::default().bg(Color::Yellow).fg(Color::Black));
    f.render_stateful_widget(citations, side[0], &mut app.citation_state);

    // Citation content
    let content_text: Vec<Line> = if app.citation_content.is_empty() {
        vec![Line::from("Press Enter to open the selected citation")]
    } else {
        app.citation_content
            .iter()
            .map(|line| Line::from(line.clone()))
            .collect()
    };
    let content = Paragraph::new(content_text)
        .block(Block::default().borders(Borders::ALL).title("Citation"))
        .wrap(Wrap { trim: true });
    f.render_widget(content, side[1]);

    // Help and status
    let mut help = vec![
        Span::raw("q: Quit | "),
        Span::raw("↑/k ↓/j: Select citation | "),
        Span::raw("Enter: Open"),
    ];
    if app.feedback.is_some() {
        help.push(Span::raw(" | l: Like | d: Dislike"));
    }
    let status = Line::from(Span::styled(
        app.status.clone(),
        Style::default().add_modifier(Modifier::ITALIC),
    ));
    f.render_widget(Paragraph::new(vec![Line::from(help), status]), rows[1]);

    if let Some(panel) = &app.feedback
        && panel.dialog_open
    {
        let area = centered(f.area(), 50, 16);
        let mut lines = vec![Line::from("Select reasons, Enter to submit, Esc to cancel")];
        lines.push(Line::from(""));
        for (i, reason) in offered_reasons().enumerate() {
            let key = (i + 1) % 10;
            let mark = if panel.reasons.contains(reason) { "x" } else { " " };
            lines.push(Line::from(format!("{key} [{mark}] {reason}")));
        }
        f.render_widget(Clear, area);
        f.render_widget(
            Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title("Feedback")),
            area,
        );
    }
}

/// A `width` x `height` rectangle centred in `area`, clamped to fit.
fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}
