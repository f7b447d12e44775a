//! Terminal chat client
//!
//! Renders a chat session against a running `chat-demo` server.
//! Keys: type to edit, Enter sends, F1-F3 pick a suggestion,
//! PageUp/PageDown scroll, Esc or Ctrl-C quits.

use chat_demo::config::ClientConfig;
use chat_demo::message::Message;
use chat_demo::runtime::{spawn_session, HttpTransport, SessionHandle, SessionSnapshot};
use chat_demo::session::{Event as SessionEvent, SUGGESTIONS};
use crossterm::{
    event::{Event as TermEvent, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use futures::StreamExt;
use ratatui::{
    backend::{Backend, CrosstermBackend},
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame, Terminal,
};
use std::error::Error;
use std::io::{self, Stdout};

const PAGE: u16 = 5;

/// View-local state that is not part of the session
#[derive(Debug, Default)]
struct View {
    /// Text in the input box; mirrored into the session on every edit
    draft: String,
    /// Lines scrolled up from the newest message
    scroll_from_bottom: u16,
    seen_generation: u64,
}

impl View {
    /// Jump to the newest message when the session asks for it
    fn follow(&mut self, snapshot: &SessionSnapshot) {
        if snapshot.scroll_generation != self.seen_generation {
            self.seen_generation = snapshot.scroll_generation;
            self.scroll_from_bottom = 0;
            self.draft.clone_from(&snapshot.state.pending_input);
        }
    }
}

enum Action {
    Session(SessionEvent),
    ScrollUp,
    ScrollDown,
    Quit,
    Nothing,
}

fn map_key(key: KeyEvent, view: &mut View, waiting: bool) -> Action {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Esc => Action::Quit,
        KeyCode::Char('c') if ctrl => Action::Quit,
        KeyCode::Enter => Action::Session(SessionEvent::Submit),
        KeyCode::PageUp => Action::ScrollUp,
        KeyCode::PageDown => Action::ScrollDown,
        // Input is disabled while waiting
        _ if waiting => Action::Nothing,
        KeyCode::Backspace => {
            view.draft.pop();
            Action::Session(SessionEvent::InputChanged(view.draft.clone()))
        }
        KeyCode::Char(c) if !ctrl => {
            view.draft.push(c);
            Action::Session(SessionEvent::InputChanged(view.draft.clone()))
        }
        KeyCode::F(n @ 1..=3) => {
            let index = usize::from(n - 1);
            view.draft = SUGGESTIONS[index].to_string();
            Action::Session(SessionEvent::SuggestionPicked(index))
        }
        _ => Action::Nothing,
    }
}

// ============================================================================
// Rendering
// ============================================================================

fn render(frame: &mut Frame, snapshot: &SessionSnapshot, view: &mut View) {
    let [header_area, body_area, input_area] = Layout::vertical([
        Constraint::Length(2),
        Constraint::Min(1),
        Constraint::Length(3),
    ])
    .areas(frame.area());

    render_header(frame, header_area);
    if snapshot.state.shows_welcome() {
        render_welcome(frame, body_area);
    } else {
        render_messages(frame, body_area, snapshot, view);
    }
    render_input(frame, input_area, snapshot, view);
}

fn render_header(frame: &mut Frame, area: Rect) {
    let header = Paragraph::new(vec![
        Line::from(Span::styled(
            "🤖 AI 聊天助手",
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            "基于大语言模型的智能对话系统",
            Style::default().fg(Color::DarkGray),
        )),
    ])
    .centered();
    frame.render_widget(header, area);
}

fn render_welcome(frame: &mut Frame, area: Rect) {
    let mut lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "👋 你好！",
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from("我是你的AI助手，有什么可以帮你的吗？"),
        Line::from(""),
    ];
    lines.extend(SUGGESTIONS.iter().enumerate().map(|(i, s)| {
        Line::from(vec![
            Span::styled(format!("F{} ", i + 1), Style::default().fg(Color::Magenta)),
            Span::raw(*s),
        ])
    }));
    frame.render_widget(Paragraph::new(lines).centered(), area);
}

fn message_lines(message: &Message) -> Vec<Line<'static>> {
    let (icon, style) = if message.is_user() {
        ("👤 ", Style::default().fg(Color::Cyan))
    } else {
        ("🤖 ", Style::default())
    };
    message
        .content
        .split('\n')
        .enumerate()
        .map(|(i, line)| {
            let prefix = if i == 0 { icon } else { "   " };
            Line::from(vec![Span::raw(prefix), Span::styled(line.to_string(), style)])
        })
        .collect()
}

fn render_messages(frame: &mut Frame, area: Rect, snapshot: &SessionSnapshot, view: &mut View) {
    let mut lines = Vec::new();
    for message in &snapshot.state.messages {
        lines.extend(message_lines(message));
        lines.push(Line::from(""));
    }
    if snapshot.state.is_waiting() {
        lines.push(Line::from(vec![
            Span::raw("🤖 "),
            Span::styled("...", Style::default().fg(Color::DarkGray)),
        ]));
    }

    let paragraph = Paragraph::new(Text::from(lines)).wrap(Wrap { trim: false });
    let total = u16::try_from(paragraph.line_count(area.width)).unwrap_or(u16::MAX);
    let max_scroll = total.saturating_sub(area.height);
    view.scroll_from_bottom = view.scroll_from_bottom.min(max_scroll);

    let offset = max_scroll - view.scroll_from_bottom;
    frame.render_widget(paragraph.scroll((offset, 0)), area);
}

fn render_input(frame: &mut Frame, area: Rect, snapshot: &SessionSnapshot, view: &View) {
    let waiting = snapshot.state.is_waiting();
    let title = if waiting {
        Span::raw(" ⏳ ")
    } else if snapshot.state.can_submit() {
        Span::styled(" 发送 (Enter) ", Style::default().fg(Color::Magenta))
    } else {
        // Nothing to send yet
        Span::styled(" 发送 (Enter) ", Style::default().fg(Color::DarkGray))
    };
    let block = Block::default().borders(Borders::ALL).title(Line::from(title));

    let content = if view.draft.is_empty() {
        Span::styled("输入你的问题...", Style::default().fg(Color::DarkGray))
    } else {
        Span::raw(view.draft.as_str())
    };
    let style = if waiting {
        Style::default().fg(Color::DarkGray)
    } else {
        Style::default()
    };
    frame.render_widget(Paragraph::new(Line::from(content)).style(style).block(block), area);
}

// ============================================================================
// Event Loop
// ============================================================================

async fn run<B: Backend>(
    terminal: &mut Terminal<B>,
    handle: &mut SessionHandle,
) -> Result<(), Box<dyn Error>> {
    let mut events = EventStream::new();
    let mut view = View::default();

    loop {
        let snapshot = handle.snapshot_rx.borrow_and_update().clone();
        view.follow(&snapshot);
        terminal.draw(|frame| render(frame, &snapshot, &mut view))?;

        tokio::select! {
            changed = handle.snapshot_rx.changed() => {
                if changed.is_err() {
                    break;
                }
            }
            next = events.next() => match next {
                Some(Ok(TermEvent::Key(key))) if key.kind == KeyEventKind::Press => {
                    match map_key(key, &mut view, snapshot.state.is_waiting()) {
                        Action::Quit => break,
                        Action::Session(event) => {
                            if handle.event_tx.send(event).await.is_err() {
                                break;
                            }
                        }
                        Action::ScrollUp => {
                            view.scroll_from_bottom = view.scroll_from_bottom.saturating_add(PAGE);
                        }
                        Action::ScrollDown => {
                            view.scroll_from_bottom = view.scroll_from_bottom.saturating_sub(PAGE);
                        }
                        Action::Nothing => {}
                    }
                }
                Some(Ok(_)) => {}
                Some(Err(e)) => return Err(e.into()),
                None => break,
            },
        }
    }

    Ok(())
}

fn init_logging(config: &ClientConfig) -> Result<(), Box<dyn Error>> {
    // Logging to the terminal would corrupt the UI
    let Some(path) = &config.log_path else {
        return Ok(());
    };
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)?;
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "chat_demo=debug".into()),
        )
        .with_writer(std::sync::Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn setup_terminal() -> io::Result<Terminal<CrosstermBackend<Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    Terminal::new(CrosstermBackend::new(stdout))
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> io::Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let config = ClientConfig::from_env();
    init_logging(&config)?;
    tracing::info!(server = %config.server_url, "Starting terminal client");

    let (mut handle, _session) = spawn_session(HttpTransport::new(&config.server_url));

    let mut terminal = setup_terminal()?;
    let result = run(&mut terminal, &mut handle).await;
    restore_terminal(&mut terminal)?;
    result
}
