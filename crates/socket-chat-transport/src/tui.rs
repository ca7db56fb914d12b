//! ratatui rendering and key handling for [`ChatView`].

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};
use socket_chat_core::{ChatSink, Markup};

use crate::ChatView;

/// What the caller should do after a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    /// Keep running.
    Continue,
    /// User asked to quit.
    Quit,
}

/// Styled line for one log entry.
#[must_use]
pub fn styled_line(markup: Markup<'_>) -> Line<'_> {
    match markup {
        Markup::Plain(text) => Line::from(text),
        Markup::Bold(text) => Line::from(Span::styled(
            text,
            Style::default().add_modifier(Modifier::BOLD),
        )),
    }
}

/// Apply a crossterm event to the view.
///
/// Enter sends; a failed send is logged and the input kept.
pub fn handle_event<S: ChatSink>(view: &mut ChatView<S>, event: &Event) -> KeyOutcome {
    match event {
        Event::Key(key) => handle_key(view, *key),
        _ => KeyOutcome::Continue,
    }
}

/// Apply one key press to the view. Releases and repeats are ignored.
pub fn handle_key<S: ChatSink>(view: &mut ChatView<S>, key: KeyEvent) -> KeyOutcome {
    if key.kind != KeyEventKind::Press {
        return KeyOutcome::Continue;
    }
    match key {
        KeyEvent {
            code: KeyCode::Char('c'),
            modifiers: KeyModifiers::CONTROL,
            ..
        }
        | KeyEvent {
            code: KeyCode::Esc,
            ..
        } => return KeyOutcome::Quit,
        KeyEvent {
            code: KeyCode::Char(c),
            modifiers: KeyModifiers::NONE | KeyModifiers::SHIFT,
            ..
        } => view.push_char(c),
        KeyEvent {
            code: KeyCode::Backspace,
            ..
        } => view.pop_char(),
        KeyEvent {
            code: KeyCode::Enter,
            ..
        } => {
            if let Err(e) = view.send() {
                tracing::warn!("Send failed: {e}");
            }
        }
        KeyEvent {
            code: KeyCode::Up, ..
        } => view.scroll_up(),
        KeyEvent {
            code: KeyCode::Down,
            ..
        } => view.scroll_down(),
        KeyEvent {
            code: KeyCode::PageUp,
            ..
        } => view.page_up(),
        KeyEvent {
            code: KeyCode::PageDown,
            ..
        } => view.page_down(),
        _ => {}
    }
    KeyOutcome::Continue
}

/// Draw the message pane, input box and status bar.
pub fn draw<S: ChatSink>(f: &mut Frame, view: &ChatView<S>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(3),    // Messages
            Constraint::Length(3), // Input
            Constraint::Length(1), // Status
        ])
        .split(f.area());

    let lines: Vec<Line> = view.log().marked().map(styled_line).collect();
    let messages = Paragraph::new(lines).wrap(Wrap { trim: false });

    // Scroll in wrapped rows, measured inside the borders.
    let inner_width = chunks[0].width.saturating_sub(2);
    let visible = usize::from(chunks[0].height.saturating_sub(2));
    let top = messages
        .line_count(inner_width)
        .saturating_sub(visible)
        .saturating_sub(usize::from(view.scroll_back()));
    let top = u16::try_from(top).unwrap_or(u16::MAX);

    let messages = messages
        .block(Block::default().borders(Borders::ALL).title("Messages"))
        .scroll((top, 0));
    f.render_widget(messages, chunks[0]);

    let input = Paragraph::new(view.input())
        .style(Style::default().fg(Color::Yellow))
        .block(Block::default().borders(Borders::ALL).title("Message"));
    f.render_widget(input, chunks[1]);

    // Display width, kept inside the box.
    let input_width = Span::raw(view.input()).width();
    let max_col = usize::from(chunks[1].width.saturating_sub(3));
    let cursor = u16::try_from(input_width.min(max_col)).unwrap_or(u16::MAX);
    f.set_cursor_position((
        chunks[1].x.saturating_add(cursor).saturating_add(1),
        chunks[1].y + 1,
    ));

    let (status, status_style) = if view.state().is_open() {
        ("Connected", Style::default().fg(Color::Green))
    } else {
        ("Disconnected", Style::default().fg(Color::Red))
    };

    let status = Paragraph::new(Line::from(vec![
        Span::raw(" "),
        Span::styled(status, status_style),
        Span::raw(" | "),
        Span::styled("Enter", Style::default().fg(Color::Yellow)),
        Span::raw(" send | "),
        Span::styled("Esc/Ctrl+C", Style::default().fg(Color::Yellow)),
        Span::raw(" quit | "),
        Span::styled("Up/Down/PgUp/PgDn", Style::default().fg(Color::Yellow)),
        Span::raw(" scroll "),
    ]));
    f.render_widget(status, chunks[2]);
}
