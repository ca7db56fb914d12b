//! Chat display component: message log, input buffer, send rule.

use socket_chat_core::{ChatError, ChatSink, ConnectionState, MessageLog, SocketEvent};

use crate::EventSubscription;

/// Lines moved by a page scroll.
const PAGE: u16 = 10;

/// Display component backed by a [`ChatSink`].
///
/// Owns the message log, which lives exactly as long as the view.
/// Dropping the view closes the sink.
pub struct ChatView<S: ChatSink> {
    sink: S,
    events: EventSubscription,
    log: MessageLog,
    input: String,
    state: ConnectionState,
    /// Lines scrolled back from the bottom; 0 follows new messages.
    scroll_back: u16,
}

impl<S: ChatSink> ChatView<S> {
    /// Create a view with an empty log and input.
    #[must_use]
    pub fn new(sink: S, events: EventSubscription) -> Self {
        Self {
            sink,
            events,
            log: MessageLog::new(),
            input: String::new(),
            state: ConnectionState::Closed,
            scroll_back: 0,
        }
    }

    /// Apply every pending event. Returns how many were applied.
    pub fn poll_events(&mut self) -> usize {
        let mut applied = 0;
        while let Some(event) = self.events.try_next() {
            self.handle_event(&event);
            applied += 1;
        }
        applied
    }

    /// Append the line for one event.
    pub fn handle_event(&mut self, event: &SocketEvent) {
        match event {
            SocketEvent::Open => self.state = ConnectionState::Open,
            SocketEvent::Close => self.state = ConnectionState::Closed,
            SocketEvent::Message(_) => {}
        }
        self.log.push_event(event);
        if self.scroll_back > 0 {
            // keep the viewport anchored while scrolled back
            self.scroll_back = self.scroll_back.saturating_add(1);
        }
    }

    /// Send the current input and clear it.
    ///
    /// Blank input is ignored. Returns whether anything was sent. The log
    /// is not touched; the relay echoes messages back.
    ///
    /// # Errors
    /// Returns error if the sink refuses the text; the input is kept.
    pub fn send(&mut self) -> Result<bool, ChatError> {
        if self.input.trim().is_empty() {
            return Ok(false);
        }
        self.sink.send(&self.input)?;
        self.input.clear();
        Ok(true)
    }

    /// Close the underlying connection.
    pub fn close(&self) {
        self.sink.close();
    }

    pub fn push_char(&mut self, c: char) {
        self.input.push(c);
    }

    pub fn pop_char(&mut self) {
        self.input.pop();
    }

    /// Replace the input buffer.
    pub fn set_input(&mut self, input: impl Into<String>) {
        self.input = input.into();
    }

    #[must_use]
    pub fn input(&self) -> &str {
        &self.input
    }

    /// The connection behind this view.
    #[must_use]
    pub const fn sink(&self) -> &S {
        &self.sink
    }

    #[must_use]
    pub const fn log(&self) -> &MessageLog {
        &self.log
    }

    /// Connection state as last reported by events.
    #[must_use]
    pub const fn state(&self) -> ConnectionState {
        self.state
    }

    #[must_use]
    pub const fn scroll_back(&self) -> u16 {
        self.scroll_back
    }

    pub fn scroll_up(&mut self) {
        self.scroll_by(1);
    }

    pub fn scroll_down(&mut self) {
        self.scroll_back = self.scroll_back.saturating_sub(1);
    }

    pub fn page_up(&mut self) {
        self.scroll_by(PAGE);
    }

    pub fn page_down(&mut self) {
        self.scroll_back = self.scroll_back.saturating_sub(PAGE);
    }

    fn scroll_by(&mut self, lines: u16) {
        let max = u16::try_from(self.log.len()).unwrap_or(u16::MAX);
        self.scroll_back = self.scroll_back.saturating_add(lines).min(max);
    }
}

impl<S: ChatSink> Drop for ChatView<S> {
    fn drop(&mut self) {
        self.sink.close();
    }
}
