use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseEventKind};
use ratatui::text::Text;
use ratatui::widgets::ScrollbarState;
use tokio::sync::mpsc;

use crate::tui::event::{AppEvent, Event, EventHandler};
use crate::tui::markdown::markdown_to_ratatui_text;

/// Application state
pub struct App {
    /// Current input text
    pub input: String,
    /// Cursor position in the input field
    pub cursor_position: usize,
    /// Flag to indicate if the application should quit
    pub should_quit: bool,
    /// Rendered messages for display
    pub rendered_messages: Vec<(String, Text<'static>)>, // (role, rendered_text)
    /// Whether an answer is pending; input is not accepted while set
    pub is_waiting: bool,
    /// Counter for spinner animation frames
    pub spinner_frame: usize,
    /// Scrollbar state for chat history
    pub scrollbar_state: ScrollbarState,
    /// Current scroll position
    pub scroll_position: usize,
    /// Event handler
    event_handler: EventHandler,
}

impl App {
    /// Create a new application state
    pub fn new() -> Self {
        Self {
            input: String::new(),
            cursor_position: 0,
            should_quit: false,
            rendered_messages: Vec::new(),
            is_waiting: false,
            spinner_frame: 0,
            scrollbar_state: ScrollbarState::default(),
            scroll_position: 0,
            event_handler: EventHandler::new(),
        }
    }

    /// Get the next event
    pub async fn next_event(&mut self) -> Option<Event> {
        let event = self.event_handler.next().await?;
        match &event {
            Event::Terminal(term_event) => self.handle_terminal_event(term_event),
            Event::Tick => self.tick_spinner(),
            Event::App(app_event) => self.handle_app_event(app_event),
        }
        Some(event)
    }

    /// Get the event sender
    pub fn event_sender(&self) -> mpsc::UnboundedSender<Event> {
        self.event_handler.sender()
    }

    /// Handle terminal events
    fn handle_terminal_event(&mut self, event: &crossterm::event::Event) {
        match event {
            crossterm::event::Event::Key(key) => self.handle_key_event(*key),
            crossterm::event::Event::Mouse(mouse) => match mouse.kind {
                MouseEventKind::ScrollUp => self.scroll_by(-5),
                MouseEventKind::ScrollDown => self.scroll_by(5),
                _ => {}
            },
            _ => {}
        }
    }

    /// Handle application events
    fn handle_app_event(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Submit(input) => {
                self.add_message("user", input);
                self.is_waiting = true;
                self.reset_input();
            }
            AppEvent::Answer(answer) => {
                self.is_waiting = false;
                self.add_message("assistant", answer);
            }
            AppEvent::Quit => {
                self.should_quit = true;
            }
        }
    }

    /// Handle key events
    ///
    /// While an answer is pending the input field is disabled: editing and
    /// submission keys are ignored so a second request cannot start, but
    /// scrolling and quitting stay available.
    fn handle_key_event(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => {
                let _ = self.event_handler.sender().send(Event::App(AppEvent::Quit));
            }
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                let _ = self.event_handler.sender().send(Event::App(AppEvent::Quit));
            }
            KeyCode::Up => self.scroll_up(),
            KeyCode::Down => self.scroll_down(),
            _ if self.is_waiting => {}
            KeyCode::Enter => {
                let input = self.input.trim().to_string();
                if !input.is_empty() {
                    let _ = self
                        .event_handler
                        .sender()
                        .send(Event::App(AppEvent::Submit(input)));
                }
            }
            KeyCode::Char(c) => self.insert_char(c),
            KeyCode::Backspace => self.backspace(),
            KeyCode::Delete => self.delete_char(),
            KeyCode::Left => self.move_cursor_left(),
            KeyCode::Right => self.move_cursor_right(),
            _ => {}
        }
    }

    /// Add a message to the chat history
    pub fn add_message(&mut self, role: &str, text: &str) {
        let rendered_text = markdown_to_ratatui_text(text);
        self.rendered_messages
            .push((role.to_string(), rendered_text));

        // Update scrollbar state with new content length
        let total_height = self.calculate_total_height();
        self.scrollbar_state = ScrollbarState::default().content_length(total_height);
    }

    /// Calculate total height of all messages
    fn calculate_total_height(&self) -> usize {
        self.rendered_messages
            .iter()
            .map(|(_, text)| text.height() + 2) // +2 for role line and separator
            .sum()
    }

    /// Reset the input field
    pub fn reset_input(&mut self) {
        self.input.clear();
        self.cursor_position = 0;
    }

    /// Move cursor left in the input field
    pub fn move_cursor_left(&mut self) {
        if self.cursor_position > 0 {
            self.cursor_position -= 1;
        }
    }

    /// Move cursor right in the input field
    pub fn move_cursor_right(&mut self) {
        if self.cursor_position < self.input.chars().count() {
            self.cursor_position += 1;
        }
    }

    /// Insert character at cursor position
    pub fn insert_char(&mut self, c: char) {
        let byte_index = self.byte_index();
        self.input.insert(byte_index, c);
        self.cursor_position += 1;
    }

    /// Delete character at cursor position
    pub fn delete_char(&mut self) {
        if self.cursor_position < self.input.chars().count() {
            let byte_index = self.byte_index();
            self.input.remove(byte_index);
        }
    }

    /// Delete character before cursor position (backspace)
    pub fn backspace(&mut self) {
        if self.cursor_position > 0 {
            self.cursor_position -= 1;
            let byte_index = self.byte_index();
            self.input.remove(byte_index);
        }
    }

    /// Byte offset of the cursor within the input
    ///
    /// The cursor counts characters, not bytes; the input is largely
    /// Japanese, so the two differ.
    fn byte_index(&self) -> usize {
        self.input
            .char_indices()
            .nth(self.cursor_position)
            .map(|(i, _)| i)
            .unwrap_or(self.input.len())
    }

    /// Scroll chat history up
    pub fn scroll_up(&mut self) {
        let total_height = self.calculate_total_height();
        self.scroll_position = self.scroll_position.saturating_sub(1);
        self.scrollbar_state = ScrollbarState::default()
            .content_length(total_height)
            .position(self.scroll_position);
    }

    /// Scroll chat history down
    pub fn scroll_down(&mut self) {
        let total_height = self.calculate_total_height();
        let max_pos = total_height.saturating_sub(1);
        self.scroll_position = self.scroll_position.saturating_add(1).min(max_pos);
        self.scrollbar_state = ScrollbarState::default()
            .content_length(total_height)
            .position(self.scroll_position);
    }

    /// Scroll by a specific number of lines (positive = down, negative = up)
    pub fn scroll_by(&mut self, delta: i32) {
        let total_height = self.calculate_total_height();

        self.scroll_position = if delta < 0 {
            self.scroll_position
                .saturating_sub(delta.unsigned_abs() as usize)
        } else {
            let max_pos = total_height.saturating_sub(1);
            self.scroll_position
                .saturating_add(delta as usize)
                .min(max_pos)
        };

        self.scrollbar_state = ScrollbarState::default()
            .content_length(total_height)
            .position(self.scroll_position);
    }

    /// Update spinner frame
    pub fn tick_spinner(&mut self) {
        if self.is_waiting {
            self.spinner_frame = (self.spinner_frame + 1) % 8;
        }
    }
}
