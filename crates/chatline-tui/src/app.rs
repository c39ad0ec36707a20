use chatline_core::{ChatClient, HttpBackend, Sender};
use tokio::sync::mpsc::UnboundedSender;
use crate::tui::AppEvent;
use crate::view::TuiView;

/// Lines the renderer draws ahead of the conversation turns.
pub const WELCOME_LINES: [&str; 2] = [
    "Welcome! Ask me anything and I'll do my best to help.",
    "Press h in normal mode to load earlier messages.",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Editing,
}

pub struct App {
    pub should_quit: bool,
    pub input_mode: InputMode,
    pub show_clear_confirm: bool,

    pub client: ChatClient<HttpBackend, TuiView>,
    /// Completions of background requests are sent here.
    pub events: UnboundedSender<AppEvent>,
    pub history_limit: usize,
    pub base_url: String,

    // Conversation scroll state
    pub chat_scroll: u16,
    pub chat_height: u16, // Height of chat area for scroll calculations
    pub chat_width: u16,  // Width of chat area for wrap calculations

    // Animation state
    pub animation_frame: u8, // 0-2 for ellipsis animation
}

impl App {
    pub fn new(
        client: ChatClient<HttpBackend, TuiView>,
        events: UnboundedSender<AppEvent>,
        history_limit: usize,
    ) -> Self {
        let base_url = client.backend().base_url().to_string();
        Self {
            should_quit: false,
            // Input box has focus at startup
            input_mode: InputMode::Editing,
            show_clear_confirm: false,
            client,
            events,
            history_limit,
            base_url,
            chat_scroll: 0,
            chat_height: 0,
            chat_width: 0,
            animation_frame: 0,
        }
    }

    pub fn view(&self) -> &TuiView {
        self.client.view()
    }

    pub fn view_mut(&mut self) -> &mut TuiView {
        self.client.view_mut()
    }

    /// Tick animation frame (called by Tick event)
    pub fn tick_animation(&mut self) {
        if self.client.is_busy() {
            self.animation_frame = (self.animation_frame + 1) % 3;
        }
    }

    pub fn scroll_down(&mut self) {
        let max_scroll = self.total_chat_lines().saturating_sub(self.visible_height());
        if self.chat_scroll < max_scroll {
            self.chat_scroll = self.chat_scroll.saturating_add(1);
        }
        if self.chat_scroll >= max_scroll {
            self.view_mut().follow_tail = true;
        }
    }

    pub fn scroll_up(&mut self) {
        self.chat_scroll = self.chat_scroll.saturating_sub(1);
        self.view_mut().follow_tail = false;
    }

    /// Scroll chat to bottom so the newest turn (or "Thinking...") is visible
    pub fn scroll_chat_to_bottom(&mut self) {
        let total_lines = self.total_chat_lines();
        let visible_height = self.visible_height();
        self.chat_scroll = total_lines.saturating_sub(visible_height);
    }

    fn visible_height(&self) -> u16 {
        if self.chat_height > 0 {
            self.chat_height
        } else {
            20
        }
    }

    /// Rendered line count of the conversation, matching `ui::render_chat`.
    pub fn total_chat_lines(&self) -> u16 {
        // Use actual chat width for wrap calculation, default to 50 if not set
        let wrap_width = if self.chat_width > 0 {
            self.chat_width as usize
        } else {
            50
        };

        let mut total_lines: u16 = 0;
        for line in WELCOME_LINES {
            total_lines = total_lines.saturating_add(wrapped_height(line, wrap_width));
        }
        total_lines = total_lines.saturating_add(1); // Blank line after welcome

        for turn in &self.view().turns {
            total_lines = total_lines.saturating_add(1); // Label line ("You" or "AI" with time)
            for line in turn.text.lines() {
                total_lines = total_lines.saturating_add(wrapped_height(line, wrap_width));
            }
            total_lines = total_lines.saturating_add(1); // Blank line after message
        }

        if self.client.is_busy() {
            total_lines = total_lines.saturating_add(2); // "AI" + "Thinking..."
        }

        total_lines
    }

    pub fn sender_label(sender: Sender) -> &'static str {
        match sender {
            Sender::User => "You",
            Sender::Assistant => "AI",
        }
    }
}

fn wrapped_height(line: &str, wrap_width: usize) -> u16 {
    // Use character count, not byte length, for proper UTF-8 handling
    let char_count = line.chars().count();
    if char_count == 0 {
        1 // Empty line still takes one line
    } else {
        u16::try_from(char_count.div_ceil(wrap_width)).unwrap_or(u16::MAX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use tokio::sync::mpsc;

    fn app() -> App {
        let backend = HttpBackend::new("http://127.0.0.1:9").unwrap();
        let client = ChatClient::new(Arc::new(backend), TuiView::new());
        let (tx, _rx) = mpsc::unbounded_channel();
        App::new(client, tx, 20)
    }

    #[test]
    fn wrapped_height_counts_chars_and_saturates() {
        assert_eq!(wrapped_height("", 10), 1);
        assert_eq!(wrapped_height("héllo wörld", 5), 3);
        assert_eq!(wrapped_height(&"x".repeat(70_000), 1), u16::MAX);
    }

    #[test]
    fn huge_reply_saturates_line_count() {
        let mut app = app();
        app.chat_width = 1;
        app.chat_height = 10;
        let reply = "y\n".repeat(40_000);
        app.client.render_turn(&reply, Sender::Assistant, false);
        app.client.render_turn(&reply, Sender::Assistant, false);

        assert_eq!(app.total_chat_lines(), u16::MAX);
        app.scroll_chat_to_bottom();
        assert_eq!(app.chat_scroll, u16::MAX - 10);
    }
}
