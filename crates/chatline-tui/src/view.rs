//! Terminal-side model the controller renders into.

use std::time::{Duration, Instant};

use chatline_core::{
    CharCountLevel, ChatView, ConversationTurn, HealthStatus, NotificationKind,
};

/// How long a notification stays on screen.
pub const TOAST_DURATION: Duration = Duration::from_secs(3);

#[derive(Debug, Clone)]
pub struct Toast {
    pub message: String,
    pub kind: NotificationKind,
    pub shown_at: Instant,
}

/// Everything the conversation screen draws.
///
/// The welcome placeholder is drawn by the renderer ahead of `turns` and is
/// never stored here, so resetting turns always keeps it.
#[derive(Debug)]
pub struct TuiView {
    pub turns: Vec<ConversationTurn>,
    pub input: String,
    pub cursor: usize, // cursor position in input, in chars
    pub status: HealthStatus,
    pub busy: bool,
    pub count: usize,
    pub toast: Option<Toast>,
    /// Keep the newest turn in view on the next draw.
    pub follow_tail: bool,
    confirm_answer: Option<bool>,
}

impl TuiView {
    pub fn new() -> Self {
        Self {
            turns: Vec::new(),
            input: String::new(),
            cursor: 0,
            status: HealthStatus::offline(),
            busy: false,
            count: 0,
            toast: None,
            follow_tail: true,
            confirm_answer: None,
        }
    }

    /// Record the user's answer to the confirmation dialog; the next
    /// `confirm` call consumes it.
    pub fn answer_confirmation(&mut self, yes: bool) {
        self.confirm_answer = Some(yes);
    }

    /// Drop the toast once it has been visible for [`TOAST_DURATION`].
    pub fn expire_toast(&mut self, now: Instant) {
        if let Some(toast) = &self.toast {
            if now.duration_since(toast.shown_at) >= TOAST_DURATION {
                self.toast = None;
            }
        }
    }

    pub fn char_count(&self) -> usize {
        self.input.chars().count()
    }

    pub fn char_level(&self) -> CharCountLevel {
        CharCountLevel::for_len(self.char_count())
    }
}

impl Default for TuiView {
    fn default() -> Self {
        Self::new()
    }
}

impl ChatView for TuiView {
    fn render_turn(&mut self, turn: ConversationTurn) {
        self.turns.push(turn);
        self.follow_tail = true;
    }

    fn reset_turns(&mut self) {
        self.turns.clear();
        self.follow_tail = true;
    }

    fn set_status(&mut self, status: &HealthStatus) {
        self.status = *status;
    }

    fn set_busy(&mut self, busy: bool) {
        self.busy = busy;
        // Thinking indicator sits below the last turn
        if busy {
            self.follow_tail = true;
        }
    }

    fn set_count(&mut self, count: usize) {
        self.count = count;
    }

    fn clear_input(&mut self) {
        self.input.clear();
        self.cursor = 0;
    }

    fn notify(&mut self, message: &str, kind: NotificationKind) {
        self.toast = Some(Toast {
            message: message.to_string(),
            kind,
            shown_at: Instant::now(),
        });
    }

    fn confirm(&mut self, _prompt: &str) -> bool {
        self.confirm_answer.take().unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chatline_core::Sender;
    use chrono::Local;

    fn turn(text: &str) -> ConversationTurn {
        ConversationTurn {
            sender: Sender::User,
            text: text.to_string(),
            timestamp: Local::now(),
            is_error: false,
        }
    }

    #[test]
    fn confirmation_answer_is_used_once() {
        let mut view = TuiView::new();
        assert!(!view.confirm("clear?"));

        view.answer_confirmation(true);
        assert!(view.confirm("clear?"));
        assert!(!view.confirm("clear?"));
    }

    #[test]
    fn toast_expires_after_duration() {
        let mut view = TuiView::new();
        view.notify("Chat cleared successfully!", NotificationKind::Success);
        let shown_at = view.toast.as_ref().unwrap().shown_at;

        view.expire_toast(shown_at + Duration::from_secs(1));
        assert!(view.toast.is_some());

        view.expire_toast(shown_at + TOAST_DURATION);
        assert!(view.toast.is_none());
    }

    #[test]
    fn render_turn_follows_tail() {
        let mut view = TuiView::new();
        view.follow_tail = false;
        view.render_turn(turn("hi"));
        assert!(view.follow_tail);
        assert_eq!(view.turns.len(), 1);

        view.reset_turns();
        assert!(view.turns.is_empty());
    }

    #[test]
    fn clear_input_resets_cursor() {
        let mut view = TuiView::new();
        view.input = "héllo".to_string();
        view.cursor = 5;
        assert_eq!(view.char_count(), 5);

        view.clear_input();
        assert!(view.input.is_empty());
        assert_eq!(view.cursor, 0);
    }

    #[test]
    fn starts_offline() {
        let view = TuiView::new();
        assert_eq!(view.status, HealthStatus::offline());
        assert_eq!(view.char_level(), CharCountLevel::Normal);
    }
}
