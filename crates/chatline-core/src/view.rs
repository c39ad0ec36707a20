//! The display surface the controller drives.

use crate::state::{ConversationTurn, HealthStatus, NotificationKind};

/// Everything [`crate::ChatClient`] needs from a frontend.
///
/// Implementations own the rendered conversation. They are expected to keep a
/// static welcome placeholder ahead of the turns, which `reset_turns` leaves
/// in place.
pub trait ChatView {
    /// Append a turn, styling it as an error when `turn.is_error`, and scroll
    /// so it is visible.
    fn render_turn(&mut self, turn: ConversationTurn);

    /// Drop every rendered turn, keeping only the welcome placeholder.
    fn reset_turns(&mut self);

    fn set_status(&mut self, status: &HealthStatus);

    /// Disable input and show a pending indicator while `busy`.
    fn set_busy(&mut self, busy: bool);

    fn set_count(&mut self, count: usize);

    fn clear_input(&mut self);

    /// Show a transient notification.
    fn notify(&mut self, message: &str, kind: NotificationKind);

    /// Ask the user to confirm a destructive action.
    fn confirm(&mut self, prompt: &str) -> bool;
}
