//! The chat controller.
//!
//! [`ChatClient`] owns the client state and drives a [`ChatView`]. Every
//! network operation comes in two forms: an `async` method that performs the
//! whole round trip, and synchronous halves (`begin_submit`/`finish_submit`,
//! [`probe_health`]/`apply_health`, `apply_history`) so an event loop can run
//! the request on a spawned task and apply the outcome when it arrives.

use std::sync::Arc;

use chrono::Local;
use tracing::{info, warn};

use crate::api::HistoryEntry;
use crate::backend::ChatBackend;
use crate::error::{ApiError, Result};
use crate::sanitize::escape_text;
use crate::state::{ClientState, ConversationTurn, HealthStatus, NotificationKind, Sender};
use crate::view::ChatView;

pub const CLEAR_PROMPT: &str =
    "Are you sure you want to clear the chat? This will remove all messages from the current session.";

const GENERIC_API_ERROR: &str = "Something went wrong";
const TRANSPORT_ERROR: &str = "Sorry, I encountered an error. Please try again.";

/// Outcome of one health poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HealthReport {
    pub status: HealthStatus,
    /// Refreshed message count, when the database was online and the count
    /// fetch succeeded.
    pub message_count: Option<usize>,
}

/// Check backend health. Never fails: any error yields the offline status.
pub async fn probe_health<B: ChatBackend + ?Sized>(backend: &B) -> HealthReport {
    let health = match backend.health().await {
        Ok(health) => health,
        Err(e) => {
            warn!("Health check failed: {}", e);
            return HealthReport {
                status: HealthStatus::offline(),
                message_count: None,
            };
        }
    };

    let status = HealthStatus::reachable(health.database_connected, health.ai_available);
    let message_count = if status.database.is_online() {
        match backend.history(1).await {
            Ok(messages) => Some(messages.len()),
            Err(e) => {
                warn!("Failed to update message count: {}", e);
                None
            }
        }
    } else {
        None
    };

    HealthReport {
        status,
        message_count,
    }
}

pub struct ChatClient<B, V> {
    backend: Arc<B>,
    view: V,
    state: ClientState,
}

impl<B: ChatBackend, V: ChatView> ChatClient<B, V> {
    pub fn new(backend: Arc<B>, view: V) -> Self {
        Self {
            backend,
            view,
            state: ClientState::default(),
        }
    }

    pub fn state(&self) -> ClientState {
        self.state
    }

    pub fn is_busy(&self) -> bool {
        self.state.busy
    }

    /// Shared handle for running requests off the controller.
    pub fn backend(&self) -> Arc<B> {
        Arc::clone(&self.backend)
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut V {
        &mut self.view
    }

    // Submission

    /// Send `text` and render the exchange. Returns false when the input was
    /// rejected (empty, or a submission is already in flight).
    pub async fn submit(&mut self, text: &str) -> bool {
        let Some(message) = self.begin_submit(text) else {
            return false;
        };
        let outcome = self.backend.send_chat(&message).await;
        self.finish_submit(outcome);
        true
    }

    /// Accept a submission: clear the input, render the user turn and enter
    /// the pending state. Returns the message to send, or `None` when the
    /// text is blank or the client is busy.
    pub fn begin_submit(&mut self, text: &str) -> Option<String> {
        let message = text.trim();
        if message.is_empty() || self.state.busy {
            return None;
        }
        let message = message.to_string();

        self.view.clear_input();
        self.set_busy(true);
        self.render_turn(&message, Sender::User, false);
        Some(message)
    }

    /// Render the reply (or its error substitute) and leave the pending state.
    pub fn finish_submit(&mut self, outcome: Result<String>) {
        match outcome {
            Ok(reply) => {
                self.render_turn(&reply, Sender::Assistant, false);
                self.state.turn_count += 1;
                self.view.set_count(self.state.turn_count);
            }
            Err(ApiError::Api { status, message }) => {
                warn!(status, "Chat request rejected");
                let detail = message.as_deref().unwrap_or(GENERIC_API_ERROR);
                self.render_turn(&format!("Error: {}", detail), Sender::Assistant, true);
            }
            Err(e) => {
                warn!("Error sending message: {}", e);
                self.render_turn(TRANSPORT_ERROR, Sender::Assistant, true);
            }
        }
        self.set_busy(false);
    }

    fn set_busy(&mut self, busy: bool) {
        self.state.busy = busy;
        self.view.set_busy(busy);
    }

    // Health

    pub async fn poll_health(&mut self) {
        let report = probe_health(self.backend.as_ref()).await;
        self.apply_health(report);
    }

    pub fn apply_health(&mut self, report: HealthReport) {
        self.view.set_status(&report.status);
        if let Some(count) = report.message_count {
            self.state.turn_count = count;
            self.view.set_count(count);
        }
    }

    // History

    /// Replace the conversation with the `limit` most recent exchanges.
    pub async fn load_history(&mut self, limit: usize) {
        let outcome = self.backend.history(limit.max(1)).await;
        self.apply_history(outcome);
    }

    /// Ignored while a submission is pending: the pending user turn must stay
    /// directly above its reply.
    pub fn apply_history(&mut self, outcome: Result<Vec<HistoryEntry>>) {
        if self.state.busy {
            warn!("Ignoring chat history while a reply is pending");
            self.view
                .notify("Wait for the reply before loading history.", NotificationKind::Info);
            return;
        }

        let mut messages = match outcome {
            Ok(messages) => messages,
            Err(e) => {
                warn!("Error loading chat history: {}", e);
                self.view
                    .notify("Failed to load chat history.", NotificationKind::Error);
                return;
            }
        };

        if messages.is_empty() {
            self.view
                .notify("No chat history found.", NotificationKind::Info);
            return;
        }

        // Backend sends newest first
        messages.reverse();
        self.view.reset_turns();
        for entry in &messages {
            self.render_turn(&entry.user_message, Sender::User, false);
            self.render_turn(&entry.ai_response, Sender::Assistant, false);
        }

        self.state.turn_count = messages.len();
        self.view.set_count(self.state.turn_count);
        info!(exchanges = messages.len(), "Chat history loaded");
        self.view
            .notify("Chat history loaded successfully!", NotificationKind::Success);
    }

    /// Clear the conversation after the view confirms. Returns whether it did.
    /// Refused without asking while a submission is pending.
    pub fn clear(&mut self) -> bool {
        if self.state.busy || !self.view.confirm(CLEAR_PROMPT) {
            return false;
        }

        self.view.reset_turns();
        self.state.turn_count = 0;
        self.view.set_count(0);
        self.view
            .notify("Chat cleared successfully!", NotificationKind::Success);
        true
    }

    pub fn render_turn(&mut self, content: &str, sender: Sender, is_error: bool) {
        self.view.render_turn(ConversationTurn {
            sender,
            text: escape_text(content),
            timestamp: Local::now(),
            is_error,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::HealthResponse;
    use async_trait::async_trait;

    struct Unreachable;

    #[async_trait]
    impl ChatBackend for Unreachable {
        async fn health(&self) -> Result<HealthResponse> {
            Err(ApiError::Api {
                status: 503,
                message: None,
            })
        }

        async fn history(&self, _limit: usize) -> Result<Vec<HistoryEntry>> {
            Ok(Vec::new())
        }

        async fn send_chat(&self, _message: &str) -> Result<String> {
            Ok(String::new())
        }
    }

    #[derive(Default)]
    struct Turns(Vec<ConversationTurn>);

    impl ChatView for Turns {
        fn render_turn(&mut self, turn: ConversationTurn) {
            self.0.push(turn);
        }
        fn reset_turns(&mut self) {
            self.0.clear();
        }
        fn set_status(&mut self, _status: &HealthStatus) {}
        fn set_busy(&mut self, _busy: bool) {}
        fn set_count(&mut self, _count: usize) {}
        fn clear_input(&mut self) {}
        fn notify(&mut self, _message: &str, _kind: NotificationKind) {}
        fn confirm(&mut self, _prompt: &str) -> bool {
            false
        }
    }

    #[test]
    fn blank_input_is_rejected() {
        let mut client = ChatClient::new(Arc::new(Unreachable), Turns::default());
        assert_eq!(client.begin_submit("   \n\t"), None);
        assert!(client.view().0.is_empty());
        assert!(!client.is_busy());
    }

    #[test]
    fn second_submission_while_pending_is_ignored() {
        let mut client = ChatClient::new(Arc::new(Unreachable), Turns::default());
        assert_eq!(client.begin_submit("  first  ").as_deref(), Some("first"));
        assert!(client.is_busy());

        assert_eq!(client.begin_submit("second"), None);
        assert_eq!(client.view().0.len(), 1);
        assert_eq!(client.state().turn_count, 0);
    }

    #[test]
    fn api_error_without_message_uses_fallback() {
        let mut client = ChatClient::new(Arc::new(Unreachable), Turns::default());
        client.begin_submit("hi");
        client.finish_submit(Err(ApiError::Api {
            status: 500,
            message: None,
        }));

        let turn = &client.view().0[1];
        assert!(turn.is_error);
        assert_eq!(turn.text, "Error: Something went wrong");
        assert!(!client.is_busy());
    }

    #[test]
    fn rendered_text_is_escaped() {
        let mut client = ChatClient::new(Arc::new(Unreachable), Turns::default());
        client.render_turn("\x1b[31m<b>red</b>", Sender::Assistant, false);
        assert_eq!(client.view().0[0].text, "\\u{1b}[31m<b>red</b>");
    }

    #[test]
    fn clear_is_refused_while_pending() {
        let mut client = ChatClient::new(Arc::new(Unreachable), Turns::default());
        client.begin_submit("question");
        assert!(!client.clear());
        assert_eq!(client.view().0.len(), 1);
    }

    #[tokio::test]
    async fn failed_health_probe_reports_offline() {
        let report = probe_health(&Unreachable).await;
        assert_eq!(report.status, HealthStatus::offline());
        assert_eq!(report.message_count, None);
    }
}
