pub mod api;
pub mod backend;
pub mod client;
pub mod config;
pub mod error;
pub mod sanitize;
pub mod state;
pub mod view;

// Re-export main types for convenience
pub use api::{ChatReply, ChatRequest, ErrorBody, HealthResponse, HistoryEntry, HistoryResponse};
pub use backend::{ChatBackend, HttpBackend};
pub use client::{probe_health, ChatClient, HealthReport};
pub use config::Config;
pub use error::{ApiError, Result};
pub use state::{
    CharCountLevel, ClientState, ConversationTurn, HealthStatus, Indicator, NotificationKind,
    Phase, Sender,
};
pub use view::ChatView;
