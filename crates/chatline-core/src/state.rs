//! UI-agnostic client state types
//!
//! This module contains the data the controller hands to a view. Nothing here
//! depends on a particular UI framework.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// Input length above which the character counter turns to a warning colour.
pub const CHAR_COUNT_WARNING: usize = 700;
/// Input length above which the character counter turns to a danger colour.
pub const CHAR_COUNT_DANGER: usize = 900;

/// Who a conversation turn belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sender {
    User,
    Assistant,
}

/// One rendered message in the conversation view
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversationTurn {
    pub sender: Sender,
    pub text: String,
    pub timestamp: DateTime<Local>,
    pub is_error: bool,
}

impl ConversationTurn {
    /// Local `HH:MM` time the turn was rendered at.
    pub fn time_label(&self) -> String {
        self.timestamp.format("%H:%M").to_string()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Pending,
}

/// Busy flag and the displayed message count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ClientState {
    pub busy: bool,
    pub turn_count: usize,
}

impl ClientState {
    pub fn phase(&self) -> Phase {
        if self.busy {
            Phase::Pending
        } else {
            Phase::Idle
        }
    }
}

/// State of a single status badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Indicator {
    Online,
    Offline,
    Unknown,
}

impl Indicator {
    fn from_flag(online: bool) -> Self {
        if online {
            Indicator::Online
        } else {
            Indicator::Offline
        }
    }

    pub fn is_online(&self) -> bool {
        matches!(self, Indicator::Online)
    }
}

/// The three independent health indicators, replaced wholesale on every poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HealthStatus {
    pub connection: Indicator,
    pub database: Indicator,
    pub ai: Indicator,
}

impl HealthStatus {
    /// Status after a successful health response.
    pub fn reachable(database_connected: bool, ai_available: bool) -> Self {
        Self {
            connection: Indicator::Online,
            database: Indicator::from_flag(database_connected),
            ai: Indicator::from_flag(ai_available),
        }
    }

    /// Status when the health endpoint could not be read at all.
    pub fn offline() -> Self {
        Self {
            connection: Indicator::Offline,
            database: Indicator::Unknown,
            ai: Indicator::Unknown,
        }
    }

    pub fn connection_label(&self) -> &'static str {
        match self.connection {
            Indicator::Online => "Connected",
            _ => "Disconnected",
        }
    }

    pub fn database_label(&self) -> &'static str {
        match self.database {
            Indicator::Online => "Connected",
            Indicator::Offline => "Disconnected",
            Indicator::Unknown => "Unknown",
        }
    }

    pub fn ai_label(&self) -> &'static str {
        match self.ai {
            Indicator::Online => "Available",
            Indicator::Offline => "Unavailable",
            Indicator::Unknown => "Unknown",
        }
    }
}

impl Default for HealthStatus {
    fn default() -> Self {
        Self::offline()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Info,
    Error,
}

/// Colour band for the input character counter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharCountLevel {
    Normal,
    Warning,
    Danger,
}

impl CharCountLevel {
    pub fn for_len(chars: usize) -> Self {
        if chars > CHAR_COUNT_DANGER {
            CharCountLevel::Danger
        } else if chars > CHAR_COUNT_WARNING {
            CharCountLevel::Warning
        } else {
            CharCountLevel::Normal
        }
    }
}
