//! Plain stdout view for the one-shot commands.

use std::io::{self, BufRead, Write};

use chatline_core::{ChatView, ConversationTurn, HealthStatus, Indicator, NotificationKind, Sender};
use crossterm::style::Stylize;

#[derive(Debug, Default)]
pub struct ConsoleView {
    /// Whether the last rendered turn was an error.
    pub saw_error: bool,
}

impl ConsoleView {
    pub fn new() -> Self {
        Self::default()
    }
}

fn badge(indicator: Indicator, label: &str) -> String {
    if indicator.is_online() {
        label.green().to_string()
    } else {
        label.red().to_string()
    }
}

impl ChatView for ConsoleView {
    fn render_turn(&mut self, turn: ConversationTurn) {
        let label = match turn.sender {
            Sender::User => "You".cyan().bold(),
            Sender::Assistant => "AI".yellow().bold(),
        };
        println!("{} {}", label, turn.time_label().dark_grey());
        if turn.is_error {
            println!("{}", turn.text.as_str().red());
        } else {
            println!("{}", turn.text);
        }
        println!();
        self.saw_error = turn.is_error;
    }

    fn reset_turns(&mut self) {}

    fn set_status(&mut self, status: &HealthStatus) {
        println!("Connection: {}", badge(status.connection, status.connection_label()));
        println!("Database:   {}", badge(status.database, status.database_label()));
        println!("AI:         {}", badge(status.ai, status.ai_label()));
    }

    fn set_busy(&mut self, busy: bool) {
        if busy {
            eprintln!("{}", "Waiting for reply...".dark_grey());
        }
    }

    fn set_count(&mut self, count: usize) {
        println!("Messages:   {}", count.to_string().bold());
    }

    fn clear_input(&mut self) {}

    fn notify(&mut self, message: &str, kind: NotificationKind) {
        match kind {
            NotificationKind::Success => println!("{}", message.green()),
            NotificationKind::Info => println!("{}", message.blue()),
            NotificationKind::Error => eprintln!("{}", message.red()),
        }
    }

    fn confirm(&mut self, prompt: &str) -> bool {
        print!("{} [y/N] ", prompt);
        let _ = io::stdout().flush();

        let mut answer = String::new();
        if io::stdin().lock().read_line(&mut answer).is_err() {
            return false;
        }
        matches!(answer.trim(), "y" | "Y" | "yes")
    }
}
