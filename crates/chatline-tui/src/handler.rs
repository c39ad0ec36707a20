use std::time::Instant;
use anyhow::Result;
use chatline_core::{probe_health, ChatBackend};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseEvent, MouseEventKind};
use tracing::debug;
use crate::app::{App, InputMode};
use crate::tui::AppEvent;

/// Convert a character index to a byte index for UTF-8 safe string operations
fn char_to_byte_index(s: &str, char_idx: usize) -> usize {
    s.char_indices()
        .nth(char_idx)
        .map(|(i, _)| i)
        .unwrap_or(s.len())
}

pub async fn handle_event(app: &mut App, event: AppEvent) -> Result<()> {
    match event {
        AppEvent::Key(key) => handle_key(app, key),
        AppEvent::Mouse(mouse) => handle_mouse(app, mouse),
        AppEvent::Resize => {}
        AppEvent::Tick => {
            app.tick_animation();
            app.view_mut().expire_toast(Instant::now());
        }
        AppEvent::PollHealth => spawn_health_poll(app),
        AppEvent::ChatSettled(outcome) => app.client.finish_submit(outcome),
        AppEvent::HealthProbed(report) => app.client.apply_health(report),
        AppEvent::HistoryLoaded(outcome) => app.client.apply_history(outcome),
    }
    Ok(())
}

fn handle_key(app: &mut App, key: KeyEvent) {
    // Global keys that work in any mode
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.should_quit = true;
        return;
    }

    if app.show_clear_confirm {
        handle_clear_confirm(app, key);
        return;
    }

    match app.input_mode {
        InputMode::Normal => handle_normal_mode(app, key),
        InputMode::Editing => handle_editing_mode(app, key),
    }
}

fn handle_normal_mode(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') => app.should_quit = true,

        KeyCode::Char('i') | KeyCode::Enter => app.input_mode = InputMode::Editing,

        KeyCode::Char('j') | KeyCode::Down => app.scroll_down(),
        KeyCode::Char('k') | KeyCode::Up => app.scroll_up(),
        KeyCode::Char('G') | KeyCode::End => app.view_mut().follow_tail = true,

        // Both replace the turns, so they wait for the pending reply
        KeyCode::Char('h') if !app.client.is_busy() => spawn_history_load(app),
        KeyCode::Char('c') if !app.client.is_busy() => app.show_clear_confirm = true,
        KeyCode::Char('r') => spawn_health_poll(app),

        _ => {}
    }
}

fn handle_clear_confirm(app: &mut App, key: KeyEvent) {
    let answer = match key.code {
        KeyCode::Char('y') | KeyCode::Char('Y') => true,
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => false,
        _ => return,
    };

    app.show_clear_confirm = false;
    app.view_mut().answer_confirmation(answer);
    if app.client.clear() {
        app.chat_scroll = 0;
    }
}

fn handle_editing_mode(app: &mut App, key: KeyEvent) {
    if key.code == KeyCode::Esc {
        app.input_mode = InputMode::Normal;
        return;
    }

    // Input is disabled until the pending reply settles
    if app.client.is_busy() {
        return;
    }

    if key.code == KeyCode::Enter {
        submit_input(app);
        return;
    }

    let view = app.view_mut();
    match key.code {
        KeyCode::Backspace => {
            if view.cursor > 0 {
                view.cursor -= 1;
                let byte_pos = char_to_byte_index(&view.input, view.cursor);
                view.input.remove(byte_pos);
            }
        }
        KeyCode::Delete => {
            if view.cursor < view.char_count() {
                let byte_pos = char_to_byte_index(&view.input, view.cursor);
                view.input.remove(byte_pos);
            }
        }
        KeyCode::Left => {
            view.cursor = view.cursor.saturating_sub(1);
        }
        KeyCode::Right => {
            view.cursor = (view.cursor + 1).min(view.char_count());
        }
        KeyCode::Home => {
            view.cursor = 0;
        }
        KeyCode::End => {
            view.cursor = view.char_count();
        }
        KeyCode::Char(c) => {
            let byte_pos = char_to_byte_index(&view.input, view.cursor);
            view.input.insert(byte_pos, c);
            view.cursor += 1;
        }
        _ => {}
    }
}

fn handle_mouse(app: &mut App, mouse: MouseEvent) {
    match mouse.kind {
        MouseEventKind::ScrollDown => app.scroll_down(),
        MouseEventKind::ScrollUp => app.scroll_up(),
        _ => {}
    }
}

/// Render the user turn now and send the message on a background task.
fn submit_input(app: &mut App) {
    let input = app.view().input.clone();
    let Some(message) = app.client.begin_submit(&input) else {
        return;
    };

    let backend = app.client.backend();
    let tx = app.events.clone();
    tokio::spawn(async move {
        let outcome = backend.send_chat(&message).await;
        let _ = tx.send(AppEvent::ChatSettled(outcome));
    });
}

fn spawn_health_poll(app: &App) {
    debug!("polling backend health");
    let backend = app.client.backend();
    let tx = app.events.clone();
    tokio::spawn(async move {
        let report = probe_health(backend.as_ref()).await;
        let _ = tx.send(AppEvent::HealthProbed(report));
    });
}

fn spawn_history_load(app: &App) {
    let backend = app.client.backend();
    let limit = app.history_limit;
    let tx = app.events.clone();
    tokio::spawn(async move {
        let outcome = backend.history(limit).await;
        let _ = tx.send(AppEvent::HistoryLoaded(outcome));
    });
}
