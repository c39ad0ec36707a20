use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};
use chatline_core::{CharCountLevel, Indicator, NotificationKind, Sender};
use crate::app::{App, InputMode, WELCOME_LINES};

pub fn render(app: &mut App, frame: &mut Frame) {
    let area = frame.area();

    // Main layout: header, conversation, input, footer
    let [header_area, chat_area, input_area, footer_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(0),
        Constraint::Length(3),
        Constraint::Length(1),
    ])
    .areas(area);

    render_header(app, frame, header_area);
    render_chat(app, frame, chat_area);
    render_input(app, frame, input_area);
    render_footer(app, frame, footer_area);

    // Popups
    if app.show_clear_confirm {
        render_clear_confirm(frame, area);
    }
    render_toast(app, frame, area);
}

fn indicator_style(indicator: Indicator) -> Style {
    let bg = if indicator.is_online() { Color::Green } else { Color::Red };
    Style::default().bg(bg).fg(Color::Black)
}

fn render_header(app: &App, frame: &mut Frame, area: Rect) {
    let view = app.view();
    let status = view.status;
    let label_style = Style::default().fg(Color::White);

    let title = Line::from(vec![
        Span::styled(" chatline ", Style::default().fg(Color::Cyan).bold()),
        Span::styled(format!("{} ", app.base_url), Style::default().fg(Color::Gray)),
        Span::styled(" Connection ", label_style),
        Span::styled(format!(" {} ", status.connection_label()), indicator_style(status.connection)),
        Span::styled(" Database ", label_style),
        Span::styled(format!(" {} ", status.database_label()), indicator_style(status.database)),
        Span::styled(" AI ", label_style),
        Span::styled(format!(" {} ", status.ai_label()), indicator_style(status.ai)),
        Span::styled(format!(" Messages: {} ", view.count), label_style),
    ]);

    let header = Paragraph::new(title).style(Style::default().bg(Color::DarkGray));
    frame.render_widget(header, area);
}

fn render_chat(app: &mut App, frame: &mut Frame, area: Rect) {
    // Store chat area dimensions for scroll calculations (inner size minus borders)
    app.chat_height = area.height.saturating_sub(2);
    app.chat_width = area.width.saturating_sub(2);

    if app.view().follow_tail {
        app.scroll_chat_to_bottom();
    }

    let chat_block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(" Conversation ");

    let mut lines: Vec<Line> = Vec::new();
    for line in WELCOME_LINES {
        lines.push(Line::from(Span::styled(
            line,
            Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
        )));
    }
    lines.push(Line::default());

    let view = app.view();
    for turn in &view.turns {
        let label_color = match turn.sender {
            Sender::User => Color::Cyan,
            Sender::Assistant => Color::Yellow,
        };
        lines.push(Line::from(vec![
            Span::styled(
                format!("{}:", App::sender_label(turn.sender)),
                Style::default().fg(label_color).add_modifier(Modifier::BOLD),
            ),
            Span::styled(format!(" {}", turn.time_label()), Style::default().fg(Color::DarkGray)),
        ]));

        // Text is shown verbatim, never parsed for styling
        let text_style = if turn.is_error {
            Style::default().fg(Color::Red)
        } else {
            Style::default()
        };
        for line in turn.text.lines() {
            lines.push(Line::from(Span::styled(line.to_string(), text_style)));
        }
        lines.push(Line::default());
    }

    if view.busy {
        lines.push(Line::from(Span::styled(
            "AI:",
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        )));
        // Animated ellipsis: cycles through ".", "..", "..."
        let dots = ".".repeat((app.animation_frame as usize) + 1);
        lines.push(Line::from(Span::styled(
            format!("Thinking{}", dots),
            Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
        )));
    }

    let chat = Paragraph::new(Text::from(lines))
        .block(chat_block)
        .wrap(Wrap { trim: false })
        .scroll((app.chat_scroll, 0));

    frame.render_widget(chat, area);
}

fn render_input(app: &App, frame: &mut Frame, area: Rect) {
    let view = app.view();
    let editing = app.input_mode == InputMode::Editing;

    let border_color = if view.busy {
        Color::DarkGray
    } else if editing {
        Color::Yellow
    } else {
        Color::Gray
    };

    let counter_color = match view.char_level() {
        CharCountLevel::Normal => Color::Gray,
        CharCountLevel::Warning => Color::Yellow,
        CharCountLevel::Danger => Color::Red,
    };

    let title = if view.busy {
        Line::from(Span::styled(" Waiting for reply... ", Style::default().fg(Color::DarkGray)))
    } else {
        Line::from(vec![
            Span::raw(" Message "),
            Span::styled(format!("({}) ", view.char_count()), Style::default().fg(counter_color)),
        ])
    };

    let input_block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color))
        .title(title);

    // Calculate visible portion of input with horizontal scrolling
    // Inner width = total width - 2 (for borders)
    let inner_width = area.width.saturating_sub(2) as usize;
    let cursor_pos = view.cursor;

    // Calculate scroll offset to keep cursor visible
    let scroll_offset = if inner_width == 0 {
        0
    } else if cursor_pos >= inner_width {
        cursor_pos - inner_width + 1
    } else {
        0
    };

    // Get the visible slice of the input
    let visible_text: String = view.input
        .chars()
        .skip(scroll_offset)
        .take(inner_width)
        .collect();

    let input = Paragraph::new(visible_text)
        .style(Style::default().fg(Color::Cyan))
        .block(input_block);

    frame.render_widget(input, area);

    // Show cursor when editing and input is enabled
    if editing && !view.busy && !app.show_clear_confirm {
        let cursor_x = (cursor_pos - scroll_offset) as u16;
        frame.set_cursor_position((area.x + cursor_x + 1, area.y + 1));
    }
}

fn render_footer(app: &App, frame: &mut Frame, area: Rect) {
    // Key style: dark background with bright text for visibility on both light/dark terminals
    let key_style = Style::default().bg(Color::DarkGray).fg(Color::White);
    let label_style = Style::default().bg(Color::Black).fg(Color::White);

    let (mode_text, mode_style) = match app.input_mode {
        InputMode::Normal => (" NORMAL ", Style::default().bg(Color::Blue).fg(Color::White)),
        InputMode::Editing => (" INSERT ", Style::default().bg(Color::Yellow).fg(Color::Black)),
    };

    let mut spans = vec![Span::styled(mode_text, mode_style), Span::raw(" ")];
    let hints = if app.show_clear_confirm {
        vec![
            Span::styled(" y ", key_style),
            Span::styled(" clear ", label_style),
            Span::styled(" n ", key_style),
            Span::styled(" keep ", label_style),
        ]
    } else {
        match app.input_mode {
            InputMode::Editing => vec![
                Span::styled(" Enter ", key_style),
                Span::styled(" send ", label_style),
                Span::styled(" Esc ", key_style),
                Span::styled(" normal ", label_style),
            ],
            InputMode::Normal => vec![
                Span::styled(" i ", key_style),
                Span::styled(" type ", label_style),
                Span::styled(" j/k ", key_style),
                Span::styled(" scroll ", label_style),
                Span::styled(" h ", key_style),
                Span::styled(" history ", label_style),
                Span::styled(" c ", key_style),
                Span::styled(" clear ", label_style),
                Span::styled(" r ", key_style),
                Span::styled(" refresh ", label_style),
                Span::styled(" q ", key_style),
                Span::styled(" quit ", label_style),
            ],
        }
    };
    spans.extend(hints);

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width.saturating_sub(4));
    let height = height.min(area.height);
    let x = (area.width.saturating_sub(width)) / 2;
    let y = (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width, height)
}

fn render_clear_confirm(frame: &mut Frame, area: Rect) {
    let popup_area = centered(area, 60, 6);

    // Clear the area behind the popup
    frame.render_widget(Clear, popup_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow))
        .title(" Clear chat ");

    let text = Text::from(vec![
        Line::from(chatline_core::client::CLEAR_PROMPT),
        Line::default(),
        Line::from(Span::styled("y to clear, n or Esc to keep", Style::default().fg(Color::DarkGray))),
    ]);

    let dialog = Paragraph::new(text).block(block).wrap(Wrap { trim: true });
    frame.render_widget(dialog, popup_area);
}

fn render_toast(app: &App, frame: &mut Frame, area: Rect) {
    let Some(toast) = &app.view().toast else {
        return;
    };

    let color = match toast.kind {
        NotificationKind::Success => Color::Green,
        NotificationKind::Info => Color::Blue,
        NotificationKind::Error => Color::Red,
    };

    let width = (toast.message.chars().count() as u16 + 4).min(area.width);
    let toast_area = Rect::new(area.width.saturating_sub(width + 1), 1, width, 3u16.min(area.height));

    frame.render_widget(Clear, toast_area);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(color));
    let message = Paragraph::new(toast.message.as_str())
        .style(Style::default().fg(color))
        .block(block);
    frame.render_widget(message, toast_area);
}
