use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Margin, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{
        Block, Borders, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState, Wrap,
    },
};
use unicode_width::UnicodeWidthStr;

use crate::tui::app::App;

const SPINNER_FRAMES: [&str; 8] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧"];

/// Draw the UI
pub fn draw(f: &mut Frame, app: &App) {
    // Create main layout
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(1),    // Chat history
            Constraint::Length(3), // Input field
        ])
        .split(f.area());

    // Render chat history
    render_messages(f, app, chunks[0]);

    // Render input field
    render_input(f, app, chunks[1]);
}

/// Render chat messages
fn render_messages(f: &mut Frame, app: &App, area: Rect) {
    let messages_block = Block::default().borders(Borders::ALL).title(Span::styled(
        "チャット履歴",
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    ));

    f.render_widget(messages_block.clone(), area);

    // Create a paragraph for each message
    let mut lines: Vec<Line> = Vec::new();

    for (i, (role, text)) in app.rendered_messages.iter().enumerate() {
        let role_style = match role.as_str() {
            "user" => Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
            "assistant" => Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD),
            _ => Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        };

        // Render role indicator
        let role_text = match role.as_str() {
            "user" => "あなた",
            "assistant" => "アシスタント",
            _ => role,
        };

        let role_span = Span::styled(format!("{}: ", role_text), role_style);
        lines.push(Line::from(vec![role_span]));

        // Add message content lines
        lines.extend(text.lines.clone());

        // Add separator between messages
        if i < app.rendered_messages.len() - 1 {
            lines.push(Line::from(vec![Span::styled(
                "────────────────────────────────────────────────────────────────────────────────",
                Style::default().fg(Color::DarkGray),
            )]));
        }
    }

    // Show spinner while waiting for an answer
    if app.is_waiting {
        lines.push(Line::from(vec![Span::styled(
            format!("{} 考えています...", SPINNER_FRAMES[app.spinner_frame]),
            Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD),
        )]));
    }

    // Get current scroll position
    let total_height = lines.len();

    // Render all messages in a single paragraph with scrolling
    let messages = Paragraph::new(lines.clone())
        .block(messages_block)
        .wrap(Wrap { trim: true })
        .scroll((app.scroll_position as u16, 0));

    let scrollbar = Scrollbar::new(ScrollbarOrientation::VerticalRight)
        .begin_symbol(Some("↑"))
        .end_symbol(Some("↓"));

    // Create local scrollbar state for rendering
    let mut scrollbar_state = ScrollbarState::default()
        .content_length(total_height)
        .position(app.scroll_position);

    // Render messages and scrollbar
    f.render_widget(messages, area);
    f.render_stateful_widget(
        scrollbar,
        area.inner(Margin {
            vertical: 1,
            horizontal: 0,
        }),
        &mut scrollbar_state,
    );
}

/// Render input field
fn render_input(f: &mut Frame, app: &App, area: Rect) {
    let (title, title_color) = if app.is_waiting {
        ("入力（応答待ち）", Color::DarkGray)
    } else {
        ("入力", Color::Cyan)
    };

    let input_block = Block::default().borders(Borders::ALL).title(Span::styled(
        title,
        Style::default()
            .fg(title_color)
            .add_modifier(Modifier::BOLD),
    ));

    let inner_area = input_block.inner(area);

    // Render input field
    let input_style = if app.is_waiting {
        Style::default().fg(Color::DarkGray)
    } else {
        Style::default()
    };
    let input = Paragraph::new(app.input.as_str())
        .style(input_style)
        .block(input_block);

    f.render_widget(input, area);

    // Render cursor, hidden while the field is disabled
    if !app.is_waiting {
        let prefix: String = app.input.chars().take(app.cursor_position).collect();
        let cursor_x = prefix.width() as u16;

        f.set_cursor_position((inner_area.x + cursor_x, inner_area.y));
    }
}
