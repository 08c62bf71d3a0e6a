//! UI rendering functions for the TUI.
//!
//! Paints the search input, the active surface (loading, results, chat,
//! error toast), and the shortcut bar using ratatui widgets. All backend
//! text goes through inert spans, never through any markup channel.

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph, Wrap},
};
use time::format_description;

use crate::controller::{DisplayState, QueryController};
use crate::models::{AnswerResponse, Sender};

use super::app::App;

/// Main rendering function for the TUI.
///
/// The active surface follows the controller's display state; the content of
/// each surface comes from what the controller last recorded into the App.
pub fn draw(frame: &mut Frame, app: &App, controller: &QueryController) {
    let size = frame.area();

    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Search input
            Constraint::Min(0),    // Active surface
            Constraint::Length(1), // Shortcut bar
        ])
        .split(size);

    render_search_input(frame, app, main_chunks[0]);
    render_surface(frame, app, controller, main_chunks[1]);
    render_shortcut_bar(frame, main_chunks[2]);

    if let Some(message) = app.error() {
        render_error_toast(frame, message, main_chunks[1]);
    }
}

/// Renders the search input panel at the top of the screen.
fn render_search_input(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title("Ask the knowledge base")
        .border_style(Style::default().fg(Color::Cyan));

    let mut content = app.input().to_string();
    content.push('█'); // Cursor indicator

    let paragraph = Paragraph::new(content).block(block);
    frame.render_widget(paragraph, area);
}

/// Renders whichever surface the display state selects.
fn render_surface(frame: &mut Frame, app: &App, controller: &QueryController, area: Rect) {
    if app.is_loading() {
        render_loading(frame, area);
        return;
    }

    match controller.state() {
        DisplayState::Loading => render_loading(frame, area),
        DisplayState::ShowingChat => render_chat(frame, controller, area),
        DisplayState::ShowingResults => match app.results() {
            Some((query, response)) => render_results(frame, app, query, response, area),
            None => render_welcome(frame, area),
        },
        DisplayState::Idle | DisplayState::Error => render_welcome(frame, area),
    }
}

/// Renders the in-flight indicator.
fn render_loading(frame: &mut Frame, area: Rect) {
    let block = Block::default().borders(Borders::ALL).title("Searching");
    let paragraph = Paragraph::new("Searching the knowledge base...")
        .block(block)
        .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(paragraph, area);
}

/// Renders the idle placeholder.
fn render_welcome(frame: &mut Frame, area: Rect) {
    let block = Block::default().borders(Borders::ALL).title("Results");
    let paragraph = Paragraph::new(
        "Type a question and press Enter.\n\n\
         Try: \"What are the EA principles?\" or \"How do we manage technical debt?\"",
    )
    .block(block)
    .style(Style::default().fg(Color::DarkGray))
    .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}

/// Renders the results surface: echoed query, answer, source tags, confidence.
fn render_results(frame: &mut Frame, app: &App, query: &str, response: &AnswerResponse, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!("Results ({})", response.source_count_label()));

    let mut text = Text::default();

    text.lines.push(Line::from(Span::styled(
        "Your Question:",
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
    )));
    text.lines.push(Line::from(query.to_string()));
    text.lines.push(Line::from(""));

    text.lines.push(Line::from(Span::styled(
        "AI Response:",
        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
    )));
    // The canned and backend answers carry markdown; render it instead of
    // showing raw asterisks. Line breaks inside the answer are preserved.
    let answer = tui_markdown::from_str(response.answer());
    text.lines.extend(answer.lines);
    text.lines.push(Line::from(""));

    text.lines.push(Line::from(Span::styled(
        "Sources:",
        Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
    )));
    text.lines.push(source_tag_line(response.sources()));
    text.lines.push(Line::from(""));

    text.lines.push(Line::from(Span::styled(
        format!("Confidence: {}%", response.confidence_percent()),
        Style::default().fg(Color::DarkGray),
    )));

    let paragraph = Paragraph::new(text)
        .block(block)
        .wrap(Wrap { trim: false })
        .scroll((app.results_scroll(), 0));
    frame.render_widget(paragraph, area);
}

/// Builds the tag-list line of source identifiers. Empty sources yield an
/// empty line, not an error.
fn source_tag_line(sources: &[String]) -> Line<'static> {
    let mut spans = Vec::new();
    for source in sources {
        spans.push(Span::styled(
            format!(" {} ", source),
            Style::default().bg(Color::DarkGray).fg(Color::White),
        ));
        spans.push(Span::raw(" "));
    }
    Line::from(spans)
}

/// Renders the chat surface: the session history, oldest first.
fn render_chat(frame: &mut Frame, controller: &QueryController, area: Rect) {
    let block = Block::default().borders(Borders::ALL).title("Chat history");

    let time_format = format_description::parse("[hour]:[minute]:[second]")
        .expect("valid time format");

    let mut text = Text::default();
    if controller.history().is_empty() {
        text.lines.push(Line::from(Span::styled(
            "No exchanges yet this session.",
            Style::default().fg(Color::DarkGray),
        )));
    }

    for entry in controller.history() {
        let sender_style = match entry.sender() {
            Sender::User => Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            Sender::Assistant => Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        };
        let stamp = entry
            .timestamp()
            .format(&time_format)
            .unwrap_or_else(|_| "??:??:??".to_string());

        text.lines.push(Line::from(vec![
            Span::styled(entry.sender().to_string(), sender_style),
            Span::styled(format!(" [{}]", stamp), Style::default().fg(Color::DarkGray)),
        ]));
        for line in entry.message().lines() {
            text.lines.push(Line::from(line.to_string()));
        }
        text.lines.push(Line::from(""));
    }

    let paragraph = Paragraph::new(text).block(block).wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}

/// Renders the transient error toast over the top-right of the surface area.
fn render_error_toast(frame: &mut Frame, message: &str, area: Rect) {
    let width = (message.len() as u16 + 4).min(area.width);
    let toast_area = Rect {
        x: area.x + area.width.saturating_sub(width),
        y: area.y,
        width,
        height: 3.min(area.height),
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .style(Style::default().bg(Color::Red).fg(Color::White));
    let paragraph = Paragraph::new(message.to_string()).block(block);
    frame.render_widget(paragraph, toast_area);
}

/// Renders the shortcut bar at the bottom of the screen.
fn render_shortcut_bar(frame: &mut Frame, area: Rect) {
    let key_style = Style::default().fg(Color::Cyan);
    let sep_style = Style::default().fg(Color::DarkGray);

    let spans = vec![
        Span::styled("Enter", key_style),
        Span::raw(": ask"),
        Span::styled(" | ", sep_style),
        Span::styled("Tab", key_style),
        Span::raw(": history"),
        Span::styled(" | ", sep_style),
        Span::styled("Ctrl+K", key_style),
        Span::raw(": clear"),
        Span::styled(" | ", sep_style),
        Span::styled("Esc", key_style),
        Span::raw(": dismiss"),
        Span::styled(" | ", sep_style),
        Span::styled("Up/Down", key_style),
        Span::raw(": scroll"),
        Span::styled(" | ", sep_style),
        Span::styled("Ctrl+C", key_style),
        Span::raw(": quit"),
    ];

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}
