use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, Paragraph, Tabs};
use ratatui::Frame;

use crate::app::{App, Tab};

pub fn draw(frame: &mut Frame, app: &App) {
    let [tabs_area, main_area] =
        Layout::vertical([Constraint::Length(3), Constraint::Fill(1)]).areas(frame.area());

    draw_tabs(frame, app, tabs_area);

    match app.tab {
        Tab::Call => draw_call(frame, app, main_area),
        Tab::Logs => draw_logs(frame, app, main_area),
    }
}

fn draw_tabs(frame: &mut Frame, app: &App, area: Rect) {
    let titles = vec!["1:Call", "2:Logs"];
    let selected = match app.tab {
        Tab::Call => 0,
        Tab::Logs => 1,
    };
    let tabs = Tabs::new(titles)
        .block(Block::default().borders(Borders::ALL).title("glosscast"))
        .select(selected)
        .highlight_style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD));
    frame.render_widget(tabs, area);
}

fn draw_call(frame: &mut Frame, app: &App, area: Rect) {
    let [speech_area, sign_area] =
        Layout::vertical([Constraint::Length(4), Constraint::Fill(1)]).areas(area);

    draw_speech(frame, app, speech_area);
    draw_sign_panel(frame, app, sign_area);
}

fn draw_speech(frame: &mut Frame, app: &App, area: Rect) {
    let mic = if app.state.listening {
        Span::styled(
            "LISTENING",
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        )
    } else {
        Span::styled("idle", Style::default().fg(Color::DarkGray))
    };
    let transcript = app
        .state
        .transcript
        .as_deref()
        .unwrap_or("(nothing captured yet)");

    let lines = vec![
        Line::from(vec![Span::raw("Mic: "), mic]),
        Line::from(format!("Transcript: {}", transcript)),
    ];
    let block = Block::default()
        .borders(Borders::ALL)
        .title("Speech (l=start/stop listening)");
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn draw_sign_panel(frame: &mut Frame, app: &App, area: Rect) {
    let mut lines: Vec<Line> = Vec::new();

    if app.state.translating {
        lines.push(Line::from(Span::styled(
            "Translating...",
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        )));
    }
    if let Some(url) = &app.state.pose_url {
        lines.push(Line::from(vec![
            Span::styled("Pose animation  ", Style::default().fg(Color::Cyan)),
            Span::raw(url.as_str()),
        ]));
    }
    if let Some(url) = &app.state.sign_url {
        lines.push(Line::from(vec![
            Span::styled("Sign animation  ", Style::default().fg(Color::Cyan)),
            Span::raw(url.as_str()),
        ]));
    }
    if !app.state.skipped.is_empty() {
        lines.push(Line::from(format!(
            "Skipped words: {}",
            app.state.skipped.join(", ")
        )));
    }
    if lines.is_empty() {
        lines.push(Line::from(Span::styled(
            "No translation yet",
            Style::default().fg(Color::DarkGray),
        )));
    }

    let block = Block::default().borders(Borders::ALL).title("Sign Video");
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn draw_logs(frame: &mut Frame, app: &App, area: Rect) {
    let logs = app.logs.lock().unwrap();
    let total = logs.len();

    let visible_height = area.height.saturating_sub(2) as usize; // account for borders
    let scroll = app.log_scroll.min(total.saturating_sub(visible_height));
    let end = total.saturating_sub(scroll);
    let start = end.saturating_sub(visible_height);

    let items: Vec<ListItem> = logs
        .iter()
        .skip(start)
        .take(end - start)
        .map(|s| ListItem::new(s.as_str()))
        .collect();

    let title = if app.log_auto_scroll {
        "Logs (auto-scroll)"
    } else {
        "Logs (Up/Down=scroll, G=bottom)"
    };
    let list = List::new(items).block(Block::default().borders(Borders::ALL).title(title));
    frame.render_widget(list, area);
}
