// src/ui/widgets/summary.rs

use crate::app::{App, AppState};
use ratatui::{
    prelude::*,
    text::Line,
    widgets::{Block, Borders, Gauge, Paragraph, Wrap},
};

/// Renders the summary widget: trust score, issue counts and page info.
/// Nothing is drawn inside the frame until an analysis has finished.
pub fn render_summary(frame: &mut Frame, app: &App, area: Rect) {
    let summary_container = Block::default().borders(Borders::ALL).title("Summary");
    frame.render_widget(summary_container, area);

    let summary_chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3), // Score & rating
            Constraint::Length(1), // Gauge
            Constraint::Length(1), // Spacer
            Constraint::Length(4), // Issue counts
            Constraint::Length(1), // Spacer
            Constraint::Min(0),    // Page info
        ])
        .split(area);

    if !matches!(app.state, AppState::Finished) {
        return;
    }

    let score = app.summary.score;
    let (rating_text, rating_style) = match score {
        90..=100 => ("Trustworthy", Style::default().fg(Color::Green)),
        75..=89 => ("Probably fine", Style::default().fg(Color::Cyan)),
        50..=74 => ("Be careful", Style::default().fg(Color::Yellow)),
        _ => ("Suspicious", Style::default().fg(Color::Red)),
    };
    let score_line = Line::from(format!("{}/100 ({})", score, rating_text)).style(rating_style);
    let score_text = Text::from(vec![Line::from("Trust Score".bold()), score_line]);
    frame.render_widget(Paragraph::new(score_text).alignment(Alignment::Center), summary_chunks[0]);

    let gauge = Gauge::default()
        .percent(u16::from(score))
        .label("")
        .style(rating_style);
    frame.render_widget(gauge, summary_chunks[1]);

    let issues_block = Block::default().title("FINDINGS".bold());
    let counts = Text::from(vec![
        Line::from(vec![Span::raw("Critical: "), Span::styled(app.summary.critical.to_string(), Style::default().fg(Color::Red))]),
        Line::from(vec![Span::raw("Warnings: "), Span::styled(app.summary.warning.to_string(), Style::default().fg(Color::Yellow))]),
        Line::from(vec![Span::raw("Info: "), Span::styled(app.summary.info.to_string(), Style::default().fg(Color::Cyan))]),
    ]);
    frame.render_widget(Paragraph::new(counts).block(issues_block), summary_chunks[3]);

    let page_block = Block::default().title("PAGE".bold());
    let mut page_lines = Vec::new();
    if let Some(report) = &app.report {
        page_lines.push(Line::from(Span::styled(report.url.clone(), Style::default().fg(Color::Cyan))));
        match &report.page_info {
            Some(info) => {
                page_lines.push(Line::from(format!("Title: {}", info.title.as_deref().unwrap_or("Title not found"))));
                page_lines.push(Line::from(format!(
                    "Description: {}",
                    info.description.as_deref().unwrap_or("Description not found")
                )));
            }
            None => page_lines.push(Line::from("Page could not be fetched.")),
        }
    }
    let page_paragraph = Paragraph::new(page_lines).wrap(Wrap { trim: true }).block(page_block);
    frame.render_widget(page_paragraph, summary_chunks[5]);
}
