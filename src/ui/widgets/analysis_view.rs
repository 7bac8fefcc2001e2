// src/ui/widgets/analysis_view.rs

use crate::app::{App, AppState, SPINNER_CHARS};
use ratatui::{
    prelude::*,
    text::Line,
    widgets::{Block, Borders, List, ListItem, Paragraph, Wrap},
};
use trustlens::core::knowledge_base::{self, FindingGroup};
use trustlens::core::models::{Finding, FindingDetail, Severity};

pub fn render_analysis_view(frame: &mut Frame, app: &mut App, area: Rect) {
    let main_block = Block::default()
        .borders(Borders::ALL)
        .title("Findings (Navigate with ↑ ↓)");

    if !matches!(app.state, AppState::Finished) {
        let content = match app.state {
            AppState::Idle => Paragraph::new("Enter a website URL and press Enter.")
                .alignment(Alignment::Center),
            AppState::Analyzing => {
                let spinner_char = SPINNER_CHARS[app.spinner_frame];
                Paragraph::new(Line::from(vec![
                    Span::styled(format!("{} ", spinner_char), Style::default().fg(Color::Cyan)),
                    Span::raw("Analyzing... Please wait."),
                ]))
                .alignment(Alignment::Center)
            }
            AppState::Finished => Paragraph::new(""),
        };
        frame.render_widget(content.block(main_block), area);
        return;
    }

    let inner_area = main_block.inner(area);
    frame.render_widget(main_block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(45), Constraint::Min(0)])
        .split(inner_area);

    let findings: &[Finding] = app.report.as_ref().map_or(&[], |r| r.findings.as_slice());

    let items: Vec<ListItem> = findings
        .iter()
        .map(|f| {
            let (group, severity, title) = match knowledge_base::get_category_detail(f.category) {
                Some(detail) => (detail.group, detail.severity, detail.title),
                None => (FindingGroup::Analysis, Severity::Info, "Unknown Finding"),
            };
            ListItem::new(Line::from(vec![
                Span::styled(format!("[{}] ", group), Style::default().fg(Color::DarkGray)),
                Span::styled(title, severity_style(severity)),
            ]))
        })
        .collect();

    if items.is_empty() {
        let clean = Paragraph::new("✓ No findings were reported for this page.")
            .style(Style::default().fg(Color::Green))
            .alignment(Alignment::Center);
        frame.render_widget(clean, chunks[0]);
        return;
    }

    let findings_list = List::new(items)
        .highlight_style(Style::new().bg(Color::DarkGray).add_modifier(Modifier::BOLD));
    frame.render_stateful_widget(findings_list, chunks[0], &mut app.findings_state);

    let detail_block = Block::default().borders(Borders::TOP).title("Details");
    let selected = app.findings_state.selected().and_then(|i| findings.get(i));
    let text = match selected {
        Some(finding) => detail_lines(finding),
        None => vec![Line::from("Select a finding above to see details.")],
    };
    let p = Paragraph::new(text).wrap(Wrap { trim: true }).block(detail_block);
    frame.render_widget(p, chunks[1]);
}

fn severity_style(severity: Severity) -> Style {
    match severity {
        Severity::Critical => Style::default().fg(Color::Red),
        Severity::Warning => Style::default().fg(Color::Yellow),
        Severity::Info => Style::default().fg(Color::Cyan),
    }
}

fn detail_lines(finding: &Finding) -> Vec<Line<'static>> {
    let mut lines = vec![Line::from(""), Line::from(finding.message.clone())];

    if let Some(detail) = &finding.detail {
        lines.push(Line::from(""));
        match detail {
            FindingDetail::Url { url } => lines.push(Line::from(format!("First match: {url}"))),
            FindingDetail::Discount { original, current, percent } => lines.push(Line::from(format!(
                "Original {original:.2}, now {current:.2} ({percent:.1}% off)"
            ))),
            FindingDetail::Form { action } => lines.push(Line::from(format!("Form action: {action}"))),
            FindingDetail::Status { code } => lines.push(Line::from(format!("HTTP status: {code}"))),
            FindingDetail::Certificate(cert) => {
                lines.push(Line::from(format!("Issuer: {}", cert.issuer)));
                lines.push(Line::from(format!("Subject: {}", cert.subject)));
                lines.push(Line::from(format!("Expires: {}", cert.expiration_label())));
            }
        }
    }

    if let Some(kb) = knowledge_base::get_category_detail(finding.category) {
        lines.push(Line::from(""));
        lines.push(Line::from("WHAT IT MEANS:".yellow().bold()));
        lines.push(Line::from(kb.description));
        lines.push(Line::from(""));
        lines.push(Line::from("WHAT TO DO:".yellow().bold()));
        lines.push(Line::from(kb.advice));
    }
    lines
}
