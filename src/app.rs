// src/app.rs

use ratatui::widgets::ListState;
use trustlens::core::knowledge_base::{summarize, ReportSummary};
use trustlens::core::models::AnalysisReport;

pub const SPINNER_CHARS: [char; 4] = ['|', '/', '-', '\\'];

pub enum AppState {
    Idle,
    Analyzing,
    Finished,
}

pub struct App {
    pub should_quit: bool,
    pub state: AppState,
    pub input: String,
    pub report: Option<AnalysisReport>,
    pub summary: ReportSummary,
    pub findings_state: ListState,
    pub input_error: Option<String>,
    pub spinner_frame: usize,
}

impl App {
    pub fn new() -> Self {
        Self {
            should_quit: false,
            state: AppState::Idle,
            input: String::new(),
            report: None,
            summary: ReportSummary::default(),
            findings_state: ListState::default(),
            input_error: None,
            spinner_frame: 0,
        }
    }

    pub fn finish(&mut self, report: AnalysisReport) {
        self.summary = summarize(&report);
        self.findings_state = ListState::default();
        if !report.findings.is_empty() {
            self.findings_state.select(Some(0));
        }
        self.report = Some(report);
        self.state = AppState::Finished;
    }

    pub fn reject(&mut self, message: String) {
        self.input_error = Some(message);
        self.state = AppState::Idle;
    }

    pub fn scroll_up(&mut self) {
        let selected = self.findings_state.selected().unwrap_or(0);
        self.findings_state.select(Some(selected.saturating_sub(1)));
    }

    pub fn scroll_down(&mut self) {
        let count = self.report.as_ref().map_or(0, |r| r.findings.len());
        if count == 0 {
            return;
        }
        let selected = self.findings_state.selected().map_or(0, |s| s.saturating_add(1));
        self.findings_state.select(Some(selected.min(count - 1)));
    }

    pub fn on_tick(&mut self) {
        if let AppState::Analyzing = self.state {
            self.spinner_frame = (self.spinner_frame + 1) % SPINNER_CHARS.len();
        }
    }

    pub fn quit(&mut self) { self.should_quit = true; }

    pub fn reset(&mut self) {
        *self = Self::new();
    }
}
