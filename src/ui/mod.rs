pub mod chart;
pub mod dashboard;

use chrono::{Months, NaiveDate};
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::Frame;

use crate::error::AppError;
use crate::input::FormCommand;
use crate::params::DashboardParams;
use crate::view::{ViewModel, DASHBOARD_TITLE};

use chart::SignalChart;
use dashboard::{
    KeybindBar, MessageLine, ParamsBar, RawDataPanel, RecentSignalsPanel, StatusBar, SummaryPanel,
};

/// Parameter the Up/Down keys currently edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamField {
    Symbol,
    StartDate,
    EndDate,
    Frequency,
}

impl ParamField {
    const ORDER: [ParamField; 4] = [
        ParamField::Symbol,
        ParamField::StartDate,
        ParamField::EndDate,
        ParamField::Frequency,
    ];

    fn offset(self, delta: isize) -> Self {
        let idx = Self::ORDER.iter().position(|f| *f == self).unwrap_or(0) as isize;
        Self::ORDER[(idx + delta).rem_euclid(Self::ORDER.len() as isize) as usize]
    }
}

pub struct AppState {
    pub params: DashboardParams,
    pub focus: ParamField,
    pub view: Option<ViewModel>,
    pub loading: bool,
    pub last_error: Option<String>,
    pub raw_scroll: usize,
    pub table_rows: usize,
}

impl AppState {
    pub fn new(params: DashboardParams, table_rows: usize) -> Self {
        Self {
            params,
            focus: ParamField::Symbol,
            view: None,
            loading: false,
            last_error: None,
            raw_scroll: 0,
            table_rows,
        }
    }

    /// Apply a form edit. Returns `true` when the parameters changed and the
    /// pipeline has to run again.
    pub fn apply(&mut self, cmd: FormCommand) -> bool {
        let before = self.params;
        match cmd {
            FormCommand::NextField => self.focus = self.focus.offset(1),
            FormCommand::PrevField => self.focus = self.focus.offset(-1),
            FormCommand::StepUp => self.step(1),
            FormCommand::StepDown => self.step(-1),
            FormCommand::PageUp => self.step_month(true),
            FormCommand::PageDown => self.step_month(false),
            FormCommand::ScrollRawUp => self.raw_scroll = self.raw_scroll.saturating_sub(1),
            FormCommand::ScrollRawDown => {
                let len = self.view.as_ref().map_or(0, |v| v.signals.len());
                self.raw_scroll = (self.raw_scroll + 1).min(len.saturating_sub(1));
            }
            FormCommand::Rerun | FormCommand::Quit => {}
        }
        self.params != before
    }

    fn step(&mut self, delta: i8) {
        let p = &mut self.params;
        match self.focus {
            ParamField::Symbol => {
                p.symbol = if delta > 0 { p.symbol.next() } else { p.symbol.prev() }
            }
            ParamField::StartDate => p.start_date = shift_day(p.start_date, delta),
            ParamField::EndDate => p.end_date = shift_day(p.end_date, delta),
            ParamField::Frequency => {
                p.frequency = if delta > 0 {
                    p.frequency.next()
                } else {
                    p.frequency.prev()
                }
            }
        }
    }

    fn step_month(&mut self, forward: bool) {
        let p = &mut self.params;
        match self.focus {
            ParamField::StartDate => p.start_date = shift_month(p.start_date, forward),
            ParamField::EndDate => p.end_date = shift_month(p.end_date, forward),
            ParamField::Symbol | ParamField::Frequency => {}
        }
    }

    pub fn begin_run(&mut self) {
        self.loading = true;
    }

    pub fn finish_run(&mut self, result: Result<ViewModel, AppError>) {
        self.loading = false;
        match result {
            Ok(view) => {
                self.raw_scroll = 0;
                self.last_error = None;
                self.view = Some(view);
            }
            Err(e) => {
                self.last_error = Some(e.to_string());
                self.view = None;
            }
        }
    }
}

fn shift_day(date: NaiveDate, delta: i8) -> NaiveDate {
    let shifted = if delta > 0 {
        date.succ_opt()
    } else {
        date.pred_opt()
    };
    shifted.unwrap_or(date)
}

fn shift_month(date: NaiveDate, forward: bool) -> NaiveDate {
    let shifted = if forward {
        date.checked_add_months(Months::new(1))
    } else {
        date.checked_sub_months(Months::new(1))
    };
    shifted.unwrap_or(date)
}

pub fn render(frame: &mut Frame, state: &AppState) {
    let table_height = u16::try_from(state.table_rows)
        .unwrap_or(u16::MAX)
        .saturating_add(3);
    let outer = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),            // status bar
            Constraint::Length(3),            // parameters
            Constraint::Min(10),              // chart + summary
            Constraint::Length(table_height), // recent signals + raw data
            Constraint::Length(1),            // message line
            Constraint::Length(1),            // keybinds
        ])
        .split(frame.area());

    let title = state
        .view
        .as_ref()
        .map_or(DASHBOARD_TITLE, |v| v.title.as_str());
    frame.render_widget(
        StatusBar {
            title,
            params: &state.params,
            loading: state.loading,
            rows: state.view.as_ref().map_or(0, |v| v.signals.len()),
        },
        outer[0],
    );

    frame.render_widget(ParamsBar::new(&state.params, state.focus), outer[1]);

    let main_area = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(40), Constraint::Length(50)])
        .split(outer[2]);
    let bottom_area = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(50), Constraint::Min(40)])
        .split(outer[3]);

    match state.view.as_ref() {
        Some(view) => {
            frame.render_widget(SignalChart::new(&view.chart, &view.chart_title), main_area[0]);
            frame.render_widget(
                SummaryPanel::new(&view.summary, view.buy_count, view.sell_count),
                main_area[1],
            );
            frame.render_widget(RecentSignalsPanel::new(&view.recent), bottom_area[0]);
            frame.render_widget(
                RawDataPanel::new(view.signals.rows(), state.raw_scroll),
                bottom_area[1],
            );
        }
        None => {
            let empty = crate::view::ChartData::default();
            let chart_title = format!("{} Price with Trading Signals", state.params.symbol);
            frame.render_widget(SignalChart::new(&empty, &chart_title), main_area[0]);
            frame.render_widget(SummaryPanel::new(&[], 0, 0), main_area[1]);
            frame.render_widget(RecentSignalsPanel::new(&[]), bottom_area[0]);
            frame.render_widget(RawDataPanel::new(&[], 0), bottom_area[1]);
        }
    }

    frame.render_widget(
        MessageLine {
            error: state.last_error.as_deref(),
            notice: state.view.as_ref().and_then(|v| v.notice.as_deref()),
        },
        outer[4],
    );
    frame.render_widget(KeybindBar, outer[5]);
}
