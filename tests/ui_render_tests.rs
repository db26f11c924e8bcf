use chrono::{Duration, NaiveDate, NaiveTime};
use ratatui::backend::TestBackend;
use ratatui::Terminal;

use ma_signal_board::error::AppError;
use ma_signal_board::model::bar::{PriceBar, PriceSeries};
use ma_signal_board::params::{DashboardParams, Frequency, Ticker};
use ma_signal_board::pipeline::build_view;
use ma_signal_board::ui::{self, AppState};
use ma_signal_board::view::ViewModel;

fn buffer_text(terminal: &Terminal<TestBackend>) -> String {
    let buf = terminal.backend().buffer();
    let area = buf.area;
    let mut out = String::new();
    for y in 0..area.height {
        for x in 0..area.width {
            out.push_str(buf[(x, y)].symbol());
        }
        out.push('\n');
    }
    out
}

fn draw(state: &AppState) -> String {
    let backend = TestBackend::new(160, 48);
    let mut terminal = Terminal::new(backend).expect("test terminal");
    terminal
        .draw(|frame| ui::render(frame, state))
        .expect("render should succeed");
    buffer_text(&terminal)
}

fn daily_params() -> DashboardParams {
    DashboardParams {
        symbol: Ticker::Nvda,
        start_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        end_date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
        frequency: Frequency::Daily,
    }
}

fn fall_rise_fall() -> PriceSeries {
    let start = NaiveDate::from_ymd_opt(2024, 1, 1)
        .unwrap()
        .and_time(NaiveTime::MIN);
    PriceSeries::new(
        (0..100)
            .map(|i| {
                let close = if i < 30 {
                    200.0 - i as f64
                } else if i < 70 {
                    171.0 + (i - 29) as f64
                } else {
                    211.0 - (i - 69) as f64
                };
                PriceBar::from_close(start + Duration::days(i), close)
            })
            .collect(),
    )
}

#[test]
/// A finished run shows the chart title, signal totals and every table.
fn render_full_dashboard() {
    let params = daily_params();
    let mut state = AppState::new(params, 10);
    state.finish_run(Ok(build_view(&params, &fall_rise_fall(), 10)));

    let text = draw(&state);
    assert!(text.contains("Simple Moving Average Strategy"));
    assert!(text.contains("NVDA Price with Trading Signals"));
    assert!(text.contains("Total Buy signals: 1"));
    assert!(text.contains("Total Sell signals: 1"));
    assert!(text.contains("Recent Signals"));
    assert!(text.contains("Raw Data (1-"));
    assert!(text.contains("of 100)"));
    assert!(text.contains("2024-04-09"));
    assert!(text.contains("Daily"));
}

#[test]
/// The notice of an empty run is shown instead of a blank screen.
fn render_notice_for_empty_view() {
    let mut params = daily_params();
    params.end_date = NaiveDate::from_ymd_opt(2023, 1, 1).unwrap();
    let mut state = AppState::new(params, 10);
    state.finish_run(Ok(
        ViewModel::empty(&params).with_notice("invalid date range: end 2023-01-01 is before start 2024-01-01"),
    ));

    let text = draw(&state);
    assert!(text.contains("No data for the selected range"));
    assert!(text.contains("invalid date range"));
    assert!(text.contains("Total Buy signals: 0"));
}

#[test]
/// Pipeline errors land on the message line.
fn render_error_line() {
    let mut state = AppState::new(daily_params(), 10);
    state.finish_run(Err(AppError::DataUnavailable {
        symbol: "NVDA".to_string(),
        reason: "HTTP 404 Not Found".to_string(),
    }));

    let text = draw(&state);
    assert!(text.contains("ERROR"));
    assert!(text.contains("NVDA Price with Trading Signals"));
    assert!(text.contains("no data for NVDA: HTTP 404 Not Found"));
}

#[test]
fn render_loading_state() {
    let mut state = AppState::new(daily_params(), 10);
    state.begin_run();
    let text = draw(&state);
    assert!(text.contains("LOADING"));
}

#[test]
/// An oversized table height from config still lays out.
fn render_with_huge_table_rows() {
    let params = daily_params();
    let mut state = AppState::new(params, usize::MAX);
    state.finish_run(Ok(build_view(&params, &fall_rise_fall(), 10)));
    let text = draw(&state);
    assert!(text.contains("Recent Signals"));
}
