use chrono::{Datelike, Months, NaiveDate, NaiveDateTime, NaiveTime};

use crate::model::signal::{SignalRow, SignalSeries};
use crate::params::DashboardParams;
use crate::strategy::crossover::WindowPair;

pub const DASHBOARD_TITLE: &str = "Simple Moving Average Strategy";

/// Rows shown in the summary and recent-signal tables.
pub const DEFAULT_TABLE_ROWS: usize = 10;

/// Plot-ready series; x is unix seconds.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChartData {
    pub close: Vec<(f64, f64)>,
    pub ma_short: Vec<(f64, f64)>,
    pub ma_long: Vec<(f64, f64)>,
    pub buys: Vec<(f64, f64)>,
    pub sells: Vec<(f64, f64)>,
    pub x_bounds: [f64; 2],
    pub y_bounds: [f64; 2],
    /// "%Y-%m" labels for every month boundary from `x_bounds[0]` to
    /// `x_bounds[1]`, both ends included.
    pub month_ticks: Vec<String>,
}

impl ChartData {
    pub fn is_empty(&self) -> bool {
        self.ma_short.is_empty()
    }

    fn from_rows(rows: &[SignalRow]) -> Self {
        let (Some(first), Some(last)) = (rows.first(), rows.last()) else {
            return Self::default();
        };

        let mut chart = ChartData::default();
        for row in rows {
            let x = unix_seconds(row.timestamp());
            if let Some(close) = row.close() {
                chart.close.push((x, close));
                if row.buy {
                    chart.buys.push((x, close));
                }
                if row.sell {
                    chart.sells.push((x, close));
                }
            }
            chart.ma_short.push((x, row.ma_short));
            chart.ma_long.push((x, row.ma_long));
        }

        let first_month = month_start(first.timestamp().date());
        let end_month = month_start(last.timestamp().date())
            .checked_add_months(Months::new(1))
            .unwrap_or(first_month);
        chart.x_bounds = [
            unix_seconds(first_month.and_time(NaiveTime::MIN)),
            unix_seconds(end_month.and_time(NaiveTime::MIN)),
        ];

        let mut month = first_month;
        while month <= end_month {
            chart.month_ticks.push(month.format("%Y-%m").to_string());
            match month.checked_add_months(Months::new(1)) {
                Some(next) => month = next,
                None => break,
            }
        }

        let (lo, hi) = chart
            .close
            .iter()
            .chain(&chart.ma_short)
            .chain(&chart.ma_long)
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &(_, y)| {
                (lo.min(y), hi.max(y))
            });
        let pad = if hi - lo < f64::EPSILON {
            1.0
        } else {
            (hi - lo) * 0.02
        };
        chart.y_bounds = [lo - pad, hi + pad];
        chart
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SummaryRow {
    pub timestamp: NaiveDateTime,
    pub close: Option<f64>,
    pub ma_short: f64,
    pub ma_long: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RecentSignalRow {
    pub timestamp: NaiveDateTime,
    pub ma_short: f64,
    pub ma_long: f64,
    pub buy: u8,
    pub sell: u8,
}

/// Everything the dashboard draws for one parameter set.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewModel {
    pub title: String,
    pub chart_title: String,
    pub params: DashboardParams,
    pub chart: ChartData,
    pub summary: Vec<SummaryRow>,
    pub buy_count: usize,
    pub sell_count: usize,
    pub recent: Vec<RecentSignalRow>,
    /// Full series for the raw data table.
    pub signals: SignalSeries,
    /// Explains an empty result (reversed range, no sessions).
    pub notice: Option<String>,
}

impl ViewModel {
    pub fn from_signals(params: &DashboardParams, signals: SignalSeries, table_rows: usize) -> Self {
        let tail = signals.tail(table_rows);
        let summary = tail
            .iter()
            .map(|r| SummaryRow {
                timestamp: r.timestamp(),
                close: r.close(),
                ma_short: r.ma_short,
                ma_long: r.ma_long,
            })
            .collect();
        let recent = tail
            .iter()
            .map(|r| RecentSignalRow {
                timestamp: r.timestamp(),
                ma_short: r.ma_short,
                ma_long: r.ma_long,
                buy: u8::from(r.buy),
                sell: u8::from(r.sell),
            })
            .collect();

        Self {
            title: DASHBOARD_TITLE.to_string(),
            chart_title: format!("{} Price with Trading Signals", params.symbol),
            params: *params,
            chart: ChartData::from_rows(signals.rows()),
            summary,
            buy_count: signals.buy_count(),
            sell_count: signals.sell_count(),
            recent,
            signals,
            notice: None,
        }
    }

    pub fn empty(params: &DashboardParams) -> Self {
        let windows = WindowPair::for_frequency(params.frequency);
        Self::from_signals(params, SignalSeries::empty(windows), 0)
    }

    pub fn with_notice(mut self, notice: impl Into<String>) -> Self {
        self.notice = Some(notice.into());
        self
    }

    pub fn windows(&self) -> WindowPair {
        self.signals.windows()
    }
}

fn unix_seconds(ts: NaiveDateTime) -> f64 {
    ts.and_utc().timestamp() as f64
}

fn month_start(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::bar::PriceBar;
    use crate::model::signal::Signal;

    fn row(y: i32, m: u32, d: u32, close: f64, buy: bool) -> SignalRow {
        SignalRow {
            bar: PriceBar::from_close(
                NaiveDate::from_ymd_opt(y, m, d).unwrap().and_time(NaiveTime::MIN),
                close,
            ),
            ma_short: close,
            ma_long: close,
            signal: Signal::Flat,
            buy,
            sell: false,
        }
    }

    #[test]
    fn month_ticks_cover_whole_months() {
        let rows = vec![row(2023, 11, 20, 10.0, false), row(2024, 2, 3, 12.0, true)];
        let chart = ChartData::from_rows(&rows);
        assert_eq!(
            chart.month_ticks,
            vec!["2023-11", "2023-12", "2024-01", "2024-02", "2024-03"]
        );
        assert_eq!(chart.buys.len(), 1);
        assert!(chart.y_bounds[0] < 10.0 && chart.y_bounds[1] > 12.0);
    }

    #[test]
    fn empty_rows_give_empty_chart() {
        let chart = ChartData::from_rows(&[]);
        assert!(chart.is_empty());
        assert!(chart.month_ticks.is_empty());
    }
}
