use crate::indicator::rolling::RollingMean;
use crate::model::aggregated::AggregatedSeries;
use crate::model::signal::{Signal, SignalRow, SignalSeries};
use crate::params::Frequency;

/// Short and long moving-average windows, counted in grid rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowPair {
    pub short: usize,
    pub long: usize,
}

impl WindowPair {
    pub const STANDARD: WindowPair = WindowPair { short: 20, long: 50 };

    /// Both windows of one row: each average is just Close.
    pub const PASS_THROUGH: WindowPair = WindowPair { short: 1, long: 1 };

    /// Window table keyed by resampling frequency.
    ///
    /// Hourly keeps 20/50 (read as hours). "Every 10 Seconds" collapses to
    /// [`WindowPair::PASS_THROUGH`]; both averages then equal Close on every
    /// row and no crossover can ever fire.
    pub fn for_frequency(frequency: Frequency) -> Self {
        match frequency {
            Frequency::Yearly | Frequency::Monthly | Frequency::Weekly | Frequency::Daily => {
                Self::STANDARD
            }
            Frequency::Hourly => Self::STANDARD,
            Frequency::TenSecond => Self::PASS_THROUGH,
        }
    }

    pub fn is_pass_through(&self) -> bool {
        self.short == 1 && self.long == 1
    }
}

/// Averages and crossover flags for `series`, windows chosen by its frequency.
pub fn compute_signals(series: &AggregatedSeries) -> SignalSeries {
    compute_signals_with(series, WindowPair::for_frequency(series.frequency()))
}

/// Rolls both means over the dense grid (empty buckets included), drops
/// rows where either mean is undefined, then flags crossovers against the
/// previous surviving row.
///
/// Buy needs `prev short < prev long` and `short > long`; Sell is the mirror.
/// Both tests are strict, so touching equality is not a cross.
pub fn compute_signals_with(series: &AggregatedSeries, windows: WindowPair) -> SignalSeries {
    let mut short = RollingMean::new(windows.short);
    let mut long = RollingMean::new(windows.long);
    let mut prev: Option<(f64, f64)> = None;
    let mut rows = Vec::with_capacity(series.buckets().len());
    let mut dropped = 0usize;

    for bar in series.rows() {
        let ma_short = short.push(bar.close);
        let ma_long = long.push(bar.close);
        let (Some(s), Some(l)) = (ma_short, ma_long) else {
            dropped += 1;
            continue;
        };

        let (buy, sell) = match prev {
            Some((ps, pl)) => (ps < pl && s > l, ps > pl && s < l),
            None => (false, false),
        };
        rows.push(SignalRow {
            bar,
            ma_short: s,
            ma_long: l,
            signal: Signal::from_averages(s, l),
            buy,
            sell,
        });
        prev = Some((s, l));
    }

    let out = SignalSeries::new(windows, rows);
    tracing::debug!(
        frequency = series.frequency().code(),
        short_window = windows.short,
        long_window = windows.long,
        rows = out.len(),
        dropped,
        buys = out.buy_count(),
        sells = out.sell_count(),
        "Computed crossover signals"
    );
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::bar::PriceBar;
    use chrono::{Duration, NaiveDate};

    fn daily(closes: &[f64]) -> AggregatedSeries {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        let bars = closes
            .iter()
            .enumerate()
            .map(|(i, &c)| PriceBar::from_close(start + Duration::days(i as i64), c))
            .collect();
        AggregatedSeries::new(Frequency::Daily, bars)
    }

    #[test]
    fn first_row_never_signals() {
        let out = compute_signals_with(&daily(&[5.0, 1.0]), WindowPair { short: 1, long: 2 });
        assert!(!out.rows()[0].buy && !out.rows()[0].sell);
    }

    #[test]
    fn tri_state_signal_follows_average_order() {
        // short=1 tracks Close, long=2 lags it
        let out = compute_signals_with(
            &daily(&[10.0, 12.0, 8.0, 8.0]),
            WindowPair { short: 1, long: 2 },
        );
        let signals: Vec<_> = out.rows().iter().map(|r| r.signal.value()).collect();
        assert_eq!(signals, vec![0, 1, -1, 0]);
    }
}
