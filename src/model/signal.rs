use chrono::NaiveDateTime;

use crate::model::bar::PriceBar;
use crate::strategy::crossover::WindowPair;

/// Relative order of the two moving averages on a single row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    /// Short average above long average.
    Long,
    /// Short average below long average.
    Short,
    Flat,
}

impl Signal {
    pub fn from_averages(ma_short: f64, ma_long: f64) -> Self {
        if ma_short > ma_long {
            Signal::Long
        } else if ma_short < ma_long {
            Signal::Short
        } else {
            Signal::Flat
        }
    }

    pub fn value(self) -> i8 {
        match self {
            Signal::Long => 1,
            Signal::Short => -1,
            Signal::Flat => 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SignalRow {
    pub bar: PriceBar,
    pub ma_short: f64,
    pub ma_long: f64,
    pub signal: Signal,
    pub buy: bool,
    pub sell: bool,
}

impl SignalRow {
    pub fn timestamp(&self) -> NaiveDateTime {
        self.bar.timestamp
    }

    pub fn close(&self) -> Option<f64> {
        self.bar.close
    }
}

/// Aggregated rows that carry both averages, plus their crossover flags.
#[derive(Debug, Clone, PartialEq)]
pub struct SignalSeries {
    windows: WindowPair,
    rows: Vec<SignalRow>,
}

impl SignalSeries {
    pub fn new(windows: WindowPair, rows: Vec<SignalRow>) -> Self {
        Self { windows, rows }
    }

    pub fn empty(windows: WindowPair) -> Self {
        Self::new(windows, Vec::new())
    }

    pub fn windows(&self) -> WindowPair {
        self.windows
    }

    pub fn rows(&self) -> &[SignalRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn buy_count(&self) -> usize {
        self.rows.iter().filter(|r| r.buy).count()
    }

    pub fn sell_count(&self) -> usize {
        self.rows.iter().filter(|r| r.sell).count()
    }

    /// Last `n` rows, or all of them when shorter.
    pub fn tail(&self, n: usize) -> &[SignalRow] {
        &self.rows[self.rows.len().saturating_sub(n)..]
    }
}
