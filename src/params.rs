use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;

use crate::error::AppError;

/// Symbols offered by the selector, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Ticker {
    Aapl,
    Msft,
    Googl,
    Amzn,
    Tsla,
    Fb,
    Nflx,
    Nvda,
    BrkB,
    Jpm,
}

impl Ticker {
    pub const ALL: [Ticker; 10] = [
        Ticker::Aapl,
        Ticker::Msft,
        Ticker::Googl,
        Ticker::Amzn,
        Ticker::Tsla,
        Ticker::Fb,
        Ticker::Nflx,
        Ticker::Nvda,
        Ticker::BrkB,
        Ticker::Jpm,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Ticker::Aapl => "AAPL",
            Ticker::Msft => "MSFT",
            Ticker::Googl => "GOOGL",
            Ticker::Amzn => "AMZN",
            Ticker::Tsla => "TSLA",
            Ticker::Fb => "FB",
            Ticker::Nflx => "NFLX",
            Ticker::Nvda => "NVDA",
            Ticker::BrkB => "BRK-B",
            Ticker::Jpm => "JPM",
        }
    }

    pub fn next(self) -> Self {
        step(&Self::ALL, self, 1)
    }

    pub fn prev(self) -> Self {
        step(&Self::ALL, self, -1)
    }
}

impl fmt::Display for Ticker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Ticker {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_uppercase();
        Self::ALL
            .iter()
            .copied()
            .find(|t| t.as_str() == wanted)
            .ok_or_else(|| AppError::Config(format!("unsupported symbol '{}'", s)))
    }
}

/// Resampling cadence chosen by the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Frequency {
    Yearly,
    Monthly,
    Weekly,
    Daily,
    Hourly,
    TenSecond,
}

impl Frequency {
    pub const ALL: [Frequency; 6] = [
        Frequency::Yearly,
        Frequency::Monthly,
        Frequency::Weekly,
        Frequency::Daily,
        Frequency::Hourly,
        Frequency::TenSecond,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Frequency::Yearly => "Yearly",
            Frequency::Monthly => "Monthly",
            Frequency::Weekly => "Weekly",
            Frequency::Daily => "Daily",
            Frequency::Hourly => "Hourly",
            Frequency::TenSecond => "Every 10 Seconds",
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            Frequency::Yearly => "Y",
            Frequency::Monthly => "M",
            Frequency::Weekly => "W",
            Frequency::Daily => "D",
            Frequency::Hourly => "H",
            Frequency::TenSecond => "10S",
        }
    }

    pub fn next(self) -> Self {
        step(&Self::ALL, self, 1)
    }

    pub fn prev(self) -> Self {
        step(&Self::ALL, self, -1)
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Frequency {
    type Err = AppError;

    /// Accepts either the short code ("W", "10S") or the display label ("Weekly").
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|f| f.code().eq_ignore_ascii_case(trimmed) || f.label().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| AppError::Config(format!("unsupported frequency '{}'", s)))
    }
}

fn step<T: Copy + PartialEq>(all: &[T], current: T, delta: isize) -> T {
    let len = all.len() as isize;
    let idx = all.iter().position(|v| *v == current).unwrap_or(0) as isize;
    all[(idx + delta).rem_euclid(len) as usize]
}

/// Everything one pipeline run depends on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DashboardParams {
    pub symbol: Ticker,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub frequency: Frequency,
}

impl DashboardParams {
    /// The only cross-field rule: the range must not run backwards.
    pub fn checked_range(&self) -> Result<(NaiveDate, NaiveDate), AppError> {
        if self.end_date < self.start_date {
            return Err(AppError::InvalidDateRange {
                start: self.start_date,
                end: self.end_date,
            });
        }
        Ok((self.start_date, self.end_date))
    }
}

impl Default for DashboardParams {
    fn default() -> Self {
        Self {
            symbol: Ticker::Aapl,
            start_date: NaiveDate::from_ymd_opt(2022, 1, 1).unwrap_or_default(),
            end_date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap_or_default(),
            frequency: Frequency::Yearly,
        }
    }
}
