pub mod types;
pub mod yahoo;

use std::future::Future;

use chrono::NaiveDate;

use crate::error::AppError;
use crate::model::bar::PriceSeries;
use crate::params::Ticker;

pub use yahoo::YahooChartClient;

/// Anything that can hand back daily OHLCV bars for a date range.
///
/// `end` is exclusive. An empty range is an empty series, not an error.
pub trait PriceSource {
    fn fetch_daily(
        &self,
        symbol: Ticker,
        start: NaiveDate,
        end: NaiveDate,
    ) -> impl Future<Output = Result<PriceSeries, AppError>> + Send;
}
