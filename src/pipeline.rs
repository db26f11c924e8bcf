//! One dashboard run: fetch, resample, average, flag crossovers, present.
//!
//! Nothing here keeps state between runs; every parameter change calls
//! [`render`] again from scratch.

use crate::error::AppError;
use crate::market_data::PriceSource;
use crate::model::bar::PriceSeries;
use crate::params::DashboardParams;
use crate::resample::resample;
use crate::strategy::crossover::compute_signals;
use crate::view::ViewModel;

/// The pure half of the pipeline: everything after the fetch.
pub fn build_view(params: &DashboardParams, prices: &PriceSeries, table_rows: usize) -> ViewModel {
    let aggregated = resample(prices, params.frequency);
    let signals = compute_signals(&aggregated);
    ViewModel::from_signals(params, signals, table_rows)
}

/// Fetch bars for `params` from `source` and build the view.
///
/// A reversed date range or an empty fetch yields an empty view with a
/// notice; provider and schema failures are returned to the caller.
pub async fn render<S: PriceSource>(
    params: &DashboardParams,
    source: &S,
    table_rows: usize,
) -> Result<ViewModel, AppError> {
    let (start, end) = match params.checked_range() {
        Ok(range) => range,
        Err(e @ AppError::InvalidDateRange { .. }) => {
            tracing::warn!(error = %e, "Skipping fetch for reversed date range");
            return Ok(ViewModel::empty(params).with_notice(e.to_string()));
        }
        Err(e) => return Err(e),
    };

    let prices = source.fetch_daily(params.symbol, start, end).await?;
    let view = build_view(params, &prices, table_rows);
    tracing::info!(
        symbol = %params.symbol,
        frequency = params.frequency.code(),
        input_rows = prices.len(),
        signal_rows = view.signals.len(),
        buys = view.buy_count,
        sells = view.sell_count,
        "Pipeline finished"
    );

    if prices.is_empty() {
        return Ok(view.with_notice(format!(
            "no daily bars for {} between {} and {}",
            params.symbol, start, end
        )));
    }
    Ok(view)
}
