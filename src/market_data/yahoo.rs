use chrono::{DateTime, NaiveDate, NaiveTime};

use crate::config::MarketDataConfig;
use crate::error::AppError;
use crate::model::bar::{PriceBar, PriceSeries};
use crate::params::Ticker;

use super::types::{ChartEnvelope, QuoteBlock};
use super::PriceSource;

/// Daily bars from the public Yahoo Finance chart endpoint.
///
/// No retry, timeout or rate limiting: a failure surfaces as an error for
/// that one pipeline run.
pub struct YahooChartClient {
    http: reqwest::Client,
    base_url: String,
    auto_adjust: bool,
}

impl YahooChartClient {
    pub fn new(base_url: &str, user_agent: &str, auto_adjust: bool) -> Result<Self, AppError> {
        let http = reqwest::Client::builder().user_agent(user_agent).build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            auto_adjust,
        })
    }

    pub fn from_config(config: &MarketDataConfig) -> Result<Self, AppError> {
        Self::new(&config.base_url, &config.user_agent, config.auto_adjust)
    }
}

impl PriceSource for YahooChartClient {
    async fn fetch_daily(
        &self,
        symbol: Ticker,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<PriceSeries, AppError> {
        if end <= start {
            return Ok(PriceSeries::default());
        }

        let url = format!("{}/v8/finance/chart/{}", self.base_url, symbol.as_str());
        let period1 = start.and_time(NaiveTime::MIN).and_utc().timestamp().to_string();
        let period2 = end.and_time(NaiveTime::MIN).and_utc().timestamp().to_string();
        tracing::info!(symbol = %symbol, %start, %end, "Fetching daily bars");

        let resp = self
            .http
            .get(&url)
            .query(&[
                ("period1", period1.as_str()),
                ("period2", period2.as_str()),
                ("interval", "1d"),
                ("events", "div,splits"),
            ])
            .send()
            .await?;
        let status = resp.status();
        let body = resp.text().await?;

        let series = match decode_chart(symbol.as_str(), &body, self.auto_adjust) {
            Ok(series) => series,
            // Non-JSON error pages carry nothing more useful than the status.
            Err(AppError::Json(_)) if !status.is_success() => {
                return Err(AppError::DataUnavailable {
                    symbol: symbol.to_string(),
                    reason: format!("HTTP {}", status),
                });
            }
            Err(e) => return Err(e),
        };
        if !status.is_success() {
            return Err(AppError::DataUnavailable {
                symbol: symbol.to_string(),
                reason: format!("HTTP {}", status),
            });
        }

        tracing::info!(symbol = %symbol, rows = series.len(), "Fetched daily bars");
        Ok(series)
    }
}

/// Decode a chart response body into a [`PriceSeries`].
///
/// The provider nests columns per ticker (`indicators.quote[0].close`); they
/// come out as the flat Open/High/Low/Close/Volume fields of [`PriceBar`].
/// Timestamps are shifted to exchange-local time and truncated to the date.
/// With `auto_adjust`, prices are scaled by adjclose/close so splits and
/// dividends do not show up as jumps.
pub fn decode_chart(symbol: &str, body: &str, auto_adjust: bool) -> Result<PriceSeries, AppError> {
    let envelope: ChartEnvelope = serde_json::from_str(body)?;
    if let Some(err) = envelope.chart.error {
        return Err(AppError::DataUnavailable {
            symbol: symbol.to_string(),
            reason: err.reason(),
        });
    }

    let Some(result) = envelope.chart.result.and_then(|r| r.into_iter().next()) else {
        return Err(AppError::DataUnavailable {
            symbol: symbol.to_string(),
            reason: "empty chart result".to_string(),
        });
    };
    if result.timestamp.is_empty() {
        return Ok(PriceSeries::default());
    }

    let rows = result.timestamp.len();
    let indicators = result
        .indicators
        .ok_or_else(|| AppError::SchemaMismatch("missing indicators".to_string()))?;
    let quote = indicators
        .quote
        .into_iter()
        .next()
        .ok_or_else(|| AppError::SchemaMismatch("missing indicators.quote".to_string()))?;
    let QuoteBlock {
        open,
        high,
        low,
        close,
        volume,
    } = quote;
    let open = column("Open", open, rows)?;
    let high = column("High", high, rows)?;
    let low = column("Low", low, rows)?;
    let close = column("Close", close, rows)?;
    let volume = column("Volume", volume, rows)?;

    let adjclose = if auto_adjust {
        indicators
            .adjclose
            .into_iter()
            .next()
            .and_then(|block| block.adjclose)
            .filter(|values| values.len() == rows)
    } else {
        None
    };

    let offset = result.meta.gmtoffset;
    let mut bars = Vec::with_capacity(rows);
    for (i, &ts) in result.timestamp.iter().enumerate() {
        let date = DateTime::from_timestamp(ts + offset, 0)
            .map(|dt| dt.date_naive())
            .ok_or_else(|| AppError::SchemaMismatch(format!("timestamp {} out of range", ts)))?;
        let mut bar = PriceBar {
            timestamp: date.and_time(NaiveTime::MIN),
            open: open[i],
            high: high[i],
            low: low[i],
            close: close[i],
            volume: volume[i],
        };
        if let Some(adj) = adjclose.as_ref().and_then(|values| values[i]) {
            adjust(&mut bar, adj);
        }
        bars.push(bar);
    }

    Ok(PriceSeries::new(bars))
}

fn column(
    name: &str,
    values: Option<Vec<Option<f64>>>,
    rows: usize,
) -> Result<Vec<Option<f64>>, AppError> {
    let values =
        values.ok_or_else(|| AppError::SchemaMismatch(format!("missing {} column", name)))?;
    if values.len() != rows {
        return Err(AppError::SchemaMismatch(format!(
            "{} column has {} values for {} timestamps",
            name,
            values.len(),
            rows
        )));
    }
    Ok(values)
}

fn adjust(bar: &mut PriceBar, adj_close: f64) {
    let Some(close) = bar.close.filter(|c| *c != 0.0) else {
        return;
    };
    let ratio = adj_close / close;
    bar.open = bar.open.map(|v| v * ratio);
    bar.high = bar.high.map(|v| v * ratio);
    bar.low = bar.low.map(|v| v * ratio);
    bar.close = Some(adj_close);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn adjust_scales_prices_but_not_volume() {
        let mut bar = PriceBar {
            timestamp: NaiveDate::from_ymd_opt(2024, 1, 2)
                .unwrap()
                .and_time(NaiveTime::MIN),
            open: Some(100.0),
            high: Some(110.0),
            low: Some(90.0),
            close: Some(100.0),
            volume: Some(1_000.0),
        };
        adjust(&mut bar, 50.0);
        assert_eq!(bar.open, Some(50.0));
        assert_eq!(bar.high, Some(55.0));
        assert_eq!(bar.low, Some(45.0));
        assert_eq!(bar.close, Some(50.0));
        assert_eq!(bar.volume, Some(1_000.0));
    }

    #[test]
    fn missing_close_is_schema_mismatch() {
        let body = r#"{"chart":{"result":[{"meta":{"gmtoffset":0},"timestamp":[1704205800],
            "indicators":{"quote":[{"open":[1.0],"high":[1.0],"low":[1.0],"volume":[10]}]}}],"error":null}}"#;
        let err = decode_chart("AAPL", body, false).unwrap_err();
        assert!(matches!(err, AppError::SchemaMismatch(ref m) if m.contains("Close")));
    }
}
