use chrono::{NaiveDate, NaiveTime};
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use ma_signal_board::error::AppError;
use ma_signal_board::market_data::yahoo::decode_chart;
use ma_signal_board::market_data::{PriceSource, YahooChartClient};
use ma_signal_board::params::Ticker;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Three sessions, 2024-01-02..04, opening 09:30 New York time.
const CHART_BODY: &str = r#"{
  "chart": {
    "result": [{
      "meta": {"symbol": "AAPL", "gmtoffset": -18000},
      "timestamp": [1704205800, 1704292200, 1704378600],
      "indicators": {
        "quote": [{
          "open":   [187.15, 184.22, null],
          "high":   [188.44, 185.88, 183.09],
          "low":    [183.89, 183.43, 180.88],
          "close":  [185.64, 184.25, 181.91],
          "volume": [82488700, 58414500, 71983600]
        }],
        "adjclose": [{"adjclose": [92.82, 92.125, 90.955]}]
      }
    }],
    "error": null
  }
}"#;

const NOT_FOUND_BODY: &str = r#"{"chart":{"result":null,"error":{"code":"Not Found","description":"No data found, symbol may be delisted"}}}"#;

#[tokio::test]
async fn fetch_daily_queries_chart_endpoint() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v8/finance/chart/AAPL"))
        .and(query_param("period1", "1704067200"))
        .and(query_param("interval", "1d"))
        .and(query_param("events", "div,splits"))
        .and(header("user-agent", "test-agent"))
        .respond_with(ResponseTemplate::new(200).set_body_string(CHART_BODY))
        .expect(1)
        .mount(&server)
        .await;

    let client = YahooChartClient::new(&server.uri(), "test-agent", false).unwrap();
    let series = client
        .fetch_daily(Ticker::Aapl, date(2024, 1, 1), date(2024, 2, 1))
        .await
        .unwrap();

    assert_eq!(series.len(), 3);
    let first = series.bars()[0];
    assert_eq!(first.timestamp, date(2024, 1, 2).and_time(NaiveTime::MIN));
    assert_eq!(first.close, Some(185.64));
    assert_eq!(first.volume, Some(82_488_700.0));
    assert_eq!(series.bars()[2].open, None);
    assert_eq!(series.bars()[2].timestamp.date(), date(2024, 1, 4));
}

#[tokio::test]
async fn unknown_symbol_is_data_unavailable() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v8/finance/chart/FB"))
        .respond_with(ResponseTemplate::new(404).set_body_string(NOT_FOUND_BODY))
        .mount(&server)
        .await;

    let client = YahooChartClient::new(&server.uri(), "test-agent", true).unwrap();
    let err = client
        .fetch_daily(Ticker::Fb, date(2024, 1, 1), date(2024, 2, 1))
        .await
        .unwrap_err();

    match err {
        AppError::DataUnavailable { symbol, reason } => {
            assert_eq!(symbol, "FB");
            assert!(reason.contains("delisted"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn non_json_error_page_reports_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503).set_body_string("<html>busy</html>"))
        .mount(&server)
        .await;

    let client = YahooChartClient::new(&server.uri(), "test-agent", true).unwrap();
    let err = client
        .fetch_daily(Ticker::Msft, date(2024, 1, 1), date(2024, 2, 1))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::DataUnavailable { ref reason, .. } if reason.contains("503")));
}

#[tokio::test]
async fn empty_range_skips_the_request() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string(CHART_BODY))
        .expect(0)
        .mount(&server)
        .await;

    let client = YahooChartClient::new(&server.uri(), "test-agent", true).unwrap();
    let series = client
        .fetch_daily(Ticker::Aapl, date(2024, 2, 1), date(2024, 1, 1))
        .await
        .unwrap();
    assert!(series.is_empty());
}

#[test]
fn decode_auto_adjusts_prices() {
    let series = decode_chart("AAPL", CHART_BODY, true).unwrap();
    let first = series.bars()[0];
    let ratio = 92.82 / 185.64;
    assert_eq!(first.close, Some(92.82));
    assert!((first.open.unwrap() - 187.15 * ratio).abs() < 1e-9);
    assert!((first.high.unwrap() - 188.44 * ratio).abs() < 1e-9);
    assert_eq!(first.volume, Some(82_488_700.0));
    // Null stays null after adjustment.
    assert_eq!(series.bars()[2].open, None);
}

#[test]
fn decode_without_timestamps_is_empty() {
    let body = r#"{"chart":{"result":[{"meta":{"gmtoffset":-18000},"indicators":{"quote":[{}]}}],"error":null}}"#;
    let series = decode_chart("AAPL", body, true).unwrap();
    assert!(series.is_empty());
}

#[test]
fn decode_rejects_ragged_columns() {
    let body = CHART_BODY.replace("[82488700, 58414500, 71983600]", "[82488700, 58414500]");
    let err = decode_chart("AAPL", &body, true).unwrap_err();
    assert!(matches!(err, AppError::SchemaMismatch(ref m) if m.contains("Volume")));
}

#[test]
fn decode_rejects_missing_result() {
    let body = r#"{"chart":{"result":[],"error":null}}"#;
    let err = decode_chart("AAPL", body, true).unwrap_err();
    assert!(matches!(err, AppError::DataUnavailable { .. }));
}
