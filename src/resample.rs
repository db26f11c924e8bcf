use chrono::{Datelike, Duration, Months, NaiveDate, NaiveDateTime, NaiveTime, Timelike};

use crate::model::aggregated::AggregatedSeries;
use crate::model::bar::{PriceBar, PriceSeries};
use crate::params::Frequency;

/// Label of the bucket containing `ts`.
///
/// Calendar buckets are labelled by their last day (Dec 31, month end, the
/// Sunday closing a Monday..Sunday week); intraday buckets by their start.
pub fn bucket_label(frequency: Frequency, ts: NaiveDateTime) -> NaiveDateTime {
    let date = ts.date();
    match frequency {
        Frequency::Yearly => midnight(year_end(date)),
        Frequency::Monthly => midnight(month_end(date)),
        Frequency::Weekly => {
            let to_sunday = 6 - i64::from(date.weekday().num_days_from_monday());
            midnight(date + Duration::days(to_sunday))
        }
        Frequency::Daily => midnight(date),
        Frequency::Hourly => date.and_hms_opt(ts.hour(), 0, 0).unwrap_or(ts),
        Frequency::TenSecond => {
            let sec = ts.second() - ts.second() % 10;
            date.and_hms_opt(ts.hour(), ts.minute(), sec).unwrap_or(ts)
        }
    }
}

/// Label of the bucket following `label` on the grid.
pub fn next_label(frequency: Frequency, label: NaiveDateTime) -> NaiveDateTime {
    match frequency {
        Frequency::Yearly => {
            let next = NaiveDate::from_ymd_opt(label.year() + 1, 12, 31).unwrap_or(NaiveDate::MAX);
            midnight(next)
        }
        Frequency::Monthly => midnight(month_end(label.date() + Duration::days(1))),
        Frequency::Weekly => label + Duration::days(7),
        Frequency::Daily => label + Duration::days(1),
        Frequency::Hourly => label + Duration::hours(1),
        Frequency::TenSecond => label + Duration::seconds(10),
    }
}

/// Group `series` into buckets of `frequency`, averaging every column.
///
/// Undefined values are skipped by the mean; a column with no defined value
/// in a bucket stays undefined. Gaps between buckets are left implicit (see
/// [`AggregatedSeries::rows`]).
pub fn resample(series: &PriceSeries, frequency: Frequency) -> AggregatedSeries {
    let mut buckets: Vec<PriceBar> = Vec::new();
    let mut current: Option<(NaiveDateTime, BucketMeans)> = None;

    for bar in series.bars() {
        let label = bucket_label(frequency, bar.timestamp);
        if let Some((current_label, means)) = current.as_mut() {
            if *current_label == label {
                means.add(bar);
                continue;
            }
        }
        if let Some((done_label, means)) = current.take() {
            buckets.push(means.finish(done_label));
        }
        let mut means = BucketMeans::default();
        means.add(bar);
        current = Some((label, means));
    }
    if let Some((done_label, means)) = current.take() {
        buckets.push(means.finish(done_label));
    }

    tracing::debug!(
        frequency = frequency.code(),
        input_rows = series.len(),
        buckets = buckets.len(),
        "Resampled price series"
    );
    AggregatedSeries::new(frequency, buckets)
}

fn midnight(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::MIN)
}

fn year_end(date: NaiveDate) -> NaiveDate {
    NaiveDate::from_ymd_opt(date.year(), 12, 31).unwrap_or(date)
}

fn month_end(date: NaiveDate) -> NaiveDate {
    let first = date - Duration::days(i64::from(date.day0()));
    first
        .checked_add_months(Months::new(1))
        .and_then(|next_first| next_first.pred_opt())
        .unwrap_or(date)
}

#[derive(Debug, Default, Clone, Copy)]
struct Mean {
    sum: f64,
    count: u32,
}

impl Mean {
    fn add(&mut self, value: Option<f64>) {
        if let Some(v) = value {
            self.sum += v;
            self.count += 1;
        }
    }

    fn value(&self) -> Option<f64> {
        (self.count > 0).then(|| self.sum / f64::from(self.count))
    }
}

#[derive(Debug, Default)]
struct BucketMeans {
    open: Mean,
    high: Mean,
    low: Mean,
    close: Mean,
    volume: Mean,
}

impl BucketMeans {
    fn add(&mut self, bar: &PriceBar) {
        self.open.add(bar.open);
        self.high.add(bar.high);
        self.low.add(bar.low);
        self.close.add(bar.close);
        self.volume.add(bar.volume);
    }

    fn finish(&self, label: NaiveDateTime) -> PriceBar {
        PriceBar {
            timestamp: label,
            open: self.open.value(),
            high: self.high.value(),
            low: self.low.value(),
            close: self.close.value(),
            volume: self.volume.value(),
        }
    }
}
