use chrono::NaiveDateTime;

use crate::model::bar::PriceBar;
use crate::params::Frequency;
use crate::resample::next_label;

/// Per-bucket means on a regular grid.
///
/// Only populated buckets are stored. The grid runs from the first to the
/// last stored bucket and [`AggregatedSeries::rows`] walks it lazily, yielding
/// an all-empty row for every gap, so an "Every 10 Seconds" grid spanning
/// years of daily bars costs no memory beyond the populated buckets.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregatedSeries {
    frequency: Frequency,
    buckets: Vec<PriceBar>,
}

impl AggregatedSeries {
    /// `buckets` must be strictly increasing and each timestamp must be a
    /// bucket label for `frequency`.
    pub fn new(frequency: Frequency, buckets: Vec<PriceBar>) -> Self {
        debug_assert!(
            buckets.windows(2).all(|w| w[0].timestamp < w[1].timestamp),
            "aggregated buckets must be strictly increasing"
        );
        Self { frequency, buckets }
    }

    pub fn frequency(&self) -> Frequency {
        self.frequency
    }

    /// Populated buckets only.
    pub fn buckets(&self) -> &[PriceBar] {
        &self.buckets
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Every grid row between the first and last populated bucket.
    pub fn rows(&self) -> DenseRows<'_> {
        DenseRows {
            frequency: self.frequency,
            buckets: &self.buckets,
            next_bucket: 0,
            cursor: self.buckets.first().map(|b| b.timestamp),
        }
    }
}

pub struct DenseRows<'a> {
    frequency: Frequency,
    buckets: &'a [PriceBar],
    next_bucket: usize,
    cursor: Option<NaiveDateTime>,
}

impl Iterator for DenseRows<'_> {
    type Item = PriceBar;

    fn next(&mut self) -> Option<PriceBar> {
        let label = self.cursor?;
        let row = match self.buckets.get(self.next_bucket) {
            Some(bucket) if bucket.timestamp <= label => {
                self.next_bucket += 1;
                *bucket
            }
            _ => PriceBar::empty(label),
        };
        self.cursor = match self.buckets.get(self.next_bucket) {
            Some(_) => Some(next_label(self.frequency, row.timestamp)),
            None => None,
        };
        Some(row)
    }
}
