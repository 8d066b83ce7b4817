//! Shared test fixtures for the oliva-sdk integration tests.
//!
//! Provides date/series builders and a stub [`ChartExtractor`] so the store
//! and SDK tests run without a browser.

#![allow(dead_code)]

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use chrono::NaiveDate;

use oliva_sdk::error::Result;
use oliva_sdk::models::PriceSeries;
use oliva_sdk::ChartExtractor;

pub fn day(year: i32, month: u32, dom: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, dom).unwrap()
}

pub fn series(label: &str, points: &[(NaiveDate, f64)]) -> PriceSeries {
    let map: BTreeMap<NaiveDate, f64> = points.iter().copied().collect();
    PriceSeries::new(label, map)
}

/// Three short series over early January 2023, in the shape the live chart
/// produces (shared dates, one gap per series).
pub fn sample_series_2023() -> Vec<PriceSeries> {
    vec![
        series(
            "Virgen extra",
            &[
                (day(2023, 1, 2), 5.1),
                (day(2023, 1, 3), 5.2),
                (day(2023, 1, 4), 5.3),
            ],
        ),
        series(
            "Virgen",
            &[(day(2023, 1, 2), 4.6), (day(2023, 1, 4), 4.8)],
        ),
        series(
            "Lampante",
            &[(day(2023, 1, 3), 4.1), (day(2023, 1, 4), 4.2)],
        ),
    ]
}

// ---------------------------------------------------------------------------
// StubExtractor
// ---------------------------------------------------------------------------

/// Serves canned series and counts invocations.
pub struct StubExtractor {
    series: Vec<PriceSeries>,
    calls: Arc<AtomicUsize>,
}

impl StubExtractor {
    pub fn new(series: Vec<PriceSeries>) -> Self {
        Self {
            series,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Shared handle on the call counter, for when the extractor itself is
    /// boxed away into the SDK.
    pub fn counter(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.calls)
    }
}

impl ChartExtractor for StubExtractor {
    fn extract(&self, _start: NaiveDate, _end: NaiveDate) -> Result<Vec<PriceSeries>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.series.clone())
    }
}
