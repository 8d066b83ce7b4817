use chrono::NaiveDate;
use serde::Deserialize;
use std::collections::BTreeMap;

// ---------------------------------------------------------------------------
// RawPoint / RawDataset (chart wire format)
// ---------------------------------------------------------------------------

/// One `{x, y}` point as serialized out of the chart's client-side state.
///
/// `y` is kept as a raw JSON value because the chart is not consistent about
/// emitting numbers vs. numeric strings.
#[derive(Debug, Clone, Deserialize)]
pub struct RawPoint {
    pub x: String,
    pub y: serde_json::Value,
}

/// One chart line: display label plus its point array.
#[derive(Debug, Clone, Deserialize)]
pub struct RawDataset {
    pub label: String,
    pub data: Vec<RawPoint>,
}

// ---------------------------------------------------------------------------
// PriceSeries
// ---------------------------------------------------------------------------

/// One named numeric series as a date-keyed map. Immutable once built:
/// produced per chart line by the scraper and consumed by the aligner.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceSeries {
    pub label: String,
    pub points: BTreeMap<NaiveDate, f64>,
}

impl PriceSeries {
    pub fn new(label: impl Into<String>, points: BTreeMap<NaiveDate, f64>) -> Self {
        Self {
            label: label.into(),
            points,
        }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn get(&self, date: NaiveDate) -> Option<f64> {
        self.points.get(&date).copied()
    }
}
