//! Series alignment: three date-keyed chart lines in, one table out.
//!
//! The union of all dates across the input series defines the row set. A
//! series with no value on a given date gets an explicit absent cell, never
//! zero and never a dropped row.

use std::collections::{BTreeMap, BTreeSet};

use serde_json::Value;

use crate::config;
use crate::error::{OlivaError, Result};
use crate::models::{parse_day, DateCell, PriceRow, PriceSeries, PriceTable, RawPoint};

/// Turn one raw chart line into a `PriceSeries`.
///
/// Null `y` values are gaps the chart itself encodes and are skipped; any
/// other unparseable date or price is a `Parse` error.
pub fn parse_series(label: &str, points: &[RawPoint]) -> Result<PriceSeries> {
    let mut map = BTreeMap::new();
    for point in points {
        let date = parse_day(&point.x).ok_or_else(|| {
            OlivaError::Parse(format!("malformed date {:?} in series {label:?}", point.x))
        })?;
        if let Some(price) = parse_price(&point.y, label)? {
            map.insert(date, price);
        }
    }
    Ok(PriceSeries::new(label, map))
}

/// The chart emits prices as numbers, numeric strings (sometimes with a
/// Spanish decimal comma), or null for gaps.
fn parse_price(value: &Value, label: &str) -> Result<Option<f64>> {
    match value {
        Value::Null => Ok(None),
        Value::Number(n) => n
            .as_f64()
            .map(Some)
            .ok_or_else(|| OlivaError::Parse(format!("non-finite price in series {label:?}"))),
        Value::String(s) => s
            .trim()
            .replace(',', ".")
            .parse::<f64>()
            .map(Some)
            .map_err(|_| {
                OlivaError::Parse(format!("malformed price {s:?} in series {label:?}"))
            }),
        other => Err(OlivaError::Parse(format!(
            "unexpected price value {other} in series {label:?}"
        ))),
    }
}

/// Align named series on the union of their dates, chronologically.
///
/// The resulting row set and values are independent of input order; only the
/// column order follows it. Columns are named by prefixing each series label.
pub fn align(series: &[PriceSeries]) -> PriceTable {
    let mut dates = BTreeSet::new();
    for s in series {
        dates.extend(s.points.keys().copied());
    }

    let columns = series
        .iter()
        .map(|s| format!("{}{}", config::COLUMN_PREFIX, s.label))
        .collect();

    let mut table = PriceTable::new(columns);
    for date in dates {
        table.rows.push(PriceRow {
            date: DateCell::Day(date),
            prices: series.iter().map(|s| s.get(date)).collect(),
        });
    }
    table
}
