//! Aligner tests: union semantics, ordering, absent markers, parse failures.

mod common;

use std::collections::HashMap;

use chrono::NaiveDate;
use common::{day, series};
use oliva_sdk::align::{align, parse_series};
use oliva_sdk::error::OlivaError;
use oliva_sdk::models::{DateCell, PriceSeries, RawPoint};
use serde_json::json;

// ---------------------------------------------------------------------------
// align
// ---------------------------------------------------------------------------

#[test]
fn aligns_union_of_dates_with_absent_markers() {
    let a = series("A", &[(day(2023, 1, 1), 3.5), (day(2023, 1, 2), 3.6)]);
    let b = series("B", &[(day(2023, 1, 2), 4.0)]);
    let c = series("C", &[]);

    let table = align(&[a, b, c]);

    assert_eq!(table.columns, vec!["Precio A", "Precio B", "Precio C"]);
    assert_eq!(table.len(), 2);

    assert_eq!(table.rows[0].date, DateCell::Day(day(2023, 1, 1)));
    assert_eq!(table.rows[0].prices, vec![Some(3.5), None, None]);

    assert_eq!(table.rows[1].date, DateCell::Day(day(2023, 1, 2)));
    assert_eq!(table.rows[1].prices, vec![Some(3.6), Some(4.0), None]);
}

#[test]
fn aligned_dates_are_unique_and_strictly_increasing() {
    let a = series(
        "A",
        &[
            (day(2023, 3, 1), 1.0),
            (day(2023, 1, 1), 2.0),
            (day(2023, 2, 1), 3.0),
        ],
    );
    let b = series("B", &[(day(2023, 2, 1), 9.0), (day(2023, 4, 1), 8.0)]);

    let table = align(&[a, b]);

    let dates: Vec<NaiveDate> = table
        .rows
        .iter()
        .map(|r| r.date.as_day().unwrap())
        .collect();
    let mut sorted = dates.clone();
    sorted.sort();
    sorted.dedup();
    assert_eq!(dates, sorted);
    assert_eq!(dates.len(), 4);
}

/// Collapse a table to (column name, date) -> price so that orderings drop
/// out of the comparison.
fn cell_map(series: &[PriceSeries]) -> HashMap<(String, NaiveDate), Option<f64>> {
    let table = align(series);
    let mut map = HashMap::new();
    for row in &table.rows {
        let date = row.date.as_day().unwrap();
        for (column, price) in table.columns.iter().zip(&row.prices) {
            map.insert((column.clone(), date), *price);
        }
    }
    map
}

#[test]
fn align_is_commutative_in_series_order() {
    let a = series("A", &[(day(2023, 1, 1), 3.5), (day(2023, 1, 2), 3.6)]);
    let b = series("B", &[(day(2023, 1, 2), 4.0), (day(2023, 1, 5), 4.4)]);
    let c = series("C", &[(day(2023, 1, 3), 2.2)]);

    let forward = cell_map(&[a.clone(), b.clone(), c.clone()]);
    let reversed = cell_map(&[c, b, a]);

    assert_eq!(forward, reversed);
}

#[test]
fn every_input_date_appears_exactly_once() {
    let a = series("A", &[(day(2023, 1, 1), 1.0), (day(2023, 1, 3), 2.0)]);
    let b = series("B", &[(day(2023, 1, 2), 3.0), (day(2023, 1, 3), 4.0)]);

    let table = align(&[a.clone(), b.clone()]);

    for input in [&a, &b] {
        for date in input.points.keys() {
            let hits = table
                .rows
                .iter()
                .filter(|r| r.date == DateCell::Day(*date))
                .count();
            assert_eq!(hits, 1, "date {date} not unique in output");
        }
    }
}

#[test]
fn rows_with_all_prices_absent_are_not_pruned() {
    // Nothing prevents a chart line from carrying a date the others lack
    // while its own value fails to survive; the aligner keeps the row.
    let a = series("A", &[(day(2023, 1, 1), 1.0)]);
    let table = align(&[a, series("B", &[]), series("C", &[])]);
    assert_eq!(table.len(), 1);
    assert_eq!(table.rows[0].prices[1], None);
    assert_eq!(table.rows[0].prices[2], None);
}

// ---------------------------------------------------------------------------
// parse_series
// ---------------------------------------------------------------------------

fn point(x: &str, y: serde_json::Value) -> RawPoint {
    RawPoint {
        x: x.to_string(),
        y,
    }
}

#[test]
fn parses_iso_and_spanish_dates_and_decimal_commas() {
    let parsed = parse_series(
        "Virgen extra",
        &[
            point("2023-01-02", json!(5.1)),
            point("03/01/2023", json!("5,25")),
            point("2023-01-04", json!("5.4")),
        ],
    )
    .unwrap();

    assert_eq!(parsed.get(day(2023, 1, 2)), Some(5.1));
    assert_eq!(parsed.get(day(2023, 1, 3)), Some(5.25));
    assert_eq!(parsed.get(day(2023, 1, 4)), Some(5.4));
}

#[test]
fn null_prices_are_gaps_not_errors() {
    let parsed = parse_series(
        "Virgen",
        &[
            point("2023-01-02", json!(null)),
            point("2023-01-03", json!(4.7)),
        ],
    )
    .unwrap();

    assert_eq!(parsed.len(), 1);
    assert_eq!(parsed.get(day(2023, 1, 2)), None);
}

#[test]
fn malformed_date_is_a_parse_error() {
    let err = parse_series("Lampante", &[point("soon", json!(4.0))]).unwrap_err();
    assert!(matches!(err, OlivaError::Parse(_)), "got {err:?}");
}

#[test]
fn malformed_price_is_a_parse_error() {
    let err =
        parse_series("Lampante", &[point("2023-01-02", json!("n/a"))]).unwrap_err();
    assert!(matches!(err, OlivaError::Parse(_)), "got {err:?}");
}
