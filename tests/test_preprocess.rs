//! Normalization tests: parsing, ordering, purity, idempotency.

mod common;

use common::day;
use oliva_sdk::models::{DateCell, PriceRow, PriceTable};
use oliva_sdk::preprocess::normalize;

fn raw_row(date: &str, price: f64) -> PriceRow {
    PriceRow {
        date: DateCell::Raw(date.to_string()),
        prices: vec![Some(price)],
    }
}

fn raw_table(rows: Vec<PriceRow>) -> PriceTable {
    PriceTable {
        columns: vec!["Precio Virgen extra".to_string()],
        rows,
    }
}

#[test]
fn sorts_rows_chronologically() {
    let table = raw_table(vec![
        raw_row("2023-03-01", 3.0),
        raw_row("2023-01-01", 1.0),
        raw_row("2023-02-01", 2.0),
    ]);

    let normalized = normalize(&table);

    let dates: Vec<_> = normalized
        .rows
        .iter()
        .map(|r| r.date.as_day().unwrap())
        .collect();
    assert_eq!(
        dates,
        vec![day(2023, 1, 1), day(2023, 2, 1), day(2023, 3, 1)]
    );
}

#[test]
fn accepts_both_date_formats() {
    let table = raw_table(vec![raw_row("15/03/2023", 1.0), raw_row("2023-03-16", 2.0)]);
    let normalized = normalize(&table);

    assert_eq!(normalized.rows[0].date, DateCell::Day(day(2023, 3, 15)));
    assert_eq!(normalized.rows[1].date, DateCell::Day(day(2023, 3, 16)));
}

#[test]
fn unparseable_dates_become_absent_and_sort_last() {
    let table = raw_table(vec![
        raw_row("not a date", 9.0),
        raw_row("2023-01-01", 1.0),
    ]);

    let normalized = normalize(&table);

    assert_eq!(normalized.len(), 2, "absent-date rows are kept");
    assert_eq!(normalized.rows[0].date, DateCell::Day(day(2023, 1, 1)));
    assert_eq!(normalized.rows[1].date, DateCell::Absent);
    assert_eq!(normalized.rows[1].prices, vec![Some(9.0)]);
}

#[test]
fn stable_for_equal_dates() {
    let table = raw_table(vec![
        raw_row("2023-01-02", 1.0),
        raw_row("2023-01-01", 2.0),
        raw_row("2023-01-01", 3.0),
    ]);

    let normalized = normalize(&table);

    assert_eq!(normalized.rows[0].prices, vec![Some(2.0)]);
    assert_eq!(normalized.rows[1].prices, vec![Some(3.0)]);
    assert_eq!(normalized.rows[2].prices, vec![Some(1.0)]);
}

#[test]
fn does_not_mutate_its_input() {
    let table = raw_table(vec![raw_row("2023-03-01", 3.0), raw_row("2023-01-01", 1.0)]);
    let before = table.clone();

    let _ = normalize(&table);

    assert_eq!(table, before);
}

#[test]
fn idempotent() {
    let table = raw_table(vec![
        raw_row("2023-03-01", 3.0),
        raw_row("garbage", 0.0),
        raw_row("2023-01-01", 1.0),
    ]);

    let once = normalize(&table);
    let twice = normalize(&once);

    assert_eq!(once, twice);
}
