//! Combined-history tests: concatenation of whatever year files exist.

mod common;

use common::day;
use oliva_sdk::error::OlivaError;
use oliva_sdk::history::load_folder;
use oliva_sdk::models::{DateCell, PriceRow, PriceTable};
use oliva_sdk::store::write_table;

fn year_table(year: i32, price: f64) -> PriceTable {
    let mut table = PriceTable::new(vec![
        "Precio Virgen extra".to_string(),
        "Precio Virgen".to_string(),
    ]);
    table.rows.push(PriceRow {
        date: DateCell::Day(day(year, 1, 2)),
        prices: vec![Some(price), Some(price - 0.5)],
    });
    table
}

#[test]
fn concatenates_all_year_files() {
    let tmp = tempfile::tempdir().unwrap();
    write_table(
        &tmp.path().join("olive_prices_2022.csv"),
        &year_table(2022, 4.0),
    )
    .unwrap();
    write_table(
        &tmp.path().join("olive_prices_2023.csv"),
        &year_table(2023, 8.0),
    )
    .unwrap();

    let combined = load_folder(tmp.path()).unwrap();

    assert_eq!(combined.len(), 2);
    assert_eq!(
        combined.columns,
        vec!["Precio Virgen extra", "Precio Virgen"]
    );
}

#[test]
fn empty_folder_yields_empty_table() {
    let tmp = tempfile::tempdir().unwrap();
    let combined = load_folder(tmp.path()).unwrap();
    assert!(combined.is_empty());
}

#[test]
fn mismatched_columns_are_a_parse_error() {
    let tmp = tempfile::tempdir().unwrap();
    write_table(
        &tmp.path().join("olive_prices_2022.csv"),
        &year_table(2022, 4.0),
    )
    .unwrap();

    let mut odd = PriceTable::new(vec!["Precio Lampante".to_string()]);
    odd.rows.push(PriceRow {
        date: DateCell::Day(day(2023, 1, 2)),
        prices: vec![Some(1.0)],
    });
    write_table(&tmp.path().join("olive_prices_2023.csv"), &odd).unwrap();

    assert!(matches!(
        load_folder(tmp.path()).unwrap_err(),
        OlivaError::Parse(_)
    ));
}
