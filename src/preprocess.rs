//! Table normalization ahead of the analyses.

use crate::models::{DateCell, PriceTable};

/// Parse, sort, and reindex a table. Total and pure: the input is left
/// untouched and a fresh table is returned.
///
/// Unparseable date cells become the explicit absent marker; their rows are
/// kept (downstream consumers decide what to drop). Rows are sorted ascending
/// by date, stable for equal dates, with absent-date rows ordered last.
/// Idempotent: normalizing a normalized table changes nothing.
pub fn normalize(table: &PriceTable) -> PriceTable {
    let mut rows: Vec<_> = table
        .rows
        .iter()
        .map(|row| {
            let mut row = row.clone();
            row.date = row.date.resolved();
            row
        })
        .collect();

    rows.sort_by_key(|row| match row.date {
        DateCell::Day(d) => (0, d),
        // Raw cannot survive `resolved`; order it with Absent if it appears.
        _ => (1, chrono::NaiveDate::MAX),
    });

    PriceTable {
        columns: table.columns.clone(),
        rows,
    }
}
