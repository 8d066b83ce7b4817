//! Analysis collaborators.
//!
//! Each submodule wraps one `smartcore` estimator: the normalized price table
//! goes in, a derived table plus metrics come out, and an optional render
//! target produces the matching chart as a side effect. Rows missing a date
//! or any price are excluded from the fits, matching how the analyses treat
//! incomplete observations.

pub mod clustering;
pub mod pca;
pub mod regression;

use chrono::NaiveDate;

use crate::error::{OlivaError, Result};
use crate::models::PriceTable;

/// Dates and the full-width feature matrix of the complete rows.
pub(crate) fn feature_matrix(table: &PriceTable) -> Result<(Vec<NaiveDate>, Vec<Vec<f64>>)> {
    let complete = table.complete_rows();
    if complete.is_empty() {
        return Err(OlivaError::Analysis(
            "no complete rows to analyze".to_string(),
        ));
    }
    let dates = complete.iter().map(|(d, _)| *d).collect();
    let features = complete.into_iter().map(|(_, p)| p).collect();
    Ok((dates, features))
}
