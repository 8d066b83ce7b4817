//! Principal component analysis of daily price vectors.

use std::path::Path;

use chrono::NaiveDate;
use smartcore::decomposition::pca::{PCAParameters, PCA};
use smartcore::linalg::basic::arrays::Array;
use smartcore::linalg::basic::matrix::DenseMatrix;

use super::feature_matrix;
use crate::error::{OlivaError, Result};
use crate::models::PriceTable;
use crate::plot;

/// One complete table row in reduced coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct PcaRow {
    pub date: NaiveDate,
    pub components: Vec<f64>,
}

/// The projection plus the per-component variance-explained vector.
#[derive(Debug, Clone, PartialEq)]
pub struct PcaProjection {
    pub rows: Vec<PcaRow>,
    pub explained_variance: Vec<f64>,
}

/// Project the complete rows onto `n_components` principal components.
///
/// The variance-explained ratios are the projected coordinates' column
/// variances over the total variance of the input columns. With `render`,
/// also writes a scatter of the first two components colored by year.
pub fn project_prices(
    table: &PriceTable,
    n_components: usize,
    render: Option<&Path>,
) -> Result<PcaProjection> {
    let (dates, features) = feature_matrix(table)?;
    let n_features = table.columns.len();
    if n_components == 0 || n_components > n_features {
        return Err(OlivaError::Analysis(format!(
            "cannot extract {n_components} components from {n_features} price columns"
        )));
    }
    if features.len() < 2 {
        return Err(OlivaError::Analysis(format!(
            "need at least 2 complete rows, have {}",
            features.len()
        )));
    }

    let x = DenseMatrix::from_2d_vec(&features);
    let model = PCA::fit(&x, PCAParameters::default().with_n_components(n_components))
        .map_err(|e| OlivaError::Analysis(e.to_string()))?;
    let projected = model
        .transform(&x)
        .map_err(|e| OlivaError::Analysis(e.to_string()))?;

    let (n_rows, n_cols) = projected.shape();
    let mut component_columns = vec![Vec::with_capacity(n_rows); n_cols];
    let mut rows = Vec::with_capacity(n_rows);
    for (i, date) in dates.iter().enumerate() {
        let components: Vec<f64> = (0..n_cols).map(|j| *projected.get((i, j))).collect();
        for (j, value) in components.iter().enumerate() {
            component_columns[j].push(*value);
        }
        rows.push(PcaRow {
            date: *date,
            components,
        });
    }

    let total: f64 = (0..n_features)
        .map(|j| variance(features.iter().map(|row| row[j])))
        .sum();
    let explained_variance: Vec<f64> = component_columns
        .iter()
        .map(|column| {
            if total > 0.0 {
                variance(column.iter().copied()) / total
            } else {
                0.0
            }
        })
        .collect();

    if let Some(path) = render {
        let points: Vec<(NaiveDate, f64, f64)> = rows
            .iter()
            .map(|r| {
                (
                    r.date,
                    r.components[0],
                    <[f64]>::get(&r.components, 1).copied().unwrap_or(0.0),
                )
            })
            .collect();
        plot::pca_scatter(&points, path)?;
    }

    Ok(PcaProjection {
        rows,
        explained_variance,
    })
}

/// Sample variance; zero for fewer than two values.
fn variance(values: impl Iterator<Item = f64>) -> f64 {
    let values: Vec<f64> = values.collect();
    let n = values.len();
    if n < 2 {
        return 0.0;
    }
    let mean = values.iter().sum::<f64>() / n as f64;
    values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1) as f64
}
