//! K-Means clustering of daily price vectors.

use std::path::Path;

use chrono::NaiveDate;
use smartcore::cluster::kmeans::{KMeans, KMeansParameters};
use smartcore::linalg::basic::matrix::DenseMatrix;

use super::feature_matrix;
use crate::error::{OlivaError, Result};
use crate::models::PriceTable;
use crate::plot;

/// One complete table row plus its assigned cluster.
#[derive(Debug, Clone, PartialEq)]
pub struct ClusteredRow {
    pub date: NaiveDate,
    pub prices: Vec<f64>,
    pub cluster: usize,
}

/// The input table's complete rows augmented with a per-row cluster label.
#[derive(Debug, Clone, PartialEq)]
pub struct Clustering {
    pub k: usize,
    pub rows: Vec<ClusteredRow>,
}

/// Cluster the complete rows into `k` groups.
///
/// With `render`, also writes a date/price scatter colored by cluster,
/// plotted against the first price column.
pub fn cluster_prices(
    table: &PriceTable,
    k: usize,
    render: Option<&Path>,
) -> Result<Clustering> {
    let (dates, features) = feature_matrix(table)?;
    if k == 0 || features.len() < k {
        return Err(OlivaError::Analysis(format!(
            "cannot form {k} clusters from {} complete rows",
            features.len()
        )));
    }

    let x = DenseMatrix::from_2d_vec(&features);
    let model = KMeans::fit(&x, KMeansParameters::default().with_k(k))
        .map_err(|e| OlivaError::Analysis(e.to_string()))?;
    let labels: Vec<u8> = model
        .predict(&x)
        .map_err(|e| OlivaError::Analysis(e.to_string()))?;

    let rows: Vec<ClusteredRow> = dates
        .into_iter()
        .zip(features)
        .zip(labels)
        .map(|((date, prices), cluster)| ClusteredRow {
            date,
            prices,
            cluster: cluster as usize,
        })
        .collect();

    if let Some(path) = render {
        let points: Vec<(NaiveDate, f64, usize)> = rows
            .iter()
            .map(|r| (r.date, r.prices[0], r.cluster))
            .collect();
        let ylabel = table
            .columns
            .first()
            .map(String::as_str)
            .unwrap_or("Precio");
        plot::cluster_scatter(&points, ylabel, path)?;
    }

    Ok(Clustering { k, rows })
}
