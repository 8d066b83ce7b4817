//! Random-forest regression of one price column on the others.

use std::path::Path;

use smartcore::ensemble::random_forest_regressor::{
    RandomForestRegressor, RandomForestRegressorParameters,
};
use smartcore::linalg::basic::matrix::DenseMatrix;
use smartcore::metrics::{mean_squared_error, r2};
use smartcore::model_selection::train_test_split;

use super::feature_matrix;
use crate::error::{OlivaError, Result};
use crate::models::PriceTable;
use crate::plot;

#[derive(Debug, Clone, Copy)]
pub struct RegressionOptions {
    /// Share of complete rows held out for evaluation.
    pub test_size: f32,
    pub seed: u64,
}

impl Default for RegressionOptions {
    fn default() -> Self {
        Self {
            test_size: 0.2,
            seed: 42,
        }
    }
}

/// Trained-model handle, held-out predictions, and the three error metrics.
#[derive(Debug)]
pub struct RegressionOutcome {
    pub model: RandomForestRegressor<f64, f64, DenseMatrix<f64>, Vec<f64>>,
    pub actuals: Vec<f64>,
    pub predictions: Vec<f64>,
    pub mse: f64,
    pub rmse: f64,
    pub r2: f64,
}

/// Fit a random forest predicting `target_column` from the remaining price
/// columns. With `render`, also writes a predicted-vs-actual scatter.
pub fn train_random_forest(
    table: &PriceTable,
    target_column: &str,
    options: RegressionOptions,
    render: Option<&Path>,
) -> Result<RegressionOutcome> {
    let target_idx = table.column_index(target_column).ok_or_else(|| {
        OlivaError::Analysis(format!("unknown target column {target_column:?}"))
    })?;
    if table.columns.len() < 2 {
        return Err(OlivaError::Analysis(
            "need at least one feature column besides the target".to_string(),
        ));
    }

    let (_, complete) = feature_matrix(table)?;
    if complete.len() < 5 {
        return Err(OlivaError::Analysis(format!(
            "need at least 5 complete rows to fit, have {}",
            complete.len()
        )));
    }

    let mut features = Vec::with_capacity(complete.len());
    let mut target = Vec::with_capacity(complete.len());
    for prices in &complete {
        target.push(prices[target_idx]);
        features.push(
            prices
                .iter()
                .enumerate()
                .filter(|(i, _)| *i != target_idx)
                .map(|(_, v)| *v)
                .collect::<Vec<f64>>(),
        );
    }

    let x = DenseMatrix::from_2d_vec(&features);
    let (x_train, x_test, y_train, y_test) =
        train_test_split(&x, &target, options.test_size, true, Some(options.seed));

    let model = RandomForestRegressor::fit(
        &x_train,
        &y_train,
        RandomForestRegressorParameters::default().with_seed(options.seed),
    )
    .map_err(|e| OlivaError::Analysis(e.to_string()))?;
    let predictions = model
        .predict(&x_test)
        .map_err(|e| OlivaError::Analysis(e.to_string()))?;

    let mse = mean_squared_error(&y_test, &predictions);
    let rmse = mse.sqrt();
    let r2 = r2(&y_test, &predictions);

    if let Some(path) = render {
        plot::predicted_vs_actual(&y_test, &predictions, target_column, path)?;
    }

    Ok(RegressionOutcome {
        model,
        actuals: y_test,
        predictions,
        mse,
        rmse,
        r2,
    })
}
