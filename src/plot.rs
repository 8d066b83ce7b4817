//! Chart rendering with `plotters`.
//!
//! Every function writes one PNG to an explicit path; callers that do not
//! want the side effect simply do not call (the analysis collaborators take
//! an `Option<&Path>` render target for exactly that reason).

use std::fmt::Display;
use std::path::Path;

use chrono::{Datelike, Duration, NaiveDate};
use plotters::prelude::*;
use smartcore::linalg::basic::matrix::DenseMatrix;
use smartcore::linear::linear_regression::LinearRegression;

use crate::error::{OlivaError, Result};
use crate::models::PriceTable;

/// Line colors for the three price series (and a few spares).
const SERIES_COLORS: [RGBColor; 6] = [
    RGBColor(31, 119, 180),
    RGBColor(255, 127, 14),
    RGBColor(44, 160, 44),
    RGBColor(214, 39, 40),
    RGBColor(148, 103, 189),
    RGBColor(140, 86, 75),
];

fn plot_err<E: Display>(e: E) -> OlivaError {
    OlivaError::Plot(e.to_string())
}

/// Rows of one column that have both a parsed date and a present price.
fn column_points(table: &PriceTable, column: usize) -> Vec<(NaiveDate, f64)> {
    table
        .rows
        .iter()
        .filter_map(|row| {
            let date = row.date.as_day()?;
            let price = row.prices.get(column).copied().flatten()?;
            Some((date, price))
        })
        .collect()
}

/// Plot-friendly bounds over every drawable point in the table.
fn table_bounds(table: &PriceTable) -> Result<(NaiveDate, NaiveDate, f64, f64)> {
    let mut bounds: Option<(NaiveDate, NaiveDate, f64, f64)> = None;
    for column in 0..table.columns.len() {
        for (date, price) in column_points(table, column) {
            bounds = Some(match bounds {
                None => (date, date, price, price),
                Some((d0, d1, p0, p1)) => {
                    (d0.min(date), d1.max(date), p0.min(price), p1.max(price))
                }
            });
        }
    }
    let (d0, mut d1, mut p0, mut p1) =
        bounds.ok_or_else(|| OlivaError::Plot("nothing to plot".into()))?;
    if d0 == d1 {
        d1 = d1 + Duration::days(1);
    }
    if (p1 - p0).abs() < f64::EPSILON {
        p0 -= 1.0;
        p1 += 1.0;
    }
    let margin = (p1 - p0) * 0.05;
    Ok((d0, d1, p0 - margin, p1 + margin))
}

fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Price lines
// ---------------------------------------------------------------------------

/// One line per price column over time.
pub fn price_lines(table: &PriceTable, title: &str, path: &Path) -> Result<()> {
    draw_lines(table, title, path, false)
}

/// One line per price column plus its fitted linear trend.
pub fn price_lines_with_trend(table: &PriceTable, title: &str, path: &Path) -> Result<()> {
    draw_lines(table, title, path, true)
}

fn draw_lines(table: &PriceTable, title: &str, path: &Path, with_trend: bool) -> Result<()> {
    ensure_parent(path)?;
    let (d0, d1, p0, p1) = table_bounds(table)?;

    let root = BitMapBackend::new(path, (1400, 800)).into_drawing_area();
    root.fill(&WHITE).map_err(plot_err)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(title, ("sans-serif", 28))
        .margin(12)
        .x_label_area_size(48)
        .y_label_area_size(56)
        .build_cartesian_2d(d0..d1, p0..p1)
        .map_err(plot_err)?;

    chart
        .configure_mesh()
        .x_labels(8)
        .x_label_formatter(&|d: &NaiveDate| d.format("%Y-%m-%d").to_string())
        .x_desc("Fecha")
        .y_desc("Precio (€/kg)")
        .draw()
        .map_err(plot_err)?;

    for (idx, name) in table.columns.iter().enumerate() {
        let points = column_points(table, idx);
        if points.is_empty() {
            continue;
        }
        let color = SERIES_COLORS[idx % SERIES_COLORS.len()];
        chart
            .draw_series(LineSeries::new(points.iter().copied(), color))
            .map_err(plot_err)?
            .label(name.clone())
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 18, y)], color));

        if with_trend && points.len() >= 2 {
            let trend = fitted_trend(&points)?;
            chart
                .draw_series(LineSeries::new(trend, color.mix(0.5)))
                .map_err(plot_err)?
                .label(format!("Tendencia {name}"))
                .legend(move |(x, y)| {
                    PathElement::new(vec![(x, y), (x + 18, y)], color.mix(0.5))
                });
        }
    }

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.85))
        .border_style(BLACK)
        .draw()
        .map_err(plot_err)?;
    root.present().map_err(plot_err)?;
    Ok(())
}

/// Least-squares line over the series, evaluated at its own dates.
fn fitted_trend(points: &[(NaiveDate, f64)]) -> Result<Vec<(NaiveDate, f64)>> {
    let days: Vec<Vec<f64>> = points
        .iter()
        .map(|(d, _)| vec![d.num_days_from_ce() as f64])
        .collect();
    let values: Vec<f64> = points.iter().map(|(_, v)| *v).collect();

    let x = DenseMatrix::from_2d_vec(&days);
    let model =
        LinearRegression::fit(&x, &values, Default::default()).map_err(plot_err)?;
    let fitted = model.predict(&x).map_err(plot_err)?;

    Ok(points
        .iter()
        .zip(fitted)
        .map(|((d, _), v)| (*d, v))
        .collect())
}

// ---------------------------------------------------------------------------
// Cluster scatter
// ---------------------------------------------------------------------------

/// Scatter of `(date, price)` points colored by cluster label.
pub fn cluster_scatter(
    points: &[(NaiveDate, f64, usize)],
    ylabel: &str,
    path: &Path,
) -> Result<()> {
    ensure_parent(path)?;
    let (d0, d1, p0, p1) = scatter_bounds(points.iter().map(|(d, p, _)| (*d, *p)))?;

    let root = BitMapBackend::new(path, (1400, 800)).into_drawing_area();
    root.fill(&WHITE).map_err(plot_err)?;

    let mut chart = ChartBuilder::on(&root)
        .caption("Agrupamiento de precios (K-Means)", ("sans-serif", 28))
        .margin(12)
        .x_label_area_size(48)
        .y_label_area_size(56)
        .build_cartesian_2d(d0..d1, p0..p1)
        .map_err(plot_err)?;

    chart
        .configure_mesh()
        .x_labels(8)
        .x_label_formatter(&|d: &NaiveDate| d.format("%Y-%m-%d").to_string())
        .x_desc("Fecha")
        .y_desc(ylabel)
        .draw()
        .map_err(plot_err)?;

    chart
        .draw_series(points.iter().map(|(date, price, cluster)| {
            Circle::new((*date, *price), 3, Palette99::pick(*cluster).filled())
        }))
        .map_err(plot_err)?;

    root.present().map_err(plot_err)?;
    Ok(())
}

fn scatter_bounds(
    points: impl Iterator<Item = (NaiveDate, f64)>,
) -> Result<(NaiveDate, NaiveDate, f64, f64)> {
    let mut bounds: Option<(NaiveDate, NaiveDate, f64, f64)> = None;
    for (date, value) in points {
        bounds = Some(match bounds {
            None => (date, date, value, value),
            Some((d0, d1, v0, v1)) => {
                (d0.min(date), d1.max(date), v0.min(value), v1.max(value))
            }
        });
    }
    let (d0, mut d1, mut v0, mut v1) =
        bounds.ok_or_else(|| OlivaError::Plot("nothing to plot".into()))?;
    if d0 == d1 {
        d1 = d1 + Duration::days(1);
    }
    if (v1 - v0).abs() < f64::EPSILON {
        v0 -= 1.0;
        v1 += 1.0;
    }
    Ok((d0, d1, v0, v1))
}

// ---------------------------------------------------------------------------
// PCA scatter
// ---------------------------------------------------------------------------

/// First two principal components, colored by the year of each row's date.
pub fn pca_scatter(points: &[(NaiveDate, f64, f64)], path: &Path) -> Result<()> {
    ensure_parent(path)?;
    let (mut x0, mut x1) = (f64::MAX, f64::MIN);
    let (mut y0, mut y1) = (f64::MAX, f64::MIN);
    for (_, x, y) in points {
        x0 = x0.min(*x);
        x1 = x1.max(*x);
        y0 = y0.min(*y);
        y1 = y1.max(*y);
    }
    if points.is_empty() {
        return Err(OlivaError::Plot("nothing to plot".into()));
    }
    if (x1 - x0).abs() < f64::EPSILON {
        x0 -= 1.0;
        x1 += 1.0;
    }
    if (y1 - y0).abs() < f64::EPSILON {
        y0 -= 1.0;
        y1 += 1.0;
    }

    let root = BitMapBackend::new(path, (1000, 800)).into_drawing_area();
    root.fill(&WHITE).map_err(plot_err)?;

    let mut chart = ChartBuilder::on(&root)
        .caption("PCA de precios", ("sans-serif", 28))
        .margin(12)
        .x_label_area_size(48)
        .y_label_area_size(56)
        .build_cartesian_2d(x0..x1, y0..y1)
        .map_err(plot_err)?;

    chart
        .configure_mesh()
        .x_desc("Componente principal 1")
        .y_desc("Componente principal 2")
        .draw()
        .map_err(plot_err)?;

    chart
        .draw_series(points.iter().map(|(date, x, y)| {
            let year_idx = date.year().rem_euclid(Palette99::COLORS.len() as i32) as usize;
            Circle::new((*x, *y), 3, Palette99::pick(year_idx).filled())
        }))
        .map_err(plot_err)?;

    root.present().map_err(plot_err)?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Predicted vs. actual
// ---------------------------------------------------------------------------

/// Held-out predictions against their actual values, with the identity line.
pub fn predicted_vs_actual(
    actuals: &[f64],
    predictions: &[f64],
    target: &str,
    path: &Path,
) -> Result<()> {
    ensure_parent(path)?;
    if actuals.is_empty() || actuals.len() != predictions.len() {
        return Err(OlivaError::Plot("nothing to plot".into()));
    }
    let mut lo = f64::MAX;
    let mut hi = f64::MIN;
    for v in actuals.iter().chain(predictions) {
        lo = lo.min(*v);
        hi = hi.max(*v);
    }
    if (hi - lo).abs() < f64::EPSILON {
        lo -= 1.0;
        hi += 1.0;
    }

    let root = BitMapBackend::new(path, (1000, 800)).into_drawing_area();
    root.fill(&WHITE).map_err(plot_err)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(
            format!("Random Forest - predicción de {target}"),
            ("sans-serif", 28),
        )
        .margin(12)
        .x_label_area_size(48)
        .y_label_area_size(56)
        .build_cartesian_2d(lo..hi, lo..hi)
        .map_err(plot_err)?;

    chart
        .configure_mesh()
        .x_desc("Valores reales")
        .y_desc("Predicciones")
        .draw()
        .map_err(plot_err)?;

    chart
        .draw_series(
            actuals
                .iter()
                .zip(predictions)
                .map(|(a, p)| Circle::new((*a, *p), 4, SERIES_COLORS[0].filled())),
        )
        .map_err(plot_err)?;
    chart
        .draw_series(LineSeries::new(vec![(lo, lo), (hi, hi)], BLACK))
        .map_err(plot_err)?;

    root.present().map_err(plot_err)?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Monthly heatmap
// ---------------------------------------------------------------------------

/// Month × day-of-month heatmap of one price column, mean per cell.
pub fn monthly_heatmap(table: &PriceTable, column: &str, path: &Path) -> Result<()> {
    ensure_parent(path)?;
    let idx = table
        .column_index(column)
        .ok_or_else(|| OlivaError::Plot(format!("unknown column {column:?}")))?;

    let mut sums = [[0.0f64; 31]; 12];
    let mut counts = [[0u32; 31]; 12];
    for (date, price) in column_points(table, idx) {
        let m = date.month0() as usize;
        let d = date.day0() as usize;
        sums[m][d] += price;
        counts[m][d] += 1;
    }

    let mut lo = f64::MAX;
    let mut hi = f64::MIN;
    for m in 0..12 {
        for d in 0..31 {
            if counts[m][d] > 0 {
                let mean = sums[m][d] / counts[m][d] as f64;
                lo = lo.min(mean);
                hi = hi.max(mean);
            }
        }
    }
    if lo > hi {
        return Err(OlivaError::Plot("nothing to plot".into()));
    }
    let span = if (hi - lo).abs() < f64::EPSILON {
        1.0
    } else {
        hi - lo
    };

    let root = BitMapBackend::new(path, (1200, 600)).into_drawing_area();
    root.fill(&WHITE).map_err(plot_err)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(format!("Mapa de calor mensual - {column}"), ("sans-serif", 28))
        .margin(12)
        .x_label_area_size(40)
        .y_label_area_size(40)
        .build_cartesian_2d(0i32..31i32, 0i32..12i32)
        .map_err(plot_err)?;

    chart
        .configure_mesh()
        .disable_mesh()
        .x_desc("Día del mes")
        .y_desc("Mes")
        .x_label_formatter(&|d| (d + 1).to_string())
        .y_label_formatter(&|m| (m + 1).to_string())
        .draw()
        .map_err(plot_err)?;

    chart
        .draw_series((0..12).flat_map(|m| (0..31).map(move |d| (m, d))).filter_map(
            |(m, d)| {
                if counts[m as usize][d as usize] == 0 {
                    return None;
                }
                let mean =
                    sums[m as usize][d as usize] / counts[m as usize][d as usize] as f64;
                let t = (mean - lo) / span;
                Some(Rectangle::new(
                    [(d, m), (d + 1, m + 1)],
                    heat_color(t).filled(),
                ))
            },
        ))
        .map_err(plot_err)?;

    root.present().map_err(plot_err)?;
    Ok(())
}

/// Light-yellow to deep-blue ramp over `t` in `[0, 1]`.
fn heat_color(t: f64) -> RGBColor {
    let t = t.clamp(0.0, 1.0);
    let lerp = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * t).round() as u8;
    RGBColor(lerp(255, 34), lerp(255, 94), lerp(204, 168))
}
