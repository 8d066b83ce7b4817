//! Runnable entry point: pick a year (0 = every cached year combined),
//! render the charts, and print the summary metrics.

use std::env;
use std::process;

use oliva_sdk::analysis::{clustering, pca, regression};
use oliva_sdk::{config, plot, preprocess, OlivaSdk, Result};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let year: i32 = match env::args().nth(1) {
        None => 2023,
        Some(arg) => match arg.parse() {
            Ok(year) => year,
            Err(_) => {
                eprintln!("usage: oliva [year]   (0 analyzes every cached year)");
                process::exit(2);
            }
        },
    };

    if let Err(e) = run(year) {
        eprintln!("{e}");
        process::exit(1);
    }
}

fn run(year: i32) -> Result<()> {
    let sdk = OlivaSdk::builder().build()?;

    let table = if year == 0 {
        sdk.full_history()?
    } else {
        sdk.prices(year)?
    };
    if table.is_empty() {
        println!("No data available to analyze.");
        return Ok(());
    }

    let table = preprocess::normalize(&table);
    let plots = config::default_plots_dir();

    plot::price_lines(
        &table,
        "Precio del aceite de oliva (€/kg)",
        &plots.join(format!("olive_prices_{year}.png")),
    )?;
    plot::price_lines_with_trend(
        &table,
        "Precios del aceite de oliva con tendencia (€/kg)",
        &plots.join(format!("olive_prices_trend_{year}.png")),
    )?;
    plot::monthly_heatmap(
        &table,
        "Precio Virgen extra",
        &plots.join(format!("olive_prices_heatmap_{year}.png")),
    )?;

    let clusters = clustering::cluster_prices(
        &table,
        4,
        Some(&plots.join(format!("olive_prices_clusters_{year}.png"))),
    )?;
    println!(
        "K-Means: {} rows assigned to {} clusters",
        clusters.rows.len(),
        clusters.k
    );

    let projection = pca::project_prices(
        &table,
        2,
        Some(&plots.join(format!("olive_prices_pca_{year}.png"))),
    )?;
    let ratios: Vec<String> = projection
        .explained_variance
        .iter()
        .map(|v| format!("{v:.4}"))
        .collect();
    println!("Explained variance per component: [{}]", ratios.join(", "));

    let outcome = regression::train_random_forest(
        &table,
        "Precio Virgen extra",
        regression::RegressionOptions::default(),
        Some(&plots.join(format!("olive_prices_forest_{year}.png"))),
    )?;
    println!(
        "MSE: {:.6}, RMSE: {:.6}, R²: {:.6}",
        outcome.mse, outcome.rmse, outcome.r2
    );

    Ok(())
}
