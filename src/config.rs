use std::path::PathBuf;
use std::time::Duration;

/// Page carrying the price chart.
pub const DEFAULT_URL: &str = "https://www.infaoliva.com";

/// Inclusive window of years the source publishes data for.
pub const YEAR_MIN: i32 = 2012;
pub const YEAR_MAX: i32 = 2024;

// ---------------------------------------------------------------------------
// Page structure
// ---------------------------------------------------------------------------

/// Reject button of the cookie-consent overlay. Its absence is tolerated.
pub const CONSENT_REJECT_SELECTOR: &str = "button.cc-nb-reject";

/// "Elegir fechas" control that reveals the custom date-range inputs.
pub const DATE_RANGE_BUTTON_SELECTOR: &str = r#"button[data-years="-1"]"#;

pub const START_DATE_INPUT_SELECTOR: &str = "#fecha_ini";
pub const END_DATE_INPUT_SELECTOR: &str = "#fecha_fin";

/// Format the page's date inputs expect.
pub const INPUT_DATE_FORMAT: &str = "%d/%m/%Y";

/// Serializes the chart's client-side datasets (label + points) to JSON.
/// The page exposes the Chart.js instance as a global named `myChart`.
pub const CHART_DATASETS_JS: &str = "JSON.stringify(myChart.data.datasets.map(function (d) { \
     return { label: d.label, data: d.data }; }))";

/// Number of lines the chart draws (Virgen extra, Virgen, Lampante).
pub const EXPECTED_SERIES: usize = 3;

/// Point count of the first dataset, or -1 while the chart global is missing.
/// Polled after committing a date range to detect that the redraw settled.
pub const CHART_POINT_COUNT_JS: &str = "(typeof myChart === 'undefined') ? -1 \
     : myChart.data.datasets.length === 0 ? 0 : myChart.data.datasets[0].data.length";

// ---------------------------------------------------------------------------
// Timing
// ---------------------------------------------------------------------------

/// How long to wait for any single element before giving up.
pub const ELEMENT_TIMEOUT: Duration = Duration::from_secs(10);

/// Pause after dismissing the consent overlay so it is gone before clicking through it.
pub const OVERLAY_SETTLE: Duration = Duration::from_millis(1500);

/// Pause between date-field interactions; the page re-validates on each change.
pub const FIELD_SETTLE: Duration = Duration::from_millis(500);

/// Redraw poll cadence and cap. The chart counts as settled once its point
/// count is nonzero and unchanged across two consecutive polls.
pub const POLL_INTERVAL: Duration = Duration::from_millis(500);
pub const MAX_POLL_ATTEMPTS: u32 = 24;

// ---------------------------------------------------------------------------
// Storage layout
// ---------------------------------------------------------------------------

/// Header of the date column in year files.
pub const DATE_COLUMN: &str = "Fecha";

/// Prefix applied to chart labels to form price column names.
pub const COLUMN_PREFIX: &str = "Precio ";

/// Canonical file name for one year of prices.
pub fn year_file_name(year: i32) -> String {
    format!("olive_prices_{year}.csv")
}

pub fn default_data_dir() -> PathBuf {
    if let Some(data) = dirs::data_dir() {
        data.join("oliva-sdk")
    } else {
        PathBuf::from("data")
    }
}

/// Where the binary drops rendered charts.
pub fn default_plots_dir() -> PathBuf {
    PathBuf::from("plots")
}
