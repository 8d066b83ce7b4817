//! Oliva SDK for Rust.
//!
//! Scrapes historical olive-oil price series out of the chart on
//! infaoliva.com, persists them as one CSV per calendar year (file presence
//! is a cache), and runs the standard analyses (K-Means clustering, PCA,
//! random-forest regression) over the normalized table.
//!
//! # Quick start
//!
//! ```no_run
//! use oliva_sdk::{preprocess, OlivaSdk};
//!
//! let sdk = OlivaSdk::builder().build().unwrap();
//!
//! // Cached file if present, scraped and persisted otherwise
//! let table = sdk.prices(2023).unwrap();
//! let table = preprocess::normalize(&table);
//!
//! let clusters = oliva_sdk::analysis::clustering::cluster_prices(&table, 4, None).unwrap();
//! ```

pub mod align;
pub mod analysis;
pub mod config;
pub mod error;
pub mod history;
pub mod models;
pub mod plot;
pub mod preprocess;
pub mod scrape;
pub mod store;

pub use error::{OlivaError, Result};
pub use models::{DateCell, PriceRow, PriceSeries, PriceTable};
pub use scrape::{BrowserExtractor, ChartExtractor};
pub use store::{RedownloadPrompt, StdinPrompt, YearStore};

use std::fmt;
use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// OlivaSdkBuilder
// ---------------------------------------------------------------------------

/// Builder for configuring and constructing an [`OlivaSdk`] instance.
///
/// Use [`OlivaSdk::builder()`] to obtain a builder, chain configuration
/// methods, and call [`build()`](OlivaSdkBuilder::build) to create the SDK.
pub struct OlivaSdkBuilder {
    data_dir: Option<PathBuf>,
    url: String,
    year_min: i32,
    year_max: i32,
    extractor: Option<Box<dyn ChartExtractor>>,
    prompt: Option<Box<dyn RedownloadPrompt>>,
}

impl Default for OlivaSdkBuilder {
    fn default() -> Self {
        Self {
            data_dir: None,
            url: config::DEFAULT_URL.to_string(),
            year_min: config::YEAR_MIN,
            year_max: config::YEAR_MAX,
            extractor: None,
            prompt: None,
        }
    }
}

impl OlivaSdkBuilder {
    /// Set a custom data directory for the year files.
    ///
    /// If not set, the platform-appropriate default data directory is used.
    pub fn data_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.data_dir = Some(path.as_ref().to_path_buf());
        self
    }

    /// Override the page the chart lives on.
    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    /// Override the inclusive window of years the source has data for.
    pub fn years(mut self, min: i32, max: i32) -> Self {
        self.year_min = min;
        self.year_max = max;
        self
    }

    /// Replace the browser-backed extractor, e.g. with a stub in tests.
    pub fn extractor(mut self, extractor: Box<dyn ChartExtractor>) -> Self {
        self.extractor = Some(extractor);
        self
    }

    /// Replace the interactive re-download confirmation.
    pub fn prompt(mut self, prompt: Box<dyn RedownloadPrompt>) -> Self {
        self.prompt = Some(prompt);
        self
    }

    /// Build the SDK, creating the data directory if needed. No scraping
    /// happens here; year files are fetched lazily on first request.
    pub fn build(self) -> Result<OlivaSdk> {
        let data_dir = self.data_dir.unwrap_or_else(config::default_data_dir);
        let store = YearStore::new(data_dir, self.year_min, self.year_max)?;
        let extractor = self
            .extractor
            .unwrap_or_else(|| Box::new(BrowserExtractor::new(self.url.clone())));
        let prompt = self.prompt.unwrap_or_else(|| Box::new(StdinPrompt));
        Ok(OlivaSdk {
            store,
            extractor,
            prompt,
        })
    }
}

// ---------------------------------------------------------------------------
// OlivaSdk
// ---------------------------------------------------------------------------

/// The main entry point: wires the year store, the chart extractor, and the
/// re-download prompt together.
///
/// Created via [`OlivaSdk::builder()`].
pub struct OlivaSdk {
    store: YearStore,
    extractor: Box<dyn ChartExtractor>,
    prompt: Box<dyn RedownloadPrompt>,
}

impl OlivaSdk {
    /// Create a new builder for configuring the SDK.
    pub fn builder() -> OlivaSdkBuilder {
        OlivaSdkBuilder::default()
    }

    /// The price table for one year: cached file if present, scraped and
    /// persisted otherwise.
    pub fn prices(&self, year: i32) -> Result<PriceTable> {
        self.store
            .resolve(year, false, self.extractor.as_ref(), self.prompt.as_ref())
    }

    /// Force-refresh one year, gated on the configured prompt. A declined
    /// prompt keeps the existing file and returns its content.
    pub fn refresh(&self, year: i32) -> Result<PriceTable> {
        self.store
            .resolve(year, true, self.extractor.as_ref(), self.prompt.as_ref())
    }

    /// Every cached year concatenated; never fetches.
    pub fn full_history(&self) -> Result<PriceTable> {
        history::load_folder(self.store.data_dir())
    }

    /// Return a reference to the underlying [`YearStore`] for advanced usage.
    pub fn store(&self) -> &YearStore {
        &self.store
    }
}

impl fmt::Display for OlivaSdk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "OlivaSdk(data_dir={})", self.store.data_dir().display())
    }
}
