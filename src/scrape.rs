//! Chart scraping: drive a headless Chrome session and read the price series
//! out of the page's client-side chart state.
//!
//! The chart data never appears in the served HTML, so an HTTP client cannot
//! reach it; the page has to run. Everything specific to the live page sits
//! behind [`ChartExtractor`] so the rest of the crate (and the tests) never
//! touch a browser.

use std::thread;
use std::time::Duration;

use chrono::NaiveDate;
use headless_chrome::{Browser, LaunchOptions, Tab};
use log::{debug, info, warn};

use crate::align;
use crate::config;
use crate::error::{OlivaError, Result};
use crate::models::{PriceSeries, PriceTable, RawDataset};

/// Injectable capability: a date range in, labeled series out.
pub trait ChartExtractor {
    fn extract(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<PriceSeries>>;
}

/// Fetch and align the price table for a date range.
///
/// Fails with a scrape error when the extractor finds no data for the range.
pub fn fetch_table(
    extractor: &dyn ChartExtractor,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<PriceTable> {
    let series = extractor.extract(start, end)?;
    let table = align::align(&series);
    if table.is_empty() {
        return Err(OlivaError::Scrape(format!(
            "no data returned for {start} to {end}"
        )));
    }
    Ok(table)
}

// ---------------------------------------------------------------------------
// BrowserExtractor
// ---------------------------------------------------------------------------

/// Attach scrape context to a failed browser call.
trait OrScrape<T> {
    fn or_scrape(self, context: &str) -> Result<T>;
}

impl<T, E: std::fmt::Display> OrScrape<T> for std::result::Result<T, E> {
    fn or_scrape(self, context: &str) -> Result<T> {
        self.map_err(|e| OlivaError::Scrape(format!("{context}: {e}")))
    }
}

/// Production [`ChartExtractor`]: one headless Chrome session per call,
/// torn down on every exit path when the `Browser` drops.
pub struct BrowserExtractor {
    pub url: String,
    /// Wait cap for any single element lookup.
    pub element_timeout: Duration,
    /// Cadence and cap of the redraw poll. The chart counts as settled once
    /// its point count is nonzero and unchanged across two consecutive polls.
    pub poll_interval: Duration,
    pub max_poll_attempts: u32,
}

impl BrowserExtractor {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            element_timeout: config::ELEMENT_TIMEOUT,
            poll_interval: config::POLL_INTERVAL,
            max_poll_attempts: config::MAX_POLL_ATTEMPTS,
        }
    }

    /// Clear a date input and type the new value in the page's `DD/MM/YYYY`
    /// format. The page re-validates on each change, hence the settle pause.
    fn enter_date(&self, tab: &Tab, selector: &str, date: NaiveDate) -> Result<()> {
        let field = tab
            .wait_for_element(selector)
            .or_scrape(&format!("find date field {selector}"))?;
        field
            .click()
            .or_scrape(&format!("focus date field {selector}"))?;
        field
            .call_js_fn("function() { this.value = ''; }", vec![], false)
            .or_scrape(&format!("clear date field {selector}"))?;
        tab.type_str(&date.format(config::INPUT_DATE_FORMAT).to_string())
            .or_scrape(&format!("type into date field {selector}"))?;
        thread::sleep(config::FIELD_SETTLE);
        Ok(())
    }

    /// Bounded poll against the chart's point count instead of a blind sleep.
    fn wait_for_redraw(&self, tab: &Tab) -> Result<()> {
        let mut last = -1i64;
        for attempt in 0..self.max_poll_attempts {
            thread::sleep(self.poll_interval);
            let count = self.point_count(tab)?;
            debug!("redraw poll {attempt}: {count} points");
            if count > 0 && count == last {
                return Ok(());
            }
            last = count;
        }
        Err(OlivaError::Scrape(format!(
            "chart did not settle after {} polls of {:?}",
            self.max_poll_attempts, self.poll_interval
        )))
    }

    fn point_count(&self, tab: &Tab) -> Result<i64> {
        let result = tab
            .evaluate(config::CHART_POINT_COUNT_JS, false)
            .or_scrape("query chart state")?;
        result
            .value
            .and_then(|v| v.as_i64())
            .ok_or_else(|| OlivaError::Scrape("chart state query returned no value".into()))
    }

    fn read_datasets(&self, tab: &Tab) -> Result<Vec<RawDataset>> {
        let result = tab
            .evaluate(config::CHART_DATASETS_JS, false)
            .or_scrape("read chart datasets")?;
        let json = result
            .value
            .and_then(|v| v.as_str().map(str::to_owned))
            .ok_or_else(|| OlivaError::Scrape("chart object missing from page".into()))?;
        serde_json::from_str(&json)
            .map_err(|e| OlivaError::Parse(format!("chart dataset JSON: {e}")))
    }
}

impl ChartExtractor for BrowserExtractor {
    fn extract(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<PriceSeries>> {
        let options = LaunchOptions::default_builder()
            .headless(true)
            .window_size(Some((1920, 1080)))
            .build()
            .or_scrape("build chrome launch options")?;
        let browser = Browser::new(options).or_scrape("launch chrome")?;
        let tab = browser.new_tab().or_scrape("open tab")?;
        tab.set_default_timeout(self.element_timeout);

        info!("scraping {} for {start} to {end}", self.url);
        tab.navigate_to(&self.url).or_scrape("navigate")?;
        tab.wait_until_navigated().or_scrape("load page")?;

        // Consent overlay: soft failure, log and continue without it.
        match tab.wait_for_element(config::CONSENT_REJECT_SELECTOR) {
            Ok(button) => {
                info!("consent overlay detected, dismissing");
                button.click().or_scrape("dismiss consent overlay")?;
                thread::sleep(config::OVERLAY_SETTLE);
            }
            Err(e) => warn!("no consent overlay to dismiss: {e}"),
        }

        let range_button = tab
            .wait_for_element(config::DATE_RANGE_BUTTON_SELECTOR)
            .or_scrape("find date-range button")?;
        range_button
            .scroll_into_view()
            .or_scrape("scroll to date-range button")?;
        range_button.click().or_scrape("open date-range picker")?;

        self.enter_date(&tab, config::START_DATE_INPUT_SELECTOR, start)?;
        self.enter_date(&tab, config::END_DATE_INPUT_SELECTOR, end)?;

        // Clicking a neutral area defocuses the inputs, which is what makes
        // the page apply the range.
        tab.find_element("body")
            .or_scrape("find page body")?
            .click()
            .or_scrape("commit date range")?;

        self.wait_for_redraw(&tab)?;

        let datasets = self.read_datasets(&tab)?;
        if datasets.len() != config::EXPECTED_SERIES {
            return Err(OlivaError::Scrape(format!(
                "expected {} chart series, found {}",
                config::EXPECTED_SERIES,
                datasets.len()
            )));
        }

        datasets
            .iter()
            .map(|d| align::parse_series(&d.label, &d.data))
            .collect()
    }
}
