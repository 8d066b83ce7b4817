//! Scrape-seam tests: the glue between an extractor and the aligner. The
//! browser-backed extractor itself needs a live page and is exercised by the
//! ignored end-to-end test at the bottom.

mod common;

use common::{sample_series_2023, StubExtractor};
use oliva_sdk::error::OlivaError;
use oliva_sdk::scrape::fetch_table;

fn jan(dom: u32) -> chrono::NaiveDate {
    common::day(2023, 1, dom)
}

#[test]
fn fetch_table_aligns_extracted_series() {
    let stub = StubExtractor::new(sample_series_2023());

    let table = fetch_table(&stub, jan(1), jan(31)).unwrap();

    assert_eq!(
        table.columns,
        vec!["Precio Virgen extra", "Precio Virgen", "Precio Lampante"]
    );
    assert_eq!(table.len(), 3);
}

#[test]
fn empty_result_is_a_scrape_error() {
    let stub = StubExtractor::new(vec![]);

    let err = fetch_table(&stub, jan(1), jan(31)).unwrap_err();
    assert!(matches!(err, OlivaError::Scrape(_)), "got {err:?}");
}

/// Live scrape against the real page. Needs Chrome and network access:
///
/// ```sh
/// cargo test -- --ignored --nocapture
/// ```
#[test]
#[ignore]
fn live_page_yields_three_series() {
    use oliva_sdk::{BrowserExtractor, ChartExtractor};

    let extractor = BrowserExtractor::new(oliva_sdk::config::DEFAULT_URL);
    let series = extractor.extract(jan(1), jan(31)).unwrap();

    assert_eq!(series.len(), 3);
    for s in &series {
        assert!(!s.label.is_empty());
    }
}
