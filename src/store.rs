//! Year-file store: one flat CSV per calendar year, file presence as a cache.
//!
//! A year is only ever fetched when its file does not exist, or when the
//! caller forces a refresh and the caller-supplied prompt confirms it. Files
//! are never mutated in place, only fully rewritten.

use std::fs;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use log::info;

use crate::config;
use crate::error::{OlivaError, Result};
use crate::models::{DateCell, PriceRow, PriceTable};
use crate::scrape::{self, ChartExtractor};

// ---------------------------------------------------------------------------
// RedownloadPrompt
// ---------------------------------------------------------------------------

/// Caller-supplied decision for overwriting an existing year file.
///
/// The store never reads the terminal itself; the binary passes
/// [`StdinPrompt`], tests pass a closure.
pub trait RedownloadPrompt {
    fn confirm(&self, path: &Path) -> bool;
}

impl<F: Fn(&Path) -> bool> RedownloadPrompt for F {
    fn confirm(&self, path: &Path) -> bool {
        self(path)
    }
}

/// Interactive confirmation on standard input. Accepts the Spanish and
/// English affirmatives the source audience actually types.
pub struct StdinPrompt;

impl RedownloadPrompt for StdinPrompt {
    fn confirm(&self, path: &Path) -> bool {
        print!("{} already exists. Download it again? [y/N] ", path.display());
        let _ = io::stdout().flush();
        let mut answer = String::new();
        if io::stdin().lock().read_line(&mut answer).is_err() {
            return false;
        }
        matches!(
            answer.trim().to_lowercase().as_str(),
            "y" | "yes" | "s" | "si" | "sí"
        )
    }
}

// ---------------------------------------------------------------------------
// YearStore
// ---------------------------------------------------------------------------

/// Maps years to canonical CSV paths and decides cache hit vs. fetch.
pub struct YearStore {
    data_dir: PathBuf,
    min_year: i32,
    max_year: i32,
}

impl YearStore {
    /// Create a store rooted at `data_dir`, creating the directory if needed.
    pub fn new(data_dir: PathBuf, min_year: i32, max_year: i32) -> Result<Self> {
        fs::create_dir_all(&data_dir)?;
        Ok(Self {
            data_dir,
            min_year,
            max_year,
        })
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Canonical file path for one year of prices.
    pub fn year_path(&self, year: i32) -> PathBuf {
        self.data_dir.join(config::year_file_name(year))
    }

    /// Return the table for `year`, fetching and persisting it on a miss.
    ///
    /// The year window is checked before anything else: an out-of-window year
    /// fails with `InvalidYear` without any browser activity. With
    /// `force_redownload`, an existing file is only replaced after the prompt
    /// confirms; a declined prompt returns the existing content.
    pub fn resolve(
        &self,
        year: i32,
        force_redownload: bool,
        extractor: &dyn ChartExtractor,
        prompt: &dyn RedownloadPrompt,
    ) -> Result<PriceTable> {
        if year < self.min_year || year > self.max_year {
            return Err(OlivaError::InvalidYear {
                year,
                min: self.min_year,
                max: self.max_year,
            });
        }

        let path = self.year_path(year);
        if path.exists() {
            if force_redownload && prompt.confirm(&path) {
                info!("re-downloading data for year {year}");
                let table = self.fetch_year(year, extractor)?;
                write_table(&path, &table)?;
                return Ok(table);
            }
            info!("loading cached year file {}", path.display());
            return read_table(&path);
        }

        info!("downloading data for year {year}");
        let table = self.fetch_year(year, extractor)?;
        write_table(&path, &table)?;
        Ok(table)
    }

    /// Fetch the full calendar year and drop any stray rows outside it.
    fn fetch_year(&self, year: i32, extractor: &dyn ChartExtractor) -> Result<PriceTable> {
        let (start, end) = calendar_year_span(year)?;
        let table = scrape::fetch_table(extractor, start, end)?;
        Ok(table.within_span(start, end))
    }
}

fn calendar_year_span(year: i32) -> Result<(NaiveDate, NaiveDate)> {
    let start = NaiveDate::from_ymd_opt(year, 1, 1);
    let end = NaiveDate::from_ymd_opt(year, 12, 31);
    match (start, end) {
        (Some(start), Some(end)) => Ok((start, end)),
        _ => Err(OlivaError::Parse(format!("year {year} out of calendar range"))),
    }
}

// ---------------------------------------------------------------------------
// Year-file format
// ---------------------------------------------------------------------------

/// Write a table as a year file: `Fecha` plus one column per series, dates
/// ISO, absent cells empty.
pub fn write_table(path: &Path, table: &PriceTable) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut writer = csv::Writer::from_path(path)?;

    let mut header = Vec::with_capacity(table.columns.len() + 1);
    header.push(config::DATE_COLUMN.to_string());
    header.extend(table.columns.iter().cloned());
    writer.write_record(&header)?;

    for row in &table.rows {
        let mut record = Vec::with_capacity(header.len());
        record.push(row.date.to_field());
        for price in &row.prices {
            record.push(price.map(|p| p.to_string()).unwrap_or_default());
        }
        writer.write_record(&record)?;
    }
    writer.flush()?;
    info!("saved {} rows to {}", table.len(), path.display());
    Ok(())
}

/// Read a year file back. Date cells come back raw (unparsed) and empty price
/// cells come back as the absent marker; malformed prices are a parse error.
pub fn read_table(path: &Path) -> Result<PriceTable> {
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_path(path)?;
    let headers = reader.headers()?.clone();

    let mut header_iter = headers.iter();
    if header_iter.next() != Some(config::DATE_COLUMN) {
        return Err(OlivaError::Parse(format!(
            "{} does not start with a {} column",
            path.display(),
            config::DATE_COLUMN
        )));
    }
    let columns: Vec<String> = header_iter.map(String::from).collect();
    let width = columns.len();

    let mut table = PriceTable::new(columns);
    for record in reader.records() {
        let record = record?;
        let mut fields = record.iter();

        let date = match fields.next().unwrap_or("") {
            "" => DateCell::Absent,
            raw => DateCell::Raw(raw.to_string()),
        };

        let mut prices = Vec::with_capacity(width);
        for field in fields.take(width) {
            if field.is_empty() {
                prices.push(None);
            } else {
                let value = field.parse::<f64>().map_err(|_| {
                    OlivaError::Parse(format!(
                        "malformed price {field:?} in {}",
                        path.display()
                    ))
                })?;
                prices.push(Some(value));
            }
        }
        // Tolerate short records; the missing cells are absent values.
        while prices.len() < width {
            prices.push(None);
        }

        table.rows.push(PriceRow { date, prices });
    }
    Ok(table)
}
