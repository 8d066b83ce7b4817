use chrono::NaiveDate;

use crate::error::{OlivaError, Result};

/// Parse a calendar date the way the source writes them: ISO first, then the
/// `DD/MM/YYYY` form used by the page's own date inputs.
pub fn parse_day(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(s, "%d/%m/%Y"))
        .ok()
}

// ---------------------------------------------------------------------------
// DateCell
// ---------------------------------------------------------------------------

/// A date cell is parsed, not yet parsed (as read from disk), or explicitly
/// absent. `Absent` is a marker, not a dropped row: consumers decide.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DateCell {
    Day(NaiveDate),
    Raw(String),
    Absent,
}

impl DateCell {
    pub fn as_day(&self) -> Option<NaiveDate> {
        match self {
            DateCell::Day(d) => Some(*d),
            _ => None,
        }
    }

    /// Resolve a `Raw` cell to `Day` or `Absent`. `Day` and `Absent` are
    /// already resolved and pass through unchanged.
    pub fn resolved(&self) -> DateCell {
        match self {
            DateCell::Raw(s) => match parse_day(s) {
                Some(d) => DateCell::Day(d),
                None => DateCell::Absent,
            },
            other => other.clone(),
        }
    }

    /// Field representation for the year-file format.
    pub fn to_field(&self) -> String {
        match self {
            DateCell::Day(d) => d.format("%Y-%m-%d").to_string(),
            DateCell::Raw(s) => s.clone(),
            DateCell::Absent => String::new(),
        }
    }
}

// ---------------------------------------------------------------------------
// PriceRow / PriceTable
// ---------------------------------------------------------------------------

/// One table row: a date cell plus one price cell per column, `None` marking
/// an absent price.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceRow {
    pub date: DateCell,
    pub prices: Vec<Option<f64>>,
}

/// The aligned result: price column names and an ordered sequence of rows.
/// Tables produced by the aligner have unique, strictly increasing dates.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PriceTable {
    pub columns: Vec<String>,
    pub rows: Vec<PriceRow>,
}

impl PriceTable {
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Rows usable by the analyses: a parsed date and every price present.
    pub fn complete_rows(&self) -> Vec<(NaiveDate, Vec<f64>)> {
        self.rows
            .iter()
            .filter_map(|row| {
                let date = row.date.as_day()?;
                let prices: Option<Vec<f64>> = row.prices.iter().copied().collect();
                prices.map(|p| (date, p))
            })
            .collect()
    }

    /// Copy keeping only rows whose parsed date lies in `[start, end]`.
    pub fn within_span(&self, start: NaiveDate, end: NaiveDate) -> PriceTable {
        let rows = self
            .rows
            .iter()
            .filter(|row| {
                row.date
                    .as_day()
                    .map(|d| d >= start && d <= end)
                    .unwrap_or(false)
            })
            .cloned()
            .collect();
        PriceTable {
            columns: self.columns.clone(),
            rows,
        }
    }

    /// Concatenate tables with identical column sets, in input order.
    pub fn concat(tables: Vec<PriceTable>) -> Result<PriceTable> {
        let mut iter = tables.into_iter();
        let Some(mut combined) = iter.next() else {
            return Ok(PriceTable::default());
        };
        for table in iter {
            if table.columns != combined.columns {
                return Err(OlivaError::Parse(format!(
                    "cannot combine tables with mismatched columns: {:?} vs {:?}",
                    combined.columns, table.columns
                )));
            }
            combined.rows.extend(table.rows);
        }
        Ok(combined)
    }
}
