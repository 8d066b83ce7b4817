//! Combined history: every year file on disk, concatenated.
//!
//! This is the "year 0" convenience of the entry point. It is deliberately a
//! separate collaborator from the store: it only reads what already exists
//! and never triggers a fetch.

use std::fs;
use std::path::Path;

use log::info;

use crate::error::Result;
use crate::models::PriceTable;
use crate::store;

/// Load and concatenate all CSV year files in `dir`, in file-name order.
/// An empty directory yields an empty table.
pub fn load_folder(dir: &Path) -> Result<PriceTable> {
    let mut paths: Vec<_> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.extension().map(|ext| ext == "csv").unwrap_or(false))
        .collect();
    paths.sort();

    let mut tables = Vec::with_capacity(paths.len());
    for path in &paths {
        tables.push(store::read_table(path)?);
    }
    info!("combined {} year files from {}", tables.len(), dir.display());
    PriceTable::concat(tables)
}
