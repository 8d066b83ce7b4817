//! Data model: raw chart points, named price series, and the aligned table.

pub mod series;
pub mod table;

pub use series::{PriceSeries, RawDataset, RawPoint};
pub use table::{parse_day, DateCell, PriceRow, PriceTable};
