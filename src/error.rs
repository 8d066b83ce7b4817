#[derive(Debug, thiserror::Error)]
pub enum OlivaError {
    #[error("no data available for year {year}; supported years are {min}-{max}")]
    InvalidYear { year: i32, min: i32, max: i32 },

    #[error("scrape failed: {0}")]
    Scrape(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("analysis error: {0}")]
    Analysis(String),

    #[error("plot error: {0}")]
    Plot(String),
}

pub type Result<T> = std::result::Result<T, OlivaError>;
