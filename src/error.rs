use thiserror::Error;

#[derive(Error, Debug)]
pub enum StatsError {
    #[error("at least one year must be requested")]
    NoYearsRequested,

    #[error("report for {year} cancelled before it started")]
    Cancelled { year: i32 },

    #[error("worker for {year} panicked")]
    Worker { year: i32 },

    #[error("leg source error: {0}")]
    Source(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("config error: {0}")]
    Config(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, StatsError>;
