use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, MetricsError>;

#[derive(Error, Debug)]
pub enum MetricsError {
    #[error("input file not found: {}", .0.display())]
    InputNotFound(PathBuf),

    #[error("data format error: {0}")]
    DataFormat(String),

    #[error("cannot parse {column} value {value:?} as a date")]
    DateParse { column: &'static str, value: String },

    #[error("no rows left to aggregate: {0}")]
    EmptyDataset(&'static str),

    #[error("division by zero computing {metric}: {denominator} is zero")]
    DivisionByZero {
        metric: &'static str,
        denominator: &'static str,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
}
