use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FtlError {
    #[error("unknown airport: {0}")]
    UnknownAirport(String),

    #[error("invalid time value: {0}")]
    InvalidTime(String),

    #[error("local time {time} does not exist at {airport}")]
    NonexistentLocalTime { time: String, airport: String },

    #[error("invalid value for {field}: {value}")]
    InvalidValue { field: &'static str, value: String },

    #[error(transparent)]
    Io(#[from] io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
