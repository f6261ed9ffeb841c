// Copyright (c) 2026 rezky_nightky

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid {flag}: {value} (allowed: {expected})")]
    InvalidValue {
        flag: &'static str,
        value: String,
        expected: String,
    },

    #[error("failed to apply {flag} {value} (min {min} max {max})")]
    OutOfRange {
        flag: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Startup validation failures, reported before the terminal is touched.
    pub fn is_usage(&self) -> bool {
        matches!(self, Error::InvalidValue { .. } | Error::OutOfRange { .. })
    }
}

pub type Result<T> = std::result::Result<T, Error>;
