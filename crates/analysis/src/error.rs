// In crates/analysis/src/error.rs

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error(
        "not enough history to analyze: the indicators need {required} candles but only {have} \
         are available; request a larger lookback"
    )]
    InsufficientHistory { required: usize, have: usize },
}

pub type Result<T> = std::result::Result<T, Error>;
