// In crates/core-types/src/error.rs

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("candle sequence is not strictly ascending by open time at index {index}")]
    UnorderedCandles { index: usize },
}

pub type Result<T> = std::result::Result<T, Error>;
