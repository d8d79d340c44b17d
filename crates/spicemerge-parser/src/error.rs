//! Error types for spicemerge-parser.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("invalid model line: {reason}")]
    InvalidModelLine { reason: &'static str },
}

pub type Result<T> = std::result::Result<T, Error>;
