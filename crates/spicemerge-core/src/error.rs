//! Error types for spicemerge-core.

use thiserror::Error;

use crate::encoding::TextEncoding;

#[derive(Debug, Error)]
pub enum Error {
    #[error("no supported text encoding matched the input")]
    EncodingUndetected,

    #[error("input is not valid {encoding}")]
    Malformed { encoding: TextEncoding },

    #[error("character U+{code_point:04X} at offset {offset} has no Latin-1 mapping")]
    UnmappableCharacter { code_point: u32, offset: usize },
}

pub type Result<T> = std::result::Result<T, Error>;
