//! Text layer for spicemerge.
//!
//! SPICE model libraries come from many vendors and many decades, so the bytes
//! on disk may be UTF-16, UTF-8 with or without a BOM, or plain Latin-1. This
//! crate turns those bytes into one canonical form:
//!
//! - [`encoding`] guesses the encoding of a whole file and decodes it strictly
//! - [`normalize`] transcodes to Latin-1 and collapses whitespace, blank lines
//!   and `+` continuation lines so every `.model` directive sits on one line
//!
//! # Example
//!
//! ```
//! use spicemerge_core::{TextEncoding, encoding, normalize};
//!
//! let bytes = b".model D1 D(IS=1n\r\n+ RS=4)\r\n";
//! let encoding = encoding::detect(bytes).unwrap_or(TextEncoding::Ascii);
//! let text = normalize::normalize(bytes, encoding).unwrap();
//!
//! assert_eq!(text, ".model D1 D(IS=1n RS=4)\n");
//! ```

pub mod encoding;
pub mod error;
pub mod normalize;

pub use encoding::TextEncoding;
pub use error::{Error, Result};
