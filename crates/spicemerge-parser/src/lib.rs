//! `.model` directive parser for spicemerge.
//!
//! Parses one normalized library line into a [`Model`]: an upper-cased name,
//! a device kind tag and an ordered parameter list. Parameter values are kept
//! as opaque text, so a parsed model serializes back to the same definition.
//!
//! # Example
//!
//! ```
//! use spicemerge_parser::Model;
//!
//! let model = Model::parse(".model D1N914 D(IS=2.52n RS=.568 N=1.752)").unwrap();
//!
//! assert_eq!(model.name(), "D1N914");
//! assert_eq!(model.kind(), "D");
//! assert_eq!(model.param("rs"), Some("RS=.568"));
//! assert_eq!(model.definition(), "D(IS=2.52n RS=.568 N=1.752)");
//! ```

pub mod error;
pub mod model;

pub use error::{Error, Result};
pub use model::{Model, latin1_uppercase};
