//! # spicemerge
//!
//! Merge and deduplicate SPICE `.model` libraries.
//!
//! spicemerge provides:
//! - Encoding detection and text normalization for library files
//! - `.model` line parsing with case-insensitive parameter lookup
//! - Completeness-based deduplication of same-name models
//! - A pipeline that merges a source library tree into a destination tree
//!
//! ## Quick Start
//!
//! ```rust
//! use spicemerge::prelude::*;
//!
//! let text = normalize_text(".model D1 D(IS=1n)\r\n.model D1 D(IS=1n\r\n+ RS=4)\r\n");
//! let models = text.lines().filter_map(|line| Model::parse(line).ok());
//! let (group, decisions) = merge(ModelGroup::new(), models);
//!
//! assert_eq!(decisions[1], MergeDecision::Replaced { index: 0 });
//! assert_eq!(group.to_lines(), [".model D1 D(IS=1n RS=4)"]);
//! ```
//!
//! ## Merging Library Trees
//!
//! ```rust,no_run
//! use spicemerge::prelude::*;
//! use std::path::Path;
//!
//! let pipeline = MergePipeline::new(MergeOptions::default());
//! let report = pipeline.run(Path::new("vendor"), Path::new("local"), &TracingSink)?;
//! println!("{}", report.to_text());
//! # Ok::<(), spicemerge::MergeError>(())
//! ```

// Re-export member crates
pub use spicemerge_core as core;
pub use spicemerge_merge as merger;
pub use spicemerge_parser as parser;

// ============================================================================
// Convenient re-exports from spicemerge_core
// ============================================================================

pub use spicemerge_core::encoding::{decode, detect, detect_or_default};
pub use spicemerge_core::normalize::{encode_latin1, normalize, normalize_text};
pub use spicemerge_core::{Error as TextError, TextEncoding};

// ============================================================================
// Convenient re-exports from spicemerge_parser
// ============================================================================

pub use spicemerge_parser::{Error as ParseError, Model};

// ============================================================================
// Convenient re-exports from spicemerge_merge
// ============================================================================

pub use spicemerge_merge::{
    Comparison, Error as MergeError, GroupFailure, MergeDecision, MergeOptions, MergePipeline,
    MergeReport, MergeSummary, MessageLog, ModelGroup, Progress, ProgressSink, ScanOptions, Side,
    TracingSink, WrittenFile, compare, merge, scan_tree,
};

/// Prelude module containing commonly used types and functions.
///
/// ```rust
/// use spicemerge::prelude::*;
/// ```
pub mod prelude {
    // Text
    pub use crate::{TextEncoding, detect, normalize, normalize_text};

    // Parser
    pub use crate::Model;

    // Merge
    pub use crate::{Comparison, MergeDecision, ModelGroup, compare, merge};

    // Pipeline
    pub use crate::{
        MergeOptions, MergePipeline, MergeReport, Progress, ProgressSink, ScanOptions,
        TracingSink,
    };
}
