//! Deduplicating merge of SPICE model library trees.
//!
//! This crate provides:
//! - Model comparison by parameter completeness ([`compare`])
//! - Per-file deduplication with `_`-suffixed variants ([`ModelGroup`], [`merge`])
//! - Library tree scanning grouped by file name ([`scan_tree`])
//! - The full source-into-destination run ([`MergePipeline`]) with progress
//!   events and a [`MergeReport`]
//!
//! # Example
//!
//! ```
//! use spicemerge_merge::{ModelGroup, merge};
//! use spicemerge_parser::Model;
//!
//! let models = [
//!     ".model D1 D(IS=1n)",
//!     ".model D1 D(IS=1n RS=4)",
//!     ".model Q1 NPN(BF=100)",
//!     ".model Q1 NPN(BF=200)",
//! ]
//! .into_iter()
//! .map(|line| Model::parse(line).unwrap());
//!
//! let (group, _) = merge(ModelGroup::new(), models);
//!
//! assert_eq!(
//!     group.to_lines(),
//!     [
//!         ".model D1 D(IS=1n RS=4)",
//!         ".model Q1 NPN(BF=100)",
//!         ".model Q1_ NPN(BF=200)",
//!     ]
//! );
//! ```

pub mod compare;
pub mod config;
pub mod error;
pub mod group;
pub mod pipeline;
pub mod progress;
pub mod report;
pub mod scan;

pub use compare::{Comparison, compare};
pub use config::{DEFAULT_EXTENSIONS, MergeOptions, ScanOptions};
pub use error::{Error, Result};
pub use group::{MergeDecision, ModelGroup, merge};
pub use pipeline::MergePipeline;
pub use progress::{MessageLog, Progress, ProgressSink, Side, TracingSink};
pub use report::{GroupFailure, MergeReport, MergeSummary, WrittenFile};
pub use scan::{FileGroups, scan_tree};
