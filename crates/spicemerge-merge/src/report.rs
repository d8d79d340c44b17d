//! Merge run reporting.

use std::fmt;
use std::path::PathBuf;

use crate::error::Error;
use crate::group::MergeDecision;

/// Decision tallies for one merged file (or a whole run).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeSummary {
    /// Models whose name was seen for the first time.
    pub inserted: usize,
    /// Duplicates dropped as identical.
    pub identical: usize,
    /// Retained models replaced by a more complete duplicate.
    pub replaced: usize,
    /// Duplicates dropped because the retained model was more complete.
    pub kept: usize,
    /// Conflicting duplicates kept as suffixed variants.
    pub variants: usize,
}

impl MergeSummary {
    pub fn record(&mut self, decision: MergeDecision) {
        match decision {
            MergeDecision::Inserted => self.inserted += 1,
            MergeDecision::Identical { .. } => self.identical += 1,
            MergeDecision::Replaced { .. } => self.replaced += 1,
            MergeDecision::Kept { .. } => self.kept += 1,
            MergeDecision::Variant { .. } => self.variants += 1,
        }
    }

    /// Total number of models considered.
    pub fn total(&self) -> usize {
        self.inserted + self.identical + self.replaced + self.kept + self.variants
    }

    /// Add another summary's counts to this one.
    pub fn absorb(&mut self, other: &MergeSummary) {
        self.inserted += other.inserted;
        self.identical += other.identical;
        self.replaced += other.replaced;
        self.kept += other.kept;
        self.variants += other.variants;
    }
}

impl FromIterator<MergeDecision> for MergeSummary {
    fn from_iter<I: IntoIterator<Item = MergeDecision>>(decisions: I) -> Self {
        let mut summary = Self::default();
        for decision in decisions {
            summary.record(decision);
        }
        summary
    }
}

impl fmt::Display for MergeSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} models: {} new, {} identical, {} replaced, {} kept, {} variants",
            self.total(),
            self.inserted,
            self.identical,
            self.replaced,
            self.kept,
            self.variants
        )
    }
}

/// A destination file rewritten by the merge.
#[derive(Debug, Clone)]
pub struct WrittenFile {
    pub path: PathBuf,
    /// Number of `.model` lines written.
    pub lines: usize,
    pub summary: MergeSummary,
}

/// A file whose group could not be (fully) merged.
#[derive(Debug)]
pub struct GroupFailure {
    /// Base filename shared by the group.
    pub group: String,
    /// File that failed.
    pub path: PathBuf,
    pub error: Error,
}

/// Outcome of a complete merge run.
#[derive(Debug, Default)]
pub struct MergeReport {
    /// Distinct file names found in the source tree.
    pub source_groups: usize,
    /// Distinct file names found in the destination tree.
    pub destination_groups: usize,
    pub written: Vec<WrittenFile>,
    pub failures: Vec<GroupFailure>,
}

impl MergeReport {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    /// Decision tallies across every written file.
    pub fn summary(&self) -> MergeSummary {
        let mut total = MergeSummary::default();
        for file in &self.written {
            total.absorb(&file.summary);
        }
        total
    }

    /// Format as human-readable text.
    pub fn to_text(&self) -> String {
        let mut out = String::new();

        out.push_str(&format!(
            "Merge Report: {} source / {} destination file names\n",
            self.source_groups, self.destination_groups
        ));
        out.push_str(&format!(
            "Status: {}\n",
            if self.is_success() { "OK" } else { "FAILED" }
        ));
        out.push_str(&format!(
            "Files written: {} ({})\n",
            self.written.len(),
            self.summary()
        ));

        for file in &self.written {
            out.push_str(&format!(
                "  {}: {} lines [{}]\n",
                file.path.display(),
                file.lines,
                file.summary
            ));
        }

        if !self.is_success() {
            out.push_str("\nFailures:\n");
            for failure in &self.failures {
                out.push_str(&format!(
                    "  - {} ({}): {}\n",
                    failure.group,
                    failure.path.display(),
                    failure.error
                ));
            }
        }

        out
    }
}
