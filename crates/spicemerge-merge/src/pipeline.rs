//! End-to-end merge of a source library tree into a destination tree.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use spicemerge_core::encoding::{self, TextEncoding};
use spicemerge_core::normalize::{encode_latin1, normalize};
use spicemerge_parser::Model;
use tempfile::NamedTempFile;
use tracing::{debug, trace};

use crate::config::MergeOptions;
use crate::error::{Error, Result};
use crate::group::{ModelGroup, merge};
use crate::progress::{Progress, ProgressSink, Side};
use crate::report::{GroupFailure, MergeReport, MergeSummary, WrittenFile};
use crate::scan::{FileGroups, scan_tree};

/// Merges every source file group into the destination files of the same name.
#[derive(Debug, Clone, Default)]
pub struct MergePipeline {
    options: MergeOptions,
}

/// Result of processing one source group.
#[derive(Default)]
struct GroupOutcome {
    written: Vec<WrittenFile>,
    failures: Vec<GroupFailure>,
}

impl MergePipeline {
    pub fn new(options: MergeOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &MergeOptions {
        &self.options
    }

    /// Scan both trees and rewrite each destination file that has a source
    /// counterpart with the merged, sorted model set.
    ///
    /// Only a missing or unreadable root aborts the run. Per-file failures are
    /// collected in the returned report.
    pub fn run(
        &self,
        source: &Path,
        destination: &Path,
        sink: &dyn ProgressSink,
    ) -> Result<MergeReport> {
        let source_groups = self.scan(Side::Source, source, sink)?;
        let destination_groups = self.scan(Side::Destination, destination, sink)?;

        let process = |(name, sources): (&String, &Vec<PathBuf>)| {
            let targets = destination_groups
                .get(name)
                .map(Vec::as_slice)
                .unwrap_or(&[]);
            process_group(name, sources, targets, sink)
        };

        let outcomes: Vec<GroupOutcome> = if self.options.parallel {
            let groups: Vec<_> = source_groups.iter().collect();
            groups.into_par_iter().map(process).collect()
        } else {
            source_groups.iter().map(process).collect()
        };

        let mut report = MergeReport {
            source_groups: source_groups.len(),
            destination_groups: destination_groups.len(),
            ..Default::default()
        };
        for outcome in outcomes {
            report.written.extend(outcome.written);
            report.failures.extend(outcome.failures);
        }
        Ok(report)
    }

    fn scan(&self, side: Side, root: &Path, sink: &dyn ProgressSink) -> Result<FileGroups> {
        sink.report(&Progress::ScanStarted {
            side,
            root: root.to_path_buf(),
        });
        let groups = scan_tree(root, &self.options.scan)?;
        sink.report(&Progress::ScanFinished {
            side,
            files: groups.len(),
        });
        Ok(groups)
    }
}

fn process_group(
    name: &str,
    sources: &[PathBuf],
    targets: &[PathBuf],
    sink: &dyn ProgressSink,
) -> GroupOutcome {
    let mut outcome = GroupOutcome::default();
    let fail = |path: &Path, error: Error, outcome: &mut GroupOutcome| {
        sink.report(&Progress::GroupFailed {
            group: name.to_owned(),
            error: error.to_string(),
        });
        outcome.failures.push(GroupFailure {
            group: name.to_owned(),
            path: path.to_path_buf(),
            error,
        });
    };

    let mut source_text = String::new();
    for path in sources {
        sink.report(&Progress::ProcessingFile { path: path.clone() });
        match read_normalized(path) {
            Ok(text) => source_text.push_str(&text),
            Err(error) => {
                // Without the complete source set the merge would drop models.
                fail(path, error, &mut outcome);
                return outcome;
            }
        }
    }

    for path in targets {
        match merge_into(&source_text, path, sink) {
            Ok(written) => outcome.written.push(written),
            Err(error) => fail(path, error, &mut outcome),
        }
    }

    outcome
}

/// Read a library file and normalize it to one `.model` per line.
fn read_normalized(path: &Path) -> Result<String> {
    let bytes = fs::read(path).map_err(|e| Error::io(path, e))?;
    let encoding = encoding::detect(&bytes).unwrap_or_else(|| {
        debug!("No encoding matched {}, assuming ASCII", path.display());
        TextEncoding::Ascii
    });
    trace!("Decoding {} as {}", path.display(), encoding);
    normalize(&bytes, encoding).map_err(|e| Error::text(path, e))
}

fn merge_into(source_text: &str, target: &Path, sink: &dyn ProgressSink) -> Result<WrittenFile> {
    let mut text = source_text.to_owned();
    text.push_str(&read_normalized(target)?);

    let models = text.split('\n').filter_map(|line| {
        Model::parse(line)
            .inspect_err(|err| trace!("Skipping line {:?}: {}", line, err))
            .ok()
    });
    let (group, decisions) = merge(ModelGroup::new(), models);
    let summary: MergeSummary = decisions.into_iter().collect();
    let lines = group.to_lines();

    sink.report(&Progress::WritingFile {
        path: target.to_path_buf(),
    });
    write_lines(target, &lines)?;
    debug!("{}: {}", target.display(), summary);

    Ok(WrittenFile {
        path: target.to_path_buf(),
        lines: lines.len(),
        summary,
    })
}

/// Replace `path` with `lines`, Latin-1 encoded, each followed by `\n`.
///
/// The content goes to a temporary file in the same directory which is then
/// renamed over the target, so readers never see a partial file.
fn write_lines(path: &Path, lines: &[String]) -> Result<()> {
    let mut text = String::with_capacity(lines.iter().map(|l| l.len() + 1).sum());
    for line in lines {
        text.push_str(line);
        text.push('\n');
    }
    let bytes = encode_latin1(&text).map_err(|e| Error::text(path, e))?;

    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    let mut file = NamedTempFile::new_in(dir).map_err(|e| Error::io(path, e))?;
    file.write_all(&bytes).map_err(|e| Error::io(path, e))?;
    file.as_file().sync_all().map_err(|e| Error::io(path, e))?;

    if let Ok(metadata) = fs::metadata(path) {
        fs::set_permissions(file.path(), metadata.permissions())
            .map_err(|e| Error::io(path, e))?;
    }

    file.persist(path).map_err(|e| Error::io(path, e.error))?;
    Ok(())
}
