//! Library tree discovery.

use std::cmp::Ordering;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use tracing::{debug, warn};
use walkdir::{DirEntry, WalkDir};

use crate::config::ScanOptions;
use crate::error::{Error, Result};

/// Library files grouped by base filename, in discovery order.
pub type FileGroups = IndexMap<String, Vec<PathBuf>>;

/// Walk `root` depth-first and group accepted files by base filename.
///
/// Within a directory, files come before subdirectories and both are visited
/// in name order. Symbolic links are followed; entries that cannot be read
/// (including link cycles) are logged and skipped.
pub fn scan_tree(root: &Path, options: &ScanOptions) -> Result<FileGroups> {
    if !root.is_dir() {
        return Err(Error::RootNotFound(root.to_path_buf()));
    }
    let root = std::path::absolute(root).map_err(|e| Error::io(root, e))?;

    let mut groups = FileGroups::new();
    let walker = WalkDir::new(&root)
        .follow_links(true)
        .sort_by(files_first);

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                warn!("Skipping unreadable entry under {}: {}", root.display(), err);
                continue;
            }
        };

        if !entry.file_type().is_file() || !options.accepts(entry.path()) {
            continue;
        }

        let Some(name) = entry.file_name().to_str() else {
            warn!("Skipping non UTF-8 file name {}", entry.path().display());
            continue;
        };

        debug!("Found library file {}", entry.path().display());
        groups
            .entry(name.to_owned())
            .or_default()
            .push(entry.into_path());
    }

    Ok(groups)
}

fn files_first(a: &DirEntry, b: &DirEntry) -> Ordering {
    a.file_type()
        .is_dir()
        .cmp(&b.file_type().is_dir())
        .then_with(|| a.file_name().cmp(b.file_name()))
}
