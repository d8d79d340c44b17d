//! Merge run configuration.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Library file extensions merged by default.
pub const DEFAULT_EXTENSIONS: [&str; 4] = ["bjt", "dio", "jft", "mos"];

/// Which files take part in a merge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanOptions {
    /// Accepted extensions, lower case, without the leading dot.
    pub extensions: Vec<String>,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self::with_extensions(DEFAULT_EXTENSIONS)
    }
}

impl ScanOptions {
    /// Build options from user-supplied extensions (`.MOS`, `mos`, ...).
    pub fn with_extensions<I, S>(extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut options = Self {
            extensions: extensions
                .into_iter()
                .map(|ext| ext.as_ref().to_owned())
                .collect(),
        };
        options.normalize();
        options
    }

    /// Whether `path` has one of the accepted extensions (case-insensitive).
    ///
    /// Only the text after the last dot counts, so `foo.bjt.bak` is rejected.
    pub fn accepts(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| {
                let ext = ext.to_lowercase();
                self.extensions.iter().any(|accepted| *accepted == ext)
            })
    }

    fn normalize(&mut self) {
        for ext in &mut self.extensions {
            *ext = ext.trim().trim_start_matches('.').to_lowercase();
        }
        let mut seen = HashSet::new();
        self.extensions
            .retain(|ext| !ext.is_empty() && seen.insert(ext.clone()));
    }
}

/// Complete configuration for a merge run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MergeOptions {
    /// File selection.
    pub scan: ScanOptions,
    /// Process independent file groups on the rayon thread pool.
    pub parallel: bool,
}

impl MergeOptions {
    /// Parse options from TOML text. Missing fields keep their defaults.
    ///
    /// ```
    /// use spicemerge_merge::MergeOptions;
    ///
    /// let options = MergeOptions::from_toml_str(
    ///     "parallel = true\n[scan]\nextensions = [\".LIB\", \"mod\"]\n",
    /// )
    /// .unwrap();
    ///
    /// assert!(options.parallel);
    /// assert_eq!(options.scan.extensions, ["lib", "mod"]);
    /// ```
    pub fn from_toml_str(input: &str) -> Result<Self> {
        let mut options: Self = toml::from_str(input)?;
        options.scan.normalize();
        Ok(options)
    }

    /// Load options from a TOML file.
    pub fn from_toml_file(path: &Path) -> Result<Self> {
        let input = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        Self::from_toml_str(&input)
    }
}
