//! Progress events emitted during a merge run.

use std::fmt;
use std::path::PathBuf;
use std::sync::{Mutex, PoisonError};

use tracing::{info, warn};

/// Which library tree an event refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Source,
    Destination,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Source => f.write_str("Source"),
            Side::Destination => f.write_str("Destination"),
        }
    }
}

/// One step of a merge run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Progress {
    ScanStarted { side: Side, root: PathBuf },
    ScanFinished { side: Side, files: usize },
    ProcessingFile { path: PathBuf },
    WritingFile { path: PathBuf },
    GroupFailed { group: String, error: String },
}

impl fmt::Display for Progress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Progress::ScanStarted { side, root } => {
                write!(f, "- Scanning {side} folder {}", root.display())
            }
            Progress::ScanFinished { side, files } => {
                write!(f, "- Found {files} files in {side} folder")
            }
            Progress::ProcessingFile { path } => {
                write!(f, "- Processing file {}", path.display())
            }
            Progress::WritingFile { path } => {
                write!(f, "- Writing merged result to file {}", path.display())
            }
            Progress::GroupFailed { group, error } => {
                write!(f, "- Failed to merge {group}: {error}")
            }
        }
    }
}

/// Receiver for progress events.
///
/// Called synchronously from the pipeline, possibly from several threads when
/// groups run in parallel; implementations must return quickly.
pub trait ProgressSink: Sync {
    fn report(&self, event: &Progress);
}

impl<F> ProgressSink for F
where
    F: Fn(&Progress) + Sync,
{
    fn report(&self, event: &Progress) {
        self(event)
    }
}

/// Forwards events to `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl ProgressSink for TracingSink {
    fn report(&self, event: &Progress) {
        match event {
            Progress::GroupFailed { .. } => warn!("{event}"),
            _ => info!("{event}"),
        }
    }
}

/// Keeps every event as a rendered message, in arrival order.
#[derive(Debug, Default)]
pub struct MessageLog {
    messages: Mutex<Vec<String>>,
}

impl MessageLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the messages received so far.
    pub fn messages(&self) -> Vec<String> {
        self.messages
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl ProgressSink for MessageLog {
    fn report(&self, event: &Progress) {
        self.messages
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_keep_order() {
        let log = MessageLog::new();
        log.report(&Progress::ScanStarted {
            side: Side::Source,
            root: PathBuf::from("lib"),
        });
        log.report(&Progress::ScanFinished {
            side: Side::Source,
            files: 4,
        });

        assert_eq!(
            log.messages(),
            ["- Scanning Source folder lib", "- Found 4 files in Source folder"]
        );
    }

    #[test]
    fn test_closure_sink() {
        let count = std::sync::atomic::AtomicUsize::new(0);
        let sink = |_: &Progress| {
            count.fetch_add(1, std::sync::atomic::Ordering::Relaxed);
        };
        sink.report(&Progress::WritingFile {
            path: PathBuf::from("a.dio"),
        });
        assert_eq!(count.into_inner(), 1);
    }
}
