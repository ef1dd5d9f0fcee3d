use std::path::PathBuf;
use std::sync::mpsc::Sender;

/// A source file and the file that now stands in for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertedFile {
    pub source: PathBuf,
    pub output: PathBuf,
}

impl ConvertedFile {
    /// Whether a new file was produced (as opposed to an already compatible
    /// source being handed back).
    pub fn is_new(&self) -> bool {
        self.source != self.output
    }
}

/// Everything a batch produced. Failures are plain messages, one per file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchOutcome {
    pub converted: Vec<ConvertedFile>,
    pub errors: Vec<String>,
}

/// Events a batch reports while it runs.
///
/// Sent from worker threads. `Progress` arrives in input order before each
/// file is attempted, and exactly one `Complete` closes every batch. `Error`
/// is informational; `Complete` carries the authoritative error list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConversionEvent {
    Progress {
        file_name: String,
        index: usize,
        total: usize,
        percent: u8,
    },
    Error {
        file_name: String,
        message: String,
    },
    Complete(BatchOutcome),
}

/// Optional event channel. A listener that went away is not an error.
#[derive(Clone, Default)]
pub(super) struct Reporter {
    tx: Option<Sender<ConversionEvent>>,
}

impl Reporter {
    pub(super) fn new(tx: Option<Sender<ConversionEvent>>) -> Self {
        Self { tx }
    }

    fn emit(&self, event: ConversionEvent) {
        if let Some(tx) = &self.tx {
            let _ = tx.send(event);
        }
    }

    pub(super) fn progress(&self, file_name: &str, index: usize, total: usize) {
        let percent = if total == 0 {
            100
        } else {
            (index * 100 / total) as u8
        };
        self.emit(ConversionEvent::Progress {
            file_name: file_name.to_string(),
            index,
            total,
            percent,
        });
    }

    pub(super) fn error(&self, file_name: &str, message: &str) {
        self.emit(ConversionEvent::Error {
            file_name: file_name.to_string(),
            message: message.to_string(),
        });
    }

    pub(super) fn complete(&self, outcome: &BatchOutcome) {
        self.emit(ConversionEvent::Complete(outcome.clone()));
    }
}
