use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::mpsc::Sender;

use tracing::{error, info, warn};

use crate::codec::{CodecProvider, MetadataProvider};
use crate::config::ConversionSettings;
use crate::library::display_name;

use super::ConversionError;
use super::events::{BatchOutcome, ConversionEvent, ConvertedFile, Reporter};
use super::job::convert_file_sync;
use super::output::converted_dir_for;
use super::pool::{DEFAULT_POOL_DEPTH, JobHandle, PoolError, WorkerPool};

/// Runs conversions on a bounded pool.
///
/// Every entry point is one pool task. Batches walk their inputs one after
/// another inside that task; only separate calls run side by side.
pub struct ConversionEngine {
    pool: WorkerPool,
    codec: Arc<dyn CodecProvider>,
    metadata: Arc<dyn MetadataProvider>,
}

impl ConversionEngine {
    pub fn new(codec: Arc<dyn CodecProvider>, metadata: Arc<dyn MetadataProvider>) -> Self {
        Self::with_depth(DEFAULT_POOL_DEPTH, codec, metadata)
    }

    pub fn with_depth(
        depth: usize,
        codec: Arc<dyn CodecProvider>,
        metadata: Arc<dyn MetadataProvider>,
    ) -> Self {
        Self {
            pool: WorkerPool::new(depth),
            codec,
            metadata,
        }
    }

    pub fn convert_file(
        &self,
        input: PathBuf,
        settings: &ConversionSettings,
    ) -> Result<JobHandle<Result<Option<PathBuf>, ConversionError>>, PoolError> {
        let settings = settings.clone();
        let codec = self.codec.clone();
        let metadata = self.metadata.clone();
        self.pool.submit(move || {
            convert_file_sync(&input, &settings, codec.as_ref(), metadata.as_ref())
        })
    }

    pub fn convert_files(
        &self,
        inputs: Vec<PathBuf>,
        settings: &ConversionSettings,
        events: Option<Sender<ConversionEvent>>,
    ) -> Result<JobHandle<BatchOutcome>, PoolError> {
        let batch = self.batch(settings, events);
        self.pool.submit(move || batch.run(&inputs))
    }

    /// Convert each input into a `<parent>-converted` directory next to its
    /// parent. A group whose directory cannot be created fails on its own.
    pub fn convert_files_with_auto_directory(
        &self,
        inputs: Vec<PathBuf>,
        settings: &ConversionSettings,
        events: Option<Sender<ConversionEvent>>,
    ) -> Result<JobHandle<BatchOutcome>, PoolError> {
        let batch = self.batch(settings, events);
        self.pool.submit(move || batch.run_grouped(&inputs))
    }

    /// Let running work finish and refuse anything new.
    pub fn shutdown(&self) {
        self.pool.shutdown();
    }

    fn batch(&self, settings: &ConversionSettings, events: Option<Sender<ConversionEvent>>) -> Batch {
        Batch {
            settings: settings.clone(),
            codec: self.codec.clone(),
            metadata: self.metadata.clone(),
            reporter: Reporter::new(events),
        }
    }
}

/// State one batch task carries onto its worker.
struct Batch {
    settings: ConversionSettings,
    codec: Arc<dyn CodecProvider>,
    metadata: Arc<dyn MetadataProvider>,
    reporter: Reporter,
}

impl Batch {
    fn run(&self, inputs: &[PathBuf]) -> BatchOutcome {
        let mut outcome = BatchOutcome::default();
        for (index, input) in inputs.iter().enumerate() {
            self.convert_one(input, index, inputs.len(), &self.settings, &mut outcome);
        }
        self.finish(outcome)
    }

    fn run_grouped(&self, inputs: &[PathBuf]) -> BatchOutcome {
        let total = inputs.len();
        let mut outcome = BatchOutcome::default();
        let mut index = 0;

        for (dir, files) in group_by_parent(inputs) {
            let settings = match prepare_group_dir(&dir) {
                Ok(out_dir) => ConversionSettings {
                    output_directory: Some(out_dir),
                    ..self.settings.clone()
                },
                Err(e) => {
                    warn!(dir = %dir.display(), error = %e, "skipping group");
                    for file in &files {
                        self.fail(file, &e.to_string(), &mut outcome);
                        index += 1;
                    }
                    continue;
                }
            };

            for file in &files {
                self.convert_one(file, index, total, &settings, &mut outcome);
                index += 1;
            }
        }
        self.finish(outcome)
    }

    fn convert_one(
        &self,
        input: &Path,
        index: usize,
        total: usize,
        settings: &ConversionSettings,
        outcome: &mut BatchOutcome,
    ) {
        self.reporter.progress(&display_name(input), index, total);
        match convert_file_sync(input, settings, self.codec.as_ref(), self.metadata.as_ref()) {
            Ok(Some(output)) => outcome.converted.push(ConvertedFile {
                source: input.to_path_buf(),
                output,
            }),
            Ok(None) => {}
            Err(e) => self.fail(input, &e.to_string(), outcome),
        }
    }

    fn fail(&self, input: &Path, message: &str, outcome: &mut BatchOutcome) {
        let name = display_name(input);
        error!(file = %name, error = %message, "conversion failed");
        self.reporter.error(&name, message);
        outcome.errors.push(format!("{name}: {message}"));
    }

    fn finish(&self, outcome: BatchOutcome) -> BatchOutcome {
        info!(
            converted = outcome.converted.len(),
            failed = outcome.errors.len(),
            "batch complete"
        );
        self.reporter.complete(&outcome);
        outcome
    }
}

/// Inputs grouped by parent directory, groups in order of first appearance.
fn group_by_parent(inputs: &[PathBuf]) -> Vec<(PathBuf, Vec<PathBuf>)> {
    let mut groups: Vec<(PathBuf, Vec<PathBuf>)> = Vec::new();
    for input in inputs {
        let parent = input.parent().map(Path::to_path_buf).unwrap_or_default();
        match groups.iter_mut().find(|(dir, _)| *dir == parent) {
            Some((_, files)) => files.push(input.clone()),
            None => groups.push((parent, vec![input.clone()])),
        }
    }
    groups
}

fn prepare_group_dir(dir: &Path) -> Result<PathBuf, ConversionError> {
    let out_dir = converted_dir_for(dir).ok_or_else(|| ConversionError::OutputDir {
        path: dir.to_path_buf(),
        source: std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            "directory has no name to derive an output directory from",
        ),
    })?;
    fs::create_dir_all(&out_dir).map_err(|source| ConversionError::OutputDir {
        path: out_dir.clone(),
        source,
    })?;
    Ok(out_dir)
}
