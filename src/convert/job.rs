use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::codec::{CodecProvider, MetadataProvider, TranscodeOutcome};
use crate::config::ConversionSettings;
use crate::format::{TargetSpec, extension_of, is_compatible, is_convertible};

use super::ConversionError;
use super::output::resolve_output_path;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum JobStatus {
    Pending,
    Running,
    Succeeded,
    Failed,
    Skipped,
}

/// One file moving through the conversion state machine.
#[derive(Debug, Clone)]
pub struct ConversionJob {
    pub input: PathBuf,
    pub output: Option<PathBuf>,
    pub status: JobStatus,
}

impl ConversionJob {
    pub fn new(input: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            output: None,
            status: JobStatus::Pending,
        }
    }

    /// Run the job to completion.
    ///
    /// Returns the file the caller should use from now on: the new output,
    /// the untouched input when it is already compatible, the existing
    /// output when one is already there, or `None` when the file is not
    /// audio we convert.
    pub fn run(
        &mut self,
        settings: &ConversionSettings,
        codec: &dyn CodecProvider,
        metadata: &dyn MetadataProvider,
    ) -> Result<Option<PathBuf>, ConversionError> {
        if !self.input.exists() {
            self.transition(JobStatus::Failed);
            return Err(ConversionError::NotFound(self.input.clone()));
        }

        let ext = extension_of(&self.input).unwrap_or_default();
        if is_compatible(&ext) {
            self.output = Some(self.input.clone());
            self.transition(JobStatus::Skipped);
            return Ok(self.output.clone());
        }
        if !is_convertible(&ext) {
            self.transition(JobStatus::Skipped);
            return Ok(None);
        }

        let output = match resolve_output_path(&self.input, settings) {
            Ok(p) => p,
            Err(e) => {
                self.transition(JobStatus::Failed);
                return Err(e);
            }
        };
        self.output = Some(output.clone());
        if output.exists() {
            self.transition(JobStatus::Skipped);
            return Ok(Some(output));
        }

        self.transition(JobStatus::Running);
        if let Err(e) = encode(&self.input, &output, &settings.target_spec(), codec) {
            remove_partial(&output);
            self.transition(JobStatus::Failed);
            return Err(e);
        }

        if let Err(e) = metadata.copy_tags(&self.input, &output) {
            debug!(input = %self.input.display(), error = %e, "tags not copied");
        }

        if !settings.preserve_originals {
            match fs::remove_file(&self.input) {
                Ok(()) => debug!(input = %self.input.display(), "removed original"),
                Err(e) => warn!(input = %self.input.display(), error = %e, "could not remove original"),
            }
        }

        info!(input = %self.input.display(), output = %output.display(), "converted");
        self.transition(JobStatus::Succeeded);
        Ok(Some(output))
    }

    fn transition(&mut self, status: JobStatus) {
        debug!(input = %self.input.display(), from = ?self.status, to = ?status, "job state");
        self.status = status;
    }
}

/// Convert one file on the calling thread.
pub fn convert_file_sync(
    input: &Path,
    settings: &ConversionSettings,
    codec: &dyn CodecProvider,
    metadata: &dyn MetadataProvider,
) -> Result<Option<PathBuf>, ConversionError> {
    ConversionJob::new(input).run(settings, codec, metadata)
}

/// Direct transcode, then the 16-bit PCM bridge if the direct spec is
/// unsupported.
fn encode(
    input: &Path,
    output: &Path,
    spec: &TargetSpec,
    codec: &dyn CodecProvider,
) -> Result<(), ConversionError> {
    let mut outcome = codec.transcode(input, output, spec)?;

    let bridge = spec.bridge();
    if outcome == TranscodeOutcome::Unsupported && bridge != *spec {
        debug!(input = %input.display(), %spec, "direct transcode unsupported, trying PCM bridge");
        remove_partial(output);
        outcome = codec.transcode(input, output, &bridge)?;
    }

    if outcome == TranscodeOutcome::Unsupported {
        return Err(ConversionError::Unsupported {
            input: input.to_path_buf(),
            spec: *spec,
        });
    }

    match fs::metadata(output) {
        Ok(m) if m.len() > 0 => Ok(()),
        _ => Err(ConversionError::EmptyOutput(output.to_path_buf())),
    }
}

fn remove_partial(output: &Path) {
    if output.exists() {
        match fs::remove_file(output) {
            Ok(()) => debug!(output = %output.display(), "removed partial output"),
            Err(e) => warn!(output = %output.display(), error = %e, "could not remove partial output"),
        }
    }
}
