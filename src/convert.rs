//! Conversion orchestration: output paths, the single-file state machine,
//! the bounded worker pool and the batch engine on top of them.

mod engine;
mod events;
mod job;
mod output;
mod pool;

use std::io;
use std::path::PathBuf;

use crate::codec::CodecError;
use crate::format::TargetSpec;

pub use engine::ConversionEngine;
pub use events::{BatchOutcome, ConversionEvent, ConvertedFile};
pub use job::{ConversionJob, JobStatus, convert_file_sync};
pub use output::{converted_dir_for, resolve_output_path};
pub use pool::{DEFAULT_POOL_DEPTH, JobHandle, PoolError, WorkerPool};

#[derive(Debug, thiserror::Error)]
pub enum ConversionError {
    #[error("input file not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("unsupported conversion of {} to {spec}", input.display())]
    Unsupported { input: PathBuf, spec: TargetSpec },
    #[error("cannot create output directory {}: {source}", path.display())]
    OutputDir { path: PathBuf, source: io::Error },
    #[error("codec produced no audio for {}", .0.display())]
    EmptyOutput(PathBuf),
    #[error(transparent)]
    Codec(#[from] CodecError),
}
