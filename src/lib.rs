//! recast - converts legacy audio formats in a music library into fully
//! supported WAV/AIFF and remembers which albums are already done.

pub mod codec;
pub mod config;
pub mod convert;
pub mod format;
pub mod library;
pub mod runtime;
pub mod tracker;
