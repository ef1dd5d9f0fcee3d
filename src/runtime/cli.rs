use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "recast")]
#[command(version, about = "Convert legacy audio formats into WAV/AIFF, one album at a time")]
#[command(arg_required_else_help = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Count files that need converting
    Analyze {
        /// Library root to inspect
        dir: PathBuf,
    },

    /// Convert files next to themselves (or into the output directory)
    Convert {
        /// Files to convert
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// Convert every unconverted album into <album>-converted
    ConvertDir {
        /// Library root to scan
        dir: PathBuf,
    },

    /// Convert newly imported songs if auto-convert is enabled
    Import {
        /// Directory holding the imported songs
        dir: PathBuf,
    },

    /// List converted albums
    History,

    /// Drop the record for a file's album
    Forget {
        /// Any file of the album
        file: PathBuf,
    },

    /// Drop every record
    ClearHistory,

    /// Print the effective settings
    ShowConfig,
}
