use clap::Parser;
use std::path::PathBuf;

// Build version with backend info
const VERSION_INFO: &str = const_format::concatcp!(
    env!("CARGO_PKG_VERSION"), "\n",
    "Engine: GStreamer playbin\n",
    "Target: ", std::env::consts::ARCH, "-", std::env::consts::OS
);

/// Minimal media player
#[derive(Parser, Debug)]
#[command(author, version = VERSION_INFO, about, long_about = None)]
pub struct Args {
    /// Media file to open and play on startup (MP4, MKV, AVI, MP3, FLAC...)
    #[arg(value_name = "FILE")]
    pub file_path: Option<PathBuf>,

    /// Initial volume, 0-100 (overrides the persisted value)
    #[arg(short = 'V', long = "volume", value_name = "0-100")]
    pub volume: Option<i32>,

    /// Enable debug logging to file (default: vidra.log in the data dir)
    #[arg(short = 'l', long = "log", value_name = "LOG_FILE")]
    pub log_file: Option<Option<PathBuf>>,

    /// Increase logging verbosity (default: warn, -v: info, -vv: debug, -vvv+: trace)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    pub verbosity: u8,

    /// Custom configuration directory (overrides default platform paths)
    #[arg(short = 'c', long = "config-dir", value_name = "DIR")]
    pub config_dir: Option<PathBuf>,
}
