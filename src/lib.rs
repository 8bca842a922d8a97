//! VIDRA - Minimal media player library
//!
//! Re-exports all modules for use by the binary target.

// Engine boundary (facade over GStreamer playback)
pub mod engine;

// App modules
pub mod app;
pub mod cli;
pub mod paths;
pub mod ui;
pub mod utils;

// Re-export commonly used types
pub use app::{Settings, ShellApp};
pub use engine::{EngineError, MediaInfo, PlaybackEngine, PlaybinEngine};
