//! Utility functions and constants
//!
//! **Used by**: app (drag-and-drop filter), ui (file dialog filter)

/// Media file type detection
pub mod media {
    use std::path::Path;

    /// Supported video container extensions
    pub const VIDEO_EXTS: &[&str] = &["mp4", "mov", "avi", "mkv", "webm", "m4v", "mpg", "mpeg"];

    /// Supported audio file extensions
    pub const AUDIO_EXTS: &[&str] = &["mp3", "flac", "ogg", "wav", "aac", "m4a", "opus"];

    /// All supported file extensions (video + audio)
    pub const ALL_EXTS: &[&str] = &[
        "mp4", "mov", "avi", "mkv", "webm", "m4v", "mpg", "mpeg",
        "mp3", "flac", "ogg", "wav", "aac", "m4a", "opus",
    ];

    fn has_ext_in(path: &Path, exts: &[&str]) -> bool {
        path.extension()
            .and_then(|s| s.to_str())
            .map(|s| exts.contains(&s.to_lowercase().as_str()))
            .unwrap_or(false)
    }

    /// Check if file is a video format
    pub fn is_video(path: &Path) -> bool {
        has_ext_in(path, VIDEO_EXTS)
    }

    /// Check if file is an audio format
    pub fn is_audio(path: &Path) -> bool {
        has_ext_in(path, AUDIO_EXTS)
    }

    /// Check if file is any supported media format
    pub fn is_media(path: &Path) -> bool {
        has_ext_in(path, ALL_EXTS)
    }
}

#[cfg(test)]
mod tests {
    use super::media;
    use std::path::Path;

    #[test]
    fn test_video_extension_detection() {
        assert!(media::is_video(Path::new("clip.mp4")));
        assert!(media::is_video(Path::new("Clip.MKV")));
        assert!(!media::is_video(Path::new("song.mp3")));
    }

    #[test]
    fn test_audio_extension_detection() {
        assert!(media::is_audio(Path::new("song.flac")));
        assert!(!media::is_audio(Path::new("clip.avi")));
    }

    #[test]
    fn test_is_media_covers_both() {
        assert!(media::is_media(Path::new("clip.webm")));
        assert!(media::is_media(Path::new("song.ogg")));
        assert!(!media::is_media(Path::new("notes.txt")));
        assert!(!media::is_media(Path::new("no_extension")));
    }
}
