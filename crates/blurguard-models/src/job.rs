//! Media jobs and the output-path convention.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::policy::{DetectionPolicy, RedactionPolicy};

/// Image extensions handled by the image pipeline.
const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "bmp", "tif", "tiff"];

/// Video extensions handled by the video pipeline.
const VIDEO_EXTENSIONS: &[&str] = &["mp4", "mov", "avi", "mkv", "wmv"];

/// Kind of media a path refers to, decided by extension (case-insensitive).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MediaKind {
    Image,
    Video,
}

impl MediaKind {
    /// Classify a path by its extension; `None` for unsupported files.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        if IMAGE_EXTENSIONS.contains(&ext.as_str()) {
            Some(Self::Image)
        } else if VIDEO_EXTENSIONS.contains(&ext.as_str()) {
            Some(Self::Video)
        } else {
            None
        }
    }
}

/// Build the conventional output path for an input file.
///
/// `<stem>_blurred<ext>` in the input's directory, or the same filename in
/// `output_dir` when an override is supplied.
pub fn blurred_output_path(input: &Path, output_dir: Option<&Path>) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let mut name = format!("{stem}_blurred");
    if let Some(ext) = input.extension() {
        name.push('.');
        name.push_str(&ext.to_string_lossy());
    }
    let dir = output_dir
        .map(Path::to_path_buf)
        .or_else(|| input.parent().map(Path::to_path_buf))
        .unwrap_or_default();
    dir.join(name)
}

/// One unit of work: redact a single media file.
///
/// Stateless value; not retained after completion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaJob {
    pub input: PathBuf,
    pub output: PathBuf,
    pub detection: DetectionPolicy,
    pub redaction: RedactionPolicy,
}

impl MediaJob {
    /// Create a job with the conventional output path.
    pub fn new(
        input: PathBuf,
        output_dir: Option<&Path>,
        detection: DetectionPolicy,
        redaction: RedactionPolicy,
    ) -> Self {
        let output = blurred_output_path(&input, output_dir);
        Self {
            input,
            output,
            detection,
            redaction,
        }
    }

    /// Kind of media this job processes, by input extension.
    pub fn kind(&self) -> Option<MediaKind> {
        MediaKind::from_path(&self.input)
    }
}
