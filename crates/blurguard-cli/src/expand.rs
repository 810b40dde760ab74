//! Input expansion: a file or directory becomes a list of media files.

use std::path::{Path, PathBuf};

use tracing::warn;

use blurguard_models::MediaKind;

/// Expand `input` to the media files it refers to.
///
/// A single media file yields itself; a directory yields its media files,
/// descending into subdirectories when `recursive` is set. Entries are
/// sorted so batch order is stable across runs.
pub fn media_files(input: &Path, recursive: bool) -> Vec<PathBuf> {
    let mut files = Vec::new();
    if input.is_dir() {
        collect(input, recursive, &mut files);
        files.sort();
    } else if input.is_file() && MediaKind::from_path(input).is_some() {
        files.push(input.to_path_buf());
    }
    files
}

fn collect(dir: &Path, recursive: bool, files: &mut Vec<PathBuf>) {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            warn!(dir = %dir.display(), "cannot read directory: {e}");
            return;
        }
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            if recursive {
                collect(&path, recursive, files);
            }
        } else if MediaKind::from_path(&path).is_some() {
            files.push(path);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn touch(path: &Path) {
        std::fs::write(path, b"x").unwrap();
    }

    #[test]
    fn single_media_file_yields_itself() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("a.jpg");
        touch(&file);
        assert_eq!(media_files(&file, false), vec![file]);
    }

    #[test]
    fn non_media_and_missing_inputs_yield_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let txt = dir.path().join("notes.txt");
        touch(&txt);
        assert!(media_files(&txt, false).is_empty());
        assert!(media_files(&dir.path().join("missing.png"), false).is_empty());
    }

    #[test]
    fn directory_expansion_respects_recursion_flag() {
        let dir = tempfile::tempdir().unwrap();
        let top = dir.path().join("top.png");
        let sub = dir.path().join("sub");
        std::fs::create_dir(&sub).unwrap();
        let nested = sub.join("nested.mp4");
        touch(&top);
        touch(&nested);
        touch(&dir.path().join("skip.txt"));

        assert_eq!(media_files(dir.path(), false), vec![top.clone()]);
        assert_eq!(media_files(dir.path(), true), vec![nested, top]);
    }
}
