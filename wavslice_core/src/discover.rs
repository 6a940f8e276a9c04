use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::SliceError;

/// Recursively collect every regular file below `root` whose name ends with
/// `.<extension>`, ignoring ASCII case.
///
/// Symlinks to files are included; symlinked directories are not descended
/// into. Entries that cannot be read are skipped. The result follows traversal
/// order, which is not stable across platforms.
pub fn discover(root: &Path, extension: &str) -> Result<Vec<PathBuf>, SliceError> {
    if !root.is_dir() {
        return Err(SliceError::MissingInputDirectory(root.to_path_buf()));
    }

    let suffix = format!(".{}", extension.to_ascii_lowercase());
    let files = WalkDir::new(root)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| {
            let file_type = entry.file_type();
            file_type.is_file() || (file_type.is_symlink() && entry.path().is_file())
        })
        .filter(|entry| {
            entry
                .file_name()
                .to_string_lossy()
                .to_ascii_lowercase()
                .ends_with(&suffix)
        })
        .map(|entry| entry.into_path())
        .collect();

    Ok(files)
}
