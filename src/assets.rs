//! Static asset mirroring.
//!
//! Copies the static directory into the output tree file by file. Symlinks
//! are followed and written as regular files, so the output can be uploaded
//! anywhere without dangling links.

use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum AssetError {
    #[error("{0}: {1}")]
    Walk(PathBuf, walkdir::Error),
    #[error("copy {0}: {1}")]
    Io(PathBuf, std::io::Error),
}

/// Mirror `input_dir` into `output_dir`. Returns the number of files copied.
pub fn copy_assets(input_dir: &Path, output_dir: &Path) -> Result<usize, AssetError> {
    let mut copied = 0;
    for entry in WalkDir::new(input_dir).follow_links(true).sort_by_file_name() {
        let entry = entry.map_err(|e| AssetError::Walk(input_dir.to_path_buf(), e))?;
        if entry.file_type().is_dir() {
            continue;
        }
        let Ok(relative) = entry.path().strip_prefix(input_dir) else {
            continue;
        };
        let target = output_dir.join(relative);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).map_err(|e| AssetError::Io(parent.to_path_buf(), e))?;
        }
        // read + write rather than fs::copy: never reproduce a symlink
        let content = fs::read(entry.path()).map_err(|e| AssetError::Io(entry.path().into(), e))?;
        fs::write(&target, content).map_err(|e| AssetError::Io(target.clone(), e))?;
        copied += 1;
    }
    Ok(copied)
}
