use std::{
    fs, io,
    path::{Path, PathBuf},
};

use super::NozzleError;

/// Symlinks each of `files` (relative to `source_dir`) into `run_dir`.
///
/// Links are named after the file and point at its absolute path. A file or
/// link already at the destination is left alone. Returns the links created.
///
/// # Errors
///
/// Returns [`NozzleError::Io`] if the run directory can't be created or a
/// link can't be made.
pub fn stage_files(
    source_dir: &Path,
    files: &[PathBuf],
    run_dir: &Path,
) -> Result<Vec<PathBuf>, NozzleError> {
    fs::create_dir_all(run_dir).map_err(|e| NozzleError::io(run_dir, e))?;

    let mut staged = Vec::with_capacity(files.len());
    for file in files {
        let source = std::path::absolute(source_dir.join(file))
            .map_err(|e| NozzleError::io(&source_dir.join(file), e))?;
        let Some(name) = file.file_name() else {
            log::warn!("skipping staged path without a file name: {}", file.display());
            continue;
        };
        let link = run_dir.join(name);

        if fs::symlink_metadata(&link).is_ok() {
            log::info!("{} already exists; leaving it in place", link.display());
            continue;
        }

        symlink(&source, &link).map_err(|e| NozzleError::io(&link, e))?;
        log::debug!("linked {} -> {}", link.display(), source.display());
        staged.push(link);
    }
    Ok(staged)
}

#[cfg(unix)]
fn symlink(source: &Path, link: &Path) -> io::Result<()> {
    std::os::unix::fs::symlink(source, link)
}

#[cfg(windows)]
fn symlink(source: &Path, link: &Path) -> io::Result<()> {
    std::os::windows::fs::symlink_file(source, link)
}
