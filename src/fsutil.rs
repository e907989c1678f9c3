//! Directory copy helpers used by `init` and `build`.

use std::path::{Path, PathBuf};

use log::debug;
use walkdir::WalkDir;

use crate::error::Error;

/// Copies `src` into `dst`, merging into any directories that already
/// exist. Paths listed in `ignore` (as full source paths) are skipped along
/// with everything beneath them. Symlinks are recreated as symlinks rather
/// than followed.
///
/// # Errors
///
/// Returns `Error::Walk` or `Error::Io` on the first entry that cannot be
/// read or written.
pub fn copy_tree(src: &Path, dst: &Path, ignore: &[PathBuf]) -> Result<(), Error> {
    let walker = WalkDir::new(src)
        .follow_links(false)
        .sort_by(|a, b| a.file_name().cmp(b.file_name()))
        .into_iter()
        .filter_entry(|entry| {
            let skip = ignore.iter().any(|ignored| ignored == entry.path());
            if skip {
                debug!("Skipping {}", entry.path().display());
            }
            !skip
        });

    for entry in walker {
        let entry = entry?;
        let from = entry.path();
        let rel_path = from.strip_prefix(src).unwrap_or(from);
        let to = dst.join(rel_path);

        let file_type = entry.file_type();
        if file_type.is_dir() {
            std::fs::create_dir_all(&to).map_err(|e| Error::io(&to, e))?;
        } else if file_type.is_symlink() {
            copy_symlink(from, &to)?;
        } else {
            std::fs::copy(from, &to).map_err(|e| Error::io(from, e))?;
        }
    }
    Ok(())
}

#[cfg(unix)]
fn copy_symlink(from: &Path, to: &Path) -> Result<(), Error> {
    let target = std::fs::read_link(from).map_err(|e| Error::io(from, e))?;
    if to.symlink_metadata().is_ok() {
        std::fs::remove_file(to).map_err(|e| Error::io(to, e))?;
    }
    std::os::unix::fs::symlink(&target, to).map_err(|e| Error::io(to, e))
}

// Without portable symlinks, copy what the link points at.
#[cfg(not(unix))]
fn copy_symlink(from: &Path, to: &Path) -> Result<(), Error> {
    if from.is_dir() {
        copy_tree(from, to, &[])
    } else {
        std::fs::copy(from, to)
            .map(|_| ())
            .map_err(|e| Error::io(from, e))
    }
}

/// Names of the top-level entries of `src` that already exist in `dst`, sorted.
///
/// # Errors
///
/// Returns `Error::Io` if `src` cannot be listed.
pub fn conflicts(src: &Path, dst: &Path) -> Result<Vec<String>, Error> {
    let entries = std::fs::read_dir(src).map_err(|e| Error::io(src, e))?;
    let mut conflicted = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| Error::io(src, e))?;
        if dst.join(entry.file_name()).exists() {
            conflicted.push(entry.file_name().to_string_lossy().into_owned());
        }
    }
    conflicted.sort();
    Ok(conflicted)
}
