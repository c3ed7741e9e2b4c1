//! Filesystem side of a run: writing rendered files, checking free space and
//! merging one directory tree into another.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use sysinfo::Disks;
use tracing::debug;
use walkdir::WalkDir;

use crate::error::{FileSystemError, Result};

/// Rough upper bound of what a single run writes, in megabytes.
pub const ESTIMATED_OUTPUT_MB: u64 = 10;

const BYTES_PER_MB: u64 = 1024 * 1024;

/// Write `content` to `dir/file_name`, creating parent directories and
/// replacing any existing file.
pub fn write_file(dir: &Path, file_name: &Path, content: &str) -> Result<PathBuf> {
    let path = dir.join(file_name);
    if let Some(parent) = path.parent() {
        create_dir(parent)?;
    }
    fs::write(&path, content).map_err(|e| FileSystemError::from_io("writing to", &path, e))?;
    Ok(path)
}

/// Copy one file, overwriting the destination. Permission bits are kept.
///
/// Copying a file onto itself is an error: `fs::copy` would truncate it.
pub fn copy_file(from: &Path, to: &Path) -> Result<()> {
    ensure_distinct(from, to)?;
    if let Some(parent) = to.parent() {
        create_dir(parent)?;
    }
    fs::copy(from, to).map_err(|e| FileSystemError::from_io("copying to", to, e))?;
    Ok(())
}

/// Merge the tree under `src` into `dst`.
///
/// Files from `src` overwrite their counterparts in `dst`; anything else
/// already in `dst` is left alone. The source listing is taken up front, so a
/// destination nested inside `src` does not get copied into itself.
pub fn copy_dir_merge(src: &Path, dst: &Path) -> Result<usize> {
    ensure_distinct(src, dst)?;
    let entries = WalkDir::new(src)
        .follow_links(true)
        .into_iter()
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| FileSystemError::from_io("reading", src, io::Error::from(e)))?;

    let mut copied = 0;
    for entry in entries {
        let relative = entry.path().strip_prefix(src).map_err(|e| {
            FileSystemError::from_io("reading", entry.path(), io::Error::other(e))
        })?;
        let target = dst.join(relative);

        if entry.file_type().is_dir() {
            create_dir(&target)?;
        } else {
            copy_file(entry.path(), &target)?;
            copied += 1;
        }
    }

    debug!(files = copied, from = %src.display(), to = %dst.display(), "merged directory");
    Ok(copied)
}

/// Best-effort check that the disk holding each of `targets` has
/// `required_mb` free.
///
/// A target no mounted disk can be matched to is skipped.
pub fn check_disk_space(targets: &[&Path], required_mb: u64) -> Result<()> {
    check_space_with(targets, required_mb, available_bytes)
}

fn check_space_with(
    targets: &[&Path],
    required_mb: u64,
    available: impl Fn(&Path) -> Option<u64>,
) -> Result<()> {
    for target in targets {
        match available(target) {
            Some(bytes) => ensure_space(bytes, required_mb)?,
            None => {
                debug!(path = %target.display(), "could not determine free disk space, skipping check")
            }
        }
    }
    Ok(())
}

fn ensure_space(available_bytes: u64, required_mb: u64) -> Result<()> {
    let available_mb = available_bytes / BYTES_PER_MB;
    if available_mb < required_mb {
        return Err(FileSystemError::DiskSpace {
            available_mb,
            required_mb,
        }
        .into());
    }
    Ok(())
}

fn available_bytes(target: &Path) -> Option<u64> {
    let absolute = if target.is_absolute() {
        target.to_path_buf()
    } else {
        std::env::current_dir().ok()?.join(target)
    };
    let existing = absolute.ancestors().find(|p| p.exists())?;
    let probe = existing.canonicalize().ok()?;

    let disks = Disks::new_with_refreshed_list();
    disks
        .list()
        .iter()
        .filter(|disk| probe.starts_with(disk.mount_point()))
        .max_by_key(|disk| disk.mount_point().as_os_str().len())
        .map(|disk| disk.available_space())
}

fn ensure_distinct(from: &Path, to: &Path) -> Result<()> {
    if !to.exists() {
        return Ok(());
    }
    let same = same_file::is_same_file(from, to)
        .map_err(|e| FileSystemError::from_io("reading", from, e))?;
    if same {
        return Err(FileSystemError::SameFile {
            path: to.to_path_buf(),
        }
        .into());
    }
    Ok(())
}

fn create_dir(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir).map_err(|e| FileSystemError::from_io("creating", dir, e))?;
    Ok(())
}
