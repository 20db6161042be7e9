//! Moves processed inputs to the processed folder and manages the scratch
//! folder.
//!
//! Moves are renames when source and destination share a filesystem, with a
//! copy-then-delete fallback across devices. Each name is moved
//! independently: a failure is logged and recorded, and the remaining names
//! are still attempted.

mod error;

pub use error::ArchiveError;

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use tokio::fs;
use tracing::{error, info};

/// Outcome of a batch move.
#[derive(Debug, Default)]
pub struct MoveReport {
    /// Destination paths of entries that were moved.
    pub moved: Vec<PathBuf>,
    /// One error per entry that could not be moved.
    pub failed: Vec<ArchiveError>,
}

impl MoveReport {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Moves each of `names` from `source_folder` to `destination_folder`.
/// An existing destination file of the same name is replaced. Names are
/// joined as paths, so non UTF-8 names move unchanged.
pub async fn move_files<S: AsRef<Path>>(
    names: &[S],
    source_folder: &Path,
    destination_folder: &Path,
) -> MoveReport {
    let mut report = MoveReport::default();

    for name in names {
        let name: &Path = name.as_ref();
        let source = source_folder.join(name);
        let destination = destination_folder.join(name);

        match move_entry(&source, &destination).await {
            Ok(()) => {
                info!(
                    "Moved '{}' to {}",
                    name.display(),
                    destination_folder.display()
                );
                report.moved.push(destination);
            }
            Err(e) => {
                error!("{}", e);
                report.failed.push(e);
            }
        }
    }

    report
}

/// Names of every entry directly inside `folder`, sorted.
pub async fn list_entries(folder: &Path) -> Result<Vec<OsString>, ArchiveError> {
    let folder_err = |error: std::io::Error| ArchiveError::Folder {
        path: folder.to_path_buf(),
        error,
    };

    let mut entries = fs::read_dir(folder).await.map_err(folder_err)?;
    let mut names = Vec::new();
    while let Some(entry) = entries.next_entry().await.map_err(folder_err)? {
        names.push(entry.file_name());
    }
    names.sort();
    Ok(names)
}

/// Creates `folder` (and parents) if missing.
pub async fn ensure_folder(folder: &Path) -> Result<(), ArchiveError> {
    fs::create_dir_all(folder)
        .await
        .map_err(|error| ArchiveError::Folder {
            path: folder.to_path_buf(),
            error,
        })
}

/// Deletes `scratch` with everything in it and recreates it empty.
pub async fn reset_scratch(scratch: &Path) -> Result<(), ArchiveError> {
    match fs::remove_dir_all(scratch).await {
        Ok(()) => {}
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(error) => {
            return Err(ArchiveError::Folder {
                path: scratch.to_path_buf(),
                error,
            })
        }
    }
    ensure_folder(scratch).await
}

async fn move_entry(source: &Path, destination: &Path) -> Result<(), ArchiveError> {
    let fail = |e: std::io::Error| {
        ArchiveError::from_move(source.to_path_buf(), destination.to_path_buf(), e)
    };

    match fs::rename(source, destination).await {
        Ok(()) => Ok(()),
        // Cross-filesystem moves fail with EXDEV (18 on Linux)
        Err(e)
            if e.kind() == std::io::ErrorKind::CrossesDevices || e.raw_os_error() == Some(18) =>
        {
            copy_then_remove(source, destination).await.map_err(fail)
        }
        Err(e) => Err(fail(e)),
    }
}

async fn copy_then_remove(source: &Path, destination: &Path) -> std::io::Result<()> {
    if fs::metadata(source).await?.is_dir() {
        let (src, dst) = (source.to_path_buf(), destination.to_path_buf());
        tokio::task::spawn_blocking(move || copy_dir_all(&src, &dst))
            .await
            .map_err(std::io::Error::other)??;
        fs::remove_dir_all(source).await
    } else {
        fs::copy(source, destination).await?;
        fs::remove_file(source).await
    }
}

fn copy_dir_all(source: &Path, destination: &Path) -> std::io::Result<()> {
    std::fs::create_dir_all(destination)?;
    for entry in std::fs::read_dir(source)? {
        let entry = entry?;
        let target = destination.join(entry.file_name());
        if entry.file_type()?.is_dir() {
            copy_dir_all(&entry.path(), &target)?;
        } else {
            std::fs::copy(entry.path(), target)?;
        }
    }
    Ok(())
}
