//! Unpacks one archive into the scratch folder.
//!
//! The returned file list is a flat listing of the scratch folder after
//! extraction, not a walk of the archive's entries. Files nested in
//! subdirectories of the archive are therefore not reported, and the
//! listing also contains files left by earlier archives of the same client.

use std::fs::{self, File};
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::info;
use zip::result::ZipError;
use zip::ZipArchive;

/// Errors that can occur while unpacking an archive.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("Failed to open archive {path}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Corrupt or unreadable archive {path}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: ZipError,
    },

    #[error("Failed to list scratch folder {path}")]
    ListScratch {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Extraction task did not complete: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Runs `extract_archive` on the blocking thread pool.
pub async fn extract_archive_async(
    archive: PathBuf,
    scratch: PathBuf,
) -> Result<Vec<PathBuf>, ExtractError> {
    tokio::task::spawn_blocking(move || extract_archive(&archive, &scratch)).await?
}

/// Expands `archive` into `scratch` and returns the regular files now in
/// `scratch`, sorted by name.
pub fn extract_archive(archive: &Path, scratch: &Path) -> Result<Vec<PathBuf>, ExtractError> {
    let file = File::open(archive).map_err(|source| ExtractError::Open {
        path: archive.to_path_buf(),
        source,
    })?;

    let corrupt = |source: ZipError| ExtractError::Corrupt {
        path: archive.to_path_buf(),
        source,
    };
    let mut zip = ZipArchive::new(file).map_err(corrupt)?;
    zip.extract(scratch).map_err(corrupt)?;

    info!(
        "Unzipped '{}' to '{}' ({} entries)",
        archive.display(),
        scratch.display(),
        zip.len()
    );

    list_files(scratch)
}

/// Regular files directly inside `folder`, sorted by name.
pub fn list_files(folder: &Path) -> Result<Vec<PathBuf>, ExtractError> {
    let list_err = |source: std::io::Error| ExtractError::ListScratch {
        path: folder.to_path_buf(),
        source,
    };

    let mut files = Vec::new();
    for entry in fs::read_dir(folder).map_err(list_err)? {
        let entry = entry.map_err(list_err)?;
        if entry.file_type().map_err(list_err)?.is_file() {
            files.push(entry.path());
        }
    }
    files.sort();
    Ok(files)
}
