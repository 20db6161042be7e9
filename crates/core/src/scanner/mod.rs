//! Lists candidate input archives in the source folder.

use std::path::{Path, PathBuf};

use thiserror::Error;
use tokio::fs;
use tracing::debug;

/// Errors that can occur while listing the source folder.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("Failed to read folder {path}")]
    ReadDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// One archive found in the source folder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Archive {
    /// File name, e.g. `[Acme]invoices.zip`.
    pub name: String,
    /// Folder the archive was found in.
    pub folder: PathBuf,
}

impl Archive {
    pub fn path(&self) -> PathBuf {
        self.folder.join(&self.name)
    }
}

/// Lists regular files in `folder` whose name ends with `extension`.
///
/// Results are sorted by name. An empty result is not an error.
pub async fn scan_archives(folder: &Path, extension: &str) -> Result<Vec<Archive>, ScanError> {
    let read_err = |source: std::io::Error| ScanError::ReadDir {
        path: folder.to_path_buf(),
        source,
    };

    let mut entries = fs::read_dir(folder).await.map_err(read_err)?;
    let mut archives = Vec::new();

    while let Some(entry) = entries.next_entry().await.map_err(read_err)? {
        let Ok(name) = entry.file_name().into_string() else {
            debug!("Skipping non UTF-8 file name {:?}", entry.file_name());
            continue;
        };
        if !name.ends_with(extension) {
            continue;
        }
        // Follows symlinks, like a plain `is_file` check on the path.
        match fs::metadata(entry.path()).await {
            Ok(meta) if meta.is_file() => archives.push(Archive {
                name,
                folder: folder.to_path_buf(),
            }),
            Ok(_) => debug!("Skipping {} (not a regular file)", name),
            Err(e) => debug!("Skipping {}: {}", name, e),
        }
    }

    archives.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(archives)
}
