//! Turns extracted files into base64 ticket attachments.

use std::path::Path;

use base64::{engine::general_purpose::STANDARD, Engine};
use tokio::fs;

use crate::helpdesk::Attachment;

use super::SubmitError;

pub const PDF_CONTENT_TYPE: &str = "application/pdf";
pub const BINARY_CONTENT_TYPE: &str = "application/octet-stream";

/// Content type by file name: `.pdf` files are PDFs, everything else is
/// generic binary.
pub fn content_type_for(file_name: &str) -> &'static str {
    if file_name.ends_with(".pdf") {
        PDF_CONTENT_TYPE
    } else {
        BINARY_CONTENT_TYPE
    }
}

/// Base name of `path` as a string (lossy for non UTF-8 names).
pub fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}

/// Reads `path` fully and builds its attachment record.
pub async fn build_attachment(path: &Path) -> Result<Attachment, SubmitError> {
    let bytes = fs::read(path)
        .await
        .map_err(|source| SubmitError::Attachment {
            path: path.to_path_buf(),
            source,
        })?;

    let filename = display_name(path);
    Ok(Attachment {
        mime_type: content_type_for(&filename).to_string(),
        data: STANDARD.encode(bytes),
        filename,
    })
}
