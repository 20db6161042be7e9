use std::path::Path;

use super::{
    types::{Config, FolderConfig},
    ConfigError,
};

/// Validate configuration
/// Currently validates:
/// - API base URL is http(s) and a token is present
/// - Ticket group, customer type and templates are non-empty
/// - The three folders are distinct
/// - The scratch folder neither contains nor sits inside the source or
///   processed folder, since it is wiped between clients
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    let base_url = config.api.base_url.trim();
    if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
        return Err(ConfigError::ValidationError(format!(
            "api.base_url must start with http:// or https://, got '{}'",
            config.api.base_url
        )));
    }

    if config.api.token.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "api.token cannot be empty".to_string(),
        ));
    }

    let required = [
        ("ticket.group", &config.ticket.group),
        ("ticket.customer_type", &config.ticket.customer_type),
        ("ticket.title_template", &config.ticket.title_template),
        ("ticket.subject_template", &config.ticket.subject_template),
        ("ticket.body_template", &config.ticket.body_template),
        ("folders.archive_extension", &config.folders.archive_extension),
    ];
    for (name, value) in required {
        if value.trim().is_empty() {
            return Err(ConfigError::ValidationError(format!(
                "{} cannot be empty",
                name
            )));
        }
    }

    validate_folders(&config.folders)
}

/// Checks the folder layout on its own. The intake pipeline runs this
/// before touching the scratch folder.
pub fn validate_folders(folders: &FolderConfig) -> Result<(), ConfigError> {
    if folders.source == folders.processed
        || folders.source == folders.scratch
        || folders.processed == folders.scratch
    {
        return Err(ConfigError::ValidationError(
            "folders.source, folders.processed and folders.scratch must be distinct".to_string(),
        ));
    }

    for (name, other) in [
        ("folders.source", &folders.source),
        ("folders.processed", &folders.processed),
    ] {
        if overlaps(&folders.scratch, other) {
            return Err(ConfigError::ValidationError(format!(
                "folders.scratch ({}) must not contain or be inside {} ({})",
                folders.scratch.display(),
                name,
                other.display()
            )));
        }
    }

    Ok(())
}

/// Whether one path is equal to or nested in the other, by components.
fn overlaps(a: &Path, b: &Path) -> bool {
    a.starts_with(b) || b.starts_with(a)
}
