use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use std::path::Path;

use super::{types::Config, ConfigError};

/// Load configuration from file with environment variable overrides.
///
/// Nested keys are addressed with a double underscore, e.g.
/// `ZIPDESK_API__TOKEN` overrides `[api] token`.
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::FileNotFound(path.display().to_string()));
    }

    let config: Config = Figment::new()
        .merge(Toml::file(path))
        .merge(Env::prefixed("ZIPDESK_").split("__"))
        .extract()
        .map_err(|e| ConfigError::ParseError(e.to_string()))?;

    Ok(config)
}

/// Load configuration from TOML string (useful for testing)
pub fn load_config_from_str(toml_str: &str) -> Result<Config, ConfigError> {
    toml::from_str(toml_str).map_err(|e| ConfigError::ParseError(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const MINIMAL: &str = r#"
[api]
base_url = "https://helpdesk.example.com/api/v1"
token = "secret"

[folders]
source = "/srv/intake/incoming"
processed = "/srv/intake/processed"
scratch = "/srv/intake/scratch"

[ticket]
group = "Users"
customer_type = "customer"
title_template = "Files from {client_name} ({date})"
subject_template = "Your files, {date}"
body_template = "Hello {client_name}, we received: {files_list}"
"#;

    #[test]
    fn test_load_config_from_str_valid() {
        let config = load_config_from_str(MINIMAL).unwrap();
        assert_eq!(config.api.token, "secret");
        assert_eq!(config.ticket.group, "Users");
        assert_eq!(config.api.timeout_secs, 30);
    }

    #[test]
    fn test_load_config_from_str_missing_ticket_section() {
        let toml = r#"
[api]
base_url = "https://helpdesk.example.com/api/v1"
token = "secret"
"#;
        let result = load_config_from_str(toml);
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn test_load_config_file_not_found() {
        let result = load_config(Path::new("/nonexistent/config.toml"));
        assert!(matches!(result, Err(ConfigError::FileNotFound(_))));
    }

    #[test]
    fn test_load_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        write!(temp_file, "{}", MINIMAL).unwrap();

        let config = load_config(temp_file.path()).unwrap();
        assert_eq!(config.folders.source.to_str().unwrap(), "/srv/intake/incoming");
        assert_eq!(config.folders.archive_extension, ".zip");
    }
}
