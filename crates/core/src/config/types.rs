use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Root configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub api: ApiConfig,
    pub folders: FolderConfig,
    pub ticket: TicketConfig,
    #[serde(default)]
    pub note: NoteConfig,
}

/// Helpdesk API connection settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiConfig {
    /// API root, e.g. "https://helpdesk.example.com/api/v1"
    pub base_url: String,
    /// Bearer token sent in the Authorization header.
    pub token: String,
    /// Extra headers sent with every request.
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
    /// Request timeout in seconds (default: 30)
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

fn default_timeout() -> u64 {
    30
}

/// Folder layout of one intake run.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FolderConfig {
    /// Where client archives are dropped.
    pub source: PathBuf,
    /// Receives archives and extracted files once a ticket exists.
    pub processed: PathBuf,
    /// Per-client extraction workspace, wiped after each client.
    pub scratch: PathBuf,
    #[serde(default = "default_extension")]
    pub archive_extension: String,
}

fn default_extension() -> String {
    ".zip".to_string()
}

/// Ticket content settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TicketConfig {
    /// Helpdesk group that owns created tickets.
    pub group: String,
    pub customer_type: String,
    /// Placeholders: `{client_name}`, `{date}`, `{files_list}`.
    pub title_template: String,
    pub subject_template: String,
    pub body_template: String,
}

/// Internal note posted on every created ticket.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct NoteConfig {
    #[serde(default = "default_note_subject")]
    pub subject: String,
    #[serde(default = "default_note_body")]
    pub body: String,
}

impl Default for NoteConfig {
    fn default() -> Self {
        Self {
            subject: default_note_subject(),
            body: default_note_body(),
        }
    }
}

fn default_note_subject() -> String {
    "Internal Note".to_string()
}

fn default_note_body() -> String {
    "Ticket registered programmatically via API from a client archive upload.".to_string()
}
