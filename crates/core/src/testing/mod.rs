//! Testing utilities and mock implementations.
//!
//! `MockHelpdesk` stands in for the ticketing backend so the pipeline can be
//! exercised against real temporary folders without any network access.

mod mock_helpdesk;

pub use mock_helpdesk::{MockHelpdesk, RecordedArticle, RecordedTicket};

/// Test fixtures and helper functions.
pub mod fixtures {
    use std::collections::BTreeMap;
    use std::fs::File;
    use std::io::Write;
    use std::path::{Path, PathBuf};

    use zip::write::SimpleFileOptions;
    use zip::ZipWriter;

    use crate::config::{ApiConfig, Config, FolderConfig, NoteConfig, TicketConfig};
    use crate::helpdesk::{HelpdeskUser, NewTicket, NewTicketArticle};

    /// A config whose three folders live under `root`.
    pub fn config(root: PathBuf) -> Config {
        Config {
            api: ApiConfig {
                base_url: "https://helpdesk.example.com/api/v1".to_string(),
                token: "test-token".to_string(),
                headers: BTreeMap::new(),
                timeout_secs: 5,
            },
            folders: FolderConfig {
                source: root.join("incoming"),
                processed: root.join("processed"),
                scratch: root.join("scratch"),
                archive_extension: ".zip".to_string(),
            },
            ticket: TicketConfig {
                group: "Users".to_string(),
                customer_type: "customer".to_string(),
                title_template: "Files from {client_name} ({date})".to_string(),
                subject_template: "{client_name}: documents of {date}".to_string(),
                body_template: "Dear {client_name}, attached: {files_list}".to_string(),
            },
            note: NoteConfig::default(),
        }
    }

    /// A user record. An empty `email` is stored as missing.
    pub fn user(id: u64, email: &str, main_contact: bool) -> HelpdeskUser {
        HelpdeskUser {
            id,
            firstname: Some("Test".to_string()),
            lastname: Some(format!("User{}", id)),
            email: (!email.is_empty()).then(|| email.to_string()),
            main_contact,
        }
    }

    /// A minimal ticket request.
    pub fn new_ticket(customer_id: u64, to: &str) -> NewTicket {
        NewTicket {
            title: "Test ticket".to_string(),
            group: "Users".to_string(),
            article: NewTicketArticle {
                subject: "Subject".to_string(),
                body: "Body".to_string(),
                kind: "email".to_string(),
                content_type: "text/plain".to_string(),
                to: to.to_string(),
                internal: false,
                attachments: Vec::new(),
            },
            customer_id,
            customer_type: "customer".to_string(),
        }
    }

    /// Writes a ZIP archive at `path` containing `entries` (name, text content).
    /// Names may contain `/` to create nested entries.
    pub fn write_zip(path: &Path, entries: &[(&str, &str)]) {
        let file = File::create(path).expect("create zip file");
        let mut zip = ZipWriter::new(file);
        let options = SimpleFileOptions::default();

        for (name, content) in entries {
            if let Some((dir, _)) = name.rsplit_once('/') {
                zip.add_directory(format!("{}/", dir), options)
                    .expect("add zip directory");
            }
            zip.start_file(*name, options).expect("start zip entry");
            zip.write_all(content.as_bytes()).expect("write zip entry");
        }

        zip.finish().expect("finish zip");
    }
}
