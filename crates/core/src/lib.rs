//! Intake of client ZIP archives into a helpdesk.
//!
//! Archives named `[ClientTag]anything.zip` are grouped per client, unpacked
//! and sent as attachments of one ticket addressed to the client
//! organization's main contact. Processed inputs are moved out of the
//! source folder so a later run does not pick them up again.

pub mod archiver;
pub mod config;
pub mod contact;
pub mod extractor;
pub mod grouper;
pub mod helpdesk;
pub mod pipeline;
pub mod scanner;
pub mod submitter;
pub mod testing;

pub use archiver::{ArchiveError, MoveReport};
pub use config::{
    load_config, load_config_from_str, validate_config, validate_folders, Config, ConfigError,
};
pub use contact::{resolve_main_contact, Contact, ContactError};
pub use extractor::{extract_archive, extract_archive_async, ExtractError};
pub use grouper::{extract_client_tag, group_by_client, ClientGroup};
pub use helpdesk::{HelpdeskApi, HelpdeskError, TicketId, ZammadClient};
pub use pipeline::{
    ClientOutcome, ClientReport, ClientState, IntakePipeline, PipelineError, RunSummary,
};
pub use scanner::{scan_archives, Archive, ScanError};
pub use submitter::{submit_ticket, SubmitError};
