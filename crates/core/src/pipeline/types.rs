//! Types for the intake pipeline.

use std::fmt;

use thiserror::Error;

use crate::archiver::ArchiveError;
use crate::config::ConfigError;
use crate::helpdesk::TicketId;
use crate::scanner::ScanError;

/// Errors that abort a whole run.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Unsafe folder layout: {0}")]
    Layout(#[source] ConfigError),

    #[error("Failed to prepare working folders: {0}")]
    Setup(#[source] ArchiveError),

    #[error("Failed to scan source folder: {0}")]
    Scan(#[from] ScanError),

    #[error("Failed to reset scratch folder after client '{client}': {source}")]
    ScratchReset {
        client: String,
        #[source]
        source: ArchiveError,
    },
}

/// Where a client currently is in the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientState {
    Pending,
    Extracting,
    Resolving,
    Submitting,
    Annotating,
    Archiving,
    Done,
    SkippedNoContact,
    SkippedTicketFailed,
}

impl ClientState {
    /// Whether the client has reached a final state.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::Done | Self::SkippedNoContact | Self::SkippedTicketFailed
        )
    }
}

impl fmt::Display for ClientState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Pending => "pending",
            Self::Extracting => "extracting",
            Self::Resolving => "resolving",
            Self::Submitting => "submitting",
            Self::Annotating => "annotating",
            Self::Archiving => "archiving",
            Self::Done => "done",
            Self::SkippedNoContact => "skipped_no_contact",
            Self::SkippedTicketFailed => "skipped_ticket_failed",
        };
        f.write_str(s)
    }
}

/// How processing of one client ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientOutcome {
    /// Ticket created and inputs archived.
    Done {
        ticket_id: TicketId,
        attachments: usize,
        note_posted: bool,
        files_moved: usize,
        move_failures: usize,
    },
    /// Contact resolution failed; nothing was submitted.
    SkippedNoContact { reason: String },
    /// The backend rejected the ticket, or its attachments could not be read.
    SkippedTicketFailed { reason: String },
}

impl ClientOutcome {
    pub fn state(&self) -> ClientState {
        match self {
            Self::Done { .. } => ClientState::Done,
            Self::SkippedNoContact { .. } => ClientState::SkippedNoContact,
            Self::SkippedTicketFailed { .. } => ClientState::SkippedTicketFailed,
        }
    }

    pub fn ticket_id(&self) -> Option<TicketId> {
        match self {
            Self::Done { ticket_id, .. } => Some(*ticket_id),
            _ => None,
        }
    }
}

/// Result for one client group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientReport {
    pub client: String,
    pub archives: Vec<String>,
    pub outcome: ClientOutcome,
}

/// Result of one run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Archives found in the source folder, tagged or not.
    pub archives_found: usize,
    pub clients: Vec<ClientReport>,
}

impl RunSummary {
    pub fn tickets_created(&self) -> usize {
        self.clients
            .iter()
            .filter(|c| c.outcome.ticket_id().is_some())
            .count()
    }

    pub fn clients_skipped(&self) -> usize {
        self.clients.len() - self.tickets_created()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_states() {
        assert!(ClientState::Done.is_terminal());
        assert!(ClientState::SkippedNoContact.is_terminal());
        assert!(ClientState::SkippedTicketFailed.is_terminal());
        assert!(!ClientState::Annotating.is_terminal());
        assert!(!ClientState::Pending.is_terminal());
    }

    #[test]
    fn test_state_display() {
        assert_eq!(ClientState::SkippedNoContact.to_string(), "skipped_no_contact");
        assert_eq!(ClientState::Extracting.to_string(), "extracting");
    }

    #[test]
    fn test_summary_counts() {
        let summary = RunSummary {
            archives_found: 3,
            clients: vec![
                ClientReport {
                    client: "Acme".to_string(),
                    archives: vec!["[Acme]a.zip".to_string()],
                    outcome: ClientOutcome::Done {
                        ticket_id: 901,
                        attachments: 2,
                        note_posted: true,
                        files_moved: 3,
                        move_failures: 0,
                    },
                },
                ClientReport {
                    client: "Globex".to_string(),
                    archives: vec!["[Globex]c.zip".to_string()],
                    outcome: ClientOutcome::SkippedNoContact {
                        reason: "none".to_string(),
                    },
                },
            ],
        };

        assert_eq!(summary.tickets_created(), 1);
        assert_eq!(summary.clients_skipped(), 1);
        assert_eq!(summary.clients[1].outcome.state(), ClientState::SkippedNoContact);
    }
}
