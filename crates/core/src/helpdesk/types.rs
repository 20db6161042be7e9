//! Wire types for the helpdesk REST API.

use serde::{Deserialize, Serialize};

/// Identifier the backend assigns to a ticket.
pub type TicketId = u64;

/// A user record as returned by `GET /users/search`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HelpdeskUser {
    pub id: u64,
    #[serde(default)]
    pub firstname: Option<String>,
    #[serde(default)]
    pub lastname: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    /// Set on the organization's designated contact.
    #[serde(default)]
    pub main_contact: bool,
}

impl HelpdeskUser {
    /// "First Last", skipping missing parts.
    pub fn full_name(&self) -> String {
        [self.firstname.as_deref(), self.lastname.as_deref()]
            .into_iter()
            .flatten()
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// The email address if it is present and non-blank.
    pub fn usable_email(&self) -> Option<&str> {
        self.email.as_deref().filter(|e| !e.trim().is_empty())
    }
}

/// A file attached to a ticket article.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Attachment {
    pub filename: String,
    /// Base64 encoded file content.
    pub data: String,
    #[serde(rename = "mime-type")]
    pub mime_type: String,
}

/// The first article of a new ticket.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewTicketArticle {
    pub subject: String,
    pub body: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub content_type: String,
    pub to: String,
    pub internal: bool,
    #[serde(default)]
    pub attachments: Vec<Attachment>,
}

/// Body of `POST /tickets`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewTicket {
    pub title: String,
    pub group: String,
    pub article: NewTicketArticle,
    pub customer_id: u64,
    #[serde(rename = "customertype")]
    pub customer_type: String,
}

/// Body of `POST /ticket_articles`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewArticle {
    pub ticket_id: TicketId,
    pub subject: String,
    pub body: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub internal: bool,
}

/// Response of `POST /tickets`; other fields are ignored.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CreatedTicket {
    pub id: TicketId,
}

/// Response of `POST /ticket_articles`; other fields are ignored.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CreatedArticle {
    pub id: u64,
}
