//! Builds ticket content and submits it to the helpdesk.
//!
//! The ticket carries one outbound email article addressed to the client's
//! main contact, with every extracted file attached in input order.

mod attachment;
mod note;
mod template;

pub use attachment::{
    build_attachment, content_type_for, display_name, BINARY_CONTENT_TYPE, PDF_CONTENT_TYPE,
};
pub use note::{internal_note, post_internal_note};
pub use template::{render, TemplateContext};

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use thiserror::Error;
use tracing::{error, info};

use crate::config::TicketConfig;
use crate::contact::Contact;
use crate::helpdesk::{HelpdeskApi, HelpdeskError, NewTicket, NewTicketArticle, TicketId};

/// Errors that can occur while creating a ticket.
#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("Failed to read attachment {path}")]
    Attachment {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to create ticket: {0}")]
    Backend(#[from] HelpdeskError),
}

/// Rendered title, subject and body of a ticket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TicketText {
    pub title: String,
    pub subject: String,
    pub body: String,
}

/// Renders the three configured templates for a client.
pub fn render_ticket_text(
    config: &TicketConfig,
    client_name: &str,
    date: NaiveDate,
    files: &[PathBuf],
) -> TicketText {
    let date = date.format("%Y-%m-%d").to_string();
    let files_list = files
        .iter()
        .map(|f| display_name(f))
        .collect::<Vec<_>>()
        .join(", ");

    let ctx = TemplateContext {
        client_name,
        date: &date,
        files_list: &files_list,
    };

    TicketText {
        title: render(&config.title_template, &ctx),
        subject: render(&config.subject_template, &ctx),
        body: render(&config.body_template, &ctx),
    }
}

/// Assembles the ticket creation request, reading every file.
pub async fn build_ticket(
    config: &TicketConfig,
    client_name: &str,
    contact: &Contact,
    files: &[PathBuf],
    date: NaiveDate,
) -> Result<NewTicket, SubmitError> {
    let text = render_ticket_text(config, client_name, date, files);

    let mut attachments = Vec::with_capacity(files.len());
    for file in files {
        attachments.push(build_attachment(Path::new(file)).await?);
    }

    Ok(NewTicket {
        title: text.title,
        group: config.group.clone(),
        article: NewTicketArticle {
            subject: text.subject,
            body: text.body,
            kind: "email".to_string(),
            content_type: "text/plain".to_string(),
            to: contact.email.clone(),
            internal: false,
            attachments,
        },
        customer_id: contact.id,
        customer_type: config.customer_type.clone(),
    })
}

/// Creates the client's ticket and returns its id.
///
/// Failures are logged (with the raw response content when the backend sent
/// one) and returned; they only concern this client.
pub async fn submit_ticket<H>(
    api: &H,
    config: &TicketConfig,
    client_name: &str,
    contact: &Contact,
    files: &[PathBuf],
    date: NaiveDate,
) -> Result<TicketId, SubmitError>
where
    H: HelpdeskApi + ?Sized,
{
    let result = match build_ticket(config, client_name, contact, files, date).await {
        Ok(ticket) => api
            .create_ticket(&ticket)
            .await
            .map(|created| created.id)
            .map_err(SubmitError::from),
        Err(e) => Err(e),
    };

    match &result {
        Ok(id) => info!(
            "Ticket {} created for customer {} with {} attachment(s)",
            id,
            client_name,
            files.len()
        ),
        Err(e) => {
            error!("Failed to create ticket for '{}': {}", client_name, e);
            if let SubmitError::Backend(inner) = e {
                if let Some(body) = inner.response_body() {
                    error!("Response content: {}", body);
                }
            }
        }
    }

    result
}
