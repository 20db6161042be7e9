//! Helpdesk ticketing backend.
//!
//! The pipeline talks to the backend through the `HelpdeskApi` trait so the
//! HTTP client can be swapped for `testing::MockHelpdesk` in tests.

mod types;
mod zammad;

pub use types::*;
pub use zammad::{organization_search_url, ZammadClient};

use async_trait::async_trait;
use thiserror::Error;

/// Errors that can occur when talking to the helpdesk.
#[derive(Debug, Error)]
pub enum HelpdeskError {
    /// Network or transport failure.
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Backend answered with a non-2xx status.
    #[error("API error: {status} - {body}")]
    ApiError { status: u16, body: String },

    /// Failed to parse response.
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// Client not configured (bad header, missing token, etc.).
    #[error("Client not configured: {0}")]
    NotConfigured(String),
}

impl HelpdeskError {
    /// Raw response content, when the backend sent any.
    pub fn response_body(&self) -> Option<&str> {
        match self {
            Self::ApiError { body, .. } => Some(body),
            _ => None,
        }
    }
}

/// Operations the intake pipeline needs from the ticketing backend.
#[async_trait]
pub trait HelpdeskApi: Send + Sync {
    /// Users belonging to the organization with this exact name, in the
    /// order the backend returns them.
    async fn search_organization_users(
        &self,
        organization: &str,
    ) -> Result<Vec<HelpdeskUser>, HelpdeskError>;

    /// Creates a ticket with its first article.
    async fn create_ticket(&self, ticket: &NewTicket) -> Result<CreatedTicket, HelpdeskError>;

    /// Adds an article to an existing ticket.
    async fn create_article(&self, article: &NewArticle)
        -> Result<CreatedArticle, HelpdeskError>;
}
