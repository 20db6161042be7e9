//! Mock helpdesk backend for testing.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::helpdesk::{
    CreatedArticle, CreatedTicket, HelpdeskApi, HelpdeskError, HelpdeskUser, NewArticle,
    NewTicket, TicketId,
};

/// A recorded ticket creation for test assertions.
#[derive(Debug, Clone)]
pub struct RecordedTicket {
    /// The request that was submitted.
    pub ticket: NewTicket,
    /// Id handed out, `None` when the call failed.
    pub id: Option<TicketId>,
}

/// A recorded article creation for test assertions.
#[derive(Debug, Clone)]
pub struct RecordedArticle {
    pub article: NewArticle,
    pub success: bool,
}

/// Mock implementation of the HelpdeskApi trait.
///
/// Provides controllable behavior for testing:
/// - Configure the users each organization search returns
/// - Track searches, tickets and articles for assertions
/// - Simulate one-off failures per operation
///
/// # Example
///
/// ```rust,ignore
/// use zipdesk_core::testing::{fixtures, MockHelpdesk};
///
/// let api = MockHelpdesk::new();
/// api.set_users("Acme", vec![fixtures::user(42, "ops@acme.com", true)]).await;
/// api.set_next_ticket_id(901).await;
///
/// // ... run the pipeline ...
///
/// let tickets = api.recorded_tickets().await;
/// assert_eq!(tickets[0].id, Some(901));
/// ```
#[derive(Debug)]
pub struct MockHelpdesk {
    /// Users returned per organization name.
    users: Arc<RwLock<HashMap<String, Vec<HelpdeskUser>>>>,
    /// Organization names searched, in call order.
    searches: Arc<RwLock<Vec<String>>>,
    tickets: Arc<RwLock<Vec<RecordedTicket>>>,
    articles: Arc<RwLock<Vec<RecordedArticle>>>,
    /// Id given to the next created ticket; incremented after each success.
    next_ticket_id: Arc<RwLock<TicketId>>,
    /// If set, the next search fails with this error.
    next_search_error: Arc<RwLock<Option<HelpdeskError>>>,
    /// If set, the next ticket creation fails with this error.
    next_ticket_error: Arc<RwLock<Option<HelpdeskError>>>,
    /// If set, the next article creation fails with this error.
    next_article_error: Arc<RwLock<Option<HelpdeskError>>>,
}

impl Default for MockHelpdesk {
    fn default() -> Self {
        Self::new()
    }
}

impl MockHelpdesk {
    /// Create a new mock with no organizations.
    pub fn new() -> Self {
        Self {
            users: Arc::new(RwLock::new(HashMap::new())),
            searches: Arc::new(RwLock::new(Vec::new())),
            tickets: Arc::new(RwLock::new(Vec::new())),
            articles: Arc::new(RwLock::new(Vec::new())),
            next_ticket_id: Arc::new(RwLock::new(1000)),
            next_search_error: Arc::new(RwLock::new(None)),
            next_ticket_error: Arc::new(RwLock::new(None)),
            next_article_error: Arc::new(RwLock::new(None)),
        }
    }

    /// Set the users returned when searching `organization`.
    pub async fn set_users(&self, organization: &str, users: Vec<HelpdeskUser>) {
        self.users
            .write()
            .await
            .insert(organization.to_string(), users);
    }

    /// Set the id the next created ticket receives.
    pub async fn set_next_ticket_id(&self, id: TicketId) {
        *self.next_ticket_id.write().await = id;
    }

    /// Configure the next search to fail with the given error.
    pub async fn set_next_search_error(&self, error: HelpdeskError) {
        *self.next_search_error.write().await = Some(error);
    }

    /// Configure the next ticket creation to fail with the given error.
    pub async fn set_next_ticket_error(&self, error: HelpdeskError) {
        *self.next_ticket_error.write().await = Some(error);
    }

    /// Configure the next article creation to fail with the given error.
    pub async fn set_next_article_error(&self, error: HelpdeskError) {
        *self.next_article_error.write().await = Some(error);
    }

    /// Organization names searched so far.
    pub async fn recorded_searches(&self) -> Vec<String> {
        self.searches.read().await.clone()
    }

    /// All ticket creation attempts.
    pub async fn recorded_tickets(&self) -> Vec<RecordedTicket> {
        self.tickets.read().await.clone()
    }

    /// Number of tickets actually created.
    pub async fn created_ticket_count(&self) -> usize {
        self.tickets
            .read()
            .await
            .iter()
            .filter(|t| t.id.is_some())
            .count()
    }

    /// All article creation attempts.
    pub async fn recorded_articles(&self) -> Vec<RecordedArticle> {
        self.articles.read().await.clone()
    }
}

#[async_trait]
impl HelpdeskApi for MockHelpdesk {
    async fn search_organization_users(
        &self,
        organization: &str,
    ) -> Result<Vec<HelpdeskUser>, HelpdeskError> {
        self.searches.write().await.push(organization.to_string());

        if let Some(err) = self.next_search_error.write().await.take() {
            return Err(err);
        }

        Ok(self
            .users
            .read()
            .await
            .get(organization)
            .cloned()
            .unwrap_or_default())
    }

    async fn create_ticket(&self, ticket: &NewTicket) -> Result<CreatedTicket, HelpdeskError> {
        if let Some(err) = self.next_ticket_error.write().await.take() {
            self.tickets.write().await.push(RecordedTicket {
                ticket: ticket.clone(),
                id: None,
            });
            return Err(err);
        }

        let id = {
            let mut next = self.next_ticket_id.write().await;
            let id = *next;
            *next += 1;
            id
        };

        self.tickets.write().await.push(RecordedTicket {
            ticket: ticket.clone(),
            id: Some(id),
        });

        Ok(CreatedTicket { id })
    }

    async fn create_article(
        &self,
        article: &NewArticle,
    ) -> Result<CreatedArticle, HelpdeskError> {
        let error = self.next_article_error.write().await.take();

        let mut articles = self.articles.write().await;
        articles.push(RecordedArticle {
            article: article.clone(),
            success: error.is_none(),
        });

        match error {
            Some(err) => Err(err),
            None => Ok(CreatedArticle {
                id: articles.len() as u64,
            }),
        }
    }
}
