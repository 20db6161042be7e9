//! Zammad REST API client.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::config::ApiConfig;

use super::{
    CreatedArticle, CreatedTicket, HelpdeskApi, HelpdeskError, HelpdeskUser, NewArticle,
    NewTicket,
};

/// Builds the user search URL for an organization, percent-encoding the name.
pub fn organization_search_url(base_url: &str, organization: &str) -> String {
    format!(
        "{}/users/search?query=organization.name:{}",
        base_url.trim_end_matches('/'),
        urlencoding::encode(organization)
    )
}

/// Zammad API client.
pub struct ZammadClient {
    client: Client,
    base_url: String,
}

impl ZammadClient {
    /// Create a new client. Every request carries the bearer token and the
    /// configured extra headers.
    pub fn new(config: &ApiConfig) -> Result<Self, HelpdeskError> {
        if config.token.is_empty() {
            return Err(HelpdeskError::NotConfigured(
                "API token is required".to_string(),
            ));
        }

        let mut headers = HeaderMap::new();
        for (name, value) in &config.headers {
            let name = HeaderName::from_bytes(name.as_bytes()).map_err(|e| {
                HelpdeskError::NotConfigured(format!("Invalid header name '{}': {}", name, e))
            })?;
            let value = HeaderValue::from_str(value).map_err(|e| {
                HelpdeskError::NotConfigured(format!("Invalid value for header {}: {}", name, e))
            })?;
            headers.insert(name, value);
        }

        let mut auth = HeaderValue::from_str(&format!("Bearer {}", config.token))
            .map_err(|e| HelpdeskError::NotConfigured(format!("Invalid API token: {}", e)))?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Turns a response into `T`, keeping the raw body on non-2xx statuses.
    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, HelpdeskError> {
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(HelpdeskError::ApiError {
                status: status.as_u16(),
                body,
            });
        }

        serde_json::from_str(&body).map_err(|e| {
            HelpdeskError::ParseError(format!("{} (body: {})", e, truncate(&body, 200)))
        })
    }
}

fn truncate(s: &str, max_chars: usize) -> String {
    s.chars().take(max_chars).collect()
}

#[async_trait]
impl HelpdeskApi for ZammadClient {
    async fn search_organization_users(
        &self,
        organization: &str,
    ) -> Result<Vec<HelpdeskUser>, HelpdeskError> {
        let url = organization_search_url(&self.base_url, organization);
        debug!("Zammad user search: organization='{}'", organization);

        let response = self.client.get(&url).send().await?;
        Self::decode(response).await
    }

    async fn create_ticket(&self, ticket: &NewTicket) -> Result<CreatedTicket, HelpdeskError> {
        let url = format!("{}/tickets", self.base_url);
        debug!(
            "Zammad create ticket: title='{}', attachments={}",
            ticket.title,
            ticket.article.attachments.len()
        );

        let response = self.client.post(&url).json(ticket).send().await?;
        Self::decode(response).await
    }

    async fn create_article(
        &self,
        article: &NewArticle,
    ) -> Result<CreatedArticle, HelpdeskError> {
        let url = format!("{}/ticket_articles", self.base_url);
        debug!("Zammad create article: ticket={}", article.ticket_id);

        let response = self.client.post(&url).json(article).send().await?;
        Self::decode(response).await
    }
}
