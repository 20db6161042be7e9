//! Internal follow-up note on a freshly created ticket.

use tracing::{error, info};

use crate::config::NoteConfig;
use crate::helpdesk::{HelpdeskApi, HelpdeskError, NewArticle, TicketId};

/// Builds the internal, non customer-visible note article.
pub fn internal_note(ticket_id: TicketId, note: &NoteConfig) -> NewArticle {
    NewArticle {
        ticket_id,
        subject: note.subject.clone(),
        body: note.body.clone(),
        kind: "note".to_string(),
        internal: true,
    }
}

/// Posts the internal note. Best effort: failures are logged and returned,
/// the ticket itself is left untouched.
pub async fn post_internal_note<H>(
    api: &H,
    ticket_id: TicketId,
    note: &NoteConfig,
) -> Result<(), HelpdeskError>
where
    H: HelpdeskApi + ?Sized,
{
    match api.create_article(&internal_note(ticket_id, note)).await {
        Ok(_) => {
            info!("Internal note added to ticket {}", ticket_id);
            Ok(())
        }
        Err(e) => {
            error!("Failed to add internal note to ticket {}: {}", ticket_id, e);
            if let Some(body) = e.response_body() {
                error!("Response content: {}", body);
            }
            Err(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockHelpdesk;

    #[tokio::test]
    async fn test_post_internal_note() {
        let api = MockHelpdesk::new();
        post_internal_note(&api, 901, &NoteConfig::default())
            .await
            .unwrap();

        let articles = api.recorded_articles().await;
        assert_eq!(articles.len(), 1);
        let article = &articles[0].article;
        assert_eq!(article.ticket_id, 901);
        assert_eq!(article.subject, "Internal Note");
        assert_eq!(article.kind, "note");
        assert!(article.internal);
    }

    #[tokio::test]
    async fn test_post_internal_note_failure_is_reported() {
        let api = MockHelpdesk::new();
        api.set_next_article_error(HelpdeskError::ApiError {
            status: 403,
            body: "forbidden".to_string(),
        })
        .await;

        let result = post_internal_note(&api, 901, &NoteConfig::default()).await;
        assert!(matches!(result, Err(HelpdeskError::ApiError { status: 403, .. })));
    }
}
