//! Finds an organization's main contact.

use thiserror::Error;
use tracing::{error, info};

use crate::helpdesk::{HelpdeskApi, HelpdeskError, HelpdeskUser};

/// The resolved recipient for a client's ticket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Contact {
    pub id: u64,
    pub name: String,
    pub email: String,
}

/// Why a main contact could not be resolved.
#[derive(Debug, Error)]
pub enum ContactError {
    #[error("No main contact found for organization '{organization}'")]
    NoMainContact { organization: String },

    #[error("Main contact for organization '{organization}' has no valid email address")]
    MissingEmail { organization: String, user_id: u64 },

    #[error("Failed to fetch users of organization '{organization}': {source}")]
    Backend {
        organization: String,
        #[source]
        source: HelpdeskError,
    },
}

/// Picks the first user flagged as main contact. Only that user is
/// considered: if it has no usable email, later users are not consulted.
pub fn select_main_contact(
    organization: &str,
    users: &[HelpdeskUser],
) -> Result<Contact, ContactError> {
    let user = users
        .iter()
        .find(|u| u.main_contact)
        .ok_or_else(|| ContactError::NoMainContact {
            organization: organization.to_string(),
        })?;

    let email = user.usable_email().ok_or_else(|| ContactError::MissingEmail {
        organization: organization.to_string(),
        user_id: user.id,
    })?;

    Ok(Contact {
        id: user.id,
        name: user.full_name(),
        email: email.to_string(),
    })
}

/// Looks up the main contact of `organization` with a single search request.
///
/// Every failure, including transport errors, comes back as a
/// `ContactError` and is logged here.
pub async fn resolve_main_contact<H>(api: &H, organization: &str) -> Result<Contact, ContactError>
where
    H: HelpdeskApi + ?Sized,
{
    let result = match api.search_organization_users(organization).await {
        Ok(users) => select_main_contact(organization, &users),
        Err(source) => Err(ContactError::Backend {
            organization: organization.to_string(),
            source,
        }),
    };

    match &result {
        Ok(contact) => info!(
            "Main contact for organization '{}' is {} (ID: {}, Email: {})",
            organization, contact.name, contact.id, contact.email
        ),
        Err(e) => error!("{}", e),
    }

    result
}
