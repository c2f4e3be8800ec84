//! Contact synchronizer
//!
//! Turns one submitted contact into a create-or-update call followed by
//! one call per phone and per email. The writes are not atomic: when the
//! contact call succeeds and a sub-resource call fails, the contact stays
//! persisted without that entry. Sub-resource failures are logged and
//! never retried.

use std::sync::Arc;

use agenda_contacts::{Contact, ContactsApi, Email, Phone, UNSAVED_ID};
use tracing::{debug, error, info, warn};

use crate::presenter::ListPresenter;

/// Persists contacts together with their phones and emails
pub struct ContactSynchronizer {
    api: Arc<dyn ContactsApi>,
    presenter: Arc<ListPresenter>,
}

impl ContactSynchronizer {
    pub fn new(api: Arc<dyn ContactsApi>, presenter: Arc<ListPresenter>) -> Self {
        Self { api, presenter }
    }

    /// Save a contact and its sub-resources.
    ///
    /// Returns `true` once the contact itself is persisted; phone and email
    /// outcomes do not affect the result. The list is refreshed only on
    /// success.
    pub async fn save(&self, contact: Contact) -> bool {
        let result = if contact.is_new() {
            debug!("Creating new contact");
            self.api.create_contact(&contact).await
        } else {
            debug!("Updating existing contact: {}", contact.id);
            self.api.update_contact(contact.id, &contact).await
        };

        let saved = match result {
            Ok(saved) => saved,
            Err(e) => {
                error!("Failed to save contact: {}", e);
                return false;
            }
        };

        let contact_id = match (saved.id, contact.is_new()) {
            (UNSAVED_ID, true) => {
                error!("Create response carried no contact id; phones and emails not sent");
                return false;
            }
            (UNSAVED_ID, false) => contact.id,
            (id, _) => id,
        };
        info!("Contact saved: {}", contact_id);

        self.attach_sub_resources(contact_id, &contact.phones, &contact.emails)
            .await;

        if let Err(e) = self.presenter.refresh().await {
            error!("Refresh after saving contact {} failed: {}", contact_id, e);
        }

        true
    }

    async fn attach_sub_resources(&self, contact_id: i64, phones: &[Phone], emails: &[Email]) {
        for phone in phones {
            let request = outbound_phone(contact_id, phone);
            match self.api.add_phone(&request).await {
                Ok(_) => info!("Phone added to contact {}: {}", contact_id, phone.number),
                Err(e) => warn!("Failed to add phone to contact {}: {}", contact_id, e),
            }
        }

        for email in emails {
            let request = outbound_email(contact_id, email);
            match self.api.add_email(&request).await {
                Ok(_) => info!("Email added to contact {}: {}", contact_id, email.email),
                Err(e) => warn!("Failed to add email to contact {}: {}", contact_id, e),
            }
        }
    }
}

/// Phone as sent to `POST /phones`.
///
/// `number` and `label` travel swapped; the backend contract has not been
/// confirmed either way, so the swap is kept until it is.
pub fn outbound_phone(contact_id: i64, phone: &Phone) -> Phone {
    Phone {
        id: UNSAVED_ID,
        persona_id: contact_id,
        number: phone.label.clone(),
        label: phone.number.clone(),
    }
}

/// Email as sent to `POST /emails`, with `email` and `label` swapped like phones.
pub fn outbound_email(contact_id: i64, email: &Email) -> Email {
    Email {
        id: UNSAVED_ID,
        persona_id: contact_id,
        email: email.label.clone(),
        label: email.email.clone(),
    }
}
