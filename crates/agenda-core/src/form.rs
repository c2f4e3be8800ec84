//! Create/edit form controller

use std::sync::Arc;

use agenda_contacts::{Contact, ContactsApi, Email, EmailLabel, Phone, PhoneLabel, UNSAVED_ID};
use tracing::{debug, info, warn};

use crate::sync::ContactSynchronizer;
use crate::Result;

/// Values collected by the contact form
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactForm {
    /// Id of the record being edited, `None` for a new contact
    pub editing: Option<i64>,
    pub name: String,
    pub last_name: String,
    pub company: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub phone: String,
    pub phone_label: PhoneLabel,
    pub email: String,
    pub email_label: EmailLabel,
    pub profile_picture: Option<String>,
}

impl ContactForm {
    /// Empty form for a new contact
    pub fn new() -> Self {
        Self::default()
    }

    /// Populate the form from a stored contact.
    ///
    /// Only the first phone and first email are shown; labels outside the
    /// fixed sets fall back to the default label.
    pub fn from_contact(contact: &Contact) -> Self {
        let (phone, phone_label) = contact
            .phones
            .first()
            .map(|p| (p.number.clone(), p.label.parse::<PhoneLabel>().unwrap_or_default()))
            .unwrap_or_default();
        let (email, email_label) = contact
            .emails
            .first()
            .map(|e| (e.email.clone(), e.label.parse::<EmailLabel>().unwrap_or_default()))
            .unwrap_or_default();

        Self {
            editing: Some(contact.id),
            name: contact.name.clone(),
            last_name: contact.last_name.clone(),
            company: contact.company.clone(),
            address: contact.address.clone(),
            city: contact.city.clone(),
            state: contact.state.clone(),
            phone,
            phone_label,
            email,
            email_label,
            profile_picture: contact.profile_picture.clone(),
        }
    }

    /// Build the contact to submit.
    ///
    /// Blank phone/email fields are left out; a missing picture is sent as
    /// an empty string.
    pub fn to_contact(&self) -> Contact {
        let mut phones = Vec::new();
        if !self.phone.trim().is_empty() {
            phones.push(Phone::new(self.phone.clone(), self.phone_label.as_str()));
        }

        let mut emails = Vec::new();
        if !self.email.trim().is_empty() {
            emails.push(Email::new(self.email.clone(), self.email_label.as_str()));
        }

        Contact {
            id: self.editing.unwrap_or(UNSAVED_ID),
            name: self.name.clone(),
            last_name: self.last_name.clone(),
            company: self.company.clone(),
            address: self.address.clone(),
            city: self.city.clone(),
            state: self.state.clone(),
            profile_picture: Some(self.profile_picture.clone().unwrap_or_default()),
            phones,
            emails,
        }
    }
}

/// Result of submitting the form
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormOutcome {
    /// Contact persisted; the form can be closed
    Saved,
    /// Saving failed; the form stays open with its values
    Failed,
}

/// Drives the contact form
pub struct FormController {
    api: Arc<dyn ContactsApi>,
    synchronizer: Arc<ContactSynchronizer>,
}

impl FormController {
    pub fn new(api: Arc<dyn ContactsApi>, synchronizer: Arc<ContactSynchronizer>) -> Self {
        Self { api, synchronizer }
    }

    /// Fetch a contact and fill the form for editing
    pub async fn load(&self, id: i64) -> Result<ContactForm> {
        let contact = self.api.get_contact(id).await.inspect_err(|e| {
            warn!("Failed to load contact {}: {}", id, e);
        })?;

        debug!("Loaded contact for editing: {}", contact.id);

        // The form edits the requested record even if the echo omits the id
        let mut form = ContactForm::from_contact(&contact);
        form.editing = Some(id);
        Ok(form)
    }

    /// Submit the form through the synchronizer
    pub async fn submit(&self, form: &ContactForm) -> FormOutcome {
        let contact = form.to_contact();

        info!("Saving contact: {}", contact.display_name());

        if self.synchronizer.save(contact).await {
            FormOutcome::Saved
        } else {
            warn!("Contact form could not be saved");
            FormOutcome::Failed
        }
    }
}
