//! Contacts API trait
//!
//! The seam between the orchestration layer and the HTTP transport.

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{Contact, Email, Phone};

/// Operations offered by the contacts backend.
///
/// One method per resource/action pair. Implementations do not retry;
/// a failed call is reported once through the returned error.
#[async_trait]
pub trait ContactsApi: Send + Sync {
    /// `GET /personas`
    async fn list_contacts(&self) -> Result<Vec<Contact>>;

    /// `POST /personas`, returns the record with its server-assigned id
    async fn create_contact(&self, contact: &Contact) -> Result<Contact>;

    /// `PUT /personas/{id}`
    async fn update_contact(&self, id: i64, contact: &Contact) -> Result<Contact>;

    /// `DELETE /personas/{id}`
    async fn delete_contact(&self, id: i64) -> Result<()>;

    /// `GET /personas/{id}`
    async fn get_contact(&self, id: i64) -> Result<Contact>;

    /// `POST /phones`
    async fn add_phone(&self, phone: &Phone) -> Result<Phone>;

    /// `POST /emails`
    async fn add_email(&self, email: &Email) -> Result<Email>;
}
