//! agenda-contacts: REST client for the contacts backend
//!
//! This crate provides the data model and a typed HTTP client for the
//! contacts ("personas") resource and its phone/email sub-resources.
//!
//! ## Features
//!
//! - `ContactsApi` trait, one method per resource/action pair
//! - reqwest-backed `ContactsClient`
//! - Fixed phone/email label sets
//!
//! ## Usage
//!
//! ```rust,ignore
//! use agenda_contacts::{Contact, ContactsApi, ContactsClient, ContactsConfig};
//!
//! let client = ContactsClient::new(&ContactsConfig::new("http://localhost:8000/api"))?;
//!
//! // Get all contacts
//! let contacts = client.list_contacts().await?;
//!
//! // Add contact
//! let created = client.create_contact(&Contact::new("Ana")).await?;
//! ```

pub mod api;
pub mod client;
pub mod error;
pub mod models;

pub use api::ContactsApi;
pub use client::ContactsClient;
pub use error::{ContactsError, Result};
pub use models::{Contact, ContactsConfig, Email, EmailLabel, Phone, PhoneLabel, UNSAVED_ID};

/// Re-export models for easy use
pub mod prelude {
    pub use super::{Contact, ContactsApi, ContactsClient, ContactsConfig, Email, Phone};
}
