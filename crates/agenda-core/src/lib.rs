//! agenda-core: Contacts manager core library
//!
//! Orchestration between the views and the contacts REST API:
//! configuration, the list presenter, the contact synchronizer and the
//! create/edit form controller.

pub mod config;
pub mod error;
pub mod form;
pub mod presenter;
pub mod sync;

#[cfg(test)]
mod test_support;

pub use config::Config;
pub use error::{Error, Result};
pub use form::{ContactForm, FormController, FormOutcome};
pub use presenter::{ListPresenter, Snapshot};
pub use sync::ContactSynchronizer;
