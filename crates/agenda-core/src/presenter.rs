//! Contact list presenter
//!
//! Holds the last server-confirmed contact list and republishes it to
//! observers after every successful refresh.

use std::sync::Arc;

use agenda_contacts::{Contact, ContactsApi};
use tokio::sync::{broadcast, RwLock};
use tracing::{debug, error, info};

use crate::Result;

/// Capacity of the snapshot broadcast channel
const OBSERVER_CAPACITY: usize = 16;

/// Immutable copy of the contact list
pub type Snapshot = Arc<Vec<Contact>>;

/// Contact list state shared between views
pub struct ListPresenter {
    api: Arc<dyn ContactsApi>,
    contacts: RwLock<Snapshot>,
    snapshot_tx: broadcast::Sender<Snapshot>,
}

impl ListPresenter {
    /// Create a presenter with an empty list
    pub fn new(api: Arc<dyn ContactsApi>) -> Self {
        let (snapshot_tx, _) = broadcast::channel(OBSERVER_CAPACITY);
        Self {
            api,
            contacts: RwLock::new(Arc::new(Vec::new())),
            snapshot_tx,
        }
    }

    /// Current snapshot
    pub async fn contacts(&self) -> Snapshot {
        Arc::clone(&*self.contacts.read().await)
    }

    /// Look up a contact in the current snapshot
    pub async fn find(&self, id: i64) -> Option<Contact> {
        self.contacts.read().await.iter().find(|c| c.id == id).cloned()
    }

    /// Register an observer.
    ///
    /// Every successful refresh sends the whole list, not a diff.
    pub fn subscribe(&self) -> broadcast::Receiver<Snapshot> {
        self.snapshot_tx.subscribe()
    }

    /// Fetch the full list and publish it.
    ///
    /// On failure the held list is left untouched.
    pub async fn refresh(&self) -> Result<Snapshot> {
        let contacts = match self.api.list_contacts().await {
            Ok(contacts) => contacts,
            Err(e) => {
                error!("Failed to fetch contacts: {}", e);
                return Err(e.into());
            }
        };

        let snapshot: Snapshot = Arc::new(contacts);

        // Store and publish under one write guard so observers see lists in store order
        let mut current = self.contacts.write().await;
        *current = Arc::clone(&snapshot);
        if self.snapshot_tx.send(Arc::clone(&snapshot)).is_err() {
            debug!("No observers for contact list");
        }
        drop(current);

        info!("Contact list refreshed: {} contacts", snapshot.len());
        Ok(snapshot)
    }

    /// Delete a contact on the server, then refresh.
    ///
    /// The local list is never edited directly; a failed delete leaves it
    /// unchanged and issues no list request.
    pub async fn remove(&self, id: i64) -> Result<()> {
        if let Err(e) = self.api.delete_contact(id).await {
            error!("Failed to delete contact {}: {}", id, e);
            return Err(e.into());
        }

        info!("Contact {} deleted", id);

        if let Err(e) = self.refresh().await {
            error!("Refresh after deleting contact {} failed: {}", id, e);
        }

        Ok(())
    }
}
