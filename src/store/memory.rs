use super::{ContactStore, StoreError, creation_time};
use crate::api::models::{Contact, NewContact};
use async_trait::async_trait;
use tokio::sync::Mutex;
use uuid::Uuid;

/// Process-local store. Records are kept in insertion order.
#[derive(Default)]
pub struct MemoryStore {
    contacts: Mutex<Vec<Contact>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a record with a caller-chosen timestamp.
    pub async fn push(&self, contact: Contact) {
        self.contacts.lock().await.push(contact);
    }
}

#[async_trait]
impl ContactStore for MemoryStore {
    fn backend_tag(&self) -> &'static str {
        "memory"
    }

    async fn connect(&self) -> Result<(), StoreError> {
        Ok(())
    }

    async fn insert(&self, contact: NewContact) -> Result<Contact, StoreError> {
        let stored = contact.into_contact(Uuid::new_v4(), creation_time());
        self.contacts.lock().await.push(stored.clone());
        Ok(stored)
    }

    async fn list_all(&self) -> Result<Vec<Contact>, StoreError> {
        let mut out: Vec<Contact> = self.contacts.lock().await.iter().rev().cloned().collect();
        // stable sort keeps later insertions first on equal timestamps
        out.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(out)
    }

    async fn delete_by_id(&self, id: Uuid) -> Result<Option<Contact>, StoreError> {
        let mut contacts = self.contacts.lock().await;
        Ok(contacts
            .iter()
            .position(|c| c.id == id)
            .map(|idx| contacts.remove(idx)))
    }
}
