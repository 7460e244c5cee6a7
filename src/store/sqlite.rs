use super::{ContactStore, StoreError, creation_time};
use crate::api::models::{Contact, NewContact};
use crate::config::StoreLocation;
use async_trait::async_trait;
use chrono::DateTime;
use rusqlite::{Connection, OptionalExtension, Row, params};
use std::fs;
use std::path::Path;
use std::sync::{Arc, Mutex};
use uuid::Uuid;

const SCHEMA: &str = r#"
    CREATE TABLE IF NOT EXISTS contacts (
        id TEXT PRIMARY KEY,
        name TEXT NOT NULL,
        email TEXT NOT NULL,
        phone TEXT NOT NULL,
        message TEXT NOT NULL DEFAULT '',
        created_at INTEGER NOT NULL
    );
    CREATE INDEX IF NOT EXISTS idx_contacts_created_at ON contacts (created_at);
"#;

const COLUMNS: &str = "id, name, email, phone, message, created_at";

/// SQLite-backed store. The connection is opened on first use; a failed open
/// leaves nothing cached, so the next call tries again.
#[derive(Clone)]
pub struct SqliteStore {
    inner: Arc<Inner>,
}

struct Inner {
    location: StoreLocation,
    conn: Mutex<Option<Connection>>,
}

impl SqliteStore {
    pub fn new(location: StoreLocation) -> Self {
        Self {
            inner: Arc::new(Inner {
                location,
                conn: Mutex::new(None),
            }),
        }
    }

    async fn run<T, F>(&self, op: F) -> Result<T, StoreError>
    where
        T: Send + 'static,
        F: FnOnce(&mut Connection) -> Result<T, StoreError> + Send + 'static,
    {
        let inner = self.inner.clone();
        tokio::task::spawn_blocking(move || inner.with_conn(op)).await?
    }
}

impl Inner {
    fn with_conn<T>(
        &self,
        op: impl FnOnce(&mut Connection) -> Result<T, StoreError>,
    ) -> Result<T, StoreError> {
        let mut slot = self
            .conn
            .lock()
            .map_err(|_| StoreError::Unavailable("connection lock poisoned".into()))?;
        if slot.is_none() {
            *slot = Some(open_conn(&self.location)?);
        }
        match slot.as_mut() {
            Some(conn) => op(conn),
            None => Err(StoreError::Unavailable("no connection".into())),
        }
    }
}

fn ensure_dir(path: &Path) -> std::io::Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => fs::create_dir_all(parent),
        _ => Ok(()),
    }
}

fn open_conn(location: &StoreLocation) -> Result<Connection, StoreError> {
    let conn = match location {
        StoreLocation::Memory => Connection::open_in_memory(),
        StoreLocation::File(path) => {
            ensure_dir(path).map_err(|e| {
                StoreError::Unavailable(format!("cannot create {}: {e}", path.display()))
            })?;
            Connection::open(path)
        }
    }
    .map_err(|e| StoreError::Unavailable(e.to_string()))?;
    if matches!(location, StoreLocation::File(_)) {
        conn.query_row("PRAGMA journal_mode = WAL", [], |_| Ok(()))
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;
    }
    conn.execute_batch(SCHEMA)
        .map_err(|e| StoreError::Unavailable(e.to_string()))?;
    log::debug!("opened contact store at {location}");
    Ok(conn)
}

fn contact_from_row(row: &Row<'_>) -> rusqlite::Result<Contact> {
    let id: String = row.get(0)?;
    let id = Uuid::parse_str(&id).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e))
    })?;
    let millis: i64 = row.get(5)?;
    let created_at = DateTime::from_timestamp_millis(millis).ok_or(
        rusqlite::Error::IntegralValueOutOfRange(5, millis),
    )?;
    Ok(Contact {
        id,
        name: row.get(1)?,
        email: row.get(2)?,
        phone: row.get(3)?,
        message: row.get(4)?,
        created_at,
    })
}

#[async_trait]
impl ContactStore for SqliteStore {
    fn backend_tag(&self) -> &'static str {
        "sqlite"
    }

    async fn connect(&self) -> Result<(), StoreError> {
        self.run(|_| Ok(())).await
    }

    async fn insert(&self, contact: NewContact) -> Result<Contact, StoreError> {
        let stored = contact.into_contact(Uuid::new_v4(), creation_time());
        let row = stored.clone();
        self.run(move |conn| {
            conn.execute(
                &format!("INSERT INTO contacts ({COLUMNS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6)"),
                params![
                    row.id.to_string(),
                    row.name,
                    row.email,
                    row.phone,
                    row.message,
                    row.created_at.timestamp_millis(),
                ],
            )?;
            Ok(())
        })
        .await?;
        Ok(stored)
    }

    async fn list_all(&self) -> Result<Vec<Contact>, StoreError> {
        self.run(|conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {COLUMNS} FROM contacts ORDER BY created_at DESC, rowid DESC"
            ))?;
            let rows = stmt.query_map([], contact_from_row)?;
            let mut out = Vec::new();
            for r in rows {
                out.push(r?);
            }
            Ok(out)
        })
        .await
    }

    async fn delete_by_id(&self, id: Uuid) -> Result<Option<Contact>, StoreError> {
        self.run(move |conn| {
            let removed = conn
                .query_row(
                    &format!("DELETE FROM contacts WHERE id = ?1 RETURNING {COLUMNS}"),
                    params![id.to_string()],
                    contact_from_row,
                )
                .optional()?;
            Ok(removed)
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn new_contact(name: &str) -> NewContact {
        NewContact {
            name: name.into(),
            email: "someone@x.com".into(),
            phone: "555".into(),
            message: "hi".into(),
        }
    }

    #[tokio::test]
    async fn round_trips_through_a_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("contacts.sqlite");
        let store = SqliteStore::new(StoreLocation::File(path.clone()));
        let ann = store.insert(new_contact("Ann")).await.unwrap();

        let reopened = SqliteStore::new(StoreLocation::File(path));
        assert_eq!(reopened.list_all().await.unwrap(), vec![ann]);
    }

    #[tokio::test]
    async fn lists_newest_first() {
        let store = SqliteStore::new(StoreLocation::Memory);
        let first = store.insert(new_contact("First")).await.unwrap();
        let second = store.insert(new_contact("Second")).await.unwrap();
        let listed = store.list_all().await.unwrap();
        assert_eq!(listed, vec![second, first]);
    }

    #[tokio::test]
    async fn delete_returns_the_removed_record() {
        let store = SqliteStore::new(StoreLocation::Memory);
        let ann = store.insert(new_contact("Ann")).await.unwrap();
        assert_eq!(store.delete_by_id(ann.id).await.unwrap(), Some(ann.clone()));
        assert_eq!(store.delete_by_id(ann.id).await.unwrap(), None);
        assert!(store.list_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn unreachable_location_is_reported() {
        let dir = tempdir().unwrap();
        let blocker = dir.path().join("file");
        std::fs::write(&blocker, b"not a directory").unwrap();
        let store = SqliteStore::new(StoreLocation::File(blocker.join("contacts.sqlite")));
        let err = store.list_all().await.unwrap_err();
        assert!(matches!(err, StoreError::Unavailable(_)), "{err:?}");
        assert!(store.connect().await.is_err());
    }

    #[tokio::test]
    async fn reopens_once_the_location_becomes_reachable() {
        let dir = tempdir().unwrap();
        let blocker = dir.path().join("data");
        std::fs::write(&blocker, b"not a directory").unwrap();
        let store = SqliteStore::new(StoreLocation::File(blocker.join("contacts.sqlite")));
        assert!(store.list_all().await.is_err());

        std::fs::remove_file(&blocker).unwrap();
        assert!(store.list_all().await.unwrap().is_empty());
        let ann = store.insert(new_contact("Ann")).await.unwrap();
        assert_eq!(store.list_all().await.unwrap(), vec![ann]);
    }
}
