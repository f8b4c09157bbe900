//! [`SessionStore`] backed by the `sessions` table, which is created by the
//! regular migrations

use axum::async_trait;
use deadpool_sqlite::{Object, Pool};
use rusqlite::{params, OptionalExtension};
use thiserror::Error;
use tower_sessions::{
    cookie::time::OffsetDateTime,
    session::{Id, Record},
    session_store, ExpiredDeletion, SessionStore,
};
use tracing::{debug, instrument};

#[derive(Debug, Error)]
pub enum SqliteSessionStoreError {
    #[error("Deadpool interact error: {0}")]
    DeadpoolInteract(#[from] deadpool_sqlite::InteractError),
    #[error("Deadpool pool error: {0}")]
    DeadpoolPool(#[from] deadpool_sqlite::PoolError),
    #[error("Rusqlite error: {0}")]
    Rusqlite(#[from] rusqlite::Error),
    #[error("Serde json decode error: {0}")]
    JsonDecode(serde_json::Error),
    #[error("Serde json encode error: {0}")]
    JsonEncode(serde_json::Error),
}

impl From<SqliteSessionStoreError> for session_store::Error {
    fn from(err: SqliteSessionStoreError) -> Self {
        use session_store::Error;
        use SqliteSessionStoreError::*;

        match err {
            JsonEncode(inner) => Error::Encode(inner.to_string()),
            JsonDecode(inner) => Error::Decode(inner.to_string()),
            other => Error::Backend(other.to_string()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SqliteSessionStore {
    pool: Pool,
}

impl SqliteSessionStore {
    pub fn new(pool: Pool) -> Self {
        Self { pool }
    }

    async fn get_conn(&self) -> Result<Object, session_store::Error> {
        Ok(self
            .pool
            .get()
            .await
            .map_err(SqliteSessionStoreError::from)?)
    }

    /// Runs `f` on a pooled connection, flattening both layers of errors
    async fn interact<F, R>(&self, f: F) -> Result<R, session_store::Error>
    where
        F: FnOnce(&mut rusqlite::Connection) -> Result<R, rusqlite::Error> + Send + 'static,
        R: Send + 'static,
    {
        let conn = self.get_conn().await?;
        let result = conn
            .interact(f)
            .await
            .map_err(SqliteSessionStoreError::from)?
            .map_err(SqliteSessionStoreError::from)?;

        Ok(result)
    }
}

fn encode(record: &Record) -> Result<Vec<u8>, SqliteSessionStoreError> {
    serde_json::to_vec(record).map_err(SqliteSessionStoreError::JsonEncode)
}

#[async_trait]
impl ExpiredDeletion for SqliteSessionStore {
    #[instrument(skip(self))]
    async fn delete_expired(&self) -> Result<(), session_store::Error> {
        let now = OffsetDateTime::now_utc().unix_timestamp();

        let deleted = self
            .interact(move |conn| {
                conn.prepare_cached("DELETE FROM sessions WHERE expiry_date < ?1")?
                    .execute(params![now])
            })
            .await?;

        debug!(deleted, "Deleted expired sessions");
        Ok(())
    }
}

#[async_trait]
impl SessionStore for SqliteSessionStore {
    async fn create(&self, record: &mut Record) -> Result<(), session_store::Error> {
        let mut id = record.id;
        let payload = encode(record)?;
        let expiry = record.expiry_date.unix_timestamp();

        let id = self
            .interact(move |conn| {
                let tx = conn.transaction()?;

                {
                    let mut exists_stmt = tx.prepare_cached("SELECT 1 FROM sessions WHERE id = ?1")?;

                    // Re-key the record until we successfully find a unique ID
                    while exists_stmt.exists(params![id.to_string()])? {
                        id = Id::default();
                    }
                }

                tx.prepare_cached(
                    "INSERT INTO sessions (id, data, expiry_date) VALUES (?1, ?2, ?3)",
                )?
                .execute(params![id.to_string(), payload, expiry])?;

                tx.commit()?;

                Ok(id)
            })
            .await?;

        record.id = id;

        Ok(())
    }

    async fn save(&self, record: &Record) -> Result<(), session_store::Error> {
        let id = record.id.to_string();
        let payload = encode(record)?;
        let expiry = record.expiry_date.unix_timestamp();

        self.interact(move |conn| {
            // Upsert, the record may have been swept by delete_expired since it was loaded
            conn.prepare_cached(
                "INSERT INTO sessions (id, data, expiry_date) VALUES (?1, ?2, ?3)
                 ON CONFLICT (id) DO UPDATE SET data = excluded.data, expiry_date = excluded.expiry_date",
            )?
            .execute(params![id, payload, expiry])
        })
        .await?;

        Ok(())
    }

    async fn load(&self, id: &Id) -> Result<Option<Record>, session_store::Error> {
        let id_string = id.to_string();
        let now = OffsetDateTime::now_utc().unix_timestamp();

        let payload = self
            .interact(move |conn| {
                conn.prepare_cached("SELECT data FROM sessions WHERE id = ?1 AND expiry_date > ?2")?
                    .query_row(params![id_string, now], |row| row.get::<_, Vec<u8>>(0))
                    .optional()
            })
            .await?;

        let record = payload
            .map(|data| serde_json::from_slice::<Record>(&data))
            .transpose()
            .map_err(SqliteSessionStoreError::JsonDecode)?
            .map(|mut record| {
                // Make sure the id is updated after the re-keying done during insert
                record.id = *id;
                record
            });

        Ok(record)
    }

    async fn delete(&self, id: &Id) -> Result<(), session_store::Error> {
        let id_string = id.to_string();

        self.interact(move |conn| {
            conn.prepare_cached("DELETE FROM sessions WHERE id = ?1")?
                .execute(params![id_string])
        })
        .await?;

        Ok(())
    }
}

#[cfg(test)]
mod test {
    use tower_sessions::cookie::time::Duration;

    use super::*;
    use crate::db;

    fn test_store() -> (tempfile::TempDir, SqliteSessionStore) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sessions.sqlite");
        let path = path.to_str().unwrap();

        db::run_migrations(path).unwrap();
        let pool = db::create_pool(path).unwrap();

        (dir, SqliteSessionStore::new(pool))
    }

    fn record(expiry_date: OffsetDateTime) -> Record {
        Record {
            id: Id::default(),
            data: Default::default(),
            expiry_date,
        }
    }

    #[tokio::test]
    async fn test_create_load_delete() {
        let (_dir, store) = test_store();
        let mut record = record(OffsetDateTime::now_utc() + Duration::hours(1));
        record.data.insert("key".to_string(), serde_json::json!("value"));

        store.create(&mut record).await.unwrap();
        let loaded = store.load(&record.id).await.unwrap().unwrap();
        assert_eq!(loaded.data, record.data);

        store.delete(&record.id).await.unwrap();
        assert!(store.load(&record.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_expired_records_are_not_loaded() {
        let (_dir, store) = test_store();
        let mut record = record(OffsetDateTime::now_utc() - Duration::hours(1));

        store.create(&mut record).await.unwrap();
        assert!(store.load(&record.id).await.unwrap().is_none());

        store.delete_expired().await.unwrap();
        let remaining = store
            .interact(|conn| conn.query_row("SELECT COUNT(*) FROM sessions", [], |row| row.get::<_, i64>(0)))
            .await
            .unwrap();
        assert_eq!(remaining, 0);
    }
}
