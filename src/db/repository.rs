use rusqlite::{params, OptionalExtension};
use tokio_rusqlite::Connection;

use crate::error::Result;

use super::schema::SCHEMA;

/// String key-value store backed by SQLite. Writes are last-write-wins.
pub struct Repository {
    conn: Connection,
}

impl Repository {
    pub async fn new(db_path: &str) -> Result<Self> {
        let conn = Connection::open(db_path).await?;

        conn.call(|conn| {
            conn.execute_batch(SCHEMA)?;
            Ok(())
        })
        .await?;

        Ok(Self { conn })
    }

    pub async fn get_value(&self, key: &str) -> Result<Option<String>> {
        let key = key.to_string();
        let value = self
            .conn
            .call(move |conn| {
                let value = conn
                    .query_row(
                        "SELECT value FROM kv_store WHERE key = ?1",
                        params![key],
                        |row| row.get::<_, String>(0),
                    )
                    .optional()?;
                Ok(value)
            })
            .await?;
        Ok(value)
    }

    pub async fn set_value(&self, key: &str, value: &str) -> Result<()> {
        let key = key.to_string();
        let value = value.to_string();
        self.conn
            .call(move |conn| {
                conn.execute(
                    r#"INSERT INTO kv_store (key, value) VALUES (?1, ?2)
                       ON CONFLICT(key) DO UPDATE SET
                           value = excluded.value,
                           updated_at = datetime('now')"#,
                    params![key, value],
                )?;
                Ok(())
            })
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn temp_repository() -> (tempfile::TempDir, Repository) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.db");
        let repository = Repository::new(path.to_str().unwrap()).await.unwrap();
        (dir, repository)
    }

    #[tokio::test]
    async fn missing_key_reads_as_none() {
        let (_dir, repository) = temp_repository().await;
        assert_eq!(repository.get_value("absent").await.unwrap(), None);
    }

    #[tokio::test]
    async fn later_write_overwrites_earlier_one() {
        let (_dir, repository) = temp_repository().await;
        repository.set_value("k", "true").await.unwrap();
        repository.set_value("k", "false").await.unwrap();
        assert_eq!(
            repository.get_value("k").await.unwrap().as_deref(),
            Some("false")
        );
    }

    #[tokio::test]
    async fn values_survive_reopening_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.db");
        let path = path.to_str().unwrap();

        Repository::new(path)
            .await
            .unwrap()
            .set_value("k", "true")
            .await
            .unwrap();

        let reopened = Repository::new(path).await.unwrap();
        assert_eq!(reopened.get_value("k").await.unwrap().as_deref(), Some("true"));
    }
}
