//! Document store: load, initialize, persist, clear and import.
//!
//! Every write replaces the whole document in a single statement or transaction.

use chrono::Utc;
use sqlx::{Row, SqlitePool};

use crate::errors::AppError;
use crate::models::{Document, RevisionInfo};

const UPSERT_SQL: &str = "INSERT INTO documents (key, body, updated_at) VALUES (?, ?, ?) \
     ON CONFLICT(key) DO UPDATE SET body = excluded.body, updated_at = excluded.updated_at";

/// Next revision of `document` and its serialized body.
fn stage(document: &Document) -> Result<(Document, String), AppError> {
    let mut staged = document.clone();
    staged.revision_id = document
        .revision_id
        .checked_add(1)
        .ok_or_else(|| AppError::Internal("Revision counter exhausted".to_string()))?;
    staged.generated_at = Utc::now().to_rfc3339();
    let body = serde_json::to_string(&staged)
        .map_err(|e| AppError::Internal(format!("Failed to serialize document: {}", e)))?;
    Ok((staged, body))
}

/// Persists the application document under one key.
#[derive(Clone)]
pub struct DocumentStore {
    pool: SqlitePool,
    key: String,
}

impl DocumentStore {
    pub fn new(pool: SqlitePool, key: impl Into<String>) -> Self {
        Self {
            pool,
            key: key.into(),
        }
    }

    /// Load the stored document. `None` when nothing has been stored yet.
    pub async fn load(&self) -> Result<Option<Document>, AppError> {
        let row = sqlx::query("SELECT body FROM documents WHERE key = ?")
            .bind(&self.key)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            None => Ok(None),
            Some(row) => {
                let body: String = row.get("body");
                Document::parse(&body).map(Some)
            }
        }
    }

    /// Load the stored document, writing a fresh default one when it is
    /// missing or unreadable.
    pub async fn initialize_if_absent(&self) -> Result<Document, AppError> {
        match self.load().await {
            Ok(Some(document)) => Ok(document),
            Ok(None) => {
                tracing::info!("No document under key '{}', initializing", self.key);
                self.write_default(0).await
            }
            Err(AppError::CorruptDocument(reason)) => {
                tracing::warn!(
                    "Stored document under key '{}' is unusable ({}), reinitializing",
                    self.key,
                    reason
                );
                self.write_default(0).await
            }
            Err(e) => Err(e),
        }
    }

    /// Write the full document, bumping its revision. On failure `document`
    /// is left unchanged.
    pub async fn persist(&self, document: &mut Document) -> Result<(), AppError> {
        let (staged, body) = stage(document)?;

        sqlx::query(UPSERT_SQL)
            .bind(&self.key)
            .bind(&body)
            .bind(&staged.generated_at)
            .execute(&self.pool)
            .await?;

        tracing::debug!("Persisted document revision {}", staged.revision_id);
        *document = staged;
        Ok(())
    }

    /// Wipe the stored document and start over from the default one.
    /// The revision keeps counting up from `current_revision`.
    pub async fn clear(&self, current_revision: i64) -> Result<Document, AppError> {
        let fresh = Document {
            revision_id: current_revision,
            ..Document::default()
        };
        let (staged, body) = stage(&fresh)?;

        let mut tx = self.pool.begin().await?;
        sqlx::query("DELETE FROM documents WHERE key = ?")
            .bind(&self.key)
            .execute(&mut *tx)
            .await?;
        sqlx::query(UPSERT_SQL)
            .bind(&self.key)
            .bind(&body)
            .bind(&staged.generated_at)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;

        tracing::info!("Cleared document under key '{}'", self.key);
        Ok(staged)
    }

    /// Replace the stored document with `raw`. The text is fully validated
    /// first; a rejected import leaves storage untouched.
    pub async fn import(&self, raw: &str, current_revision: i64) -> Result<Document, AppError> {
        let mut document = Document::parse(raw)?;
        document.revision_id = document.revision_id.max(current_revision);
        self.persist(&mut document).await?;

        tracing::info!(
            "Imported document with {} users, {} roles, {} events",
            document.users.data.len(),
            document.roles.data.len(),
            document.events.data.len()
        );
        Ok(document)
    }

    /// Revision of the stored document without parsing the whole body.
    pub async fn revision(&self) -> Result<Option<RevisionInfo>, AppError> {
        let row = sqlx::query(
            "SELECT json_extract(body, '$.revisionId') AS revision_id, \
                    json_extract(body, '$.generatedAt') AS generated_at \
             FROM documents WHERE key = ?",
        )
        .bind(&self.key)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|row| RevisionInfo {
            revision_id: row.get::<Option<i64>, _>("revision_id").unwrap_or(0),
            generated_at: row
                .get::<Option<String>, _>("generated_at")
                .unwrap_or_default(),
        }))
    }

    async fn write_default(&self, revision_id: i64) -> Result<Document, AppError> {
        let mut document = Document {
            revision_id,
            ..Document::default()
        };
        self.persist(&mut document).await?;
        Ok(document)
    }
}
