use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::{Date, OffsetDateTime};
use uuid::Uuid;

/// Journal entry record in the database.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Entry {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub date: Date,
    pub minutes: i32,
    pub learned: String,
    pub resources: String,
    pub created_at: OffsetDateTime,
}

impl Entry {
    /// All entries, newest date first. The index page is public.
    pub async fn list_all(db: &PgPool) -> anyhow::Result<Vec<Entry>> {
        let rows = sqlx::query_as::<_, Entry>(
            r#"
            SELECT id, user_id, title, date, minutes, learned, resources, created_at
            FROM entries
            ORDER BY date DESC, created_at DESC
            "#,
        )
        .fetch_all(db)
        .await?;
        Ok(rows)
    }

    /// Titles are the URL lookup key. Uniqueness is not enforced, so this
    /// returns the oldest match.
    pub async fn find_by_title(db: &PgPool, title: &str) -> anyhow::Result<Option<Entry>> {
        let entry = sqlx::query_as::<_, Entry>(
            r#"
            SELECT id, user_id, title, date, minutes, learned, resources, created_at
            FROM entries
            WHERE title = $1
            ORDER BY created_at ASC
            LIMIT 1
            "#,
        )
        .bind(title)
        .fetch_optional(db)
        .await?;
        Ok(entry)
    }

    pub async fn create(
        db: &PgPool,
        user_id: Uuid,
        title: &str,
        date: Date,
        minutes: i32,
        learned: &str,
        resources: &str,
    ) -> anyhow::Result<Entry> {
        let entry = sqlx::query_as::<_, Entry>(
            r#"
            INSERT INTO entries (user_id, title, date, minutes, learned, resources)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, user_id, title, date, minutes, learned, resources, created_at
            "#,
        )
        .bind(user_id)
        .bind(title)
        .bind(date)
        .bind(minutes)
        .bind(learned)
        .bind(resources)
        .fetch_one(db)
        .await?;
        Ok(entry)
    }

    /// Owner-scoped update. Returns `None` when the entry does not exist or
    /// belongs to another user.
    #[allow(clippy::too_many_arguments)]
    pub async fn update(
        db: &PgPool,
        id: Uuid,
        user_id: Uuid,
        title: &str,
        date: Date,
        minutes: i32,
        learned: &str,
        resources: &str,
    ) -> anyhow::Result<Option<Entry>> {
        let entry = sqlx::query_as::<_, Entry>(
            r#"
            UPDATE entries
            SET title = $3, date = $4, minutes = $5, learned = $6, resources = $7
            WHERE id = $1 AND user_id = $2
            RETURNING id, user_id, title, date, minutes, learned, resources, created_at
            "#,
        )
        .bind(id)
        .bind(user_id)
        .bind(title)
        .bind(date)
        .bind(minutes)
        .bind(learned)
        .bind(resources)
        .fetch_optional(db)
        .await?;
        Ok(entry)
    }

    /// Owner-scoped hard delete; there is no soft-delete or audit trail.
    pub async fn delete(db: &PgPool, id: Uuid, user_id: Uuid) -> anyhow::Result<bool> {
        let result = sqlx::query(
            r#"
            DELETE FROM entries
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(id)
        .bind(user_id)
        .execute(db)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
