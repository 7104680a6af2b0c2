use sqlx::PgPool;
use time::Date;
use uuid::Uuid;

use super::repo_types::{Event, SavedEvent, SavedEventView};
use crate::error::{is_foreign_key_violation, is_unique_violation, ApiError};

/// Outcome of saving an event: a new bookmark, or the pair already existed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    Saved,
    AlreadySaved,
}

impl Event {
    /// All events ordered by date, optionally narrowed by an inclusive date
    /// range and/or an event type.
    pub async fn list(
        db: &PgPool,
        from: Option<Date>,
        to: Option<Date>,
        event_type: Option<&str>,
    ) -> Result<Vec<Event>, ApiError> {
        let rows = sqlx::query_as::<_, Event>(
            r#"
            SELECT id, title, description, event_date, event_type, created_at
            FROM events
            WHERE ($1::date IS NULL OR event_date >= $1)
              AND ($2::date IS NULL OR event_date <= $2)
              AND ($3::text IS NULL OR event_type = $3)
            ORDER BY event_date ASC
            "#,
        )
        .bind(from)
        .bind(to)
        .bind(event_type)
        .fetch_all(db)
        .await?;
        Ok(rows)
    }

    /// Events dated today or later, soonest first.
    pub async fn upcoming(db: &PgPool, limit: i64) -> Result<Vec<Event>, ApiError> {
        let rows = sqlx::query_as::<_, Event>(
            r#"
            SELECT id, title, description, event_date, event_type, created_at
            FROM events
            WHERE event_date >= CURRENT_DATE
            ORDER BY event_date ASC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(db)
        .await?;
        Ok(rows)
    }

    pub async fn get(db: &PgPool, id: Uuid) -> Result<Event, ApiError> {
        sqlx::query_as::<_, Event>(
            r#"
            SELECT id, title, description, event_date, event_type, created_at
            FROM events
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(db)
        .await?
        .ok_or(ApiError::NotFound("event"))
    }

    pub async fn create(
        db: &PgPool,
        title: &str,
        description: Option<&str>,
        event_date: Date,
        event_type: &str,
    ) -> Result<Event, ApiError> {
        let event = sqlx::query_as::<_, Event>(
            r#"
            INSERT INTO events (title, description, event_date, event_type)
            VALUES ($1, $2, $3, $4)
            RETURNING id, title, description, event_date, event_type, created_at
            "#,
        )
        .bind(title)
        .bind(description)
        .bind(event_date)
        .bind(event_type)
        .fetch_one(db)
        .await?;
        Ok(event)
    }

    pub async fn count(db: &PgPool) -> Result<i64, ApiError> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM events")
            .fetch_one(db)
            .await?;
        Ok(count)
    }

    /// Insert used by the seed import. Re-running the import must not
    /// duplicate events, so conflicts on (title, event_date) are skipped.
    /// Returns whether a row was actually inserted.
    pub async fn insert_seed(
        db: &PgPool,
        title: &str,
        description: &str,
        event_date: Date,
        event_type: &str,
    ) -> Result<bool, ApiError> {
        let result = sqlx::query(
            r#"
            INSERT INTO events (title, description, event_date, event_type)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (title, event_date) DO NOTHING
            "#,
        )
        .bind(title)
        .bind(description)
        .bind(event_date)
        .bind(event_type)
        .execute(db)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}

impl SavedEvent {
    /// Insert a bookmark. Concurrent saves of the same pair resolve at the
    /// unique constraint; the violation becomes the AlreadySaved outcome
    /// instead of surfacing as a storage error.
    pub async fn save(
        db: &PgPool,
        user_id: Uuid,
        event_id: Uuid,
    ) -> Result<SaveOutcome, ApiError> {
        let res = sqlx::query_as::<_, SavedEvent>(
            r#"
            INSERT INTO saved_events (user_id, event_id)
            VALUES ($1, $2)
            RETURNING id, user_id, event_id, created_at
            "#,
        )
        .bind(user_id)
        .bind(event_id)
        .fetch_one(db)
        .await;

        match res {
            Ok(_) => Ok(SaveOutcome::Saved),
            Err(e) if is_unique_violation(&e) => Ok(SaveOutcome::AlreadySaved),
            Err(e) if is_foreign_key_violation(&e) => Err(ApiError::NotFound("event")),
            Err(e) => Err(e.into()),
        }
    }

    /// Remove a bookmark. Unsaving a pair that was never saved is NotFound.
    pub async fn unsave(db: &PgPool, user_id: Uuid, event_id: Uuid) -> Result<(), ApiError> {
        let result = sqlx::query(
            r#"
            DELETE FROM saved_events
            WHERE user_id = $1 AND event_id = $2
            "#,
        )
        .bind(user_id)
        .bind(event_id)
        .execute(db)
        .await?;

        if result.rows_affected() == 0 {
            return Err(ApiError::NotFound("saved event"));
        }
        Ok(())
    }

    /// The account's bookmarks joined with event data, most recently saved
    /// first.
    pub async fn list_for_user(
        db: &PgPool,
        user_id: Uuid,
    ) -> Result<Vec<SavedEventView>, ApiError> {
        let rows = sqlx::query_as::<_, SavedEventView>(
            r#"
            SELECT s.id AS saved_id,
                   s.created_at AS saved_at,
                   e.id AS event_id,
                   e.title,
                   e.description,
                   e.event_date,
                   e.event_type
            FROM saved_events s
            JOIN events e ON e.id = s.event_id
            WHERE s.user_id = $1
            ORDER BY s.created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(db)
        .await?;
        Ok(rows)
    }
}
