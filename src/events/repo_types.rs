use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::{Date, OffsetDateTime};
use uuid::Uuid;

/// Astronomy/space event visible to all accounts.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Event {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub event_date: Date,
    pub event_type: String,
    pub created_at: OffsetDateTime,
}

/// Per-account bookmark row. The (user_id, event_id) pair is unique.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SavedEvent {
    pub id: Uuid,
    pub user_id: Uuid,
    pub event_id: Uuid,
    pub created_at: OffsetDateTime,
}

/// A saved event joined with the event it references, as listed back to
/// the owning account.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct SavedEventView {
    pub saved_id: Uuid,
    pub saved_at: OffsetDateTime,
    pub event_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub event_date: Date,
    pub event_type: String,
}
