use sqlx::PgPool;
use uuid::Uuid;

use super::repo::SaveOutcome;
use super::repo_types::{Event, SavedEvent, SavedEventView};
use crate::error::ApiError;

/// Saved events belong to exactly one account. Acting on another account's
/// list is rejected before any query runs.
fn ensure_owner(auth_id: Uuid, owner_id: Uuid) -> Result<(), ApiError> {
    if auth_id != owner_id {
        return Err(ApiError::Forbidden);
    }
    Ok(())
}

pub async fn save_event(
    db: &PgPool,
    auth_id: Uuid,
    owner_id: Uuid,
    event_id: Uuid,
) -> Result<SaveOutcome, ApiError> {
    ensure_owner(auth_id, owner_id)?;
    // NotFound for a missing event; the insert's FK check backstops the race
    // where the event is deleted between these two statements.
    Event::get(db, event_id).await?;
    SavedEvent::save(db, owner_id, event_id).await
}

pub async fn unsave_event(
    db: &PgPool,
    auth_id: Uuid,
    owner_id: Uuid,
    event_id: Uuid,
) -> Result<(), ApiError> {
    ensure_owner(auth_id, owner_id)?;
    SavedEvent::unsave(db, owner_id, event_id).await
}

pub async fn list_saved_events(
    db: &PgPool,
    auth_id: Uuid,
    owner_id: Uuid,
) -> Result<Vec<SavedEventView>, ApiError> {
    ensure_owner(auth_id, owner_id)?;
    SavedEvent::list_for_user(db, owner_id).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn owner_may_act_on_own_list() {
        let id = Uuid::new_v4();
        assert!(ensure_owner(id, id).is_ok());
    }

    #[test]
    fn mismatched_ids_are_forbidden() {
        let err = ensure_owner(Uuid::new_v4(), Uuid::new_v4()).unwrap_err();
        assert!(matches!(err, ApiError::Forbidden));
    }
}
