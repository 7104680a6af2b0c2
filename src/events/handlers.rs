use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};
use tracing::{info, instrument};
use uuid::Uuid;

use super::dto::{parse_date, CreateEventBody, EventFilter, SaveEventResponse, UpcomingQuery};
use super::repo::SaveOutcome;
use super::repo_types::{Event, SavedEventView};
use super::services;
use crate::{auth::extractors::AuthUser, error::ApiError, state::AppState};

pub fn event_routes() -> Router<AppState> {
    Router::new()
        .route("/events", get(list_events).post(create_event))
        .route("/events/upcoming", get(upcoming_events))
        .route("/events/:id", get(get_event))
}

pub fn saved_event_routes() -> Router<AppState> {
    Router::new()
        .route("/users/:id/saved-events", get(list_saved_events))
        .route(
            "/users/:id/saved-events/:event_id",
            put(save_event).delete(unsave_event),
        )
}

#[instrument(skip(state))]
pub async fn list_events(
    State(state): State<AppState>,
    Query(filter): Query<EventFilter>,
) -> Result<Json<Vec<Event>>, ApiError> {
    let from = filter.from.as_deref().map(parse_date).transpose()?;
    let to = filter.to.as_deref().map(parse_date).transpose()?;
    let events = Event::list(&state.db, from, to, filter.event_type.as_deref()).await?;
    Ok(Json(events))
}

#[instrument(skip(state))]
pub async fn upcoming_events(
    State(state): State<AppState>,
    Query(q): Query<UpcomingQuery>,
) -> Result<Json<Vec<Event>>, ApiError> {
    let events = Event::upcoming(&state.db, q.limit).await?;
    Ok(Json(events))
}

#[instrument(skip(state))]
pub async fn get_event(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Event>, ApiError> {
    let event = Event::get(&state.db, id).await?;
    Ok(Json(event))
}

#[instrument(skip(state, body))]
pub async fn create_event(
    State(state): State<AppState>,
    AuthUser(account_id): AuthUser,
    Json(body): Json<CreateEventBody>,
) -> Result<(StatusCode, Json<Event>), ApiError> {
    let title = body.title.trim();
    let event_type = body.event_type.trim();
    if title.is_empty() {
        return Err(ApiError::Validation("title is required".into()));
    }
    if event_type.is_empty() {
        return Err(ApiError::Validation("event_type is required".into()));
    }
    let event_date = parse_date(&body.event_date)?;

    let event = Event::create(
        &state.db,
        title,
        body.description.as_deref(),
        event_date,
        event_type,
    )
    .await?;
    info!(account_id = %account_id, event_id = %event.id, "event created");
    Ok((StatusCode::CREATED, Json(event)))
}

#[instrument(skip(state))]
pub async fn list_saved_events(
    State(state): State<AppState>,
    AuthUser(auth_id): AuthUser,
    Path(owner_id): Path<Uuid>,
) -> Result<Json<Vec<SavedEventView>>, ApiError> {
    let saved = services::list_saved_events(&state.db, auth_id, owner_id).await?;
    Ok(Json(saved))
}

#[instrument(skip(state))]
pub async fn save_event(
    State(state): State<AppState>,
    AuthUser(auth_id): AuthUser,
    Path((owner_id, event_id)): Path<(Uuid, Uuid)>,
) -> Result<(StatusCode, Json<SaveEventResponse>), ApiError> {
    let outcome = services::save_event(&state.db, auth_id, owner_id, event_id).await?;
    let already_saved = outcome == SaveOutcome::AlreadySaved;
    if !already_saved {
        info!(account_id = %auth_id, event_id = %event_id, "event saved");
    }
    let status = if already_saved {
        StatusCode::OK
    } else {
        StatusCode::CREATED
    };
    Ok((
        status,
        Json(SaveEventResponse {
            event_id,
            already_saved,
        }),
    ))
}

#[instrument(skip(state))]
pub async fn unsave_event(
    State(state): State<AppState>,
    AuthUser(auth_id): AuthUser,
    Path((owner_id, event_id)): Path<(Uuid, Uuid)>,
) -> Result<StatusCode, ApiError> {
    services::unsave_event(&state.db, auth_id, owner_id, event_id).await?;
    info!(account_id = %auth_id, event_id = %event_id, "event unsaved");
    Ok(StatusCode::NO_CONTENT)
}
