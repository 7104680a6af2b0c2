pub(crate) mod dto;
pub mod handlers;
pub mod repo;
mod repo_types;
pub mod services;

pub use repo_types::{Event, SavedEvent, SavedEventView};

use crate::state::AppState;
use axum::Router;

pub fn router() -> Router<AppState> {
    Router::new()
        .merge(handlers::event_routes())
        .merge(handlers::saved_event_routes())
}
