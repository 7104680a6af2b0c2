pub mod astronomy;
pub mod event_loader;
pub mod handlers;
pub mod nasa;

use crate::state::AppState;
use axum::Router;

pub fn router() -> Router<AppState> {
    handlers::routes()
}
