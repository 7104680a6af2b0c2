use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};
use tracing::{instrument, warn};

use super::astronomy::{self, MoonPhase};
use super::nasa::{Apod, NearEarthObject};
use crate::events::dto::parse_date;
use crate::events::Event;
use crate::{error::ApiError, state::AppState};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/home", get(home))
        .route("/nasa/apod", get(apod))
        .route("/nasa/neo", get(neo_feed))
        .route("/astronomy/moon-phase", get(moon_phase))
        .route("/astronomy/next-full-moon", get(next_full_moon))
}

#[derive(Debug, Deserialize)]
pub struct DateQuery {
    pub date: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct NeoQuery {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

/// Composite landing view. The external image is optional by design: if the
/// upstream call fails the field is null and the rest of the view stands.
#[derive(Debug, Serialize)]
pub struct HomeView {
    pub apod: Option<Apod>,
    pub moon_phase: MoonPhase,
    pub events: Vec<Event>,
}

#[derive(Debug, Serialize)]
pub struct NextFullMoonResponse {
    pub next_full_moon: Option<Date>,
}

#[instrument(skip(state))]
pub async fn home(State(state): State<AppState>) -> Result<Json<HomeView>, ApiError> {
    let events = Event::upcoming(&state.db, 5).await?;
    let moon = astronomy::moon_phase(OffsetDateTime::now_utc().date());

    let apod = match state.space.apod(None).await {
        Ok(a) => Some(a),
        Err(e) => {
            warn!(error = %e, "daily image unavailable, omitting from home view");
            None
        }
    };

    Ok(Json(HomeView {
        apod,
        moon_phase: moon,
        events,
    }))
}

#[instrument(skip(state))]
pub async fn apod(
    State(state): State<AppState>,
    Query(q): Query<DateQuery>,
) -> Result<Json<Apod>, ApiError> {
    let date = q.date.as_deref().map(parse_date).transpose()?;
    let apod = state.space.apod(date).await?;
    Ok(Json(apod))
}

#[instrument(skip(state))]
pub async fn neo_feed(
    State(state): State<AppState>,
    Query(q): Query<NeoQuery>,
) -> Result<Json<Vec<NearEarthObject>>, ApiError> {
    let (start, end) = match (q.start_date.as_deref(), q.end_date.as_deref()) {
        (Some(s), Some(e)) => (parse_date(s)?, parse_date(e)?),
        _ => {
            return Err(ApiError::Validation(
                "start_date and end_date are required".into(),
            ))
        }
    };
    let neos = state.space.neo_feed(start, end).await?;
    Ok(Json(neos))
}

#[instrument]
pub async fn moon_phase(Query(q): Query<DateQuery>) -> Result<Json<MoonPhase>, ApiError> {
    let date = match q.date.as_deref() {
        Some(s) => parse_date(s)?,
        None => OffsetDateTime::now_utc().date(),
    };
    Ok(Json(astronomy::moon_phase(date)))
}

#[instrument]
pub async fn next_full_moon() -> Json<NextFullMoonResponse> {
    let today = OffsetDateTime::now_utc().date();
    Json(NextFullMoonResponse {
        next_full_moon: astronomy::next_full_moon(today),
    })
}
