use serde::{Deserialize, Serialize};
use time::{format_description::FormatItem, macros::format_description, Date};
use uuid::Uuid;

use crate::error::ApiError;

pub(crate) const DATE_FORMAT: &[FormatItem<'static>] = format_description!("[year]-[month]-[day]");

/// Parse a `YYYY-MM-DD` query/body value.
pub(crate) fn parse_date(value: &str) -> Result<Date, ApiError> {
    Date::parse(value, DATE_FORMAT)
        .map_err(|_| ApiError::Validation(format!("invalid date: {value}")))
}

/// Query parameters for the event listing. Dates arrive as `YYYY-MM-DD`.
#[derive(Debug, Default, Deserialize)]
pub struct EventFilter {
    pub from: Option<String>,
    pub to: Option<String>,
    pub event_type: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpcomingQuery {
    #[serde(default = "default_limit")]
    pub limit: i64,
}

fn default_limit() -> i64 {
    10
}

#[derive(Debug, Deserialize)]
pub struct CreateEventBody {
    pub title: String,
    pub description: Option<String>,
    pub event_date: String,
    pub event_type: String,
}

#[derive(Debug, Serialize)]
pub struct SaveEventResponse {
    pub event_id: Uuid,
    pub already_saved: bool,
}
