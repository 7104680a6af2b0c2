use time::{Duration, OffsetDateTime};
use tracing::{info, warn};

use super::nasa::NearEarthObject;
use crate::events::dto::parse_date;
use crate::events::Event;
use crate::state::AppState;

const MAX_SEEDED_EVENTS: usize = 20;
const SEED_WINDOW_DAYS: i64 = 4;
const SEED_EVENT_TYPE: &str = "Near-Earth Object";

/// Seed the events table from the NEO feed when it is empty. Best-effort:
/// any failure is logged and startup carries on without seed data. Re-runs
/// cannot duplicate events; the (title, event_date) uniqueness absorbs them.
pub async fn ensure_events_available(state: &AppState) {
    let existing = match Event::count(&state.db).await {
        Ok(n) => n,
        Err(e) => {
            warn!(error = %e, "seed skipped: could not count events");
            return;
        }
    };
    if existing > 0 {
        return;
    }

    let start = OffsetDateTime::now_utc().date();
    let end = start + Duration::days(SEED_WINDOW_DAYS);
    let neos = match state.space.neo_feed(start, end).await {
        Ok(v) => v,
        Err(e) => {
            warn!(error = %e, "seed skipped: NEO feed unavailable");
            return;
        }
    };

    let mut inserted = 0usize;
    for neo in neos.iter().take(MAX_SEEDED_EVENTS) {
        let event_date = match parse_date(&neo.date) {
            Ok(d) => d,
            Err(_) => {
                warn!(date = %neo.date, name = %neo.name, "skipping NEO with unparsable date");
                continue;
            }
        };
        let (title, description) = seed_event_fields(neo);
        match Event::insert_seed(&state.db, &title, &description, event_date, SEED_EVENT_TYPE)
            .await
        {
            Ok(true) => inserted += 1,
            Ok(false) => {}
            Err(e) => warn!(error = %e, title = %title, "seed insert failed"),
        }
    }

    info!(inserted, "seeded events from NEO feed");
}

pub(crate) fn seed_event_fields(neo: &NearEarthObject) -> (String, String) {
    let title = format!("NEO Close Approach: {}", neo.name);

    let hazard_label = if neo.is_hazardous {
        "Potentially hazardous"
    } else {
        "Not hazardous"
    };
    let diameter = neo
        .diameter_km
        .map(|d| format!("{d:.3}"))
        .unwrap_or_else(|| "n/a".into());
    let velocity = neo.velocity_kph.clone().unwrap_or_else(|| "n/a".into());

    let description = format!(
        "Estimated max diameter: {diameter} km. \
         Relative speed: {velocity} km/h. \
         Safety status: {hazard_label}."
    );

    (title, description)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn neo() -> NearEarthObject {
        NearEarthObject {
            name: "(2025 AB)".into(),
            date: "2025-08-07".into(),
            diameter_km: Some(0.312),
            is_hazardous: true,
            velocity_kph: Some("45123.7".into()),
        }
    }

    #[test]
    fn seed_fields_carry_the_neo_data() {
        let (title, description) = seed_event_fields(&neo());
        assert_eq!(title, "NEO Close Approach: (2025 AB)");
        assert!(description.contains("0.312 km"));
        assert!(description.contains("45123.7 km/h"));
        assert!(description.contains("Potentially hazardous"));
    }

    #[test]
    fn missing_measurements_fall_back_to_na() {
        let mut n = neo();
        n.diameter_km = None;
        n.velocity_kph = None;
        n.is_hazardous = false;
        let (_, description) = seed_event_fields(&n);
        assert!(description.contains("diameter: n/a km"));
        assert!(description.contains("speed: n/a km/h"));
        assert!(description.contains("Not hazardous"));
    }
}
