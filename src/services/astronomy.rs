use serde::Serialize;
use time::{macros::datetime, macros::time, Date, Duration, OffsetDateTime, PrimitiveDateTime};

/// Mean length of the synodic month in days.
const SYNODIC_MONTH_DAYS: f64 = 29.530588853;

/// Reference new moon: 2000-01-06 18:14 UTC.
const NEW_MOON_EPOCH: OffsetDateTime = datetime!(2000-01-06 18:14 UTC);

const FULL_MOON_ILLUMINATION_PCT: f64 = 99.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MoonPhase {
    pub phase_name: &'static str,
    /// Illuminated fraction of the disc, 0-100.
    pub illumination: f64,
    /// Position in the synodic cycle, degrees in [0, 360). 0 is new, 180 full.
    pub phase_angle: f64,
}

/// Moon phase for a calendar date. Pure computation from the mean synodic
/// cycle; dates are sampled at noon UTC so each date maps to one phase.
pub fn moon_phase(date: Date) -> MoonPhase {
    let moment = PrimitiveDateTime::new(date, time!(12:00)).assume_utc();
    let elapsed_days = (moment - NEW_MOON_EPOCH).as_seconds_f64() / 86_400.0;
    let age = elapsed_days.rem_euclid(SYNODIC_MONTH_DAYS);
    let phase_angle = age / SYNODIC_MONTH_DAYS * 360.0;
    let illumination = (1.0 - phase_angle.to_radians().cos()) / 2.0 * 100.0;

    MoonPhase {
        phase_name: phase_name(phase_angle),
        illumination: round1(illumination),
        phase_angle: round1(phase_angle),
    }
}

/// First date within 30 days whose disc is essentially fully lit.
pub fn next_full_moon(from: Date) -> Option<Date> {
    (0..30i64)
        .map(|offset| from + Duration::days(offset))
        .find(|d| moon_phase(*d).illumination > FULL_MOON_ILLUMINATION_PCT)
}

fn phase_name(angle: f64) -> &'static str {
    match angle {
        a if a < 45.0 => "New Moon",
        a if a < 90.0 => "Waxing Crescent",
        a if a < 135.0 => "First Quarter",
        a if a < 180.0 => "Waxing Gibbous",
        a if a < 225.0 => "Full Moon",
        a if a < 270.0 => "Waning Gibbous",
        a if a < 315.0 => "Last Quarter",
        _ => "Waning Crescent",
    }
}

fn round1(x: f64) -> f64 {
    (x * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    #[test]
    fn day_after_epoch_is_a_new_moon() {
        let phase = moon_phase(date!(2000 - 01 - 07));
        assert_eq!(phase.phase_name, "New Moon");
        assert!(phase.illumination < 1.0, "got {}", phase.illumination);
    }

    #[test]
    fn half_a_cycle_later_the_disc_is_fully_lit() {
        let phase = moon_phase(date!(2000 - 01 - 21));
        assert!(
            phase.illumination > 99.0,
            "got {}",
            phase.illumination
        );
    }

    #[test]
    fn full_moon_band_carries_the_name() {
        let phase = moon_phase(date!(2000 - 01 - 22));
        assert_eq!(phase.phase_name, "Full Moon");
    }

    #[test]
    fn waning_side_of_the_cycle() {
        let phase = moon_phase(date!(2000 - 01 - 28));
        assert_eq!(phase.phase_name, "Waning Gibbous");
        assert!(phase.illumination < 70.0);
    }

    #[test]
    fn phase_angle_stays_in_range() {
        for offset in [0i64, 7, 29, 30, 100, 1000, 10000] {
            let phase = moon_phase(date!(2000 - 01 - 07) + Duration::days(offset));
            assert!(
                (0.0..360.0).contains(&phase.phase_angle),
                "angle {} out of range at offset {offset}",
                phase.phase_angle
            );
        }
    }

    #[test]
    fn next_full_moon_after_the_epoch_new_moon() {
        assert_eq!(
            next_full_moon(date!(2000 - 01 - 06)),
            Some(date!(2000 - 01 - 21))
        );
    }

    #[test]
    fn a_full_moon_is_always_found_within_a_cycle() {
        for offset in [0i64, 11, 23, 200] {
            let from = date!(2025 - 08 - 07) + Duration::days(offset);
            assert!(next_full_moon(from).is_some(), "none found from {from}");
        }
    }
}
