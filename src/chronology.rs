use std::sync::Mutex;

use num_integer::Integer;

use crate::calendar::{calendar_at_offset, days_from_civil, Calendar, MS_PER_DAY};
use crate::duration::DurationCache;
use crate::offset::{OffsetCache, MS_PER_MINUTE};
use crate::zone::{host_zone, TimeZone, ZoneClass};

/// The conversion engine. Owns every cache the crate keeps (offset tiers and
/// the duration memo), so callers decide the sharing story themselves: one
/// `Chronology` per thread, or one behind whatever synchronization they
/// like; the caches are internally locked either way.
///
/// Every cache is an optimization over a direct computation; clearing them
/// with [`Chronology::clear_caches`] can never change a result.
#[derive(Debug, Default)]
pub struct Chronology {
    pub(crate) offsets: OffsetCache,
    pub(crate) durations: Mutex<DurationCache>,
}

impl Chronology {
    pub fn new() -> Chronology {
        Chronology::default()
    }

    pub fn clear_caches(&self) {
        self.offsets.clear();
        self.durations.lock().unwrap().clear();
    }

    /// The zone's UTC offset in minutes at `instant`. Positive means ahead
    /// of UTC.
    pub fn resolve_offset_minutes(&self, instant: i64, zone: &TimeZone) -> i32 {
        self.offsets.resolve(instant, zone)
    }

    /// Break an instant into calendar fields on the wall clock of `zone`
    /// (`None` = the host's zone).
    pub fn timestamp_to_calendar(&self, instant: i64, zone: Option<&TimeZone>) -> Calendar {
        let zone = zone_or_host(zone);
        let (calendar, _) = self.decompose(instant, &zone);
        calendar
    }

    /// Reconstruct the UTC instant at which `zone`'s wall clock showed the
    /// given fields. Out-of-range fields roll over (January 32 = February 1,
    /// hour 24 = midnight next day) rather than erroring.
    ///
    /// Inside a DST gap, where the wall-clock tuple never actually occurred,
    /// the instant just after the transition is returned.
    pub fn calendar_to_timestamp(&self, calendar: &Calendar, zone: Option<&TimeZone>) -> i64 {
        let zone = zone_or_host(zone);
        // Normalize month overflow first so the civil-day math sees 1-12;
        // day and time overflow fall out of the arithmetic by itself.
        let total_months = calendar.year as i64 * 12 + calendar.month as i64 - 1;
        let (year, month_index) = total_months.div_mod_floor(&12);
        let days = days_from_civil(year, month_index + 1, calendar.day as i64);
        let wall = days * MS_PER_DAY + calendar.time_of_day_ms();
        self.wall_to_timestamp(wall, &zone)
    }

    /// Calendar fields plus the offset they were derived with, resolved in
    /// one pass so formatting needs only a single cache query.
    pub(crate) fn decompose(&self, instant: i64, zone: &TimeZone) -> (Calendar, i32) {
        let offset = self.offsets.resolve(instant, zone);
        (calendar_at_offset(instant, offset), offset)
    }

    /// Interpret `wall` (milliseconds on the zone's wall clock, counted from
    /// the epoch as if the wall clock were UTC) as a UTC instant.
    pub(crate) fn wall_to_timestamp(&self, wall: i64, zone: &TimeZone) -> i64 {
        match zone.class() {
            ZoneClass::Utc => wall,
            ZoneClass::Fixed => {
                // Constant offset, so the probe instant doesn't matter.
                let offset = self.offsets.resolve(wall, zone);
                wall - offset as i64 * MS_PER_MINUTE
            }
            ZoneClass::Variable => {
                // Guess the offset as if the wall reading were a UTC
                // instant, then verify at the resulting instant. One retry
                // with the corrected offset settles every reading outside a
                // DST gap; inside a gap neither offset is consistent and
                // the post-transition instant wins (02:30 in a skipped hour
                // comes back as 03:30).
                let guess = self.offsets.resolve(wall, zone);
                let candidate = wall - guess as i64 * MS_PER_MINUTE;
                let actual = self.offsets.resolve(candidate, zone);
                if actual == guess {
                    return candidate;
                }
                let second = wall - actual as i64 * MS_PER_MINUTE;
                if self.offsets.resolve(second, zone) == actual {
                    return second;
                }
                candidate.max(second)
            }
        }
    }

    /// Like [`Chronology::wall_to_timestamp`], but first tries an offset the
    /// caller already holds (typically the offset at the instant an
    /// arithmetic operation started from). When the hint verifies, this
    /// costs a single cache query.
    pub(crate) fn wall_to_timestamp_hinted(&self, wall: i64, zone: &TimeZone, hint: i32) -> i64 {
        if zone.class() != ZoneClass::Variable {
            return self.wall_to_timestamp(wall, zone);
        }
        let candidate = wall - hint as i64 * MS_PER_MINUTE;
        if self.offsets.resolve(candidate, zone) == hint {
            candidate
        } else {
            self.wall_to_timestamp(wall, zone)
        }
    }
}

pub(crate) fn zone_or_host(zone: Option<&TimeZone>) -> TimeZone {
    match zone {
        Some(zone) => *zone,
        None => host_zone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn zone(name: &str) -> TimeZone {
        TimeZone::named(name).unwrap()
    }

    #[test]
    fn utc_decomposition() {
        let chronology = Chronology::new();
        let utc = zone("UTC");
        let calendar = chronology.timestamp_to_calendar(0, Some(&utc));
        assert_eq!(calendar, Calendar::date(1970, 1, 1));
        // 2024-03-10T07:20:30.450Z
        let calendar = chronology.timestamp_to_calendar(1_710_055_230_450, Some(&utc));
        assert_eq!(
            calendar,
            Calendar {
                year: 2024,
                month: 3,
                day: 10,
                hour: 7,
                minute: 20,
                second: 30,
                millisecond: 450,
            }
        );
    }

    #[test]
    fn fixed_zone_round_trip() {
        let chronology = Chronology::new();
        let tokyo = zone("Asia/Tokyo");
        let instant = 1_710_055_230_450;
        let calendar = chronology.timestamp_to_calendar(instant, Some(&tokyo));
        assert_eq!(calendar.hour, 16); // UTC+9
        assert_eq!(
            chronology.calendar_to_timestamp(&calendar, Some(&tokyo)),
            instant
        );
    }

    #[test]
    fn variable_zone_round_trip_across_transitions() {
        let chronology = Chronology::new();
        let ny = zone("America/New_York");
        // Minute steps across the whole spring-forward day.
        let day_start = 1_710_028_800_000; // 2024-03-10T00:00:00Z
        for i in 0..(24 * 60) {
            let instant = day_start + i * 60_000;
            let calendar = chronology.timestamp_to_calendar(instant, Some(&ny));
            assert_eq!(
                chronology.calendar_to_timestamp(&calendar, Some(&ny)),
                instant,
                "round trip failed at {}",
                instant
            );
        }
    }

    #[test]
    fn skipped_hour_is_never_produced() {
        let chronology = Chronology::new();
        let ny = zone("America/New_York");
        // The hour 02:00-02:59 local does not exist on 2024-03-10.
        let day_start = 1_710_028_800_000;
        for i in 0..(24 * 60) {
            let calendar = chronology.timestamp_to_calendar(day_start + i * 60_000, Some(&ny));
            if calendar.day == 10 {
                assert_ne!(calendar.hour, 2, "produced a wall time inside the DST gap");
            }
        }
    }

    #[test]
    fn gap_input_lands_after_the_transition() {
        let chronology = Chronology::new();
        let ny = zone("America/New_York");
        let gap = Calendar {
            year: 2024,
            month: 3,
            day: 10,
            hour: 2,
            minute: 30,
            second: 0,
            millisecond: 0,
        };
        let instant = chronology.calendar_to_timestamp(&gap, Some(&ny));
        let back = chronology.timestamp_to_calendar(instant, Some(&ny));
        assert_eq!(back.hour, 3);
        assert_eq!(back.minute, 30);
    }

    #[test]
    fn rollover_matches_explicit_arithmetic() {
        let chronology = Chronology::new();
        let utc = zone("UTC");
        let rolled = Calendar::date(2024, 1, 32);
        let explicit = Calendar::date(2024, 2, 1);
        assert_eq!(
            chronology.calendar_to_timestamp(&rolled, Some(&utc)),
            chronology.calendar_to_timestamp(&explicit, Some(&utc))
        );
        let month_rolled = Calendar::date(2024, 13, 1);
        let next_year = Calendar::date(2025, 1, 1);
        assert_eq!(
            chronology.calendar_to_timestamp(&month_rolled, Some(&utc)),
            chronology.calendar_to_timestamp(&next_year, Some(&utc))
        );
    }

    #[test]
    fn clearing_caches_changes_nothing() {
        let chronology = Chronology::new();
        let stockholm = zone("Europe/Stockholm");
        let instant = 1_719_792_000_000; // 2024-07-01
        let before = chronology.timestamp_to_calendar(instant, Some(&stockholm));
        chronology.clear_caches();
        let after = chronology.timestamp_to_calendar(instant, Some(&stockholm));
        assert_eq!(before, after);
    }
}
