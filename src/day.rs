use num_integer::Integer;

use crate::calendar::MS_PER_DAY;
use crate::chronology::{zone_or_host, Chronology};
use crate::offset::MS_PER_MINUTE;
use crate::zone::{TimeZone, ZoneClass};

impl Chronology {
    /// Advance by whole calendar days, preserving the wall-clock time of
    /// day. Across a DST transition the elapsed real time is 23 or 25
    /// hours, not 24.
    pub fn add_days(&self, instant: i64, amount: i32, zone: Option<&TimeZone>) -> i64 {
        let zone = zone_or_host(zone);
        let delta = amount as i64 * MS_PER_DAY;
        if zone.class() != ZoneClass::Variable {
            return instant.saturating_add(delta);
        }
        // Fast path: if the offset is the same on both sides, linear
        // arithmetic already lands on the right wall-clock time.
        let before = self.offsets.resolve(instant, &zone);
        let candidate = instant.saturating_add(delta);
        if self.offsets.resolve(candidate, &zone) == before {
            return candidate;
        }
        // A transition was crossed. Re-derive from the wall clock.
        let wall = instant
            .saturating_add(before as i64 * MS_PER_MINUTE)
            .saturating_add(delta);
        self.wall_to_timestamp(wall, &zone)
    }

    pub fn sub_days(&self, instant: i64, amount: i32, zone: Option<&TimeZone>) -> i64 {
        self.add_days(instant, amount.saturating_neg(), zone)
    }

    /// Midnight at the start of the instant's calendar day in `zone`. If
    /// midnight itself falls inside a DST gap the first existing instant of
    /// the day is returned.
    pub fn start_of_day(&self, instant: i64, zone: Option<&TimeZone>) -> i64 {
        let zone = zone_or_host(zone);
        let offset = self.offsets.resolve(instant, &zone);
        let wall = instant.saturating_add(offset as i64 * MS_PER_MINUTE);
        let day_wall = wall.div_floor(&MS_PER_DAY) * MS_PER_DAY;
        self.wall_to_timestamp_hinted(day_wall, &zone, offset)
    }

    /// The last millisecond (23:59:59.999) of the instant's calendar day.
    pub fn end_of_day(&self, instant: i64, zone: Option<&TimeZone>) -> i64 {
        let zone = zone_or_host(zone);
        let offset = self.offsets.resolve(instant, &zone);
        let wall = instant.saturating_add(offset as i64 * MS_PER_MINUTE);
        let end_wall = wall.div_floor(&MS_PER_DAY) * MS_PER_DAY + MS_PER_DAY - 1;
        self.wall_to_timestamp_hinted(end_wall, &zone, offset)
    }
}

#[cfg(test)]
mod tests {
    use crate::chronology::Chronology;
    use crate::zone::TimeZone;

    fn zone(name: &str) -> TimeZone {
        TimeZone::named(name).unwrap()
    }

    #[test]
    fn add_days_is_linear_in_fixed_zones() {
        let chronology = Chronology::new();
        let tokyo = zone("Asia/Tokyo");
        let instant = 1_700_000_000_000;
        assert_eq!(
            chronology.add_days(instant, 3, Some(&tokyo)),
            instant + 3 * 86_400_000
        );
        assert_eq!(
            chronology.sub_days(chronology.add_days(instant, 3, Some(&tokyo)), 3, Some(&tokyo)),
            instant
        );
    }

    #[test]
    fn add_days_preserves_wall_clock_across_spring_forward() {
        let chronology = Chronology::new();
        let ny = zone("America/New_York");
        // 2024-03-09T12:00 local (17:00Z, EST).
        let saturday_noon = 1_710_003_600_000;
        let sunday = chronology.add_days(saturday_noon, 1, Some(&ny));
        let calendar = chronology.timestamp_to_calendar(sunday, Some(&ny));
        assert_eq!((calendar.day, calendar.hour), (10, 12));
        // Only 23 real hours elapsed because an hour was skipped.
        assert_eq!(sunday - saturday_noon, 23 * 3_600_000);
    }

    #[test]
    fn add_days_preserves_wall_clock_across_fall_back() {
        let chronology = Chronology::new();
        let ny = zone("America/New_York");
        // 2024-11-02T12:00 local (16:00Z, EDT).
        let saturday_noon = 1_730_563_200_000;
        let sunday = chronology.add_days(saturday_noon, 1, Some(&ny));
        let calendar = chronology.timestamp_to_calendar(sunday, Some(&ny));
        assert_eq!((calendar.day, calendar.hour), (3, 12));
        assert_eq!(sunday - saturday_noon, 25 * 3_600_000);
    }

    #[test]
    fn start_and_end_of_day_bracket_the_instant() {
        let chronology = Chronology::new();
        let ny = zone("America/New_York");
        let instant = 1_710_063_000_000; // 2024-03-10T09:30Z, mid-morning EDT
        let start = chronology.start_of_day(instant, Some(&ny));
        let end = chronology.end_of_day(instant, Some(&ny));
        assert!(start <= instant && instant <= end);
        let start_cal = chronology.timestamp_to_calendar(start, Some(&ny));
        assert_eq!(
            (start_cal.hour, start_cal.minute, start_cal.second, start_cal.millisecond),
            (0, 0, 0, 0)
        );
        let end_cal = chronology.timestamp_to_calendar(end, Some(&ny));
        assert_eq!(
            (end_cal.hour, end_cal.minute, end_cal.second, end_cal.millisecond),
            (23, 59, 59, 999)
        );
        // The spring-forward day is only 23 hours long.
        assert_eq!(end - start, 23 * 3_600_000 - 1);
    }
}
