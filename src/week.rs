use crate::calendar::{day_of_week, days_from_civil, MS_PER_DAY};
use crate::chronology::{zone_or_host, Chronology};
use crate::zone::TimeZone;

// Weeks here are ISO weeks: Monday through Sunday.

impl Chronology {
    pub fn add_weeks(&self, instant: i64, amount: i32, zone: Option<&TimeZone>) -> i64 {
        self.add_days(instant, amount.saturating_mul(7), zone)
    }

    pub fn sub_weeks(&self, instant: i64, amount: i32, zone: Option<&TimeZone>) -> i64 {
        self.add_days(instant, amount.saturating_mul(-7), zone)
    }

    /// Midnight on the Monday of the instant's week.
    pub fn start_of_week(&self, instant: i64, zone: Option<&TimeZone>) -> i64 {
        let zone = zone_or_host(zone);
        let (calendar, offset) = self.decompose(instant, &zone);
        let epoch_day = days_from_civil(
            calendar.year as i64,
            calendar.month as i64,
            calendar.day as i64,
        );
        let weekday = day_of_week(calendar.year, calendar.month, calendar.day) as i64;
        let monday = epoch_day - (weekday - 1);
        self.wall_to_timestamp_hinted(monday * MS_PER_DAY, &zone, offset)
    }

    /// The last millisecond of the instant's week (Sunday 23:59:59.999).
    pub fn end_of_week(&self, instant: i64, zone: Option<&TimeZone>) -> i64 {
        let zone = zone_or_host(zone);
        let (calendar, offset) = self.decompose(instant, &zone);
        let epoch_day = days_from_civil(
            calendar.year as i64,
            calendar.month as i64,
            calendar.day as i64,
        );
        let weekday = day_of_week(calendar.year, calendar.month, calendar.day) as i64;
        let end_wall = (epoch_day - (weekday - 1) + 7) * MS_PER_DAY - 1;
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
    fn week_starts_on_monday() {
        let chronology = Chronology::new();
        let utc = zone("UTC");
        // 2024-03-13 is a Wednesday.
        let wednesday = 1_710_331_200_000; // 2024-03-13T12:00:00Z
        let start = chronology.start_of_week(wednesday, Some(&utc));
        let calendar = chronology.timestamp_to_calendar(start, Some(&utc));
        assert_eq!((calendar.month, calendar.day, calendar.hour), (3, 11, 0));
        let end = chronology.end_of_week(wednesday, Some(&utc));
        let calendar = chronology.timestamp_to_calendar(end, Some(&utc));
        assert_eq!((calendar.month, calendar.day), (3, 17));
        assert_eq!((calendar.hour, calendar.minute), (23, 59));
    }

    #[test]
    fn start_of_week_can_cross_a_transition() {
        let chronology = Chronology::new();
        let ny = zone("America/New_York");
        // 2024-03-13T12:00 local; the Monday before is past the March 10
        // spring forward, but the week's Monday midnight is EDT either way.
        let wednesday = 1_710_345_600_000; // 2024-03-13T16:00:00Z
        let start = chronology.start_of_week(wednesday, Some(&ny));
        let calendar = chronology.timestamp_to_calendar(start, Some(&ny));
        assert_eq!((calendar.day, calendar.hour), (11, 0));
    }

    #[test]
    fn add_weeks_is_seven_days() {
        let chronology = Chronology::new();
        let utc = zone("UTC");
        let instant = 1_700_000_000_000;
        assert_eq!(
            chronology.add_weeks(instant, 2, Some(&utc)),
            chronology.add_days(instant, 14, Some(&utc))
        );
        assert_eq!(
            chronology.sub_weeks(chronology.add_weeks(instant, 5, Some(&utc)), 5, Some(&utc)),
            instant
        );
    }
}
