use num_integer::Integer;

use crate::calendar::{days_from_civil, days_in_month, MS_PER_DAY};
use crate::chronology::{zone_or_host, Chronology};
use crate::zone::TimeZone;

impl Chronology {
    /// Advance by calendar months, clamping the day into the target month
    /// (Jan 31 + 1 month = Feb 29 in a leap year, Feb 28 otherwise) and
    /// preserving the wall-clock time of day.
    pub fn add_months(&self, instant: i64, amount: i32, zone: Option<&TimeZone>) -> i64 {
        let zone = zone_or_host(zone);
        let (calendar, offset) = self.decompose(instant, &zone);
        let total_months =
            calendar.year as i64 * 12 + calendar.month as i64 - 1 + amount as i64;
        let (year, month_index) = total_months.div_mod_floor(&12);
        let month = month_index as u32 + 1;
        let day = calendar.day.min(days_in_month(year as i32, month));
        let wall =
            days_from_civil(year, month as i64, day as i64) * MS_PER_DAY + calendar.time_of_day_ms();
        self.wall_to_timestamp_hinted(wall, &zone, offset)
    }

    pub fn sub_months(&self, instant: i64, amount: i32, zone: Option<&TimeZone>) -> i64 {
        self.add_months(instant, amount.saturating_neg(), zone)
    }

    /// Midnight on the first of the instant's month.
    pub fn start_of_month(&self, instant: i64, zone: Option<&TimeZone>) -> i64 {
        let zone = zone_or_host(zone);
        let (calendar, offset) = self.decompose(instant, &zone);
        let wall = days_from_civil(calendar.year as i64, calendar.month as i64, 1) * MS_PER_DAY;
        self.wall_to_timestamp_hinted(wall, &zone, offset)
    }

    /// The last millisecond of the instant's month.
    pub fn end_of_month(&self, instant: i64, zone: Option<&TimeZone>) -> i64 {
        let zone = zone_or_host(zone);
        let (calendar, offset) = self.decompose(instant, &zone);
        let wall =
            days_from_civil(calendar.year as i64, calendar.month as i64 + 1, 1) * MS_PER_DAY - 1;
        self.wall_to_timestamp_hinted(wall, &zone, offset)
    }
}

#[cfg(test)]
mod tests {
    use crate::calendar::Calendar;
    use crate::chronology::Chronology;
    use crate::zone::TimeZone;

    fn zone(name: &str) -> TimeZone {
        TimeZone::named(name).unwrap()
    }

    #[test]
    fn add_months_clamps_to_month_length() {
        let chronology = Chronology::new();
        let utc = zone("UTC");
        let jan31 = chronology.calendar_to_timestamp(&Calendar::date(2024, 1, 31), Some(&utc));
        let feb = chronology.add_months(jan31, 1, Some(&utc));
        assert_eq!(
            chronology.timestamp_to_calendar(feb, Some(&utc)),
            Calendar::date(2024, 2, 29)
        );
        let feb_2023 = chronology.add_months(jan31, 13, Some(&utc));
        assert_eq!(
            chronology.timestamp_to_calendar(feb_2023, Some(&utc)),
            Calendar::date(2025, 2, 28)
        );
    }

    #[test]
    fn add_months_crosses_year_boundaries_both_ways() {
        let chronology = Chronology::new();
        let utc = zone("UTC");
        let nov = chronology.calendar_to_timestamp(&Calendar::date(2024, 11, 15), Some(&utc));
        assert_eq!(
            chronology.timestamp_to_calendar(chronology.add_months(nov, 3, Some(&utc)), Some(&utc)),
            Calendar::date(2025, 2, 15)
        );
        assert_eq!(
            chronology
                .timestamp_to_calendar(chronology.sub_months(nov, 23, Some(&utc)), Some(&utc)),
            Calendar::date(2022, 12, 15)
        );
    }

    #[test]
    fn add_months_preserves_wall_clock_in_variable_zones() {
        let chronology = Chronology::new();
        let ny = zone("America/New_York");
        // 2024-02-10T08:30 local (EST); one month later EDT is in force.
        let start = chronology.calendar_to_timestamp(
            &Calendar {
                year: 2024,
                month: 2,
                day: 10,
                hour: 8,
                minute: 30,
                second: 0,
                millisecond: 0,
            },
            Some(&ny),
        );
        let later = chronology.add_months(start, 1, Some(&ny));
        let calendar = chronology.timestamp_to_calendar(later, Some(&ny));
        assert_eq!(
            (calendar.month, calendar.day, calendar.hour, calendar.minute),
            (3, 10, 8, 30)
        );
    }

    #[test]
    fn month_boundaries() {
        let chronology = Chronology::new();
        let utc = zone("UTC");
        let mid = chronology.calendar_to_timestamp(
            &Calendar {
                year: 2024,
                month: 2,
                day: 15,
                hour: 10,
                minute: 0,
                second: 0,
                millisecond: 0,
            },
            Some(&utc),
        );
        assert_eq!(
            chronology.timestamp_to_calendar(chronology.start_of_month(mid, Some(&utc)), Some(&utc)),
            Calendar::date(2024, 2, 1)
        );
        let end = chronology.timestamp_to_calendar(chronology.end_of_month(mid, Some(&utc)), Some(&utc));
        assert_eq!((end.month, end.day), (2, 29));
        assert_eq!((end.hour, end.minute, end.second, end.millisecond), (23, 59, 59, 999));
    }
}
