use crate::calendar::{days_from_civil, MS_PER_DAY};
use crate::chronology::{zone_or_host, Chronology};
use crate::zone::TimeZone;

impl Chronology {
    /// Advance by calendar years. Feb 29 clamps to Feb 28 in a common year.
    pub fn add_years(&self, instant: i64, amount: i32, zone: Option<&TimeZone>) -> i64 {
        self.add_months(instant, amount.saturating_mul(12), zone)
    }

    pub fn sub_years(&self, instant: i64, amount: i32, zone: Option<&TimeZone>) -> i64 {
        self.add_months(instant, amount.saturating_mul(-12), zone)
    }

    /// Midnight on January 1 of the instant's year.
    pub fn start_of_year(&self, instant: i64, zone: Option<&TimeZone>) -> i64 {
        let zone = zone_or_host(zone);
        let (calendar, offset) = self.decompose(instant, &zone);
        let wall = days_from_civil(calendar.year as i64, 1, 1) * MS_PER_DAY;
        self.wall_to_timestamp_hinted(wall, &zone, offset)
    }

    /// December 31, 23:59:59.999 of the instant's year.
    pub fn end_of_year(&self, instant: i64, zone: Option<&TimeZone>) -> i64 {
        let zone = zone_or_host(zone);
        let (calendar, offset) = self.decompose(instant, &zone);
        let wall = days_from_civil(calendar.year as i64 + 1, 1, 1) * MS_PER_DAY - 1;
        self.wall_to_timestamp_hinted(wall, &zone, offset)
    }
}
