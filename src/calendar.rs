use num_integer::Integer;

pub(crate) const MS_PER_DAY: i64 = 86_400_000;
pub(crate) const MS_PER_SECOND: i64 = 1_000;

/// Wall-clock time in *some* zone, broken into calendar fields.
///
/// The struct deliberately carries no zone tag: the zone is supplied by the
/// caller at every conversion boundary, which keeps the value a plain
/// immutable tuple. See [`crate::Chronology`] for the conversions that
/// produce and consume it.
#[derive(Debug, PartialEq, Eq, Copy, Clone, Hash)]
pub struct Calendar {
    pub year: i32,
    /// 1-12.
    pub month: u32,
    /// 1-31.
    pub day: u32,
    /// 0-23.
    pub hour: u32,
    /// 0-59.
    pub minute: u32,
    /// 0-59.
    pub second: u32,
    /// 0-999.
    pub millisecond: u32,
}

impl Calendar {
    pub fn date(year: i32, month: u32, day: u32) -> Calendar {
        Calendar {
            year,
            month,
            day,
            hour: 0,
            minute: 0,
            second: 0,
            millisecond: 0,
        }
    }

    pub(crate) fn time_of_day_ms(&self) -> i64 {
        self.hour as i64 * 3_600_000
            + self.minute as i64 * 60_000
            + self.second as i64 * MS_PER_SECOND
            + self.millisecond as i64
    }
}

/// Calendar fields for an instant shifted by a known offset, without any
/// cache involvement. The shared decomposition for every conversion path.
pub(crate) fn calendar_at_offset(instant: i64, offset_minutes: i32) -> Calendar {
    let wall = instant.saturating_add(offset_minutes as i64 * 60_000);
    let (days, ms_of_day) = wall.div_mod_floor(&MS_PER_DAY);
    let (year, month, day) = civil_from_days(days);
    let (hour, rest) = ms_of_day.div_mod_floor(&3_600_000);
    let (minute, rest) = rest.div_mod_floor(&60_000);
    let (second, millisecond) = rest.div_mod_floor(&1_000);
    Calendar {
        year: year as i32,
        month,
        day,
        hour: hour as u32,
        minute: minute as u32,
        second: second as u32,
        millisecond: millisecond as u32,
    }
}

// The gregorian calendar works in cycles of 400 years (146,097 days). By
// shifting the year to start in March the leap day falls at the *end* of
// each year, so the within-cycle splits below need no special cases: leap
// days come out naturally as overflow of the ordinary division chain.

const DAYS_PER_CYCLE: i64 = 146_097;
// Days from 0000-03-01 (start of the shifted cycle) to 1970-01-01.
const EPOCH_CYCLE_OFFSET_DAYS: i64 = 719_468;

/// Days since the Unix epoch for a civil date. Out-of-range `day` values
/// roll over into later months, which is exactly the normalization contract
/// for calendar arithmetic (Jan 32 = Feb 1).
pub(crate) fn days_from_civil(year: i64, month: i64, day: i64) -> i64 {
    let year = if month <= 2 { year - 1 } else { year };
    let (cycle, year_of_cycle) = year.div_mod_floor(&400);
    let shifted_month = if month > 2 { month - 3 } else { month + 9 };
    let day_of_year = (153 * shifted_month + 2) / 5 + day - 1;
    let day_of_cycle =
        year_of_cycle * 365 + year_of_cycle / 4 - year_of_cycle / 100 + day_of_year;
    cycle * DAYS_PER_CYCLE + day_of_cycle - EPOCH_CYCLE_OFFSET_DAYS
}

/// Inverse of [`days_from_civil`]: (year, month 1-12, day 1-31).
pub(crate) fn civil_from_days(days: i64) -> (i64, u32, u32) {
    let shifted = days + EPOCH_CYCLE_OFFSET_DAYS;
    let (cycle, day_of_cycle) = shifted.div_mod_floor(&DAYS_PER_CYCLE);
    let year_of_cycle =
        (day_of_cycle - day_of_cycle / 1460 + day_of_cycle / 36524 - day_of_cycle / 146_096) / 365;
    let day_of_year =
        day_of_cycle - (365 * year_of_cycle + year_of_cycle / 4 - year_of_cycle / 100);
    let shifted_month = (5 * day_of_year + 2) / 153;
    let day = day_of_year - (153 * shifted_month + 2) / 5 + 1;
    let month = if shifted_month < 10 {
        shifted_month + 3
    } else {
        shifted_month - 9
    };
    let year = cycle * 400 + year_of_cycle + if month <= 2 { 1 } else { 0 };
    (year, month as u32, day as u32)
}

/// Divisible by 4 and not by 100, unless also by 400.
pub fn is_leap_year(year: i32) -> bool {
    year % 4 == 0 && (year % 100 != 0 || year % 400 == 0)
}

pub fn days_in_year(year: i32) -> u32 {
    if is_leap_year(year) {
        366
    } else {
        365
    }
}

const MONTH_LENGTHS: [u32; 12] = [31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];

pub fn days_in_month(year: i32, month: u32) -> u32 {
    debug_assert!((1..=12).contains(&month));
    if month == 2 && is_leap_year(year) {
        29
    } else {
        MONTH_LENGTHS[(month - 1) as usize]
    }
}

/// ISO day of the week via Zeller's congruence: 1=Monday .. 7=Sunday.
pub fn day_of_week(year: i32, month: u32, day: u32) -> u32 {
    let (year, month) = if month < 3 {
        (year as i64 - 1, month as i64 + 12)
    } else {
        (year as i64, month as i64)
    };
    let century = year.div_euclid(100);
    let year_of_century = year.rem_euclid(100);
    let h = (day as i64
        + (13 * (month + 1)) / 5
        + year_of_century
        + year_of_century / 4
        + century / 4
        + 5 * century)
        .rem_euclid(7);
    // Zeller numbers Saturday as 0.
    ((h + 5) % 7 + 1) as u32
}

/// 1-366.
pub fn day_of_year(year: i32, month: u32, day: u32) -> u32 {
    let mut doy = day;
    for m in 1..month {
        doy += days_in_month(year, m);
    }
    doy
}

/// ISO 8601 week number and week-numbering year. The week-year can differ
/// from the calendar year near January 1: a week belongs to the year that
/// holds its Thursday.
pub fn iso_week(year: i32, month: u32, day: u32) -> (u32, i32) {
    let doy = day_of_year(year, month, day) as i64;
    let dow = day_of_week(year, month, day) as i64;
    let week = (doy - dow + 10) / 7;
    if week < 1 {
        return (iso_weeks_in_year(year - 1), year - 1);
    }
    if week > iso_weeks_in_year(year) as i64 {
        return (1, year + 1);
    }
    (week as u32, year)
}

/// 52 or 53. A year has 53 ISO weeks when it starts on a Thursday, or on a
/// Wednesday if it is a leap year.
pub fn iso_weeks_in_year(year: i32) -> u32 {
    let jan1 = day_of_week(year, 1, 1);
    if jan1 == 4 || (jan1 == 3 && is_leap_year(year)) {
        53
    } else {
        52
    }
}

/// Week number and week-year under the source library's default local
/// convention: weeks start on Sunday and the week containing January 1 is
/// week 1 (so week 1 can be short).
pub fn local_week(year: i32, month: u32, day: u32) -> (u32, i32) {
    let epoch_day = days_from_civil(year as i64, month as i64, day as i64);
    let week_start = epoch_day - sunday_week_day_index(epoch_day);
    for week_year in [year + 1, year, year - 1] {
        let jan1 = days_from_civil(week_year as i64, 1, 1);
        let first_week_start = jan1 - sunday_week_day_index(jan1);
        if week_start >= first_week_start {
            let week = (week_start - first_week_start) / 7 + 1;
            return (week as u32, week_year);
        }
    }
    unreachable!("date precedes the first week of its own previous year")
}

// 0=Sunday .. 6=Saturday. The epoch fell on a Thursday.
fn sunday_week_day_index(epoch_day: i64) -> i64 {
    (epoch_day + 4).rem_euclid(7)
}
