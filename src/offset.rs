use std::collections::HashMap;
use std::sync::Mutex;

use chrono::{DateTime, Offset, TimeZone as _};
use chrono_tz::Tz;
use num_integer::Integer;

use crate::calendar::{civil_from_days, days_from_civil, MS_PER_DAY};
use crate::zone::{TimeZone, ZoneClass};

pub(crate) const MS_PER_HOUR: i64 = 3_600_000;
pub(crate) const MS_PER_MINUTE: i64 = 60_000;

// Offsets within this distance of a period boundary are re-queried against
// the database instead of trusting the period table, so a table that is off
// by up to a minute at a transition can never produce a wrong offset.
const BOUNDARY_GUARD_MS: i64 = MS_PER_HOUR;

// The chrono civil types cover roughly ±262,000 years. Instants beyond that
// are clamped before touching the database; every zone's offset is constant
// that far out anyway.
const MAX_DATABASE_MS: i64 = 8_000_000_000_000_000;

// Probe instant for the fixed-offset memo: the start of the classifier's
// sample window. A zone that abolished DST before the window classifies as
// fixed yet still has historical transitions, so the probe must not depend
// on which instant a caller happens to ask about first.
const FIXED_PROBE_MS: i64 = 1_577_836_800_000; // 2020-01-01T00:00:00Z

/// Ask the embedded IANA database for a zone's offset at an instant.
/// Positive means ahead of UTC (+540 for `Asia/Tokyo`), negative behind
/// (-300 for EST).
pub(crate) fn query_database_offset(tz: Tz, instant: i64) -> i32 {
    let clamped = instant.clamp(-MAX_DATABASE_MS, MAX_DATABASE_MS);
    let utc = DateTime::from_timestamp_millis(clamped)
        .unwrap_or_else(|| DateTime::from_timestamp_millis(0).unwrap());
    let offset = tz.offset_from_utc_datetime(&utc.naive_utc());
    offset.fix().local_minus_utc() / 60
}

/// A half-open UTC-millisecond interval during which a variable zone's
/// offset is constant. Periods for a zone are contiguous, non-overlapping
/// and strictly increasing.
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub struct OffsetPeriod {
    pub start: i64,
    pub end: i64,
    pub offset_minutes: i32,
}

#[derive(Debug, Copy, Clone)]
struct HourSlot {
    hour_start: i64,
    offset_minutes: i32,
}

#[derive(Debug)]
struct ZonePeriods {
    first_year: i32,
    last_year: i32,
    periods: Vec<OffsetPeriod>,
}

/// The three cache tiers behind offset resolution:
///
/// 1. a fixed-offset map, one permanent entry per fixed/UTC zone,
/// 2. a per-hour most-recently-used slot per variable zone,
/// 3. per-year offset-period tables built by boundary binary search.
///
/// Every tier is an optimization over [`query_database_offset`]; a miss (or
/// a cleared cache) always agrees with a hit.
#[derive(Debug, Default)]
pub(crate) struct OffsetCache {
    fixed: Mutex<HashMap<Tz, i32>>,
    hour: Mutex<HashMap<Tz, HourSlot>>,
    periods: Mutex<HashMap<Tz, ZonePeriods>>,
}

impl OffsetCache {
    pub(crate) fn new() -> OffsetCache {
        OffsetCache::default()
    }

    pub(crate) fn clear(&self) {
        self.fixed.lock().unwrap().clear();
        self.hour.lock().unwrap().clear();
        self.periods.lock().unwrap().clear();
    }

    pub(crate) fn resolve(&self, instant: i64, zone: &TimeZone) -> i32 {
        match zone.class() {
            ZoneClass::Utc => 0,
            ZoneClass::Fixed => self.resolve_fixed(zone.tz()),
            ZoneClass::Variable => self.resolve_variable(instant, zone.tz()),
        }
    }

    fn resolve_fixed(&self, tz: Tz) -> i32 {
        let mut fixed = self.fixed.lock().unwrap();
        if let Some(&offset) = fixed.get(&tz) {
            return offset;
        }
        // One query at the pinned contemporary instant serves every request.
        // Historical rule changes at fixed zones are an accepted
        // approximation; what the memo must never do is give different
        // answers depending on query order.
        let offset = query_database_offset(tz, FIXED_PROBE_MS);
        fixed.insert(tz, offset);
        offset
    }

    fn resolve_variable(&self, instant: i64, tz: Tz) -> i32 {
        let (hour_bucket, _) = instant.div_mod_floor(&MS_PER_HOUR);
        let hour_start = hour_bucket * MS_PER_HOUR;
        {
            let hour = self.hour.lock().unwrap();
            if let Some(slot) = hour.get(&tz) {
                if slot.hour_start == hour_start {
                    return slot.offset_minutes;
                }
            }
        }

        if let Some(offset) = self.lookup_period(instant, tz) {
            return offset;
        }

        // Transition-adjacent, or first query for this zone and year.
        let offset = query_database_offset(tz, instant);
        self.hour.lock().unwrap().insert(
            tz,
            HourSlot {
                hour_start,
                offset_minutes: offset,
            },
        );
        offset
    }

    fn lookup_period(&self, instant: i64, tz: Tz) -> Option<i32> {
        let year = civil_from_days(instant.div_floor(&MS_PER_DAY)).0;
        let mut tables = self.periods.lock().unwrap();
        let table = ensure_coverage(&mut tables, tz, year as i32);
        let index = table
            .periods
            .partition_point(|p| p.end <= instant)
            .min(table.periods.len().saturating_sub(1));
        let period = table.periods.get(index)?;
        if instant < period.start || instant >= period.end {
            return None;
        }
        // Trust the table only well clear of both boundaries.
        if instant - period.start < BOUNDARY_GUARD_MS || period.end - instant <= BOUNDARY_GUARD_MS {
            return None;
        }
        Some(period.offset_minutes)
    }
}

fn ensure_coverage<'a>(
    tables: &'a mut HashMap<Tz, ZonePeriods>,
    tz: Tz,
    year: i32,
) -> &'a ZonePeriods {
    let entry = tables.entry(tz).or_insert_with(|| ZonePeriods {
        first_year: year,
        last_year: year,
        periods: compute_offset_periods(tz, year),
    });

    if year < entry.first_year - 1 || year > entry.last_year + 1 {
        // A jump far outside the cached span. Rather than filling the whole
        // gap we restart the table at the requested year; the common access
        // pattern is a tight cluster of years, not a scan.
        *entry = ZonePeriods {
            first_year: year,
            last_year: year,
            periods: compute_offset_periods(tz, year),
        };
        return entry;
    }
    while year < entry.first_year {
        let mut added = compute_offset_periods(tz, entry.first_year - 1);
        splice_after(&mut added, std::mem::take(&mut entry.periods));
        entry.periods = added;
        entry.first_year -= 1;
    }
    while year > entry.last_year {
        let added = compute_offset_periods(tz, entry.last_year + 1);
        splice_after(&mut entry.periods, added);
        entry.last_year += 1;
    }
    entry
}

// Append `next` to `head`, fusing the two periods that meet at the year seam
// when their offsets agree so periods stay maximal.
fn splice_after(head: &mut Vec<OffsetPeriod>, next: Vec<OffsetPeriod>) {
    let mut next = next.into_iter();
    if let (Some(last), Some(first)) = (head.last_mut(), next.next()) {
        debug_assert_eq!(last.end, first.start);
        if last.offset_minutes == first.offset_minutes {
            last.end = first.end;
        } else {
            head.push(first);
        }
    }
    head.extend(next);
}

/// Build the offset-period table for one calendar year of one zone.
///
/// The offset is sampled once per day; wherever two consecutive samples
/// disagree there is exactly one transition between them (IANA rules never
/// put two transitions within a day of each other), and a binary search
/// narrows it down to the minute. Total work is ~366 samples plus a handful
/// of probes per transition, rather than anything linear in minutes.
pub(crate) fn compute_offset_periods(tz: Tz, year: i32) -> Vec<OffsetPeriod> {
    let year_start = days_from_civil(year as i64, 1, 1) * MS_PER_DAY;
    let year_end = days_from_civil(year as i64 + 1, 1, 1) * MS_PER_DAY;

    let mut periods = Vec::new();
    let mut period_start = year_start;
    let mut period_offset = query_database_offset(tz, year_start);

    let mut sample = year_start;
    let mut sample_offset = period_offset;
    while sample < year_end {
        let next = (sample + MS_PER_DAY).min(year_end);
        let next_offset = query_database_offset(tz, next);
        if next_offset != sample_offset {
            let transition = find_transition(tz, sample, next, sample_offset);
            periods.push(OffsetPeriod {
                start: period_start,
                end: transition,
                offset_minutes: period_offset,
            });
            period_start = transition;
            period_offset = query_database_offset(tz, transition);
        }
        sample = next;
        sample_offset = next_offset;
    }
    periods.push(OffsetPeriod {
        start: period_start,
        end: year_end,
        offset_minutes: period_offset,
    });
    periods
}

// Binary search for the first minute-aligned instant in (lo, hi] whose
// offset differs from the offset at lo.
fn find_transition(tz: Tz, mut lo: i64, mut hi: i64, lo_offset: i32) -> i64 {
    while hi - lo > MS_PER_MINUTE {
        let mid = ((lo + hi) / 2).div_floor(&MS_PER_MINUTE) * MS_PER_MINUTE;
        if mid <= lo {
            break;
        }
        if query_database_offset(tz, mid) == lo_offset {
            lo = mid;
        } else {
            hi = mid;
        }
    }
    hi
}

#[cfg(test)]
mod tests {
    use super::*;

    fn zone(name: &str) -> TimeZone {
        TimeZone::named(name).unwrap()
    }

    // 2024-03-10T07:00:00Z, the US spring-forward instant for Eastern time.
    const NY_SPRING_FORWARD_2024: i64 = 1_710_054_000_000;

    #[test]
    fn utc_is_always_zero() {
        let cache = OffsetCache::new();
        assert_eq!(cache.resolve(0, &zone("UTC")), 0);
        assert_eq!(cache.resolve(NY_SPRING_FORWARD_2024, &zone("Etc/UTC")), 0);
    }

    #[test]
    fn fixed_zone_is_memoized() {
        let cache = OffsetCache::new();
        let tokyo = zone("Asia/Tokyo");
        assert_eq!(cache.resolve(0, &tokyo), 540);
        assert_eq!(cache.resolve(NY_SPRING_FORWARD_2024, &tokyo), 540);
        cache.clear();
        assert_eq!(cache.resolve(NY_SPRING_FORWARD_2024, &tokyo), 540);
    }

    #[test]
    fn fixed_memo_ignores_historical_transitions() {
        // Sao Paulo abolished DST in 2019, so it classifies as fixed, but
        // 2018 instants still carry the old summer offset in the database.
        // The memoized answer must not depend on which instant warms it.
        let sao_paulo = zone("America/Sao_Paulo");
        let jan_2018 = 1_515_974_400_000; // 2018-01-15T00:00:00Z, DST in force
        let jul_2024 = 1_719_792_000_000; // 2024-07-01T00:00:00Z
        let fresh = OffsetCache::new();
        let expected = fresh.resolve(jul_2024, &sao_paulo);
        assert_eq!(expected, -180);
        let warmed = OffsetCache::new();
        warmed.resolve(jan_2018, &sao_paulo);
        assert_eq!(warmed.resolve(jul_2024, &sao_paulo), expected);
    }

    #[test]
    fn spring_forward_steps_by_an_hour() {
        let cache = OffsetCache::new();
        let ny = zone("America/New_York");
        let before = cache.resolve(NY_SPRING_FORWARD_2024 - 1, &ny);
        let after = cache.resolve(NY_SPRING_FORWARD_2024, &ny);
        assert_eq!(before, -300);
        assert_eq!(after, -240);
        assert_eq!(after - before, 60);
    }

    #[test]
    fn cache_tiers_agree_with_direct_queries() {
        let cache = OffsetCache::new();
        let ny = zone("America/New_York");
        let tz = ny.tz();
        // Step across the year in odd strides so we hit period interiors,
        // boundaries and hour-slot reuse.
        let start = 1_704_067_200_000; // 2024-01-01T00:00:00Z
        let mut t = start;
        while t < start + 366 * MS_PER_DAY {
            assert_eq!(
                cache.resolve(t, &ny),
                query_database_offset(tz, t),
                "divergence at {}",
                t
            );
            // Twice in the same hour to exercise the hour slot.
            assert_eq!(cache.resolve(t + 1, &ny), query_database_offset(tz, t + 1));
            t += 7 * MS_PER_HOUR + 11 * MS_PER_MINUTE;
        }
    }

    #[test]
    fn periods_tile_the_year() {
        let tz = zone("America/New_York").tz();
        let periods = compute_offset_periods(tz, 2024);
        assert_eq!(periods.len(), 3);
        let year_start = days_from_civil(2024, 1, 1) * MS_PER_DAY;
        let year_end = days_from_civil(2025, 1, 1) * MS_PER_DAY;
        assert_eq!(periods.first().unwrap().start, year_start);
        assert_eq!(periods.last().unwrap().end, year_end);
        for pair in periods.windows(2) {
            assert_eq!(pair[0].end, pair[1].start);
            assert_ne!(pair[0].offset_minutes, pair[1].offset_minutes);
        }
        // The March transition lands exactly where the database says.
        assert_eq!(periods[0].end, NY_SPRING_FORWARD_2024);
        assert_eq!(periods[0].offset_minutes, -300);
        assert_eq!(periods[1].offset_minutes, -240);
    }

    #[test]
    fn southern_hemisphere_periods() {
        let tz = zone("Australia/Sydney").tz();
        let periods = compute_offset_periods(tz, 2024);
        // DST at the start and end of the calendar year, standard time in
        // the middle.
        assert_eq!(periods.len(), 3);
        assert_eq!(periods[0].offset_minutes, 660);
        assert_eq!(periods[1].offset_minutes, 600);
        assert_eq!(periods[2].offset_minutes, 660);
    }

    #[test]
    fn table_extends_to_adjacent_years() {
        let cache = OffsetCache::new();
        let ny = zone("America/New_York");
        let jul_2024 = 1_719_792_000_000; // 2024-07-01
        let jul_2025 = 1_751_328_000_000; // 2025-07-01
        assert_eq!(cache.resolve(jul_2024, &ny), -240);
        assert_eq!(cache.resolve(jul_2025, &ny), -240);
        let tables = cache.periods.lock().unwrap();
        let table = tables.get(&ny.tz()).unwrap();
        assert_eq!((table.first_year, table.last_year), (2024, 2025));
        for pair in table.periods.windows(2) {
            assert_eq!(pair[0].end, pair[1].start);
        }
    }
}
