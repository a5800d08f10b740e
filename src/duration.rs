use std::collections::{HashMap, VecDeque};

use crate::calendar::{calendar_at_offset, days_in_month, Calendar};
use crate::chronology::{zone_or_host, Chronology};
use crate::offset::MS_PER_HOUR;
use crate::zone::TimeZone;

// "Duration" here counts calendar slots, not elapsed milliseconds: one is
// for how far the car has traveled, the other for how many houses it passed
// on the way. A duration of {months: 1} spans 28 to 31 days depending on
// where it starts.

/// Field-by-field difference between two instants on a zone's wall clock.
/// All fields share the sign-free magnitude convention of
/// [`Chronology::interval_to_duration`].
#[derive(Debug, PartialEq, Eq, Copy, Clone, Hash, Default)]
pub struct Duration {
    pub years: i64,
    pub months: i64,
    pub days: i64,
    pub hours: i64,
    pub minutes: i64,
    pub seconds: i64,
    pub milliseconds: i64,
}

const DURATION_CACHE_CAPACITY: usize = 100;

type DurationKey = (i64, i64, &'static str);

/// Bounded FIFO memo for repeated (start, end, zone) queries. FIFO rather
/// than LRU: the cache is tiny and the access pattern (re-rendering the
/// same handful of intervals) doesn't reward recency tracking.
#[derive(Debug, Default)]
pub(crate) struct DurationCache {
    entries: HashMap<DurationKey, Duration>,
    order: VecDeque<DurationKey>,
}

impl DurationCache {
    pub(crate) fn get(&self, key: &DurationKey) -> Option<Duration> {
        self.entries.get(key).copied()
    }

    pub(crate) fn insert(&mut self, key: DurationKey, duration: Duration) {
        if self.entries.insert(key, duration).is_none() {
            self.order.push_back(key);
            if self.order.len() > DURATION_CACHE_CAPACITY {
                if let Some(evicted) = self.order.pop_front() {
                    self.entries.remove(&evicted);
                }
            }
        }
    }

    pub(crate) fn clear(&mut self) {
        self.entries.clear();
        self.order.clear();
    }
}

impl Chronology {
    /// The calendar-field difference between two instants, measured on the
    /// wall clock of `zone`. Always the positive interval: arguments in
    /// either order give the same magnitude.
    pub fn interval_to_duration(
        &self,
        start: i64,
        end: i64,
        zone: Option<&TimeZone>,
    ) -> Duration {
        let zone = zone_or_host(zone);
        let (a, b) = if start <= end {
            (start, end)
        } else {
            (end, start)
        };
        let key = (a, b, zone.name());
        if let Some(cached) = self.durations.lock().unwrap().get(&key) {
            return cached;
        }

        // Short intervals that don't straddle a transition can reuse one
        // offset for both endpoints. Purely an optimization: the borrow
        // chain below is identical either way.
        let offset_a = self.offsets.resolve(a, &zone);
        let (cal_a, cal_b) =
            if b - a <= 25 * MS_PER_HOUR && self.offsets.resolve(b, &zone) == offset_a {
                (calendar_at_offset(a, offset_a), calendar_at_offset(b, offset_a))
            } else {
                (
                    self.timestamp_to_calendar(a, Some(&zone)),
                    self.timestamp_to_calendar(b, Some(&zone)),
                )
            };

        let duration = field_difference(&cal_a, &cal_b);
        self.durations.lock().unwrap().insert(key, duration);
        duration
    }
}

// Classic borrow chain, smallest unit first. Any negative sub-result
// borrows one from the next-larger unit; the day borrow needs the length of
// the month *before the end date*, not the start date.
fn field_difference(start: &Calendar, end: &Calendar) -> Duration {
    let mut milliseconds = end.millisecond as i64 - start.millisecond as i64;
    let mut seconds = end.second as i64 - start.second as i64;
    let mut minutes = end.minute as i64 - start.minute as i64;
    let mut hours = end.hour as i64 - start.hour as i64;
    let mut days = end.day as i64 - start.day as i64;
    let mut months = end.month as i64 - start.month as i64;
    let mut years = end.year as i64 - start.year as i64;

    if milliseconds < 0 {
        milliseconds += 1_000;
        seconds -= 1;
    }
    if seconds < 0 {
        seconds += 60;
        minutes -= 1;
    }
    if minutes < 0 {
        minutes += 60;
        hours -= 1;
    }
    if hours < 0 {
        hours += 24;
        days -= 1;
    }
    // The day borrow walks backwards from the end date, so the first month
    // borrowed is the one *before the end*, not the start's month. One
    // borrow can leave days negative when the start day exceeds that
    // month's length (Jan 31 -> Mar 1), so keep borrowing.
    let (mut borrow_year, mut borrow_month) = (end.year, end.month);
    while days < 0 {
        if borrow_month == 1 {
            borrow_year -= 1;
            borrow_month = 12;
        } else {
            borrow_month -= 1;
        }
        days += days_in_month(borrow_year, borrow_month) as i64;
        months -= 1;
    }
    if months < 0 {
        months += 12;
        years -= 1;
    }

    Duration {
        years,
        months,
        days,
        hours,
        minutes,
        seconds,
        milliseconds,
    }
}
