use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Mutex;

use chrono_tz::{Tz, TZ_VARIANTS};
use lazy_static::lazy_static;
use thiserror::Error;

use crate::offset::query_database_offset;

// About names of zones
// https://docs.python.org/3/library/zoneinfo.html#zoneinfo.ZoneInfo.key
// "Although it is a somewhat common practice to expose these to end users,
// these values are designed to be primary keys for representing the relevant
// zones and not necessarily user-facing elements."

/// How a zone's UTC offset behaves over time.
///
/// Every known IANA identifier falls into exactly one class, and the rest of
/// the crate branches on this to pick a fast or slow conversion path.
#[derive(Debug, PartialEq, Eq, Copy, Clone, Hash)]
pub enum ZoneClass {
    /// Zero offset at every instant ever sampled. Includes `UTC` itself and
    /// zones such as `Atlantic/Reykjavik` that have pinned themselves to it.
    Utc,
    /// Non-zero offset that never changes, e.g. `Asia/Tokyo`.
    Fixed,
    /// Observes daylight-saving transitions, e.g. `America/New_York`.
    Variable,
}

/// A validated timezone identifier.
///
/// Construction goes through the embedded IANA table, so a `TimeZone` value
/// always refers to a real zone and already knows its [`ZoneClass`]. The
/// value itself is immutable and carries no per-instant state.
#[derive(Debug, PartialEq, Eq, Copy, Clone, Hash)]
pub struct TimeZone {
    tz: Tz,
    class: ZoneClass,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown timezone identifier: {name}")]
pub struct UnknownTimeZone {
    pub name: String,
}

impl TimeZone {
    /// Look up an IANA identifier (or one of the usual aliases such as
    /// `GMT`). Identifiers that are not in the embedded database are
    /// rejected rather than silently treated as fixed-offset zones.
    pub fn named(name: &str) -> Result<TimeZone, UnknownTimeZone> {
        let tz: Tz = name.parse().map_err(|_| UnknownTimeZone {
            name: name.to_string(),
        })?;
        Ok(TimeZone::from_tz(tz))
    }

    pub fn utc() -> TimeZone {
        TimeZone {
            tz: Tz::UTC,
            class: ZoneClass::Utc,
        }
    }

    /// The host's zone, resolved once per process from the OS setting. Falls
    /// back to UTC if the OS reports something the database doesn't know.
    pub fn local() -> TimeZone {
        *HOST_ZONE
    }

    pub(crate) fn from_tz(tz: Tz) -> TimeZone {
        // Classification is total: anything absent from both static sets is
        // a fixed-offset zone by elimination.
        let class = *ZONE_CLASSES.get(tz.name()).unwrap_or(&ZoneClass::Fixed);
        TimeZone { tz, class }
    }

    pub fn name(&self) -> &'static str {
        self.tz.name()
    }

    pub fn class(&self) -> ZoneClass {
        self.class
    }

    pub(crate) fn tz(&self) -> Tz {
        self.tz
    }

    /// True if this zone is pinned to a zero offset.
    pub fn is_utc(&self) -> bool {
        self.class == ZoneClass::Utc
    }

    /// True if this zone observes a variable offset (daylight saving). Note
    /// that this means "has transitions at all", not "is currently in
    /// daylight time".
    pub fn observes_dst(&self) -> bool {
        self.class == ZoneClass::Variable
    }
}

impl fmt::Display for TimeZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for TimeZone {
    type Err = UnknownTimeZone;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TimeZone::named(s)
    }
}

const MS_PER_DAY: i64 = 86_400_000;

// Instants the classifier samples when partitioning the zone table. Four
// points per year catch both northern- and southern-hemisphere DST, and the
// span covers enough years that a zone suspending DST for a single year is
// still classified as variable.
const CLASSIFIER_SAMPLE_YEARS: std::ops::Range<i64> = 0..6;
const CLASSIFIER_YEAR_ZERO_MS: i64 = 1_577_836_800_000; // 2020-01-01T00:00:00Z
const CLASSIFIER_SAMPLE_OFFSETS_MS: [i64; 4] = [
    0,              // Jan 1
    90 * MS_PER_DAY,  // ~Apr 1
    181 * MS_PER_DAY, // ~Jul 1
    273 * MS_PER_DAY, // ~Oct 1
];

fn classify(tz: Tz) -> ZoneClass {
    let mut first: Option<i32> = None;
    for year in CLASSIFIER_SAMPLE_YEARS {
        let year_start = CLASSIFIER_YEAR_ZERO_MS + year * 365 * MS_PER_DAY;
        for delta in CLASSIFIER_SAMPLE_OFFSETS_MS {
            let offset = query_database_offset(tz, year_start + delta);
            match first {
                None => first = Some(offset),
                Some(f) if f != offset => return ZoneClass::Variable,
                Some(_) => {}
            }
        }
    }
    match first {
        Some(0) => ZoneClass::Utc,
        _ => ZoneClass::Fixed,
    }
}

fn build_zone_classes() -> HashMap<&'static str, ZoneClass> {
    let mut classes = HashMap::with_capacity(TZ_VARIANTS.len());
    for tz in TZ_VARIANTS {
        classes.insert(tz.name(), classify(tz));
    }
    classes
}

lazy_static! {
    // Built once from the embedded IANA snapshot. This is static data about
    // the database, not a cache: clearing it would change nothing but the
    // time of the next call.
    static ref ZONE_CLASSES: HashMap<&'static str, ZoneClass> = build_zone_classes();

    static ref HOST_ZONE: TimeZone = resolve_host_zone();
}

fn resolve_host_zone() -> TimeZone {
    match iana_time_zone::get_timezone() {
        Ok(name) => TimeZone::named(&name).unwrap_or_else(|_| TimeZone::utc()),
        Err(_) => TimeZone::utc(),
    }
}

lazy_static! {
    static ref HOST_ZONE_OVERRIDE: Mutex<Option<TimeZone>> = Mutex::new(None);
}

/// The zone used when a caller passes no zone at all.
pub(crate) fn host_zone() -> TimeZone {
    if let Some(zone) = *HOST_ZONE_OVERRIDE.lock().unwrap() {
        return zone;
    }
    *HOST_ZONE
}

/// Pin the "local" zone for the rest of the process. Intended for tests,
/// which otherwise depend on the machine they run on.
pub fn set_host_zone_for_testing(zone: TimeZone) {
    *HOST_ZONE_OVERRIDE.lock().unwrap() = Some(zone);
}
