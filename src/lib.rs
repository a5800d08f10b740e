//! Timezone-aware calendar arithmetic on millisecond UTC timestamps.
//!
//! The crate works on plain `i64` instants (milliseconds since the Unix
//! epoch, UTC) and converts them to and from wall-clock calendar fields in
//! any zone of the embedded IANA database. All conversion state lives in a
//! [`Chronology`]: offset lookups go through a three-tier cache keyed by the
//! zone's [`ZoneClass`] (UTC and fixed-offset zones bypass the database
//! almost entirely, DST zones binary-search precomputed transition tables),
//! and calendar arithmetic preserves wall-clock time across transitions.
//!
//! ```
//! use walltime::{Chronology, TimeZone};
//!
//! let chronology = Chronology::new();
//! let ny = TimeZone::named("America/New_York")?;
//! let instant = chronology.from_iso_string("2024-03-09T12:00:00-05:00")?;
//! let next_day = chronology.add_days(instant, 1, Some(&ny));
//! // The spring-forward day is 23 hours long, but noon stays noon.
//! assert_eq!(
//!     chronology.to_iso_string(next_day, Some(&ny)),
//!     "2024-03-10T12:00:00.000-04:00"
//! );
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod calendar;
mod chronology;
mod day;
mod duration;
mod format;
mod iso8601;
mod month;
mod offset;
mod week;
mod year;
mod zone;

pub use calendar::{
    day_of_week, day_of_year, days_in_month, days_in_year, is_leap_year, iso_week,
    iso_weeks_in_year, local_week, Calendar,
};
pub use chronology::Chronology;
pub use duration::Duration;
pub use format::{format_ordinal, FormatOptions, PatternError};
pub use iso8601::IsoParseError;
pub use offset::OffsetPeriod;
pub use zone::{set_host_zone_for_testing, TimeZone, UnknownTimeZone, ZoneClass};
