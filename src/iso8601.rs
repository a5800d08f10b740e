//! ISO 8601 rendering and parsing.
//!
//! Output is always the full extended form with millisecond precision,
//! `2024-03-10T07:20:30.450Z`, with `Z` replaced by `±HH:MM` when the zone's
//! offset is non-zero and the year expanded to a signed six-digit form
//! outside 0000-9999. Parsing accepts the shapes serialization produces plus
//! the usual abbreviations: a date with no time, seconds and fraction
//! optional, and `±HHMM` / `±HH` offset spellings.

use std::fmt::Write as _;

use thiserror::Error;

use crate::calendar::{days_from_civil, days_in_month, MS_PER_DAY};
use crate::chronology::{zone_or_host, Chronology};
use crate::offset::MS_PER_MINUTE;
use crate::zone::{host_zone, TimeZone};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IsoParseError {
    #[error("malformed ISO 8601 datetime: {text:?}")]
    Malformed { text: String },
    #[error("calendar field out of range in ISO 8601 datetime: {text:?}")]
    FieldOutOfRange { text: String },
}

impl Chronology {
    /// Render `instant` on the wall clock of `zone` (`None` = the host's
    /// zone) in extended ISO 8601 form.
    pub fn to_iso_string(&self, instant: i64, zone: Option<&TimeZone>) -> String {
        let zone = zone_or_host(zone);
        let (calendar, offset) = self.decompose(instant, &zone);
        let mut out = String::with_capacity(32);
        if (0..=9999).contains(&calendar.year) {
            let _ = write!(out, "{:04}", calendar.year);
        } else {
            // Expanded-year form: explicit sign, six digits.
            let sign = if calendar.year < 0 { '-' } else { '+' };
            let _ = write!(out, "{}{:06}", sign, (calendar.year as i64).abs());
        }
        let _ = write!(
            out,
            "-{:02}-{:02}T{:02}:{:02}:{:02}.{:03}",
            calendar.month,
            calendar.day,
            calendar.hour,
            calendar.minute,
            calendar.second,
            calendar.millisecond,
        );
        if offset == 0 {
            out.push('Z');
        } else {
            let sign = if offset < 0 { '-' } else { '+' };
            let _ = write!(out, "{}{:02}:{:02}", sign, offset.abs() / 60, offset.abs() % 60);
        }
        out
    }

    /// Parse an ISO 8601 datetime into a UTC instant.
    ///
    /// Three offset interpretations: a trailing `Z` means the fields are
    /// already UTC, an explicit `±HH:MM` / `±HHMM` / `±HH` applies that
    /// offset, and no designator at all reads the fields on the host zone's
    /// wall clock (date-only strings included).
    pub fn from_iso_string(&self, text: &str) -> Result<i64, IsoParseError> {
        let malformed = || IsoParseError::Malformed {
            text: text.to_string(),
        };

        let (year, rest) = parse_year(text).ok_or_else(malformed)?;
        let rest = rest.strip_prefix('-').ok_or_else(malformed)?;
        let (month, rest) = parse_digits(rest, 2).ok_or_else(malformed)?;
        let rest = rest.strip_prefix('-').ok_or_else(malformed)?;
        let (day, rest) = parse_digits(rest, 2).ok_or_else(malformed)?;

        let mut time_ms: i64 = 0;
        let mut rest = rest;
        let mut hour = 0;
        let mut minute = 0;
        let mut second = 0;
        if let Some(after_t) = rest.strip_prefix('T') {
            let (h, r) = parse_digits(after_t, 2).ok_or_else(malformed)?;
            let r = r.strip_prefix(':').ok_or_else(malformed)?;
            let (m, mut r) = parse_digits(r, 2).ok_or_else(malformed)?;
            hour = h;
            minute = m;
            if let Some(after_colon) = r.strip_prefix(':') {
                let (s, r2) = parse_digits(after_colon, 2).ok_or_else(malformed)?;
                second = s;
                r = r2;
                if let Some(after_dot) = r.strip_prefix('.') {
                    let (fraction, r3) = parse_fraction_ms(after_dot).ok_or_else(malformed)?;
                    time_ms += fraction;
                    r = r3;
                }
            }
            rest = r;
        }
        time_ms += (hour as i64 * 60 + minute as i64) * MS_PER_MINUTE + second as i64 * 1_000;

        if !(1..=12).contains(&month)
            || day < 1
            || day > days_in_month(year as i32, month)
            || hour > 23
            || minute > 59
            || second > 59
        {
            return Err(IsoParseError::FieldOutOfRange {
                text: text.to_string(),
            });
        }

        let wall = days_from_civil(year, month as i64, day as i64) * MS_PER_DAY + time_ms;
        match rest {
            "" => Ok(self.wall_to_timestamp(wall, &host_zone())),
            "Z" | "z" => Ok(wall),
            offset_text => {
                let offset = parse_offset_minutes(offset_text).ok_or_else(malformed)?;
                Ok(wall - offset as i64 * MS_PER_MINUTE)
            }
        }
    }
}

// Year with an optional sign. A signed year may use up to six digits; an
// unsigned one is exactly four.
fn parse_year(text: &str) -> Option<(i64, &str)> {
    if let Some(rest) = text.strip_prefix('-') {
        let (year, rest) = parse_long_digits(rest, 4, 6)?;
        Some((-(year as i64), rest))
    } else if let Some(rest) = text.strip_prefix('+') {
        let (year, rest) = parse_long_digits(rest, 4, 6)?;
        Some((year as i64, rest))
    } else {
        let (year, rest) = parse_digits(text, 4)?;
        Some((year as i64, rest))
    }
}

fn parse_digits(text: &str, count: usize) -> Option<(u32, &str)> {
    parse_long_digits(text, count, count).map(|(v, rest)| (v as u32, rest))
}

fn parse_long_digits(text: &str, min: usize, max: usize) -> Option<(u64, &str)> {
    let end = text
        .bytes()
        .take(max)
        .take_while(u8::is_ascii_digit)
        .count();
    if end < min {
        return None;
    }
    let value = text[..end].parse().ok()?;
    Some((value, &text[end..]))
}

// Fractional seconds, truncated to millisecond precision.
fn parse_fraction_ms(text: &str) -> Option<(i64, &str)> {
    let end = text.bytes().take_while(u8::is_ascii_digit).count();
    if end == 0 {
        return None;
    }
    let mut ms = 0i64;
    for (i, digit) in text[..end].bytes().enumerate().take(3) {
        let scale = [100, 10, 1][i];
        ms += (digit - b'0') as i64 * scale;
    }
    Some((ms, &text[end..]))
}

fn parse_offset_minutes(text: &str) -> Option<i32> {
    let (sign, rest) = match text.as_bytes().first()? {
        b'+' => (1, &text[1..]),
        b'-' => (-1, &text[1..]),
        _ => return None,
    };
    let (hours, rest) = parse_digits(rest, 2)?;
    let (minutes, rest) = match rest.strip_prefix(':') {
        Some(after) => parse_digits(after, 2)?,
        None if rest.is_empty() => (0, rest),
        None => parse_digits(rest, 2)?,
    };
    if !rest.is_empty() || hours > 23 || minutes > 59 {
        return None;
    }
    Some(sign * (hours as i32 * 60 + minutes as i32))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::zone::set_host_zone_for_testing;

    fn zone(name: &str) -> TimeZone {
        TimeZone::named(name).unwrap()
    }

    #[test]
    fn renders_utc_with_z() {
        let chronology = Chronology::new();
        let utc = zone("UTC");
        assert_eq!(
            chronology.to_iso_string(1_710_055_230_450, Some(&utc)),
            "2024-03-10T07:20:30.450Z"
        );
        assert_eq!(
            chronology.to_iso_string(0, Some(&utc)),
            "1970-01-01T00:00:00.000Z"
        );
    }

    #[test]
    fn renders_offsets() {
        let chronology = Chronology::new();
        assert_eq!(
            chronology.to_iso_string(1_710_055_230_450, Some(&zone("Asia/Tokyo"))),
            "2024-03-10T16:20:30.450+09:00"
        );
        assert_eq!(
            chronology.to_iso_string(1_710_055_230_450, Some(&zone("America/New_York"))),
            "2024-03-10T03:20:30.450-04:00"
        );
        assert_eq!(
            chronology.to_iso_string(1_710_055_230_450, Some(&zone("Asia/Kolkata"))),
            "2024-03-10T12:50:30.450+05:30"
        );
    }

    #[test]
    fn expanded_years_carry_a_sign_and_six_digits() {
        let chronology = Chronology::new();
        let utc = zone("UTC");
        let far_future = chronology.from_iso_string("+010000-01-01T00:00:00Z").unwrap();
        assert_eq!(
            chronology.to_iso_string(far_future, Some(&utc)),
            "+010000-01-01T00:00:00.000Z"
        );
        let bc = chronology.from_iso_string("-000001-12-31T00:00:00Z").unwrap();
        assert_eq!(
            chronology.to_iso_string(bc, Some(&utc)),
            "-000001-12-31T00:00:00.000Z"
        );
    }

    #[test]
    fn parses_the_shapes_it_prints() {
        let chronology = Chronology::new();
        for text in [
            "2024-03-10T07:20:30.450Z",
            "2024-03-10T16:20:30.450+09:00",
            "2024-03-10T03:20:30.450-04:00",
        ] {
            assert_eq!(
                chronology.from_iso_string(text).unwrap(),
                1_710_055_230_450,
                "{}",
                text
            );
        }
    }

    #[test]
    fn abbreviated_forms() {
        let chronology = Chronology::new();
        assert_eq!(
            chronology.from_iso_string("2024-03-10T07:20Z").unwrap(),
            1_710_055_200_000
        );
        assert_eq!(
            chronology.from_iso_string("2024-03-10T07:20:30Z").unwrap(),
            1_710_055_230_000
        );
        // One fractional digit means tenths.
        assert_eq!(
            chronology.from_iso_string("2024-03-10T07:20:30.4Z").unwrap(),
            1_710_055_230_400
        );
        // Digits past milliseconds are truncated.
        assert_eq!(
            chronology
                .from_iso_string("2024-03-10T07:20:30.450999Z")
                .unwrap(),
            1_710_055_230_450
        );
        // Basic offset spellings.
        assert_eq!(
            chronology
                .from_iso_string("2024-03-10T16:20:30.450+0900")
                .unwrap(),
            1_710_055_230_450
        );
        assert_eq!(
            chronology
                .from_iso_string("2024-03-10T16:20:30.450+09")
                .unwrap(),
            1_710_055_230_450
        );
    }

    #[test]
    fn no_designator_reads_the_host_wall_clock() {
        let chronology = Chronology::new();
        set_host_zone_for_testing(zone("Asia/Tokyo"));
        assert_eq!(
            chronology.from_iso_string("2024-03-10T16:20:30.450").unwrap(),
            1_710_055_230_450
        );
        // Date-only is midnight on that wall clock.
        assert_eq!(
            chronology.from_iso_string("2024-03-10").unwrap(),
            chronology.from_iso_string("2024-03-10T00:00:00+09:00").unwrap()
        );
    }

    #[test]
    fn rejects_malformed_text() {
        let chronology = Chronology::new();
        for text in [
            "",
            "2024",
            "2024-03",
            "20240310",
            "2024-03-10T",
            "2024-03-10T07",
            "2024-03-10T07:20:30.Z",
            "2024-03-10T07:20:30+9:00",
            "not a date",
        ] {
            assert!(
                matches!(
                    chronology.from_iso_string(text),
                    Err(IsoParseError::Malformed { .. })
                ),
                "{:?} parsed",
                text
            );
        }
    }

    #[test]
    fn rejects_out_of_range_fields() {
        let chronology = Chronology::new();
        for text in [
            "2024-13-01T00:00:00Z",
            "2024-00-10T00:00:00Z",
            "2024-02-30T00:00:00Z",
            "2023-02-29T00:00:00Z",
            "2024-03-10T24:00:00Z",
            "2024-03-10T07:60:00Z",
        ] {
            assert!(
                matches!(
                    chronology.from_iso_string(text),
                    Err(IsoParseError::FieldOutOfRange { .. })
                ),
                "{:?} parsed",
                text
            );
        }
    }
}
