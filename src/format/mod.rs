//! Date-format pattern tokenizer and renderer.
//!
//! Pattern syntax follows the Unicode CLDR date field symbols
//! (https://unicode.org/reports/tr35/tr35-dates.html#Date_Field_Symbol_Table):
//! a run of identical letters is one token, text inside single quotes is a
//! literal with `''` escaping a quote, and every recognized spelling has its
//! own dispatch entry. An unescaped letter that matches nothing is a hard
//! parse error naming the letter and its position: the engine never emits
//! partial output for a bad pattern.

mod locale;

use std::fmt::Write as _;

use thiserror::Error;

use crate::calendar::{day_of_week, day_of_year, iso_week, local_week, Calendar};
use crate::chronology::{zone_or_host, Chronology};
use crate::zone::TimeZone;
use locale::{locale_data, LocaleData};

/// Locale and zone for one [`Chronology::format`] call.
#[derive(Debug, Clone, Default)]
pub struct FormatOptions {
    /// BCP 47-ish language tag; unknown tags silently fall back to English.
    pub locale: String,
    /// `None` means the host's zone.
    pub zone: Option<TimeZone>,
}

impl FormatOptions {
    pub fn new() -> FormatOptions {
        FormatOptions::default()
    }

    pub fn with_locale(mut self, locale: &str) -> FormatOptions {
        self.locale = locale.to_string();
        self
    }

    pub fn with_zone(mut self, zone: TimeZone) -> FormatOptions {
        self.zone = Some(zone);
        self
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PatternError {
    #[error("unrecognized pattern letter '{letter}' at position {position}")]
    UnknownToken { letter: char, position: usize },
    #[error("unterminated quoted literal starting at position {position}")]
    UnterminatedLiteral { position: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TextWidth {
    Abbreviated,
    Wide,
    Narrow,
}

/// The closed token set. Widths and pads come straight from the exact
/// spelling in the pattern; there is no generic length-driven formatter.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Field {
    Era(TextWidth),
    CalendarYear { pad: usize },
    CalendarYearTwoDigit,
    YearOrdinal,
    WeekYear { pad: usize },
    WeekYearTwoDigit,
    IsoWeekYear { pad: usize },
    ExtendedYear { pad: usize },
    Quarter { pad: usize },
    QuarterText(TextWidth),
    QuarterOrdinal,
    StandaloneQuarter { pad: usize },
    StandaloneQuarterText(TextWidth),
    MonthNumeric { pad: usize },
    MonthText(TextWidth),
    MonthOrdinal,
    StandaloneMonthNumeric { pad: usize },
    StandaloneMonthText(TextWidth),
    LocalWeek { pad: usize },
    LocalWeekOrdinal,
    IsoWeek { pad: usize },
    DayOfMonth { pad: usize },
    DayOfMonthOrdinal,
    DayOfYear { pad: usize },
    DayOfYearOrdinal,
    Weekday(TextWidth),
    IsoWeekdayNumeric { pad: usize },
    LocalWeekdayNumeric { pad: usize },
    StandaloneWeekdayNumeric { pad: usize },
    StandaloneWeekday(TextWidth),
    AmPm(TextWidth),
    AmPmNoonMidnight(TextWidth),
    FlexibleDayPeriod,
    Hour12 { pad: usize },
    Hour23 { pad: usize },
    Hour11 { pad: usize },
    Hour24 { pad: usize },
    Minute { pad: usize },
    Second { pad: usize },
    Fraction { digits: usize },
    OffsetIso { spelling: usize, zulu: bool },
    OffsetGmt { long: bool },
    ZoneName { long: bool },
    LocalizedDate { width: usize },
    LocalizedTime { medium: bool },
    LocalizedDateTime { date_width: usize, medium_time: bool },
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Literal(String),
    Field(Field),
}

// Calendar fields plus the offset they were derived with: everything a
// renderer may consult, resolved exactly once per format call.
struct Resolved {
    calendar: Calendar,
    offset_minutes: i32,
}

impl Chronology {
    /// Render `instant` according to `pattern`. The decomposition happens
    /// once up front, with the same UTC/fixed/variable path split as
    /// [`Chronology::timestamp_to_calendar`].
    pub fn format(
        &self,
        instant: i64,
        pattern: &str,
        options: &FormatOptions,
    ) -> Result<String, PatternError> {
        let zone = zone_or_host(options.zone.as_ref());
        let (calendar, offset_minutes) = self.decompose(instant, &zone);
        let resolved = Resolved {
            calendar,
            offset_minutes,
        };
        let tokens = tokenize(pattern)?;
        let data = locale_data(&options.locale);
        let mut out = String::with_capacity(pattern.len() * 2);
        render_tokens(&tokens, &resolved, data, &options.locale, &mut out)?;
        Ok(out)
    }
}

/// `21` -> `21st` (en), `21e` (fr), `21` (ja). The suffix lookup falls back
/// from the full tag to the bare language, and to no suffix at all.
pub fn format_ordinal(n: i32, locale: &str) -> String {
    format!("{}{}", n, locale::ordinal_suffix(locale, n as i64))
}

fn tokenize(pattern: &str) -> Result<Vec<Token>, PatternError> {
    let mut tokens = Vec::new();
    let mut literal = String::new();
    let mut chars = pattern.char_indices().peekable();

    while let Some((position, c)) = chars.next() {
        if c == '\'' {
            // '' outside a quoted section is also a literal quote.
            if matches!(chars.peek(), Some(&(_, '\''))) {
                chars.next();
                literal.push('\'');
                continue;
            }
            let mut closed = false;
            while let Some((_, inner)) = chars.next() {
                if inner == '\'' {
                    if matches!(chars.peek(), Some(&(_, '\''))) {
                        chars.next();
                        literal.push('\'');
                    } else {
                        closed = true;
                        break;
                    }
                } else {
                    literal.push(inner);
                }
            }
            if !closed {
                return Err(PatternError::UnterminatedLiteral { position });
            }
        } else if c.is_ascii_alphabetic() {
            let mut len = 1;
            while matches!(chars.peek(), Some(&(_, next)) if next == c) {
                chars.next();
                len += 1;
            }
            // Two-letter ordinal spellings: do, Do, Mo, Qo, wo, yo.
            let ordinal = len == 1
                && matches!(c, 'd' | 'D' | 'M' | 'Q' | 'w' | 'y')
                && matches!(chars.peek(), Some(&(_, 'o')));
            if ordinal {
                chars.next();
            }

            if !literal.is_empty() {
                tokens.push(Token::Literal(std::mem::take(&mut literal)));
            }

            let field = if c == 'P' {
                // A localized date immediately followed by a localized time
                // forms a datetime composite with a locale-specific joiner.
                let date_width = len.min(4);
                if len <= 4 && matches!(chars.peek(), Some(&(_, 'p'))) {
                    let mut time_len = 0;
                    while matches!(chars.peek(), Some(&(_, 'p'))) {
                        chars.next();
                        time_len += 1;
                    }
                    if time_len > 2 {
                        return Err(PatternError::UnknownToken {
                            letter: 'p',
                            position,
                        });
                    }
                    Some(Field::LocalizedDateTime {
                        date_width,
                        medium_time: time_len == 2,
                    })
                } else if len <= 4 {
                    Some(Field::LocalizedDate { width: date_width })
                } else {
                    None
                }
            } else {
                field_for(c, len, ordinal)
            };
            match field {
                Some(field) => tokens.push(Token::Field(field)),
                None => {
                    return Err(PatternError::UnknownToken {
                        letter: c,
                        position,
                    })
                }
            }
        } else {
            literal.push(c);
        }
    }
    if !literal.is_empty() {
        tokens.push(Token::Literal(literal));
    }
    Ok(tokens)
}

fn text_width(len: usize) -> Option<TextWidth> {
    match len {
        3 => Some(TextWidth::Abbreviated),
        4 => Some(TextWidth::Wide),
        5 => Some(TextWidth::Narrow),
        _ => None,
    }
}

fn field_for(letter: char, len: usize, ordinal: bool) -> Option<Field> {
    if ordinal {
        return Some(match letter {
            'd' => Field::DayOfMonthOrdinal,
            'D' => Field::DayOfYearOrdinal,
            'M' => Field::MonthOrdinal,
            'Q' => Field::QuarterOrdinal,
            'w' => Field::LocalWeekOrdinal,
            'y' => Field::YearOrdinal,
            _ => return None,
        });
    }
    Some(match (letter, len) {
        ('G', 1..=3) => Field::Era(TextWidth::Abbreviated),
        ('G', 4) => Field::Era(TextWidth::Wide),
        ('G', 5) => Field::Era(TextWidth::Narrow),
        ('y', 2) => Field::CalendarYearTwoDigit,
        ('y', pad @ 1..=9) => Field::CalendarYear { pad },
        ('Y', 2) => Field::WeekYearTwoDigit,
        ('Y', pad @ 1..=9) => Field::WeekYear { pad },
        ('R', pad @ 1..=9) => Field::IsoWeekYear { pad },
        ('u', pad @ 1..=9) => Field::ExtendedYear { pad },
        ('Q', pad @ 1..=2) => Field::Quarter { pad },
        ('Q', 3..=5) => Field::QuarterText(text_width(len)?),
        ('q', pad @ 1..=2) => Field::StandaloneQuarter { pad },
        ('q', 3..=5) => Field::StandaloneQuarterText(text_width(len)?),
        ('M', pad @ 1..=2) => Field::MonthNumeric { pad },
        ('M', 3..=5) => Field::MonthText(text_width(len)?),
        ('L', pad @ 1..=2) => Field::StandaloneMonthNumeric { pad },
        ('L', 3..=5) => Field::StandaloneMonthText(text_width(len)?),
        ('w', pad @ 1..=2) => Field::LocalWeek { pad },
        ('I', pad @ 1..=2) => Field::IsoWeek { pad },
        ('d', pad @ 1..=2) => Field::DayOfMonth { pad },
        ('D', pad @ 1..=3) => Field::DayOfYear { pad },
        ('E', 1..=3) => Field::Weekday(TextWidth::Abbreviated),
        ('E', 4) => Field::Weekday(TextWidth::Wide),
        ('E', 5) => Field::Weekday(TextWidth::Narrow),
        ('i', pad @ 1..=2) => Field::IsoWeekdayNumeric { pad },
        ('e', pad @ 1..=2) => Field::LocalWeekdayNumeric { pad },
        ('e', 3..=5) => Field::Weekday(text_width(len)?),
        ('c', pad @ 1..=2) => Field::StandaloneWeekdayNumeric { pad },
        ('c', 3..=5) => Field::StandaloneWeekday(text_width(len)?),
        ('a', 1..=3) => Field::AmPm(TextWidth::Abbreviated),
        ('a', 4) => Field::AmPm(TextWidth::Wide),
        ('a', 5) => Field::AmPm(TextWidth::Narrow),
        ('b', 1..=3) => Field::AmPmNoonMidnight(TextWidth::Abbreviated),
        ('b', 4) => Field::AmPmNoonMidnight(TextWidth::Wide),
        ('b', 5) => Field::AmPmNoonMidnight(TextWidth::Narrow),
        ('B', 1..=5) => Field::FlexibleDayPeriod,
        ('h', pad @ 1..=2) => Field::Hour12 { pad },
        ('H', pad @ 1..=2) => Field::Hour23 { pad },
        ('K', pad @ 1..=2) => Field::Hour11 { pad },
        ('k', pad @ 1..=2) => Field::Hour24 { pad },
        ('m', pad @ 1..=2) => Field::Minute { pad },
        ('s', pad @ 1..=2) => Field::Second { pad },
        ('S', digits @ 1..=3) => Field::Fraction { digits },
        ('X', spelling @ 1..=5) => Field::OffsetIso {
            spelling,
            zulu: true,
        },
        ('x', spelling @ 1..=5) => Field::OffsetIso {
            spelling,
            zulu: false,
        },
        ('O', 1..=3) => Field::OffsetGmt { long: false },
        ('O', 4) => Field::OffsetGmt { long: true },
        ('z', 1..=3) => Field::ZoneName { long: false },
        ('z', 4) => Field::ZoneName { long: true },
        ('p', 1) => Field::LocalizedTime { medium: false },
        ('p', 2) => Field::LocalizedTime { medium: true },
        _ => return None,
    })
}

fn render_tokens(
    tokens: &[Token],
    resolved: &Resolved,
    data: &'static LocaleData,
    locale_tag: &str,
    out: &mut String,
) -> Result<(), PatternError> {
    for token in tokens {
        match token {
            Token::Literal(text) => out.push_str(text),
            Token::Field(field) => render_field(field, resolved, data, locale_tag, out)?,
        }
    }
    Ok(())
}

// The year as counted within its era: year 0 is 1 BC, year -1 is 2 BC.
// Era-relative tokens render this without a sign; only `u` keeps it.
fn era_year(year: i32) -> i64 {
    if year <= 0 {
        1 - year as i64
    } else {
        year as i64
    }
}

fn render_field(
    field: &Field,
    resolved: &Resolved,
    data: &'static LocaleData,
    locale_tag: &str,
    out: &mut String,
) -> Result<(), PatternError> {
    let calendar = &resolved.calendar;
    let quarter = (calendar.month - 1) / 3 + 1;
    match field {
        Field::Era(width) => {
            let index = if calendar.year <= 0 { 0 } else { 1 };
            out.push_str(match width {
                TextWidth::Abbreviated => data.eras_abbr[index],
                TextWidth::Wide => data.eras_wide[index],
                TextWidth::Narrow => data.eras_narrow[index],
            });
        }
        Field::CalendarYear { pad } => push_padded(out, era_year(calendar.year), *pad),
        Field::CalendarYearTwoDigit => push_padded(out, era_year(calendar.year) % 100, 2),
        Field::YearOrdinal => push_ordinal(out, era_year(calendar.year), locale_tag),
        Field::WeekYear { pad } => {
            let (_, week_year) = local_week(calendar.year, calendar.month, calendar.day);
            push_padded(out, era_year(week_year), *pad);
        }
        Field::WeekYearTwoDigit => {
            let (_, week_year) = local_week(calendar.year, calendar.month, calendar.day);
            push_padded(out, era_year(week_year) % 100, 2);
        }
        Field::IsoWeekYear { pad } => {
            let (_, week_year) = iso_week(calendar.year, calendar.month, calendar.day);
            push_signed(out, week_year as i64, *pad);
        }
        Field::ExtendedYear { pad } => push_signed(out, calendar.year as i64, *pad),
        Field::Quarter { pad } | Field::StandaloneQuarter { pad } => {
            push_padded(out, quarter as i64, *pad)
        }
        Field::QuarterText(width) | Field::StandaloneQuarterText(width) => {
            let index = (quarter - 1) as usize;
            match width {
                TextWidth::Abbreviated => out.push_str(data.quarters_abbr[index]),
                TextWidth::Wide => out.push_str(data.quarters_wide[index]),
                TextWidth::Narrow => push_padded(out, quarter as i64, 1),
            }
        }
        Field::QuarterOrdinal => push_ordinal(out, quarter as i64, locale_tag),
        Field::MonthNumeric { pad } | Field::StandaloneMonthNumeric { pad } => {
            push_padded(out, calendar.month as i64, *pad)
        }
        Field::MonthText(width) | Field::StandaloneMonthText(width) => {
            let index = (calendar.month - 1) as usize;
            out.push_str(match width {
                TextWidth::Abbreviated => data.months_abbr[index],
                TextWidth::Wide => data.months_wide[index],
                TextWidth::Narrow => data.months_narrow[index],
            });
        }
        Field::MonthOrdinal => push_ordinal(out, calendar.month as i64, locale_tag),
        Field::LocalWeek { pad } => {
            let (week, _) = local_week(calendar.year, calendar.month, calendar.day);
            push_padded(out, week as i64, *pad);
        }
        Field::LocalWeekOrdinal => {
            let (week, _) = local_week(calendar.year, calendar.month, calendar.day);
            push_ordinal(out, week as i64, locale_tag);
        }
        Field::IsoWeek { pad } => {
            let (week, _) = iso_week(calendar.year, calendar.month, calendar.day);
            push_padded(out, week as i64, *pad);
        }
        Field::DayOfMonth { pad } => push_padded(out, calendar.day as i64, *pad),
        Field::DayOfMonthOrdinal => push_ordinal(out, calendar.day as i64, locale_tag),
        Field::DayOfYear { pad } => {
            let doy = day_of_year(calendar.year, calendar.month, calendar.day);
            push_padded(out, doy as i64, *pad);
        }
        Field::DayOfYearOrdinal => {
            let doy = day_of_year(calendar.year, calendar.month, calendar.day);
            push_ordinal(out, doy as i64, locale_tag);
        }
        Field::Weekday(width) | Field::StandaloneWeekday(width) => {
            let index = (day_of_week(calendar.year, calendar.month, calendar.day) - 1) as usize;
            out.push_str(match width {
                TextWidth::Abbreviated => data.days_abbr[index],
                TextWidth::Wide => data.days_wide[index],
                TextWidth::Narrow => data.days_narrow[index],
            });
        }
        Field::IsoWeekdayNumeric { pad } => {
            let dow = day_of_week(calendar.year, calendar.month, calendar.day);
            push_padded(out, dow as i64, *pad);
        }
        Field::LocalWeekdayNumeric { pad } | Field::StandaloneWeekdayNumeric { pad } => {
            // Sunday-based numbering to match the local week convention.
            let dow = day_of_week(calendar.year, calendar.month, calendar.day);
            push_padded(out, (dow % 7 + 1) as i64, *pad);
        }
        Field::AmPm(width) => {
            let marker = if calendar.hour < 12 { data.am } else { data.pm };
            push_day_period(out, marker, *width);
        }
        Field::AmPmNoonMidnight(width) => {
            let marker = match (calendar.hour, calendar.minute) {
                (0, 0) => data.midnight,
                (12, 0) => data.noon,
                (h, _) if h < 12 => data.am,
                _ => data.pm,
            };
            push_day_period(out, marker, *width);
        }
        Field::FlexibleDayPeriod => {
            out.push_str(match calendar.hour {
                0..=3 => data.night,
                4..=11 => data.morning,
                12..=16 => data.afternoon,
                17..=20 => data.evening,
                _ => data.night,
            });
        }
        Field::Hour12 { pad } => push_padded(out, ((calendar.hour + 11) % 12 + 1) as i64, *pad),
        Field::Hour23 { pad } => push_padded(out, calendar.hour as i64, *pad),
        Field::Hour11 { pad } => push_padded(out, (calendar.hour % 12) as i64, *pad),
        Field::Hour24 { pad } => {
            let hour = if calendar.hour == 0 { 24 } else { calendar.hour };
            push_padded(out, hour as i64, *pad);
        }
        Field::Minute { pad } => push_padded(out, calendar.minute as i64, *pad),
        Field::Second { pad } => push_padded(out, calendar.second as i64, *pad),
        Field::Fraction { digits } => {
            let value = match digits {
                1 => calendar.millisecond / 100,
                2 => calendar.millisecond / 10,
                _ => calendar.millisecond,
            };
            push_padded(out, value as i64, *digits);
        }
        Field::OffsetIso { spelling, zulu } => {
            push_iso_offset(out, resolved.offset_minutes, *spelling, *zulu)
        }
        Field::OffsetGmt { long } | Field::ZoneName { long } => {
            // Without a localized zone-name table the named-zone tokens fall
            // back to the GMT style, which is what the offset alone supports.
            push_gmt_offset(out, resolved.offset_minutes, *long)
        }
        Field::LocalizedDate { width } => {
            render_composite(date_pattern(data, *width), resolved, data, locale_tag, out)?
        }
        Field::LocalizedTime { medium } => {
            let pattern = if *medium {
                data.time_medium
            } else {
                data.time_short
            };
            render_composite(pattern, resolved, data, locale_tag, out)?;
        }
        Field::LocalizedDateTime {
            date_width,
            medium_time,
        } => {
            render_composite(date_pattern(data, *date_width), resolved, data, locale_tag, out)?;
            out.push_str(data.datetime_joiner);
            let pattern = if *medium_time {
                data.time_medium
            } else {
                data.time_short
            };
            render_composite(pattern, resolved, data, locale_tag, out)?;
        }
    }
    Ok(())
}

fn date_pattern(data: &'static LocaleData, width: usize) -> &'static str {
    match width {
        1 => data.date_short,
        2 => data.date_medium,
        3 => data.date_long,
        _ => data.date_full,
    }
}

// Composite patterns come from the baked locale tables, so tokenizing them
// cannot fail in practice; errors still propagate rather than panic.
fn render_composite(
    pattern: &str,
    resolved: &Resolved,
    data: &'static LocaleData,
    locale_tag: &str,
    out: &mut String,
) -> Result<(), PatternError> {
    let tokens = tokenize(pattern)?;
    render_tokens(&tokens, resolved, data, locale_tag, out)
}

fn push_day_period(out: &mut String, marker: &str, width: TextWidth) {
    match width {
        TextWidth::Narrow => {
            if let Some(first) = marker.chars().next() {
                out.push(first);
            }
        }
        _ => out.push_str(marker),
    }
}

fn push_padded(out: &mut String, value: i64, width: usize) {
    let _ = write!(out, "{:0width$}", value, width = width);
}

fn push_signed(out: &mut String, value: i64, width: usize) {
    if value < 0 {
        out.push('-');
        let _ = write!(out, "{:0width$}", -value, width = width);
    } else {
        let _ = write!(out, "{:0width$}", value, width = width);
    }
}

fn push_ordinal(out: &mut String, value: i64, locale_tag: &str) {
    let _ = write!(out, "{}", value);
    out.push_str(locale::ordinal_suffix(locale_tag, value));
}

fn push_iso_offset(out: &mut String, offset_minutes: i32, spelling: usize, zulu: bool) {
    if offset_minutes == 0 && zulu {
        out.push('Z');
        return;
    }
    let sign = if offset_minutes < 0 { '-' } else { '+' };
    let hours = offset_minutes.abs() / 60;
    let minutes = offset_minutes.abs() % 60;
    out.push(sign);
    match spelling {
        // X: hours only, unless minutes are present.
        1 => {
            let _ = write!(out, "{:02}", hours);
            if minutes != 0 {
                let _ = write!(out, "{:02}", minutes);
            }
        }
        // XX / XXXX: basic. Seconds never apply, so XXXX == XX.
        2 | 4 => {
            let _ = write!(out, "{:02}{:02}", hours, minutes);
        }
        // XXX / XXXXX: extended.
        _ => {
            let _ = write!(out, "{:02}:{:02}", hours, minutes);
        }
    }
}

fn push_gmt_offset(out: &mut String, offset_minutes: i32, long: bool) {
    out.push_str("GMT");
    if offset_minutes == 0 && !long {
        return;
    }
    let sign = if offset_minutes < 0 { '-' } else { '+' };
    let hours = offset_minutes.abs() / 60;
    let minutes = offset_minutes.abs() % 60;
    out.push(sign);
    if long {
        let _ = write!(out, "{:02}:{:02}", hours, minutes);
    } else {
        let _ = write!(out, "{}", hours);
        if minutes != 0 {
            let _ = write!(out, ":{:02}", minutes);
        }
    }
}
