//! Baked locale data for date/time rendering.
//!
//! Pre-extracted from the Unicode CLDR project for a small set of common
//! locales, so locale-aware formatting needs no ICU at runtime. Lookup
//! falls back from the full tag to the bare language, and from an unknown
//! language to English; the fallbacks are silent by design.

/// Month/weekday names, day periods and composite patterns for one locale.
/// All tables are `'static`, so "constructing a formatter" for a locale is
/// a single match; there is nothing left to cache per (locale, options).
#[derive(Debug)]
pub(crate) struct LocaleData {
    pub months_wide: [&'static str; 12],
    pub months_abbr: [&'static str; 12],
    pub months_narrow: [&'static str; 12],
    /// Monday-first, matching the ISO weekday numbering used everywhere
    /// else in the crate.
    pub days_wide: [&'static str; 7],
    pub days_abbr: [&'static str; 7],
    pub days_narrow: [&'static str; 7],
    pub eras_abbr: [&'static str; 2],
    pub eras_wide: [&'static str; 2],
    pub eras_narrow: [&'static str; 2],
    pub quarters_abbr: [&'static str; 4],
    pub quarters_wide: [&'static str; 4],
    pub am: &'static str,
    pub pm: &'static str,
    pub midnight: &'static str,
    pub noon: &'static str,
    pub morning: &'static str,
    pub afternoon: &'static str,
    pub evening: &'static str,
    pub night: &'static str,
    /// Composite date patterns (`P` through `PPPP`), in our own token
    /// syntax so they can be rendered recursively.
    pub date_short: &'static str,
    pub date_medium: &'static str,
    pub date_long: &'static str,
    pub date_full: &'static str,
    /// Composite time patterns (`p`, `pp`).
    pub time_short: &'static str,
    pub time_medium: &'static str,
    /// Joiner between date and time in datetime composites.
    pub datetime_joiner: &'static str,
}

pub(crate) fn locale_data(locale: &str) -> &'static LocaleData {
    match language_of(locale) {
        "en" => &EN,
        "fr" => &FR,
        "de" => &DE,
        "es" => &ES,
        "sv" => &SV,
        "ja" => &JA,
        _ => &EN,
    }
}

/// The ordinal suffix for a number in a locale: `21` becomes `21st` in
/// English, `21e` in French and stays bare in Japanese. Unknown languages
/// get no suffix at all.
pub(crate) fn ordinal_suffix(locale: &str, n: i64) -> &'static str {
    let n = n.abs();
    match language_of(locale) {
        "en" => match (n % 100, n % 10) {
            (11..=13, _) => "th",
            (_, 1) => "st",
            (_, 2) => "nd",
            (_, 3) => "rd",
            _ => "th",
        },
        "fr" => {
            if n == 1 {
                "er"
            } else {
                "e"
            }
        }
        "de" => ".",
        "es" => "º",
        "sv" => match (n % 100, n % 10) {
            (11 | 12, _) => ":e",
            (_, 1 | 2) => ":a",
            _ => ":e",
        },
        // No ordinal suffixes in these scripts.
        "ja" | "zh" | "ko" => "",
        _ => "",
    }
}

// Language-only lookup: "en-AU", "en_AU" and "EN" all mean "en".
fn language_of(locale: &str) -> &'static str {
    let end = locale.find(['-', '_']).unwrap_or(locale.len());
    let language = &locale[..end];
    for known in ["en", "fr", "de", "es", "sv", "ja", "zh", "ko"] {
        if language.eq_ignore_ascii_case(known) {
            return known;
        }
    }
    ""
}

static EN: LocaleData = LocaleData {
    months_wide: [
        "January", "February", "March", "April", "May", "June", "July", "August", "September",
        "October", "November", "December",
    ],
    months_abbr: [
        "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
    ],
    months_narrow: ["J", "F", "M", "A", "M", "J", "J", "A", "S", "O", "N", "D"],
    days_wide: [
        "Monday", "Tuesday", "Wednesday", "Thursday", "Friday", "Saturday", "Sunday",
    ],
    days_abbr: ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"],
    days_narrow: ["M", "T", "W", "T", "F", "S", "S"],
    eras_abbr: ["BC", "AD"],
    eras_wide: ["Before Christ", "Anno Domini"],
    eras_narrow: ["B", "A"],
    quarters_abbr: ["Q1", "Q2", "Q3", "Q4"],
    quarters_wide: ["1st quarter", "2nd quarter", "3rd quarter", "4th quarter"],
    am: "AM",
    pm: "PM",
    midnight: "midnight",
    noon: "noon",
    morning: "in the morning",
    afternoon: "in the afternoon",
    evening: "in the evening",
    night: "at night",
    date_short: "MM/dd/yyyy",
    date_medium: "MMM d, y",
    date_long: "MMMM do, y",
    date_full: "EEEE, MMMM do, y",
    time_short: "h:mm a",
    time_medium: "h:mm:ss a",
    datetime_joiner: ", ",
};

static FR: LocaleData = LocaleData {
    months_wide: [
        "janvier", "février", "mars", "avril", "mai", "juin", "juillet", "août", "septembre",
        "octobre", "novembre", "décembre",
    ],
    months_abbr: [
        "janv.", "févr.", "mars", "avr.", "mai", "juin", "juil.", "août", "sept.", "oct.",
        "nov.", "déc.",
    ],
    months_narrow: ["J", "F", "M", "A", "M", "J", "J", "A", "S", "O", "N", "D"],
    days_wide: [
        "lundi", "mardi", "mercredi", "jeudi", "vendredi", "samedi", "dimanche",
    ],
    days_abbr: ["lun.", "mar.", "mer.", "jeu.", "ven.", "sam.", "dim."],
    days_narrow: ["L", "M", "M", "J", "V", "S", "D"],
    eras_abbr: ["av. J.-C.", "ap. J.-C."],
    eras_wide: ["avant Jésus-Christ", "après Jésus-Christ"],
    eras_narrow: ["av. J.-C.", "ap. J.-C."],
    quarters_abbr: ["T1", "T2", "T3", "T4"],
    quarters_wide: [
        "1er trimestre", "2e trimestre", "3e trimestre", "4e trimestre",
    ],
    am: "AM",
    pm: "PM",
    midnight: "minuit",
    noon: "midi",
    morning: "du matin",
    afternoon: "de l'après-midi",
    evening: "du soir",
    night: "de nuit",
    date_short: "dd/MM/y",
    date_medium: "d MMM y",
    date_long: "d MMMM y",
    date_full: "EEEE d MMMM y",
    time_short: "HH:mm",
    time_medium: "HH:mm:ss",
    datetime_joiner: ", ",
};

static DE: LocaleData = LocaleData {
    months_wide: [
        "Januar", "Februar", "März", "April", "Mai", "Juni", "Juli", "August", "September",
        "Oktober", "November", "Dezember",
    ],
    months_abbr: [
        "Jan.", "Feb.", "März", "Apr.", "Mai", "Juni", "Juli", "Aug.", "Sep.", "Okt.", "Nov.",
        "Dez.",
    ],
    months_narrow: ["J", "F", "M", "A", "M", "J", "J", "A", "S", "O", "N", "D"],
    days_wide: [
        "Montag", "Dienstag", "Mittwoch", "Donnerstag", "Freitag", "Samstag", "Sonntag",
    ],
    days_abbr: ["Mo.", "Di.", "Mi.", "Do.", "Fr.", "Sa.", "So."],
    days_narrow: ["M", "D", "M", "D", "F", "S", "S"],
    eras_abbr: ["v. Chr.", "n. Chr."],
    eras_wide: ["vor Christus", "nach Christus"],
    eras_narrow: ["v. Chr.", "n. Chr."],
    quarters_abbr: ["Q1", "Q2", "Q3", "Q4"],
    quarters_wide: ["1. Quartal", "2. Quartal", "3. Quartal", "4. Quartal"],
    am: "AM",
    pm: "PM",
    midnight: "Mitternacht",
    noon: "Mittag",
    morning: "morgens",
    afternoon: "nachmittags",
    evening: "abends",
    night: "nachts",
    date_short: "dd.MM.y",
    date_medium: "dd.MM.y",
    date_long: "d. MMMM y",
    date_full: "EEEE, d. MMMM y",
    time_short: "HH:mm",
    time_medium: "HH:mm:ss",
    datetime_joiner: ", ",
};

static ES: LocaleData = LocaleData {
    months_wide: [
        "enero", "febrero", "marzo", "abril", "mayo", "junio", "julio", "agosto", "septiembre",
        "octubre", "noviembre", "diciembre",
    ],
    months_abbr: [
        "ene", "feb", "mar", "abr", "may", "jun", "jul", "ago", "sep", "oct", "nov", "dic",
    ],
    months_narrow: ["E", "F", "M", "A", "M", "J", "J", "A", "S", "O", "N", "D"],
    days_wide: [
        "lunes", "martes", "miércoles", "jueves", "viernes", "sábado", "domingo",
    ],
    days_abbr: ["lun", "mar", "mié", "jue", "vie", "sáb", "dom"],
    days_narrow: ["L", "M", "X", "J", "V", "S", "D"],
    eras_abbr: ["a. C.", "d. C."],
    eras_wide: ["antes de Cristo", "después de Cristo"],
    eras_narrow: ["a. C.", "d. C."],
    quarters_abbr: ["T1", "T2", "T3", "T4"],
    quarters_wide: [
        "1.er trimestre", "2.º trimestre", "3.er trimestre", "4.º trimestre",
    ],
    am: "a. m.",
    pm: "p. m.",
    midnight: "medianoche",
    noon: "mediodía",
    morning: "de la mañana",
    afternoon: "de la tarde",
    evening: "de la tarde",
    night: "de la noche",
    date_short: "d/M/yy",
    date_medium: "d MMM y",
    date_long: "d 'de' MMMM 'de' y",
    date_full: "EEEE, d 'de' MMMM 'de' y",
    time_short: "H:mm",
    time_medium: "H:mm:ss",
    datetime_joiner: ", ",
};

static SV: LocaleData = LocaleData {
    months_wide: [
        "januari", "februari", "mars", "april", "maj", "juni", "juli", "augusti", "september",
        "oktober", "november", "december",
    ],
    months_abbr: [
        "jan.", "feb.", "mars", "apr.", "maj", "juni", "juli", "aug.", "sep.", "okt.", "nov.",
        "dec.",
    ],
    months_narrow: ["J", "F", "M", "A", "M", "J", "J", "A", "S", "O", "N", "D"],
    days_wide: [
        "måndag", "tisdag", "onsdag", "torsdag", "fredag", "lördag", "söndag",
    ],
    days_abbr: ["mån", "tis", "ons", "tors", "fre", "lör", "sön"],
    days_narrow: ["M", "T", "O", "T", "F", "L", "S"],
    eras_abbr: ["f.Kr.", "e.Kr."],
    eras_wide: ["före Kristus", "efter Kristus"],
    eras_narrow: ["f.Kr.", "e.Kr."],
    quarters_abbr: ["K1", "K2", "K3", "K4"],
    quarters_wide: [
        "1:a kvartalet", "2:a kvartalet", "3:e kvartalet", "4:e kvartalet",
    ],
    am: "fm",
    pm: "em",
    midnight: "midnatt",
    noon: "middag",
    morning: "på morgonen",
    afternoon: "på eftermiddagen",
    evening: "på kvällen",
    night: "på natten",
    date_short: "y-MM-dd",
    date_medium: "d MMM y",
    date_long: "d MMMM y",
    date_full: "EEEE d MMMM y",
    time_short: "HH:mm",
    time_medium: "HH:mm:ss",
    datetime_joiner: " ",
};

static JA: LocaleData = LocaleData {
    months_wide: [
        "1月", "2月", "3月", "4月", "5月", "6月", "7月", "8月", "9月", "10月", "11月", "12月",
    ],
    months_abbr: [
        "1月", "2月", "3月", "4月", "5月", "6月", "7月", "8月", "9月", "10月", "11月", "12月",
    ],
    months_narrow: ["1", "2", "3", "4", "5", "6", "7", "8", "9", "10", "11", "12"],
    days_wide: [
        "月曜日", "火曜日", "水曜日", "木曜日", "金曜日", "土曜日", "日曜日",
    ],
    days_abbr: ["月", "火", "水", "木", "金", "土", "日"],
    days_narrow: ["月", "火", "水", "木", "金", "土", "日"],
    eras_abbr: ["紀元前", "西暦"],
    eras_wide: ["紀元前", "西暦"],
    eras_narrow: ["BC", "AD"],
    quarters_abbr: ["Q1", "Q2", "Q3", "Q4"],
    quarters_wide: ["第1四半期", "第2四半期", "第3四半期", "第4四半期"],
    am: "午前",
    pm: "午後",
    midnight: "真夜中",
    noon: "正午",
    morning: "朝",
    afternoon: "午後",
    evening: "夜",
    night: "夜中",
    date_short: "y/MM/dd",
    date_medium: "y年M月d日",
    date_long: "y年M月d日",
    date_full: "y年M月d日EEEE",
    time_short: "H:mm",
    time_medium: "H:mm:ss",
    datetime_joiner: " ",
};
