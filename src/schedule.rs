//! Publish-date normalisation.
//!
//! A frontmatter `date` can be written as a plain date, a datetime without a
//! zone, or a datetime with an offset. [`ScheduleDate`] captures which of the
//! three was written; [`ScheduleDate::to_utc`] turns any of them into an
//! aware UTC instant:
//!
//! | Written as | Example | Normalised to |
//! |---|---|---|
//! | Date | `2024-05-01` | midnight UTC that day |
//! | Naive datetime | `2024-05-01 09:30` | same wall time, UTC |
//! | Aware datetime | `2024-05-01T09:30:00+02:00` | converted to UTC (07:30) |
//!
//! `serde_yaml` hands timestamps over as strings, so every variant is reached
//! through [`ScheduleDate::parse`]. Besides ISO 8601, RFC 3339 and RFC 2822 it
//! reads written month names (`May 1 2024`, `1 May 2024 09:30`,
//! `January 1, 2020 10:00 PM`), asctime (`Wed May  1 09:30:00 2024`) and the
//! YAML 1.1 timestamp form with a short offset (`2001-12-14 21:59:43.10 -5`).

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use regex::Regex;
use serde_yaml::Value;
use std::sync::LazyLock;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DateError {
    #[error("unrecognised date format: {0:?}")]
    Unparseable(String),
    #[error("expected a date, found a {0}")]
    UnsupportedType(&'static str),
}

/// Numeric calendar layouts. Combined with [`TIME_LAYOUTS`] using either a
/// space or `T` between date and time.
const NUMERIC_DATE_LAYOUTS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%Y.%m.%d"];

/// Written-out calendar layouts. `%B` and `%A` also accept the short names.
const WRITTEN_DATE_LAYOUTS: &[&str] = &[
    "%B %d, %Y",
    "%B %d %Y",
    "%d %B %Y",
    "%d %B, %Y",
    "%A, %B %d, %Y",
    "%A %B %d %Y",
    "%A, %d %B %Y",
];

/// Layouts only ever written without a time.
const BARE_DATE_LAYOUTS: &[&str] = &["%Y%m%d"];

const TIME_LAYOUTS: &[&str] = &["%H:%M:%S%.f", "%H:%M", "%I:%M:%S %p", "%I:%M %p"];

/// asctime style, with the year after the time.
const ASCTIME_LAYOUTS: &[&str] = &["%A %B %d %H:%M:%S %Y"];

/// Every date-with-time layout, without an offset.
static NAIVE_LAYOUTS: LazyLock<Vec<String>> = LazyLock::new(|| {
    let mut layouts = Vec::new();
    for date in NUMERIC_DATE_LAYOUTS {
        for sep in [" ", "T"] {
            for time in TIME_LAYOUTS {
                layouts.push(format!("{date}{sep}{time}"));
            }
        }
    }
    for date in WRITTEN_DATE_LAYOUTS {
        for time in TIME_LAYOUTS {
            layouts.push(format!("{date} {time}"));
        }
    }
    layouts.extend(ASCTIME_LAYOUTS.iter().map(|l| l.to_string()));
    layouts
});

/// [`NAIVE_LAYOUTS`] followed by an offset in the form [`normalise_offset`]
/// produces.
static AWARE_LAYOUTS: LazyLock<Vec<String>> =
    LazyLock::new(|| NAIVE_LAYOUTS.iter().map(|l| format!("{l} %:z")).collect());

/// A time of day followed by a numeric offset: `+2`, `-05`, `+0530`, `+05:30`.
static TRAILING_OFFSET: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?P<head>.*\d:\d{2}(?::\d{2}(?:\.\d+)?)?(?:\s*[AaPp][Mm])?)\s*(?P<sign>[+-])(?P<hours>\d{1,2})(?::?(?P<minutes>\d{2}))?$",
    )
    .expect("static regex is valid")
});

/// A publish date as written in frontmatter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScheduleDate {
    /// Datetime with an explicit offset.
    Aware(DateTime<FixedOffset>),
    /// Datetime without zone information; taken as UTC.
    Naive(NaiveDateTime),
    /// Calendar date; taken as midnight UTC.
    Date(NaiveDate),
}

impl ScheduleDate {
    /// Parse a date or datetime string.
    ///
    /// A trailing `Z`, ` UTC` or ` GMT` is read as a zero offset.
    pub fn parse(text: &str) -> Result<Self, DateError> {
        let text = text.trim();
        let unparseable = || DateError::Unparseable(text.to_string());
        if text.is_empty() {
            return Err(unparseable());
        }

        if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
            return Ok(Self::Aware(dt));
        }
        if let Ok(dt) = DateTime::parse_from_rfc2822(text) {
            return Ok(Self::Aware(dt));
        }

        // Runs of whitespace (asctime pads single-digit days) become one space
        let text = text.split_whitespace().collect::<Vec<_>>().join(" ");
        let zoned = with_numeric_utc_offset(&text);
        let candidate = zoned.as_deref().unwrap_or(&text);
        if let Some(offset_form) = normalise_offset(candidate) {
            if let Some(dt) = AWARE_LAYOUTS
                .iter()
                .find_map(|fmt| DateTime::parse_from_str(&offset_form, fmt).ok())
            {
                return Ok(Self::Aware(dt));
            }
        }
        if zoned.is_some() {
            // Had a UTC marker but no time we could read
            return Err(unparseable());
        }

        if let Some(dt) = NAIVE_LAYOUTS
            .iter()
            .find_map(|fmt| NaiveDateTime::parse_from_str(&text, fmt).ok())
        {
            return Ok(Self::Naive(dt));
        }
        NUMERIC_DATE_LAYOUTS
            .iter()
            .chain(WRITTEN_DATE_LAYOUTS)
            .chain(BARE_DATE_LAYOUTS)
            .find_map(|fmt| NaiveDate::parse_from_str(&text, fmt).ok())
            .map(Self::Date)
            .ok_or_else(unparseable)
    }

    /// Read the `date` value of a frontmatter mapping.
    ///
    /// Returns `Ok(None)` for values that mean "no date": null, an empty
    /// string, `false`, `0`, or an empty list/mapping.
    pub fn from_yaml(value: &Value) -> Result<Option<Self>, DateError> {
        match value {
            Value::Null => Ok(None),
            Value::Bool(false) => Ok(None),
            Value::Bool(true) => Err(DateError::UnsupportedType("boolean")),
            Value::String(s) if s.trim().is_empty() => Ok(None),
            Value::String(s) => Self::parse(s).map(Some),
            Value::Number(n) if n.as_f64() == Some(0.0) => Ok(None),
            Value::Number(n) => Self::parse(&n.to_string()).map(Some),
            Value::Sequence(seq) if seq.is_empty() => Ok(None),
            Value::Sequence(_) => Err(DateError::UnsupportedType("list")),
            Value::Mapping(map) if map.is_empty() => Ok(None),
            Value::Mapping(_) => Err(DateError::UnsupportedType("mapping")),
            Value::Tagged(tagged) => Self::from_yaml(&tagged.value),
        }
    }

    /// Normalise to an aware UTC instant.
    pub fn to_utc(self) -> DateTime<Utc> {
        match self {
            Self::Aware(dt) => dt.with_timezone(&Utc),
            Self::Naive(dt) => dt.and_utc(),
            Self::Date(date) => date.and_time(NaiveTime::MIN).and_utc(),
        }
    }

    /// Whether this date has been reached at `now`. Inclusive.
    pub fn is_due(self, now: DateTime<Utc>) -> bool {
        self.to_utc() <= now
    }
}

/// Rewrite a trailing UTC marker as `+00:00`, if there is one.
fn with_numeric_utc_offset(text: &str) -> Option<String> {
    [" UTC", " GMT", "Z", "z"].into_iter().find_map(|marker| {
        let stem = text.strip_suffix(marker)?;
        // "2024-05-01Z" has no time part to attach an offset to
        stem.contains(':').then(|| format!("{}+00:00", stem.trim_end()))
    })
}

/// Rewrite a trailing numeric offset as ` +HH:MM`, if there is one.
fn normalise_offset(text: &str) -> Option<String> {
    let caps = TRAILING_OFFSET.captures(text)?;
    Some(format!(
        "{} {}{:0>2}:{}",
        &caps["head"],
        &caps["sign"],
        &caps["hours"],
        caps.name("minutes").map_or("00", |m| m.as_str())
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn utc(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, min, s).unwrap()
    }

    // =========================================================================
    // parse: variant detection
    // =========================================================================

    #[test]
    fn parse_plain_date() {
        assert_eq!(
            ScheduleDate::parse("2020-01-01").unwrap(),
            ScheduleDate::Date(NaiveDate::from_ymd_opt(2020, 1, 1).unwrap())
        );
    }

    #[test]
    fn parse_naive_datetime() {
        assert!(matches!(
            ScheduleDate::parse("2024-05-01 09:30:00").unwrap(),
            ScheduleDate::Naive(_)
        ));
        assert!(matches!(
            ScheduleDate::parse("2024-05-01T09:30").unwrap(),
            ScheduleDate::Naive(_)
        ));
    }

    #[test]
    fn parse_rfc3339() {
        assert!(matches!(
            ScheduleDate::parse("2024-05-01T09:30:00+02:00").unwrap(),
            ScheduleDate::Aware(_)
        ));
    }

    #[test]
    fn parse_yaml_style_space_separated_offset() {
        let parsed = ScheduleDate::parse("2024-05-01 09:30:00 +02:00").unwrap();
        assert_eq!(parsed.to_utc(), utc(2024, 5, 1, 7, 30, 0));
    }

    #[test]
    fn parse_trailing_z_and_utc_markers() {
        let expected = utc(2024, 5, 1, 9, 30, 0);
        assert_eq!(
            ScheduleDate::parse("2024-05-01 09:30:00Z").unwrap().to_utc(),
            expected
        );
        assert_eq!(
            ScheduleDate::parse("2024-05-01 09:30 UTC").unwrap().to_utc(),
            expected
        );
    }

    #[test]
    fn parse_rfc2822() {
        let parsed = ScheduleDate::parse("Wed, 01 May 2024 09:30:00 +0000").unwrap();
        assert_eq!(parsed.to_utc(), utc(2024, 5, 1, 9, 30, 0));
    }

    #[test]
    fn parse_written_month_names() {
        let expected = ScheduleDate::Date(NaiveDate::from_ymd_opt(2024, 3, 15).unwrap());
        assert_eq!(ScheduleDate::parse("March 15, 2024").unwrap(), expected);
        assert_eq!(ScheduleDate::parse("15 Mar 2024").unwrap(), expected);
        assert_eq!(ScheduleDate::parse("2024/03/15").unwrap(), expected);
    }

    #[test]
    fn parse_loose_human_formats() {
        let cases = [
            ("May 1 2024", utc(2024, 5, 1, 0, 0, 0)),
            ("January 1, 2020 10:00", utc(2020, 1, 1, 10, 0, 0)),
            ("January 1, 2020 10:00 PM", utc(2020, 1, 1, 22, 0, 0)),
            ("1 May 2024 09:30", utc(2024, 5, 1, 9, 30, 0)),
            ("Wednesday, May 1, 2024", utc(2024, 5, 1, 0, 0, 0)),
            ("Wed May 1 09:30:00 2024", utc(2024, 5, 1, 9, 30, 0)),
            ("Wed May  1 09:30:00 2024", utc(2024, 5, 1, 9, 30, 0)),
            ("2024-05-01 9:30", utc(2024, 5, 1, 9, 30, 0)),
            ("2024/05/01 09:30:00", utc(2024, 5, 1, 9, 30, 0)),
        ];
        for (text, expected) in cases {
            let parsed = ScheduleDate::parse(text);
            assert_eq!(parsed.map(|d| d.to_utc()), Ok(expected), "input {text:?}");
        }
    }

    #[test]
    fn parse_short_and_compact_offsets() {
        let cases = [
            ("2001-12-14 21:59:43 -5", utc(2001, 12, 15, 2, 59, 43)),
            ("2024-05-01T09:30:00+0200", utc(2024, 5, 1, 7, 30, 0)),
            ("2024-05-01 09:30 +5:30", utc(2024, 5, 1, 4, 0, 0)),
            ("2024-05-01 09:30 -05", utc(2024, 5, 1, 14, 30, 0)),
            ("May 1, 2024 9:30 PM +2", utc(2024, 5, 1, 19, 30, 0)),
        ];
        for (text, expected) in cases {
            let parsed = ScheduleDate::parse(text);
            assert!(matches!(parsed, Ok(ScheduleDate::Aware(_))), "input {text:?}");
            assert_eq!(parsed.map(|d| d.to_utc()), Ok(expected), "input {text:?}");
        }
    }

    #[test]
    fn parse_yaml_timestamp_with_fraction_and_short_offset() {
        let parsed = ScheduleDate::parse("2001-12-14 21:59:43.10 -5").unwrap();
        assert_eq!(
            parsed.to_utc(),
            utc(2001, 12, 15, 2, 59, 43) + chrono::TimeDelta::milliseconds(100)
        );
    }

    #[test]
    fn normalise_offset_pads_hours_and_minutes() {
        assert_eq!(
            normalise_offset("2024-05-01 09:30 -5").as_deref(),
            Some("2024-05-01 09:30 -05:00")
        );
        assert_eq!(
            normalise_offset("2024-05-01T09:30:00+0530").as_deref(),
            Some("2024-05-01T09:30:00 +05:30")
        );
        // A plain date's dashes are not an offset
        assert_eq!(normalise_offset("2024-05-01"), None);
        assert_eq!(normalise_offset("2024-05-01 09:30"), None);
    }

    #[test]
    fn parse_trims_whitespace() {
        assert!(ScheduleDate::parse("  2020-01-01 \n").is_ok());
    }

    #[test]
    fn parse_garbage_errors() {
        assert_eq!(
            ScheduleDate::parse("next tuesday"),
            Err(DateError::Unparseable("next tuesday".to_string()))
        );
        assert!(ScheduleDate::parse("2024-13-45").is_err());
        assert!(ScheduleDate::parse("").is_err());
        assert!(ScheduleDate::parse("2024-05-01Z").is_err());
    }

    // =========================================================================
    // to_utc: the three normalisation branches
    // =========================================================================

    #[test]
    fn date_normalises_to_midnight_utc() {
        let date = ScheduleDate::parse("2020-01-01").unwrap();
        assert_eq!(date.to_utc(), utc(2020, 1, 1, 0, 0, 0));
    }

    #[test]
    fn naive_datetime_is_taken_as_utc() {
        let dt = ScheduleDate::parse("2024-05-01 09:30:15").unwrap();
        assert_eq!(dt.to_utc(), utc(2024, 5, 1, 9, 30, 15));
    }

    #[test]
    fn aware_datetime_is_converted_to_utc() {
        let dt = ScheduleDate::parse("2024-05-01T01:00:00-05:00").unwrap();
        assert_eq!(dt.to_utc(), utc(2024, 5, 1, 6, 0, 0));
    }

    // =========================================================================
    // is_due
    // =========================================================================

    #[test]
    fn is_due_is_inclusive() {
        let date = ScheduleDate::parse("2024-05-01T09:30:00Z").unwrap();
        assert!(date.is_due(utc(2024, 5, 1, 9, 30, 0)));
        assert!(date.is_due(utc(2024, 5, 1, 9, 30, 1)));
        assert!(!date.is_due(utc(2024, 5, 1, 9, 29, 59)));
    }

    // =========================================================================
    // from_yaml
    // =========================================================================

    #[test]
    fn from_yaml_empty_values_mean_no_date() {
        for yaml in ["~", "''", "false", "0", "[]", "{}"] {
            let value: Value = serde_yaml::from_str(yaml).unwrap();
            assert_eq!(ScheduleDate::from_yaml(&value), Ok(None), "value {yaml}");
        }
    }

    #[test]
    fn from_yaml_unquoted_timestamp() {
        let value: Value = serde_yaml::from_str("2020-01-01").unwrap();
        assert_eq!(
            ScheduleDate::from_yaml(&value).unwrap().unwrap().to_utc(),
            utc(2020, 1, 1, 0, 0, 0)
        );
    }

    #[test]
    fn from_yaml_compact_integer_date() {
        let value: Value = serde_yaml::from_str("20240315").unwrap();
        assert_eq!(
            ScheduleDate::from_yaml(&value).unwrap().unwrap().to_utc(),
            utc(2024, 3, 15, 0, 0, 0)
        );
    }

    #[test]
    fn from_yaml_rejects_structured_values() {
        let value: Value = serde_yaml::from_str("[2020-01-01]").unwrap();
        assert_eq!(
            ScheduleDate::from_yaml(&value),
            Err(DateError::UnsupportedType("list"))
        );
        let value: Value = serde_yaml::from_str("true").unwrap();
        assert_eq!(
            ScheduleDate::from_yaml(&value),
            Err(DateError::UnsupportedType("boolean"))
        );
    }

    #[test]
    fn from_yaml_tagged_value_is_unwrapped() {
        let value: Value = serde_yaml::from_str("!timestamp 2020-01-01").unwrap();
        assert!(ScheduleDate::from_yaml(&value).unwrap().is_some());
    }
}
