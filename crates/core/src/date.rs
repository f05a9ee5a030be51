use std::{fmt, str::FromStr};

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{ReportViewError, Result};

const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
];

/// Calendar date layout used for the "Published" field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DateStyle {
    /// `1/15/2024`
    #[default]
    Us,
    /// `15/01/2024`
    Uk,
    /// `15.1.2024`
    De,
    /// `2024-01-15`
    Iso,
}

impl DateStyle {
    pub fn name(&self) -> &'static str {
        match self {
            DateStyle::Us => "us",
            DateStyle::Uk => "uk",
            DateStyle::De => "de",
            DateStyle::Iso => "iso",
        }
    }

    fn pattern(&self) -> &'static str {
        match self {
            DateStyle::Us => "%-m/%-d/%Y",
            DateStyle::Uk => "%d/%m/%Y",
            DateStyle::De => "%-d.%-m.%Y",
            DateStyle::Iso => "%Y-%m-%d",
        }
    }
}

impl fmt::Display for DateStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DateStyle {
    type Err = ReportViewError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "us" | "en-us" => Ok(DateStyle::Us),
            "uk" | "en-gb" => Ok(DateStyle::Uk),
            "de" | "de-de" => Ok(DateStyle::De),
            "iso" => Ok(DateStyle::Iso),
            other => Err(ReportViewError::InvalidConfig {
                reason: format!("unknown date style {other:?} (expected us, uk, de or iso)"),
            }),
        }
    }
}

/// Parse a publication timestamp into its UTC calendar date.
pub fn parse_published(value: &str) -> Result<NaiveDate> {
    let trimmed = value.trim();

    let rfc3339_err = match DateTime::parse_from_rfc3339(trimmed) {
        Ok(dt) => return Ok(dt.with_timezone(&Utc).date_naive()),
        Err(e) => e,
    };

    for format in NAIVE_DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Ok(dt.date());
        }
    }

    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d").map_err(|_| ReportViewError::InvalidDate {
        value: value.to_string(),
        reason: rfc3339_err.to_string(),
    })
}

pub fn format_calendar_date(date: NaiveDate, style: DateStyle) -> String {
    date.format(style.pattern()).to_string()
}

pub fn format_published(value: &str, style: DateStyle) -> Result<String> {
    parse_published(value).map(|date| format_calendar_date(date, style))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_utc_timestamp_in_each_style() {
        let value = "2024-01-15T00:00:00Z";
        assert_eq!(format_published(value, DateStyle::Us).unwrap(), "1/15/2024");
        assert_eq!(format_published(value, DateStyle::Uk).unwrap(), "15/01/2024");
        assert_eq!(format_published(value, DateStyle::De).unwrap(), "15.1.2024");
        assert_eq!(format_published(value, DateStyle::Iso).unwrap(), "2024-01-15");
    }

    #[test]
    fn offsets_are_normalized_to_utc() {
        let date = parse_published("2024-01-15T23:30:00-05:00").unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2024, 1, 16).unwrap());
    }

    #[test]
    fn accepts_naive_and_date_only_inputs() {
        let expected = NaiveDate::from_ymd_opt(2023, 7, 4).unwrap();
        assert_eq!(parse_published("2023-07-04T10:20:30").unwrap(), expected);
        assert_eq!(parse_published("2023-07-04T10:20:30.123").unwrap(), expected);
        assert_eq!(parse_published("2023-07-04").unwrap(), expected);
    }

    #[test]
    fn rejects_garbage() {
        let err = parse_published("last tuesday").unwrap_err();
        assert!(matches!(err, ReportViewError::InvalidDate { ref value, .. } if value == "last tuesday"));
        assert!(parse_published("").is_err());
    }

    #[test]
    fn parses_style_names() {
        assert_eq!("ISO".parse::<DateStyle>().unwrap(), DateStyle::Iso);
        assert_eq!("en-GB".parse::<DateStyle>().unwrap(), DateStyle::Uk);
        assert!("fr".parse::<DateStyle>().is_err());
    }
}
