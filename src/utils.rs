use chrono::{DateTime, Datelike, Days, NaiveDate};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

const SPANISH_MONTHS: [&str; 12] = [
    "enero",
    "febrero",
    "marzo",
    "abril",
    "mayo",
    "junio",
    "julio",
    "agosto",
    "septiembre",
    "octubre",
    "noviembre",
    "diciembre",
];

const ENGLISH_MONTHS: [&str; 12] = [
    "january",
    "february",
    "march",
    "april",
    "may",
    "june",
    "july",
    "august",
    "september",
    "october",
    "november",
    "december",
];

/// Language used for month labels in report headers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "PascalCase")]
pub enum MonthNameLocale {
    #[default]
    Spanish,
    English,
}

impl MonthNameLocale {
    fn table(self) -> &'static [&'static str; 12] {
        match self {
            MonthNameLocale::Spanish => &SPANISH_MONTHS,
            MonthNameLocale::English => &ENGLISH_MONTHS,
        }
    }
}

/// Capitalized month name for a 1-based month number.
/// Out-of-range months yield an empty string.
pub fn month_name(month: u32, locale: MonthNameLocale) -> String {
    match month.checked_sub(1).and_then(|idx| locale.table().get(idx as usize)) {
        Some(name) => capitalize(name),
        None => String::new(),
    }
}

/// "Month Year" label, e.g. "Enero 2024".
pub fn month_year_label(year: i32, month: u32, locale: MonthNameLocale) -> String {
    format!("{} {}", month_name(month, locale), year)
}

pub fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Last day of the week that starts on `start` (start + 6 days).
pub fn week_end(start: NaiveDate) -> NaiveDate {
    start.checked_add_days(Days::new(6)).unwrap_or(start)
}

/// True when the seven days starting at `start` span two calendar months.
pub fn week_crosses_month(start: NaiveDate) -> bool {
    let end = week_end(start);
    end.month() != start.month() || end.year() != start.year()
}

/// Parses the leading `YYYY-MM-DD` of a date or date-time string, or an
/// HTTP-style RFC 2822 date such as `Mon, 01 Jan 2024 00:00:00 GMT`.
///
/// The calendar day is taken as written; offsets are not applied.
pub fn parse_day(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    let day = trimmed.get(..10).unwrap_or(trimmed);
    NaiveDate::parse_from_str(day, "%Y-%m-%d")
        .ok()
        .or_else(|| {
            DateTime::parse_from_rfc2822(trimmed)
                .ok()
                .map(|dt| dt.date_naive())
        })
}

pub fn round_to_integer(value: f64) -> i64 {
    value.round() as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_month_name() {
        assert_eq!(month_name(1, MonthNameLocale::Spanish), "Enero");
        assert_eq!(month_name(9, MonthNameLocale::Spanish), "Septiembre");
        assert_eq!(month_name(12, MonthNameLocale::English), "December");
        assert_eq!(month_name(0, MonthNameLocale::Spanish), "");
        assert_eq!(month_name(13, MonthNameLocale::Spanish), "");
    }

    #[test]
    fn test_month_year_label() {
        assert_eq!(
            month_year_label(2024, 2, MonthNameLocale::Spanish),
            "Febrero 2024"
        );
    }

    #[test]
    fn test_week_crosses_month() {
        let last_day = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap();
        assert!(week_crosses_month(last_day));

        let mid_month = NaiveDate::from_ymd_opt(2024, 1, 8).unwrap();
        assert!(!week_crosses_month(mid_month));

        // Dec 26 + 6 days lands on Jan 1 of the next year.
        let year_end = NaiveDate::from_ymd_opt(2023, 12, 26).unwrap();
        assert!(week_crosses_month(year_end));
    }

    #[test]
    fn test_parse_day() {
        let expected = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        assert_eq!(parse_day("2024-01-01"), Some(expected));
        assert_eq!(parse_day("2024-01-01T00:00:00.000Z"), Some(expected));
        assert_eq!(parse_day(" 2024-01-01 12:30:00"), Some(expected));
        assert_eq!(parse_day("Mon, 01 Jan 2024 00:00:00 GMT"), Some(expected));
        assert_eq!(parse_day("Mon, 01 Jan 2024 23:30:00 -0500"), Some(expected));
        assert_eq!(parse_day("2024-13-01"), None);
        assert_eq!(parse_day("yesterday"), None);
        assert_eq!(parse_day(""), None);
    }

    #[test]
    fn test_round_to_integer() {
        assert_eq!(round_to_integer(10.4), 10);
        assert_eq!(round_to_integer(10.5), 11);
        assert_eq!(round_to_integer(0.0), 0);
    }
}
