//! Calendar granularities and the comparator that groups rows by them.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Datelike, FixedOffset, Timelike};
use serde::{Deserialize, Serialize};

use crate::MeterError;

/// Text shown for a label whose lead row carries no date.
pub const UNKNOWN_DATE_TEXT: &str = "--";

/// Granularity of a label or marker, ordered finest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Span {
    Hour,
    Day,
    Month,
    Year,
}

impl Span {
    pub fn as_str(self) -> &'static str {
        match self {
            Span::Hour => "hour",
            Span::Day => "day",
            Span::Month => "month",
            Span::Year => "year",
        }
    }

    /// `true` when `self` splits time into smaller units than `other`.
    pub fn is_finer_than(self, other: Span) -> bool {
        self < other
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Span {
    type Err = MeterError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "hour" => Ok(Span::Hour),
            "day" => Ok(Span::Day),
            "month" => Ok(Span::Month),
            "year" => Ok(Span::Year),
            "week" => Err(MeterError::WeekSpanUnsupported),
            other => Err(MeterError::UnsupportedSpan(other.to_string())),
        }
    }
}

impl TryFrom<String> for Span {
    type Error = MeterError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Span> for String {
    fn from(span: Span) -> Self {
        span.as_str().to_string()
    }
}

/// Outcome of comparing two dates at one granularity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpanMatch {
    /// Both dates fall in the same unit.
    pub same: bool,
    /// Both dates fall in the same enclosing unit (e.g. the year of a month).
    pub parent_same: bool,
}

impl SpanMatch {
    const fn new(same: bool, parent_same: bool) -> Self {
        Self { same, parent_same }
    }
}

/// Compares two dates at `span` granularity.
///
/// `Day` compares the day of the week rather than the day of the month, so two
/// Mondays of the same month count as the same day. Callers that group daily
/// data spanning more than a week will see those days merged.
pub fn same_span(a: &DateTime<FixedOffset>, b: &DateTime<FixedOffset>, span: Span) -> SpanMatch {
    let same_hour = a.hour() == b.hour();
    let same_day = a.weekday() == b.weekday();
    let same_month = a.month() == b.month();
    let same_year = a.year() == b.year();

    match span {
        Span::Hour => SpanMatch::new(
            same_hour && same_day && same_month && same_year,
            same_day && same_month && same_year,
        ),
        Span::Day => SpanMatch::new(same_day && same_month && same_year, same_month && same_year),
        Span::Month => SpanMatch::new(same_month && same_year, same_year),
        Span::Year => SpanMatch::new(same_year, true),
    }
}

/// Like [`same_span`] for rows whose date may be missing. Two undated rows
/// share every unit; an undated row shares nothing with a dated one.
pub fn compare(
    a: Option<&DateTime<FixedOffset>>,
    b: Option<&DateTime<FixedOffset>>,
    span: Span,
) -> SpanMatch {
    match (a, b) {
        (Some(a), Some(b)) => same_span(a, b, span),
        (None, None) => SpanMatch::new(true, true),
        _ => SpanMatch::new(false, false),
    }
}

/// Text of a label led by `date`. With `need_parent_unit` the enclosing unit is
/// prefixed so that a reset sequence (`11:00`, `12:00`, `1:00`) stays readable.
pub fn label_text(date: Option<&DateTime<FixedOffset>>, span: Span, need_parent_unit: bool) -> String {
    let Some(date) = date else {
        return UNKNOWN_DATE_TEXT.to_string();
    };
    let day = date.weekday().num_days_from_sunday() + 1;

    match span {
        Span::Year => date.year().to_string(),
        Span::Month if need_parent_unit => format!("{}-{}", date.year(), date.month()),
        Span::Month => date.month().to_string(),
        Span::Day if need_parent_unit => format!("{}-{day}", date.month()),
        Span::Day => day.to_string(),
        Span::Hour if need_parent_unit => format!("{day} {}:00", date.hour()),
        Span::Hour => format!("{}:00", date.hour()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<FixedOffset> {
        FixedOffset::east_opt(0)
            .unwrap()
            .with_ymd_and_hms(y, m, d, h, 0, 0)
            .unwrap()
    }

    #[test]
    fn parses_supported_spans() {
        assert_eq!("year".parse::<Span>(), Ok(Span::Year));
        assert_eq!(" Month ".parse::<Span>(), Ok(Span::Month));
        assert_eq!("day".parse::<Span>(), Ok(Span::Day));
        assert_eq!("hour".parse::<Span>(), Ok(Span::Hour));
    }

    #[test]
    fn rejects_week_and_unknown_spans() {
        assert_eq!("week".parse::<Span>(), Err(MeterError::WeekSpanUnsupported));
        assert_eq!(
            "minute".parse::<Span>(),
            Err(MeterError::UnsupportedSpan("minute".to_string()))
        );
    }

    #[test]
    fn spans_are_ordered_finest_first() {
        assert!(Span::Month.is_finer_than(Span::Year));
        assert!(Span::Hour.is_finer_than(Span::Day));
        assert!(!Span::Year.is_finer_than(Span::Year));
        assert!(!Span::Year.is_finer_than(Span::Month));
    }

    #[test]
    fn year_parent_is_always_same() {
        let result = same_span(&at(2023, 1, 1, 0), &at(2024, 1, 1, 0), Span::Year);
        assert_eq!(result, SpanMatch::new(false, true));
    }

    #[test]
    fn month_compares_year_as_parent() {
        let result = same_span(&at(2024, 3, 1, 0), &at(2024, 4, 1, 0), Span::Month);
        assert_eq!(result, SpanMatch::new(false, true));

        let result = same_span(&at(2023, 3, 1, 0), &at(2024, 3, 1, 0), Span::Month);
        assert_eq!(result, SpanMatch::new(false, false));
    }

    #[test]
    fn day_span_compares_weekday_not_day_of_month() {
        // 2024-03-04 and 2024-03-11 are both Mondays.
        let result = same_span(&at(2024, 3, 4, 0), &at(2024, 3, 11, 0), Span::Day);
        assert!(result.same);

        let result = same_span(&at(2024, 3, 4, 0), &at(2024, 3, 5, 0), Span::Day);
        assert_eq!(result, SpanMatch::new(false, true));
    }

    #[test]
    fn hour_parent_ignores_hour() {
        let result = same_span(&at(2024, 3, 4, 10), &at(2024, 3, 4, 11), Span::Hour);
        assert_eq!(result, SpanMatch::new(false, true));

        let result = same_span(&at(2024, 3, 4, 10), &at(2024, 3, 4, 10), Span::Hour);
        assert_eq!(result, SpanMatch::new(true, true));
    }

    #[test]
    fn undated_rows_only_match_each_other() {
        let dated = at(2024, 1, 1, 0);
        assert_eq!(compare(None, None, Span::Month), SpanMatch::new(true, true));
        assert_eq!(compare(Some(&dated), None, Span::Month), SpanMatch::new(false, false));
    }

    #[test]
    fn label_text_per_span() {
        // 2024-03-04 is a Monday, weekday number 2.
        let date = at(2024, 3, 4, 14);
        assert_eq!(label_text(Some(&date), Span::Year, true), "2024");
        assert_eq!(label_text(Some(&date), Span::Month, true), "2024-3");
        assert_eq!(label_text(Some(&date), Span::Month, false), "3");
        assert_eq!(label_text(Some(&date), Span::Day, true), "3-2");
        assert_eq!(label_text(Some(&date), Span::Day, false), "2");
        assert_eq!(label_text(Some(&date), Span::Hour, true), "2 14:00");
        assert_eq!(label_text(Some(&date), Span::Hour, false), "14:00");
        assert_eq!(label_text(None, Span::Year, true), UNKNOWN_DATE_TEXT);
    }

    #[test]
    fn span_round_trips_through_serde() {
        let json = serde_json::to_string(&Span::Month).unwrap();
        assert_eq!(json, "\"month\"");
        assert!(serde_json::from_str::<Span>("\"week\"").is_err());
    }
}
