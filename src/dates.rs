//! Calendar date handling
//!
//! All dates in the system are timezone-naive calendar days stored in the
//! fixed-width `YYYY-MM-DD` form. Because the form is zero-padded, ordering
//! of the stored strings matches chronological ordering, and [`CalendarDate`]
//! orders the same way.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Datelike, Local, Months, NaiveDate, NaiveDateTime, TimeZone, Weekday};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

const CANONICAL_FORMAT: &str = "%Y-%m-%d";

/// Date-only layouts accepted besides the canonical one.
const DATE_LAYOUTS: &[&str] = &["%Y/%m/%d", "%m/%d/%Y", "%d %b %Y", "%b %d, %Y", "%B %d, %Y"];

/// Date-time layouts whose date part is taken as written.
const DATETIME_LAYOUTS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// A calendar day, serialized as `YYYY-MM-DD`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CalendarDate(NaiveDate);

impl CalendarDate {
    /// Today in the local calendar.
    pub fn today() -> Self {
        Self(Local::now().date_naive())
    }

    /// Canonicalize any date-like input, returning `None` when it cannot be
    /// understood as a calendar day.
    pub fn parse(input: impl ToCalendarDate) -> Option<Self> {
        input.to_calendar_date()
    }

    pub fn naive(&self) -> NaiveDate {
        self.0
    }

    pub fn weekday(&self) -> Weekday {
        self.0.weekday()
    }

    pub fn add_days(&self, days: i64) -> Self {
        Self(self.0 + chrono::Duration::days(days))
    }
}

impl fmt::Display for CalendarDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(CANONICAL_FORMAT))
    }
}

impl FromStr for CalendarDate {
    type Err = InvalidDate;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_date_str(s).ok_or_else(|| InvalidDate(s.to_string()))
    }
}

impl Serialize for CalendarDate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for CalendarDate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct DateVisitor;

        impl de::Visitor<'_> for DateVisitor {
            type Value = CalendarDate;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a calendar date")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
                v.parse().map_err(E::custom)
            }
        }

        deserializer.deserialize_str(DateVisitor)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid date '{0}'")]
pub struct InvalidDate(pub String);

/// Conversion of date-like values into a [`CalendarDate`].
pub trait ToCalendarDate {
    fn to_calendar_date(&self) -> Option<CalendarDate>;
}

impl ToCalendarDate for CalendarDate {
    fn to_calendar_date(&self) -> Option<CalendarDate> {
        Some(*self)
    }
}

impl ToCalendarDate for NaiveDate {
    fn to_calendar_date(&self) -> Option<CalendarDate> {
        Some(CalendarDate(*self))
    }
}

impl ToCalendarDate for NaiveDateTime {
    fn to_calendar_date(&self) -> Option<CalendarDate> {
        Some(CalendarDate(self.date()))
    }
}

impl<Tz: TimeZone> ToCalendarDate for DateTime<Tz> {
    fn to_calendar_date(&self) -> Option<CalendarDate> {
        Some(CalendarDate(self.date_naive()))
    }
}

impl ToCalendarDate for str {
    fn to_calendar_date(&self) -> Option<CalendarDate> {
        parse_date_str(self)
    }
}

impl ToCalendarDate for String {
    fn to_calendar_date(&self) -> Option<CalendarDate> {
        parse_date_str(self)
    }
}

impl ToCalendarDate for Value {
    fn to_calendar_date(&self) -> Option<CalendarDate> {
        match self {
            Value::String(s) => parse_date_str(s),
            _ => None,
        }
    }
}

impl<T: ToCalendarDate + ?Sized> ToCalendarDate for &T {
    fn to_calendar_date(&self) -> Option<CalendarDate> {
        (**self).to_calendar_date()
    }
}

impl<T: ToCalendarDate> ToCalendarDate for Option<T> {
    fn to_calendar_date(&self) -> Option<CalendarDate> {
        self.as_ref().and_then(ToCalendarDate::to_calendar_date)
    }
}

fn parse_date_str(input: &str) -> Option<CalendarDate> {
    let s = input.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(date) = NaiveDate::parse_from_str(s, CANONICAL_FORMAT) {
        return Some(CalendarDate(date));
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(CalendarDate(dt.date_naive()));
    }

    for layout in DATETIME_LAYOUTS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, layout) {
            return Some(CalendarDate(dt.date()));
        }
    }

    DATE_LAYOUTS
        .iter()
        .find_map(|layout| NaiveDate::parse_from_str(s, layout).ok())
        .map(CalendarDate)
}

/// Inclusive date range; a missing bound is unbounded on that side.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DateRange {
    pub from: Option<CalendarDate>,
    pub to: Option<CalendarDate>,
}

impl DateRange {
    pub fn new(from: Option<CalendarDate>, to: Option<CalendarDate>) -> Self {
        Self { from, to }
    }

    pub fn between(from: CalendarDate, to: CalendarDate) -> Self {
        Self {
            from: Some(from),
            to: Some(to),
        }
    }

    pub fn unbounded() -> Self {
        Self::default()
    }

    pub fn contains(&self, date: CalendarDate) -> bool {
        if matches!(self.from, Some(from) if date < from) {
            return false;
        }
        if matches!(self.to, Some(to) if date > to) {
            return false;
        }
        true
    }
}

/// Monday through Sunday of the week containing `today`.
pub fn week_bounds(today: CalendarDate) -> (CalendarDate, CalendarDate) {
    let back = match today.weekday() {
        Weekday::Sun => 6,
        other => i64::from(other.num_days_from_monday()),
    };
    let monday = today.add_days(-back);
    (monday, monday.add_days(6))
}

/// First through last day of the month containing `today`.
pub fn month_bounds(today: CalendarDate) -> (CalendarDate, CalendarDate) {
    let first = today.naive().with_day(1).unwrap_or(today.naive());
    let last = first
        .checked_add_months(Months::new(1))
        .and_then(|next| next.pred_opt())
        .unwrap_or(first);
    (CalendarDate(first), CalendarDate(last))
}
