use std::fmt;
use std::str::FromStr;

use chrono::DateTime;
use chrono::Duration;
use chrono::NaiveDate;
use chrono::NaiveTime;
use chrono::TimeZone;
use chrono::Utc;

use crate::error::ParseActivityTypeError;
use crate::error::ParseDateError;
use crate::types::ActivityRecord;
use crate::types::ActivityType;

/// Type predicate. `All` is the "no constraint" sentinel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TypeFilter {
    #[default]
    All,
    Only(ActivityType),
}

impl TypeFilter {
    pub fn matches(self, kind: ActivityType) -> bool {
        match self {
            Self::All => true,
            Self::Only(want) => want == kind,
        }
    }
}

impl From<ActivityType> for TypeFilter {
    fn from(kind: ActivityType) -> Self {
        Self::Only(kind)
    }
}

impl fmt::Display for TypeFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str("ALL"),
            Self::Only(kind) => fmt::Display::fmt(kind, f),
        }
    }
}

impl FromStr for TypeFilter {
    type Err = ParseActivityTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            return Ok(Self::All);
        }
        s.parse().map(Self::Only)
    }
}

/// Conjunction of optional predicates over the activity list.
///
/// Omitted criteria impose no constraint. Both date bounds are inclusive.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterCriteria {
    pub kind: TypeFilter,
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
    pub search: Option<String>,
}

impl FilterCriteria {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_type(mut self, kind: impl Into<TypeFilter>) -> Self {
        self.kind = kind.into();
        self
    }

    pub fn since(mut self, start: DateTime<Utc>) -> Self {
        self.start = Some(start);
        self
    }

    pub fn until(mut self, end: DateTime<Utc>) -> Self {
        self.end = Some(end);
        self
    }

    /// Replace both bounds with the ones `range` resolves to at `now`.
    pub fn with_date_range<Tz: TimeZone>(mut self, range: DateRange, now: &DateTime<Tz>) -> Self {
        let (start, end) = range.bounds(now);
        self.start = start;
        self.end = end;
        self
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    /// True when no predicate constrains the result.
    pub fn is_empty(&self) -> bool {
        self.kind == TypeFilter::All
            && self.start.is_none()
            && self.end.is_none()
            && self.search.as_deref().is_none_or(str::is_empty)
    }

    pub fn matches(&self, record: &ActivityRecord) -> bool {
        let needle = self.needle();
        self.matches_with(record, needle.as_deref())
    }

    /// Keep the matching records, preserving their order.
    pub fn apply(&self, records: Vec<ActivityRecord>) -> Vec<ActivityRecord> {
        let needle = self.needle();
        records
            .into_iter()
            .filter(|r| self.matches_with(r, needle.as_deref()))
            .collect()
    }

    fn needle(&self) -> Option<String> {
        self.search
            .as_deref()
            .filter(|s| !s.is_empty())
            .map(str::to_lowercase)
    }

    fn matches_with(&self, record: &ActivityRecord, needle: Option<&str>) -> bool {
        if !self.kind.matches(record.kind) {
            return false;
        }
        if self.start.is_some_and(|start| record.timestamp < start) {
            return false;
        }
        if self.end.is_some_and(|end| record.timestamp > end) {
            return false;
        }
        match needle {
            Some(needle) => record.item_name.to_lowercase().contains(needle),
            None => true,
        }
    }
}

/// Date presets offered by the filter panel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DateRange {
    #[default]
    All,
    /// The calendar day containing `now`, in `now`'s time zone.
    Today,
    Last7Days,
    Last30Days,
    Custom {
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
    },
}

impl DateRange {
    pub fn bounds<Tz: TimeZone>(
        &self,
        now: &DateTime<Tz>,
    ) -> (Option<DateTime<Utc>>, Option<DateTime<Utc>>) {
        match *self {
            Self::All => (None, None),
            Self::Today => {
                let tz = now.timezone();
                let day = now.date_naive();
                let start = first_local_instant(&tz, day);
                let end = last_local_instant(&tz, day);
                (
                    start.map(|d| d.with_timezone(&Utc)),
                    end.map(|d| d.with_timezone(&Utc)),
                )
            }
            Self::Last7Days => trailing_days(now, 7),
            Self::Last30Days => trailing_days(now, 30),
            Self::Custom { start, end } => (start, end),
        }
    }
}

const MINUTES_PER_DAY: i64 = 24 * 60;

/// Local midnight of `day`, or the first minute after it that exists when
/// a clock change skips midnight.
fn first_local_instant<Tz: TimeZone>(tz: &Tz, day: NaiveDate) -> Option<DateTime<Tz>> {
    let midnight = day.and_hms_milli_opt(0, 0, 0, 0)?;
    (0..MINUTES_PER_DAY)
        .find_map(|m| tz.from_local_datetime(&(midnight + Duration::minutes(m))).earliest())
}

/// The last millisecond of `day`, stepping back past a skipped interval.
fn last_local_instant<Tz: TimeZone>(tz: &Tz, day: NaiveDate) -> Option<DateTime<Tz>> {
    let last = day.and_hms_milli_opt(23, 59, 59, 999)?;
    (0..MINUTES_PER_DAY)
        .find_map(|m| tz.from_local_datetime(&(last - Duration::minutes(m))).latest())
}

fn trailing_days<Tz: TimeZone>(
    now: &DateTime<Tz>,
    days: i64,
) -> (Option<DateTime<Utc>>, Option<DateTime<Utc>>) {
    let now = now.with_timezone(&Utc);
    (Some(now - Duration::days(days)), Some(now))
}

/// Which end of a bare `YYYY-MM-DD` day a bound refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayEdge {
    Start,
    End,
}

/// Parse a filter bound given either as RFC 3339 or as a bare UTC date.
///
/// A bare date expands to its first millisecond for [`DayEdge::Start`] and
/// its last millisecond for [`DayEdge::End`], so a one-day custom range
/// covers the whole day.
pub fn parse_date_bound(input: &str, edge: DayEdge) -> Result<DateTime<Utc>, ParseDateError> {
    let input = input.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(input) {
        return Ok(ts.with_timezone(&Utc));
    }
    let day = NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .map_err(|_| ParseDateError(input.to_string()))?;
    let time = match edge {
        DayEdge::Start => NaiveTime::from_hms_milli_opt(0, 0, 0, 0),
        DayEdge::End => NaiveTime::from_hms_milli_opt(23, 59, 59, 999),
    }
    .ok_or_else(|| ParseDateError(input.to_string()))?;
    Ok(day.and_time(time).and_utc())
}
