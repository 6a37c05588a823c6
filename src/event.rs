use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveTime};

use crate::error::Error;

pub const DEFAULT_TITLE: &str = "No title";

/// When an event starts or ends: either a bare date (all day) or a wall-clock time on a date
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventTime {
    Date(NaiveDate),
    DateTime {
        date: NaiveDate,
        time: NaiveTime,
        /// IANA zone name, if the api reported one for the event
        timezone: Option<String>,
    },
}

impl EventTime {
    pub fn date(&self) -> NaiveDate {
        match self {
            EventTime::Date(date) => *date,
            EventTime::DateTime { date, .. } => *date,
        }
    }

    pub fn time(&self) -> Option<NaiveTime> {
        match self {
            EventTime::Date(_) => None,
            EventTime::DateTime { time, .. } => Some(*time),
        }
    }

    pub fn is_all_day(&self) -> bool {
        matches!(self, EventTime::Date(_))
    }
}

impl fmt::Display for EventTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventTime::Date(date) => write!(f, "{}", date.format("%Y-%m-%d")),
            EventTime::DateTime { date, time, .. } => {
                write!(f, "{}T{}", date.format("%Y-%m-%d"), time.format("%H:%M:%S"))
            }
        }
    }
}

/// Reads the api's textual form, `2024-05-01` or `2024-05-01T09:00:00+02:00`.
/// The offset is ignored, the wall-clock value is kept as written.
impl FromStr for EventTime {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || Error::InvalidEventTime(s.to_string());

        let (date_part, time_part) = match s.split_once('T') {
            Some((date, time)) => (date, Some(time)),
            None => (s, None),
        };
        let date = NaiveDate::parse_from_str(date_part, "%Y-%m-%d").map_err(|_| invalid())?;

        let Some(time_part) = time_part else {
            return Ok(EventTime::Date(date));
        };

        // seconds are optional, anything after them is an offset
        let time = time_part
            .get(..8)
            .and_then(|hms| NaiveTime::parse_from_str(hms, "%H:%M:%S").ok())
            .or_else(|| {
                time_part
                    .get(..5)
                    .and_then(|hm| NaiveTime::parse_from_str(hm, "%H:%M").ok())
            })
            .ok_or_else(invalid)?;

        Ok(EventTime::DateTime { date, time, timezone: None })
    }
}

/// A calendar entry as the rest of the program sees it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    /// Assigned by the api, absent until the event has been inserted
    pub id: Option<String>,
    pub summary: String,
    pub start: EventTime,
    pub end: EventTime,
}

impl Event {
    pub fn new(summary: impl Into<String>, start: EventTime, end: EventTime) -> Self {
        Event { id: None, summary: summary.into(), start, end }
    }

    /// true when either end of the event lacks a time of day
    pub fn is_all_day(&self) -> bool {
        self.start.is_all_day() || self.end.is_all_day()
    }
}
