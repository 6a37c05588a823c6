use chrono::{NaiveDate, NaiveTime, TimeDelta};

use crate::error::Error;
use crate::event::{Event, EventTime};

/// Raw text typed into the add-event form
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventForm {
    pub title: String,
    /// `YYYY-MM-DD`
    pub date: String,
    /// `HH:MM`, optional
    pub time: String,
    /// whole hours, optional
    pub duration: String,
}

impl EventForm {
    pub fn for_date(date: NaiveDate) -> Self {
        EventForm {
            date: date.format("%Y-%m-%d").to_string(),
            ..Default::default()
        }
    }

    /// Assemble the form into an event.
    ///
    /// A date alone makes an all-day event ending (exclusively) the next day. With a time the
    /// event lasts `duration` hours, or `default_length` when no duration was given.
    pub fn to_event(&self, timezone: &str, default_length: TimeDelta) -> Result<Event, Error> {
        let title = self.title.trim();
        let date = self.date.trim();
        if title.is_empty() || date.is_empty() {
            return Err(invalid("Title and date are required."));
        }

        let date = NaiveDate::parse_from_str(date, "%Y-%m-%d")
            .map_err(|_| invalid(format!("`{date}` is not a date like 2024-05-01.")))?;
        let time = optional(&self.time)
            .map(|time| {
                NaiveTime::parse_from_str(time, "%H:%M")
                    .map_err(|_| invalid(format!("`{time}` is not a time like 09:30.")))
            })
            .transpose()?;
        let hours = optional(&self.duration).map(parse_hours).transpose()?;

        match (time, hours) {
            (None, Some(_)) => Err(invalid("A duration needs a start time.")),
            (None, None) => {
                let next_day = date
                    .succ_opt()
                    .ok_or_else(|| invalid("That date is out of range."))?;
                Ok(Event::new(title, EventTime::Date(date), EventTime::Date(next_day)))
            }
            (Some(time), hours) => {
                let length = hours.map(|h| TimeDelta::hours(h.into())).unwrap_or(default_length);
                let start = date.and_time(time);
                let end = start
                    .checked_add_signed(length)
                    .ok_or_else(|| invalid("The event would end out of range."))?;

                Ok(Event::new(
                    title,
                    EventTime::DateTime {
                        date: start.date(),
                        time: start.time(),
                        timezone: Some(timezone.to_owned()),
                    },
                    EventTime::DateTime {
                        date: end.date(),
                        time: end.time(),
                        timezone: Some(timezone.to_owned()),
                    },
                ))
            }
        }
    }
}

fn optional(field: &str) -> Option<&str> {
    Some(field.trim()).filter(|s| !s.is_empty())
}

fn parse_hours(text: &str) -> Result<u32, Error> {
    match text.parse::<u32>() {
        Ok(hours) if hours > 0 => Ok(hours),
        _ => Err(invalid(format!("`{text}` is not a whole number of hours."))),
    }
}

fn invalid(message: impl Into<String>) -> Error {
    Error::InvalidForm(message.into())
}
