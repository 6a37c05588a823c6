//! In-memory stand-in for the google backend, shared by the agenda and app tests.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::Error;
use crate::event::Event;
use crate::google_cal_backend::CalendarApi;

/// Serves one canned listing (then nothing) and remembers what was inserted.
/// Clones share their state, so a test can keep a handle after moving one into an agenda.
#[derive(Clone, Default)]
pub struct FakeCalendar {
    pub listing: Arc<Mutex<Option<Result<Vec<Event>, Error>>>>,
    pub inserted: Arc<Mutex<Vec<(String, Event)>>>,
    pub reject_inserts: bool,
}

impl FakeCalendar {
    pub fn listing(events: Vec<Event>) -> Self {
        FakeCalendar {
            listing: Arc::new(Mutex::new(Some(Ok(events)))),
            ..Default::default()
        }
    }

    pub fn failing() -> Self {
        FakeCalendar {
            listing: Arc::new(Mutex::new(Some(Err(Error::Remote("503 Service Unavailable".into()))))),
            reject_inserts: true,
            ..Default::default()
        }
    }
}

#[async_trait]
impl CalendarApi for FakeCalendar {
    async fn list_upcoming(
        &self,
        calendar_id: &str,
        _time_min: DateTime<Utc>,
        max_results: u32,
    ) -> Result<Vec<Event>, Error> {
        assert_eq!(calendar_id, "primary");
        assert_eq!(max_results, 100);
        self.listing.lock().unwrap().take().unwrap_or_else(|| Ok(Vec::new()))
    }

    async fn insert(&self, calendar_id: &str, event: &Event) -> Result<Event, Error> {
        if self.reject_inserts {
            return Err(Error::Remote("Invalid start time.".into()));
        }
        self.inserted
            .lock()
            .unwrap()
            .push((calendar_id.to_string(), event.clone()));
        Ok(Event {
            id: Some("new-id".to_string()),
            ..event.clone()
        })
    }
}
