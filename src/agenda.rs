use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{NaiveDate, TimeDelta, Utc};
use tracing::{info, warn};

use crate::aggregate;
use crate::config::Config;
use crate::error::Error;
use crate::event::Event;
use crate::form::EventForm;
use crate::google_cal_backend::CalendarApi;

/// Commands a ui drives: refresh the snapshot, add an event, look at a day.
///
/// The snapshot is immutable and replaced as a whole on each refresh.
pub struct Agenda<C> {
    client: C,
    calendar_id: String,
    max_results: u32,
    timezone: String,
    default_length: TimeDelta,
    events: Arc<[Event]>,
}

impl<C: CalendarApi> Agenda<C> {
    pub fn new(client: C, config: &Config, timezone: impl Into<String>) -> Self {
        Agenda {
            client,
            calendar_id: config.calendar_id.clone(),
            max_results: config.max_results,
            timezone: timezone.into(),
            default_length: config.default_event_length(),
            events: Arc::from(Vec::new()),
        }
    }

    /// Fetch upcoming events. On failure the snapshot is emptied and the error handed back.
    pub async fn refresh(&mut self) -> Result<(), Error> {
        match self
            .client
            .list_upcoming(&self.calendar_id, Utc::now(), self.max_results)
            .await
        {
            Ok(events) => {
                info!(count = events.len(), "refreshed events");
                self.events = Arc::from(events);
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "refresh failed, showing no events");
                self.events = Arc::from(Vec::new());
                Err(e)
            }
        }
    }

    /// Validate the form and insert the event. The snapshot is left alone, refresh afterwards to see it.
    pub async fn add_event(&mut self, form: &EventForm) -> Result<Event, Error> {
        let event = form.to_event(&self.timezone, self.default_length)?;
        match self.client.insert(&self.calendar_id, &event).await {
            Ok(created) => Ok(created),
            Err(e) => {
                warn!(error = %e, summary = %event.summary, "insert failed");
                Err(e)
            }
        }
    }

    /// One line per event on `date`
    pub fn select_date(&self, date: NaiveDate) -> Vec<String> {
        aggregate::events_on_date(&self.events, date)
    }

    pub fn counts(&self) -> BTreeMap<NaiveDate, usize> {
        aggregate::count_by_date(&self.events)
    }

    pub fn events(&self) -> Arc<[Event]> {
        Arc::clone(&self.events)
    }

    pub fn events_for_date(&self, date: NaiveDate) -> impl Iterator<Item = &Event> {
        aggregate::events_for_date(&self.events, date)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fake_calendar::FakeCalendar;

    fn event(summary: &str, start: &str, end: &str) -> Event {
        Event::new(summary, start.parse().unwrap(), end.parse().unwrap())
    }

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn agenda(client: FakeCalendar) -> Agenda<FakeCalendar> {
        Agenda::new(client, &Config::default(), "Europe/Budapest")
    }

    #[tokio::test]
    async fn refresh_replaces_the_snapshot() {
        let mut agenda = agenda(FakeCalendar::listing(vec![
            event("Standup", "2024-05-01T09:00:00", "2024-05-01T09:15:00"),
            event("Holiday", "2024-05-01", "2024-05-02"),
            event("Review", "2024-05-02T14:00:00", "2024-05-02T15:00:00"),
        ]));
        assert!(agenda.events().is_empty());

        agenda.refresh().await.unwrap();

        assert_eq!(agenda.events().len(), 3);
        assert_eq!(agenda.counts().get(&date("2024-05-01")), Some(&2));
        assert_eq!(
            agenda.select_date(date("2024-05-01")),
            vec!["Standup (09:00 - 09:15)", "Holiday (All day)"]
        );

        // the fake has nothing left to list, so the next refresh empties the snapshot
        agenda.refresh().await.unwrap();
        assert!(agenda.events().is_empty());
    }

    #[tokio::test]
    async fn failed_refresh_falls_back_to_no_events() {
        let mut agenda = agenda(FakeCalendar::failing());

        let err = agenda.refresh().await.unwrap_err();

        assert!(matches!(err, Error::Remote(_)));
        assert!(agenda.events().is_empty());
        assert!(agenda.counts().is_empty());
        assert!(agenda.select_date(date("2024-05-01")).is_empty());
    }

    #[tokio::test]
    async fn add_event_inserts_the_assembled_event() {
        let mut agenda = agenda(FakeCalendar::default());
        let form = EventForm {
            title: "Picnic".into(),
            date: "2024-05-01".into(),
            ..Default::default()
        };

        let created = agenda.add_event(&form).await.unwrap();

        assert_eq!(created.id.as_deref(), Some("new-id"));
        let inserted = agenda.client.inserted.lock().unwrap();
        assert_eq!(inserted.len(), 1);
        assert_eq!(inserted[0].0, "primary");
        assert_eq!(inserted[0].1.start, "2024-05-01".parse().unwrap());
    }

    #[tokio::test]
    async fn invalid_form_never_reaches_the_calendar() {
        let mut agenda = agenda(FakeCalendar::default());

        let err = agenda.add_event(&EventForm::default()).await.unwrap_err();

        assert!(matches!(err, Error::InvalidForm(_)));
        assert!(agenda.client.inserted.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn rejected_insert_is_reported() {
        let mut agenda = agenda(FakeCalendar::failing());
        let form = EventForm {
            title: "Picnic".into(),
            date: "2024-05-01".into(),
            time: "12:00".into(),
            ..Default::default()
        };

        assert!(matches!(agenda.add_event(&form).await, Err(Error::Remote(_))));
    }

    #[tokio::test]
    async fn date_only_event_shows_up_under_its_date_after_refresh() {
        let mut agenda = agenda(FakeCalendar::default());
        let form = EventForm {
            title: "Picnic".into(),
            date: "2024-05-01".into(),
            ..Default::default()
        };
        let created = agenda.add_event(&form).await.unwrap();

        *agenda.client.listing.lock().unwrap() = Some(Ok(vec![created]));
        agenda.refresh().await.unwrap();

        assert_eq!(agenda.select_date(date("2024-05-01")), vec!["Picnic (All day)"]);
        assert!(agenda.select_date(date("2024-05-02")).is_empty());
    }
}
