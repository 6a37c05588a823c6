//! Grouping of an event snapshot by the date each event is shown under.
//!
//! Everything here is a pure function of the slice it is handed. Output keeps
//! the order of the input.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::event::Event;

/// The date an event is listed under: the date part of its start
pub fn display_date(event: &Event) -> NaiveDate {
    event.start.date()
}

/// Number of events starting on each date. Events with the same title are still counted separately.
pub fn count_by_date(events: &[Event]) -> BTreeMap<NaiveDate, usize> {
    let mut counts = BTreeMap::new();
    for event in events {
        *counts.entry(display_date(event)).or_insert(0) += 1;
    }
    counts
}

pub fn events_for_date(events: &[Event], date: NaiveDate) -> impl Iterator<Item = &Event> {
    events.iter().filter(move |event| display_date(event) == date)
}

/// `title (HH:MM - HH:MM)` for timed events, `title (All day)` otherwise
pub fn describe(event: &Event) -> String {
    match (event.start.time(), event.end.time()) {
        (Some(start), Some(end)) => format!(
            "{} ({} - {})",
            event.summary,
            start.format("%H:%M"),
            end.format("%H:%M")
        ),
        _ => format!("{} (All day)", event.summary),
    }
}

pub fn events_on_date(events: &[Event], date: NaiveDate) -> Vec<String> {
    events_for_date(events, date).map(describe).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::EventTime;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn event(summary: &str, start: &str, end: &str) -> Event {
        Event::new(summary, start.parse().unwrap(), end.parse().unwrap())
    }

    #[test]
    fn display_date_of_all_day_event_is_its_date() {
        let e = event("Holiday", "2024-05-01", "2024-05-02");
        assert_eq!(display_date(&e), date("2024-05-01"));
    }

    #[test]
    fn display_date_of_timed_event_drops_the_time() {
        let e = event("Standup", "2024-05-01T09:00:00", "2024-05-01T09:15:00");
        assert_eq!(display_date(&e), date("2024-05-01"));
    }

    #[test]
    fn counts_events_per_start_date() {
        let events = vec![
            event("a", "2024-05-01", "2024-05-02"),
            event("a", "2024-05-01T09:00:00", "2024-05-01T10:00:00"),
            event("b", "2024-05-02T12:00:00", "2024-05-02T13:00:00"),
        ];

        let counts = count_by_date(&events);

        assert_eq!(counts.len(), 2);
        assert_eq!(counts[&date("2024-05-01")], 2);
        assert_eq!(counts[&date("2024-05-02")], 1);
        assert_eq!(count_by_date(&events), counts);
    }

    #[test]
    fn counting_nothing_gives_an_empty_map() {
        assert!(count_by_date(&[]).is_empty());
    }

    #[test]
    fn multi_day_event_is_counted_on_its_start_only() {
        let events = vec![event("Trip", "2024-05-01", "2024-05-04")];
        let counts = count_by_date(&events);

        assert_eq!(counts.get(&date("2024-05-01")), Some(&1));
        assert_eq!(counts.get(&date("2024-05-02")), None);
    }

    #[test]
    fn formats_timed_events_with_hours_and_minutes() {
        let e = event("Dentist", "2024-05-01T09:00:00", "2024-05-01T10:30:45");
        assert_eq!(describe(&e), "Dentist (09:00 - 10:30)");
    }

    #[test]
    fn formats_all_day_events() {
        let e = event("Holiday", "2024-05-01", "2024-05-02");
        assert_eq!(describe(&e), "Holiday (All day)");
    }

    #[test]
    fn mixed_start_and_end_is_shown_as_all_day() {
        let e = Event::new(
            "Odd",
            "2024-05-01T09:00:00".parse().unwrap(),
            EventTime::Date(date("2024-05-02")),
        );
        assert_eq!(describe(&e), "Odd (All day)");
    }

    #[test]
    fn lists_only_the_queried_date_in_input_order() {
        let events = vec![
            event("Late", "2024-05-01T18:00:00", "2024-05-01T19:00:00"),
            event("Other day", "2024-05-02", "2024-05-03"),
            event("Early", "2024-05-01T08:00:00", "2024-05-01T08:30:00"),
            event("Holiday", "2024-05-01", "2024-05-02"),
        ];

        assert_eq!(
            events_on_date(&events, date("2024-05-01")),
            vec![
                "Late (18:00 - 19:00)",
                "Early (08:00 - 08:30)",
                "Holiday (All day)",
            ]
        );
        assert_eq!(events_on_date(&events, date("2024-05-02")), vec!["Other day (All day)"]);
        assert!(events_on_date(&events, date("2024-05-03")).is_empty());
    }
}
