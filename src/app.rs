use chrono::{Datelike, Days, Months, NaiveDate, Utc};
use chrono_tz::Tz;
use color_eyre::Result;
use crossterm::event::{self, Event as TermEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::Text,
    DefaultTerminal, Frame,
};
use tracing::info;

use crate::{
    add_event_popup::{draw_add_event_popup, AddEventPopup, FormAction},
    agenda::Agenda,
    calendar_day_widget::CalendarDayWidget,
    event_widget::EventWidget,
    google_cal_backend::CalendarApi,
    inspect_day_popup::draw_inspect_day_popup,
    message_popup::{draw_message_popup, Message},
    utils::{grid_start, month_title},
};

const WEEKS_SHOWN: usize = 6;

fn today_in(zone: Tz) -> NaiveDate {
    Utc::now().with_timezone(&zone).date_naive()
}

/// What is drawn over the month view
#[derive(Debug, Default)]
enum Popup {
    #[default]
    None,
    InspectDay,
    AddEvent(AddEventPopup),
}

pub struct App<C> {
    /// Is the application running?
    running: bool,
    agenda: Agenda<C>,
    /// zone the events are shown in, "today" is taken from it too
    zone: Tz,

    // State
    currently_selected_date: NaiveDate,
    popup: Popup,
    /// shown above everything else until a key is pressed
    message: Option<Message>,
}

impl<C: CalendarApi> App<C> {
    /// Construct a new instance of [`App`] and fetch the first batch of events.
    pub async fn new(agenda: Agenda<C>, zone: Tz) -> Self {
        let mut new_app = Self {
            running: true,
            agenda,
            zone,
            currently_selected_date: today_in(zone),
            popup: Popup::None,
            message: None,
        };

        new_app.refresh().await;

        new_app
    }

    /// Run the application's main loop.
    pub async fn run(mut self, mut terminal: DefaultTerminal) -> Result<()> {
        self.running = true;
        while self.running {
            terminal.draw(|frame| self.draw(frame))?;
            self.handle_crossterm_events().await?;
        }
        Ok(())
    }

    /// Refetch events, a failure leaves the grid empty and is shown to the user
    async fn refresh(&mut self) {
        if let Err(e) = self.agenda.refresh().await {
            self.message = Some(Message::error(&e));
        }
    }

    /// Renders the user interface.
    fn draw(&mut self, frame: &mut Frame) {
        self.draw_month_view(frame);

        match &self.popup {
            Popup::None => {}
            Popup::InspectDay => {
                let lines = self.agenda.select_date(self.currently_selected_date);
                draw_inspect_day_popup(frame, self.currently_selected_date, &lines)
            }
            Popup::AddEvent(popup) => draw_add_event_popup(frame, popup),
        }

        if let Some(message) = &self.message {
            draw_message_popup(frame, message);
        }
    }

    fn draw_month_view(&mut self, frame: &mut Frame) {
        // split the area into header and body
        let header_body_areas = Layout::vertical([
            Constraint::Max(2),
            Constraint::Fill(1)
        ])
        .split(frame.area());
        self.draw_header(frame, header_body_areas[0]);

        // the month is a 6x7 grid of CalendarDayWidgets
        let row_areas = Layout::default()
            .direction(Direction::Vertical)
            .constraints(vec![Constraint::Ratio(1, WEEKS_SHOWN as u32); WEEKS_SHOWN])
            .split(header_body_areas[1]);

        let counts = self.agenda.counts();
        let today = today_in(self.zone);
        let selected = self.currently_selected_date;

        // start at the monday on or before the first day of the selected month
        let mut date = grid_start(selected);

        for row in row_areas.iter() {
            let col_areas = Layout::default()
                .direction(Direction::Horizontal)
                .constraints(vec![Constraint::Ratio(1, 7); 7])
                .split(*row);

            for area in col_areas.iter() {
                let event_widgets: Vec<EventWidget> = self
                    .agenda
                    .events_for_date(date)
                    .map(EventWidget::new)
                    .collect();
                let count = counts.get(&date).copied().unwrap_or_default();

                frame.render_widget(
                    CalendarDayWidget::new(event_widgets, date, count, today)
                        .selected(date == selected)
                        .in_month(date.month() == selected.month()),
                    *area,
                );

                date = date + Days::new(1);
            }
        }
    }

    fn draw_header(&mut self, frame: &mut Frame, rect: Rect) {
        let constraints = Constraint::from_percentages([20, 60, 20]);
        let layout = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(constraints)
            .split(rect);

        let title = Text::from(format!(
            "{}  ({} upcoming)",
            month_title(self.currently_selected_date),
            self.agenda.events().len()
        ))
            .centered();
        let previous = Text::from("[p]revious  [a]dd  [r]efresh")
            .left_aligned();
        let next = Text::from("[i]nspect  [q]uit  [n]ext")
            .right_aligned();

        frame.render_widget(title, layout[1]);
        frame.render_widget(previous, layout[0]);
        frame.render_widget(next, layout[2]);
    }

    /// Reads the crossterm events and updates the state of [`App`].
    ///
    /// The read blocks until the next terminal event, remote calls triggered by a key run to
    /// completion (or time out) before the next redraw.
    async fn handle_crossterm_events(&mut self) -> Result<()> {
        match event::read()? {
            // it's important to check KeyEventKind::Press to avoid handling key release events
            TermEvent::Key(key) if key.kind == KeyEventKind::Press => self.on_key_event(key).await,
            TermEvent::Mouse(_) => {}
            TermEvent::Resize(_, _) => {}
            _ => {}
        }
        Ok(())
    }

    /// Handles the key events and updates the state of [`App`].
    async fn on_key_event(&mut self, key: KeyEvent) {
        // a message swallows the key that dismisses it
        if self.message.take().is_some() {
            return;
        }

        if let Popup::AddEvent(popup) = &mut self.popup {
            match popup.on_key_event(key) {
                FormAction::None => {}
                FormAction::Cancel => self.popup = Popup::None,
                FormAction::Submit => self.submit_event().await,
            }
            return;
        }

        match (key.modifiers, key.code) {
            (_, KeyCode::Esc) if matches!(self.popup, Popup::InspectDay) => self.popup = Popup::None,
            (_, KeyCode::Esc | KeyCode::Char('q'))
            | (KeyModifiers::CONTROL, KeyCode::Char('c') | KeyCode::Char('C')) => self.quit(),
            (_, KeyCode::Char('p')) => self.previous_month(),
            (_, KeyCode::Char('n')) => self.next_month(),
            (_, KeyCode::Char('l') | KeyCode::Right) => self.next_day(),
            (_, KeyCode::Char('h') | KeyCode::Left) => self.previous_day(),
            (_, KeyCode::Char('j') | KeyCode::Down) => self.next_week(),
            (_, KeyCode::Char('k') | KeyCode::Up) => self.previous_week(),
            (_, KeyCode::Char('i') | KeyCode::Enter) => self.toggle_inspect_day(),
            (_, KeyCode::Char('a')) => {
                self.popup = Popup::AddEvent(AddEventPopup::new(self.currently_selected_date))
            }
            (_, KeyCode::Char('r')) => self.refresh().await,
            _ => {}
        }
    }

    /// Insert the event from the form. The form stays open with its input when that fails.
    async fn submit_event(&mut self) {
        let Popup::AddEvent(popup) = &self.popup else {
            return;
        };

        match self.agenda.add_event(&popup.form).await {
            Ok(created) => {
                info!(summary = %created.summary, "event added");
                self.popup = Popup::None;
                self.message = Some(Message::info("Event added", format!("Added \"{}\".", created.summary)));
                // a refresh error replaces the confirmation
                self.refresh().await;
            }
            Err(e) => self.message = Some(Message::error(&e)),
        }
    }

    fn toggle_inspect_day(&mut self) {
        self.popup = match self.popup {
            Popup::InspectDay => Popup::None,
            _ => Popup::InspectDay,
        }
    }

    /// sets [`self.currently_selected_date`] to the same day of the next month
    fn next_month(&mut self) {
        self.currently_selected_date = self.currently_selected_date + Months::new(1)
    }

    /// sets [`self.currently_selected_date`] to the same day of the previous month
    fn previous_month(&mut self) {
        self.currently_selected_date = self.currently_selected_date - Months::new(1)
    }

    /// sets [`self.currently_selected_date`] to the next day
    fn next_day(&mut self) {
        self.currently_selected_date = self.currently_selected_date + Days::new(1)
    }

    /// sets [`self.currently_selected_date`] to the previous day
    fn previous_day(&mut self) {
        self.currently_selected_date = self.currently_selected_date - Days::new(1)
    }

    /// sets [`self.currently_selected_date`] to the next week
    fn next_week(&mut self) {
        self.currently_selected_date = self.currently_selected_date + Days::new(7)
    }

    /// sets [`self.currently_selected_date`] to the previous week
    fn previous_week(&mut self) {
        self.currently_selected_date = self.currently_selected_date - Days::new(7)
    }

    /// Set running to false to quit the application.
    fn quit(&mut self) {
        self.running = false;
    }
}
