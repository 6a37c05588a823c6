use chrono::NaiveDate;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::Constraint,
    prelude::Layout,
    style::{Color, Style},
    widgets::{Block, Clear, Paragraph},
    Frame,
};

use crate::form::EventForm;
use crate::utils::popup_area;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Field {
    #[default]
    Title,
    Date,
    Time,
    Duration,
}

impl Field {
    const ALL: [Field; 4] = [Field::Title, Field::Date, Field::Time, Field::Duration];

    fn label(self) -> &'static str {
        match self {
            Field::Title => "Title",
            Field::Date => "Date (YYYY-MM-DD)",
            Field::Time => "Start time (HH:MM, optional)",
            Field::Duration => "Duration in hours (optional)",
        }
    }

    fn next(self) -> Self {
        match self {
            Field::Title => Field::Date,
            Field::Date => Field::Time,
            Field::Time => Field::Duration,
            Field::Duration => Field::Title,
        }
    }

    fn previous(self) -> Self {
        match self {
            Field::Title => Field::Duration,
            Field::Date => Field::Title,
            Field::Time => Field::Date,
            Field::Duration => Field::Time,
        }
    }
}

/// What the form wants the app to do after a key press
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormAction {
    None,
    Submit,
    Cancel,
}

#[derive(Debug, Clone, Default)]
pub struct AddEventPopup {
    pub form: EventForm,
    focus: Field,
}

impl AddEventPopup {
    pub fn new(date: NaiveDate) -> Self {
        AddEventPopup { form: EventForm::for_date(date), focus: Field::Title }
    }

    pub fn focus(&self) -> Field {
        self.focus
    }

    fn field_mut(&mut self, field: Field) -> &mut String {
        match field {
            Field::Title => &mut self.form.title,
            Field::Date => &mut self.form.date,
            Field::Time => &mut self.form.time,
            Field::Duration => &mut self.form.duration,
        }
    }

    fn field(&self, field: Field) -> &str {
        match field {
            Field::Title => &self.form.title,
            Field::Date => &self.form.date,
            Field::Time => &self.form.time,
            Field::Duration => &self.form.duration,
        }
    }

    pub fn on_key_event(&mut self, key: KeyEvent) -> FormAction {
        match (key.modifiers, key.code) {
            (_, KeyCode::Esc) => return FormAction::Cancel,
            (_, KeyCode::Enter) => return FormAction::Submit,
            (_, KeyCode::Tab | KeyCode::Down) => self.focus = self.focus.next(),
            (_, KeyCode::BackTab | KeyCode::Up) => self.focus = self.focus.previous(),
            (_, KeyCode::Backspace) => {
                self.field_mut(self.focus).pop();
            }
            (KeyModifiers::NONE | KeyModifiers::SHIFT, KeyCode::Char(c)) => {
                self.field_mut(self.focus).push(c)
            }
            _ => {}
        }
        FormAction::None
    }
}

pub fn draw_add_event_popup(frame: &mut Frame, popup: &AddEventPopup) {
    let block = Block::bordered()
        .title("Add event")
        .title_bottom("[Tab] next field  [Enter] save  [Esc] cancel");
    let area = popup_area(frame.area(), 60, 70);
    frame.render_widget(Clear, area); // this clears out the background

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let rows = Layout::vertical([Constraint::Length(3); 4]).split(inner);
    for (field, row) in Field::ALL.into_iter().zip(rows.iter()) {
        let mut input = Block::bordered().title(field.label());
        if field == popup.focus() {
            input = input.border_style(Style::default().fg(Color::LightBlue));
        }
        frame.render_widget(Paragraph::new(popup.field(field)).block(input), *row);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(popup: &mut AddEventPopup, code: KeyCode) -> FormAction {
        popup.on_key_event(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn type_text(popup: &mut AddEventPopup, text: &str) {
        for c in text.chars() {
            press(popup, KeyCode::Char(c));
        }
    }

    #[test]
    fn typing_fills_the_focused_field() {
        let mut popup = AddEventPopup::new(NaiveDate::from_ymd_opt(2024, 5, 1).unwrap());
        type_text(&mut popup, "Dentist");
        press(&mut popup, KeyCode::Tab);
        press(&mut popup, KeyCode::Tab);
        type_text(&mut popup, "09:30");
        press(&mut popup, KeyCode::Backspace);

        assert_eq!(popup.form.title, "Dentist");
        assert_eq!(popup.form.date, "2024-05-01");
        assert_eq!(popup.form.time, "09:3");
        assert_eq!(popup.focus(), Field::Time);
    }

    #[test]
    fn focus_wraps_around() {
        let mut popup = AddEventPopup::default();
        press(&mut popup, KeyCode::BackTab);
        assert_eq!(popup.focus(), Field::Duration);
        press(&mut popup, KeyCode::Tab);
        assert_eq!(popup.focus(), Field::Title);
    }

    #[test]
    fn enter_submits_and_escape_cancels() {
        let mut popup = AddEventPopup::default();
        assert_eq!(press(&mut popup, KeyCode::Enter), FormAction::Submit);
        assert_eq!(press(&mut popup, KeyCode::Esc), FormAction::Cancel);
        assert_eq!(press(&mut popup, KeyCode::Char('x')), FormAction::None);
    }

    #[test]
    fn control_keys_are_not_typed() {
        let mut popup = AddEventPopup::default();
        popup.on_key_event(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(popup.form.title.is_empty());
    }
}
