// One line per event inside a calendar day cell
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    prelude::{Line, Text},
    style::{Color, Style},
    text::Span,
    widgets::Widget,
};

use crate::event::Event;

const ALL_DAY_COLOR: Color = Color::Cyan;
const TIMED_COLOR: Color = Color::Yellow;

pub struct EventWidget<'a> {
    event: &'a Event,
}

impl<'a> EventWidget<'a> {
    pub fn new(event: &'a Event) -> Self {
        EventWidget { event }
    }

    /// `• 09:00 Standup`, or `• Holiday` for all-day events
    fn line(&self) -> Line<'a> {
        match self.event.start.time().filter(|_| !self.event.is_all_day()) {
            Some(start) => Line::from(vec![
                Span::styled("• ", Style::default().fg(TIMED_COLOR)),
                Span::styled(format!("{} ", start.format("%H:%M")), Style::default().fg(TIMED_COLOR)),
                Span::raw(self.event.summary.as_str()),
            ]),
            None => Line::from(vec![
                Span::styled("• ", Style::default().fg(ALL_DAY_COLOR)),
                Span::raw(self.event.summary.as_str()),
            ]),
        }
    }
}

impl Widget for EventWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.line().render(area, buf);
    }
}

// We want this so that we can populate the List widget with EventWidgets
impl<'a> From<&EventWidget<'a>> for Text<'a> {
    fn from(widget: &EventWidget<'a>) -> Self {
        Text::from(widget.line())
    }
}
