use chrono::{Datelike, NaiveDate};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, List, Widget},
};

use crate::event_widget::EventWidget;

/// One cell of the month grid: day number, event count marker and the day's events
pub struct CalendarDayWidget<'a> {
    events: Vec<EventWidget<'a>>,
    date: NaiveDate,
    count: usize,
    is_selected: bool,
    /// the date lies in the month being shown
    in_month: bool,
    today: NaiveDate,
}

impl<'a> CalendarDayWidget<'a> {
    pub fn new(events: Vec<EventWidget<'a>>, date: NaiveDate, count: usize, today: NaiveDate) -> Self {
        CalendarDayWidget {
            events,
            date,
            count,
            is_selected: false,
            in_month: true,
            today,
        }
    }

    pub fn selected(mut self, is_selected: bool) -> Self {
        self.is_selected = is_selected;
        self
    }

    pub fn in_month(mut self, in_month: bool) -> Self {
        self.in_month = in_month;
        self
    }

    fn title(&self) -> Line<'static> {
        let mut spans = vec![Span::raw(self.date.day().to_string())];
        if self.date == self.today {
            spans.push(Span::raw(" [Today]"));
        }
        if self.count > 0 {
            spans.push(Span::styled(
                format!(" ● {}", self.count),
                Style::default().fg(Color::LightGreen).add_modifier(Modifier::BOLD),
            ));
        }
        Line::from(spans)
    }
}

impl Widget for CalendarDayWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let mut block = Block::bordered().title(self.title());

        // if this widget is selected, then highlight it
        if self.is_selected {
            block = block.border_style(Style::default().fg(Color::LightBlue));
        }

        let mut list = List::new(&self.events).block(block);
        if !self.in_month {
            list = list.style(Style::default().add_modifier(Modifier::DIM));
        }

        // render is implemented for both StatefulWidget and Widget, so we need to tell
        // Rust which one to use explicitly. This is equivalent to list.render(area, buf)
        Widget::render(list, area, buf);
    }
}
