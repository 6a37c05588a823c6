use chrono::NaiveDate;
use ratatui::{
    widgets::{Block, Clear, List, ListItem, Paragraph},
    Frame,
};

use crate::utils::popup_area;

/// Lists the described events of `date`, one per line
pub fn draw_inspect_day_popup(frame: &mut Frame, date: NaiveDate, lines: &[String]) {
    let block = Block::bordered()
        .title(format!("Events on {}", date.format("%Y-%m-%d")))
        .title_bottom("[i] close");
    let area = popup_area(frame.area(), 80, 80);
    frame.render_widget(Clear, area); // this clears out the background

    // if there are no events that day, say so
    if lines.is_empty() {
        frame.render_widget(Paragraph::new("No events on this date.").block(block), area);
        return;
    }

    let items: Vec<ListItem> = lines.iter().map(|line| ListItem::new(line.as_str())).collect();
    frame.render_widget(List::new(items).block(block), area);
}
