use ratatui::{
    style::{Color, Style},
    widgets::{Block, Clear, Paragraph, Wrap},
    Frame,
};

use crate::utils::popup_area;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Info,
    Error,
}

/// A blocking dialog, dismissed by any key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub kind: MessageKind,
    pub title: String,
    pub body: String,
}

impl Message {
    pub fn info(title: impl Into<String>, body: impl Into<String>) -> Self {
        Message { kind: MessageKind::Info, title: title.into(), body: body.into() }
    }

    pub fn error(err: &crate::error::Error) -> Self {
        Message { kind: MessageKind::Error, title: err.title().to_string(), body: err.to_string() }
    }
}

pub fn draw_message_popup(frame: &mut Frame, message: &Message) {
    let color = match message.kind {
        MessageKind::Info => Color::LightGreen,
        MessageKind::Error => Color::LightRed,
    };
    let block = Block::bordered()
        .title(message.title.as_str())
        .title_bottom("press any key")
        .border_style(Style::default().fg(color));

    let area = popup_area(frame.area(), 60, 30);
    frame.render_widget(Clear, area); // this clears out the background
    frame.render_widget(
        Paragraph::new(message.body.as_str()).wrap(Wrap { trim: true }).block(block),
        area,
    );
}
