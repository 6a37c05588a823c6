pub use app::App;

pub mod app;
pub mod agenda;
pub mod aggregate;
pub mod config;
pub mod error;
pub mod event;
pub mod form;
pub mod google_cal_backend;
mod logging;
mod event_widget;
mod calendar_day_widget;
mod utils;
mod inspect_day_popup;
mod add_event_popup;
mod message_popup;
#[cfg(test)]
mod fake_calendar;

use agenda::Agenda;
use config::{AppDirs, Config};
use google_cal_backend::GoogleCalendar;
use tracing::info;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let dirs = AppDirs::discover()?;
    let config = Config::load(&dirs)?;
    logging::init(&config.log_path(&dirs))?;
    info!("starting calmark");

    // authenticate before the terminal is taken over, the consent flow talks on stdout
    let client = GoogleCalendar::connect(&config, &dirs).await?;
    let zone = client.zone();
    let agenda = Agenda::new(client, &config, zone.name());
    let app = App::new(agenda, zone).await;

    let terminal = ratatui::init();
    let result = app.run(terminal).await;
    ratatui::restore();
    result
}

