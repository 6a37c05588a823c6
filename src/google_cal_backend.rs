extern crate hyper_rustls;

use std::{
    future::Future,
    path::Path,
    pin::Pin,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    time::Duration,
};

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use chrono_tz::Tz;
use google_calendar3::{
    api::{Event as CalendarEvent, EventDateTime, Scope},
    common::GetToken,
    hyper_util,
    yup_oauth2::{
        self,
        authenticator::Authenticator,
        authenticator_delegate::{DefaultInstalledFlowDelegate, InstalledFlowDelegate},
        ApplicationSecret,
    },
    CalendarHub,
};
use tokio::sync::Notify;
use tracing::{debug, info, warn};

use crate::config::{AppDirs, Config};
use crate::error::Error;
use crate::event::{Event, EventTime, DEFAULT_TITLE};

type Connector = hyper_rustls::HttpsConnector<hyper_util::client::legacy::connect::HttpConnector>;

const REAUTHORIZE: &str = "re-authorization required, restart calmark";

/// The two remote operations calmark needs from a calendar provider
#[async_trait]
pub trait CalendarApi {
    /// Events starting from `time_min`, recurring events expanded, ordered by start time
    async fn list_upcoming(
        &self,
        calendar_id: &str,
        time_min: DateTime<Utc>,
        max_results: u32,
    ) -> Result<Vec<Event>, Error>;

    /// Create `event` and return it as the server stored it
    async fn insert(&self, calendar_id: &str, event: &Event) -> Result<Event, Error>;
}

pub struct GoogleCalendar {
    hub: CalendarHub<Connector>,
    /// zone timed events are displayed in
    zone: Tz,
    timeout: Duration,
}

impl GoogleCalendar {
    /// Authenticate (interactively the first time, from the token cache afterwards) and build the hub.
    /// Must run before the terminal is taken over, the consent flow may print to stdout.
    /// Once this returns the consent flow is closed: a grant lost later is reported as `Error::Auth`.
    pub async fn connect(config: &Config, dirs: &AppDirs) -> Result<Self, Error> {
        let zone = config.zone()?;
        let hub = initialize_calendar_hub(
            &config.client_secret_path(dirs),
            &config.token_cache_path(dirs),
        )
        .await?;

        info!(zone = zone.name(), "connected to google calendar");

        Ok(Self {
            hub,
            zone,
            timeout: config.request_timeout(),
        })
    }

    pub fn zone(&self) -> Tz {
        self.zone
    }
}

/// Bound a remote call by `timeout`
pub async fn with_timeout<T, F>(timeout: Duration, call: F) -> Result<T, Error>
where
    F: Future<Output = Result<T, google_calendar3::Error>>,
{
    match tokio::time::timeout(timeout, call).await {
        Ok(result) => Ok(result?),
        Err(_) => Err(Error::Timeout(timeout)),
    }
}

#[async_trait]
impl CalendarApi for GoogleCalendar {
    async fn list_upcoming(
        &self,
        calendar_id: &str,
        time_min: DateTime<Utc>,
        max_results: u32,
    ) -> Result<Vec<Event>, Error> {
        let request = self
            .hub
            .events()
            .list(calendar_id)
            .time_min(time_min)
            .max_results(i32::try_from(max_results).unwrap_or(i32::MAX))
            .single_events(true)
            .order_by("startTime")
            .time_zone(self.zone.name())
            .add_scope(Scope::Full);

        let (_, response) = with_timeout(self.timeout, request.doit()).await?;
        let items = response.items.unwrap_or_default();
        debug!(calendar_id, count = items.len(), "listed events");

        items
            .iter()
            .map(|event| event_from_api(event, self.zone))
            .collect()
    }

    async fn insert(&self, calendar_id: &str, event: &Event) -> Result<Event, Error> {
        let body = event_to_api(event, self.zone)?;
        let request = self
            .hub
            .events()
            .insert(body, calendar_id)
            .add_scope(Scope::Full);

        let (_, created) = with_timeout(self.timeout, request.doit()).await?;
        info!(calendar_id, id = created.id.as_deref().unwrap_or_default(), "inserted event");

        event_from_api(&created, self.zone)
    }
}

pub async fn initialize_calendar_hub(secret_path: &Path, token_path: &Path) -> Result<CalendarHub<Connector>, Error> {
    // The clientsecret file contains JSON like `{"installed":{"client_id": ... }}`
    let secret = yup_oauth2::read_application_secret(secret_path)
        .await
        .map_err(|e| Error::Auth(format!("could not read {}: {e}", secret_path.display())))?;

    // hyper_rustls does not pick a crypto provider on its own, install aws_lc_rs explicitly.
    // Fails only if one is already installed.
    let _ = rustls::crypto::aws_lc_rs::default_provider().install_default();

    let connector = hyper_rustls::HttpsConnectorBuilder::new()
        .with_native_roots()?
        .https_or_http()
        .enable_http1()
        .build();

    let gate = ConsentGate::default();
    gate.open();
    let auth = build_authenticator(secret, token_path, connector.clone(), &gate).await?;

    // Ask for the token now so a failed authorization surfaces before the ui starts
    auth.token(&[Scope::Full.as_ref()])
        .await
        .map_err(|e| Error::Auth(e.to_string()))?;
    gate.close();

    Ok(calendar_hub(connector, StartupOnlyAuth { auth, gate }))
}

/// Tokens are persisted to the token cache and refreshed by the authenticator once they expire
async fn build_authenticator(
    secret: ApplicationSecret,
    token_path: &Path,
    connector: Connector,
    gate: &ConsentGate,
) -> Result<Authenticator<Connector>, Error> {
    let client = hyper_util::client::legacy::Client::builder(
        hyper_util::rt::TokioExecutor::new()
    )
        .build::<_, String>(connector);

    yup_oauth2::InstalledFlowAuthenticator::with_client(
        secret,
        yup_oauth2::InstalledFlowReturnMethod::HTTPRedirect,
        client,
    )
        .persist_tokens_to_disk(token_path)
        .flow_delegate(Box::new(InstalledFlowBrowserDelegate { gate: gate.clone() }))
        .build()
        .await
        .map_err(|e| Error::Auth(format!("could not create the authenticator: {e}")))
}

fn calendar_hub(connector: Connector, auth: StartupOnlyAuth) -> CalendarHub<Connector> {
    let client = hyper_util::client::legacy::Client::builder(
        hyper_util::rt::TokioExecutor::new()
    )
        .build(connector);

    CalendarHub::new(client, auth)
}

/// Whether the consent flow may run. Only open while calmark starts up, the ui owns the terminal after that.
#[derive(Clone, Default)]
struct ConsentGate {
    open: Arc<AtomicBool>,
    refused: Arc<Notify>,
}

impl ConsentGate {
    fn open(&self) {
        self.open.store(true, Ordering::SeqCst);
    }

    fn close(&self) {
        self.open.store(false, Ordering::SeqCst);
    }

    fn is_open(&self) -> bool {
        self.open.load(Ordering::SeqCst)
    }
}

/// Hands the hub its tokens. When a refresh fails the authenticator falls back to the consent flow,
/// which blocks on the local redirect; once the gate is closed that wait is abandoned with an error.
#[derive(Clone)]
struct StartupOnlyAuth {
    auth: Authenticator<Connector>,
    gate: ConsentGate,
}

impl GetToken for StartupOnlyAuth {
    fn get_token<'a>(
        &'a self,
        scopes: &'a [&str],
    ) -> Pin<Box<dyn Future<Output = Result<Option<String>, Box<dyn std::error::Error + Send + Sync>>> + Send + 'a>> {
        Box::pin(async move {
            let refused = self.gate.refused.notified();
            tokio::pin!(refused);
            // registered before the token call, so a refusal during it is never missed
            refused.as_mut().enable();

            let token: Result<Option<String>, Box<dyn std::error::Error + Send + Sync>> = tokio::select! {
                token = self.auth.token(scopes) => token
                    .map(|token| token.token().map(str::to_owned))
                    .map_err(Into::into),
                () = refused => Err(REAUTHORIZE.into()),
            };
            token
        })
    }
}

/// Convert an api event. Times are shown as wall-clock values in `zone`.
pub fn event_from_api(event: &CalendarEvent, zone: Tz) -> Result<Event, Error> {
    let malformed = |field| Error::MalformedEvent {
        id: event.id.clone().unwrap_or_else(|| "<no id>".to_string()),
        field,
    };

    let start = event_time_from_api(event.start.as_ref(), zone).ok_or_else(|| malformed("start"))?;
    let end = event_time_from_api(event.end.as_ref(), zone).ok_or_else(|| malformed("end"))?;

    Ok(Event {
        id: event.id.clone(),
        summary: event.summary.clone().unwrap_or_else(|| DEFAULT_TITLE.to_string()),
        start,
        end,
    })
}

/// The date-time wins over the date since it carries more information
fn event_time_from_api(event_date_time: Option<&EventDateTime>, zone: Tz) -> Option<EventTime> {
    let event_date_time = event_date_time?;
    if let Some(date_time) = event_date_time.date_time {
        let local = date_time.with_timezone(&zone).naive_local();
        Some(EventTime::DateTime {
            date: local.date(),
            time: local.time(),
            timezone: event_date_time.time_zone.clone(),
        })
    } else {
        event_date_time.date.map(EventTime::Date)
    }
}

pub fn event_to_api(event: &Event, zone: Tz) -> Result<CalendarEvent, Error> {
    Ok(CalendarEvent {
        summary: Some(event.summary.clone()),
        start: Some(event_time_to_api(&event.start, zone)?),
        end: Some(event_time_to_api(&event.end, zone)?),
        ..Default::default()
    })
}

/// Timed values are localized in their own zone, or `zone` when they have none
fn event_time_to_api(event_time: &EventTime, zone: Tz) -> Result<EventDateTime, Error> {
    match event_time {
        EventTime::Date(date) => Ok(EventDateTime {
            date: Some(*date),
            ..Default::default()
        }),
        EventTime::DateTime { date, time, timezone } => {
            let tz = match timezone {
                Some(name) => name
                    .parse::<Tz>()
                    .map_err(|_| Error::InvalidForm(format!("Unknown timezone `{name}`.")))?,
                None => zone,
            };
            let local = tz
                .from_local_datetime(&date.and_time(*time))
                .earliest()
                .ok_or_else(|| {
                    Error::InvalidForm(format!("{date} {} does not exist in {}.", time.format("%H:%M"), tz.name()))
                })?;

            Ok(EventDateTime {
                date_time: Some(local.with_timezone(&Utc)),
                time_zone: Some(tz.name().to_string()),
                ..Default::default()
            })
        }
    }
}

////////////////////////////////////////////////////////////
//                                                        //
// Example Implementation of custom InstalledFlowDelegate //
//                                                        //
////////////////////////////////////////////////////////////

// Adapted from the yup_oauth2 examples: https://github.com/dermesser/yup-oauth2/blob/52e29d8db1cd91e6074d6f589bf586220ad05ec4/examples/custom_flow.rs
/// Opens the consent page in a browser. The default delegate still prints the URL, so it can be
/// copied by hand when no browser is available.
async fn browser_user_url(url: &str, need_code: bool) -> Result<String, String> {
    if webbrowser::open(url).is_ok() {
        println!("webbrowser was successfully opened.");
    }
    let def_delegate = DefaultInstalledFlowDelegate;
    def_delegate.present_user_url(url, need_code).await
}

#[derive(Clone)]
struct InstalledFlowBrowserDelegate {
    gate: ConsentGate,
}

impl InstalledFlowDelegate for InstalledFlowBrowserDelegate {
    fn present_user_url<'a>(
        &'a self,
        url: &'a str,
        need_code: bool,
    ) -> Pin<Box<dyn Future<Output = Result<String, String>> + Send + 'a>> {
        if self.gate.is_open() {
            return Box::pin(browser_user_url(url, need_code));
        }

        warn!("stored grant no longer works, consent is only asked for at startup");
        self.gate.refused.notify_waiters();
        Box::pin(async { Err::<String, String>(REAUTHORIZE.to_string()) })
    }
}
