use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::TimeDelta;
use chrono_tz::Tz;
use directories::ProjectDirs;
use serde::Deserialize;
use tracing::warn;

use crate::error::Error;

const APP_NAME: &str = "calmark";

/// Where calmark keeps its configuration and its data (token cache, log)
#[derive(Debug, Clone)]
pub struct AppDirs {
    pub config_dir: PathBuf,
    pub data_dir: PathBuf,
}

impl AppDirs {
    /// Locate the platform directories and create them if needed
    pub fn discover() -> Result<Self, Error> {
        let project_dir = ProjectDirs::from("", "", APP_NAME)
            .ok_or_else(|| Error::Config("could not determine a home directory".to_string()))?;

        let dirs = AppDirs {
            config_dir: project_dir.config_dir().to_path_buf(),
            data_dir: project_dir.data_dir().to_path_buf(),
        };
        fs::create_dir_all(&dirs.config_dir)?;
        fs::create_dir_all(&dirs.data_dir)?;

        Ok(dirs)
    }

    pub fn config_file(&self) -> PathBuf {
        self.config_dir.join("config.toml")
    }
}

/// Contents of `config.toml`. Every key is optional.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub calendar_id: String,
    pub max_results: u32,
    /// IANA zone events are shown and created in, the system zone when unset
    pub timezone: Option<String>,
    pub request_timeout_secs: u64,
    /// Length of an event created with a start time but no duration
    pub default_event_minutes: u32,
    pub client_secret: Option<PathBuf>,
    pub token_cache: Option<PathBuf>,
    pub log_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            calendar_id: "primary".to_string(),
            max_results: 100,
            timezone: None,
            request_timeout_secs: 30,
            default_event_minutes: 60,
            client_secret: None,
            token_cache: None,
            log_file: None,
        }
    }
}

impl Config {
    pub fn load(dirs: &AppDirs) -> Result<Self, Error> {
        Self::from_file(&dirs.config_file())
    }

    /// Read a config file, falling back to the defaults when it does not exist
    pub fn from_file(path: &Path) -> Result<Self, Error> {
        if !path.exists() {
            return Ok(Config::default());
        }
        let content = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), Error> {
        if self.request_timeout_secs == 0 {
            return Err(Error::Config("request_timeout_secs must be at least 1".to_string()));
        }
        if self.default_event_minutes == 0 {
            return Err(Error::Config("default_event_minutes must be at least 1".to_string()));
        }
        self.zone()?;
        Ok(())
    }

    /// Zone used to display and create timed events
    pub fn zone(&self) -> Result<Tz, Error> {
        match &self.timezone {
            Some(name) => name
                .parse::<Tz>()
                .map_err(|_| Error::Config(format!("unknown timezone `{name}`"))),
            None => Ok(system_zone()),
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn default_event_length(&self) -> TimeDelta {
        TimeDelta::minutes(self.default_event_minutes.into())
    }

    pub fn client_secret_path(&self, dirs: &AppDirs) -> PathBuf {
        self.client_secret
            .clone()
            .unwrap_or_else(|| dirs.config_dir.join("clientsecret.json"))
    }

    pub fn token_cache_path(&self, dirs: &AppDirs) -> PathBuf {
        self.token_cache
            .clone()
            .unwrap_or_else(|| dirs.data_dir.join("tokencache.json"))
    }

    pub fn log_path(&self, dirs: &AppDirs) -> PathBuf {
        self.log_file
            .clone()
            .unwrap_or_else(|| dirs.data_dir.join(format!("{APP_NAME}.log")))
    }
}

fn system_zone() -> Tz {
    match localzone::get_local_zone().map(|name| name.parse::<Tz>()) {
        Some(Ok(zone)) => zone,
        _ => {
            warn!("could not determine the system timezone, using UTC");
            Tz::UTC
        }
    }
}
