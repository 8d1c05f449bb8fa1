use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::Result;
use crate::model::Competition;

pub(crate) const DEFAULT_BASE_URL: &str = "https://www.sportschau.de/live-und-ergebnisse/fussball/";
const DEFAULT_REQUEST_DELAY: Duration = Duration::from_secs(2);
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
const APP_DIR: &str = "sportschau_bl_data";

/// Settings for a [`SportschauClient`](crate::SportschauClient).
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use sportschau_scraper::{Competition, SportschauConfig};
///
/// let config = SportschauConfig::default()
///     .with_competition_id("GER2")?
///     .with_data_dir("/tmp/bl-data")
///     .with_request_delay(Duration::from_millis(500));
/// assert_eq!(config.competition, Competition::Ger2);
/// # Ok::<(), sportschau_scraper::SportschauError>(())
/// ```
#[derive(Debug, Clone)]
pub struct SportschauConfig {
    /// League the client reads and stores.
    pub competition: Competition,
    /// Root directory of the stored tables.
    pub data_dir: PathBuf,
    /// Pause between two consecutive page requests.
    pub request_delay: Duration,
    /// Per-request timeout of the HTTP client.
    pub timeout: Duration,
    /// Prefix of every statistics URL, ending in `/`.
    pub base_url: String,
}

impl Default for SportschauConfig {
    fn default() -> Self {
        Self {
            competition: Competition::default(),
            data_dir: default_data_dir(),
            request_delay: DEFAULT_REQUEST_DELAY,
            timeout: DEFAULT_TIMEOUT,
            base_url: DEFAULT_BASE_URL.to_owned(),
        }
    }
}

impl SportschauConfig {
    pub fn with_competition(mut self, competition: Competition) -> Self {
        self.competition = competition;
        self
    }

    /// Like [`with_competition`](Self::with_competition), from an id such as `"GER1"`.
    pub fn with_competition_id(self, id: &str) -> Result<Self> {
        Ok(self.with_competition(id.parse()?))
    }

    pub fn with_data_dir(mut self, data_dir: impl AsRef<Path>) -> Self {
        self.data_dir = data_dir.as_ref().to_path_buf();
        self
    }

    pub fn with_request_delay(mut self, delay: Duration) -> Self {
        self.request_delay = delay;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        if !base_url.ends_with('/') {
            base_url.push('/');
        }
        self.base_url = base_url;
        self
    }
}

/// `<data dir>/sportschau_bl_data/data`, e.g. `~/.local/share/sportschau_bl_data/data`.
///
/// Falls back to `~/project_data/sportschau_bl_data/data`, then to a path
/// relative to the working directory.
pub fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .or_else(|| dirs::home_dir().map(|home| home.join("project_data")))
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
        .join("data")
}
