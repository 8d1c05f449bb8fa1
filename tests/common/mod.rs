#![allow(dead_code)]

use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use sportschau_scraper::{
    Competition, CsvStore, Result, SportschauClient, SportschauConfig, SportschauError, Transport,
};

pub const NAVIGATION: &str = include_str!("../fixtures/season_navigation.html");
pub const ZWEIKAEMPFE: &str = include_str!("../fixtures/zweikaempfe.html");
pub const TOPSPEED: &str = include_str!("../fixtures/topspeed.html");
pub const LAUFLEISTUNG: &str = include_str!("../fixtures/laufleistung.html");
pub const SPRINTS: &str = include_str!("../fixtures/sprints.html");

const MAINTENANCE: &str = "<html><body><h1>Wartungsarbeiten</h1></body></html>";
const ROWS_CHANGED: &str = r#"<html><body><table>
<thead><tr><th>#</th><th>Name</th><th>Mannschaft</th><th>Spiele</th><th>Max. km/h</th></tr></thead>
<tbody><tr><td colspan="5">Daten werden geladen ...</td></tr></tbody>
</table></body></html>"#;

/// Serves the fixture pages for every season and records each requested URL.
#[derive(Clone, Default)]
pub struct MockTransport {
    calls: Arc<Mutex<Vec<String>>>,
    unreachable: Vec<String>,
    broken: Vec<String>,
    rows_changed: Vec<String>,
    navigation: Option<String>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer 503 for every URL containing `pattern`.
    pub fn unreachable(mut self, pattern: &str) -> Self {
        self.unreachable.push(pattern.to_owned());
        self
    }

    /// Serve a page without any table for every URL containing `pattern`.
    pub fn broken(mut self, pattern: &str) -> Self {
        self.broken.push(pattern.to_owned());
        self
    }

    /// Serve a table with the usual headers but no player rows for every URL
    /// containing `pattern`.
    pub fn rows_changed(mut self, pattern: &str) -> Self {
        self.rows_changed.push(pattern.to_owned());
        self
    }

    pub fn with_navigation(mut self, html: &str) -> Self {
        self.navigation = Some(html.to_owned());
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    fn respond(&self, url: &str) -> Result<String> {
        if self.unreachable.iter().any(|p| url.contains(p.as_str())) {
            return Err(SportschauError::UnexpectedStatus {
                url: url.to_owned(),
                status: reqwest::StatusCode::SERVICE_UNAVAILABLE,
            });
        }
        if self.broken.iter().any(|p| url.contains(p.as_str())) {
            return Ok(MAINTENANCE.to_owned());
        }
        if self.rows_changed.iter().any(|p| url.contains(p.as_str())) {
            return Ok(ROWS_CHANGED.to_owned());
        }

        let page = if url.ends_with("/statistik-zweikaempfe/") {
            ZWEIKAEMPFE
        } else if url.ends_with("/statistik-laufleistung-topspeed/") {
            TOPSPEED
        } else if url.ends_with("/statistik-laufleistung/") {
            LAUFLEISTUNG
        } else if url.ends_with("/statistik-laufleistung-sprints/") {
            SPRINTS
        } else if url.ends_with("/statistik-laufleistung-topspeed") {
            self.navigation.as_deref().unwrap_or(NAVIGATION)
        } else {
            return Err(SportschauError::UnexpectedStatus {
                url: url.to_owned(),
                status: reqwest::StatusCode::NOT_FOUND,
            });
        };
        Ok(page.to_owned())
    }
}

impl Transport for MockTransport {
    async fn get(&self, url: &str) -> Result<String> {
        self.calls.lock().unwrap().push(url.to_owned());
        self.respond(url)
    }
}

pub fn config(competition: Competition, data_dir: &Path) -> SportschauConfig {
    SportschauConfig::default()
        .with_competition(competition)
        .with_data_dir(data_dir)
        .with_request_delay(Duration::ZERO)
}

pub fn client(
    competition: Competition,
    data_dir: &Path,
    transport: &MockTransport,
) -> SportschauClient<MockTransport, CsvStore> {
    SportschauClient::with_parts(
        config(competition, data_dir),
        transport.clone(),
        CsvStore::new(data_dir),
    )
}
