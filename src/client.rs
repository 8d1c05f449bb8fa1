use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use itertools::Itertools;
use tracing::{debug, instrument, warn};

use crate::config::SportschauConfig;
use crate::error::{Result, SportschauError};
use crate::model::*;
use crate::scraper::seasons::{self, SeasonIndex};
use crate::scraper::{pause, stats, HttpTransport, Transport};
use crate::store::{CsvStore, TableStore};

/// The main entry point for reading Bundesliga physical statistics.
///
/// A client is bound to one competition for its whole lifetime. It keeps no
/// data between calls: every read returns a fresh table.
///
/// # Examples
///
/// ```no_run
/// # async fn example() -> sportschau_scraper::Result<()> {
/// use sportschau_scraper::{Season, SportschauClient};
///
/// let client = SportschauClient::new()?;
/// let report = client.read_seasons(Some(&["2021/2022"])).await?;
/// for record in report.table.season(Season::S2021).unwrap_or_default() {
///     println!("{} ran {:?} km", record.player_name, record.km);
/// }
/// # Ok(())
/// # }
/// ```
pub struct SportschauClient<T = HttpTransport, S = CsvStore> {
    config: SportschauConfig,
    transport: T,
    store: S,
}

impl SportschauClient {
    /// Create a client for GER1 storing under the default data directory.
    pub fn new() -> Result<Self> {
        Self::with_config(SportschauConfig::default())
    }

    /// Create a client over HTTP with a CSV store rooted at `config.data_dir`.
    pub fn with_config(config: SportschauConfig) -> Result<Self> {
        let transport = HttpTransport::with_timeout(config.timeout)?;
        let store = CsvStore::new(&config.data_dir);
        Ok(Self::with_parts(config, transport, store))
    }
}

impl<T: Transport, S: TableStore> SportschauClient<T, S> {
    /// Create a client from its individual parts.
    ///
    /// Use this to plug in a different transport or store.
    pub fn with_parts(config: SportschauConfig, transport: T, store: S) -> Self {
        Self {
            config,
            transport,
            store,
        }
    }

    pub fn competition(&self) -> Competition {
        self.config.competition
    }

    pub fn data_dir(&self) -> &Path {
        &self.config.data_dir
    }

    pub fn config(&self) -> &SportschauConfig {
        &self.config
    }

    /// Scrape a single season of the configured competition.
    #[instrument(skip(self), fields(competition = %self.competition()))]
    pub async fn fetch(&self, season: &str) -> Result<Vec<PlayerSeasonRecord>> {
        let season: Season = season.parse()?;
        let index = self.season_index().await?;
        self.fetch_indexed(&index, season).await
    }

    /// Scrape `seasons` (all known seasons if `None`) and store every season
    /// that succeeded, replacing earlier copies.
    ///
    /// Seasons that fail are reported in [`ReadReport::failures`] and do not
    /// stop the others. If the season index answers with an error status or
    /// an unreadable page, every requested season fails with that error.
    /// Unknown season labels fail the whole call before any request is made,
    /// and so does a transport failure (DNS, connect, timeout) on the index.
    #[instrument(skip(self), fields(competition = %self.competition()))]
    pub async fn read_seasons(&self, seasons: Option<&[&str]>) -> Result<ReadReport> {
        let seasons = resolve_seasons(seasons)?;
        let report = self.collect(&seasons).await?;

        for season in report.table.seasons() {
            let records = report.table.season(season).unwrap_or_default();
            self.store.write_season(self.competition(), season, records)?;
        }
        debug!(
            stored = report.table.seasons().count(),
            failed = report.failures.len(),
            "read seasons"
        );
        Ok(report)
    }

    /// Like [`read_seasons`](Self::read_seasons) without storing anything.
    #[instrument(skip(self), fields(competition = %self.competition()))]
    pub async fn fetch_seasons(&self, seasons: Option<&[&str]>) -> Result<ReadReport> {
        let seasons = resolve_seasons(seasons)?;
        self.collect(&seasons).await
    }

    /// Load stored tables instead of scraping.
    ///
    /// With `all_competitions` every competition that has stored seasons is
    /// returned; otherwise only the configured one. Competitions without
    /// stored data are left out.
    #[instrument(skip(self), fields(competition = %self.competition()))]
    pub fn load_data(&self, all_competitions: bool) -> Result<BTreeMap<Competition, CompetitionTable>> {
        let competitions = if all_competitions {
            Competition::all()
        } else {
            vec![self.competition()]
        };

        let mut tables = BTreeMap::new();
        for competition in competitions {
            let mut seasons = Vec::new();
            for season in self.store.stored_seasons(competition)? {
                if let Some(records) = self.store.read_season(competition, season)? {
                    seasons.push((season, records));
                }
            }
            if seasons.is_empty() {
                debug!(%competition, "no stored data");
                continue;
            }
            tables.insert(competition, CompetitionTable::from_seasons(competition, seasons));
        }
        Ok(tables)
    }

    async fn season_index(&self) -> Result<SeasonIndex> {
        seasons::get_season_index(&self.transport, &self.config.base_url, self.competition()).await
    }

    async fn fetch_indexed(&self, index: &SeasonIndex, season: Season) -> Result<Vec<PlayerSeasonRecord>> {
        let link = index.get(&season).ok_or(SportschauError::SeasonNotListed {
            competition: self.competition(),
            season,
        })?;
        stats::get_season_records(
            &self.transport,
            &self.config.base_url,
            self.competition(),
            season,
            link,
            self.config.request_delay,
        )
        .await
    }

    async fn collect(&self, seasons: &[Season]) -> Result<ReadReport> {
        let index = match self.season_index().await {
            Ok(index) => index,
            // The site is unreachable at transport level (DNS, connect, timeout).
            Err(error @ SportschauError::Http { .. }) => return Err(error),
            Err(error) => {
                warn!(%error, kind = ?error.kind(), "season index unavailable");
                let error = Arc::new(error);
                let failures = seasons
                    .iter()
                    .map(|&season| SeasonFailure {
                        season,
                        error: Arc::clone(&error),
                    })
                    .collect();
                return Ok(ReadReport {
                    table: CompetitionTable::from_seasons(self.competition(), Vec::new()),
                    failures,
                });
            }
        };

        let mut fetched = Vec::new();
        let mut failures = Vec::new();
        for &season in seasons {
            pause(self.config.request_delay).await;
            match self.fetch_indexed(&index, season).await {
                Ok(records) => fetched.push((season, records)),
                Err(error) => {
                    warn!(%season, %error, kind = ?error.kind(), "season could not be read");
                    failures.push(SeasonFailure {
                        season,
                        error: Arc::new(error),
                    });
                }
            }
        }

        Ok(ReadReport {
            table: CompetitionTable::from_seasons(self.competition(), fetched),
            failures,
        })
    }
}

/// Parse the requested season labels, defaulting to every known season.
fn resolve_seasons(seasons: Option<&[&str]>) -> Result<Vec<Season>> {
    match seasons {
        Some(labels) => Ok(Season::parse_all(labels)?.into_iter().unique().collect()),
        None => Ok(Season::all()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_seasons() {
        assert_eq!(resolve_seasons(None).unwrap(), Season::all());
        assert_eq!(
            resolve_seasons(Some(&["2022/2023", "2016/2017", "2022/2023"])).unwrap(),
            vec![Season::S2022, Season::S2016]
        );
        assert!(resolve_seasons(Some(&["2021/22"])).is_err());
    }

    #[test]
    fn test_new_client_uses_config() {
        let dir = tempfile::tempdir().unwrap();
        let config = SportschauConfig::default()
            .with_competition(Competition::Ger2)
            .with_data_dir(dir.path());
        let client = SportschauClient::with_config(config).unwrap();

        assert_eq!(client.competition(), Competition::Ger2);
        assert_eq!(client.data_dir(), dir.path());
    }

    #[tokio::test]
    #[ignore = "requires network access to sportschau.de"]
    async fn test_fetch_live() {
        let dir = tempfile::tempdir().unwrap();
        let config = SportschauConfig::default().with_data_dir(dir.path());
        let client = SportschauClient::with_config(config).unwrap();

        let records = client.fetch("2021/2022").await.unwrap();
        assert!(!records.is_empty());
        assert!(records.iter().all(|r| r.season == Season::S2021));
    }
}
