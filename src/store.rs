use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{Result, SportschauError};
use crate::model::{Competition, PlayerSeasonRecord, Season};

/// Persistence for scraped seasons, addressed by competition and season.
pub trait TableStore {
    /// Store the records of one season, replacing whatever was stored before.
    fn write_season(
        &self,
        competition: Competition,
        season: Season,
        records: &[PlayerSeasonRecord],
    ) -> Result<()>;

    /// Records of one season, or `None` if nothing is stored for it.
    fn read_season(
        &self,
        competition: Competition,
        season: Season,
    ) -> Result<Option<Vec<PlayerSeasonRecord>>>;

    /// Whether anything is stored for this competition and season.
    fn exists(&self, competition: Competition, season: Season) -> bool;

    /// Seasons stored for a competition, oldest first.
    fn stored_seasons(&self, competition: Competition) -> Result<Vec<Season>>;
}

/// Stores one CSV file per season: `{data_dir}/{GER1}_{2021-2022}.csv`.
#[derive(Debug, Clone)]
pub struct CsvStore {
    data_dir: PathBuf,
}

impl CsvStore {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn season_path(&self, competition: Competition, season: Season) -> PathBuf {
        self.data_dir
            .join(format!("{}_{}.csv", competition, season.url_segment()))
    }
}

impl TableStore for CsvStore {
    fn write_season(
        &self,
        competition: Competition,
        season: Season,
        records: &[PlayerSeasonRecord],
    ) -> Result<()> {
        fs::create_dir_all(&self.data_dir).map_err(|source| SportschauError::Io {
            path: self.data_dir.clone(),
            source,
        })?;

        let path = self.season_path(competition, season);
        let csv_err = |source| SportschauError::Csv {
            path: path.clone(),
            source,
        };
        let mut writer = csv::Writer::from_path(&path).map_err(csv_err)?;
        for record in records {
            writer.serialize(record).map_err(csv_err)?;
        }
        writer.flush().map_err(|source| SportschauError::Io {
            path: path.clone(),
            source,
        })?;

        debug!(path = %path.display(), count = records.len(), "stored season");
        Ok(())
    }

    fn read_season(
        &self,
        competition: Competition,
        season: Season,
    ) -> Result<Option<Vec<PlayerSeasonRecord>>> {
        let path = self.season_path(competition, season);
        if !path.is_file() {
            return Ok(None);
        }

        let mut reader = csv::Reader::from_path(&path).map_err(|source| SportschauError::Csv {
            path: path.clone(),
            source,
        })?;
        let records = reader
            .deserialize()
            .collect::<std::result::Result<Vec<PlayerSeasonRecord>, _>>()
            .map_err(|source| SportschauError::Csv {
                path: path.clone(),
                source,
            })?;

        debug!(path = %path.display(), count = records.len(), "loaded season");
        Ok(Some(records))
    }

    fn exists(&self, competition: Competition, season: Season) -> bool {
        self.season_path(competition, season).is_file()
    }

    fn stored_seasons(&self, competition: Competition) -> Result<Vec<Season>> {
        let entries = match fs::read_dir(&self.data_dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => {
                return Err(SportschauError::Io {
                    path: self.data_dir.clone(),
                    source,
                })
            }
        };

        let prefix = format!("{competition}_");
        let mut seasons = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|source| SportschauError::Io {
                path: self.data_dir.clone(),
                source,
            })?;
            let file_name = entry.file_name();
            let Some(season) = file_name
                .to_str()
                .and_then(|name| name.strip_suffix(".csv"))
                .and_then(|stem| stem.strip_prefix(&prefix))
                .and_then(Season::from_url_segment)
            else {
                continue;
            };
            seasons.push(season);
        }
        seasons.sort();
        Ok(seasons)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str, season: Season) -> PlayerSeasonRecord {
        let mut record = PlayerSeasonRecord::new(name, "SC Freiburg", season);
        record.games = Some(34);
        record.km_per_game = Some(11.87);
        record
    }

    #[test]
    fn test_round_trip_preserves_missing_values() {
        let dir = tempfile::tempdir().unwrap();
        let store = CsvStore::new(dir.path().join("nested"));

        let mut with_gaps = record("Christian Günter", Season::S2021);
        with_gaps.topspeed_kmh = None;
        with_gaps.duels_won_pct = Some(48.9);
        let records = vec![with_gaps, record("Vincenzo Grifo", Season::S2021)];

        store
            .write_season(Competition::Ger1, Season::S2021, &records)
            .unwrap();

        assert!(store.exists(Competition::Ger1, Season::S2021));
        assert!(dir.path().join("nested/GER1_2021-2022.csv").is_file());
        let loaded = store
            .read_season(Competition::Ger1, Season::S2021)
            .unwrap()
            .unwrap();
        assert_eq!(loaded, records);
    }

    #[test]
    fn test_overwrite_replaces_rows() {
        let dir = tempfile::tempdir().unwrap();
        let store = CsvStore::new(dir.path());

        let first = vec![record("A", Season::S2019), record("B", Season::S2019)];
        let second = vec![record("C", Season::S2019)];
        store.write_season(Competition::Ger2, Season::S2019, &first).unwrap();
        store.write_season(Competition::Ger2, Season::S2019, &second).unwrap();

        let loaded = store
            .read_season(Competition::Ger2, Season::S2019)
            .unwrap()
            .unwrap();
        assert_eq!(loaded, second);
    }

    #[test]
    fn test_stored_seasons_filters_by_competition() {
        let dir = tempfile::tempdir().unwrap();
        let store = CsvStore::new(dir.path());

        store
            .write_season(Competition::Ger1, Season::S2022, &[record("A", Season::S2022)])
            .unwrap();
        store
            .write_season(Competition::Ger1, Season::S2016, &[record("B", Season::S2016)])
            .unwrap();
        store
            .write_season(Competition::Ger2, Season::S2020, &[record("C", Season::S2020)])
            .unwrap();
        fs::write(dir.path().join("notes.txt"), "x").unwrap();
        fs::write(dir.path().join("GER1_2010-2011.csv"), "x").unwrap();

        assert_eq!(
            store.stored_seasons(Competition::Ger1).unwrap(),
            vec![Season::S2016, Season::S2022]
        );
        assert_eq!(
            store.stored_seasons(Competition::Ger2).unwrap(),
            vec![Season::S2020]
        );
    }

    #[test]
    fn test_missing_dir_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = CsvStore::new(dir.path().join("never-created"));

        assert!(store.stored_seasons(Competition::Ger1).unwrap().is_empty());
        assert!(store
            .read_season(Competition::Ger1, Season::S2021)
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_corrupt_file_is_storage_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = CsvStore::new(dir.path());
        fs::write(
            store.season_path(Competition::Ger1, Season::S2021),
            "player_name,team_name,games\nA,B,not-a-number\n",
        )
        .unwrap();

        let err = store
            .read_season(Competition::Ger1, Season::S2021)
            .unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::Storage);
    }
}
