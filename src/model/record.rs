use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::{Competition, Season};
use crate::error::SportschauError;

/// One player's physical statistics for a single season.
///
/// Numeric fields are `None` when the source table lacks the column or the
/// cell could not be parsed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerSeasonRecord {
    pub player_name: String,
    pub team_name: String,
    pub games: Option<u32>,
    pub duels_won: Option<u32>,
    pub duels_lost: Option<u32>,
    pub duels: Option<u32>,
    pub duels_won_pct: Option<f64>,
    pub topspeed_kmh: Option<f64>,
    pub km: Option<f64>,
    pub km_per_game: Option<f64>,
    pub sprints: Option<u32>,
    pub season: Season,
}

impl PlayerSeasonRecord {
    /// A record with only the identifying columns filled in.
    pub fn new(player_name: impl Into<String>, team_name: impl Into<String>, season: Season) -> Self {
        Self {
            player_name: player_name.into(),
            team_name: team_name.into(),
            games: None,
            duels_won: None,
            duels_lost: None,
            duels: None,
            duels_won_pct: None,
            topspeed_kmh: None,
            km: None,
            km_per_game: None,
            sprints: None,
            season,
        }
    }

    /// Fill every missing field of `self` from `other`.
    pub(crate) fn fill_from(&mut self, other: PlayerSeasonRecord) {
        self.games = self.games.or(other.games);
        self.duels_won = self.duels_won.or(other.duels_won);
        self.duels_lost = self.duels_lost.or(other.duels_lost);
        self.duels = self.duels.or(other.duels);
        self.duels_won_pct = self.duels_won_pct.or(other.duels_won_pct);
        self.topspeed_kmh = self.topspeed_kmh.or(other.topspeed_kmh);
        self.km = self.km.or(other.km);
        self.km_per_game = self.km_per_game.or(other.km_per_game);
        self.sprints = self.sprints.or(other.sprints);
    }
}

/// All records of one competition, grouped by season.
#[derive(Debug, Clone, PartialEq)]
pub struct CompetitionTable {
    competition: Competition,
    seasons: BTreeMap<Season, Vec<PlayerSeasonRecord>>,
}

impl CompetitionTable {
    pub fn from_seasons(
        competition: Competition,
        seasons: impl IntoIterator<Item = (Season, Vec<PlayerSeasonRecord>)>,
    ) -> Self {
        Self {
            competition,
            seasons: seasons.into_iter().collect(),
        }
    }

    pub fn competition(&self) -> Competition {
        self.competition
    }

    /// Records of a single season, if it is part of the table.
    pub fn season(&self, season: Season) -> Option<&[PlayerSeasonRecord]> {
        self.seasons.get(&season).map(Vec::as_slice)
    }

    /// Seasons present in the table, oldest first.
    pub fn seasons(&self) -> impl Iterator<Item = Season> + '_ {
        self.seasons.keys().copied()
    }

    /// Every record across all seasons, oldest season first.
    pub fn rows(&self) -> impl Iterator<Item = &PlayerSeasonRecord> {
        self.seasons.values().flatten()
    }

    /// Total number of records.
    pub fn len(&self) -> usize {
        self.seasons.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn into_seasons(self) -> BTreeMap<Season, Vec<PlayerSeasonRecord>> {
        self.seasons
    }
}

/// A season that could not be scraped during a multi-season read.
///
/// When the season index itself could not be read, every requested season
/// shares the same error.
#[derive(Debug)]
pub struct SeasonFailure {
    pub season: Season,
    pub error: Arc<SportschauError>,
}

/// Outcome of reading several seasons: whatever succeeded plus what did not.
#[derive(Debug)]
pub struct ReadReport {
    pub table: CompetitionTable,
    pub failures: Vec<SeasonFailure>,
}

impl ReadReport {
    pub fn failed_seasons(&self) -> Vec<Season> {
        self.failures.iter().map(|f| f.season).collect()
    }

    /// `true` when every requested season was scraped.
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}
