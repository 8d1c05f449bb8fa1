use std::collections::HashMap;
use std::time::Duration;

use ::scraper::{ElementRef, Selector};
use itertools::Itertools;
use strum::IntoEnumIterator;
use tracing::{debug, instrument};

use crate::error::{Result, SportschauError};
use crate::model::{Competition, PlayerSeasonRecord, Season};
use crate::scraper::{self, cell_text, parse_count, parse_decimal, pause, Transport};

/// The statistics pages merged into one season's records, in fetch order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display, strum_macros::EnumIter)]
#[strum(serialize_all = "lowercase")]
pub(crate) enum StatPage {
    Zweikaempfe,
    Topspeed,
    Laufleistung,
    Sprints,
}

impl StatPage {
    pub(crate) fn path(self) -> &'static str {
        match self {
            StatPage::Zweikaempfe => "statistik-zweikaempfe",
            StatPage::Topspeed => "statistik-laufleistung-topspeed",
            StatPage::Laufleistung => "statistik-laufleistung",
            StatPage::Sprints => "statistik-laufleistung-sprints",
        }
    }

    pub(crate) fn url(self, base_url: &str, competition: Competition, season_link: &str) -> String {
        format!(
            "{base_url}{}/{season_link}/{}/",
            competition.slug(),
            self.path()
        )
    }
}

/// A record field, identified by the header label the site prints above it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Column {
    PlayerName,
    TeamName,
    Games,
    DuelsWon,
    DuelsLost,
    Duels,
    DuelsWonPct,
    TopspeedKmh,
    Km,
    KmPerGame,
    Sprints,
}

impl Column {
    /// This is the only place that knows the site's column labels.
    fn from_header(label: &str) -> Option<Column> {
        let column = match label {
            "Name" => Column::PlayerName,
            "Mannschaft" => Column::TeamName,
            "Spiele" => Column::Games,
            "Gew." => Column::DuelsWon,
            "Verl." => Column::DuelsLost,
            "Summe" => Column::Duels,
            "Quote %" | "Quote" => Column::DuelsWonPct,
            "Max. km/h" => Column::TopspeedKmh,
            "km" => Column::Km,
            "km/Spiel" => Column::KmPerGame,
            "Sprints" => Column::Sprints,
            _ => return None,
        };
        Some(column)
    }
}

/// Scrape all statistics pages of one season and merge them per player.
#[instrument(skip(transport, base_url, season_link, delay), fields(competition = %competition, season = %season))]
pub(crate) async fn get_season_records<T: Transport>(
    transport: &T,
    base_url: &str,
    competition: Competition,
    season: Season,
    season_link: &str,
    delay: Duration,
) -> Result<Vec<PlayerSeasonRecord>> {
    let mut pages = Vec::new();
    for (i, page) in StatPage::iter().enumerate() {
        if i > 0 {
            pause(delay).await;
        }
        let url = page.url(base_url, competition, season_link);
        let document = scraper::get_document(transport, &url).await?;
        let rows = parse_stat_table(&document, &url, season)?;
        debug!(%page, count = rows.len(), "parsed statistics table");
        pages.push(rows);
    }

    let records = merge_pages(pages);
    if records.is_empty() {
        return Err(SportschauError::ElementNotFound {
            context: "statistics rows",
            url: StatPage::Zweikaempfe.url(base_url, competition, season_link),
        });
    }
    debug!(count = records.len(), "merged season records");
    Ok(records)
}

/// Extract the statistics table of a page into records keyed by header label.
///
/// Rows without a player or team name are skipped, but a table whose rows are
/// all skipped is an error. Any other cell that is missing or unparsable
/// leaves its field empty.
pub(crate) fn parse_stat_table(
    document: &scraper::Html,
    url: &str,
    season: Season,
) -> Result<Vec<PlayerSeasonRecord>> {
    let table_selector = Selector::parse("table")?;
    let row_selector = Selector::parse("tr")?;

    let (header, rows) = document
        .select(&table_selector)
        .find_map(|table| {
            let rows = table.select(&row_selector).collect_vec();
            let header_pos = rows.iter().position(is_header_row)?;
            let header = row_cells(&rows[header_pos])
                .iter()
                .map(|cell| Column::from_header(&cell_text(cell)))
                .collect_vec();
            Some((header, rows[header_pos + 1..].to_vec()))
        })
        .ok_or_else(|| SportschauError::ElementNotFound {
            context: "statistics table",
            url: url.to_owned(),
        })?;

    if !header.contains(&Some(Column::PlayerName)) || !header.contains(&Some(Column::TeamName)) {
        return Err(SportschauError::ElementNotFound {
            context: "player and team columns",
            url: url.to_owned(),
        });
    }

    let records: Vec<PlayerSeasonRecord> = rows
        .iter()
        .filter_map(|row| {
            let cells: HashMap<Column, String> = header
                .iter()
                .zip(row_cells(row))
                .filter_map(|(column, cell)| column.map(|c| (c, cell_text(&cell))))
                .collect();
            let record = parse_row(&cells, season);
            if record.is_none() {
                debug!(url, "skipping row without player or team");
            }
            record
        })
        .collect();

    if records.is_empty() && !rows.is_empty() {
        return Err(SportschauError::ElementNotFound {
            context: "statistics rows",
            url: url.to_owned(),
        });
    }
    Ok(records)
}

fn is_header_row(row: &ElementRef) -> bool {
    let cells = row_cells(row);
    !cells.is_empty() && cells.iter().all(|c| c.value().name() == "th")
}

fn row_cells<'a>(row: &ElementRef<'a>) -> Vec<ElementRef<'a>> {
    row.children()
        .filter_map(ElementRef::wrap)
        .filter(|c| matches!(c.value().name(), "td" | "th"))
        .collect()
}

fn parse_row(cells: &HashMap<Column, String>, season: Season) -> Option<PlayerSeasonRecord> {
    let text = |column: Column| cells.get(&column).map(String::as_str).filter(|t| !t.is_empty());
    let count = |column: Column| text(column).and_then(parse_count);
    let decimal = |column: Column| text(column).and_then(parse_decimal);

    let mut record = PlayerSeasonRecord::new(
        text(Column::PlayerName)?,
        text(Column::TeamName)?,
        season,
    );
    record.games = count(Column::Games);
    record.duels_won = count(Column::DuelsWon);
    record.duels_lost = count(Column::DuelsLost);
    record.duels = count(Column::Duels);
    record.duels_won_pct = decimal(Column::DuelsWonPct);
    record.topspeed_kmh = decimal(Column::TopspeedKmh);
    record.km = decimal(Column::Km);
    record.km_per_game = decimal(Column::KmPerGame);
    record.sprints = count(Column::Sprints);
    Some(record)
}

/// Merge the per-page records on (player, team), keeping first-seen order.
pub(crate) fn merge_pages(pages: Vec<Vec<PlayerSeasonRecord>>) -> Vec<PlayerSeasonRecord> {
    let mut merged: Vec<PlayerSeasonRecord> = Vec::new();
    let mut positions: HashMap<(String, String), usize> = HashMap::new();

    for record in pages.into_iter().flatten() {
        let key = (record.player_name.clone(), record.team_name.clone());
        match positions.get(&key) {
            Some(&pos) => merged[pos].fill_from(record),
            None => {
                positions.insert(key, merged.len());
                merged.push(record);
            }
        }
    }
    merged
}
