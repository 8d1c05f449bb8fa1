use std::collections::BTreeMap;

use ::scraper::Selector;
use tracing::{debug, instrument, warn};

use crate::error::{Result, SportschauError};
use crate::model::{Competition, Season};
use crate::scraper::stats::StatPage;
use crate::scraper::{self, cell_text, Transport};

/// Maps each season to the `{id}/{YYYY-YYYY}` path segment the site uses for
/// it. The id part is assigned by the site and cannot be derived.
pub(crate) type SeasonIndex = BTreeMap<Season, String>;

/// Landing page of a competition; its season dropdown lists every season.
pub(crate) fn landing_url(base_url: &str, competition: Competition) -> String {
    format!("{base_url}{}/{}", competition.slug(), StatPage::Topspeed.path())
}

#[instrument(skip(transport, base_url), fields(competition = %competition))]
pub(crate) async fn get_season_index<T: Transport>(
    transport: &T,
    base_url: &str,
    competition: Competition,
) -> Result<SeasonIndex> {
    let url = landing_url(base_url, competition);
    let document = scraper::get_document(transport, &url).await?;
    let index = parse_season_index(&document, &url)?;
    debug!(count = index.len(), "parsed season index");
    Ok(index)
}

fn parse_season_index(document: &scraper::Html, url: &str) -> Result<SeasonIndex> {
    let select_selector = Selector::parse("select.season-navigation")?;
    let option_selector = Selector::parse("option")?;

    let select = document
        .select(&select_selector)
        .next()
        .ok_or_else(|| SportschauError::ElementNotFound {
            context: "season navigation",
            url: url.to_owned(),
        })?;

    let mut index = SeasonIndex::new();
    for option in select.select(&option_selector) {
        let label = cell_text(&option);
        let Ok(season) = label.parse::<Season>() else {
            debug!(%label, "ignoring unsupported season");
            continue;
        };
        let value = option.value().attr("value").unwrap_or_default();
        match season_link(value, season) {
            Some(link) => {
                index.insert(season, link);
            }
            None => warn!(%season, value, "season option without usable link"),
        }
    }
    Ok(index)
}

/// Pick `{id}/{YYYY-YYYY}` out of an option value such as
/// `/live-und-ergebnisse/fussball/deutschland-bundesliga/se35753/2021-2022/statistik-laufleistung-topspeed/`.
fn season_link(value: &str, season: Season) -> Option<String> {
    let segments: Vec<&str> = value.split('/').filter(|s| !s.is_empty()).collect();
    let year_segment = season.url_segment();
    let pos = segments.iter().position(|s| *s == year_segment)?;
    let id = segments.get(pos.checked_sub(1)?)?;
    Some(format!("{id}/{year_segment}"))
}
