use std::env;

use sportschau_scraper::{SportschauClient, SportschauConfig};

#[tokio::main]
async fn main() -> sportschau_scraper::Result<()> {
    tracing_subscriber::fmt::init();

    let mut args = env::args().skip(1);
    let competition = args.next().unwrap_or_else(|| "GER1".to_owned());
    let seasons: Vec<String> = args.collect();

    let config = SportschauConfig::default().with_competition_id(&competition)?;
    println!("Storing data in {}", config.data_dir.display());
    let client = SportschauClient::with_config(config)?;

    let seasons: Vec<&str> = seasons.iter().map(String::as_str).collect();
    let report = client
        .read_seasons((!seasons.is_empty()).then_some(seasons.as_slice()))
        .await?;

    for season in report.table.seasons() {
        let records = report.table.season(season).unwrap_or_default();
        println!("{competition} {season}: {} players", records.len());
        if let Some(fastest) = records
            .iter()
            .filter(|r| r.topspeed_kmh.is_some())
            .max_by(|a, b| a.topspeed_kmh.partial_cmp(&b.topspeed_kmh).unwrap_or(std::cmp::Ordering::Equal))
        {
            println!(
                "  fastest: {} ({}) {:.2} km/h",
                fastest.player_name,
                fastest.team_name,
                fastest.topspeed_kmh.unwrap_or_default()
            );
        }
    }
    for failure in &report.failures {
        println!("{competition} {}: failed: {}", failure.season, failure.error);
    }

    let stored = client.load_data(true)?;
    for (competition, table) in &stored {
        println!("stored {competition}: {} rows over {} seasons", table.len(), table.seasons().count());
    }
    Ok(())
}
