//! Scrape physical player statistics (duels, top speed, distance, sprints)
//! of the Bundesliga and 2. Bundesliga from sportschau.de and keep them in a
//! local store.
//!
//! Start with [`SportschauClient`].

pub use client::SportschauClient;
pub use config::{default_data_dir, SportschauConfig};
pub use error::{ErrorKind, Result, SportschauError};
pub use model::*;
pub use crate::scraper::{HttpTransport, Transport};
pub use store::{CsvStore, TableStore};

mod client;
mod config;
mod error;
mod model;
mod scraper;
mod store;
