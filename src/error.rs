use std::path::PathBuf;

use ::scraper::error::SelectorErrorKind;

use crate::model::{Competition, Season};

/// All errors that can occur while scraping or storing statistics.
#[derive(thiserror::Error, Debug)]
pub enum SportschauError {
    /// The competition id is not one of the supported competitions.
    #[error("unknown competition {0:?}, expected one of GER1, GER2")]
    InvalidCompetition(String),

    /// The season string is not one of the known seasons.
    #[error("unknown season {0:?}, expected one of 2016/2017 ... 2022/2023")]
    InvalidSeason(String),

    /// The HTTP client could not be constructed.
    #[error("failed to build http client: {0}")]
    ClientBuild(#[source] reqwest::Error),

    /// HTTP request failed (network, DNS, TLS, timeout, etc.).
    #[error("http request failed for {url}: {source}")]
    Http {
        url: String,
        source: reqwest::Error,
    },

    /// Server returned a non-success HTTP status code.
    #[error("unexpected status {status} for {url}")]
    UnexpectedStatus {
        url: String,
        status: reqwest::StatusCode,
    },

    /// Failed to read the response body as text.
    #[error("failed to read response body from {url}: {source}")]
    ResponseBody {
        url: String,
        source: reqwest::Error,
    },

    /// A CSS selector string could not be parsed.
    #[error("invalid CSS selector: {0}")]
    Selector(String),

    /// An expected HTML element was not found on the page.
    #[error("expected element not found: {context} ({url})")]
    ElementNotFound { context: &'static str, url: String },

    /// The site's season navigation does not list this season.
    #[error("season {season} is not listed for {competition}")]
    SeasonNotListed {
        competition: Competition,
        season: Season,
    },

    /// Reading or writing the data directory failed.
    #[error("storage i/o failed for {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// A stored table could not be encoded or decoded.
    #[error("stored table {path} is unreadable: {source}")]
    Csv { path: PathBuf, source: csv::Error },
}

/// Coarse classification of [`SportschauError`].
///
/// `Parse` means the page was fetched but did not look as expected, which
/// usually means the site layout changed. `Network` means the page was never
/// received.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidArgument,
    Network,
    Parse,
    Storage,
}

impl SportschauError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidCompetition(_) | Self::InvalidSeason(_) => ErrorKind::InvalidArgument,
            Self::ClientBuild(_)
            | Self::Http { .. }
            | Self::UnexpectedStatus { .. }
            | Self::ResponseBody { .. } => ErrorKind::Network,
            Self::Selector(_) | Self::ElementNotFound { .. } | Self::SeasonNotListed { .. } => {
                ErrorKind::Parse
            }
            Self::Io { .. } | Self::Csv { .. } => ErrorKind::Storage,
        }
    }
}

impl<'a> From<SelectorErrorKind<'a>> for SportschauError {
    fn from(err: SelectorErrorKind<'a>) -> Self {
        SportschauError::Selector(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, SportschauError>;
