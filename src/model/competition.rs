use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;

use crate::error::SportschauError;

/// A league covered by the sportschau.de statistics pages.
#[derive(
    Debug,
    Default,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    strum_macros::Display,
    strum_macros::IntoStaticStr,
    strum_macros::EnumIter,
)]
pub enum Competition {
    /// Bundesliga.
    #[default]
    #[serde(rename = "GER1")]
    #[strum(serialize = "GER1")]
    Ger1,
    /// 2. Bundesliga.
    #[serde(rename = "GER2")]
    #[strum(serialize = "GER2")]
    Ger2,
}

impl Competition {
    pub fn all() -> Vec<Competition> {
        Competition::iter().collect()
    }

    /// Short competition id, `"GER1"` or `"GER2"`.
    pub fn id(self) -> &'static str {
        self.into()
    }

    /// Path segment used by sportschau.de for this league.
    pub fn slug(self) -> &'static str {
        match self {
            Competition::Ger1 => "deutschland-bundesliga",
            Competition::Ger2 => "deutschland-2-bundesliga",
        }
    }
}

impl FromStr for Competition {
    type Err = SportschauError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let id = s.trim();
        Competition::iter()
            .find(|c| c.id() == id)
            .ok_or_else(|| SportschauError::InvalidCompetition(s.to_owned()))
    }
}

/// A season with statistics available on sportschau.de.
///
/// Variants are named after the calendar year the season starts in and are
/// ordered chronologically.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    strum_macros::Display,
    strum_macros::IntoStaticStr,
    strum_macros::EnumIter,
)]
pub enum Season {
    #[serde(rename = "2016/2017")]
    #[strum(serialize = "2016/2017")]
    S2016,
    #[serde(rename = "2017/2018")]
    #[strum(serialize = "2017/2018")]
    S2017,
    #[serde(rename = "2018/2019")]
    #[strum(serialize = "2018/2019")]
    S2018,
    #[serde(rename = "2019/2020")]
    #[strum(serialize = "2019/2020")]
    S2019,
    #[serde(rename = "2020/2021")]
    #[strum(serialize = "2020/2021")]
    S2020,
    #[serde(rename = "2021/2022")]
    #[strum(serialize = "2021/2022")]
    S2021,
    #[serde(rename = "2022/2023")]
    #[strum(serialize = "2022/2023")]
    S2022,
}

impl Season {
    /// Every known season, oldest first.
    pub fn all() -> Vec<Season> {
        Season::iter().collect()
    }

    /// Label in `YYYY/YYYY` form, as shown on the site.
    pub fn label(self) -> &'static str {
        self.into()
    }

    /// `YYYY-YYYY` form used in site URLs and stored file names.
    pub fn url_segment(self) -> String {
        self.label().replace('/', "-")
    }

    /// Parse the `YYYY-YYYY` form produced by [`Season::url_segment`].
    pub fn from_url_segment(segment: &str) -> Option<Season> {
        Season::iter().find(|s| s.url_segment() == segment)
    }

    /// Parse a list of season labels, failing on the first unknown one.
    pub fn parse_all<S: AsRef<str>>(labels: &[S]) -> crate::Result<Vec<Season>> {
        labels.iter().map(|l| l.as_ref().parse()).collect()
    }
}

impl FromStr for Season {
    type Err = SportschauError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let label = s.trim();
        Season::iter()
            .find(|season| season.label() == label)
            .ok_or_else(|| SportschauError::InvalidSeason(s.to_owned()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_competition_ids() {
        assert_eq!("GER1".parse::<Competition>().unwrap(), Competition::Ger1);
        assert_eq!("GER2".parse::<Competition>().unwrap(), Competition::Ger2);
        assert_eq!(Competition::Ger2.to_string(), "GER2");
        assert_eq!(Competition::default(), Competition::Ger1);
        assert_eq!(Competition::Ger1.slug(), "deutschland-bundesliga");

        let err = "GER3".parse::<Competition>().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    }

    #[test]
    fn test_season_labels() {
        let all = Season::all();
        assert_eq!(all.len(), 7);
        assert_eq!(all.first().unwrap().label(), "2016/2017");
        assert_eq!(all.last().unwrap().label(), "2022/2023");
        assert!(all.windows(2).all(|w| w[0] < w[1]));

        assert_eq!("2021/2022".parse::<Season>().unwrap(), Season::S2021);
        assert_eq!(Season::S2021.url_segment(), "2021-2022");
        assert_eq!(Season::from_url_segment("2019-2020"), Some(Season::S2019));
        assert_eq!(Season::from_url_segment("2019/2020"), None);
    }

    #[test]
    fn test_unknown_season_is_invalid_argument() {
        for bad in ["2015/2016", "2023/2024", "2021-2022", ""] {
            let err = bad.parse::<Season>().unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidArgument, "{bad}");
        }

        let err = Season::parse_all(&["2021/2022", "1999/2000"]).unwrap_err();
        assert!(matches!(err, SportschauError::InvalidSeason(s) if s == "1999/2000"));
    }
}
