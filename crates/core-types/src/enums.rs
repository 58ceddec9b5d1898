use crate::error::CoreError;
use crate::structs::DateRange;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The calendar step used to split a date range into consecutive periods.
///
/// Tokens follow the usual calendar-offset aliases: `D`, `W` (weeks anchored on
/// Sunday), `M` (month end) and `MS` (month start).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Frequency {
    Daily,
    Weekly,
    #[default]
    MonthEnd,
    MonthStart,
}

impl Frequency {
    pub fn token(&self) -> &'static str {
        match self {
            Frequency::Daily => "D",
            Frequency::Weekly => "W",
            Frequency::MonthEnd => "M",
            Frequency::MonthStart => "MS",
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

impl FromStr for Frequency {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "D" => Ok(Frequency::Daily),
            "W" => Ok(Frequency::Weekly),
            "M" => Ok(Frequency::MonthEnd),
            "MS" => Ok(Frequency::MonthStart),
            other => Err(CoreError::InvalidInput(
                "frequency".to_string(),
                format!("unknown token '{}' (expected one of D, W, M, MS)", other),
            )),
        }
    }
}

impl TryFrom<String> for Frequency {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Frequency> for String {
    fn from(value: Frequency) -> Self {
        value.token().to_string()
    }
}

/// The two regulated sales seasons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Season {
    Winter,
    Summer,
}

impl Season {
    /// Returns the inclusive discount window of this season for `year`.
    ///
    /// Winter sales run from 12 January to 8 February, summer sales from
    /// 22 June to 19 July.
    pub fn discount_period(&self, year: i32) -> Result<DateRange, CoreError> {
        let ((start_month, start_day), (end_month, end_day)) = match self {
            Season::Winter => ((1, 12), (2, 8)),
            Season::Summer => ((6, 22), (7, 19)),
        };
        let date = |month: u32, day: u32| {
            NaiveDate::from_ymd_opt(year, month, day).ok_or_else(|| {
                CoreError::InvalidInput("year".to_string(), format!("{} is out of range", year))
            })
        };
        Ok(DateRange::new(date(start_month, start_day)?, date(end_month, end_day)?))
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Season::Winter => f.write_str("winter"),
            Season::Summer => f.write_str("summer"),
        }
    }
}

impl FromStr for Season {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "winter" => Ok(Season::Winter),
            "summer" => Ok(Season::Summer),
            other => Err(CoreError::InvalidInput(
                "season".to_string(),
                format!("unknown season '{}' (expected winter or summer)", other),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frequency_tokens_parse() {
        assert_eq!("D".parse::<Frequency>().unwrap(), Frequency::Daily);
        assert_eq!("W".parse::<Frequency>().unwrap(), Frequency::Weekly);
        assert_eq!("M".parse::<Frequency>().unwrap(), Frequency::MonthEnd);
        assert_eq!("MS".parse::<Frequency>().unwrap(), Frequency::MonthStart);
        assert!("Q".parse::<Frequency>().is_err());
        assert!("m".parse::<Frequency>().is_err());
    }

    #[test]
    fn frequency_serializes_as_token() {
        let json = serde_json::to_string(&Frequency::MonthStart).unwrap();
        assert_eq!(json, "\"MS\"");
        let back: Frequency = serde_json::from_str("\"W\"").unwrap();
        assert_eq!(back, Frequency::Weekly);
        assert!(serde_json::from_str::<Frequency>("\"Y\"").is_err());
    }

    #[test]
    fn discount_periods_match_regulated_dates() {
        let winter = Season::Winter.discount_period(2022).unwrap();
        assert_eq!(winter.start, NaiveDate::from_ymd_opt(2022, 1, 12).unwrap());
        assert_eq!(winter.end, NaiveDate::from_ymd_opt(2022, 2, 8).unwrap());

        let summer = Season::Summer.discount_period(2023).unwrap();
        assert_eq!(summer.start, NaiveDate::from_ymd_opt(2023, 6, 22).unwrap());
        assert_eq!(summer.end, NaiveDate::from_ymd_opt(2023, 7, 19).unwrap());
    }

    #[test]
    fn season_parses_case_insensitively() {
        assert_eq!("Winter".parse::<Season>().unwrap(), Season::Winter);
        assert_eq!("SUMMER".parse::<Season>().unwrap(), Season::Summer);
        assert!("autumn".parse::<Season>().is_err());
    }
}
