use chrono::NaiveDate;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Granularity at which a variable is defined
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum PeriodUnit {
    Month,
    Year,
}

impl fmt::Display for PeriodUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PeriodUnit::Month => write!(f, "month"),
            PeriodUnit::Year => write!(f, "year"),
        }
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum PeriodError {
    #[error("invalid period '{0}', expected YYYY or YYYY-MM")]
    Invalid(String),
    #[error("month out of range in period '{0}'")]
    MonthOutOfRange(String),
}

/// A calendar month or a calendar year.
///
/// Textual form is `YYYY` for years and `YYYY-MM` for months, which is also
/// how periods are keyed in situation files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Period {
    Month { year: i32, month: u32 },
    Year(i32),
}

impl Period {
    pub fn month(year: i32, month: u32) -> Result<Self, PeriodError> {
        if !(1..=12).contains(&month) {
            return Err(PeriodError::MonthOutOfRange(format!("{year:04}-{month:02}")));
        }
        Ok(Period::Month { year, month })
    }

    pub fn year(year: i32) -> Self {
        Period::Year(year)
    }

    pub fn unit(&self) -> PeriodUnit {
        match self {
            Period::Month { .. } => PeriodUnit::Month,
            Period::Year(_) => PeriodUnit::Year,
        }
    }

    /// First month of the period: January for a year, the month itself otherwise
    pub fn first_month(&self) -> Period {
        match *self {
            Period::Month { year, month } => Period::Month { year, month },
            Period::Year(year) => Period::Month { year, month: 1 },
        }
    }

    /// First calendar day, the instant at which parameters are resolved.
    ///
    /// `None` for a hand-built month outside 1..=12 or a year chrono cannot
    /// represent.
    pub fn start(&self) -> Option<NaiveDate> {
        let (year, month) = match *self {
            Period::Month { year, month } => (year, month),
            Period::Year(year) => (year, 1),
        };
        NaiveDate::from_ymd_opt(year, month, 1)
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Period::Month { year, month } => write!(f, "{year:04}-{month:02}"),
            Period::Year(year) => write!(f, "{year:04}"),
        }
    }
}

impl FromStr for Period {
    type Err = PeriodError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || PeriodError::Invalid(s.to_string());
        let s = s.trim();
        match s.split_once('-') {
            None => {
                if s.len() != 4 {
                    return Err(invalid());
                }
                s.parse::<i32>().map(Period::Year).map_err(|_| invalid())
            }
            Some((year, month)) => {
                if year.len() != 4 || month.len() != 2 {
                    return Err(invalid());
                }
                let year = year.parse::<i32>().map_err(|_| invalid())?;
                let month = month.parse::<u32>().map_err(|_| invalid())?;
                Period::month(year, month).map_err(|_| PeriodError::MonthOutOfRange(s.to_string()))
            }
        }
    }
}

impl TryFrom<String> for Period {
    type Error = PeriodError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Period> for String {
    fn from(period: Period) -> String {
        period.to_string()
    }
}

impl JsonSchema for Period {
    fn schema_name() -> String {
        "Period".to_string()
    }

    fn json_schema(gen: &mut schemars::gen::SchemaGenerator) -> schemars::schema::Schema {
        String::json_schema(gen)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_year() {
        assert_eq!("2024".parse::<Period>(), Ok(Period::Year(2024)));
    }

    #[test]
    fn parse_month() {
        assert_eq!(
            "2024-03".parse::<Period>(),
            Ok(Period::Month { year: 2024, month: 3 })
        );
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!("24".parse::<Period>().is_err());
        assert!("2024-3".parse::<Period>().is_err());
        assert!("2024-03-01".parse::<Period>().is_err());
        assert!("abcd".parse::<Period>().is_err());
        assert_eq!(
            "2024-13".parse::<Period>(),
            Err(PeriodError::MonthOutOfRange("2024-13".to_string()))
        );
    }

    #[test]
    fn display_round_trips_text() {
        assert_eq!(Period::Year(2024).to_string(), "2024");
        assert_eq!(Period::month(2024, 1).unwrap().to_string(), "2024-01");
    }

    #[test]
    fn first_month_of_year_is_january() {
        assert_eq!(Period::Year(2024).first_month(), Period::month(2024, 1).unwrap());
        let june = Period::month(2024, 6).unwrap();
        assert_eq!(june.first_month(), june);
    }

    #[test]
    fn start_dates() {
        assert_eq!(
            Period::Year(2024).start(),
            NaiveDate::from_ymd_opt(2024, 1, 1)
        );
        assert_eq!(
            Period::month(2024, 7).unwrap().start(),
            NaiveDate::from_ymd_opt(2024, 7, 1)
        );
    }

    #[test]
    fn no_start_date_outside_calendar() {
        assert_eq!(Period::Month { year: 2024, month: 13 }.start(), None);
        assert_eq!(Period::Month { year: 2024, month: 0 }.start(), None);
        assert_eq!(Period::Year(i32::MAX).start(), None);
    }

    #[test]
    fn units() {
        assert_eq!(Period::Year(2024).unit(), PeriodUnit::Year);
        assert_eq!(Period::month(2024, 2).unwrap().unit(), PeriodUnit::Month);
    }
}
