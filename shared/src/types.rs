//! Common types used across the platform

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// Date range for queries (inclusive on both ends)
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct DateRange {
    pub start: chrono::NaiveDate,
    pub end: chrono::NaiveDate,
}

impl DateRange {
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }
}

/// Sort direction for table columns
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn flipped(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }
}

/// Granularity of a TTB reporting period within a year
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PeriodKind {
    #[default]
    Annual,
    /// Quarter 1-4
    Quarterly(u8),
    /// Month 1-12
    Monthly(u8),
}

impl PeriodKind {
    /// Query-string token, e.g. `q2` or `m07`. Annual has no token.
    pub fn token(&self) -> Option<String> {
        match self {
            PeriodKind::Annual => None,
            PeriodKind::Quarterly(q) => Some(format!("q{}", q)),
            PeriodKind::Monthly(m) => Some(format!("m{:02}", m)),
        }
    }

    pub fn parse_token(token: &str) -> Result<Self, &'static str> {
        let token = token.trim().to_ascii_lowercase();
        if token.is_empty() || token == "annual" {
            return Ok(PeriodKind::Annual);
        }
        if !token.is_ascii() {
            return Err("Unknown period kind");
        }
        let (prefix, number) = token.split_at(1);
        let n: u8 = number.parse().map_err(|_| "Invalid period number")?;
        match prefix {
            "q" if (1..=4).contains(&n) => Ok(PeriodKind::Quarterly(n)),
            "m" if (1..=12).contains(&n) => Ok(PeriodKind::Monthly(n)),
            "q" | "m" => Err("Period number out of range"),
            _ => Err("Unknown period kind"),
        }
    }
}

impl Serialize for PeriodKind {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.token().unwrap_or_else(|| "annual".to_string()))
    }
}

impl<'de> Deserialize<'de> for PeriodKind {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        PeriodKind::parse_token(&raw).map_err(serde::de::Error::custom)
    }
}

/// A TTB reporting period: a year and an optional sub-period
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct ReportingPeriod {
    pub year: i32,
    #[serde(default)]
    pub period: PeriodKind,
}

impl ReportingPeriod {
    pub fn annual(year: i32) -> Self {
        Self {
            year,
            period: PeriodKind::Annual,
        }
    }

    /// First and last calendar day covered by this period
    pub fn date_range(&self) -> Option<DateRange> {
        let (start_month, end_month) = match self.period {
            PeriodKind::Annual => (1, 12),
            PeriodKind::Quarterly(q) => {
                let first = u32::from(q.saturating_sub(1)) * 3 + 1;
                (first, first + 2)
            }
            PeriodKind::Monthly(m) => (u32::from(m), u32::from(m)),
        };
        let start = NaiveDate::from_ymd_opt(self.year, start_month, 1)?;
        let end = last_day_of_month(self.year, end_month)?;
        Some(DateRange { start, end })
    }

    /// Encode into a URL query string. The default annual period is omitted
    /// so bookmarked URLs stay short.
    pub fn to_query_string(&self) -> String {
        match self.period.token() {
            Some(token) => format!("year={}&period={}", self.year, token),
            None => format!("year={}", self.year),
        }
    }

    /// Parse from a URL query string, falling back to `default_year` when
    /// `year` is absent.
    pub fn from_query_string(query: &str, default_year: i32) -> Result<Self, &'static str> {
        let mut year = default_year;
        let mut period = PeriodKind::Annual;
        for pair in query.trim_start_matches('?').split('&').filter(|p| !p.is_empty()) {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            match key {
                "year" => year = value.parse().map_err(|_| "Invalid year")?,
                "period" => period = PeriodKind::parse_token(value)?,
                _ => {}
            }
        }
        Ok(Self { year, period })
    }
}

impl std::fmt::Display for ReportingPeriod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.period {
            PeriodKind::Annual => write!(f, "{}", self.year),
            PeriodKind::Quarterly(q) => write!(f, "{} Q{}", self.year, q),
            PeriodKind::Monthly(m) => write!(f, "{}-{:02}", self.year, m),
        }
    }
}

fn last_day_of_month(year: i32, month: u32) -> Option<NaiveDate> {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)?.pred_opt()
}

/// Year of the current period when nothing is in the URL
pub fn default_reporting_year(today: NaiveDate) -> i32 {
    today.year()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_annual_query_omits_period() {
        assert_eq!(ReportingPeriod::annual(2024).to_query_string(), "year=2024");
    }

    #[test]
    fn test_query_round_trip() {
        let period = ReportingPeriod {
            year: 2025,
            period: PeriodKind::Quarterly(3),
        };
        let query = period.to_query_string();
        assert_eq!(query, "year=2025&period=q3");
        assert_eq!(ReportingPeriod::from_query_string(&query, 2000).unwrap(), period);

        let monthly = ReportingPeriod {
            year: 2025,
            period: PeriodKind::Monthly(7),
        };
        assert_eq!(
            ReportingPeriod::from_query_string(&monthly.to_query_string(), 2000).unwrap(),
            monthly
        );
    }

    #[test]
    fn test_query_defaults() {
        let parsed = ReportingPeriod::from_query_string("", 2023).unwrap();
        assert_eq!(parsed, ReportingPeriod::annual(2023));
        assert!(ReportingPeriod::from_query_string("year=abc", 2023).is_err());
        assert!(ReportingPeriod::from_query_string("year=2024&period=q5", 2023).is_err());
    }

    #[test]
    fn test_date_ranges() {
        let q1 = ReportingPeriod {
            year: 2024,
            period: PeriodKind::Quarterly(1),
        };
        let range = q1.date_range().unwrap();
        assert_eq!(range.start, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        assert_eq!(range.end, NaiveDate::from_ymd_opt(2024, 3, 31).unwrap());

        let feb = ReportingPeriod {
            year: 2024,
            period: PeriodKind::Monthly(2),
        };
        assert_eq!(
            feb.date_range().unwrap().end,
            NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()
        );

        let year = ReportingPeriod::annual(2023).date_range().unwrap();
        assert_eq!(year.end, NaiveDate::from_ymd_opt(2023, 12, 31).unwrap());
    }

    #[test]
    fn test_sort_direction_flip() {
        assert_eq!(SortDirection::Asc.flipped(), SortDirection::Desc);
        assert_eq!(SortDirection::Desc.flipped(), SortDirection::Asc);
    }
}
