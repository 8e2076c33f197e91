use chrono::{DateTime, Utc};
use serde::Serialize;

/// How pressing a deadline is, used to highlight task rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Urgency {
    /// Under 6 hours left.
    Critical,
    /// Under 12 hours.
    High,
    /// Under a day.
    Elevated,
    /// Under 3 days.
    Soon,
    /// Under a week.
    Normal,
    /// A week or more.
    Distant,
}

impl Urgency {
    pub fn classify(deadline: DateTime<Utc>, now: DateTime<Utc>) -> Self {
        let hours = (deadline - now).num_hours();
        match hours {
            h if h < 6 => Urgency::Critical,
            h if h < 12 => Urgency::High,
            h if h < 24 => Urgency::Elevated,
            h if h < 72 => Urgency::Soon,
            h if h < 24 * 7 => Urgency::Normal,
            _ => Urgency::Distant,
        }
    }

    /// Bold rendering for anything due within a day.
    pub fn is_emphasised(self) -> bool {
        self <= Urgency::Elevated
    }
}

impl std::fmt::Display for Urgency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Urgency::Critical => "critical",
            Urgency::High => "high",
            Urgency::Elevated => "elevated",
            Urgency::Soon => "soon",
            Urgency::Normal => "normal",
            Urgency::Distant => "distant",
        };
        write!(f, "{s}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    #[test]
    fn bands_follow_hour_thresholds() {
        let now = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let at = |h: i64| Urgency::classify(now + Duration::hours(h), now);
        assert_eq!(at(0), Urgency::Critical);
        assert_eq!(at(5), Urgency::Critical);
        assert_eq!(at(6), Urgency::High);
        assert_eq!(at(23), Urgency::Elevated);
        assert_eq!(at(24), Urgency::Soon);
        assert_eq!(at(71), Urgency::Soon);
        assert_eq!(at(100), Urgency::Normal);
        assert_eq!(at(168), Urgency::Distant);
    }

    #[test]
    fn emphasis_stops_after_a_day() {
        assert!(Urgency::Critical.is_emphasised());
        assert!(Urgency::Elevated.is_emphasised());
        assert!(!Urgency::Soon.is_emphasised());
    }
}
