use std::fmt;

use serde::{Deserialize, Serialize};

/// `day`/`time` value for courses with no fixed weekday or period.
pub const UNSCHEDULED: i32 = -1;
/// `day`/`time` value of the trailing "no courses" record.
pub const SENTINEL: i32 = -2;
/// Display name carried by the sentinel record.
pub const NO_COURSES_LABEL: &str = "授業は存在しません";
/// Term code the LMS uses for the first half of the academic year.
pub const FIRST_TERM_CODE: &str = "10";

/// One course cell of the weekly timetable.
///
/// Serialised with the field names the LMS page data has always used, so
/// `period` travels as `time`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleEntry {
    /// 1 (Monday) ..= 6 (Saturday), or [`UNSCHEDULED`].
    pub day: i32,
    #[serde(rename = "time")]
    pub period: i32,
    pub id: String,
    /// Raw inner markup of the course button.
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub classroom: Option<String>,
    #[serde(default)]
    pub teacher: Vec<String>,
}

impl ScheduleEntry {
    pub fn is_scheduled(&self) -> bool {
        self.day > 0 && self.period > 0
    }
}

/// The "no courses" marker the timetable grid renders when a slot is empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentinelRecord {
    pub day: i32,
    pub time: i32,
    pub name: String,
}

impl Default for SentinelRecord {
    fn default() -> Self {
        Self {
            day: SENTINEL,
            time: SENTINEL,
            name: NO_COURSES_LABEL.to_string(),
        }
    }
}

/// Academic year and half-year the timetable was scraped for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Term {
    /// `None` when the year dropdown was missing or held a non-number.
    #[serde(rename = "termYear")]
    pub year: Option<i32>,
    /// 1 for the first half, 2 for the second.
    #[serde(rename = "termPhase")]
    pub phase: u8,
}

impl Term {
    /// Build a term from the raw `nendo` and `kikanCd` dropdown values.
    pub fn from_codes(year: Option<&str>, term_code: Option<&str>) -> Self {
        Self {
            year: year.and_then(|y| y.trim().parse().ok()),
            phase: if term_code == Some(FIRST_TERM_CODE) { 1 } else { 2 },
        }
    }
}

/// One element of the persisted timetable sequence.
///
/// Variant order matters for untagged decoding: a term carries `termPhase`,
/// an entry carries `id`, and the sentinel has neither.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TimetableRecord {
    Term(Term),
    Entry(ScheduleEntry),
    Sentinel(SentinelRecord),
}

/// A scraped timetable.
///
/// On the wire this is the flat sequence `[entries.., sentinel, term]`, where
/// the last element is metadata rather than a course. An empty timetable is
/// `[]`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<TimetableRecord>", into = "Vec<TimetableRecord>")]
pub struct Timetable {
    pub courses: Vec<ScheduleEntry>,
    pub term: Option<Term>,
}

impl Timetable {
    pub fn is_empty(&self) -> bool {
        self.courses.is_empty() && self.term.is_none()
    }

    /// Courses with both a weekday and a period, in scrape order.
    pub fn scheduled(&self) -> impl Iterator<Item = &ScheduleEntry> {
        self.courses.iter().filter(|c| c.is_scheduled())
    }

    /// Courses without a fixed slot (irregular or intensive classes).
    pub fn unscheduled(&self) -> impl Iterator<Item = &ScheduleEntry> {
        self.courses.iter().filter(|c| !c.is_scheduled())
    }

    pub fn records(&self) -> Vec<TimetableRecord> {
        self.clone().into()
    }
}

impl From<Timetable> for Vec<TimetableRecord> {
    fn from(table: Timetable) -> Self {
        if table.is_empty() {
            return Vec::new();
        }
        let mut records: Vec<TimetableRecord> = table
            .courses
            .into_iter()
            .map(TimetableRecord::Entry)
            .collect();
        records.push(TimetableRecord::Sentinel(SentinelRecord::default()));
        if let Some(term) = table.term {
            records.push(TimetableRecord::Term(term));
        }
        records
    }
}

impl From<Vec<TimetableRecord>> for Timetable {
    fn from(records: Vec<TimetableRecord>) -> Self {
        let mut table = Timetable::default();
        for record in records {
            match record {
                TimetableRecord::Entry(entry) => table.courses.push(entry),
                TimetableRecord::Term(term) => table.term = Some(term),
                TimetableRecord::Sentinel(_) => {}
            }
        }
        table
    }
}

/// An assignment, survey or user-added item with a deadline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub title: String,
    pub course: String,
    #[serde(default)]
    pub link: String,
    /// ISO-8601 datetime as delivered by the LMS.
    pub deadline: String,
}

/// A course the user asked to be notified about; `url` links the course page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subject {
    pub name: String,
    #[serde(default)]
    pub url: String,
}

/// How deadlines are shown in the task list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DeadlineMode {
    #[default]
    Relative,
    Absolute,
}

impl DeadlineMode {
    pub fn toggled(self) -> Self {
        match self {
            DeadlineMode::Relative => DeadlineMode::Absolute,
            DeadlineMode::Absolute => DeadlineMode::Relative,
        }
    }

    pub fn is_relative(self) -> bool {
        matches!(self, DeadlineMode::Relative)
    }
}

impl fmt::Display for DeadlineMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeadlineMode::Relative => write!(f, "relative"),
            DeadlineMode::Absolute => write!(f, "absolute"),
        }
    }
}

impl std::str::FromStr for DeadlineMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "relative" => Ok(DeadlineMode::Relative),
            "absolute" => Ok(DeadlineMode::Absolute),
            other => Err(format!("unknown deadline mode: {}", other)),
        }
    }
}

/// Saved single-sign-on credentials.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginData {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}
