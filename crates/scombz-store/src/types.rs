use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use scombz_core::config::{DEFAULT_DEADLINE_FORMAT, DEFAULT_ROWS_PER_PAGE};
use scombz_core::types::{DeadlineMode, LoginData, Subject, Task, Timetable};

/// Section names of the browser storage blob.
pub const SETTINGS_SECTION: &str = "settings";
pub const DATA_SECTION: &str = "scombzData";

/// Every persisted field. Each one is stored and updated independently so
/// a writer touching one field never clobbers another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    LoginData,
    NotifySurveySubjects,
    HiddenTaskIdList,
    DeadlineMode,
    DeadlineFormat,
    HighlightTask,
    TaskListRowsPerPage,
    Tasklist,
    SurveyList,
    OriginalTasklist,
    Timetable,
    LastTaskFetchUnixTime,
}

impl Field {
    pub const ALL: [Field; 12] = [
        Field::LoginData,
        Field::NotifySurveySubjects,
        Field::HiddenTaskIdList,
        Field::DeadlineMode,
        Field::DeadlineFormat,
        Field::HighlightTask,
        Field::TaskListRowsPerPage,
        Field::Tasklist,
        Field::SurveyList,
        Field::OriginalTasklist,
        Field::Timetable,
        Field::LastTaskFetchUnixTime,
    ];

    /// Which blob section the field lives in.
    pub fn section(self) -> &'static str {
        match self {
            Field::LoginData
            | Field::NotifySurveySubjects
            | Field::HiddenTaskIdList
            | Field::DeadlineMode
            | Field::DeadlineFormat
            | Field::HighlightTask
            | Field::TaskListRowsPerPage => SETTINGS_SECTION,
            Field::Tasklist
            | Field::SurveyList
            | Field::OriginalTasklist
            | Field::Timetable
            | Field::LastTaskFetchUnixTime => DATA_SECTION,
        }
    }

    /// Field name inside its section, as the blob spells it.
    pub fn name(self) -> &'static str {
        match self {
            Field::LoginData => "loginData",
            Field::NotifySurveySubjects => "notifySurveySubjects",
            Field::HiddenTaskIdList => "hiddenTaskIdList",
            Field::DeadlineMode => "deadlineMode",
            Field::DeadlineFormat => "deadlineFormat",
            Field::HighlightTask => "highlightTask",
            Field::TaskListRowsPerPage => "taskListRowsPerPage",
            Field::Tasklist => "tasklist",
            Field::SurveyList => "surveyList",
            Field::OriginalTasklist => "originalTasklist",
            Field::Timetable => "timetable",
            Field::LastTaskFetchUnixTime => "lastTaskFetchUnixTime",
        }
    }

    /// Row key in the `kv` table.
    pub fn key(self) -> String {
        format!("{}.{}", self.section(), self.name())
    }

    /// Value returned when the field has never been written.
    pub fn default_value(self) -> Value {
        match self {
            Field::LoginData => json!({ "username": "", "password": "" }),
            Field::DeadlineMode => json!(DeadlineMode::default()),
            Field::DeadlineFormat => json!(DEFAULT_DEADLINE_FORMAT),
            Field::HighlightTask => json!(true),
            Field::TaskListRowsPerPage => json!(DEFAULT_ROWS_PER_PAGE),
            Field::LastTaskFetchUnixTime => json!(0),
            Field::NotifySurveySubjects
            | Field::HiddenTaskIdList
            | Field::Tasklist
            | Field::SurveyList
            | Field::OriginalTasklist
            | Field::Timetable => json!([]),
        }
    }
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.section(), self.name())
    }
}

impl std::str::FromStr for Field {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Field::ALL
            .into_iter()
            .find(|f| f.key() == s || f.name() == s)
            .ok_or_else(|| format!("unknown store field: {s}"))
    }
}

/// User preferences section of the blob.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    #[serde(default)]
    pub login_data: LoginData,
    #[serde(default)]
    pub notify_survey_subjects: Vec<Subject>,
    #[serde(default)]
    pub hidden_task_id_list: Vec<String>,
    #[serde(default)]
    pub deadline_mode: DeadlineMode,
    #[serde(default = "default_deadline_format")]
    pub deadline_format: String,
    #[serde(default = "default_true")]
    pub highlight_task: bool,
    #[serde(default = "default_rows_per_page")]
    pub task_list_rows_per_page: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            login_data: LoginData::default(),
            notify_survey_subjects: Vec::new(),
            hidden_task_id_list: Vec::new(),
            deadline_mode: DeadlineMode::default(),
            deadline_format: default_deadline_format(),
            highlight_task: true,
            task_list_rows_per_page: DEFAULT_ROWS_PER_PAGE,
        }
    }
}

/// LMS data section of the blob, filled by the external sync process.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScombzData {
    #[serde(default)]
    pub tasklist: Vec<Task>,
    #[serde(default)]
    pub survey_list: Vec<Task>,
    #[serde(default)]
    pub original_tasklist: Vec<Task>,
    #[serde(default)]
    pub timetable: Timetable,
    /// Milliseconds since the epoch of the last successful task fetch.
    #[serde(default)]
    pub last_task_fetch_unix_time: i64,
}

/// The whole persisted record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Saves {
    #[serde(default)]
    pub settings: Settings,
    #[serde(default, rename = "scombzData")]
    pub scombz_data: ScombzData,
}

fn default_deadline_format() -> String {
    DEFAULT_DEADLINE_FORMAT.to_string()
}
fn default_true() -> bool {
    true
}
fn default_rows_per_page() -> usize {
    DEFAULT_ROWS_PER_PAGE
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_typed_defaults() {
        let mut settings = serde_json::Map::new();
        let mut data = serde_json::Map::new();
        for field in Field::ALL {
            let target = if field.section() == SETTINGS_SECTION {
                &mut settings
            } else {
                &mut data
            };
            target.insert(field.name().to_string(), field.default_value());
        }
        let blob = json!({ "settings": settings, "scombzData": data });
        let saves: Saves = serde_json::from_value(blob).unwrap();
        assert_eq!(saves, Saves::default());
    }

    #[test]
    fn field_keys_are_unique() {
        let mut keys: Vec<String> = Field::ALL.iter().map(|f| f.key()).collect();
        keys.sort();
        keys.dedup();
        assert_eq!(keys.len(), Field::ALL.len());
    }

    #[test]
    fn field_parses_from_key_or_name() {
        assert_eq!(
            "settings.hiddenTaskIdList".parse::<Field>(),
            Ok(Field::HiddenTaskIdList)
        );
        assert_eq!("timetable".parse::<Field>(), Ok(Field::Timetable));
        assert!("settings.nope".parse::<Field>().is_err());
    }

    #[test]
    fn empty_blob_decodes_to_defaults() {
        let saves: Saves = serde_json::from_str("{}").unwrap();
        assert_eq!(saves.settings.task_list_rows_per_page, 5);
        assert_eq!(saves.settings.deadline_format, "yyyy/MM/dd HH:mm");
        assert!(saves.settings.highlight_task);
        assert!(saves.scombz_data.timetable.is_empty());
    }
}
