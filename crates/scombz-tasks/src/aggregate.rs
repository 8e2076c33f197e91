//! Merge the three task sources into the single ordered list the view shows.

use std::collections::HashSet;

use chrono::{DateTime, FixedOffset, Utc};
use serde::Serialize;
use tracing::{debug, warn};

use scombz_core::types::{Subject, Task};
use scombz_store::ScombzData;

use crate::deadline::require_deadline;

/// Where a task came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskKind {
    Assignment,
    Survey,
    Original,
}

/// The raw lists a task view is built from.
#[derive(Debug, Clone, Copy)]
pub struct TaskSources<'a> {
    pub tasklist: &'a [Task],
    pub survey_list: &'a [Task],
    pub original_tasklist: &'a [Task],
    /// Surveys are only shown for courses named here.
    pub notify_survey_subjects: &'a [Subject],
}

impl<'a> TaskSources<'a> {
    pub fn new(data: &'a ScombzData, notify_survey_subjects: &'a [Subject]) -> Self {
        Self {
            tasklist: &data.tasklist,
            survey_list: &data.survey_list,
            original_tasklist: &data.original_tasklist,
            notify_survey_subjects,
        }
    }
}

/// A task with its deadline parsed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregatedTask {
    #[serde(flatten)]
    pub task: Task,
    #[serde(rename = "deadlineDate")]
    pub deadline_date: DateTime<Utc>,
    pub kind: TaskKind,
}

impl AggregatedTask {
    pub fn id(&self) -> &str {
        &self.task.id
    }
}

/// Merge assignments, subscribed surveys and original tasks in that order,
/// parsing every deadline. Tasks whose deadline cannot be read are logged
/// and dropped here so they never reach sorting or filtering.
pub fn ingest(sources: TaskSources<'_>, offset: FixedOffset) -> Vec<AggregatedTask> {
    let subscribed: HashSet<&str> = sources
        .notify_survey_subjects
        .iter()
        .map(|s| s.name.as_str())
        .collect();

    let assignments = sources.tasklist.iter().map(|t| (t, TaskKind::Assignment));
    let surveys = sources
        .survey_list
        .iter()
        .filter(|t| subscribed.contains(t.course.as_str()))
        .map(|t| (t, TaskKind::Survey));
    let originals = sources
        .original_tasklist
        .iter()
        .map(|t| (t, TaskKind::Original));

    assignments
        .chain(surveys)
        .chain(originals)
        .filter_map(|(task, kind)| match require_deadline(&task.id, &task.deadline, offset) {
            Ok(deadline_date) => Some(AggregatedTask {
                task: task.clone(),
                deadline_date,
                kind,
            }),
            Err(e) => {
                warn!(error = %e, ?kind, "dropping task with unreadable deadline");
                None
            }
        })
        .collect()
}

/// Keep tasks not yet past their deadline, sorted ascending by deadline.
/// The sort is stable so equal deadlines keep merge order.
pub fn live_tasks(mut tasks: Vec<AggregatedTask>, now: DateTime<Utc>) -> Vec<AggregatedTask> {
    tasks.retain(|t| t.deadline_date >= now);
    tasks.sort_by_key(|t| t.deadline_date);
    tasks
}

/// The visible task sequence: live tasks minus the hidden ids.
pub fn aggregate(
    sources: TaskSources<'_>,
    hidden: &[String],
    now: DateTime<Utc>,
    offset: FixedOffset,
) -> Vec<AggregatedTask> {
    let live = live_tasks(ingest(sources, offset), now);
    let total = live.len();
    let visible: Vec<AggregatedTask> = live
        .into_iter()
        .filter(|t| !hidden.iter().any(|h| h == t.id()))
        .collect();
    debug!(live = total, visible = visible.len(), "tasks aggregated");
    visible
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn task(id: &str, course: &str, deadline: &str) -> Task {
        Task {
            id: id.to_string(),
            title: format!("title {id}"),
            course: course.to_string(),
            link: String::new(),
            deadline: deadline.to_string(),
        }
    }

    fn jst() -> FixedOffset {
        FixedOffset::east_opt(9 * 3600).unwrap()
    }

    fn now() -> DateTime<Utc> {
        // 2024-05-01 12:00 JST
        Utc.with_ymd_and_hms(2024, 5, 1, 3, 0, 0).unwrap()
    }

    #[test]
    fn merges_sorts_and_filters() {
        let tasklist = vec![
            task("late", "Math", "2024-05-03T10:00:00"),
            task("past", "Math", "2024-04-30T10:00:00"),
        ];
        let survey_list = vec![
            task("s-yes", "Physics", "2024-05-02 09:00"),
            task("s-no", "History", "2024-05-02 08:00"),
        ];
        let original_tasklist = vec![task("mine", "", "2024/05/01 18:00")];
        let subjects = vec![Subject {
            name: "Physics".into(),
            url: String::new(),
        }];
        let sources = TaskSources {
            tasklist: &tasklist,
            survey_list: &survey_list,
            original_tasklist: &original_tasklist,
            notify_survey_subjects: &subjects,
        };

        let out = aggregate(sources, &[], now(), jst());
        let ids: Vec<&str> = out.iter().map(|t| t.id()).collect();
        assert_eq!(ids, ["mine", "s-yes", "late"]);
        assert_eq!(out[0].kind, TaskKind::Original);
        assert_eq!(out[1].kind, TaskKind::Survey);
    }

    #[test]
    fn survey_subject_match_is_exact() {
        let survey_list = vec![task("s", "Physics I", "2024-05-02T09:00:00")];
        let subjects = vec![Subject {
            name: "Physics".into(),
            url: String::new(),
        }];
        let sources = TaskSources {
            tasklist: &[],
            survey_list: &survey_list,
            original_tasklist: &[],
            notify_survey_subjects: &subjects,
        };
        assert!(aggregate(sources, &[], now(), jst()).is_empty());
    }

    #[test]
    fn unreadable_deadline_is_dropped() {
        let tasklist = vec![
            task("bad", "Math", "next tuesday"),
            task("ok", "Math", "2024-05-02T00:00:00+09:00"),
        ];
        let sources = TaskSources {
            tasklist: &tasklist,
            survey_list: &[],
            original_tasklist: &[],
            notify_survey_subjects: &[],
        };
        let ingested = ingest(sources, jst());
        assert_eq!(ingested.len(), 1);
        assert_eq!(ingested[0].id(), "ok");
    }

    #[test]
    fn deadline_equal_to_now_is_kept() {
        let tasklist = vec![task("edge", "Math", "2024-05-01T12:00:00")];
        let sources = TaskSources {
            tasklist: &tasklist,
            survey_list: &[],
            original_tasklist: &[],
            notify_survey_subjects: &[],
        };
        assert_eq!(aggregate(sources, &[], now(), jst()).len(), 1);
    }

    #[test]
    fn ties_keep_merge_order_and_hidden_are_removed() {
        let tasklist = vec![
            task("a", "Math", "2024-05-02T10:00:00"),
            task("b", "Math", "2024-05-02T10:00:00"),
            task("c", "Math", "2024-05-02T10:00:00"),
        ];
        let sources = TaskSources {
            tasklist: &tasklist,
            survey_list: &[],
            original_tasklist: &[],
            notify_survey_subjects: &[],
        };
        let out = aggregate(sources, &["b".to_string()], now(), jst());
        let ids: Vec<&str> = out.iter().map(|t| t.id()).collect();
        assert_eq!(ids, ["a", "c"]);
    }
}
