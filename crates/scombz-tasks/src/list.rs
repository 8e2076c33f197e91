use chrono::{DateTime, FixedOffset, Utc};
use serde::Serialize;
use tracing::{info, warn};

use scombz_core::config::{TasksConfig, DEFAULT_DEADLINE_FORMAT};
use scombz_core::types::{DeadlineMode, Subject};
use scombz_store::{Field, Saves, Store};

use crate::aggregate::{ingest, live_tasks, AggregatedTask, TaskKind, TaskSources};
use crate::deadline::{absolute_time, relative_time, DatePattern};
use crate::error::Result;
use crate::hidden::HiddenTasks;
use crate::pagination::Paginator;
use crate::urgency::Urgency;

/// Shown in place of the table when no task is visible.
pub const EMPTY_MESSAGE: &str = "課題はありません";
const LAST_UPDATE_FORMAT: &str = "%m/%d %H:%M";

/// One rendered line of the task table.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskRow {
    pub id: String,
    pub title: String,
    pub course: String,
    /// Course page, when the course is one of the subscribed subjects.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub course_url: Option<String>,
    pub link: String,
    pub deadline_label: String,
    /// Set only while highlighting is enabled.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub urgency: Option<Urgency>,
    pub kind: TaskKind,
}

/// Result of [`TaskList::hide`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HideOutcome {
    Hidden,
    AlreadyHidden,
    /// No live task has the id; nothing was written.
    NotFound,
}

/// The task list as the user sees it: merged, filtered, sorted and paged.
pub struct TaskList {
    /// Non-expired tasks before hidden ids are removed.
    live: Vec<AggregatedTask>,
    visible: Vec<AggregatedTask>,
    hidden: HiddenTasks,
    subjects: Vec<Subject>,
    mode: DeadlineMode,
    pattern: DatePattern,
    highlight: bool,
    pager: Paginator,
    last_fetch_ms: i64,
    offset: FixedOffset,
}

impl TaskList {
    /// Build the list from the current store contents.
    pub fn load(store: &Store, config: &TasksConfig, now: DateTime<Utc>) -> Result<Self> {
        let saves = store.snapshot()?;
        Self::from_saves(&saves, config.offset(), now)
    }

    pub fn from_saves(saves: &Saves, offset: FixedOffset, now: DateTime<Utc>) -> Result<Self> {
        let settings = &saves.settings;
        let sources = TaskSources::new(&saves.scombz_data, &settings.notify_survey_subjects);
        let live = live_tasks(ingest(sources, offset), now);

        let pattern = match DatePattern::parse(&settings.deadline_format) {
            Ok(p) => p,
            Err(e) => {
                warn!(error = %e, "unusable deadline format, using default");
                DatePattern::parse(DEFAULT_DEADLINE_FORMAT)?
            }
        };

        let mut list = Self {
            live,
            visible: Vec::new(),
            hidden: HiddenTasks::new(settings.hidden_task_id_list.iter().cloned()),
            subjects: settings.notify_survey_subjects.clone(),
            mode: settings.deadline_mode,
            pattern,
            highlight: settings.highlight_task,
            pager: Paginator::new(settings.task_list_rows_per_page),
            last_fetch_ms: saves.scombz_data.last_task_fetch_unix_time,
            offset,
        };
        list.rebuild_visible();
        Ok(list)
    }

    fn rebuild_visible(&mut self) {
        self.visible = self
            .live
            .iter()
            .filter(|t| !self.hidden.contains(t.id()))
            .cloned()
            .collect();
        self.pager.clamp(self.visible.len());
    }

    /// Drop tasks that expired since the list was built.
    pub fn refresh(&mut self, now: DateTime<Utc>) {
        let before = self.live.len();
        self.live.retain(|t| t.deadline_date >= now);
        if self.live.len() != before {
            self.rebuild_visible();
        }
    }

    pub fn visible(&self) -> &[AggregatedTask] {
        &self.visible
    }

    pub fn is_empty(&self) -> bool {
        self.visible.is_empty()
    }

    pub fn deadline_mode(&self) -> DeadlineMode {
        self.mode
    }

    pub fn hidden(&self) -> &HiddenTasks {
        &self.hidden
    }

    /// Flip between relative and absolute deadlines and persist the choice.
    pub fn toggle_deadline_mode(&mut self, store: &Store) -> Result<DeadlineMode> {
        let mode = self.mode.toggled();
        store.set_deadline_mode(mode)?;
        self.mode = mode;
        info!(%mode, "deadline mode toggled");
        Ok(mode)
    }

    /// Hide `id` and persist the reconciled hidden list.
    ///
    /// The stored list is re-read inside the write so hides made by other
    /// views since this one loaded are kept. Ids that no longer match a live
    /// task are pruned on every hide.
    pub fn hide(&mut self, store: &Store, id: &str) -> Result<HideOutcome> {
        if !self.live.iter().any(|t| t.id() == id) {
            warn!(task_id = %id, "no live task with this id, nothing hidden");
            return Ok(HideOutcome::NotFound);
        }

        let live = &self.live;
        let mut added = false;
        let stored = store.update(Field::HiddenTaskIdList, |stored: Vec<String>| {
            let mut merged = HiddenTasks::new(stored);
            added = merged.hide(id);
            merged.reconcile(live.iter().map(AggregatedTask::id));
            merged.into_vec()
        })?;
        self.hidden = HiddenTasks::new(stored);
        self.rebuild_visible();
        info!(task_id = %id, added, hidden = self.hidden.len(), "task hidden");

        Ok(if added {
            HideOutcome::Hidden
        } else {
            HideOutcome::AlreadyHidden
        })
    }

    pub fn current_page(&self) -> usize {
        self.pager.page()
    }

    pub fn set_page(&mut self, page: usize) -> usize {
        self.pager.set_page(page, self.visible.len())
    }

    pub fn page_count(&self) -> usize {
        self.pager.page_count(self.visible.len())
    }

    pub fn needs_pagination(&self) -> bool {
        self.pager.needs_pagination(self.visible.len())
    }

    pub fn range_label(&self) -> String {
        self.pager.range_label(self.visible.len())
    }

    /// Rows of the current page.
    pub fn rows(&self, now: DateTime<Utc>) -> Vec<TaskRow> {
        self.render(self.pager.slice(&self.visible), now)
    }

    /// Every visible row, ignoring pagination.
    pub fn all_rows(&self, now: DateTime<Utc>) -> Vec<TaskRow> {
        self.render(&self.visible, now)
    }

    fn render(&self, tasks: &[AggregatedTask], now: DateTime<Utc>) -> Vec<TaskRow> {
        tasks
            .iter()
            .map(|t| TaskRow {
                id: t.task.id.clone(),
                title: t.task.title.clone(),
                course: t.task.course.clone(),
                course_url: self.course_url(&t.task.course),
                link: t.task.link.clone(),
                deadline_label: self.deadline_label(t.deadline_date, now),
                urgency: self
                    .highlight
                    .then(|| Urgency::classify(t.deadline_date, now)),
                kind: t.kind,
            })
            .collect()
    }

    pub fn deadline_label(&self, deadline: DateTime<Utc>, now: DateTime<Utc>) -> String {
        match self.mode {
            DeadlineMode::Relative => relative_time(deadline, now),
            DeadlineMode::Absolute => absolute_time(deadline, &self.pattern, self.offset),
        }
    }

    fn course_url(&self, course: &str) -> Option<String> {
        self.subjects
            .iter()
            .find(|s| s.name == course && !s.url.is_empty())
            .map(|s| s.url.clone())
    }

    /// When the LMS data was last fetched, `None` before the first fetch.
    pub fn last_update_label(&self) -> Option<String> {
        if self.last_fetch_ms <= 0 {
            return None;
        }
        DateTime::from_timestamp_millis(self.last_fetch_ms)
            .map(|at| at.with_timezone(&self.offset).format(LAST_UPDATE_FORMAT).to_string())
    }
}
