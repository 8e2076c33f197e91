use chrono::FixedOffset;
use tracing::info;
use uuid::Uuid;

use scombz_core::types::Task;
use scombz_store::Store;

use crate::deadline::require_deadline;
use crate::error::{Result, TaskError};

/// User input for a task that does not come from the LMS.
#[derive(Debug, Clone, Default)]
pub struct OriginalTaskDraft {
    pub title: String,
    pub course: String,
    pub deadline: String,
    pub link: String,
}

/// Validate `draft`, give it a fresh id and append it to `originalTasklist`.
pub fn add_original_task(store: &Store, draft: OriginalTaskDraft, offset: FixedOffset) -> Result<Task> {
    if draft.title.trim().is_empty() {
        return Err(TaskError::MissingField("title"));
    }
    let id = Uuid::new_v4().to_string();
    require_deadline(&id, &draft.deadline, offset)?;

    let task = Task {
        id,
        title: draft.title,
        course: draft.course,
        link: draft.link,
        deadline: draft.deadline,
    };
    let all = store.push_original_task(task.clone())?;
    info!(task_id = %task.id, total = all.len(), "original task added");
    Ok(task)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn jst() -> FixedOffset {
        FixedOffset::east_opt(9 * 3600).unwrap()
    }

    #[test]
    fn appends_with_unique_ids() {
        let store = Store::open_in_memory().unwrap();
        let draft = OriginalTaskDraft {
            title: "Report".into(),
            course: "Math".into(),
            deadline: "2030-01-01T09:00:00".into(),
            link: String::new(),
        };
        let a = add_original_task(&store, draft.clone(), jst()).unwrap();
        let b = add_original_task(&store, draft, jst()).unwrap();
        assert_ne!(a.id, b.id);

        let stored: Vec<Task> = store
            .get_or_default(scombz_store::Field::OriginalTasklist)
            .unwrap();
        assert_eq!(stored, vec![a, b]);
    }

    #[test]
    fn rejects_bad_deadline_and_empty_title() {
        let store = Store::open_in_memory().unwrap();
        let bad = OriginalTaskDraft {
            title: "Report".into(),
            deadline: "soon".into(),
            ..Default::default()
        };
        assert!(matches!(
            add_original_task(&store, bad, jst()),
            Err(TaskError::InvalidDeadline { .. })
        ));
        let untitled = OriginalTaskDraft {
            deadline: "2030-01-01T09:00:00".into(),
            ..Default::default()
        };
        assert!(matches!(
            add_original_task(&store, untitled, jst()),
            Err(TaskError::MissingField("title"))
        ));
        let stored: Vec<Task> = store
            .get_or_default(scombz_store::Field::OriginalTasklist)
            .unwrap();
        assert!(stored.is_empty());
    }
}
