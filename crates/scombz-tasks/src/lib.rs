//! `scombz-tasks`: the merged, sorted and paged task list.
//!
//! # Overview
//!
//! Assignments, subscribed-course surveys and the user's own tasks are
//! merged by [`aggregate::aggregate`]: deadlines are parsed at ingestion,
//! expired and hidden tasks are dropped and the rest is sorted by deadline.
//! [`list::TaskList`] layers pagination, deadline labels and urgency
//! highlighting on top and writes user choices back to the store.
//!
//! | Deadline mode | Label                                   |
//! |---------------|-----------------------------------------|
//! | `relative`    | `残り約{n}分` / `時間` / `日`            |
//! | `absolute`    | the stored `deadlineFormat` pattern      |

pub mod aggregate;
pub mod deadline;
pub mod error;
pub mod hidden;
pub mod list;
pub mod original;
pub mod pagination;
pub mod ticker;
pub mod urgency;

pub use aggregate::{aggregate, AggregatedTask, TaskKind, TaskSources};
pub use error::{Result, TaskError};
pub use list::{HideOutcome, TaskList, TaskRow, EMPTY_MESSAGE};
pub use original::{add_original_task, OriginalTaskDraft};
pub use ticker::NowTicker;
pub use urgency::Urgency;
