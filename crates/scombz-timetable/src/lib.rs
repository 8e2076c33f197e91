//! `scombz-timetable`: turns the LMS timetable page into a [`Timetable`].
//!
//! The page markup is an external contract: weekday columns are marked by
//! `{n}-yobicol` classes, course buttons by `.timetable-course-top-btn`,
//! and the term by the `#nendo` / `#kikanCd` dropdowns. Pages that do not
//! match (schedule view, no courses) scrape to an empty timetable.
//!
//! [`Timetable`]: scombz_core::types::Timetable

pub mod error;
pub mod period;
pub mod scrape;

pub use error::{Result, ScrapeError};
pub use period::{resolve_period, PeriodStrategy};
pub use scrape::{scrape_timetable, sync_timetable};
