use thiserror::Error;

/// Errors raised while scraping the timetable page.
///
/// Missing page elements are not errors: they mean the page is in a view the
/// scraper does not apply to, and yield an empty timetable instead.
#[derive(Debug, Error)]
pub enum ScrapeError {
    /// A built-in CSS selector failed to parse.
    #[error("invalid selector {selector:?}: {reason}")]
    Selector { selector: String, reason: String },

    /// Persisting the scraped timetable failed.
    #[error("store error: {0}")]
    Store(#[from] scombz_store::StoreError),
}

pub type Result<T> = std::result::Result<T, ScrapeError>;
