//! `scombz-login`: saved single-sign-on credentials and the delayed
//! auto-submit of the login form.

pub mod autosubmit;
pub mod credentials;
pub mod error;

pub use autosubmit::{AutoSubmit, LoginSubmitter, SubmitOutcome};
pub use credentials::{normalize_username, save_credentials, stored_credentials, validate_username};
pub use error::{LoginError, Result, INVALID_CREDENTIALS_MESSAGE};
