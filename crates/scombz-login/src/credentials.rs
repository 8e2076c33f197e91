//! Student id validation and credential persistence.
//!
//! A student id is two ASCII letters followed by five ASCII digits, e.g.
//! `ab12345`. The SSO form expects the `@sic` domain suffix, so it is
//! appended on save when the user left it off.

use tracing::{info, warn};

use scombz_core::types::LoginData;
use scombz_store::Store;

use crate::error::{LoginError, Result};

pub const DOMAIN_SUFFIX: &str = "@sic";

/// Whether `username` is a student id, with or without [`DOMAIN_SUFFIX`].
pub fn validate_username(username: &str) -> bool {
    let id = username.strip_suffix(DOMAIN_SUFFIX).unwrap_or(username);
    let bytes = id.as_bytes();
    bytes.len() == 7
        && bytes[..2].iter().all(u8::is_ascii_alphabetic)
        && bytes[2..].iter().all(u8::is_ascii_digit)
}

/// Append [`DOMAIN_SUFFIX`] unless already present.
pub fn normalize_username(username: &str) -> String {
    if username.ends_with(DOMAIN_SUFFIX) {
        username.to_string()
    } else {
        format!("{username}{DOMAIN_SUFFIX}")
    }
}

/// Validate and persist the login credentials.
///
/// Only `loginData` is written. Nothing is written on rejection.
pub fn save_credentials(store: &Store, username: &str, password: &str) -> Result<LoginData> {
    let username = username.trim();
    if !validate_username(username) || password.is_empty() {
        warn!("credentials rejected");
        return Err(LoginError::InvalidCredentials);
    }
    let login = LoginData {
        username: normalize_username(username),
        password: password.to_string(),
    };
    store.set_login_data(&login)?;
    info!(username = %login.username, "credentials saved");
    Ok(login)
}

/// Saved credentials, if both parts were ever filled in.
pub fn stored_credentials(store: &Store) -> Result<Option<LoginData>> {
    let login = store.login_data()?;
    if login.username.is_empty() || login.password.is_empty() {
        return Ok(None);
    }
    Ok(Some(login))
}

#[cfg(test)]
mod tests {
    use super::*;
    use scombz_core::types::DeadlineMode;

    #[test]
    fn accepts_student_ids() {
        assert!(validate_username("ab12345"));
        assert!(validate_username("AB12345@sic"));
    }

    #[test]
    fn rejects_malformed_ids() {
        for bad in ["", "abc1234", "ab1234", "ab123456", "ab12345@sit", "１b12345", "ab12345@sic@sic"] {
            assert!(!validate_username(bad), "{bad:?} should be rejected");
        }
    }

    #[test]
    fn normalize_appends_suffix_once() {
        assert_eq!(normalize_username("ab12345"), "ab12345@sic");
        assert_eq!(normalize_username("ab12345@sic"), "ab12345@sic");
    }

    #[test]
    fn save_writes_only_login_data() {
        let store = Store::open_in_memory().unwrap();
        store.set_deadline_mode(DeadlineMode::Absolute).unwrap();

        let saved = save_credentials(&store, "ab12345", "hunter2").unwrap();
        assert_eq!(saved.username, "ab12345@sic");
        assert_eq!(store.login_data().unwrap(), saved);
        assert_eq!(store.deadline_mode().unwrap(), DeadlineMode::Absolute);
        assert_eq!(stored_credentials(&store).unwrap(), Some(saved));
    }

    #[test]
    fn rejection_writes_nothing() {
        let store = Store::open_in_memory().unwrap();
        let err = save_credentials(&store, "abc1234", "pw").unwrap_err();
        assert_eq!(err.to_string(), "学籍番号またはパスワードが正しくありません。");
        assert!(matches!(
            save_credentials(&store, "ab12345", ""),
            Err(LoginError::InvalidCredentials)
        ));
        assert_eq!(store.get_raw(scombz_store::Field::LoginData).unwrap(), None);
        assert_eq!(stored_credentials(&store).unwrap(), None);
    }
}
