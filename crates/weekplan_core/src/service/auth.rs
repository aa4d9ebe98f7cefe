//! Shared-password access gate.
//!
//! # Invariants
//! - Access is granted only when the submitted password equals the
//!   configured one exactly.
//! - The unlocked state is the persisted `<app>-auth == "true"` flag.
//! - No lockout, throttling or session expiry.

use crate::repo::calendar_repo::StorageKeys;
use crate::repo::kv_store::{KeyValueStore, StorageError};
use log::{error, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

const AUTH_FLAG_TRUE: &str = "true";

/// Inline message shown after a failed login.
pub const INCORRECT_PASSWORD_MESSAGE: &str = "Incorrect password";

pub type AuthResult<T> = Result<T, AuthError>;

#[derive(Debug)]
pub enum AuthError {
    IncorrectPassword,
    Storage(StorageError),
}

impl Display for AuthError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::IncorrectPassword => write!(f, "{INCORRECT_PASSWORD_MESSAGE}"),
            Self::Storage(err) => write!(f, "{err}"),
        }
    }
}

impl Error for AuthError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::IncorrectPassword => None,
            Self::Storage(err) => Some(err),
        }
    }
}

impl From<StorageError> for AuthError {
    fn from(value: StorageError) -> Self {
        Self::Storage(value)
    }
}

/// Password gate backed by a persisted boolean flag.
pub struct AuthGate<S: KeyValueStore> {
    store: S,
    flag_key: String,
    password: String,
}

impl<S: KeyValueStore> AuthGate<S> {
    pub fn new(store: S, keys: &StorageKeys, password: impl Into<String>) -> Self {
        Self {
            store,
            flag_key: keys.auth(),
            password: password.into(),
        }
    }

    /// Returns whether the persisted flag marks this install as unlocked.
    ///
    /// Unreadable storage counts as locked.
    pub fn is_authenticated(&self) -> bool {
        match self.store.get(&self.flag_key) {
            Ok(value) => value.as_deref() == Some(AUTH_FLAG_TRUE),
            Err(err) => {
                warn!("event=auth_check module=auth status=error error={err}");
                false
            }
        }
    }

    /// Checks `submitted` and persists the unlocked flag on match.
    ///
    /// A failed flag write is logged; the login still succeeds for the
    /// running instance.
    ///
    /// # Errors
    /// - `IncorrectPassword` on mismatch.
    pub fn login(&self, submitted: &str) -> AuthResult<()> {
        if submitted != self.password {
            info!("event=auth_login module=auth status=rejected");
            return Err(AuthError::IncorrectPassword);
        }

        if let Err(err) = self.store.set(&self.flag_key, AUTH_FLAG_TRUE) {
            error!("event=auth_login module=auth status=error error_code=flag_write_failed error={err}");
        }
        info!("event=auth_login module=auth status=ok");
        Ok(())
    }

    /// Clears the persisted unlocked flag.
    pub fn logout(&self) -> AuthResult<()> {
        self.store.remove(&self.flag_key)?;
        info!("event=auth_logout module=auth status=ok");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{AuthError, AuthGate};
    use crate::repo::calendar_repo::StorageKeys;
    use crate::repo::kv_store::{KeyValueStore, MemoryKeyValueStore};

    #[test]
    fn password_comparison_is_exact() {
        let store = MemoryKeyValueStore::new();
        let gate = AuthGate::new(store.clone(), &StorageKeys::new("fam"), "Bruno");

        assert!(matches!(gate.login("bruno"), Err(AuthError::IncorrectPassword)));
        assert!(matches!(gate.login("Bruno "), Err(AuthError::IncorrectPassword)));
        assert!(!gate.is_authenticated());

        gate.login("Bruno").unwrap();
        assert!(gate.is_authenticated());
        assert_eq!(store.get("fam-auth").unwrap().as_deref(), Some("true"));

        gate.logout().unwrap();
        assert!(!gate.is_authenticated());
    }
}
