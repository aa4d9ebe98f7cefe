//! Application state: login gate plus the unlocked planner session.
//!
//! # Responsibility
//! - Hold the login form state and the optional planner session.
//! - Open the session on successful login or when already unlocked.
//! - Flush pending writes before logging out.

use crate::config::PlannerConfig;
use crate::repo::calendar_repo::{CalendarStorage, StorageKeys};
use crate::repo::kv_store::KeyValueStore;
use crate::service::auth::{AuthError, AuthGate, AuthResult};
use crate::service::session::PlannerSession;

/// Login form state shown while the planner is locked.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoginForm {
    pub password: String,
    /// Inline error from the last failed submit.
    pub error: Option<String>,
}

/// Top-level planner state owned by the UI layer.
pub struct PlannerApp<S: KeyValueStore + Clone> {
    config: PlannerConfig,
    store: S,
    auth: AuthGate<S>,
    login_form: LoginForm,
    session: Option<PlannerSession<S>>,
}

impl<S: KeyValueStore + Clone> PlannerApp<S> {
    /// Builds the app and restores the session if the install is unlocked.
    pub fn new(config: PlannerConfig, store: S) -> Self {
        let keys = StorageKeys::new(config.app_key.clone());
        let auth = AuthGate::new(store.clone(), &keys, config.password.clone());
        let mut app = Self {
            config,
            store,
            auth,
            login_form: LoginForm::default(),
            session: None,
        };
        if app.auth.is_authenticated() {
            app.open_session();
        }
        app
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    pub fn is_unlocked(&self) -> bool {
        self.session.is_some()
    }

    pub fn login_form(&self) -> &LoginForm {
        &self.login_form
    }

    pub fn set_password_input(&mut self, password: impl Into<String>) {
        self.login_form.password = password.into();
    }

    /// Submits the current password input.
    ///
    /// On mismatch the inline error is set and the input cleared. A session
    /// that is already open is flushed before it is reopened.
    pub fn submit_login(&mut self) -> AuthResult<()> {
        let submitted = std::mem::take(&mut self.login_form.password);
        match self.auth.login(&submitted) {
            Ok(()) => {
                self.login_form = LoginForm::default();
                self.open_session();
                Ok(())
            }
            Err(err) => {
                if matches!(err, AuthError::IncorrectPassword) {
                    self.login_form.error = Some(err.to_string());
                }
                Err(err)
            }
        }
    }

    pub fn session(&self) -> Option<&PlannerSession<S>> {
        self.session.as_ref()
    }

    pub fn session_mut(&mut self) -> Option<&mut PlannerSession<S>> {
        self.session.as_mut()
    }

    /// Flushes pending edits, closes the session and clears the auth flag.
    pub fn logout(&mut self) -> AuthResult<()> {
        if let Some(mut session) = self.session.take() {
            session.flush();
        }
        self.login_form = LoginForm::default();
        self.auth.logout()
    }

    fn open_session(&mut self) {
        if let Some(mut previous) = self.session.take() {
            previous.flush();
        }
        let keys = StorageKeys::new(self.config.app_key.clone());
        let storage = CalendarStorage::new(self.store.clone(), keys);
        self.session = Some(PlannerSession::open(storage, &self.config));
    }
}
