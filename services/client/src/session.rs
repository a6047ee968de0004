//! services/client/src/session.rs
//!
//! The process-wide session store: current user profile plus access and
//! refresh tokens, written through to durable storage on every change. This
//! is the one place the rest of the client reads authentication state from.

use std::sync::{Arc, RwLock};

use recipe_browser_core::domain::User;
use recipe_browser_core::ports::CredentialStore;
use tracing::warn;

const TOKEN_KEY: &str = "token";
const REFRESH_TOKEN_KEY: &str = "refreshToken";
const USER_KEY: &str = "user";

#[derive(Default)]
struct SessionState {
    user: Option<User>,
    token: Option<String>,
    refresh_token: Option<String>,
    is_authenticated: bool,
}

/// Holds the current session, hydrated from the credential store at
/// construction. Hydration never touches the network: the profile stays
/// empty until a login or an explicit `/auth/me` refresh fills it.
pub struct SessionStore {
    storage: Arc<dyn CredentialStore>,
    state: RwLock<SessionState>,
}

impl SessionStore {
    /// Creates a store hydrated from whatever the durable storage holds.
    /// `is_authenticated` is derived purely from token presence.
    pub fn hydrate(storage: Arc<dyn CredentialStore>) -> Self {
        let token = storage.get(TOKEN_KEY);
        let refresh_token = storage.get(REFRESH_TOKEN_KEY);
        let state = SessionState {
            user: None,
            is_authenticated: token.is_some(),
            token,
            refresh_token,
        };
        Self {
            storage,
            state: RwLock::new(state),
        }
    }

    /// Atomically installs a fresh login: profile, both tokens, and the
    /// authenticated flag, all persisted.
    pub fn set_credentials(&self, user: User, access_token: &str, refresh_token: &str) {
        self.storage.set(TOKEN_KEY, access_token);
        self.storage.set(REFRESH_TOKEN_KEY, refresh_token);
        match serde_json::to_string(&user) {
            Ok(serialized) => self.storage.set(USER_KEY, &serialized),
            Err(e) => warn!("Failed to serialize user profile: {e}"),
        }

        let mut state = self.state.write().unwrap_or_else(|e| e.into_inner());
        state.user = Some(user);
        state.token = Some(access_token.to_string());
        state.refresh_token = Some(refresh_token.to_string());
        state.is_authenticated = true;
    }

    /// Atomically clears the session and the persisted keys. Safe to call
    /// when already logged out.
    pub fn logout(&self) {
        self.storage.remove(TOKEN_KEY);
        self.storage.remove(REFRESH_TOKEN_KEY);
        self.storage.remove(USER_KEY);

        let mut state = self.state.write().unwrap_or_else(|e| e.into_inner());
        *state = SessionState::default();
    }

    /// Replaces the profile only; tokens and the authenticated flag are
    /// untouched.
    pub fn update_user(&self, user: User) {
        match serde_json::to_string(&user) {
            Ok(serialized) => self.storage.set(USER_KEY, &serialized),
            Err(e) => warn!("Failed to serialize user profile: {e}"),
        }

        let mut state = self.state.write().unwrap_or_else(|e| e.into_inner());
        state.user = Some(user);
    }

    // --- Selectors (pure reads) ---

    pub fn current_user(&self) -> Option<User> {
        let state = self.state.read().unwrap_or_else(|e| e.into_inner());
        state.user.clone()
    }

    pub fn is_authenticated(&self) -> bool {
        let state = self.state.read().unwrap_or_else(|e| e.into_inner());
        state.is_authenticated
    }

    pub fn token(&self) -> Option<String> {
        let state = self.state.read().unwrap_or_else(|e| e.into_inner());
        state.token.clone()
    }

    pub fn refresh_token(&self) -> Option<String> {
        let state = self.state.read().unwrap_or_else(|e| e.into_inner());
        state.refresh_token.clone()
    }
}
