//! crates/recipe_browser_core/src/ports.rs
//!
//! Defines the service contracts (traits) for the application's data layer.
//! These traits form the boundary of the hexagonal architecture, allowing the
//! core to be independent of specific external implementations like the HTTP
//! transport or the durable credential file.

use async_trait::async_trait;

use crate::domain::{
    AuthSession, DeleteReceipt, LoginCredentials, Recipe, RecipeDraft, RecipePage, RecipeQuery,
    User,
};

//=========================================================================================
// Generic API Error and Result Types
//=========================================================================================

/// The error taxonomy shared by every data-layer operation.
///
/// The data layer surfaces these unchanged to its caller and never retries;
/// resubmission is the caller's decision.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The request produced no response at all (DNS, connect, timeout).
    #[error("Network failure: {0}")]
    Network(String),
    /// The remote service answered with a non-2xx status.
    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },
    /// A single-resource fetch came back 404.
    #[error("Not found: {0}")]
    NotFound(String),
    /// A client-side required-field check failed before submission.
    #[error("Validation failed: {0}")]
    Validation(String),
}

/// A convenience type alias for `Result<T, ApiError>`.
pub type ApiResult<T> = Result<T, ApiError>;

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

/// Recipe resource operations against the remote service.
///
/// Listing obeys the query-construction contract on [`RecipeQuery`]: a
/// non-empty `search` routes to the search endpoint, which ignores sort
/// parameters server-side.
#[async_trait]
pub trait RecipeService: Send + Sync {
    async fn list_recipes(&self, query: &RecipeQuery) -> ApiResult<RecipePage>;

    async fn get_recipe(&self, id: u64) -> ApiResult<Recipe>;

    async fn create_recipe(&self, draft: &RecipeDraft) -> ApiResult<Recipe>;

    async fn update_recipe(&self, id: u64, draft: &RecipeDraft) -> ApiResult<Recipe>;

    async fn delete_recipe(&self, id: u64) -> ApiResult<DeleteReceipt>;
}

/// Authentication operations against the remote service.
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Exchanges credentials for a profile plus access/refresh tokens.
    async fn login(&self, credentials: &LoginCredentials) -> ApiResult<AuthSession>;

    /// Fetches the profile of the bearer-authenticated caller.
    async fn current_user(&self) -> ApiResult<User>;

    /// Trades a refresh token for a fresh token pair.
    async fn refresh(&self, refresh_token: &str) -> ApiResult<AuthSession>;
}

/// Durable key-value persistence for credentials, read at startup and
/// written on every credential change. Models the browser's localStorage.
pub trait CredentialStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;

    fn set(&self, key: &str, value: &str);

    fn remove(&self, key: &str);
}

impl RecipeDraft {
    /// Client-side required-field checks, run before any submission.
    pub fn validate(&self) -> ApiResult<()> {
        if self.name.trim().is_empty() {
            return Err(ApiError::Validation("recipe name must not be empty".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Difficulty;

    fn draft(name: &str) -> RecipeDraft {
        RecipeDraft {
            name: name.to_string(),
            ingredients: vec![],
            instructions: vec![],
            prep_time_minutes: 0,
            cook_time_minutes: 0,
            servings: 1,
            difficulty: Difficulty::Easy,
            cuisine: String::new(),
            calories_per_serving: 0,
            tags: vec![],
            image: String::new(),
            rating: 4.5,
            user_id: 1,
        }
    }

    #[test]
    fn blank_name_fails_validation() {
        let err = draft("   ").validate().expect_err("blank name must fail");
        assert!(matches!(err, ApiError::Validation(_)));
    }

    #[test]
    fn named_draft_passes_validation() {
        assert!(draft("Carbonara").validate().is_ok());
    }
}
