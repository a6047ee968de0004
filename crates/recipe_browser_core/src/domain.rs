//! crates/recipe_browser_core/src/domain.rs
//!
//! Defines the pure, core data structures for the application.
//! These structs mirror the remote recipe API's resources and are
//! independent of any transport or cache concerns.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Difficulty rating carried by every recipe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

/// Represents a single recipe resource.
///
/// `id` is server-assigned and stable for the lifetime of the resource;
/// every mutation operation must name it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    pub id: u64,
    pub name: String,
    pub ingredients: Vec<String>,
    pub instructions: Vec<String>,
    pub prep_time_minutes: u32,
    pub cook_time_minutes: u32,
    pub servings: u32,
    pub difficulty: Difficulty,
    pub cuisine: String,
    pub calories_per_serving: u32,
    pub tags: Vec<String>,
    pub user_id: u64,
    pub image: String,
    pub rating: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub review_count: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meal_type: Option<Vec<String>>,
}

/// One page of listing results, as returned by the remote service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipePage {
    pub recipes: Vec<Recipe>,
    pub total: u64,
    pub skip: u64,
    pub limit: u64,
}

impl RecipePage {
    /// Checks the envelope invariants: at most `limit` recipes per page and
    /// the page fits inside the server-side total.
    pub fn is_well_formed(&self) -> bool {
        self.recipes.len() as u64 <= self.limit
            && self.skip + self.recipes.len() as u64 <= self.total
    }
}

/// Input for creating a recipe (everything but the server-assigned `id`).
/// Updates reuse the same shape; the remote service accepts partial bodies
/// but the client always submits the full form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeDraft {
    pub name: String,
    pub ingredients: Vec<String>,
    pub instructions: Vec<String>,
    pub prep_time_minutes: u32,
    pub cook_time_minutes: u32,
    pub servings: u32,
    pub difficulty: Difficulty,
    pub cuisine: String,
    pub calories_per_serving: u32,
    pub tags: Vec<String>,
    pub image: String,
    pub rating: f64,
    pub user_id: u64,
}

/// Sort direction for listing queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    pub fn as_str(self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }

    pub fn flipped(self) -> Self {
        match self {
            SortOrder::Asc => SortOrder::Desc,
            SortOrder::Desc => SortOrder::Asc,
        }
    }
}

/// Parameters of one listing request.
///
/// When `search` is non-empty the remote service's search endpoint is used,
/// and that endpoint ignores `sort_by`/`order` entirely. This is a documented
/// quirk of the external API, not something the client papers over: the URL
/// builder simply never sends sort parameters in search mode.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RecipeQuery {
    pub limit: u64,
    pub skip: u64,
    pub search: String,
    pub sort_by: String,
    pub order: SortOrder,
}

impl RecipeQuery {
    /// Builds the query for a 1-based page number: `skip = (page - 1) * limit`.
    pub fn for_page(page: u64, limit: u64) -> Self {
        Self {
            limit,
            skip: page.saturating_sub(1) * limit,
            search: String::new(),
            sort_by: String::new(),
            order: SortOrder::Asc,
        }
    }
}

/// Represents the user profile returned by the auth endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: u64,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub gender: String,
    pub image: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

/// Username/password pair submitted to the login endpoint.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginCredentials {
    pub username: String,
    pub password: String,
    pub expires_in_mins: u32,
}

/// A successful login or refresh: the profile plus both tokens.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthSession {
    pub user: User,
    pub access_token: String,
    pub refresh_token: String,
}

/// Acknowledgement returned by the delete endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct DeleteReceipt {
    pub is_deleted: bool,
    pub deleted_on: DateTime<Utc>,
}
