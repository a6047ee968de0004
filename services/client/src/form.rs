//! services/client/src/form.rs
//!
//! Converts raw string form fields into a validated `RecipeDraft`. The
//! splitting and defaulting rules match the reference dashboard form:
//! ingredients and tags are comma-separated, instructions are one step per
//! line, and unparsable numbers fall back to the form defaults.

use recipe_browser_core::domain::{Difficulty, RecipeDraft};
use recipe_browser_core::ports::{ApiError, ApiResult};

/// Raw form fields, all strings, as they arrive from user input.
#[derive(Debug, Clone, Default)]
pub struct RecipeForm {
    pub name: String,
    pub ingredients: String,
    pub instructions: String,
    pub prep_time_minutes: String,
    pub cook_time_minutes: String,
    pub servings: String,
    pub difficulty: String,
    pub cuisine: String,
    pub calories_per_serving: String,
    pub tags: String,
    pub image: String,
    pub rating: String,
}

impl RecipeForm {
    /// Parses the form into a draft owned by `user_id`, running the
    /// client-side required-field checks before anything is submitted.
    pub fn into_draft(self, user_id: u64) -> ApiResult<RecipeDraft> {
        let draft = RecipeDraft {
            name: self.name.trim().to_string(),
            ingredients: split_comma_list(&self.ingredients),
            instructions: split_lines(&self.instructions),
            tags: split_comma_list(&self.tags),
            prep_time_minutes: self.prep_time_minutes.trim().parse().unwrap_or(0),
            cook_time_minutes: self.cook_time_minutes.trim().parse().unwrap_or(0),
            servings: self.servings.trim().parse().unwrap_or(1),
            calories_per_serving: self.calories_per_serving.trim().parse().unwrap_or(0),
            rating: self.rating.trim().parse().unwrap_or(4.5),
            difficulty: parse_difficulty(&self.difficulty)?,
            cuisine: self.cuisine.trim().to_string(),
            image: self.image.trim().to_string(),
            user_id,
        };
        draft.validate()?;
        Ok(draft)
    }
}

fn split_comma_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn split_lines(raw: &str) -> Vec<String> {
    raw.lines()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_difficulty(raw: &str) -> ApiResult<Difficulty> {
    match raw.trim() {
        "" | "Easy" => Ok(Difficulty::Easy),
        "Medium" => Ok(Difficulty::Medium),
        "Hard" => Ok(Difficulty::Hard),
        other => Err(ApiError::Validation(format!(
            "'{other}' is not a difficulty (expected Easy, Medium, or Hard)"
        ))),
    }
}
