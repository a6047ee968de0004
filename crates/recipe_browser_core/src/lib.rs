pub mod domain;
pub mod ports;

pub use domain::{
    AuthSession, DeleteReceipt, Difficulty, LoginCredentials, Recipe, RecipeDraft, RecipePage,
    RecipeQuery, SortOrder, User,
};
pub use ports::{ApiError, ApiResult, AuthService, CredentialStore, RecipeService};
