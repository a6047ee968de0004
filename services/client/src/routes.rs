//! services/client/src/routes.rs
//!
//! The routing surface exposed to the presentation layer: the named views
//! and the authentication guard on the dashboard. Resolving a route is a
//! pure function over the session store's selectors.

use crate::session::SessionStore;

/// The named views of the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Home,
    Login,
    Register,
    Dashboard,
    RecipeDetail(u64),
}

impl Route {
    /// Parses a path into a route, or `None` for unknown paths.
    pub fn parse(path: &str) -> Option<Self> {
        match path {
            "/" => Some(Route::Home),
            "/login" => Some(Route::Login),
            "/register" => Some(Route::Register),
            "/dashboard" => Some(Route::Dashboard),
            _ => {
                let id = path.strip_prefix("/recipe/")?;
                id.parse().ok().map(Route::RecipeDetail)
            }
        }
    }

    pub fn path(&self) -> String {
        match self {
            Route::Home => "/".to_string(),
            Route::Login => "/login".to_string(),
            Route::Register => "/register".to_string(),
            Route::Dashboard => "/dashboard".to_string(),
            Route::RecipeDetail(id) => format!("/recipe/{id}"),
        }
    }
}

/// Outcome of resolving a route against the current session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    Allow(Route),
    RedirectToLogin,
}

/// Applies the auth guard: the dashboard requires an authenticated session,
/// everything else is public.
pub fn resolve(route: Route, session: &SessionStore) -> Resolution {
    match route {
        Route::Dashboard if !session.is_authenticated() => Resolution::RedirectToLogin,
        allowed => Resolution::Allow(allowed),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::storage::MemoryCredentialStore;
    use recipe_browser_core::domain::User;
    use std::sync::Arc;

    fn session() -> SessionStore {
        SessionStore::hydrate(Arc::new(MemoryCredentialStore::new()))
    }

    fn user() -> User {
        User {
            id: 1,
            username: "emilys".to_string(),
            email: "emily@example.com".to_string(),
            first_name: "Emily".to_string(),
            last_name: "Johnson".to_string(),
            gender: "female".to_string(),
            image: String::new(),
            role: None,
        }
    }

    #[test]
    fn parses_the_named_views() {
        assert_eq!(Route::parse("/"), Some(Route::Home));
        assert_eq!(Route::parse("/login"), Some(Route::Login));
        assert_eq!(Route::parse("/register"), Some(Route::Register));
        assert_eq!(Route::parse("/dashboard"), Some(Route::Dashboard));
        assert_eq!(Route::parse("/recipe/42"), Some(Route::RecipeDetail(42)));
        assert_eq!(Route::parse("/recipe/pasta"), None);
        assert_eq!(Route::parse("/nowhere"), None);
    }

    #[test]
    fn dashboard_redirects_anonymous_visitors() {
        let session = session();
        assert_eq!(resolve(Route::Dashboard, &session), Resolution::RedirectToLogin);
        assert_eq!(resolve(Route::Home, &session), Resolution::Allow(Route::Home));
    }

    #[test]
    fn dashboard_admits_authenticated_sessions() {
        let session = session();
        session.set_credentials(user(), "tok", "ref");
        assert_eq!(
            resolve(Route::Dashboard, &session),
            Resolution::Allow(Route::Dashboard)
        );
    }
}
