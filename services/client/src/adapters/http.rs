//! services/client/src/adapters/http.rs
//!
//! This module contains the HTTP adapter, the concrete implementation of the
//! `RecipeService` and `AuthService` ports from the `core` crate. It handles
//! all interactions with the remote recipe service using `reqwest`: request
//! construction, bearer-token injection, and mapping of transport and status
//! failures into the typed error taxonomy. It never retries; resubmission is
//! the caller's decision.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use recipe_browser_core::domain::{
    AuthSession, DeleteReceipt, LoginCredentials, Recipe, RecipeDraft, RecipePage, RecipeQuery,
    User,
};
use recipe_browser_core::ports::{ApiError, ApiResult, AuthService, RecipeService};
use reqwest::{Client, RequestBuilder, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::session::SessionStore;

const REQUEST_TIMEOUT_SECONDS: u64 = 30;

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An adapter that talks to the remote recipe service over HTTP.
///
/// Every request attaches `Authorization: Bearer <token>` when the session
/// store currently holds a token.
pub struct HttpApiAdapter {
    client: Client,
    base_url: String,
    session: Arc<SessionStore>,
}

impl HttpApiAdapter {
    /// Creates a new `HttpApiAdapter` with an explicit request timeout.
    pub fn new(base_url: String, session: Arc<SessionStore>) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECONDS))
            .build()?;
        Ok(Self {
            client,
            base_url,
            session,
        })
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match self.session.token() {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// Sends the request and decodes a 2xx JSON body into `T`. A 404 becomes
    /// `NotFound` when `not_found` names the missing resource, any other
    /// non-2xx becomes `Http` with the server's message.
    async fn execute<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        not_found: Option<String>,
    ) -> ApiResult<T> {
        let response = self
            .authorize(request)
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        if !status.is_success() {
            return Err(map_status_error(status, &body, not_found.as_deref()));
        }

        serde_json::from_slice(&body).map_err(|e| ApiError::Http {
            status: status.as_u16(),
            message: format!("invalid response payload: {e}"),
        })
    }
}

//=========================================================================================
// URL Construction
//=========================================================================================

/// Builds the listing URL for `query`.
///
/// A non-empty `search` routes to `/recipes/search`; that endpoint ignores
/// `sortBy`/`order` server-side, so they are never sent in search mode.
/// Otherwise `/recipes` is used and sort parameters are appended only when a
/// sort field is active.
fn listing_url(base_url: &str, query: &RecipeQuery) -> ApiResult<Url> {
    let (path, search) = if query.search.is_empty() {
        ("/recipes", None)
    } else {
        ("/recipes/search", Some(query.search.as_str()))
    };

    let mut url = parse_url(&format!("{base_url}{path}"))?;
    {
        let mut pairs = url.query_pairs_mut();
        if let Some(q) = search {
            pairs.append_pair("q", q);
        }
        pairs.append_pair("limit", &query.limit.to_string());
        pairs.append_pair("skip", &query.skip.to_string());
        if search.is_none() && !query.sort_by.is_empty() {
            pairs.append_pair("sortBy", &query.sort_by);
            pairs.append_pair("order", query.order.as_str());
        }
    }
    Ok(url)
}

fn parse_url(raw: &str) -> ApiResult<Url> {
    Url::parse(raw).map_err(|e| ApiError::Network(format!("invalid request URL {raw}: {e}")))
}

//=========================================================================================
// Error Mapping
//=========================================================================================

fn map_transport_error(error: reqwest::Error) -> ApiError {
    ApiError::Network(error.to_string())
}

fn map_status_error(status: StatusCode, body: &[u8], not_found: Option<&str>) -> ApiError {
    if status == StatusCode::NOT_FOUND {
        if let Some(what) = not_found {
            return ApiError::NotFound(what.to_string());
        }
    }
    ApiError::Http {
        status: status.as_u16(),
        message: extract_message(body),
    }
}

/// Pulls the server's `{"message": ...}` out of an error body, falling back
/// to the raw text when the body is not the usual JSON shape.
fn extract_message(body: &[u8]) -> String {
    #[derive(Deserialize)]
    struct ErrorBody {
        message: String,
    }

    if let Ok(parsed) = serde_json::from_slice::<ErrorBody>(body) {
        return parsed.message;
    }
    let raw = String::from_utf8_lossy(body).trim().to_string();
    if raw.is_empty() {
        "request failed".to_string()
    } else {
        raw
    }
}

//=========================================================================================
// "Impure" Wire Record Structs
//=========================================================================================

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct LoginResponseRecord {
    id: u64,
    username: String,
    email: String,
    first_name: String,
    last_name: String,
    gender: String,
    image: String,
    access_token: String,
    refresh_token: String,
}

impl LoginResponseRecord {
    fn to_domain(self) -> AuthSession {
        AuthSession {
            user: User {
                id: self.id,
                username: self.username,
                email: self.email,
                first_name: self.first_name,
                last_name: self.last_name,
                gender: self.gender,
                image: self.image,
                role: None,
            },
            access_token: self.access_token,
            refresh_token: self.refresh_token,
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct DeleteReceiptRecord {
    is_deleted: bool,
    deleted_on: DateTime<Utc>,
}

impl DeleteReceiptRecord {
    fn to_domain(self) -> DeleteReceipt {
        DeleteReceipt {
            is_deleted: self.is_deleted,
            deleted_on: self.deleted_on,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RefreshRequestBody<'a> {
    refresh_token: &'a str,
}

//=========================================================================================
// `RecipeService` Trait Implementation
//=========================================================================================

#[async_trait]
impl RecipeService for HttpApiAdapter {
    async fn list_recipes(&self, query: &RecipeQuery) -> ApiResult<RecipePage> {
        let url = listing_url(&self.base_url, query)?;
        debug!("GET {url}");
        self.execute(self.client.get(url), None).await
    }

    async fn get_recipe(&self, id: u64) -> ApiResult<Recipe> {
        let url = parse_url(&format!("{}/recipes/{id}", self.base_url))?;
        debug!("GET {url}");
        self.execute(self.client.get(url), Some(format!("Recipe {id} not found")))
            .await
    }

    async fn create_recipe(&self, draft: &RecipeDraft) -> ApiResult<Recipe> {
        draft.validate()?;
        let url = parse_url(&format!("{}/recipes/add", self.base_url))?;
        debug!("POST {url}");
        self.execute(self.client.post(url).json(draft), None).await
    }

    async fn update_recipe(&self, id: u64, draft: &RecipeDraft) -> ApiResult<Recipe> {
        draft.validate()?;
        let url = parse_url(&format!("{}/recipes/{id}", self.base_url))?;
        debug!("PUT {url}");
        self.execute(
            self.client.put(url).json(draft),
            Some(format!("Recipe {id} not found")),
        )
        .await
    }

    async fn delete_recipe(&self, id: u64) -> ApiResult<DeleteReceipt> {
        let url = parse_url(&format!("{}/recipes/{id}", self.base_url))?;
        debug!("DELETE {url}");
        let record: DeleteReceiptRecord = self
            .execute(
                self.client.delete(url),
                Some(format!("Recipe {id} not found")),
            )
            .await?;
        Ok(record.to_domain())
    }
}

//=========================================================================================
// `AuthService` Trait Implementation
//=========================================================================================

#[async_trait]
impl AuthService for HttpApiAdapter {
    async fn login(&self, credentials: &LoginCredentials) -> ApiResult<AuthSession> {
        let url = parse_url(&format!("{}/auth/login", self.base_url))?;
        debug!("POST {url}");
        let record: LoginResponseRecord = self
            .execute(self.client.post(url).json(credentials), None)
            .await?;
        Ok(record.to_domain())
    }

    async fn current_user(&self) -> ApiResult<User> {
        let url = parse_url(&format!("{}/auth/me", self.base_url))?;
        debug!("GET {url}");
        self.execute(self.client.get(url), None).await
    }

    async fn refresh(&self, refresh_token: &str) -> ApiResult<AuthSession> {
        let url = parse_url(&format!("{}/auth/refresh", self.base_url))?;
        debug!("POST {url}");
        let body = RefreshRequestBody { refresh_token };
        let record: LoginResponseRecord = self
            .execute(self.client.post(url).json(&body), None)
            .await?;
        Ok(record.to_domain())
    }
}
