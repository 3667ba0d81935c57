//! # Request Handlers
//!
//! Axum request handlers for the storefront API.
//! Account endpoints live under `/auth/`, catalog and order reads at the root.

use crate::extract::Caller;
use crate::state::AppState;
use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Serialize;
use serde_json::Value;
use shop_auth::TokenPair;
use shop_core::{
    payload::{EMAIL_TAKEN, USERNAME_TAKEN},
    project_all, CategoryRecord, Credentials, FieldErrors, NewUser, OrderRecord, PayloadReader,
    ProductQuery, ProductRecord, Registration, ShopError, ShopResult, User, UserRecord,
};
use tracing::{debug, error, info, instrument};

// =============================================================================
// Request/Response Types
// =============================================================================

/// Returned by register and login
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub user: UserRecord,
    pub refresh: String,
    pub access: String,
}

impl AuthResponse {
    fn new(user: &User, tokens: TokenPair) -> Self {
        Self {
            user: UserRecord::from(user),
            refresh: tokens.refresh,
            access: tokens.access,
        }
    }
}

/// Returned by refresh
#[derive(Debug, Serialize)]
pub struct RefreshResponse {
    pub access: String,
}

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<FieldErrors>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, code: u16) -> Self {
        Self {
            error: error.into(),
            code,
            fields: None,
        }
    }

    pub fn with_fields(mut self, fields: FieldErrors) -> Self {
        self.fields = Some(fields);
        self
    }
}

pub type ApiError = (StatusCode, Json<ErrorResponse>);

pub type ApiResult<T> = Result<Json<T>, ApiError>;

pub fn shop_error_to_response(err: ShopError) -> ApiError {
    let code = err.status_code();
    if err.is_server_error() {
        error!("Request failed: {}", err);
    }

    let mut response = ErrorResponse::new(err.to_string(), code);
    if let Some(fields) = err.field_errors() {
        response = response.with_fields(fields.clone());
    }
    (
        StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
        Json(response),
    )
}

/// Unreadable bodies are treated as `null` so the payload readers report
/// them the same way as a wrong shape.
fn body_or_null(body: Result<Json<Value>, JsonRejection>) -> Value {
    match body {
        Ok(Json(value)) => value,
        Err(rejection) => {
            debug!("Unreadable request body: {}", rejection);
            Value::Null
        }
    }
}

/// Unreadable query strings filter nothing rather than failing the listing.
fn query_or_empty(query: Result<Query<Vec<(String, String)>>, QueryRejection>) -> ProductQuery {
    match query {
        Ok(Query(pairs)) => pairs.into_iter().collect(),
        Err(rejection) => {
            debug!("Unreadable query string: {}", rejection);
            ProductQuery::default()
        }
    }
}

// =============================================================================
// Handlers
// =============================================================================

/// Health check endpoint
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "storefront",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Register a new customer and sign them in
#[instrument(skip(state, body))]
pub async fn register(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> ApiResult<AuthResponse> {
    register_internal(&state, body_or_null(body))
        .await
        .map(Json)
        .map_err(shop_error_to_response)
}

async fn register_internal(state: &AppState, payload: Value) -> ShopResult<AuthResponse> {
    let registration = Registration::from_payload(&payload).map_err(ShopError::Validation)?;

    let mut taken = FieldErrors::new();
    if state.store.username_taken(&registration.username).await? {
        taken.add("username", USERNAME_TAKEN);
    }
    if state.store.email_taken(&registration.email).await? {
        taken.add("email", EMAIL_TAKEN);
    }
    taken.into_result()?;

    let password_hash = state.hasher.hash(&registration.password).await?;
    let new_user = NewUser::customer(registration.username, registration.email, password_hash)
        .with_name(registration.first_name, registration.last_name)
        .with_contact(registration.phone, registration.address);

    // The store re-checks uniqueness, which covers a concurrent duplicate
    let user = state.store.create_user(new_user).await?;
    let tokens = state.tokens.issue_pair(user.id)?;

    info!(user_id = user.id, "Registered {}", user.username);
    Ok(AuthResponse::new(&user, tokens))
}

/// Exchange credentials for a token pair
#[instrument(skip(state, body))]
pub async fn login(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> ApiResult<AuthResponse> {
    login_internal(&state, body_or_null(body))
        .await
        .map(Json)
        .map_err(shop_error_to_response)
}

async fn login_internal(state: &AppState, payload: Value) -> ShopResult<AuthResponse> {
    let credentials = Credentials::from_payload(&payload).ok_or(ShopError::InvalidCredentials)?;

    let Some(user) = state.store.user_by_username(&credentials.username).await? else {
        // Spend the same hashing work as a real check
        state.hasher.hash(&credentials.password).await?;
        debug!("Login rejected: unknown user");
        return Err(ShopError::InvalidCredentials);
    };

    if !state
        .hasher
        .verify(&credentials.password, &user.password_hash)
        .await?
    {
        debug!(user_id = user.id, "Login rejected: wrong password");
        return Err(ShopError::InvalidCredentials);
    }

    if !user.is_active {
        debug!(user_id = user.id, "Login rejected: inactive user");
        return Err(ShopError::InvalidCredentials);
    }

    let tokens = state.tokens.issue_pair(user.id)?;
    info!(user_id = user.id, "Logged in");
    Ok(AuthResponse::new(&user, tokens))
}

/// Issue a new access token from a refresh token
#[instrument(skip(state, body))]
pub async fn refresh(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> ApiResult<RefreshResponse> {
    let payload = body_or_null(body);
    let mut reader = PayloadReader::new(&payload);
    let token = reader.required("refresh");

    let result = match token {
        Some(token) => state.tokens.refresh_access(&token),
        None => Err(ShopError::Validation(reader.into_errors())),
    };

    result
        .map(|access| Json(RefreshResponse { access }))
        .map_err(shop_error_to_response)
}

/// The caller's own user record
#[instrument(skip(caller), fields(user_id = caller.id()))]
pub async fn profile(caller: Caller) -> Json<UserRecord> {
    Json(UserRecord::from(&caller.user))
}

/// List active products, optionally filtered by category slug and name
#[instrument(skip(state))]
pub async fn list_products(
    State(state): State<AppState>,
    query: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> ApiResult<Vec<ProductRecord>> {
    let query = query_or_empty(query);
    let products = state
        .store
        .products(&query.to_filter())
        .await
        .map_err(shop_error_to_response)?;

    Ok(Json(project_all(&products)))
}

/// Get an active product by slug
#[instrument(skip(state))]
pub async fn get_product(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> ApiResult<ProductRecord> {
    let product = state
        .store
        .active_product_by_slug(&slug)
        .await
        .map_err(shop_error_to_response)?
        .ok_or_else(|| shop_error_to_response(ShopError::not_found("Product", slug)))?;

    Ok(Json(ProductRecord::from(&product)))
}

/// List all categories
#[instrument(skip(state))]
pub async fn list_categories(State(state): State<AppState>) -> ApiResult<Vec<CategoryRecord>> {
    let categories = state
        .store
        .categories()
        .await
        .map_err(shop_error_to_response)?;

    Ok(Json(project_all(&categories)))
}

/// The caller's orders, newest first
#[instrument(skip(state, caller), fields(user_id = caller.id()))]
pub async fn list_orders(
    State(state): State<AppState>,
    caller: Caller,
) -> ApiResult<Vec<OrderRecord>> {
    let orders = state
        .store
        .orders_for_user(caller.id())
        .await
        .map_err(shop_error_to_response)?;

    Ok(Json(project_all(&orders)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_carries_fields() {
        let err = ShopError::invalid_field("username", USERNAME_TAKEN);
        let (status, Json(body)) = shop_error_to_response(err);

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body.code, 400);
        let fields = body.fields.unwrap();
        assert_eq!(fields.get("username"), Some(&[USERNAME_TAKEN.to_string()][..]));
    }

    #[test]
    fn test_auth_errors_have_no_fields() {
        let (status, Json(body)) = shop_error_to_response(ShopError::InvalidCredentials);
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body.error, "Invalid credentials");
        assert!(body.fields.is_none());

        let json = serde_json::to_value(&body).unwrap();
        assert!(json.get("fields").is_none());
    }

    #[test]
    fn test_not_found_maps_to_404() {
        let (status, _) = shop_error_to_response(ShopError::not_found("Product", "nope"));
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_internal_maps_to_500() {
        let (status, Json(body)) = shop_error_to_response(ShopError::Internal("boom".into()));
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body.code, 500);
    }

    #[test]
    fn test_unreadable_body_reads_as_null() {
        let body = serde_json::json!({"a": 1});
        assert_eq!(body_or_null(Ok(Json(body.clone()))), body);
    }

    #[test]
    fn test_repeated_query_params_keep_last() {
        let pairs = vec![
            ("category".to_string(), "laptops".to_string()),
            ("category".to_string(), "phones".to_string()),
        ];
        let query = query_or_empty(Ok(Query(pairs)));
        assert_eq!(query.category.as_deref(), Some("phones"));
        assert_eq!(query.search, None);
    }
}
