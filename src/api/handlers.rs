//! HTTP Request Handlers
//!
//! Axum handlers for the authentication endpoints. Handlers stay thin:
//! extraction and status-code mapping here, everything else in the service
//! layer.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::{header, HeaderMap, StatusCode},
    Json,
};
use chrono::Utc;

use crate::{
    models::requests::{ConfirmRegisterParams, LoginRequest, RegisterRequest},
    models::TokenPair,
    service::AuthService,
    utils::error::AuthResult,
    VERSION,
};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub auth_service: Arc<AuthService>,
}

/// Health check response payload
#[derive(serde::Serialize)]
pub struct HealthCheckResponse {
    pub status: String,
    pub timestamp: chrono::DateTime<Utc>,
    pub version: String,
}

fn authorization_header(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
}

/// Register a new account
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> AuthResult<StatusCode> {
    state.auth_service.register(request).await?;
    Ok(StatusCode::CREATED)
}

/// Authenticate with email and password
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> AuthResult<Json<TokenPair>> {
    let pair = state.auth_service.login(request).await?;
    Ok(Json(pair))
}

/// Exchange a refresh token for a new access token
pub async fn refresh_token(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> AuthResult<Json<TokenPair>> {
    let pair = state
        .auth_service
        .refresh_token(authorization_header(&headers))
        .await?;
    Ok(Json(pair))
}

/// Invalidate the presented token
pub async fn logout(State(state): State<AppState>, headers: HeaderMap) -> AuthResult<StatusCode> {
    state
        .auth_service
        .logout(authorization_header(&headers))
        .await?;
    Ok(StatusCode::OK)
}

/// Confirm a registration using the emailed link parameters
pub async fn confirm_register(
    State(state): State<AppState>,
    Query(params): Query<ConfirmRegisterParams>,
) -> AuthResult<StatusCode> {
    state
        .auth_service
        .confirm_register(&params.email, &params.code)
        .await?;
    Ok(StatusCode::OK)
}

/// Health check endpoint
pub async fn health_check(
    State(state): State<AppState>,
) -> AuthResult<Json<HealthCheckResponse>> {
    // Check database connectivity
    state.auth_service.health_check().await?;

    Ok(Json(HealthCheckResponse {
        status: "healthy".to_string(),
        timestamp: Utc::now(),
        version: VERSION.to_string(),
    }))
}
