//! Credential and session handlers
//!
//! - POST /auth/register
//! - POST /auth/login
//! - POST /auth/logout
//! - GET  /auth/authenticated
//! - POST /auth/forgot-password
//! - POST /auth/reset-password
//! - POST /auth/resend-verification-email
//! - GET  /auth/verify-email/{id}

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use axum_extra::extract::cookie::SignedCookieJar;
use serde::Deserialize;
use validator::Validate;

use converse_auth::AuthUser;
use converse_common::validation::{email_rule, non_blank_rule, password_rule, reset_token_rule};
use converse_common::{ObjectId, Result, ValidatedJson};

use super::MessageResponse;
use crate::api::middleware::AccountsState;

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(max = 100), custom(function = "non_blank_rule"))]
    pub name: String,

    #[validate(custom(function = "email_rule"))]
    pub email: String,

    #[validate(custom(function = "password_rule"))]
    pub password: String,
}

/// Login applies the same email and password rules as registration
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(custom(function = "email_rule"))]
    pub email: String,

    #[validate(custom(function = "password_rule"))]
    pub password: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct ForgotPasswordRequest {
    #[validate(custom(function = "email_rule"))]
    pub email: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct ResetPasswordRequest {
    #[validate(custom(function = "reset_token_rule"))]
    pub token: String,

    #[validate(custom(function = "password_rule"))]
    pub password: String,
}

pub async fn register(
    State(state): State<AccountsState>,
    ValidatedJson(req): ValidatedJson<RegisterRequest>,
) -> Result<(StatusCode, Json<MessageResponse>)> {
    state
        .credentials()
        .register(&req.name, &req.email, &req.password)
        .await?;

    Ok((StatusCode::CREATED, Json(MessageResponse::new("User created."))))
}

pub async fn login(
    State(state): State<AccountsState>,
    ValidatedJson(req): ValidatedJson<LoginRequest>,
) -> Result<(SignedCookieJar, Json<MessageResponse>)> {
    let (_, jar) = state.credentials().login(&req.email, &req.password).await?;

    Ok((jar, Json(MessageResponse::new("Logged in successfully."))))
}

pub async fn logout(
    AuthUser(ctx): AuthUser,
    State(state): State<AccountsState>,
) -> (SignedCookieJar, Json<MessageResponse>) {
    tracing::info!(user_id = %ctx.user_id(), "User logged out");
    (
        state.credentials().logout(),
        Json(MessageResponse::new("Logged out successfully.")),
    )
}

pub async fn authenticated(AuthUser(_): AuthUser) -> Json<MessageResponse> {
    Json(MessageResponse::new("Authenticated."))
}

pub async fn forgot_password(
    State(state): State<AccountsState>,
    ValidatedJson(req): ValidatedJson<ForgotPasswordRequest>,
) -> Result<Json<MessageResponse>> {
    state.credentials().forgot_password(&req.email).await?;

    Ok(Json(MessageResponse::new("Password reset email sent.")))
}

pub async fn reset_password(
    State(state): State<AccountsState>,
    ValidatedJson(req): ValidatedJson<ResetPasswordRequest>,
) -> Result<Json<MessageResponse>> {
    state
        .credentials()
        .reset_password(&req.token, &req.password)
        .await?;

    Ok(Json(MessageResponse::new("Password reset successfully.")))
}

pub async fn resend_verification_email(
    AuthUser(ctx): AuthUser,
    State(state): State<AccountsState>,
) -> Result<Json<MessageResponse>> {
    state.credentials().resend_verification(ctx.user_id()).await?;

    Ok(Json(MessageResponse::new("Verification email sent.")))
}

pub async fn verify_email(
    State(state): State<AccountsState>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>> {
    let user_id = ObjectId::parse(&id)?;
    state.credentials().verify_email(user_id).await?;

    Ok(Json(MessageResponse::new("Email verified.")))
}
