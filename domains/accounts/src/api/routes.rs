//! Route definitions for Accounts domain API

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{auth, profile};
use super::middleware::AccountsState;

/// Credential and session routes
fn auth_routes() -> Router<AccountsState> {
    Router::new()
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/auth/logout", post(auth::logout))
        .route("/auth/authenticated", get(auth::authenticated))
        .route("/auth/forgot-password", post(auth::forgot_password))
        .route("/auth/reset-password", post(auth::reset_password))
        .route(
            "/auth/resend-verification-email",
            post(auth::resend_verification_email),
        )
        .route("/auth/verify-email/{id}", get(auth::verify_email))
}

fn profile_routes() -> Router<AccountsState> {
    Router::new().route(
        "/profile",
        get(profile::get_profile).patch(profile::update_profile),
    )
}

/// Create all Accounts domain API routes
pub fn routes() -> Router<AccountsState> {
    Router::new().merge(auth_routes()).merge(profile_routes())
}
