//! Profile handlers
//!
//! - GET   /profile
//! - PATCH /profile

use axum::{extract::State, Json};
use serde::Deserialize;
use validator::Validate;

use converse_auth::AuthUser;
use converse_common::{Result, ValidatedJson};

use crate::api::middleware::AccountsState;
use crate::domain::entities::Profile;

/// Only the display name can change; unknown fields such as `email` are rejected
#[derive(Debug, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct UpdateProfileRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
}

pub async fn get_profile(
    AuthUser(ctx): AuthUser,
    State(state): State<AccountsState>,
) -> Result<Json<Profile>> {
    let profile = state.credentials().profile(ctx.user_id()).await?;
    Ok(Json(profile))
}

pub async fn update_profile(
    AuthUser(ctx): AuthUser,
    State(state): State<AccountsState>,
    ValidatedJson(req): ValidatedJson<UpdateProfileRequest>,
) -> Result<Json<Profile>> {
    let credentials = state.credentials();
    let profile = match req.name {
        Some(name) => credentials.rename(ctx.user_id(), &name).await?,
        None => credentials.profile(ctx.user_id()).await?,
    };
    Ok(Json(profile))
}
