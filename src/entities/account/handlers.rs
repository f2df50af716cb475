//! Registration, login and profile handlers

use super::model::{LoginRequest, RegisterRequest, UpdateProfile, User};
use crate::core::auth::{AccessGate, Operation, Resource};
use crate::core::error::{AuthError, CatalogError, FieldErrors, Result};
use crate::core::extractors::Caller;
use crate::core::password::{hash_password, verify_password};
use crate::core::validation::ValidatedJson;
use crate::serialization::{ProfileView, UserView};
use crate::server::host::ServerHost;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde_json::json;

/// Create an account
///
/// Passwords are checked for equality first, then against the password
/// policy, and only then hashed. Neither password field is ever echoed back.
pub async fn register(
    State(host): State<ServerHost>,
    payload: std::result::Result<ValidatedJson<RegisterRequest>, CatalogError>,
) -> Result<impl IntoResponse> {
    let ValidatedJson(registration) = payload?;

    let mut errors = FieldErrors::new();
    if !registration.passwords_match() {
        errors.add("password_confirmation", "do not match");
    } else if let Err(problems) = host.password_policy.validate(
        &registration.password,
        Some(&registration.username),
        Some(&registration.email),
    ) {
        for problem in problems {
            errors.add("password", problem);
        }
    }
    errors.into_result()?;

    let password = registration.password.clone();
    let password_hash = tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(|e| CatalogError::Internal(format!("hashing task failed: {}", e)))??;

    let user = host.users.create(User::new(registration, password_hash)).await?;
    tracing::info!(user_id = %user.id, username = %user.username, "user registered");

    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Registration Successful" })),
    ))
}

/// Exchange email and password for a session token
///
/// An unknown email and a wrong password fail identically.
pub async fn login(
    State(host): State<ServerHost>,
    payload: std::result::Result<ValidatedJson<LoginRequest>, CatalogError>,
) -> Result<impl IntoResponse> {
    let ValidatedJson(credentials) = payload?;

    let Some(user) = host.accounts.find_by_email(&credentials.email).await? else {
        tracing::warn!(email = %credentials.email, "login failed: unknown email");
        return Err(AuthError::InvalidCredentials.into());
    };

    let password = credentials.password;
    let stored = user.password_hash.clone();
    let verified = tokio::task::spawn_blocking(move || verify_password(&password, &stored))
        .await
        .map_err(|e| CatalogError::Internal(format!("verification task failed: {}", e)))?;

    if !verified {
        tracing::warn!(user_id = %user.id, "login failed: wrong password");
        return Err(AuthError::InvalidCredentials.into());
    }

    let issued = host.tokens.issue(user.id)?;
    tracing::info!(user_id = %user.id, expires_at = %issued.expires_at, "login succeeded");

    Ok(Json(json!({
        "token": issued.token,
        "message": format!("Welcome back {}", user.username),
    })))
}

/// The caller's public user record
pub async fn current_user(
    State(host): State<ServerHost>,
    Caller(ctx): Caller,
) -> Result<impl IntoResponse> {
    AccessGate::authorize(&ctx, Resource::Profile, Operation::Read, None)?;
    let user_id = ctx.require_user()?;

    let user = host.users.fetch(&user_id).await?;
    host.accounts.profile(&user_id).await?;

    Ok(Json(UserView::from(&user)))
}

pub async fn get_profile(
    State(host): State<ServerHost>,
    Caller(ctx): Caller,
) -> Result<impl IntoResponse> {
    AccessGate::authorize(&ctx, Resource::Profile, Operation::Read, None)?;
    let user_id = ctx.require_user()?;

    let profile = host.accounts.profile(&user_id).await?;
    Ok(Json(ProfileView::from(&profile)))
}

/// Partially update the caller's profile
pub async fn update_profile(
    State(host): State<ServerHost>,
    Caller(ctx): Caller,
    payload: std::result::Result<ValidatedJson<UpdateProfile>, CatalogError>,
) -> Result<impl IntoResponse> {
    AccessGate::authorize(&ctx, Resource::Profile, Operation::Update, None)?;
    let user_id = ctx.require_user()?;
    let ValidatedJson(changes) = payload?;

    let profile = host.accounts.update_profile(&user_id, &changes).await?;
    Ok(Json(ProfileView::from(&profile)))
}
