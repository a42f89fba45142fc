//! User profile endpoints

use axum::extract::{Path, State};
use validator::Validate;

use super::ApiJson;
use crate::{
    error::AppResult,
    models::{envelope::EnvelopeSchema, CreateProfile, Envelope, UserProfile},
    store::Fields,
};

/// Create a user profile
#[utoipa::path(
    post,
    path = "/profiles",
    tag = "profiles",
    request_body = CreateProfile,
    responses(
        (status = 201, description = "Profile created, envelope carries its id", body = EnvelopeSchema),
        (status = 400, description = "Invalid request"),
        (status = 422, description = "Store failure", body = EnvelopeSchema)
    )
)]
pub async fn create_profile(
    State(state): State<crate::AppState>,
    ApiJson(request): ApiJson<CreateProfile>,
) -> AppResult<Envelope> {
    request.validate()?;
    Ok(state
        .services
        .profiles
        .create_profile(&request.user_id, request.fields)
        .await)
}

/// Get the profile of an authentication user
#[utoipa::path(
    get,
    path = "/profiles/by-user/{user_id}",
    tag = "profiles",
    params(("user_id" = String, Path, description = "Authentication user ID")),
    responses(
        (status = 200, description = "First matching profile", body = EnvelopeSchema),
        (status = 422, description = "Profile not found or store failure", body = EnvelopeSchema)
    )
)]
pub async fn get_profile(
    State(state): State<crate::AppState>,
    Path(user_id): Path<String>,
) -> Envelope<UserProfile> {
    state.services.profiles.get_profile(&user_id).await
}

/// Merge fields into a profile
///
/// The body is a free-form JSON object of fields to merge.
#[utoipa::path(
    patch,
    path = "/profiles/{id}",
    tag = "profiles",
    params(("id" = String, Path, description = "Profile document ID")),
    responses(
        (status = 200, description = "Profile updated", body = EnvelopeSchema),
        (status = 422, description = "Profile missing or store failure", body = EnvelopeSchema)
    )
)]
pub async fn update_profile(
    State(state): State<crate::AppState>,
    Path(id): Path<String>,
    ApiJson(fields): ApiJson<Fields>,
) -> Envelope {
    state.services.profiles.update_profile(&id, fields).await
}
