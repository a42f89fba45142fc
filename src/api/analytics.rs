//! Statistics and activity log endpoints

use axum::extract::State;

use super::ApiJson;
use crate::{
    models::{envelope::EnvelopeSchema, Activity, Envelope, LibraryStats},
    store::Fields,
};

/// Library statistics
#[utoipa::path(
    get,
    path = "/stats",
    tag = "analytics",
    responses(
        (status = 200, description = "Inventory and user counts", body = EnvelopeSchema),
        (status = 422, description = "Store failure", body = EnvelopeSchema)
    )
)]
pub async fn get_stats(State(state): State<crate::AppState>) -> Envelope<LibraryStats> {
    state.services.analytics.library_stats().await
}

/// Ten most recent activities
#[utoipa::path(
    get,
    path = "/activities/recent",
    tag = "analytics",
    responses(
        (status = 200, description = "Newest first", body = EnvelopeSchema),
        (status = 422, description = "Store failure", body = EnvelopeSchema)
    )
)]
pub async fn recent_activities(State(state): State<crate::AppState>) -> Envelope<Vec<Activity>> {
    state.services.analytics.recent_activities().await
}

/// Log an activity
///
/// The body is a free-form JSON object; `timestamp` is set by the server.
#[utoipa::path(
    post,
    path = "/activities",
    tag = "analytics",
    responses(
        (status = 201, description = "Activity logged, envelope carries its id", body = EnvelopeSchema),
        (status = 422, description = "Store failure", body = EnvelopeSchema)
    )
)]
pub async fn log_activity(
    State(state): State<crate::AppState>,
    ApiJson(fields): ApiJson<Fields>,
) -> Envelope {
    state.services.analytics.log_activity(fields).await
}
