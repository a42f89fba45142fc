//! Navigation check endpoint
//!
//! Lets the client ask the route guard about a target before navigating.

use axum::{
    extract::{Query, State},
    Json,
};
use axum_extra::extract::CookieJar;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::guard::Navigation;

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct NavigationQuery {
    /// Requested client path, with optional query string
    pub path: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct NavigationResponse {
    /// `allowed` or `redirected`
    pub outcome: String,
    /// Login location when redirected
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

impl From<Navigation> for NavigationResponse {
    fn from(navigation: Navigation) -> Self {
        match navigation {
            Navigation::Allowed => Self { outcome: "allowed".to_string(), location: None },
            Navigation::Redirected { location } => Self {
                outcome: "redirected".to_string(),
                location: Some(location),
            },
        }
    }
}

/// Check whether navigating to a client path is allowed
#[utoipa::path(
    get,
    path = "/navigation",
    tag = "navigation",
    params(NavigationQuery),
    responses(
        (status = 200, description = "Guard decision", body = NavigationResponse)
    )
)]
pub async fn check_navigation(
    State(state): State<crate::AppState>,
    jar: CookieJar,
    Query(query): Query<NavigationQuery>,
) -> Json<NavigationResponse> {
    let navigation = state.guard.check(&query.path, &jar);
    Json(navigation.into())
}
