//! User profile model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::store::Fields;

/// Keys owned by the profile module; ignored when supplied by callers
pub const PROFILE_RESERVED: &[&str] = &["id", "userId", "createdAt", "updatedAt"];

/// User profile document
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    /// Store-assigned document id
    pub id: String,
    /// Authentication user id (not unique in the store)
    pub user_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Free-form profile fields
    #[serde(flatten)]
    #[schema(value_type = Object)]
    pub fields: Fields,
}

/// Create profile request
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateProfile {
    #[validate(length(min = 1, message = "userId must not be empty"))]
    pub user_id: String,
    #[serde(flatten)]
    #[schema(value_type = Object)]
    pub fields: Fields,
}
