//! Activity log model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::store::Fields;

/// Keys owned by the analytics module; ignored when supplied by callers
pub const ACTIVITY_RESERVED: &[&str] = &["id", "timestamp"];

/// Logged activity
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Activity {
    pub id: String,
    /// Server-side time of logging
    pub timestamp: DateTime<Utc>,
    #[serde(flatten)]
    #[schema(value_type = Object)]
    pub fields: Fields,
}
