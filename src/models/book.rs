//! Book model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::store::Fields;

/// Keys owned by the circulation module; ignored when supplied by callers
pub const BOOK_RESERVED: &[&str] = &[
    "id",
    "createdAt",
    "available",
    "borrowedBy",
    "borrowedAt",
    "returnedAt",
];

/// Book document
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    pub id: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub available: bool,
    /// Id of the current borrower, null while available
    pub borrowed_by: Option<String>,
    pub borrowed_at: Option<DateTime<Utc>>,
    /// Set by the last return; earlier cycles are overwritten
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub returned_at: Option<DateTime<Utc>>,
    /// Free-form catalog fields
    #[serde(flatten)]
    #[schema(value_type = Object)]
    pub fields: Fields,
}

/// Add book request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateBook {
    #[validate(length(min = 1, message = "name must not be empty"))]
    pub name: String,
    #[serde(flatten)]
    #[schema(value_type = Object)]
    pub fields: Fields,
}

/// Borrow request
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BorrowBook {
    #[validate(length(min = 1, message = "userId must not be empty"))]
    pub user_id: String,
}
