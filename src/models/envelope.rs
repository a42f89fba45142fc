//! Result envelope returned by every data-access operation
//!
//! `{success: true, data?, id?}` or `{success: false, error}`. It is the only
//! way failures leave the data-access layer.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Serialize, Serializer};
use utoipa::ToSchema;

use crate::error::AppError;

#[derive(Debug, Clone, PartialEq)]
pub enum Envelope<T = ()> {
    Success { data: Option<T>, id: Option<String> },
    Failure { error: String },
}

impl<T> Envelope<T> {
    pub fn ok(data: T) -> Self {
        Envelope::Success { data: Some(data), id: None }
    }

    /// Success carrying the id of a newly created document
    pub fn created(id: String) -> Self {
        Envelope::Success { data: None, id: Some(id) }
    }

    /// Success without payload
    pub fn done() -> Self {
        Envelope::Success { data: None, id: None }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Envelope::Failure { error: error.into() }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Envelope::Success { .. })
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            Envelope::Success { data, .. } => data.as_ref(),
            Envelope::Failure { .. } => None,
        }
    }

    pub fn into_data(self) -> Option<T> {
        match self {
            Envelope::Success { data, .. } => data,
            Envelope::Failure { .. } => None,
        }
    }

    pub fn id(&self) -> Option<&str> {
        match self {
            Envelope::Success { id, .. } => id.as_deref(),
            Envelope::Failure { .. } => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Envelope::Success { .. } => None,
            Envelope::Failure { error } => Some(error),
        }
    }
}

impl<T> From<AppError> for Envelope<T> {
    fn from(error: AppError) -> Self {
        Envelope::failed(error.message())
    }
}

#[derive(Serialize)]
struct Wire<'a, T> {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<&'a T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<&'a str>,
}

impl<T: Serialize> Serialize for Envelope<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let wire = match self {
            Envelope::Success { data, id } => Wire {
                success: true,
                data: data.as_ref(),
                id: id.as_deref(),
                error: None,
            },
            Envelope::Failure { error } => Wire {
                success: false,
                data: None,
                id: None,
                error: Some(error.as_str()),
            },
        };
        wire.serialize(serializer)
    }
}

impl<T: Serialize> IntoResponse for Envelope<T> {
    fn into_response(self) -> Response {
        let status = match &self {
            Envelope::Success { id: Some(_), .. } => StatusCode::CREATED,
            Envelope::Success { .. } => StatusCode::OK,
            Envelope::Failure { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        };
        (status, Json(self)).into_response()
    }
}

/// Wire shape of [`Envelope`], for API documentation
#[derive(ToSchema)]
pub struct EnvelopeSchema {
    pub success: bool,
    /// Operation payload, when the operation returns one
    #[schema(value_type = Object)]
    pub data: Option<serde_json::Value>,
    /// Id of the created document
    pub id: Option<String>,
    /// Failure message
    pub error: Option<String>,
}
