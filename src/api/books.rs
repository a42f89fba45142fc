//! Inventory and circulation endpoints

use axum::extract::{Path, State};
use validator::Validate;

use super::ApiJson;
use crate::{
    error::AppResult,
    models::{envelope::EnvelopeSchema, Book, BorrowBook, CreateBook, Envelope},
};

/// Add a book to the inventory
#[utoipa::path(
    post,
    path = "/books",
    tag = "books",
    request_body = CreateBook,
    responses(
        (status = 201, description = "Book added, envelope carries its id", body = EnvelopeSchema),
        (status = 400, description = "Invalid request"),
        (status = 422, description = "Store failure", body = EnvelopeSchema)
    )
)]
pub async fn add_book(
    State(state): State<crate::AppState>,
    ApiJson(book): ApiJson<CreateBook>,
) -> AppResult<Envelope> {
    book.validate()?;
    Ok(state.services.library.add_book(book).await)
}

/// List available books ordered by name
#[utoipa::path(
    get,
    path = "/books/available",
    tag = "books",
    responses(
        (status = 200, description = "Available books", body = EnvelopeSchema),
        (status = 422, description = "Store failure", body = EnvelopeSchema)
    )
)]
pub async fn list_available_books(State(state): State<crate::AppState>) -> Envelope<Vec<Book>> {
    state.services.library.list_available_books().await
}

/// Borrow a book
#[utoipa::path(
    post,
    path = "/books/{id}/borrow",
    tag = "books",
    params(("id" = String, Path, description = "Book ID")),
    request_body = BorrowBook,
    responses(
        (status = 200, description = "Book borrowed (no availability check)", body = EnvelopeSchema),
        (status = 400, description = "Invalid request"),
        (status = 422, description = "Book missing or store failure", body = EnvelopeSchema)
    )
)]
pub async fn borrow_book(
    State(state): State<crate::AppState>,
    Path(id): Path<String>,
    ApiJson(request): ApiJson<BorrowBook>,
) -> AppResult<Envelope> {
    request.validate()?;
    Ok(state.services.library.borrow_book(&id, &request.user_id).await)
}

/// Return a book
#[utoipa::path(
    post,
    path = "/books/{id}/return",
    tag = "books",
    params(("id" = String, Path, description = "Book ID")),
    responses(
        (status = 200, description = "Book returned", body = EnvelopeSchema),
        (status = 422, description = "Book missing or store failure", body = EnvelopeSchema)
    )
)]
pub async fn return_book(
    State(state): State<crate::AppState>,
    Path(id): Path<String>,
) -> Envelope {
    state.services.library.return_book(&id).await
}
