//! Inventory and circulation service

use crate::{
    models::{Book, CreateBook, Envelope},
    repository::Repository,
};

use super::failure;

#[derive(Clone)]
pub struct LibraryService {
    repository: Repository,
}

impl LibraryService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Add a book to the inventory; the envelope carries the new id
    pub async fn add_book(&self, book: CreateBook) -> Envelope {
        match self.repository.books.create(book).await {
            Ok(id) => {
                tracing::info!(id = %id, "Book added");
                Envelope::created(id)
            }
            Err(e) => failure("Error adding book", e),
        }
    }

    /// All available books, by name
    pub async fn list_available_books(&self) -> Envelope<Vec<Book>> {
        match self.repository.books.list_available().await {
            Ok(books) => Envelope::ok(books),
            Err(e) => failure("Error getting books", e),
        }
    }

    /// Borrow a book. Succeeds even when the book is already borrowed.
    pub async fn borrow_book(&self, book_id: &str, user_id: &str) -> Envelope {
        match self.repository.books.borrow(book_id, user_id).await {
            Ok(()) => {
                tracing::info!(id = %book_id, user_id = %user_id, "Book borrowed successfully");
                Envelope::done()
            }
            Err(e) => failure("Error borrowing book", e),
        }
    }

    /// Return a book. Succeeds even when the book was never borrowed.
    pub async fn return_book(&self, book_id: &str) -> Envelope {
        match self.repository.books.return_book(book_id).await {
            Ok(()) => {
                tracing::info!(id = %book_id, "Book returned successfully");
                Envelope::done()
            }
            Err(e) => failure("Error returning book", e),
        }
    }
}
