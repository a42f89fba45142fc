//! Books repository (inventory and circulation)

use std::sync::Arc;

use chrono::Utc;
use serde_json::Value;

use super::without_reserved;
use crate::{
    error::AppResult,
    models::book::{Book, CreateBook, BOOK_RESERVED},
    store::{timestamp, Direction, Document, DocumentStore, Fields, Query, BOOKS},
};

#[derive(Clone)]
pub struct BooksRepository {
    store: Arc<dyn DocumentStore>,
}

impl BooksRepository {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Insert a book, available and without borrower
    pub async fn create(&self, book: CreateBook) -> AppResult<String> {
        let mut doc = without_reserved(book.fields, BOOK_RESERVED);
        doc.insert("name".to_string(), Value::String(book.name));
        doc.insert("createdAt".to_string(), timestamp(Utc::now()));
        doc.insert("available".to_string(), Value::Bool(true));
        doc.insert("borrowedBy".to_string(), Value::Null);
        doc.insert("borrowedAt".to_string(), Value::Null);

        self.store.add(BOOKS, doc).await
    }

    /// Available books ordered by name
    pub async fn list_available(&self) -> AppResult<Vec<Book>> {
        let query = Query::collection(BOOKS)
            .where_eq("available", true)
            .order_by("name", Direction::Asc);

        self.store
            .query(&query)
            .await?
            .into_iter()
            .map(Document::decode)
            .collect()
    }

    /// Mark a book as borrowed by `user_id`.
    // NOTE: blind overwrite. Availability is not checked first and there is no
    // conditional write, so a borrowed book can be borrowed again (the last
    // writer wins) and concurrent borrow/return calls on one id interleave.
    pub async fn borrow(&self, book_id: &str, user_id: &str) -> AppResult<()> {
        let mut changes = Fields::new();
        changes.insert("available".to_string(), Value::Bool(false));
        changes.insert("borrowedBy".to_string(), Value::String(user_id.to_string()));
        changes.insert("borrowedAt".to_string(), timestamp(Utc::now()));

        self.store.update(BOOKS, book_id, changes).await
    }

    /// Reset a book to available, whoever (if anyone) holds it
    pub async fn return_book(&self, book_id: &str) -> AppResult<()> {
        let mut changes = Fields::new();
        changes.insert("available".to_string(), Value::Bool(true));
        changes.insert("borrowedBy".to_string(), Value::Null);
        changes.insert("borrowedAt".to_string(), Value::Null);
        changes.insert("returnedAt".to_string(), timestamp(Utc::now()));

        self.store.update(BOOKS, book_id, changes).await
    }

    /// Every book document, undecoded
    pub async fn all(&self) -> AppResult<Vec<Document>> {
        self.store.query(&Query::collection(BOOKS)).await
    }
}
