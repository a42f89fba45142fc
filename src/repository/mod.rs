//! Repository layer for document store operations

pub mod activities;
pub mod books;
pub mod profiles;

use std::sync::Arc;

use crate::{
    connection::Connection,
    store::{DocumentStore, Fields},
};

/// Main repository struct holding the document store handle
#[derive(Clone)]
pub struct Repository {
    pub store: Arc<dyn DocumentStore>,
    pub profiles: profiles::ProfilesRepository,
    pub books: books::BooksRepository,
    pub activities: activities::ActivitiesRepository,
}

impl Repository {
    /// Create a new repository on the connection's document store
    pub fn new(connection: &Connection) -> Self {
        let store = connection.store.clone();
        Self {
            profiles: profiles::ProfilesRepository::new(store.clone()),
            books: books::BooksRepository::new(store.clone()),
            activities: activities::ActivitiesRepository::new(store.clone()),
            store,
        }
    }
}

/// Drop caller-supplied keys the repository owns
fn without_reserved(mut fields: Fields, reserved: &[&str]) -> Fields {
    for key in reserved {
        fields.remove(*key);
    }
    fields
}
