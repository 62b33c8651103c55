pub mod manager;
pub mod models;
pub mod postgres;
pub mod repository;
pub mod store;

pub use manager::{DatabaseError, DatabaseManager};
pub use postgres::PgDocumentStore;
pub use repository::{Document, Repository};
pub use store::{DocumentStore, MemoryDocumentStore};
