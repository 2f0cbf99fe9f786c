pub mod app_config;
pub mod database;
pub mod document_repo;
pub mod memory;

pub use database::DbClient;
pub use document_repo::PgDocumentStore;
pub use memory::MemoryStore;
