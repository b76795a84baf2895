pub mod manager;
pub mod memory;
pub mod models;
pub mod repository;

pub use manager::{DatabaseError, DatabaseManager};
pub use memory::{Fixture, MemoryRepository};
pub use repository::{PaasRepository, PgRepository};
