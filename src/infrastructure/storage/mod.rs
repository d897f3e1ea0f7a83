pub mod db;
pub mod memory;

pub use db::SqliteDocument;
pub use memory::MemoryDocument;
