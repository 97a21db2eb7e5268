pub mod memory;
pub mod mysql;

pub use memory::InMemoryLinkStore;
pub use mysql::MySqlLinkStore;
pub use snaplink_core::{LinkStore, StorageError};
