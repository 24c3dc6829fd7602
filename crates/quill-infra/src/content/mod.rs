//! Content store adapters that need no database.

mod http;
mod memory;

pub use http::{HttpPostRepository, HttpStoreConfig};
pub use memory::InMemoryPostRepository;
