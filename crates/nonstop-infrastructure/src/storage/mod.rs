//! Storage layer: atomic files and secure key-value stores.

mod atomic_file;
mod memory_store;
mod secure_file_store;

pub use atomic_file::{AtomicFile, AtomicFileError, FileFormat};
pub use memory_store::MemorySecureStore;
pub use secure_file_store::FileSecureStore;
