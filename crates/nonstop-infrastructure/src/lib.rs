pub mod config_service;
pub mod paths;
pub mod secret_service;
pub mod storage;

pub use crate::config_service::ConfigService;
pub use crate::paths::NonstopPaths;
pub use crate::secret_service::SecretServiceImpl;
pub use crate::storage::{FileSecureStore, MemorySecureStore};
