pub mod config;
pub mod error;
pub mod notice;
pub mod secret;
pub mod secure_store;
pub mod spotify;
pub mod token;

// Re-export common types
pub use error::{NonstopError, Result};
pub use notice::UserNotice;
pub use token::{SessionToken, TokenKind};
