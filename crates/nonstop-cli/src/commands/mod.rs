pub mod app_token;
pub mod catalog;
pub mod session;
