pub mod catalog_service;
pub mod event;
pub mod session_service;
pub mod token_broker;

#[cfg(test)]
mod test_support;

pub use catalog_service::CatalogService;
pub use event::{BrokerEvent, EventSender};
pub use session_service::{SessionService, SessionStatus};
pub use token_broker::TokenBroker;
