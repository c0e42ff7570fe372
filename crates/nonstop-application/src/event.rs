//! Events published by the token broker.
//!
//! Listeners (UI shells, the CLI) attach an unbounded channel; nothing is
//! buffered when no listener is attached.

use nonstop_core::{SessionToken, UserNotice};
use tokio::sync::mpsc::UnboundedSender;

#[derive(Debug, Clone, PartialEq)]
pub enum BrokerEvent {
    /// A token was obtained (either flow). Sent exactly once per acquisition.
    TokenAcquired(SessionToken),
    /// The interactive flow ended with a provider error; message verbatim.
    AuthorizationFailed(String),
    /// The client-credentials flow produced no token.
    AppTokenUnavailable(String),
    /// The user token is missing, expired or was rejected.
    ReauthorizationRequired,
    /// Something to show the user.
    Notice(UserNotice),
}

pub type EventSender = UnboundedSender<BrokerEvent>;
