//! HTTP adapters for the Spotify accounts service and Web API.

pub mod accounts_client;
pub mod authorize;
mod http;
pub mod redirect;
pub mod web_client;

pub use accounts_client::SpotifyAccountsClient;
pub use authorize::AuthorizeRequest;
pub use redirect::parse_redirect;
pub use web_client::SpotifyWebClient;
