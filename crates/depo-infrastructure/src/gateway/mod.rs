//! Backend gateway adapters.
//!
//! `InvokeGateway` maps the typed gateway operations onto named backend
//! commands with JSON arguments; a `CommandTransport` carries them.

pub mod http;
pub mod invoke;
pub mod transport;

pub use http::HttpTransport;
pub use invoke::InvokeGateway;
pub use transport::CommandTransport;
