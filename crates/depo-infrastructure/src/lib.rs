//! Infrastructure adapters for depo: backend gateway, configuration and paths.

pub mod config_service;
pub mod gateway;
pub mod paths;

pub use config_service::ConfigService;
pub use gateway::{CommandTransport, HttpTransport, InvokeGateway};
pub use paths::DepoPaths;
