pub mod config;
pub mod error;
pub mod types;

pub use config::{BridgeConfig, CliArgs};
pub use error::{BridgeError, Result};
