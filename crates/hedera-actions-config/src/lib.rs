//! Hedera Actions Config
//!
//! Serializable configuration types for hedera-actions. These represent the
//! settings file, the operator credentials and the action definitions a host
//! hands to the runtime before anything is resolved or executed.
//!
//! Configuration can be loaded from:
//! - JSON files (via CLI with `--config=config.json`)
//! - Environment variables (credentials only)

mod action;
mod credentials;
mod error;
mod input;
mod network;
mod settings;

pub use action::ActionDef;
pub use credentials::Credentials;
pub use error::ConfigError;
pub use input::InputValue;
pub use network::Network;
pub use settings::{Settings, WatchSettings};
