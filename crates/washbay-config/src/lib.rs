//! Configuration parsing for WashBay.
//!
//! Settings live in a small KDL document; every field has a default so an
//! empty document is a valid configuration.

pub mod error;
pub mod settings;

pub use error::{ConfigError, ConfigResult};
pub use settings::{EngineSettings, NotificationTemplates, Settings, parse_settings};
