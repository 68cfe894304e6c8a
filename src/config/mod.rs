//! Configuration for Folio.
//!
//! Handles named connections, the query worker, canvas and page defaults,
//! and logging.

mod connection;
mod settings;

pub use connection::{ConnectionError, Driver};
pub use settings::{
    expand_env_vars, CanvasSettings, ConnectionSettings, LoggingSettings, Settings, SettingsError,
    WorkerSettings,
};
