//! Data models: extracted license fields, check records and configuration.

pub mod config;
pub mod record;

pub use config::PatenteConfig;
pub use record::{CheckRecord, FieldKey, FieldRecord};
