//! GitOps starter - a minimal JSON web API template with health checks and example items

pub mod config;
pub mod error;
pub mod types;

pub mod api;

pub use config::Config;
pub use error::{Error, Result};
pub use types::*;
