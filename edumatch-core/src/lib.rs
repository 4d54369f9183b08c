//! EduMatch Core - shared infrastructure
//!
//! Error handling, logging and configuration used by the other EduMatch crates

pub mod config;
pub mod error;
pub mod logging;
pub mod types;

pub use config::*;
pub use error::*;
pub use logging::*;
pub use types::*;

// Re-export commonly used external types
pub use tracing;
