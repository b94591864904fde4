//! Headless Top Dog client.
//!
//! Assembles an arena from environment configuration, drives it until a
//! winner emerges or the tick budget runs out, and reports a summary.

pub mod config;
pub mod logging;
pub mod session;

pub use config::{ClientConfig, StageSource};
pub use session::{Session, Summary};
