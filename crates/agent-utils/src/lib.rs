//! Shared utilities for the finance assistant workspace
//!
//! Logging setup and environment-driven configuration helpers used by every
//! binary in the workspace.

pub mod env;
pub mod logging;

pub use env::{EnvError, load_dotenv, var_opt, var_or, var_parse};
pub use logging::init_tracing;
