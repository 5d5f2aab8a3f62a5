//! Configuration handling for pixelsweep
//!
//! Configuration is optional: all values default to the behavior of a
//! plain run (10s request timeout, 1s..60s rate-limit backoff, the
//! built-in non-page extension list).

mod parser;
mod types;

pub use parser::load_config;
pub use types::{Config, HttpConfig};
