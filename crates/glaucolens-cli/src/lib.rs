//! GLAUCOLens application layer: configuration, logging and the web server.
//!
//! The `glaucolens` binary wires these together; they are exposed as a
//! library so the router can be exercised in tests.

pub mod config;
pub mod logging;
pub mod server;
