//! API types for the swap agent

pub mod gas;
pub mod swap;

pub use gas::*;
pub use swap::*;

/// The route used to check the server's health
pub const PING_ROUTE: &str = "ping";
