#[cfg(feature = "server")]
pub mod config;
pub mod receipt;
pub mod user;
