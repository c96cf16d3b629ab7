//! Command-line driver for the ADT Pulse portal client.

pub mod commands;
pub mod config;

pub use commands::{run, Action};
pub use config::{resolve_base_url, resolve_credentials, Credentials};
