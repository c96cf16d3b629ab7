//! ADT Pulse — client for the ADT Pulse mobile portal.
//!
//! The portal has no API. State is scraped from server-rendered pages and
//! changes are made by resubmitting the page's own forms with fresh hidden
//! tokens, reading success from where the portal redirects afterwards.

pub mod client;
pub mod config;
pub mod error;
pub mod extract;
pub mod mutator;
pub mod reader;
pub mod session;
pub mod transport;
pub mod types;

pub use client::PortalClient;
pub use config::ClientConfig;
pub use error::{FailureKind, PortalError, PortalResult};
pub use mutator::MODE_RETRY_PAUSE;
pub use transport::{PortalResponse, Transport};
pub use types::*;
