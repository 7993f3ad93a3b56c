//! MISP API client module
//!
//! HTTP client for the three MISP endpoints the tool needs: template
//! listing, event creation, and object submission.

pub mod client;
pub mod endpoints;
pub mod types;

pub use client::MispClient;
pub use types::*;
