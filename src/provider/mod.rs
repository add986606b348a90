//! Messaging-provider integration
//!
//! Typed client for the hosted provider API that brokers LinkedIn
//! actions, plus the process-wide credential cache that authenticates
//! every call.
//!
//! - `client`: the four connection-management operations and the
//!   account-detail enrichment call
//! - `credentials`: lazily-fetched, single-flight API key cache
//! - `types`: request/response shapes, normalized at the boundary

pub mod client;
pub mod credentials;
pub mod types;

pub use client::ProviderClient;
pub use credentials::CredentialCache;
pub use types::*;
