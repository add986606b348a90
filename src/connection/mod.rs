//! LinkedIn connection workflow
//!
//! - `status`: pure derivation of a connection status from a fetched
//!   profile; recomputed on every read, never persisted
//! - `connect`: the fetch-profile-then-invite orchestration

pub mod connect;
pub mod status;

pub use connect::{ConnectOutcome, connect_linkedin_user};
pub use status::{ConnectionStatus, ConnectionStatusResult, resolve_status};
