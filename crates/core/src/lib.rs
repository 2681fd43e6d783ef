//! `eventhub-core` — identifiers shared by the client crates.
//!
//! Pure types only (no IO, no transport).

pub mod id;

pub use id::UserId;
