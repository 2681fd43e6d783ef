//! `eventhub-client`
//!
//! **Responsibility:** client shell around the authorization core.
//!
//! This crate provides:
//! - Configuration (credential location, route rules)
//! - A persistent, file-backed credential store
//! - The built-in route table and the fixed redirect paths
//! - The session: login, logout, rejected-credential handling, navigation
//!
//! The backend API remains the authority for every operation.

pub mod config;
pub mod file_store;
pub mod routes;
pub mod session;

pub use config::{ClientConfig, ConfigError};
pub use file_store::FileCredentialStore;
pub use routes::{LOGIN_PATH, Navigation, UNAUTHORIZED_PATH, default_routes, resolve};
pub use session::{Identity, Session, SessionError};
