//! `eventhub-auth` — client-side authorization boundary.
//!
//! Decodes bearer credentials into advisory claims and decides where a
//! navigation attempt may go. Nothing here is a security boundary: the
//! backend enforces every data-mutating operation.
//!
//! This crate is intentionally decoupled from rendering and storage.

pub mod claims;
pub mod guard;
pub mod identity;
pub mod roles;
pub mod store;

pub use claims::{Claims, Credential, MalformedCredential, Subject, decode};
pub use guard::{Guard, NavigationOutcome, RouteTable};
pub use identity::{UnresolvableIdentity, normalize_identity};
pub use roles::{Role, RoleClaim, UnknownRole};
pub use store::{CredentialStore, InMemoryCredentialStore, StoreError};
