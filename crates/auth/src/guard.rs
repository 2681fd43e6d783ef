//! Route authorization guard.
//!
//! Every navigation attempt runs the same fresh decision:
//!
//! 1. read the credential (absent → login)
//! 2. decode it (malformed or expired → login)
//! 3. compare the role against the route's permitted set
//!
//! The guard keeps no state between attempts. Its outcome is a UX decision
//! only; the backend rejects anything the caller is not allowed to do.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Credential, CredentialStore, Role, RoleClaim, decode};

/// Result of a single guard evaluation.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "outcome", content = "role", rename_all = "snake_case")]
pub enum NavigationOutcome {
    Allow,
    RedirectLogin,
    RedirectRoleHome(Role),
    RedirectUnauthorized,
}

/// Static mapping from route identifier to the roles allowed to view it.
///
/// Built once at configuration time; routes not listed permit nobody.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteTable {
    routes: BTreeMap<String, BTreeSet<Role>>,
}

impl RouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_route(mut self, route: impl Into<String>, roles: impl IntoIterator<Item = Role>) -> Self {
        self.routes.insert(route.into(), roles.into_iter().collect());
        self
    }

    pub fn permitted(&self, route: &str) -> Option<&BTreeSet<Role>> {
        self.routes.get(route)
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

/// Why the guard decided what it did (logs only, never in the outcome).
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum Reason {
    NoCredential,
    Malformed,
    Expired,
    Permitted,
    WrongRole,
    UnrecognizedRole,
    MissingRole,
}

impl Reason {
    fn as_str(&self) -> &'static str {
        match self {
            Reason::NoCredential => "no_credential",
            Reason::Malformed => "malformed_credential",
            Reason::Expired => "expired_credential",
            Reason::Permitted => "permitted",
            Reason::WrongRole => "role_not_permitted",
            Reason::UnrecognizedRole => "unrecognized_role",
            Reason::MissingRole => "missing_role",
        }
    }
}

fn decide(
    credential: Option<&Credential>,
    permitted: &BTreeSet<Role>,
    now: DateTime<Utc>,
) -> (NavigationOutcome, Reason) {
    let Some(credential) = credential else {
        return (NavigationOutcome::RedirectLogin, Reason::NoCredential);
    };

    // Unreadable and expired credentials look exactly like a missing one.
    let claims = match decode(credential) {
        Ok(claims) => claims,
        Err(e) => {
            tracing::debug!(error = %e, "credential could not be decoded");
            return (NavigationOutcome::RedirectLogin, Reason::Malformed);
        }
    };
    if claims.is_expired_at(now) {
        return (NavigationOutcome::RedirectLogin, Reason::Expired);
    }

    match claims.role() {
        RoleClaim::Known(role) if permitted.contains(role) => (NavigationOutcome::Allow, Reason::Permitted),
        RoleClaim::Known(role) => (NavigationOutcome::RedirectRoleHome(*role), Reason::WrongRole),
        RoleClaim::Unrecognized(_) => (NavigationOutcome::RedirectUnauthorized, Reason::UnrecognizedRole),
        RoleClaim::Missing => (NavigationOutcome::RedirectUnauthorized, Reason::MissingRole),
    }
}

/// Route authorization guard over an injected credential store.
#[derive(Debug, Clone)]
pub struct Guard<S> {
    store: S,
    routes: RouteTable,
}

impl<S: CredentialStore> Guard<S> {
    pub fn new(store: S, routes: RouteTable) -> Self {
        Self { store, routes }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn routes(&self) -> &RouteTable {
        &self.routes
    }

    /// Decide a navigation against an explicit permitted-role set.
    ///
    /// Never fails: a store read error is treated as "no credential".
    pub fn evaluate(&self, permitted: &BTreeSet<Role>, now: DateTime<Utc>) -> NavigationOutcome {
        let credential = match self.store.get() {
            Ok(credential) => credential,
            Err(e) => {
                tracing::warn!(error = %e, "credential store read failed; treating as signed out");
                None
            }
        };

        let (outcome, reason) = decide(credential.as_ref(), permitted, now);
        tracing::debug!(?outcome, reason = reason.as_str(), "guard decision");
        outcome
    }

    /// Decide a navigation to `route`, looking its rule up in the route table.
    pub fn evaluate_route(&self, route: &str, now: DateTime<Utc>) -> NavigationOutcome {
        match self.routes.permitted(route) {
            Some(permitted) => self.evaluate(permitted, now),
            None => {
                tracing::debug!(route, "route has no authorization rule; permitting nobody");
                self.evaluate(&BTreeSet::new(), now)
            }
        }
    }
}
