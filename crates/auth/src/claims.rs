//! Bearer credential and the claims decoded from it.
//!
//! Only the shape of the token is checked here. Signatures are the
//! backend's concern; the decoded claims are advisory and drive routing only.

use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use eventhub_core::UserId;

use crate::{RoleClaim, UnresolvableIdentity, normalize_identity};

/// Opaque server-issued bearer string.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Credential(String);

impl Credential {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

// Never print the raw token.
impl core::fmt::Debug for Credential {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "Credential(<{} bytes>)", self.0.len())
    }
}

/// Raw `sub` claim, before identity normalization.
#[derive(Debug, Clone, PartialEq)]
pub enum Subject {
    Numeric(u64),
    Text(String),
    /// Anything else the backend put there (negative, fractional, object...).
    Other(Value),
}

impl Subject {
    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Null => None,
            Value::String(s) => Some(Subject::Text(s)),
            Value::Number(n) => Some(match n.as_u64() {
                Some(id) => Subject::Numeric(id),
                None => Subject::Other(Value::Number(n)),
            }),
            other => Some(Subject::Other(other)),
        }
    }
}

/// Claims decoded from a [`Credential`].
///
/// There is no public constructor: claims only ever come out of [`decode`].
#[derive(Debug, Clone, PartialEq)]
pub struct Claims {
    subject: Option<Subject>,
    role: RoleClaim,
    expiry: Option<DateTime<Utc>>,
    extra: Map<String, Value>,
}

impl Claims {
    pub fn subject(&self) -> Option<&Subject> {
        self.subject.as_ref()
    }

    pub fn role(&self) -> &RoleClaim {
        &self.role
    }

    /// `None` means non-expiring from the client's point of view.
    pub fn expiry(&self) -> Option<DateTime<Utc>> {
        self.expiry
    }

    /// Payload fields not interpreted by the client, preserved verbatim.
    pub fn extra(&self) -> &Map<String, Value> {
        &self.extra
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expiry.is_some_and(|exp| now >= exp)
    }

    /// Normalized numeric identity of the subject.
    pub fn user_id(&self) -> Result<UserId, UnresolvableIdentity> {
        match &self.subject {
            Some(subject) => normalize_identity(subject),
            None => Err(UnresolvableIdentity::Missing),
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MalformedCredential {
    #[error("expected 3 dot-separated segments, found {0}")]
    SegmentCount(usize),

    #[error("{0} segment is empty")]
    EmptySegment(&'static str),

    #[error("{segment} segment is not base64url: {message}")]
    Encoding { segment: &'static str, message: String },

    #[error("{0} segment is not a JSON object")]
    NotAnObject(&'static str),

    #[error("exp claim is not a numeric timestamp")]
    InvalidExpiry,
}

/// Decode a bearer credential into claims.
///
/// Pure: no IO, no clock, no key material.
pub fn decode(credential: &Credential) -> Result<Claims, MalformedCredential> {
    let segments: Vec<&str> = credential.as_str().trim().split('.').collect();
    let [header, payload, _signature] = segments.as_slice() else {
        return Err(MalformedCredential::SegmentCount(segments.len()));
    };

    // The header carries nothing we use, but it must be well-formed.
    decode_object("header", header)?;
    let mut payload = decode_object("payload", payload)?;

    let role = match payload.remove("role") {
        None | Some(Value::Null) => RoleClaim::Missing,
        Some(Value::String(raw)) => RoleClaim::from_raw(&raw),
        Some(other) => RoleClaim::Unrecognized(other.to_string()),
    };

    let expiry = match payload.remove("exp") {
        None | Some(Value::Null) => None,
        Some(Value::Number(n)) => {
            // NumericDate may carry a fraction; whole seconds are enough here.
            let secs = n
                .as_i64()
                .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.floor() as i64))
                .ok_or(MalformedCredential::InvalidExpiry)?;
            Some(
                Utc.timestamp_opt(secs, 0)
                    .single()
                    .ok_or(MalformedCredential::InvalidExpiry)?,
            )
        }
        Some(_) => return Err(MalformedCredential::InvalidExpiry),
    };

    let subject = payload.remove("sub").and_then(Subject::from_value);

    Ok(Claims {
        subject,
        role,
        expiry,
        extra: payload,
    })
}

fn decode_object(segment: &'static str, raw: &str) -> Result<Map<String, Value>, MalformedCredential> {
    if raw.is_empty() {
        return Err(MalformedCredential::EmptySegment(segment));
    }

    let bytes = URL_SAFE_NO_PAD
        .decode(raw.trim_end_matches('='))
        .map_err(|e| MalformedCredential::Encoding {
            segment,
            message: e.to_string(),
        })?;

    match serde_json::from_slice::<Value>(&bytes) {
        Ok(Value::Object(map)) => Ok(map),
        _ => Err(MalformedCredential::NotAnObject(segment)),
    }
}

/// Build an unsigned token around `payload` (tests only).
#[cfg(test)]
pub(crate) fn unsigned_token(payload: &Value) -> Credential {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
    let body = URL_SAFE_NO_PAD.encode(payload.to_string());
    Credential::new(format!("{header}.{body}.c2lnbmF0dXJl"))
}
