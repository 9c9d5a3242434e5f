//! Viewer identity and session custody types.
//!
//! ## Invariants
//! - [`Session`] persists `user` and `token` together; under normal flow
//!   both are set or both are cleared. During login the token is committed
//!   before the profile fetch completes, so a token-only session is an
//!   observable intermediate state (see `stores::session`).
//! - [`AccessToken`] never appears in `Debug` output and its backing
//!   allocation is wiped when the last clone drops.

use std::fmt;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use zeroize::Zeroizing;

use super::UserId;

/// Bearer token issued by the login endpoint.
///
/// The secret is held in a [`Zeroizing`] buffer so logout (and drops in
/// general) scrub it from memory. Display and Debug both redact.
#[derive(Clone)]
pub struct AccessToken(Zeroizing<String>);

impl AccessToken {
    /// Wrap a raw bearer secret.
    pub fn new(raw: impl Into<String>) -> Self {
        Self(Zeroizing::new(raw.into()))
    }

    /// Borrow the secret for request authorisation.
    pub fn expose(&self) -> &str {
        self.0.as_str()
    }
}

impl PartialEq for AccessToken {
    fn eq(&self, other: &Self) -> bool {
        self.0.as_str() == other.0.as_str()
    }
}

impl Eq for AccessToken {}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken(<redacted>)")
    }
}

impl Serialize for AccessToken {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.0.as_str())
    }
}

impl<'de> Deserialize<'de> for AccessToken {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        if raw.is_empty() {
            return Err(D::Error::custom("access token must not be empty"));
        }
        Ok(Self::new(raw))
    }
}

/// Viewer identity record returned by the profile endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Stable server-assigned identifier.
    pub id: UserId,
    /// Display name shown on recipes and comments.
    pub name: String,
    /// Contact address used for login.
    pub email: String,
    /// Optional avatar image URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    /// Whether the account completed OTP verification.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_verified: Option<bool>,
}

/// Persisted session snapshot: viewer identity plus bearer token.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    /// Authenticated viewer, if the profile fetch has completed.
    pub user: Option<User>,
    /// Bearer token, if login succeeded.
    pub token: Option<AccessToken>,
}

impl Session {
    /// Whether a bearer token is available for authorised requests.
    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }
}

/// Partial profile update submitted to the backend.
///
/// Absent fields are left untouched server-side; the response carries the
/// merged profile.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    /// Replacement display name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Replacement avatar URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}
