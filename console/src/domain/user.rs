//! Demo user entity and its partial-update semantics.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Validation errors raised at the user boundary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UserValidationError {
    /// The email address was empty once trimmed.
    #[error("email address must not be empty")]
    EmptyEmail,
}

/// Email address normalized to lowercase at construction.
///
/// Whatever casing the operator types, the stored form is trimmed and
/// lowercased, so collection lookups and display stay consistent.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Normalize and construct an [`EmailAddress`].
    ///
    /// # Errors
    ///
    /// Returns [`UserValidationError::EmptyEmail`] when the input is empty
    /// after trimming.
    pub fn new(raw: impl Into<String>) -> Result<Self, UserValidationError> {
        let normalized = raw.into().trim().to_lowercase();
        if normalized.is_empty() {
            return Err(UserValidationError::EmptyEmail);
        }
        Ok(Self(normalized))
    }

    /// The normalized address.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl AsRef<str> for EmailAddress {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<EmailAddress> for String {
    fn from(value: EmailAddress) -> Self {
        value.0
    }
}

impl TryFrom<String> for EmailAddress {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Access level of a console user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Admin,
    Editor,
    Viewer,
}

impl UserRole {
    /// Wire form of the role.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Editor => "editor",
            Self::Viewer => "viewer",
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Console user.
///
/// ## Invariants
/// - `id` is unique within a collection.
/// - `email` is always stored lowercase (enforced by [`EmailAddress`]).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Opaque identifier assigned by the data source.
    pub id: String,
    pub name: String,
    pub email: EmailAddress,
    pub role: UserRole,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a user; the data source assigns id and timestamps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserDraft {
    pub name: String,
    pub email: EmailAddress,
    pub role: UserRole,
    /// Defaults to active when omitted.
    pub is_active: Option<bool>,
}

/// Partial update where each field is optional.
///
/// Absent fields keep the existing value; the merge itself is
/// [`UserUpdate::apply`], a pure function over this struct.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserUpdate {
    /// Replacement name; trimmed before storage.
    pub name: Option<String>,
    pub email: Option<EmailAddress>,
    pub role: Option<UserRole>,
    pub is_active: Option<bool>,
}

impl UserUpdate {
    /// Merge this update over `existing`, stamping `updated_at` with `now`.
    ///
    /// Total over all inputs: absent fields fall through to the existing
    /// values and `created_at` is never touched.
    pub fn apply(&self, existing: &User, now: DateTime<Utc>) -> User {
        User {
            id: existing.id.clone(),
            name: self
                .name
                .as_ref()
                .map_or_else(|| existing.name.clone(), |name| name.trim().to_owned()),
            email: self
                .email
                .clone()
                .unwrap_or_else(|| existing.email.clone()),
            role: self.role.unwrap_or(existing.role),
            is_active: self.is_active.unwrap_or(existing.is_active),
            created_at: existing.created_at,
            updated_at: now,
        }
    }
}
