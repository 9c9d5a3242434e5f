//! Validated identifier newtypes.
//!
//! The backend assigns opaque string identifiers to users, recipes, and
//! comments. The client never fabricates them; it only validates shape on
//! the way in so that route parameters and wire payloads cannot smuggle
//! blank or padded ids into store state.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Validation errors returned by the identifier constructors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdValidationError {
    /// The identifier was empty.
    Empty,
    /// The identifier carried surrounding whitespace.
    Padded,
}

impl fmt::Display for IdValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "identifier must not be empty"),
            Self::Padded => write!(f, "identifier must not carry surrounding whitespace"),
        }
    }
}

impl std::error::Error for IdValidationError {}

fn validate(raw: &str) -> Result<(), IdValidationError> {
    if raw.is_empty() {
        return Err(IdValidationError::Empty);
    }
    if raw.trim() != raw {
        return Err(IdValidationError::Padded);
    }
    Ok(())
}

macro_rules! define_entity_id {
    ($(#[$outer:meta])* $name:ident) => {
        $(#[$outer])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Validate and construct an identifier from borrowed input.
            pub fn new(raw: impl AsRef<str>) -> Result<Self, IdValidationError> {
                Self::try_from(raw.as_ref().to_owned())
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                self.0.as_str()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_ref())
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl TryFrom<String> for $name {
            type Error = IdValidationError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                validate(&value)?;
                Ok(Self(value))
            }
        }
    };
}

define_entity_id! {
    /// Server-assigned recipe identifier.
    RecipeId
}

define_entity_id! {
    /// Server-assigned comment identifier.
    CommentId
}

define_entity_id! {
    /// Server-assigned user identifier.
    UserId
}
