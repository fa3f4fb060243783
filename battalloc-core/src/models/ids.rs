//! Strongly-typed identifiers.
//!
//! Batteries and wells are keyed by the operator's own string identifiers,
//! while allocation runs are keyed by a generated UUID. Using distinct types
//! for each prevents mixing up identifiers at compile time.

use thiserror::Error;

/// An identifier was empty (or only whitespace).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0} must not be empty")]
pub struct EmptyIdError(pub &'static str);

macro_rules! string_id {
    ($struct:ident, $label:literal, $doc:literal) => {
        #[doc = $doc]
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[cfg_attr(
            feature = "serde",
            derive(serde::Serialize, serde::Deserialize),
            serde(try_from = "String", into = "String")
        )]
        pub struct $struct(String);

        impl $struct {
            /// Construct an identifier, rejecting empty or blank values.
            pub fn new(value: impl Into<String>) -> Result<Self, EmptyIdError> {
                let value = value.into();
                if value.trim().is_empty() {
                    Err(EmptyIdError($label))
                } else {
                    Ok(Self(value))
                }
            }

            /// The identifier as a string slice
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl TryFrom<String> for $struct {
            type Error = EmptyIdError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl TryFrom<&str> for $struct {
            type Error = EmptyIdError;

            fn try_from(value: &str) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl std::str::FromStr for $struct {
            type Err = EmptyIdError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::new(s)
            }
        }

        impl From<$struct> for String {
            fn from(value: $struct) -> Self {
                value.0
            }
        }

        impl AsRef<str> for $struct {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $struct {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                self.0.fmt(f)
            }
        }
    };
}

string_id!(
    BatteryId,
    "battery id",
    "Identifier of a battery (a shared gathering point)"
);
string_id!(WellId, "well id", "Identifier of a well feeding a battery");

/// Identifier of a persisted allocation run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(transparent)
)]
pub struct RunId(pub uuid::Uuid);

impl From<uuid::Uuid> for RunId {
    fn from(value: uuid::Uuid) -> Self {
        Self(value)
    }
}

impl From<RunId> for uuid::Uuid {
    fn from(value: RunId) -> Self {
        value.0
    }
}

impl std::fmt::Display for RunId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl std::str::FromStr for RunId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.parse()?))
    }
}
