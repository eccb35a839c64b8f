//! Core data type definitions

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Named permission groups checked by the authorization gate.
///
/// The vocabulary is fixed and comparison is exact-string; there is no
/// hierarchy between roles. Endpoints list every role permitted to call
/// them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Role {
    #[serde(rename = "ROLE_USER")]
    User,
    #[serde(rename = "ROLE_MODERATOR")]
    Moderator,
    #[serde(rename = "ROLE_ADMIN")]
    Admin,
}

impl Role {
    /// The wire/storage representation of the role.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "ROLE_USER",
            Role::Moderator => "ROLE_MODERATOR",
            Role::Admin => "ROLE_ADMIN",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = crate::error::CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ROLE_USER" => Ok(Role::User),
            "ROLE_MODERATOR" => Ok(Role::Moderator),
            "ROLE_ADMIN" => Ok(Role::Admin),
            other => Err(crate::error::CoreError::unknown_role(other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_round_trips_through_its_string_form() {
        for role in [Role::User, Role::Moderator, Role::Admin] {
            assert_eq!(role.as_str().parse::<Role>().unwrap(), role);
        }
    }

    #[test]
    fn role_comparison_is_case_sensitive() {
        assert!("role_admin".parse::<Role>().is_err());
        assert!("ADMIN".parse::<Role>().is_err());
        assert!("".parse::<Role>().is_err());
    }

    #[test]
    fn role_serializes_with_prefix() {
        let json = serde_json::to_string(&Role::Admin).unwrap();
        assert_eq!(json, "\"ROLE_ADMIN\"");
    }
}
