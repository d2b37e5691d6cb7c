//! The three kinds of principal a bearer token can be issued to.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Value of the `type` claim in an access token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrincipalKind {
    /// A staff login belonging to one organization, restricted by its role.
    User,
    /// The organization account itself. Full access to its own tenant.
    Organization,
    /// A parent body. Full access to any organization it owns.
    Headquarters,
}

impl PrincipalKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Organization => "organization",
            Self::Headquarters => "headquarters",
        }
    }

    /// Whether this kind bypasses per-permission checks.
    pub fn has_full_access(self) -> bool {
        !matches!(self, Self::User)
    }
}

impl fmt::Display for PrincipalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PrincipalKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Self::User),
            "organization" => Ok(Self::Organization),
            "headquarters" => Ok(Self::Headquarters),
            other => Err(CoreError::Validation(format!(
                "Unknown principal type '{other}'"
            ))),
        }
    }
}
