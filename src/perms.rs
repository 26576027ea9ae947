use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use serde_json::Value;

use crate::error::OroNpmAccessError;

/// Package visibility level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Access {
    Public,
    Restricted,
}

impl Access {
    pub fn as_str(&self) -> &'static str {
        match self {
            Access::Public => "public",
            Access::Restricted => "restricted",
        }
    }
}

impl fmt::Display for Access {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Access {
    type Err = OroNpmAccessError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "public" => Ok(Access::Public),
            "restricted" => Ok(Access::Restricted),
            _ => Err(OroNpmAccessError::InvalidAccessLevel(s.to_owned())),
        }
    }
}

/// Permission level a team holds on a package.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Permissions {
    ReadOnly,
    ReadWrite,
}

impl Permissions {
    pub fn as_str(&self) -> &'static str {
        match self {
            Permissions::ReadOnly => "read-only",
            Permissions::ReadWrite => "read-write",
        }
    }
}

impl fmt::Display for Permissions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Permissions {
    type Err = OroNpmAccessError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "read-only" => Ok(Permissions::ReadOnly),
            "read-write" => Ok(Permissions::ReadWrite),
            _ => Err(OroNpmAccessError::InvalidPermissions(s.to_owned())),
        }
    }
}

/// Recodes the registry's two-valued permission vocabulary into the one the
/// CLI ecosystem uses. Anything unrecognized passes through unchanged;
/// non-string values are rendered as their JSON text.
pub(crate) fn translate(value: &Value) -> String {
    match value.as_str() {
        Some("read") => "read-only".to_owned(),
        Some("write") => "read-write".to_owned(),
        Some(other) => other.to_owned(),
        None => value.to_string(),
    }
}
