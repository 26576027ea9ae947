use std::fmt;
use std::str::FromStr;

use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};

use crate::error::OroNpmAccessError;

/// A registry-hosted package reference, e.g. `once` or `@types/node`.
///
/// Parsing rejects anything the registry cannot host: directory paths, git
/// URLs, generic URLs, and `user/repo` hosted-git shorthand. A trailing
/// `@<version>` suffix parses but is discarded, since access control applies
/// to the package as a whole.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PackageSpec {
    scope: Option<String>,
    name: String,
}

impl PackageSpec {
    pub fn scope(&self) -> Option<&str> {
        self.scope.as_deref()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The full package name with every byte outside `[a-zA-Z0-9]`
    /// percent-encoded, suitable for use as a single URI path segment
    /// (`@scope/pkg` becomes `%40scope%2Fpkg`).
    pub fn escaped_name(&self) -> String {
        utf8_percent_encode(&self.to_string(), NON_ALPHANUMERIC).to_string()
    }
}

impl fmt::Display for PackageSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(scope) = &self.scope {
            write!(f, "@{}/", scope)?;
        }
        write!(f, "{}", self.name)
    }
}

impl FromStr for PackageSpec {
    type Err = OroNpmAccessError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let fail = |message: &str| OroNpmAccessError::PackageSpecError {
            input: s.to_owned(),
            message: message.to_owned(),
        };

        if s.is_empty() {
            return Err(fail("spec is empty"));
        }
        if s.starts_with('.') || s.starts_with('/') || s.starts_with('~') || s.starts_with('\\') {
            return Err(fail("directory specs are not registry packages"));
        }
        if s.len() >= 2 && s.as_bytes()[1] == b':' && s.as_bytes()[0].is_ascii_alphabetic() {
            return Err(fail("directory specs are not registry packages"));
        }
        if s.contains("://")
            || ["file:", "git:", "git+", "http:", "https:", "ssh:"]
                .iter()
                .any(|scheme| s.starts_with(scheme))
        {
            return Err(fail("URL specs are not registry packages"));
        }

        let (scope, rest) = match s.strip_prefix('@') {
            Some(rest) => {
                let (scope, rest) = rest
                    .split_once('/')
                    .ok_or_else(|| fail("scoped spec is missing a package name"))?;
                (Some(scope), rest)
            }
            None => (None, s),
        };

        // `foo@^1.2` and friends: keep the name, drop the requested range.
        let name = rest.split_once('@').map(|(name, _)| name).unwrap_or(rest);
        if scope.is_none() && name.contains('/') {
            return Err(fail("hosted git shorthand is not a registry package"));
        }
        if let Some(scope) = scope {
            validate_segment(scope, &fail)?;
        }
        validate_segment(name, &fail)?;

        Ok(PackageSpec {
            scope: scope.map(str::to_owned),
            name: name.to_owned(),
        })
    }
}

fn validate_segment(
    segment: &str,
    fail: &impl Fn(&str) -> OroNpmAccessError,
) -> Result<(), OroNpmAccessError> {
    if segment.is_empty() {
        return Err(fail("package name has an empty segment"));
    }
    if segment.starts_with('.') || segment.starts_with('_') {
        return Err(fail("package names may not start with `.` or `_`"));
    }
    if segment.chars().any(|c| {
        c.is_whitespace()
            || matches!(
                c,
                '/' | '@' | '\\' | ':' | '%' | '*' | '?' | '"' | '<' | '>' | '|'
            )
    }) {
        return Err(fail("package name contains invalid characters"));
    }
    Ok(())
}
