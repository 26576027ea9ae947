//! Registry-relative paths for the access-control endpoints.
//!
//! Paths carry no leading slash so that `Url::join` composes them with
//! registries mounted under a sub-path. Every user-supplied segment is
//! percent-encoded individually; the fixed separators never are.

use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};

use crate::spec::PackageSpec;

fn enc(segment: &str) -> String {
    utf8_percent_encode(segment, NON_ALPHANUMERIC).to_string()
}

/// Scopes are accepted with or without their leading `@`.
pub(crate) fn strip_scope_at(scope: &str) -> &str {
    scope.strip_prefix('@').unwrap_or(scope)
}

pub(crate) fn package_access(spec: &PackageSpec) -> String {
    format!("-/package/{}/access", spec.escaped_name())
}

pub(crate) fn package_collaborators(spec: &PackageSpec) -> String {
    format!("-/package/{}/collaborators", spec.escaped_name())
}

pub(crate) fn team_package(scope: &str, team: &str) -> String {
    format!("-/team/{}/{}/package", enc(strip_scope_at(scope)), enc(team))
}

pub(crate) fn org_package(scope: &str) -> String {
    format!("-/org/{}/package", enc(strip_scope_at(scope)))
}

pub(crate) fn user_package(scope: &str) -> String {
    format!("-/user/{}/package", enc(strip_scope_at(scope)))
}
