//! Client for the npm registry's access-control API: package visibility,
//! team permissions, collaborator listings, and 2FA publish requirements.

mod api;
mod client;
mod entries;
mod error;
mod paths;
mod perms;
mod spec;

pub use client::AccessClient;
pub use error::OroNpmAccessError;
pub use perms::{Access, Permissions};
pub use spec::PackageSpec;
