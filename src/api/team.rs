use reqwest::Method;
use serde_json::json;

use crate::api::confirm;
use crate::error::OroNpmAccessError;
use crate::paths;
use crate::perms::Permissions;
use crate::spec::PackageSpec;
use crate::AccessClient;

impl AccessClient {
    /// Grants a team permission to access a package.
    pub async fn grant(
        &self,
        spec: impl AsRef<str>,
        scope: &str,
        team: &str,
        permissions: Permissions,
    ) -> Result<bool, OroNpmAccessError> {
        let spec: PackageSpec = spec.as_ref().parse()?;
        let response = self
            .request(Method::PUT, &paths::team_package(scope, team))?
            .json(&json!({ "package": spec.to_string(), "permissions": permissions }))
            .send()
            .await?;
        confirm(response).await
    }

    /// Revokes a team's access to a package.
    pub async fn revoke(
        &self,
        spec: impl AsRef<str>,
        scope: &str,
        team: &str,
    ) -> Result<bool, OroNpmAccessError> {
        let spec: PackageSpec = spec.as_ref().parse()?;
        let response = self
            .request(Method::DELETE, &paths::team_package(scope, team))?
            .json(&json!({ "package": spec.to_string() }))
            .send()
            .await?;
        confirm(response).await
    }
}
