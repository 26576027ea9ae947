use reqwest::Method;
use serde_json::json;

use crate::api::confirm;
use crate::error::OroNpmAccessError;
use crate::paths;
use crate::perms::Access;
use crate::spec::PackageSpec;
use crate::AccessClient;

impl AccessClient {
    /// Makes a package visible to everyone.
    pub async fn public(&self, spec: impl AsRef<str>) -> Result<bool, OroNpmAccessError> {
        self.set_access(spec, Access::Public).await
    }

    /// Restricts a package to users with access.
    pub async fn restricted(&self, spec: impl AsRef<str>) -> Result<bool, OroNpmAccessError> {
        self.set_access(spec, Access::Restricted).await
    }

    pub async fn set_access(
        &self,
        spec: impl AsRef<str>,
        access: Access,
    ) -> Result<bool, OroNpmAccessError> {
        let spec: PackageSpec = spec.as_ref().parse()?;
        let response = self
            .request(Method::POST, &paths::package_access(&spec))?
            .json(&json!({ "access": access }))
            .send()
            .await?;
        confirm(response).await
    }

    /// Requires a second factor for publishing new versions of a package.
    pub async fn tfa_required(&self, spec: impl AsRef<str>) -> Result<bool, OroNpmAccessError> {
        self.set_requires_2fa(spec, true).await
    }

    pub async fn tfa_not_required(&self, spec: impl AsRef<str>) -> Result<bool, OroNpmAccessError> {
        self.set_requires_2fa(spec, false).await
    }

    pub async fn set_requires_2fa(
        &self,
        spec: impl AsRef<str>,
        required: bool,
    ) -> Result<bool, OroNpmAccessError> {
        let spec: PackageSpec = spec.as_ref().parse()?;
        let response = self
            .request(Method::POST, &paths::package_access(&spec))?
            .json(&json!({ "publish_requires_tfa": required }))
            .send()
            .await?;
        confirm(response).await
    }

    /// Reserved in the registry API surface; currently always fails.
    pub fn edit(&self) -> Result<bool, OroNpmAccessError> {
        Err(OroNpmAccessError::EditNotImplemented)
    }
}
