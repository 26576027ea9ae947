use std::collections::HashMap;

use futures::{Stream, StreamExt, TryStreamExt};
use reqwest::Method;

use crate::entries::object_entries;
use crate::error::OroNpmAccessError;
use crate::paths;
use crate::perms::translate;
use crate::spec::PackageSpec;
use crate::AccessClient;

impl AccessClient {
    /// Lists the packages a team, org, or user has access to, as a map from
    /// package name to permission level.
    ///
    /// Permission values are recoded from the registry vocabulary (`read`,
    /// `write`) to `read-only`/`read-write`. Unrecognized strings pass
    /// through unchanged; non-string values (including `null`) are rendered
    /// as their JSON text.
    pub async fn ls_packages(
        &self,
        scope: &str,
        team: Option<&str>,
    ) -> Result<HashMap<String, String>, OroNpmAccessError> {
        let stream = self.ls_packages_stream(scope, team).await?;
        stream.try_collect().await
    }

    /// Same query as [`AccessClient::ls_packages`], with entries yielded as
    /// they are decoded from the response. Single-pass; an error item ends
    /// the stream.
    pub async fn ls_packages_stream(
        &self,
        scope: &str,
        team: Option<&str>,
    ) -> Result<impl Stream<Item = Result<(String, String), OroNpmAccessError>>, OroNpmAccessError>
    {
        let response = match team {
            Some(team) => self.ls_query(&paths::team_package(scope, team), &[]).await?,
            None => match self.ls_query(&paths::org_package(scope), &[]).await {
                // Org-scoped listings 404 for plain users; retry once as a
                // user listing. Everything else propagates.
                Err(err) if err.is_not_found() => {
                    self.ls_query(&paths::user_package(scope), &[]).await?
                }
                other => other?,
            },
        };
        Ok(translated_entries(response))
    }

    /// Lists the users and teams with access to a package, as a map from
    /// collaborator name to permission level. Values are recoded the same
    /// way as in [`AccessClient::ls_packages`].
    pub async fn ls_collaborators(
        &self,
        spec: impl AsRef<str>,
        user: Option<&str>,
    ) -> Result<HashMap<String, String>, OroNpmAccessError> {
        let stream = self.ls_collaborators_stream(spec, user).await?;
        stream.try_collect().await
    }

    pub async fn ls_collaborators_stream(
        &self,
        spec: impl AsRef<str>,
        user: Option<&str>,
    ) -> Result<impl Stream<Item = Result<(String, String), OroNpmAccessError>>, OroNpmAccessError>
    {
        let spec: PackageSpec = spec.as_ref().parse()?;
        let mut query = Vec::new();
        if let Some(user) = user {
            query.push(("user", user));
        }
        let response = self
            .ls_query(&paths::package_collaborators(&spec), &query)
            .await?;
        Ok(translated_entries(response))
    }

    async fn ls_query(
        &self,
        path: &str,
        extra: &[(&str, &str)],
    ) -> Result<reqwest::Response, OroNpmAccessError> {
        let response = self
            .request(Method::GET, path)?
            .query(&[("format", "cli")])
            .query(extra)
            .send()
            .await?;
        if response.status().is_success() {
            Ok(response)
        } else {
            Err(OroNpmAccessError::from_response(response).await)
        }
    }
}

fn translated_entries(
    response: reqwest::Response,
) -> impl Stream<Item = Result<(String, String), OroNpmAccessError>> {
    let body = response
        .bytes_stream()
        .map_err(OroNpmAccessError::from)
        .boxed();
    object_entries(body).map_ok(|(key, value)| (key, translate(&value)))
}

#[cfg(test)]
mod test {
    use maplit::hashmap;
    use miette::{IntoDiagnostic, Result};
    use pretty_assertions::assert_eq;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn permissions_body(json: &str) -> ResponseTemplate {
        // Raw body so the wire order of entries is exactly as written.
        ResponseTemplate::new(200).set_body_raw(json.as_bytes().to_owned(), "application/json")
    }

    #[async_std::test]
    async fn ls_collaborators_translates_permissions() -> Result<()> {
        let mock_server = MockServer::start().await;
        let client = AccessClient::new(mock_server.uri().parse().into_diagnostic()?);
        let spec: PackageSpec = "@oro-test/pkg".parse()?;

        let _guard = Mock::given(method("GET"))
            .and(path(format!(
                "/-/package/{}/collaborators",
                spec.escaped_name()
            )))
            .and(query_param("format", "cli"))
            .respond_with(permissions_body(
                r#"{"teamA": "write", "teamB": "read", "teamC": "admin"}"#,
            ))
            .expect(2)
            .mount_as_scoped(&mock_server)
            .await;

        assert_eq!(
            client.ls_collaborators("@oro-test/pkg", None).await?,
            hashmap! {
                "teamA".to_owned() => "read-write".to_owned(),
                "teamB".to_owned() => "read-only".to_owned(),
                "teamC".to_owned() => "admin".to_owned(),
            }
        );

        let entries: Vec<(String, String)> = client
            .ls_collaborators_stream("@oro-test/pkg", None)
            .await?
            .try_collect()
            .await?;
        assert_eq!(
            entries,
            vec![
                ("teamA".to_owned(), "read-write".to_owned()),
                ("teamB".to_owned(), "read-only".to_owned()),
                ("teamC".to_owned(), "admin".to_owned()),
            ]
        );

        Ok(())
    }

    #[async_std::test]
    async fn ls_collaborators_forwards_user_filter() -> Result<()> {
        let mock_server = MockServer::start().await;
        let client = AccessClient::new(mock_server.uri().parse().into_diagnostic()?);
        let spec: PackageSpec = "@oro-test/pkg".parse()?;

        let _guard = Mock::given(method("GET"))
            .and(path(format!(
                "/-/package/{}/collaborators",
                spec.escaped_name()
            )))
            .and(query_param("format", "cli"))
            .and(query_param("user", "zkat"))
            .respond_with(permissions_body("{}"))
            .expect(1)
            .mount_as_scoped(&mock_server)
            .await;

        assert_eq!(
            client.ls_collaborators("@oro-test/pkg", Some("zkat")).await?,
            HashMap::new()
        );

        Ok(())
    }

    #[async_std::test]
    async fn ls_packages_uses_team_path_when_team_given() -> Result<()> {
        let mock_server = MockServer::start().await;
        let client = AccessClient::new(mock_server.uri().parse().into_diagnostic()?);

        let _guard = Mock::given(method("GET"))
            .and(path("/-/team/myorg/myteam/package"))
            .and(query_param("format", "cli"))
            .respond_with(permissions_body(r#"{"@oro-test/pkg": "write"}"#))
            .expect(1)
            .mount_as_scoped(&mock_server)
            .await;

        assert_eq!(
            client.ls_packages("@myorg", Some("myteam")).await?,
            hashmap! { "@oro-test/pkg".to_owned() => "read-write".to_owned() }
        );

        Ok(())
    }

    #[async_std::test]
    async fn ls_packages_falls_back_to_user_path_on_404() -> Result<()> {
        let mock_server = MockServer::start().await;
        let client = AccessClient::new(mock_server.uri().parse().into_diagnostic()?);

        let _org = Mock::given(method("GET"))
            .and(path("/-/org/myorg/package"))
            .and(query_param("format", "cli"))
            .respond_with(ResponseTemplate::new(404))
            .expect(1)
            .mount_as_scoped(&mock_server)
            .await;
        let _user = Mock::given(method("GET"))
            .and(path("/-/user/myorg/package"))
            .and(query_param("format", "cli"))
            .respond_with(permissions_body(r#"{"mine": "read"}"#))
            .expect(1)
            .mount_as_scoped(&mock_server)
            .await;

        assert_eq!(
            client.ls_packages("myorg", None).await?,
            hashmap! { "mine".to_owned() => "read-only".to_owned() }
        );

        Ok(())
    }

    #[async_std::test]
    async fn ls_packages_propagates_404_when_team_given() -> Result<()> {
        let mock_server = MockServer::start().await;
        let client = AccessClient::new(mock_server.uri().parse().into_diagnostic()?);

        let _guard = Mock::given(method("GET"))
            .and(path("/-/team/myorg/myteam/package"))
            .respond_with(ResponseTemplate::new(404))
            .expect(1)
            .mount_as_scoped(&mock_server)
            .await;

        let err = client
            .ls_packages("myorg", Some("myteam"))
            .await
            .unwrap_err();
        assert_eq!(err.status(), Some(reqwest::StatusCode::NOT_FOUND));

        Ok(())
    }

    #[async_std::test]
    async fn ls_packages_propagates_other_org_errors() -> Result<()> {
        let mock_server = MockServer::start().await;
        let client = AccessClient::new(mock_server.uri().parse().into_diagnostic()?);

        let _org = Mock::given(method("GET"))
            .and(path("/-/org/myorg/package"))
            .respond_with(ResponseTemplate::new(500))
            .expect(1)
            .mount_as_scoped(&mock_server)
            .await;
        let _user = Mock::given(method("GET"))
            .and(path("/-/user/myorg/package"))
            .respond_with(permissions_body("{}"))
            .expect(0)
            .mount_as_scoped(&mock_server)
            .await;

        let err = client.ls_packages("myorg", None).await.unwrap_err();
        assert_eq!(
            err.status(),
            Some(reqwest::StatusCode::INTERNAL_SERVER_ERROR)
        );

        Ok(())
    }

    #[async_std::test]
    async fn rejects_non_registry_specs_before_any_request() -> Result<()> {
        let client = AccessClient::default();
        assert!(matches!(
            client.ls_collaborators("./some/dir", None).await,
            Err(OroNpmAccessError::PackageSpecError { .. })
        ));
        Ok(())
    }
}
