use miette::Diagnostic;
use reqwest::{Response, StatusCode};
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error, Diagnostic)]
pub enum OroNpmAccessError {
    /// The supplied spec is malformed or does not refer to a
    /// registry-hosted package. Raised before any request is issued.
    #[error("`{input}` is not a valid registry package spec: {message}")]
    #[diagnostic(code(oro_npm_access::package_spec_error), url(docsrs))]
    PackageSpecError { input: String, message: String },

    /// A permissions string outside the accepted vocabulary.
    #[error("`permissions` must be `read-only` or `read-write`. Got `{0}` instead.")]
    #[diagnostic(code(oro_npm_access::invalid_permissions), url(docsrs))]
    InvalidPermissions(String),

    /// An access level string outside the accepted vocabulary.
    #[error("`access` must be `public` or `restricted`. Got `{0}` instead.")]
    #[diagnostic(code(oro_npm_access::invalid_access_level), url(docsrs))]
    InvalidAccessLevel(String),

    /// The registry responded with a non-success status.
    #[error("Registry request failed with status {status}: {}", message.as_deref().unwrap_or("(no response body)"))]
    #[diagnostic(code(oro_npm_access::registry_error), url(docsrs))]
    RegistryError {
        status: StatusCode,
        message: Option<String>,
    },

    /// The request could not be performed at all.
    #[error(transparent)]
    #[diagnostic(code(oro_npm_access::request_error), url(docsrs))]
    RequestError(#[from] reqwest::Error),

    /// Failed to compose a request URL from the registry base.
    #[error(transparent)]
    #[diagnostic(code(oro_npm_access::url_parse_error), url(docsrs))]
    UrlParseError(#[from] url::ParseError),

    /// A listing response body was not a flat JSON object.
    #[error("Could not parse registry response as a JSON object: {0}")]
    #[diagnostic(code(oro_npm_access::malformed_response), url(docsrs))]
    MalformedResponse(String),

    /// `edit` is reserved in the API surface but not implemented.
    #[error("`edit` is not implemented yet.")]
    #[diagnostic(code(oro_npm_access::edit_not_implemented), url(docsrs))]
    EditNotImplemented,
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

impl OroNpmAccessError {
    /// Status of the upstream failure, if this error carries one.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::RegistryError { status, .. } => Some(*status),
            Self::RequestError(err) => err.status(),
            _ => None,
        }
    }

    pub(crate) fn is_not_found(&self) -> bool {
        self.status() == Some(StatusCode::NOT_FOUND)
    }

    /// Builds a [OroNpmAccessError::RegistryError] from a non-success
    /// response, pulling the registry's `{"error": ...}` message out of the
    /// body when there is one.
    pub(crate) async fn from_response(response: Response) -> Self {
        let status = response.status();
        let message = response
            .text()
            .await
            .ok()
            .filter(|text| !text.is_empty())
            .map(|text| match serde_json::from_str::<ErrorBody>(&text) {
                Ok(body) => body.error,
                Err(_) => text,
            });
        Self::RegistryError { status, message }
    }
}
