mod access;
mod ls;
mod team;

use reqwest::Response;

use crate::error::OroNpmAccessError;

/// Mutation responses only matter for their status; the body is dropped
/// unread.
pub(crate) async fn confirm(response: Response) -> Result<bool, OroNpmAccessError> {
    if response.status().is_success() {
        Ok(true)
    } else {
        Err(OroNpmAccessError::from_response(response).await)
    }
}
