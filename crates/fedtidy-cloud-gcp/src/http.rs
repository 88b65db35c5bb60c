//! Shared request and response handling for the Google REST APIs

use crate::auth::Credentials;
use crate::error::{GcpError, Result};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

/// Query parameters of a paginated list call
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ListQuery<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    page_token: Option<&'a str>,
}

impl<'a> ListQuery<'a> {
    pub(crate) fn new(page_token: Option<&'a str>) -> Self {
        Self {
            page_token: page_token.filter(|t| !t.is_empty()),
        }
    }
}

/// Send the request `build` makes for the current token.
///
/// On 401 the token is refreshed and the request is rebuilt and sent once more.
pub(crate) async fn send_authorized<F>(credentials: &Credentials, build: F) -> Result<reqwest::Response>
where
    F: Fn(&str) -> reqwest::RequestBuilder,
{
    let token = credentials.token().await;
    let response = build(&token).send().await?;
    if response.status() != StatusCode::UNAUTHORIZED || !credentials.refresh(&token).await? {
        return check_status(response).await;
    }

    let token = credentials.token().await;
    check_status(build(&token).send().await?).await
}

/// Turn a non-2xx response into [`GcpError::Api`]
pub(crate) async fn check_status(response: reqwest::Response) -> Result<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(GcpError::Api {
        status: status.as_u16(),
        message: error_message(&body),
    })
}

/// Extract `error.message` from a Google API error body
pub(crate) fn error_message(body: &str) -> String {
    serde_json::from_str::<ApiErrorBody>(body)
        .map(|b| b.error.message)
        .unwrap_or_else(|_| {
            let trimmed = body.trim();
            if trimmed.is_empty() {
                "Unknown error".to_string()
            } else {
                trimmed.to_string()
            }
        })
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    #[allow(dead_code)]
    #[serde(default)]
    code: u16,
    message: String,
}
