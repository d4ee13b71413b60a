//! api::http
//!
//! HTTP implementation of [`BookingApi`].
//!
//! # Endpoints
//!
//! - `POST /users` - register
//! - `POST /sessions` - sign in, returns `{ user, token }`
//! - `PUT /profile` - update the signed-in user (bearer token)
//!
//! Error bodies are expected as `{ "message": "..." }`; anything else is
//! reported with a generic message.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, USER_AGENT};
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

use super::traits::{ApiError, BookingApi, Credentials, NewUser, ProfileUpdate, SessionGrant};
use crate::core::types::User;

/// User-Agent header value for API requests.
const USER_AGENT_VALUE: &str = concat!("bookctl/", env!("CARGO_PKG_VERSION"));

/// Which endpoint a response came from; decides how 401 is read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Endpoint {
    Users,
    Sessions,
    Profile,
}

impl Endpoint {
    fn path(self) -> &'static str {
        match self {
            Endpoint::Users => "users",
            Endpoint::Sessions => "sessions",
            Endpoint::Profile => "profile",
        }
    }
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

/// Booking API over HTTP.
#[derive(Debug, Clone)]
pub struct HttpApi {
    client: Client,
    base_url: String,
}

impl HttpApi {
    /// Create a client for the API rooted at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Network` if the HTTP client cannot be built.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_VALUE));

        let client = Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(|e| ApiError::Network(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// The API base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, endpoint: Endpoint) -> String {
        format!("{}/{}", self.base_url, endpoint.path())
    }

    async fn handle_response<T: DeserializeOwned>(
        response: Response,
        endpoint: Endpoint,
    ) -> Result<T, ApiError> {
        let status = response.status();
        debug!(endpoint = endpoint.path(), status = status.as_u16(), "api response");

        if status.is_success() {
            return response
                .json::<T>()
                .await
                .map_err(|e| ApiError::Decode(e.to_string()));
        }

        let message = match response.json::<ErrorBody>().await {
            Ok(body) => body.message,
            Err(_) => "Unknown error".to_string(),
        };

        Err(match status {
            StatusCode::UNAUTHORIZED if endpoint == Endpoint::Sessions => {
                ApiError::InvalidCredentials
            }
            StatusCode::UNAUTHORIZED => ApiError::Unauthorized,
            _ if status.is_server_error() => ApiError::Server {
                status: status.as_u16(),
                message,
            },
            _ => ApiError::Rejected {
                status: status.as_u16(),
                message,
            },
        })
    }
}

fn network_error(e: reqwest::Error) -> ApiError {
    ApiError::Network(e.without_url().to_string())
}

#[async_trait]
impl BookingApi for HttpApi {
    fn name(&self) -> &'static str {
        "http"
    }

    async fn create_user(&self, request: NewUser) -> Result<User, ApiError> {
        let response = self
            .client
            .post(self.url(Endpoint::Users))
            .json(&request)
            .send()
            .await
            .map_err(network_error)?;

        Self::handle_response(response, Endpoint::Users).await
    }

    async fn create_session(&self, credentials: Credentials) -> Result<SessionGrant, ApiError> {
        let response = self
            .client
            .post(self.url(Endpoint::Sessions))
            .json(&credentials)
            .send()
            .await
            .map_err(network_error)?;

        Self::handle_response(response, Endpoint::Sessions).await
    }

    async fn update_profile(
        &self,
        token: &str,
        update: ProfileUpdate,
    ) -> Result<User, ApiError> {
        let response = self
            .client
            .put(self.url(Endpoint::Profile))
            .bearer_auth(token)
            .json(&update)
            .send()
            .await
            .map_err(network_error)?;

        Self::handle_response(response, Endpoint::Profile).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_trailing_slash_trimmed() {
        let api = HttpApi::new("http://localhost:3333/", Duration::from_secs(5)).unwrap();
        assert_eq!(api.base_url(), "http://localhost:3333");
        assert_eq!(api.url(Endpoint::Sessions), "http://localhost:3333/sessions");
    }

    #[test]
    fn user_agent_names_the_client() {
        assert!(USER_AGENT_VALUE.starts_with("bookctl/"));
    }
}
