//! Route API client for testing

use reqwest::header::HeaderMap;
use reqwest::{Client, Response, StatusCode};
use serde::{de::DeserializeOwned, Deserialize};
use std::time::Duration;

/// API client for the deployed route endpoints
pub struct RoutesClient {
    client: Client,
    base_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FetchResponse {
    pub message: String,
    pub journey_plan: serde_json::Value,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ErrorResponse {
    pub message: String,
    #[serde(default)]
    pub error: String,
}

/// Destination override sent as `work_lat` / `work_lon`
#[derive(Debug, Clone, Copy)]
pub struct Destination {
    pub latitude: f64,
    pub longitude: f64,
}

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug)]
pub enum ApiError {
    /// HTTP error with status code and body
    Http { status: StatusCode, body: String },
    /// Network or serialization error
    Request(String),
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiError::Http { status, body } => write!(f, "HTTP {}: {}", status, body),
            ApiError::Request(msg) => write!(f, "Request error: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl ApiError {
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ApiError::Http { status, .. } => Some(*status),
            ApiError::Request(_) => None,
        }
    }
}

impl RoutesClient {
    /// Create a new client with the given base URL
    pub fn new(base_url: &str) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Create a client from environment variable
    pub fn from_env() -> Self {
        let base_url = std::env::var(crate::fixtures::API_URL_ENV)
            .expect("TMB_ROUTES_API_URL environment variable not set");
        Self::new(&base_url)
    }

    /// GET /open
    pub async fn get_open(&self, destination: Option<Destination>) -> ApiResult<FetchResponse> {
        let response = self.send("/open", destination, None).await?;
        self.handle_response(response).await
    }

    /// GET / with an optional bearer token
    pub async fn get_root(
        &self,
        token: Option<&str>,
        destination: Option<Destination>,
    ) -> ApiResult<FetchResponse> {
        let response = self.send("/", destination, token).await?;
        self.handle_response(response).await
    }

    /// Raw headers of GET /open, for CORS checks
    pub async fn open_headers(&self) -> ApiResult<HeaderMap> {
        let response = self.send("/open", None, None).await?;
        Ok(response.headers().clone())
    }

    async fn send(
        &self,
        path: &str,
        destination: Option<Destination>,
        token: Option<&str>,
    ) -> ApiResult<Response> {
        let url = format!("{}{}", self.base_url, path);
        let mut request = self.client.get(&url);

        if let Some(destination) = destination {
            request = request.query(&[
                ("work_lat", destination.latitude.to_string()),
                ("work_lon", destination.longitude.to_string()),
            ]);
        }
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }

        request
            .send()
            .await
            .map_err(|e| ApiError::Request(e.to_string()))
    }

    async fn handle_response<T: DeserializeOwned>(&self, response: Response) -> ApiResult<T> {
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ApiError::Request(e.to_string()))?;

        if status.is_success() {
            serde_json::from_str(&body).map_err(|e| ApiError::Request(e.to_string()))
        } else {
            Err(ApiError::Http { status, body })
        }
    }
}
