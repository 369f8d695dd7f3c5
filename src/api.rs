// API client module: contains a small blocking HTTP client that talks to
// the GitHub gist API. It is intentionally small and synchronous; the tool
// is single-shot and human-triggered, so there is nothing to overlap.

use std::collections::BTreeMap;
use std::fs;

use reqwest::blocking::{Client, Response};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use uuid::Uuid;

/// Real API endpoint; tests point `GITHUB_API_URL` at a local stub.
pub const DEFAULT_BASE_URL: &str = "https://api.github.com";

/// Errors surfaced by the API client. Remote failures keep the decoded
/// response body so the CLI can show the server's own explanation.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The service answered with something other than 201 Created.
    #[error("{message}")]
    Remote { message: String, body: Value },
    /// Transport-level failure (connect, TLS, response decode).
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    /// A gist source file could not be read as UTF-8 text.
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
}

/// The three fields returned by the authorization endpoint. We keep `id` as
/// a serde_json::Value because the backend returns an int but keeping it
/// flexible avoids parsing issues.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct TokenRecord {
    pub id: Value,
    pub token: String,
    pub fingerprint: String,
}

#[derive(Serialize)]
struct GistFile {
    content: String,
}

#[derive(Serialize)]
struct GistRequest<'a> {
    description: &'a str,
    public: bool,
    files: BTreeMap<&'a str, GistFile>,
}

#[derive(Deserialize)]
struct GistResponse {
    html_url: String,
}

#[derive(Serialize)]
struct AuthorizationRequest<'a> {
    scopes: [&'a str; 1],
    note: &'a str,
    fingerprint: &'a str,
}

/// API client holding a reqwest blocking client, the base URL of the
/// service and an optional access token for authenticated calls. The token
/// is handed in at construction so the client never reads ambient state.
pub struct ApiClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, token: Option<String>) -> Result<Self, ApiError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/vnd.github.v3+json"),
        );
        let client = Client::builder().default_headers(headers).build()?;
        Ok(ApiClient {
            client,
            base_url: base_url.into(),
            token,
        })
    }

    /// Create an ApiClient configured from the environment variable
    /// `GITHUB_API_URL` or fall back to the public GitHub API.
    pub fn from_env(token: Option<String>) -> Result<Self, ApiError> {
        let base_url =
            std::env::var("GITHUB_API_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.into());
        Self::new(base_url, token)
    }

    fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    /// Create a new gist with files from the filesystem and return the URL
    /// of the newly created gist.
    ///
    /// Every file is read fully into memory before the single submission;
    /// batches are a handful of human-picked files, not bulk uploads. When
    /// no token is held the request goes out unauthenticated, which the
    /// service accepts as an anonymous gist.
    pub fn new_gist(
        &self,
        items: &[(String, String)],
        description: &str,
        public: bool,
    ) -> Result<String, ApiError> {
        let mut files = BTreeMap::new();
        for (path, gist_filename) in items {
            let content = fs::read_to_string(path).map_err(|source| ApiError::Io {
                path: path.clone(),
                source,
            })?;
            tracing::debug!(%path, %gist_filename, bytes = content.len(), "read gist file");
            files.insert(gist_filename.as_str(), GistFile { content });
        }
        let payload = GistRequest {
            description,
            public,
            files,
        };

        let mut request = self.client.post(self.url("/gists")).json(&payload);
        if let Some(token) = &self.token {
            request = request.header(AUTHORIZATION, format!("token {}", token));
        }
        let response = request.send()?;
        let response = expect_created(response, "Failed to create new gist")?;

        let info: GistResponse = response.json()?;
        Ok(info.html_url)
    }

    /// Create a new authorization token scoped to gist creation and return
    /// the token's ID, the token itself, and the fingerprint.
    ///
    /// Authenticates with the supplied credentials rather than a stored
    /// token; the fingerprint is a fresh v4 UUID so the service can tell
    /// repeated requests for the same account apart.
    pub fn new_gist_token(
        &self,
        username: &str,
        password: &str,
    ) -> Result<TokenRecord, ApiError> {
        let fingerprint = Uuid::new_v4().to_string();
        let payload = AuthorizationRequest {
            scopes: ["gist"],
            note: "Created by gistit",
            fingerprint: &fingerprint,
        };
        let response = self
            .client
            .post(self.url("/authorizations"))
            .basic_auth(username, Some(password))
            .json(&payload)
            .send()?;
        let response = expect_created(response, "Failed to create authorization token")?;

        let record: TokenRecord = response.json()?;
        Ok(record)
    }
}

/// Anything but 201 Created becomes a `Remote` error carrying the decoded
/// response body (an empty object when the body is not JSON).
fn expect_created(response: Response, message: &str) -> Result<Response, ApiError> {
    let status = response.status();
    if status == StatusCode::CREATED {
        return Ok(response);
    }
    let body: Value = response
        .json()
        .unwrap_or_else(|_| Value::Object(serde_json::Map::new()));
    Err(ApiError::Remote {
        message: format!("{} (HTTP {})", message, status),
        body,
    })
}
