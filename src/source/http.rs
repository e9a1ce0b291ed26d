//! HTTP directory sources for the file-sharing server.
//!
//! Private listings come from `/api/resources{path}`; share listings from
//! `/api/public/share/{hash}{path}`, with the share password sent URL-encoded in
//! the `X-SHARE-PASSWORD` header.

use super::{DirectoryListing, PrivateDirectorySource, PublicDirectorySource};
use crate::config::ServerConfig;
use crate::error::{BackendError, TreeError};
use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use std::time::Duration;
use tracing::debug;

const AUTH_HEADER: &str = "X-Auth";
const SHARE_PASSWORD_HEADER: &str = "X-SHARE-PASSWORD";

fn build_client(timeout_secs: u64) -> Result<Client, TreeError> {
    Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .build()
        .map_err(|e| TreeError::Config(format!("Failed to build HTTP client: {}", e)))
}

/// Percent-encode each segment of `path`, keeping separators and the leading `/`.
fn encode_path(path: &str) -> String {
    let encoded: Vec<String> = path
        .split('/')
        .filter(|s| !s.is_empty())
        .map(|s| urlencoding::encode(s).into_owned())
        .collect();
    format!("/{}", encoded.join("/"))
}

fn trim_base(base_url: &str) -> String {
    base_url.trim_end_matches('/').to_string()
}

async fn read_listing(response: Response, url: &str) -> Result<DirectoryListing, BackendError> {
    let status = response.status();
    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        return Err(BackendError::Unauthorized(format!("{} returned {}", url, status)));
    }
    if !status.is_success() {
        return Err(BackendError::Status {
            status: status.as_u16(),
            url: url.to_string(),
        });
    }
    response
        .json::<DirectoryListing>()
        .await
        .map_err(|e| BackendError::Decode(e.to_string()))
}

/// Authenticated file API.
pub struct HttpFileSource {
    client: Client,
    base_url: String,
    auth_token: Option<String>,
}

impl HttpFileSource {
    pub fn new(client: Client, base_url: &str, auth_token: Option<String>) -> Self {
        Self {
            client,
            base_url: trim_base(base_url),
            auth_token,
        }
    }

    pub fn from_config(config: &ServerConfig) -> Result<Self, TreeError> {
        Ok(Self::new(
            build_client(config.timeout_secs)?,
            &config.base_url,
            config.auth_token.clone(),
        ))
    }

    pub fn listing_url(&self, path: &str) -> String {
        format!("{}/api/resources{}", self.base_url, encode_path(path))
    }
}

#[async_trait]
impl PrivateDirectorySource for HttpFileSource {
    async fn fetch_directory(&self, path: &str) -> Result<DirectoryListing, BackendError> {
        let url = self.listing_url(path);
        debug!(url = %url, "Fetching private listing");

        let mut request = self.client.get(&url);
        if let Some(token) = &self.auth_token {
            request = request.header(AUTH_HEADER, token);
        }
        let response = request.send().await?;
        read_listing(response, &url).await
    }
}

/// Public share API.
pub struct HttpShareSource {
    client: Client,
    base_url: String,
    password: String,
}

impl HttpShareSource {
    pub fn new(client: Client, base_url: &str, password: Option<String>) -> Self {
        Self {
            client,
            base_url: trim_base(base_url),
            password: password.unwrap_or_default(),
        }
    }

    pub fn from_config(config: &ServerConfig) -> Result<Self, TreeError> {
        Ok(Self::new(
            build_client(config.timeout_secs)?,
            &config.base_url,
            config.share_password.clone(),
        ))
    }

    pub fn listing_url(&self, share: &str, path: &str) -> String {
        format!(
            "{}/api/public/share/{}{}",
            self.base_url,
            urlencoding::encode(share),
            encode_path(path)
        )
    }

    fn password_header(&self) -> String {
        urlencoding::encode(&self.password).into_owned()
    }
}

#[async_trait]
impl PublicDirectorySource for HttpShareSource {
    async fn fetch_directory(
        &self,
        share: &str,
        path: &str,
    ) -> Result<DirectoryListing, BackendError> {
        let url = self.listing_url(share, path);
        debug!(url = %url, share, "Fetching share listing");

        let response = self
            .client
            .get(&url)
            .header(SHARE_PASSWORD_HEADER, self.password_header())
            .send()
            .await?;
        read_listing(response, &url).await
    }
}
