//! Gallery HTTP client
//!
//! Handles communication with the photo-hosting REST endpoint.
//!
//! ## Protocol Notes
//!
//! Every operation is a GET against a single versioned path; the method name
//! and its parameters travel in the query string. The API key is attached to
//! every call and the session token to every call after login. Responses are
//! XML documents wrapped in a `<rsp stat="...">` envelope which is validated
//! before any payload field is read.
//!
//! We build the query string by hand with percent-encoded values rather than
//! reqwest's `.query()` so parameter ordering and encoding stay predictable
//! across the endpoint's picky legacy parser.

use std::time::Duration;

use super::adapter;
use super::domain::{Album, GalleryError, RemoteImage, Session};
use super::dto::RestResponse;

/// Fixed REST endpoint, versioned path included
const DEFAULT_BASE_URL: &str = "https://api.smugmug.com/hack/rest/1.2.0/";

/// User agent string sent on every request
const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Read-only client for the gallery REST API
pub struct GalleryClient {
    api_key: String,
    http_client: reqwest::Client,
    base_url: String,
}

impl GalleryClient {
    /// Create a new client with the given API key.
    ///
    /// `timeout` bounds each request; `None` keeps the transport default.
    pub fn new(api_key: impl Into<String>, timeout: Option<Duration>) -> Self {
        let mut builder = reqwest::Client::builder().gzip(true).user_agent(USER_AGENT);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http_client = builder.build().expect("Failed to build HTTP client");

        Self {
            api_key: api_key.into(),
            http_client,
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Create a client for testing with custom base URL
    #[cfg(test)]
    pub fn with_base_url(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            http_client: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    // ------------------------------------------------------------------
    // Login methods
    // ------------------------------------------------------------------

    /// Anonymous login: grants access to any publicly visible album or image
    pub async fn authenticate(&self) -> Result<Session, GalleryError> {
        self.login("smugmug.login.anonymously", &[]).await
    }

    /// Login with account email and password.
    ///
    /// The password travels as a query parameter; the endpoint is HTTPS but
    /// this is still the weakest of the login methods. Prefer
    /// [`authenticate_with_hash`](Self::authenticate_with_hash) for repeat use.
    pub async fn authenticate_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Session, GalleryError> {
        self.login(
            "smugmug.login.withPassword",
            &[("EmailAddress", email), ("Password", password)],
        )
        .await
    }

    /// Login with the numeric user ID and encrypted password hash returned by
    /// a previous password login
    pub async fn authenticate_with_hash(
        &self,
        user_id: &str,
        password_hash: &str,
    ) -> Result<Session, GalleryError> {
        self.login(
            "smugmug.login.withHash",
            &[("UserID", user_id), ("PasswordHash", password_hash)],
        )
        .await
    }

    /// Terminate a session
    pub async fn logout(&self, session: &Session) -> Result<(), GalleryError> {
        self.request("smugmug.logout", &[], Some(session)).await?;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    /// List the albums visible to this session for the given user nickname
    pub async fn albums(
        &self,
        session: &Session,
        nickname: &str,
    ) -> Result<Vec<Album>, GalleryError> {
        let response = self
            .request(
                "smugmug.albums.get",
                &[("Heavy", "0"), ("NickName", nickname)],
                Some(session),
            )
            .await?;
        Ok(adapter::to_albums(response.albums))
    }

    /// List the images in one album.
    ///
    /// Uses the heavy listing so download URLs are included.
    pub async fn images(
        &self,
        session: &Session,
        album_id: u64,
    ) -> Result<Vec<RemoteImage>, GalleryError> {
        let album_id = album_id.to_string();
        let response = self
            .request(
                "smugmug.images.get",
                &[("AlbumID", &album_id), ("Heavy", "1")],
                Some(session),
            )
            .await?;
        Ok(adapter::to_images(response.images))
    }

    /// Download raw image bytes from a retrieval URL
    pub async fn download(&self, url: &str) -> Result<Vec<u8>, GalleryError> {
        let response = self
            .http_client
            .get(url)
            .send()
            .await
            .map_err(|e| GalleryError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(GalleryError::Network(format!(
                "HTTP {}: {}",
                status,
                status.canonical_reason().unwrap_or("Unknown")
            )));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| GalleryError::Network(e.to_string()))?;
        Ok(bytes.to_vec())
    }

    // ------------------------------------------------------------------
    // Plumbing
    // ------------------------------------------------------------------

    /// Shared login flow: issue the request without a session, then lift the
    /// session token out of the response. Every failure on this path is an
    /// authentication failure from the caller's point of view.
    async fn login(
        &self,
        method: &str,
        params: &[(&str, &str)],
    ) -> Result<Session, GalleryError> {
        let response = self.request(method, params, None).await.map_err(|e| match e {
            GalleryError::Api { message, .. } => GalleryError::Auth(message),
            GalleryError::Network(message) => GalleryError::Auth(message),
            other => other,
        })?;

        match response.session_id {
            Some(id) => Ok(Session::new(id)),
            None => Err(GalleryError::Auth(
                "login response carried no session id".to_string(),
            )),
        }
    }

    /// Issue one REST call and validate the response envelope.
    ///
    /// The `stat` attribute is checked before the parsed payload is handed
    /// back; a non-ok envelope becomes `GalleryError::Api` and the payload is
    /// never exposed.
    async fn request(
        &self,
        method: &str,
        params: &[(&str, &str)],
        session: Option<&Session>,
    ) -> Result<RestResponse, GalleryError> {
        let url = self.build_url(method, params, session);

        let response = self
            .http_client
            .get(&url)
            .send()
            .await
            .map_err(|e| GalleryError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GalleryError::Network(format!(
                "HTTP {}: {} - {}",
                status,
                status.canonical_reason().unwrap_or("Unknown"),
                body.chars().take(200).collect::<String>()
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| GalleryError::Network(e.to_string()))?;
        let parsed = RestResponse::parse(&body)?;

        if !parsed.is_ok() {
            let (code, message) = parsed.error_parts();
            return Err(GalleryError::Api { code, message });
        }

        Ok(parsed)
    }

    /// Build the query URL for one method call
    fn build_url(&self, method: &str, params: &[(&str, &str)], session: Option<&Session>) -> String {
        let mut url = format!("{}?method={}", self.base_url, method);
        url.push_str(&format!("&APIKey={}", urlencoding::encode(&self.api_key)));
        if let Some(session) = session {
            url.push_str(&format!("&SessionID={}", urlencoding::encode(&session.id)));
        }
        for (name, value) in params {
            url.push_str(&format!("&{}={}", name, urlencoding::encode(value)));
        }
        url
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = GalleryClient::new("test-key", None);
        assert_eq!(client.api_key, "test-key");
        assert_eq!(client.base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn test_client_with_custom_url() {
        let client = GalleryClient::with_base_url("key", "http://localhost:8080/");
        assert_eq!(client.base_url, "http://localhost:8080/");
    }

    #[test]
    fn test_build_url_without_session() {
        let client = GalleryClient::with_base_url("my key", "http://host/rest/");
        let url = client.build_url("smugmug.albums.get", &[("NickName", "bob")], None);
        assert_eq!(
            url,
            "http://host/rest/?method=smugmug.albums.get&APIKey=my%20key&NickName=bob"
        );
    }

    #[test]
    fn test_build_url_attaches_session() {
        let client = GalleryClient::with_base_url("k", "http://host/rest/");
        let session = Session::new("s3cr3t");
        let url = client.build_url("smugmug.images.get", &[("AlbumID", "42")], Some(&session));
        assert!(url.contains("SessionID=s3cr3t"));
        assert!(url.contains("AlbumID=42"));
        assert!(url.starts_with("http://host/rest/?method=smugmug.images.get"));
    }

    #[test]
    fn test_build_url_encodes_parameter_values() {
        let client = GalleryClient::with_base_url("k", "http://host/rest/");
        let url = client.build_url("smugmug.albums.get", &[("NickName", "a&b=c")], None);
        assert!(url.contains("NickName=a%26b%3Dc"));
    }

    #[test]
    fn test_user_agent_format() {
        assert!(USER_AGENT.starts_with("album-minder/"));
    }
}
