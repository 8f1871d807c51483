use serde_json::{Map, Value};
use thiserror::Error;

/// Placeholder shown for any server field we could not learn
pub const UNAVAILABLE: &str = "Unavailable";

/// Path of the version endpoint, relative to the base service URL
pub const SERVER_VERSION_PATH: &str = "/server/version";

/// Build information baked into this binary
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalVersion {
    pub build: String,
    pub commit_sha: String,
}

impl LocalVersion {
    /// Version of the running binary, as recorded by build.rs
    pub fn current() -> Self {
        Self {
            build: env!("MESHCTL_BUILD").to_string(),
            commit_sha: env!("MESHCTL_COMMIT_SHA").to_string(),
        }
    }

    pub fn new(build: impl Into<String>, commit_sha: impl Into<String>) -> Self {
        Self {
            build: build.into(),
            commit_sha: commit_sha.into(),
        }
    }
}

/// Version reported by the server's version API.
///
/// Fields the server does not send (or sends as null) keep the
/// `Unavailable` placeholder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteVersion {
    pub build: String,
    pub commit_sha: String,
}

impl RemoteVersion {
    pub fn unavailable() -> Self {
        Self {
            build: UNAVAILABLE.to_string(),
            commit_sha: UNAVAILABLE.to_string(),
        }
    }
}

impl Default for RemoteVersion {
    fn default() -> Self {
        Self::unavailable()
    }
}

/// Why the server version could not be fetched
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("could not build request for {url}: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("failed to read response from {url}: {source}")]
    Body {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("failed to decode response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}

impl FetchError {
    /// The URL the failed exchange was aimed at
    pub fn url(&self) -> &str {
        match self {
            FetchError::Request { url, .. }
            | FetchError::Transport { url, .. }
            | FetchError::Body { url, .. }
            | FetchError::Decode { url, .. } => url,
        }
    }
}

/// Full URL of the version endpoint for a base service URL
pub fn server_version_url(base_url: &str) -> String {
    format!("{}{}", base_url, SERVER_VERSION_PATH)
}

/// Decode a version API response body.
///
/// Decoding fills the placeholder version in place: a `null` body changes
/// nothing, keys match `build` / `commitsha` ignoring ASCII case, and a key
/// seen twice keeps its last value. Non-object bodies and non-string field
/// values are errors.
pub fn parse_remote_version(body: &[u8]) -> Result<RemoteVersion, serde_json::Error> {
    let mut version = RemoteVersion::unavailable();

    let fields: Option<Map<String, Value>> = serde_json::from_slice(body)?;
    for (key, value) in fields.into_iter().flatten() {
        let target = if key.eq_ignore_ascii_case("build") {
            &mut version.build
        } else if key.eq_ignore_ascii_case("commitsha") {
            &mut version.commit_sha
        } else {
            continue;
        };

        if let Some(value) = serde_json::from_value::<Option<String>>(value)? {
            *target = value;
        }
    }

    Ok(version)
}

/// Ask the server at `base_url` for its version.
///
/// One GET, no retries and no timeout beyond what `client` carries. The HTTP
/// status is not checked; a body that decodes is accepted.
pub async fn fetch_server_version(
    client: &reqwest::Client,
    base_url: &str,
) -> Result<RemoteVersion, FetchError> {
    let url = server_version_url(base_url);

    let request = client
        .get(&url)
        .build()
        .map_err(|source| FetchError::Request {
            url: url.clone(),
            source,
        })?;

    let response = client
        .execute(request)
        .await
        .map_err(|source| FetchError::Transport {
            url: url.clone(),
            source,
        })?;

    log::debug!("GET {} -> {}", url, response.status());

    let body = response.bytes().await.map_err(|source| FetchError::Body {
        url: url.clone(),
        source,
    })?;

    parse_remote_version(&body).map_err(|source| FetchError::Decode { url, source })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_response() {
        let version = parse_remote_version(br#"{"build":"v0.5.2","commitsha":"a1b2c3d"}"#).unwrap();
        assert_eq!(version.build, "v0.5.2");
        assert_eq!(version.commit_sha, "a1b2c3d");
    }

    #[test]
    fn test_parse_empty_object_keeps_placeholder() {
        let version = parse_remote_version(b"{}").unwrap();
        assert_eq!(version, RemoteVersion::unavailable());
    }

    #[test]
    fn test_parse_null_body_keeps_placeholder() {
        let version = parse_remote_version(b"null").unwrap();
        assert_eq!(version, RemoteVersion::unavailable());
    }

    #[test]
    fn test_parse_keys_ignore_case() {
        let version = parse_remote_version(br#"{"Build":"1.2.3","CommitSHA":"abcd"}"#).unwrap();
        assert_eq!(version.build, "1.2.3");
        assert_eq!(version.commit_sha, "abcd");
    }

    #[test]
    fn test_parse_duplicate_key_keeps_last() {
        let version =
            parse_remote_version(br#"{"build":"1.0.0","build":"1.2.3","BUILD":null}"#).unwrap();
        assert_eq!(version.build, "1.2.3");
        assert_eq!(version.commit_sha, UNAVAILABLE);
    }

    #[test]
    fn test_parse_mixed_case_keys_apply_in_document_order() {
        let version = parse_remote_version(br#"{"build":"1.0.0","Build":"1.2.3"}"#).unwrap();
        assert_eq!(version.build, "1.2.3");

        let version = parse_remote_version(br#"{"Build":"1.2.3","build":"1.0.0"}"#).unwrap();
        assert_eq!(version.build, "1.0.0");
    }

    #[test]
    fn test_parse_partial_and_null_fields() {
        let version = parse_remote_version(br#"{"build":"v0.5.2","commitsha":null}"#).unwrap();
        assert_eq!(version.build, "v0.5.2");
        assert_eq!(version.commit_sha, UNAVAILABLE);
    }

    #[test]
    fn test_parse_ignores_unknown_fields() {
        let version =
            parse_remote_version(br#"{"build":"v1","commitsha":"abc","release_channel":"edge"}"#)
                .unwrap();
        assert_eq!(version.build, "v1");
        assert_eq!(version.commit_sha, "abc");
    }

    #[test]
    fn test_parse_empty_string_is_kept() {
        let version = parse_remote_version(br#"{"build":"","commitsha":"abc"}"#).unwrap();
        assert_eq!(version.build, "");
    }

    #[test]
    fn test_parse_rejects_bad_shapes() {
        assert!(parse_remote_version(b"not json").is_err());
        assert!(parse_remote_version(br#""v0.5.2""#).is_err());
        assert!(parse_remote_version(br#"{"build":42}"#).is_err());
        assert!(parse_remote_version(br#"{"commitsha":["abcd"]}"#).is_err());
        assert!(parse_remote_version(b"").is_err());
    }

    #[test]
    fn test_server_version_url() {
        assert_eq!(
            server_version_url("http://localhost:9081"),
            "http://localhost:9081/server/version"
        );
    }

    #[test]
    fn test_local_version_current_is_populated() {
        let local = LocalVersion::current();
        assert!(!local.build.is_empty());
        assert!(!local.commit_sha.is_empty());
    }
}
