use crate::artifacts::remote::{REMOTE_SCHEMES, SCHEME_URL_REGEX, SCP_URL_REGEX};
use derive_new::new;
use std::sync::LazyLock;

static SCHEME_URL: LazyLock<regex::Regex> =
    LazyLock::new(|| regex::Regex::new(SCHEME_URL_REGEX).expect("scheme url regex is valid"));
static SCP_URL: LazyLock<regex::Regex> =
    LazyLock::new(|| regex::Regex::new(SCP_URL_REGEX).expect("scp url regex is valid"));

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RemoteUrlError {
    #[error("cannot parse owner and repo from remote `{url}`: {reason}")]
    MalformedRemoteUrl { url: String, reason: String },
}

impl RemoteUrlError {
    fn malformed(url: &str, reason: impl Into<String>) -> Self {
        RemoteUrlError::MalformedRemoteUrl {
            url: url.to_string(),
            reason: reason.into(),
        }
    }
}

/// Owner and repository name of a hosted remote
#[derive(Debug, Clone, PartialEq, Eq, Hash, new)]
pub struct RemoteDescriptor {
    pub owner: String,
    pub repo: String,
}

impl std::fmt::Display for RemoteDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.owner, self.repo)
    }
}

/// Extract `owner/repo` from a remote URL
///
/// Accepts `scheme://[user@]host[:port]/owner/repo[.git]` for the schemes in
/// [`REMOTE_SCHEMES`] and the scp-like `[user@]host:owner/repo[.git]` form.
/// The path must contain exactly two segments; nested groups are rejected
/// instead of being truncated.
pub fn parse_owner_repo(remote_url: &str) -> Result<RemoteDescriptor, RemoteUrlError> {
    let url = remote_url.trim();
    if url.is_empty() {
        return Err(RemoteUrlError::malformed(remote_url, "remote url is empty"));
    }

    let path = extract_path(url)?;
    let path = path.trim_matches('/');
    let path = path.strip_suffix(".git").unwrap_or(path);

    match path.split('/').collect::<Vec<_>>().as_slice() {
        [owner, repo] if !owner.is_empty() && !repo.is_empty() => {
            Ok(RemoteDescriptor::new(owner.to_string(), repo.to_string()))
        }
        segments => Err(RemoteUrlError::malformed(
            remote_url,
            format!(
                "expected `owner/repo`, found {} path segment(s) in `{}`",
                segments.len(),
                path
            ),
        )),
    }
}

fn extract_path(url: &str) -> Result<&str, RemoteUrlError> {
    if let Some(captures) = SCHEME_URL.captures(url) {
        let scheme = captures["scheme"].to_ascii_lowercase();
        if !REMOTE_SCHEMES.contains(scheme.as_str()) {
            return Err(RemoteUrlError::malformed(
                url,
                format!("unsupported transport `{scheme}`"),
            ));
        }

        return Ok(captures.name("path").map_or("", |path| path.as_str()));
    }

    if url.contains("://") {
        return Err(RemoteUrlError::malformed(url, "unrecognised url syntax"));
    }

    SCP_URL
        .captures(url)
        .and_then(|captures| captures.name("path"))
        .map(|path| path.as_str())
        .ok_or_else(|| RemoteUrlError::malformed(url, "not a url or scp-like address"))
}
