//! Flake reference grammar
//!
//! Decomposes the URI-like string that names where a registry's flake lives
//! (`github:org/repo`, `git+ssh://host/repo?ref=main`, `./`, ...) into its
//! scheme, authority, path, query and fragment.

use std::fmt;

use url::Url;

use crate::error::{ReferenceError, Result};

/// Classification of a scheme's fetcher/transport pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FetcherKind {
    LocalGit,
    RemoteGit,
    LocalMercurial,
    RemoteMercurial,
    LocalTarball,
    RemoteTarball,
    Path,
    File,
    GitHub,
    GitLab,
    SourceHut,
    FlakeHubShorthand,
    NixRegistryAlias,
}

/// A possibly compound `fetcher+transport` scheme.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scheme {
    pub fetcher: String,
    pub transport: Option<String>,
}

/// A decomposed flake reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlakeReference {
    raw: String,
    pub scheme: Scheme,
    pub authority: Option<String>,
    pub path: String,
    /// Query pairs in input order; duplicate keys are kept.
    pub query: Vec<(String, String)>,
    pub fragment: String,
}

/// Parse a flake reference.
///
/// Bare filesystem paths (`.`, `./sub`, `/abs`, `~/x`) are read as the
/// `path` fetcher, everything else must be a URI.
///
/// # Examples
///
/// ```
/// use paisano::parser::{parse_reference, FetcherKind};
///
/// let r = parse_reference("git+ssh://example.org/repo?ref=main").unwrap();
/// assert_eq!(r.scheme.fetcher, "git");
/// assert_eq!(r.scheme.transport.as_deref(), Some("ssh"));
/// assert_eq!(r.kind().unwrap(), FetcherKind::RemoteGit);
/// ```
pub fn parse_reference(raw: &str) -> Result<FlakeReference> {
    if is_bare_path(raw) {
        return Ok(FlakeReference {
            raw: raw.to_string(),
            scheme: Scheme::parse("path"),
            authority: None,
            path: raw.to_string(),
            query: Vec::new(),
            fragment: String::new(),
        });
    }

    let url = Url::parse(raw).map_err(|e| ReferenceError::Malformed {
        input: raw.to_string(),
        reason: e.to_string(),
    })?;

    let authority = url.host_str().filter(|h| !h.is_empty()).map(|host| {
        match url.port() {
            Some(port) => format!("{host}:{port}"),
            None => host.to_string(),
        }
    });

    Ok(FlakeReference {
        raw: raw.to_string(),
        scheme: Scheme::parse(url.scheme()),
        authority,
        path: url.path().to_string(),
        query: url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect(),
        fragment: url.fragment().unwrap_or_default().to_string(),
    })
}

fn is_bare_path(raw: &str) -> bool {
    raw.starts_with('.') || raw.starts_with('/') || raw.starts_with('~')
}

impl Scheme {
    /// Split a scheme token on its first `+`.
    pub fn parse(token: &str) -> Self {
        match token.split_once('+') {
            Some((fetcher, transport)) => Self {
                fetcher: fetcher.to_string(),
                transport: Some(transport.to_string()),
            },
            None => Self {
                fetcher: token.to_string(),
                transport: None,
            },
        }
    }

    /// Classify the fetcher/transport pair.
    ///
    /// # Returns
    /// * `Result<FetcherKind>` - `ReferenceError::UnsupportedScheme` for
    ///   pairs outside the known set
    pub fn kind(&self) -> Result<FetcherKind> {
        use FetcherKind::*;

        let kind = match (self.fetcher.as_str(), self.transport.as_deref()) {
            ("git", Some("file")) => LocalGit,
            ("git", None | Some("http" | "https" | "ssh")) => RemoteGit,
            ("hg", Some("file")) => LocalMercurial,
            ("hg", Some("http" | "https" | "ssh")) => RemoteMercurial,
            ("tarball", Some("file")) => LocalTarball,
            ("tarball", Some("http" | "https")) | ("http" | "https", None) => RemoteTarball,
            ("file", None | Some("file" | "http" | "https")) => File,
            ("path", None) => Path,
            ("github", None) => GitHub,
            ("gitlab", None) => GitLab,
            ("sourcehut", None) => SourceHut,
            ("fh", None) => FlakeHubShorthand,
            ("flake", None) => NixRegistryAlias,
            _ => return Err(ReferenceError::UnsupportedScheme(self.to_string()).into()),
        };
        Ok(kind)
    }
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.transport {
            Some(transport) => write!(f, "{}+{transport}", self.fetcher),
            None => f.write_str(&self.fetcher),
        }
    }
}

impl FetcherKind {
    /// Whether fetching stays on the local filesystem.
    pub fn is_local(&self) -> bool {
        matches!(
            self,
            FetcherKind::LocalGit
                | FetcherKind::LocalMercurial
                | FetcherKind::LocalTarball
                | FetcherKind::Path
                | FetcherKind::File
        )
    }

    /// Short human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            FetcherKind::LocalGit => "local git tree",
            FetcherKind::RemoteGit => "remote git tree",
            FetcherKind::LocalMercurial => "local mercurial tree",
            FetcherKind::RemoteMercurial => "remote mercurial tree",
            FetcherKind::LocalTarball => "local tarball",
            FetcherKind::RemoteTarball => "remote tarball",
            FetcherKind::Path => "local path",
            FetcherKind::File => "plain file",
            FetcherKind::GitHub => "GitHub",
            FetcherKind::GitLab => "GitLab",
            FetcherKind::SourceHut => "SourceHut",
            FetcherKind::FlakeHubShorthand => "FlakeHub",
            FetcherKind::NixRegistryAlias => "Nix registry",
        }
    }
}

impl FlakeReference {
    /// Classify this reference's scheme.
    pub fn kind(&self) -> Result<FetcherKind> {
        self.scheme.kind()
    }

    /// First value of a query key.
    pub fn query_value(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

impl fmt::Display for FlakeReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}
