//! Completion of flake references
//!
//! Three completers cover the part before `#`:
//! - URL-style references (`git+ssh://host/repo?ref=main`), by [`SchemeKey`]
//! - query strings after `?`, by [`QueryKey`]
//! - `alias:` references such as `github:org/repo`, by [`AliasKind`]

use std::str::FromStr;

use super::candidate::{Candidate, Completions, Style};
use super::diagnostic::Diagnostic;
use super::fs::list_local;
use super::parts::split_parts;
use crate::parser::{FetcherKind, Scheme};

/// URL-style schemes offered before `://`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemeKey {
    TarballFile,
    TarballHttp,
    TarballHttps,
    GitFile,
    Git,
    GitHttp,
    GitHttps,
    GitSsh,
    HgFile,
    HgHttp,
    HgHttps,
    HgSsh,
    File,
    Path,
}

impl SchemeKey {
    pub const ALL: [SchemeKey; 14] = [
        SchemeKey::TarballFile,
        SchemeKey::TarballHttp,
        SchemeKey::TarballHttps,
        SchemeKey::GitFile,
        SchemeKey::Git,
        SchemeKey::GitHttp,
        SchemeKey::GitHttps,
        SchemeKey::GitSsh,
        SchemeKey::HgFile,
        SchemeKey::HgHttp,
        SchemeKey::HgHttps,
        SchemeKey::HgSsh,
        SchemeKey::File,
        SchemeKey::Path,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SchemeKey::TarballFile => "tarball+file",
            SchemeKey::TarballHttp => "tarball+http",
            SchemeKey::TarballHttps => "tarball+https",
            SchemeKey::GitFile => "git+file",
            SchemeKey::Git => "git",
            SchemeKey::GitHttp => "git+http",
            SchemeKey::GitHttps => "git+https",
            SchemeKey::GitSsh => "git+ssh",
            SchemeKey::HgFile => "hg+file",
            SchemeKey::HgHttp => "hg+http",
            SchemeKey::HgHttps => "hg+https",
            SchemeKey::HgSsh => "hg+ssh",
            SchemeKey::File => "file",
            SchemeKey::Path => "path",
        }
    }

    /// Classification by the reference grammar
    pub fn kind(&self) -> Option<FetcherKind> {
        Scheme::parse(self.as_str()).kind().ok()
    }

    pub fn description(&self) -> String {
        let scheme = Scheme::parse(self.as_str());
        match (scheme.kind(), scheme.transport.as_deref()) {
            (Ok(kind), Some(transport)) if !kind.is_local() => {
                format!("{} over {transport}", kind.label())
            }
            (Ok(kind), _) => kind.label().to_string(),
            (Err(_), _) => String::new(),
        }
    }

    /// Whether the reference is resolved on the local filesystem
    pub fn is_local(&self) -> bool {
        self.kind().is_some_and(|k| k.is_local())
    }
}

impl FromStr for SchemeKey {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SchemeKey::ALL
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or(())
    }
}

/// Query parameters offered after `?`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryKey {
    Dir,
    Ref,
    Rev,
}

impl QueryKey {
    pub const ALL: [QueryKey; 3] = [QueryKey::Dir, QueryKey::Ref, QueryKey::Rev];

    pub fn as_str(&self) -> &'static str {
        match self {
            QueryKey::Dir => "dir",
            QueryKey::Ref => "ref",
            QueryKey::Rev => "rev",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            QueryKey::Dir => "subdirectory",
            QueryKey::Ref => "branch or tag name",
            QueryKey::Rev => "commit-ish",
        }
    }

    fn hint(&self) -> &'static str {
        match self {
            QueryKey::Dir => "dir: subdirectory holding flake.nix",
            QueryKey::Ref => "ref: branch or tag name",
            QueryKey::Rev => "rev: commit hash",
        }
    }

    fn parse(s: &str) -> Option<Self> {
        QueryKey::ALL.into_iter().find(|k| k.as_str() == s)
    }
}

/// `alias:` reference types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AliasKind {
    FlakeHub,
    GitHub,
    GitLab,
    SourceHut,
    NixRegistry,
}

impl AliasKind {
    pub const ALL: [AliasKind; 5] = [
        AliasKind::FlakeHub,
        AliasKind::GitHub,
        AliasKind::GitLab,
        AliasKind::SourceHut,
        AliasKind::NixRegistry,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AliasKind::FlakeHub => crate::parser::FLAKEHUB_SHORTHAND,
            AliasKind::GitHub => "github",
            AliasKind::GitLab => "gitlab",
            AliasKind::SourceHut => "sourcehut",
            AliasKind::NixRegistry => "flake",
        }
    }

    pub fn description(&self) -> &'static str {
        Scheme::parse(self.as_str())
            .kind()
            .map_or("", |k| k.label())
    }

    fn parse(s: &str) -> Option<Self> {
        AliasKind::ALL.into_iter().find(|k| k.as_str() == s)
    }
}

/// Complete a URL-style reference.
pub fn complete_scheme(value: &str) -> Completions {
    let split = split_parts(value, "://");

    let set = match split.position() {
        0 => scheme_keys(),
        1 => match split.parts[0].parse::<SchemeKey>() {
            Ok(key) => complete_location(key, split.current),
            Err(()) => Diagnostic::UnsupportedScheme(split.parts[0].to_string()).into(),
        },
        _ => Diagnostic::GrammarOverflow {
            delimiter: "://",
            max: 1,
        }
        .into(),
    };

    set.prefix(split.head)
}

fn scheme_keys() -> Completions {
    let mut set = Completions::new();
    for key in SchemeKey::ALL {
        let mut c = Candidate::new(format!("{}://", key.as_str()), key.description());
        c.style = if key.is_local() {
            Style::Local
        } else {
            Style::Remote
        };
        c.no_space = true;
        set.candidates.push(c);
    }
    set
}

/// Complete what follows `<scheme>://`
fn complete_location(key: SchemeKey, value: &str) -> Completions {
    let split = split_parts(value, "?");

    let set = match split.position() {
        0 if key.is_local() => list_local(
            split.current,
            key.kind() == Some(FetcherKind::LocalTarball),
        ),
        0 => Diagnostic::NeedsNetwork(key.as_str().to_string()).into(),
        1 => complete_query(split.current),
        _ => Diagnostic::GrammarOverflow {
            delimiter: "?",
            max: 1,
        }
        .into(),
    };

    set.prefix(split.head)
}

/// Complete a query string, the part after `?`.
pub fn complete_query(value: &str) -> Completions {
    let pairs = split_parts(value, "&");
    let used: Vec<&str> = pairs
        .parts
        .iter()
        .map(|p| p.split_once('=').map_or(*p, |(k, _)| k))
        .collect();

    let pair = split_parts(pairs.current, "=");
    let set = match pair.position() {
        0 => unused_keys(&used, None).suffix("="),
        1 => match QueryKey::parse(pair.parts[0]) {
            Some(key) => {
                let hint = Completions::message(key.hint(), Style::Plain);
                if pair.current.is_empty() {
                    hint
                } else {
                    // Offer to move on to the next parameter.
                    unused_keys(&used, Some(key))
                        .suffix("=")
                        .prefix("&")
                        .prefix(pairs.current)
                        .extend(hint)
                }
            }
            None => Completions::new(),
        },
        _ => Diagnostic::GrammarOverflow {
            delimiter: "=",
            max: 1,
        }
        .into(),
    };

    set.prefix(pairs.head)
}

fn unused_keys(used: &[&str], current: Option<QueryKey>) -> Completions {
    Completions::described(
        QueryKey::ALL
            .iter()
            .filter(|k| !used.contains(&k.as_str()) && Some(**k) != current)
            .map(|k| (k.as_str(), k.description())),
    )
}

/// Complete an `alias:` reference.
pub fn complete_alias(value: &str) -> Completions {
    let split = split_parts(value, ":");

    let set = match split.position() {
        0 => Completions::described(
            AliasKind::ALL
                .iter()
                .map(|k| (k.as_str(), k.description())),
        )
        .suffix(":")
        .style(Style::Provider),
        1 => match AliasKind::parse(split.parts[0]) {
            Some(alias) => Diagnostic::NotYetSupported(alias.as_str().to_string()).into(),
            None => Completions::new(),
        },
        _ => Completions::new(),
    };

    set.prefix(split.head)
}
