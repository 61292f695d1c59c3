//! Target spec grammar
//!
//! Parses `[flakeref][#[registry]]//cell/block/target:action` into a flat
//! [`Spec`], and the `[flakeref][#[registry]]` prefix alone into a
//! [`RegistryRef`]. Both share the same normalization: an empty flake
//! reference becomes `.`, an empty registry becomes [`BRANDED_REGISTRY`], and
//! the `fh:org/repo[/semver]` shorthand expands to a FlakeHub tarball URL.

use std::fmt;

use sha2::{Digest, Sha256};

use crate::error::{Result, SpecError};

/// Registry used when a spec or reference does not name one.
pub const BRANDED_REGISTRY: &str = "__std";

/// Flake reference used when a spec omits one.
pub const DEFAULT_FLAKE_REF: &str = ".";

/// Shorthand scheme for FlakeHub references.
pub const FLAKEHUB_SHORTHAND: &str = "fh";

/// FlakeHub API host the shorthand expands against.
pub const FLAKEHUB_API: &str = "https://api.flakehub.com";

/// Human-readable grammar shown when a spec fails to parse.
pub const SPEC_USAGE: &str = "[flakeref]#[registry]//[cell]/[block]/[target]:[action] [args...]";

/// A fully resolved target spec.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Spec {
    pub flake_ref: String,
    pub registry: String,
    pub cell: String,
    pub block: String,
    pub target: String,
    pub action: String,
}

/// Which registry of which flake to evaluate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryRef {
    pub flake_ref: String,
    pub registry: String,
}

/// Parse a complete target spec.
///
/// # Arguments
/// * `input` - Raw spec as typed on the command line
///
/// # Returns
/// * `Result<Spec>` - Normalized spec, or `SpecError::MalformedSpec` /
///   `SpecError::MalformedShorthandRef`
///
/// # Examples
///
/// ```
/// use paisano::parser::parse_spec;
///
/// let spec = parse_spec("//old/way/to:write").unwrap();
/// assert_eq!(spec.flake_ref, ".");
/// assert_eq!(spec.registry, "__std");
/// assert_eq!(spec.target, "to");
/// ```
pub fn parse_spec(input: &str) -> Result<Spec> {
    let malformed = |reason| SpecError::MalformedSpec {
        input: input.to_string(),
        reason,
    };

    // Without a '#', both optional segments are empty and the anchor leads.
    let (flake_ref, registry, anchored) = match input.split_once('#') {
        Some((flake_ref, rest)) => {
            let (registry, anchored) = rest.split_at(rest.find('/').unwrap_or(rest.len()));
            (flake_ref, registry, anchored)
        }
        None => ("", "", input),
    };

    let path = anchored
        .strip_prefix("//")
        .ok_or_else(|| malformed("missing '//' before the cell"))?;

    let (cell, path) = path
        .split_once('/')
        .ok_or_else(|| malformed("missing '/' after the cell"))?;
    let (block, path) = path
        .split_once('/')
        .ok_or_else(|| malformed("missing '/' after the block"))?;
    let (target, action) = path
        .rsplit_once(':')
        .ok_or_else(|| malformed("missing ':' before the action"))?;

    if cell.is_empty() {
        return Err(malformed("empty cell").into());
    }
    if block.is_empty() {
        return Err(malformed("empty block").into());
    }
    if target.is_empty() {
        return Err(malformed("empty target").into());
    }
    if action.is_empty() {
        return Err(malformed("empty action").into());
    }

    let registry = normalize(flake_ref, registry)?;

    Ok(Spec {
        flake_ref: registry.flake_ref,
        registry: registry.registry,
        cell: cell.to_string(),
        block: block.to_string(),
        target: target.to_string(),
        action: action.to_string(),
    })
}

/// Parse a `[flakeref][#[registry]]` reference on its own.
///
/// Used by subcommands that operate on a whole registry rather than one
/// action.
pub fn parse_registry_ref(input: &str) -> Result<RegistryRef> {
    let (flake_ref, registry) = input.split_once('#').unwrap_or((input, ""));
    if registry.contains('/') {
        return Err(SpecError::MalformedRegistryRef(input.to_string()).into());
    }
    normalize(flake_ref, registry)
}

/// Apply defaults and shorthand expansion to the optional segments.
fn normalize(flake_ref: &str, registry: &str) -> Result<RegistryRef> {
    let flake_ref = if flake_ref.is_empty() {
        DEFAULT_FLAKE_REF.to_string()
    } else {
        expand_shorthand(flake_ref)?
    };
    let registry = if registry.is_empty() {
        BRANDED_REGISTRY
    } else {
        registry
    };

    Ok(RegistryRef {
        flake_ref,
        registry: registry.to_string(),
    })
}

/// Rewrite `fh:org/repo[/semver]` into the FlakeHub tarball URL.
///
/// References without the shorthand prefix are returned unchanged. Not every
/// evaluator version understands the shorthand natively.
pub fn expand_shorthand(flake_ref: &str) -> Result<String> {
    let Some(rest) = flake_ref
        .strip_prefix(FLAKEHUB_SHORTHAND)
        .and_then(|r| r.strip_prefix(':'))
    else {
        return Ok(flake_ref.to_string());
    };

    let mut parts = rest.splitn(3, '/');
    let org = parts.next().filter(|s| !s.is_empty());
    let repo = parts.next().filter(|s| !s.is_empty());
    let semver = parts.next().unwrap_or("*");

    match (org, repo) {
        (Some(org), Some(repo)) => Ok(format!("{FLAKEHUB_API}/f/{org}/{repo}/{semver}.tar.gz")),
        _ => Err(SpecError::MalformedShorthandRef(flake_ref.to_string()).into()),
    }
}

impl Spec {
    /// The registry this spec's action lives in.
    pub fn registry_ref(&self) -> RegistryRef {
        RegistryRef {
            flake_ref: self.flake_ref.clone(),
            registry: self.registry.clone(),
        }
    }

    /// Evaluator attribute path of this spec's action for `system`.
    pub fn action_attr(&self, system: &str) -> String {
        format!(
            "{}.actions.{system}.{}.{}.{}.{}",
            self.registry_ref().installable(),
            self.cell,
            self.block,
            quote_attr(&self.target),
            self.action
        )
    }
}

impl fmt::Display for Spec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}#{}//{}/{}/{}:{}",
            self.flake_ref, self.registry, self.cell, self.block, self.target, self.action
        )
    }
}

impl RegistryRef {
    /// The registry of the flake in the current directory.
    pub fn local() -> Self {
        Self {
            flake_ref: "./".to_string(),
            registry: BRANDED_REGISTRY.to_string(),
        }
    }

    /// `<flakeRef>#<registry>`, as handed to the evaluator.
    pub fn installable(&self) -> String {
        format!("{}#{}", self.flake_ref, self.registry)
    }

    /// Attribute holding the registry tree for `system`.
    pub fn init_attr(&self, system: &str) -> String {
        format!("{}.init.{system}", self.installable())
    }

    /// Attribute holding the cells directory of the flake.
    pub fn cells_from_attr(&self) -> String {
        format!("{}.cellsFrom", self.installable())
    }

    /// Cache key identifying this registry's tree for `system`.
    ///
    /// Deterministic: the same reference always maps to the same key.
    pub fn cache_key(&self, system: &str) -> String {
        let digest = Sha256::digest(self.init_attr(system).as_bytes());
        hex::encode(digest)
    }
}

impl fmt::Display for RegistryRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.installable())
    }
}

/// Quote an attribute name when it is not a plain identifier.
fn quote_attr(name: &str) -> String {
    let plain = name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '\''));
    if plain {
        name.to_string()
    } else {
        format!("\"{name}\"")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PaisanoError;

    fn spec(flake_ref: &str, registry: &str, path: [&str; 4]) -> Spec {
        Spec {
            flake_ref: flake_ref.to_string(),
            registry: registry.to_string(),
            cell: path[0].to_string(),
            block: path[1].to_string(),
            target: path[2].to_string(),
            action: path[3].to_string(),
        }
    }

    #[test]
    fn test_parse_spec_examples() {
        let cases = [
            (
                "github:nixos/nixpkgs/nixos-unstable#__std//path/to/something:action",
                spec(
                    "github:nixos/nixpkgs/nixos-unstable",
                    "__std",
                    ["path", "to", "something", "action"],
                ),
            ),
            (
                "//old/way/to:write",
                spec(".", BRANDED_REGISTRY, ["old", "way", "to", "write"]),
            ),
            (
                "./#//old/way/to:write",
                spec("./", BRANDED_REGISTRY, ["old", "way", "to", "write"]),
            ),
            (
                "git+ssh://some-gl-profile?ref=bleed&dir=subdir#//old/way/to:write",
                spec(
                    "git+ssh://some-gl-profile?ref=bleed&dir=subdir",
                    BRANDED_REGISTRY,
                    ["old", "way", "to", "write"],
                ),
            ),
            (
                "github:nixos/nixpkgs#//registry/has/default:build",
                spec(
                    "github:nixos/nixpkgs",
                    BRANDED_REGISTRY,
                    ["registry", "has", "default", "build"],
                ),
            ),
            (
                "#__rebranded//devops/containers/service-foo:deploy",
                spec(
                    ".",
                    "__rebranded",
                    ["devops", "containers", "service-foo", "deploy"],
                ),
            ),
            (
                "fh:ryantm/agenix/*#__rebranded//devops/containers/service-foo:deploy",
                spec(
                    "https://api.flakehub.com/f/ryantm/agenix/*.tar.gz",
                    "__rebranded",
                    ["devops", "containers", "service-foo", "deploy"],
                ),
            ),
            (
                "fh:ryantm/agenix/*#//devops/containers/service-foo:deploy",
                spec(
                    "https://api.flakehub.com/f/ryantm/agenix/*.tar.gz",
                    BRANDED_REGISTRY,
                    ["devops", "containers", "service-foo", "deploy"],
                ),
            ),
        ];

        for (input, want) in cases {
            let got = parse_spec(input).unwrap();
            assert_eq!(got, want, "input: {input}");
        }
    }

    #[test]
    fn test_target_may_contain_slashes() {
        let got = parse_spec("//cell/block/nested/target:run").unwrap();
        assert_eq!(got.target, "nested/target");
        assert_eq!(got.action, "run");
    }

    #[test]
    fn test_target_takes_everything_up_to_last_colon() {
        let got = parse_spec("//cell/block/a:b:run").unwrap();
        assert_eq!(got.target, "a:b");
        assert_eq!(got.action, "run");
    }

    #[test]
    fn test_missing_anchor_is_malformed() {
        for input in [
            "github:nixos/nixpkgs//registry/has/default:build",
            "cell/block/target:action",
            "__std//cell/block/target:action",
            "#__std/cell/block/target:action",
        ] {
            let err = parse_spec(input).unwrap_err();
            assert!(
                matches!(err, PaisanoError::Spec(SpecError::MalformedSpec { .. })),
                "input: {input}"
            );
        }
    }

    #[test]
    fn test_first_hash_separates_registry() {
        // No backtracking: a '#' inside the action still starts the registry.
        let err = parse_spec("//cell/block/target:a#b").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid argument format: //cell/block/target:a#b: missing '//' before the cell"
        );

        let spec = parse_spec("#//cell/block/target:a").unwrap();
        assert_eq!(spec.action, "a");
    }

    #[test]
    fn test_empty_segments_are_malformed() {
        for input in [
            "///block/target:action",
            "//cell//target:action",
            "//cell/block/:action",
            "//cell/block/target:",
            "//cell/block/target",
            "//cell/block",
        ] {
            assert!(parse_spec(input).is_err(), "input: {input}");
        }
    }

    #[test]
    fn test_shorthand_without_semver_defaults_to_any() {
        let got = parse_spec("fh:ryantm/agenix#//a/b/c:d").unwrap();
        assert_eq!(
            got.flake_ref,
            "https://api.flakehub.com/f/ryantm/agenix/*.tar.gz"
        );
    }

    #[test]
    fn test_shorthand_without_repo_fails() {
        for input in ["fh:ryantm#//a/b/c:d", "fh:#//a/b/c:d", "fh:/agenix#//a/b/c:d"] {
            let err = parse_spec(input).unwrap_err();
            assert!(
                matches!(err, PaisanoError::Spec(SpecError::MalformedShorthandRef(_))),
                "input: {input}"
            );
        }
    }

    #[test]
    fn test_display_recomposes() {
        let input = "github:nixos/nixpkgs#__std//path/to/something:action";
        assert_eq!(parse_spec(input).unwrap().to_string(), input);
    }

    #[test]
    fn test_parse_registry_ref() {
        let local = parse_registry_ref("").unwrap();
        assert_eq!(local.flake_ref, ".");
        assert_eq!(local.registry, BRANDED_REGISTRY);

        let remote = parse_registry_ref("github:divnix/std#__std").unwrap();
        assert_eq!(remote.installable(), "github:divnix/std#__std");

        let fh = parse_registry_ref("fh:ryantm/agenix/0.1").unwrap();
        assert_eq!(
            fh.flake_ref,
            "https://api.flakehub.com/f/ryantm/agenix/0.1.tar.gz"
        );

        assert!(parse_registry_ref("./#bad/registry").is_err());
    }

    #[test]
    fn test_cache_key_is_deterministic() {
        let a = RegistryRef::local().cache_key("x86_64-linux");
        let b = RegistryRef::local().cache_key("x86_64-linux");
        let c = RegistryRef::local().cache_key("aarch64-darwin");
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a.len(), 64);
    }

    #[test]
    fn test_action_attr() {
        let spec = parse_spec("./#//devops/containers/service-foo:deploy").unwrap();
        assert_eq!(
            spec.action_attr("x86_64-linux"),
            "./#__std.actions.x86_64-linux.devops.containers.service-foo.deploy"
        );

        let nested = parse_spec("//a/b/c/d:run").unwrap();
        assert_eq!(
            nested.action_attr("x86_64-linux"),
            ".#__std.actions.x86_64-linux.a.b.\"c/d\".run"
        );
    }
}
