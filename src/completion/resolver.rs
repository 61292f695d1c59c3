//! Position-sensitive completion of a partially typed spec
//!
//! The value is tokenized progressively: first on `#`, then on `//` after
//! it, then by the path and reference completers. Each level only looks at
//! the segment under the cursor and re-prefixes what the level below returns.

use super::candidate::{Completions, Style};
use super::diagnostic::Diagnostic;
use super::flakeref::{complete_alias, complete_scheme};
use super::fs::list_local;
use super::index::CompletionIndex;
use super::parts::split_parts;
use super::path::complete_path;
use crate::cache::ByteCache;
use crate::config::WellKnownRegistry;
use crate::parser::RegistryRef;
use crate::registry::load_json;

/// Everything completion needs besides the typed value
#[derive(Debug, Clone)]
pub struct ResolverContext<'a> {
    pub index: &'a CompletionIndex,
    /// Registry names offered right after `#`
    pub registries: &'a [WellKnownRegistry],
}

/// Complete a partially typed spec.
///
/// Never fails; problems come back as messages. Only candidates extending
/// `value` are returned.
///
/// # Arguments
/// * `ctx` - Index and well-known registries
/// * `value` - The word under the cursor
///
/// # Returns
/// * `Completions` - Ordered candidates and messages
pub fn resolve(ctx: &ResolverContext<'_>, value: &str) -> Completions {
    let split = split_parts(value, "#");

    let set = match split.position() {
        0 => complete_flake_ref(ctx, value),
        1 => complete_after_hash(ctx, split.current),
        _ => Diagnostic::GrammarOverflow {
            delimiter: "#",
            max: 1,
        }
        .into(),
    };

    let set = set.prefix(split.head).filter_prefix(value);
    tracing::debug!(
        value,
        candidates = set.candidates.len(),
        messages = set.messages.len(),
        "resolved completions"
    );
    set
}

/// Anything before `#`: a path, a reference or a local directory.
fn complete_flake_ref(ctx: &ResolverContext<'_>, value: &str) -> Completions {
    let mut set = Completions::new();

    match value.strip_prefix("//") {
        // At most one anchor
        Some(path) if split_parts(path, "//").position() > 0 => {
            set = set.extend(
                Diagnostic::GrammarOverflow {
                    delimiter: "//",
                    max: 1,
                }
                .into(),
            );
        }
        Some(_) => set = set.extend(complete_path(ctx.index, value)),
        None if value.is_empty() => set = set.extend(complete_path(ctx.index, value)),
        None => {}
    }

    set = set
        .extend(complete_scheme(value))
        .extend(complete_alias(value));

    let local = value.starts_with('.') || (value.starts_with('/') && !value.starts_with("//"));
    if local {
        set = set.extend(list_local(value, false));
    }

    set
}

/// The registry and path after `#`.
fn complete_after_hash(ctx: &ResolverContext<'_>, value: &str) -> Completions {
    let split = split_parts(value, "//");

    match split.position() {
        0 => registry_names(ctx)
            .extend(complete_path(ctx.index, ""))
            .prefix(split.head),
        1 => {
            // The path completer wants its anchor back.
            let mut path = String::with_capacity(split.current.len() + 2);
            path.push_str("//");
            path.push_str(split.current);
            complete_path(ctx.index, &path).prefix(split.parts[0])
        }
        _ => Diagnostic::GrammarOverflow {
            delimiter: "//",
            max: 1,
        }
        .into(),
    }
}

fn registry_names(ctx: &ResolverContext<'_>) -> Completions {
    Completions::described(
        ctx.registries
            .iter()
            .map(|r| (r.name.as_str(), r.description.as_str())),
    )
    .suffix("//")
    .style(Style::Highlight(1))
}

/// Complete from the cached tree of `registry`.
///
/// A missing cache entry or an unreadable tree degrades to a single
/// diagnostic; the evaluator is never invoked from here.
///
/// # Arguments
/// * `cache` - Where `re-cache` stored the tree
/// * `registry` - Registry whose tree is completed
/// * `system` - System the tree was evaluated for
/// * `registries` - Registry names offered after `#`
/// * `program` - Name the user invoked, for the re-cache hint
/// * `value` - The word under the cursor
pub fn complete_from_cache(
    cache: &dyn ByteCache,
    registry: &RegistryRef,
    system: &str,
    registries: &[WellKnownRegistry],
    program: &str,
    value: &str,
) -> Completions {
    let key = registry.cache_key(system);

    let bytes = match cache.get_bytes(&key) {
        Ok(Some(bytes)) => bytes,
        Ok(None) => {
            return Diagnostic::NoCache {
                program: program.to_string(),
            }
            .into();
        }
        Err(e) => {
            tracing::warn!(error = %e, "completion cache unreadable");
            return Diagnostic::TreeUnavailable(e.to_string()).into();
        }
    };

    let root = match load_json(&bytes) {
        Ok(root) => root,
        Err(e) => return Diagnostic::TreeUnavailable(e.to_string()).into(),
    };

    let index = CompletionIndex::build(&root);
    let ctx = ResolverContext {
        index: &index,
        registries,
    };
    resolve(&ctx, value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::FileCache;
    use crate::completion::fixtures::sample_index;
    use crate::config::Config;

    fn resolve_with(value: &str) -> Completions {
        let index = sample_index();
        let registries = Config::new().registries;
        let ctx = ResolverContext {
            index: &index,
            registries: &registries,
        };
        resolve(&ctx, value)
    }

    #[test]
    fn test_action_position_yields_only_actions() {
        let set = resolve_with("//devops/containers/service-foo:");
        let displays: Vec<&str> = set.candidates.iter().map(|c| c.display.as_str()).collect();
        assert_eq!(displays, vec!["deploy", "build"]);
        assert_eq!(set.candidates[0].description, "push to the cluster");
        assert!(set.messages.is_empty());

        let set = resolve_with("//devops/containers/service-foo:d");
        assert_eq!(set.values(), vec!["//devops/containers/service-foo:deploy"]);
    }

    #[test]
    fn test_empty_value_offers_every_start() {
        let set = resolve_with("");
        let values = set.values();
        assert_eq!(values[0], "//devops/");
        assert!(values.contains(&"git+ssh://"));
        assert!(values.contains(&"github:"));
    }

    #[test]
    fn test_registry_after_hash() {
        let set = resolve_with("github:divnix/std#");
        assert_eq!(
            set.values(),
            vec![
                "github:divnix/std#__std//",
                "github:divnix/std#//devops/",
                "github:divnix/std#//automation/"
            ]
        );
        assert!(set.candidates[0].no_space);
    }

    #[test]
    fn test_path_after_registry() {
        let set = resolve_with("./#__std//devops/con");
        assert_eq!(set.values(), vec!["./#__std//devops/containers/"]);

        let set = resolve_with("#//devops/containers/service-foo:b");
        assert_eq!(
            set.values(),
            vec!["#//devops/containers/service-foo:build"]
        );
    }

    #[test]
    fn test_second_hash_overflows() {
        let set = resolve_with("./#__std#");
        assert!(set.candidates.is_empty());
        assert_eq!(set.messages.len(), 1);
        assert_eq!(set.messages[0].text, "Should not have more than 1 '#'");
        assert_eq!(set.messages[0].style, Style::Error);
    }

    #[test]
    fn test_second_anchor_overflows() {
        let set = resolve_with("#__std//devops//");
        assert!(set.candidates.is_empty());
        assert_eq!(set.messages[0].text, "Should not have more than 1 '//'");
    }

    #[test]
    fn test_second_anchor_without_hash_overflows() {
        let set = resolve_with("//devops//");
        assert!(set.candidates.is_empty());
        assert_eq!(set.messages.len(), 1);
        assert_eq!(set.messages[0].text, "Should not have more than 1 '//'");
        assert_eq!(set.messages[0].style, Style::Error);

        // A single anchor still completes.
        assert_eq!(resolve_with("//devops/").values(), vec!["//devops/containers/"]);
    }

    #[test]
    fn test_local_directory_listing() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("my-flake")).unwrap();

        let value = format!("{}/my", dir.path().display());
        let set = resolve_with(&value);
        assert_eq!(set.values(), vec![format!("{}/my-flake/", dir.path().display())]);
    }

    #[test]
    fn test_cache_miss_yields_one_diagnostic() {
        let dir = tempfile::tempdir().unwrap();
        let cache = FileCache::new(dir.path());

        let set = complete_from_cache(
            &cache,
            &RegistryRef::local(),
            "x86_64-linux",
            &Config::new().registries,
            "std",
            "//",
        );
        assert!(set.candidates.is_empty());
        assert_eq!(
            set.messages,
            Completions::from(Diagnostic::NoCache {
                program: "std".to_string()
            })
            .messages
        );
    }

    #[test]
    fn test_completes_from_cached_tree() {
        let dir = tempfile::tempdir().unwrap();
        let cache = FileCache::new(dir.path());
        let registry = RegistryRef::local();
        let tree = br#"[{"name": "devops", "blocks": [{"name": "containers", "targets": []}]}]"#;
        cache
            .put_bytes(&registry.cache_key("x86_64-linux"), tree)
            .unwrap();

        let set = complete_from_cache(
            &cache,
            &registry,
            "x86_64-linux",
            &Config::new().registries,
            "std",
            "//devops/",
        );
        assert_eq!(set.values(), vec!["//devops/containers/"]);
    }

    #[test]
    fn test_broken_tree_is_a_diagnostic() {
        let dir = tempfile::tempdir().unwrap();
        let cache = FileCache::new(dir.path());
        let registry = RegistryRef::local();
        cache
            .put_bytes(&registry.cache_key("x86_64-linux"), b"{not json")
            .unwrap();

        let set = complete_from_cache(
            &cache,
            &registry,
            "x86_64-linux",
            &[],
            "std",
            "//",
        );
        assert!(set.candidates.is_empty());
        assert!(set.messages[0].text.starts_with("Completion cache unusable"));
    }
}
