//! Shell completion for target specs
//!
//! Completion works on the word under the cursor alone and is driven by the
//! delimiters of the target spec grammar rather than by a full parse, so it keeps
//! working on input that is not (yet) valid.
//!
//! # Architecture
//!
//! - **Index**: lookup tables built from the cached registry tree
//! - **Parts**: splitting on the last delimiter into consumed parts and the
//!   part being typed
//! - **Path**: the `//cell/block/target:action` suffix
//! - **Flakeref**: schemes, query strings and `alias:` references
//! - **Resolver**: dispatch on `#` and `//`, cache lookup
//!
//! # Examples
//!
//! ```
//! use paisano::completion::{resolve, CompletionIndex, ResolverContext};
//! use paisano::registry::load_json;
//!
//! let root = load_json(br#"[{"name": "devops", "blocks": []}]"#).unwrap();
//! let index = CompletionIndex::build(&root);
//! let ctx = ResolverContext { index: &index, registries: &[] };
//!
//! let set = resolve(&ctx, "//de");
//! assert_eq!(set.values(), vec!["//devops/"]);
//! ```

mod candidate;
mod diagnostic;
mod flakeref;
mod fs;
mod index;
mod parts;
mod path;
mod resolver;

pub use candidate::{Candidate, Completions, Message, Style};
pub use diagnostic::Diagnostic;
pub use flakeref::{AliasKind, QueryKey, SchemeKey, complete_alias, complete_query, complete_scheme};
pub use index::{CompletionIndex, Entry};
pub use parts::{Parts, split_parts};
pub use path::complete_path;
pub use resolver::{ResolverContext, complete_from_cache, resolve};
