//! Paisano - CLI companion for Paisano registries
//!
//! This library provides the core of the `paisano` command: the grammars of
//! its arguments, the registry tree, the completion engine and the
//! invocation of the external `nix` evaluator.
//!
//! # Modules
//!
//! - `cache`: Byte cache holding evaluated registry trees
//! - `cli`: Command-line interface and argument parsing
//! - `completion`: Position-sensitive shell completion
//! - `config`: Configuration management
//! - `error`: Error types and handling
//! - `formatter`: Output formatting and display
//! - `nix`: Invocation of the `nix` evaluator
//! - `parser`: Target spec and flake reference grammars
//! - `registry`: The cell/block/target/action tree
//!
//! # Example
//!
//! ```
//! use paisano::parser::parse_spec;
//!
//! let spec = parse_spec("#__std//automation/jobs/docs:run").unwrap();
//! assert_eq!(spec.action_attr("x86_64-linux"),
//!     ".#__std.actions.x86_64-linux.automation.jobs.docs.run");
//! ```

pub mod cache;
pub mod cli;
pub mod completion;
pub mod config;
pub mod error;
pub mod formatter;
pub mod nix;
pub mod parser;
pub mod registry;

// Re-export commonly used types
pub use cache::{ByteCache, FileCache};
pub use completion::{CompletionIndex, Completions};
pub use config::Config;
pub use error::{PaisanoError, Result};
pub use formatter::Formatter;
pub use nix::Evaluator;
pub use parser::{FlakeReference, RegistryRef, Spec};
pub use registry::Root;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get library version string
///
/// # Returns
/// * `&str` - Version string
pub fn version() -> &'static str {
    VERSION
}
