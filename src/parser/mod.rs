//! Grammars for paisano's command-line surface
//!
//! # Architecture
//!
//! - `spec`: the target spec grammar
//!   `[flakeref][#[registry]]//cell/block/target:action` and the registry-only
//!   prefix `[flakeref][#[registry]]`
//! - `reference`: the flake reference grammar (`scheme://authority/path?query#fragment`
//!   with compound `fetcher+transport` schemes)
//!
//! # Examples
//!
//! ```
//! use paisano::parser::{parse_spec, parse_reference};
//!
//! let spec = parse_spec("github:divnix/std#__std//automation/jobs/docs:run").unwrap();
//! assert_eq!(spec.cell, "automation");
//!
//! let reference = parse_reference(&spec.flake_ref).unwrap();
//! assert_eq!(reference.scheme.fetcher, "github");
//! ```

mod reference;
mod spec;

// Re-export public API
pub use reference::{FetcherKind, FlakeReference, Scheme, parse_reference};
pub use spec::{
    BRANDED_REGISTRY, DEFAULT_FLAKE_REF, FLAKEHUB_API, FLAKEHUB_SHORTHAND, RegistryRef, SPEC_USAGE,
    Spec, expand_shorthand, parse_registry_ref, parse_spec,
};
