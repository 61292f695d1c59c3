//! Error handling module for paisano.
//!
//! This module provides the typed error taxonomy used across the crate:
//! - Grammar errors for target specs and registry references
//! - Reference (URI) errors, including unsupported fetcher schemes
//! - Registry tree, configuration, cache and evaluator errors
//!
//! Completion never returns these errors to the shell. The resolver turns
//! every failure into a [`crate::completion::Diagnostic`] instead.
//!
//! # Example
//!
//! ```rust
//! use paisano::error::{PaisanoError, SpecError};
//! use paisano::parser::parse_spec;
//!
//! let err = parse_spec("no-anchor:build").unwrap_err();
//! assert!(matches!(err, PaisanoError::Spec(SpecError::MalformedSpec { .. })));
//! ```

pub mod kinds;

// Re-export commonly used types
pub use kinds::{
    ConfigError, EvalError, PaisanoError, ReferenceError, Result, SpecError, TreeError,
};
