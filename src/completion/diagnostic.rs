//! Completion diagnostics
//!
//! Completion never fails: problems are reported as messages next to (or
//! instead of) candidates.

use std::fmt;

use super::candidate::{Completions, Style};

/// Documentation for the flake reference types the evaluator accepts
pub const REFERENCE_DOCS: &str =
    "https://nixos.org/manual/nix/stable/command-ref/new-cli/nix3-flake.html#types";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// A delimiter appeared more often than the grammar allows
    GrammarOverflow { delimiter: &'static str, max: usize },
    /// No tree has been cached for the registry yet
    NoCache { program: String },
    UnsupportedScheme(String),
    /// A provider whose remote listing is not available
    NotYetSupported(String),
    /// Listing this scheme would need the network
    NeedsNetwork(String),
    /// The cached tree could not be loaded
    TreeUnavailable(String),
}

impl Diagnostic {
    pub fn style(&self) -> Style {
        match self {
            Diagnostic::GrammarOverflow { .. }
            | Diagnostic::UnsupportedScheme(_)
            | Diagnostic::TreeUnavailable(_) => Style::Error,
            Diagnostic::NoCache { .. }
            | Diagnostic::NotYetSupported(_)
            | Diagnostic::NeedsNetwork(_) => Style::Warning,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::GrammarOverflow { delimiter, max } => {
                write!(f, "Should not have more than {max} '{delimiter}'")
            }
            Diagnostic::NoCache { program } => write!(
                f,
                "No completion cache: please initialize by running '{program} re-cache'."
            ),
            Diagnostic::UnsupportedScheme(s) => {
                write!(f, "Unknown scheme '{s}', see {REFERENCE_DOCS}")
            }
            Diagnostic::NotYetSupported(s) => {
                write!(f, "Completion for '{s}:' references is not yet supported")
            }
            Diagnostic::NeedsNetwork(s) => {
                write!(f, "Completing '{s}://' references requires network access")
            }
            Diagnostic::TreeUnavailable(e) => write!(f, "Completion cache unusable: {e}"),
        }
    }
}

impl From<Diagnostic> for Completions {
    fn from(d: Diagnostic) -> Self {
        Completions::message(d.to_string(), d.style())
    }
}
