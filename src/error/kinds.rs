use std::{fmt, io};

/// Crate-wide `Result` type using [`PaisanoError`] as the error.
///
/// This alias is re-exported by the parent `error` module and is intended
/// to be used throughout the crate for fallible operations.
pub type Result<T> = std::result::Result<T, PaisanoError>;

/// Top-level error type for paisano operations.
#[derive(Debug)]
pub enum PaisanoError {
    /// Target spec or registry reference grammar errors.
    Spec(SpecError),

    /// Flake reference (URI) errors.
    Reference(ReferenceError),

    /// Registry tree loading errors.
    Tree(TreeError),

    /// Configuration errors.
    Config(ConfigError),

    /// External evaluator errors.
    Eval(EvalError),

    /// I/O errors.
    Io(io::Error),
}

/// Grammar errors raised while parsing a target spec.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpecError {
    /// The `//` anchor, the final `:` or one of the path segments is missing.
    MalformedSpec {
        input: String,
        reason: &'static str,
    },

    /// `fh:` shorthand without an organisation or repository.
    MalformedShorthandRef(String),

    /// A `[flakeRef][#[registry]]` reference that does not follow the grammar.
    MalformedRegistryRef(String),
}

/// Errors raised while decomposing a flake reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReferenceError {
    /// The reference is not a URI and not a filesystem path.
    Malformed { input: String, reason: String },

    /// Structurally valid scheme without a known fetcher/transport pair.
    UnsupportedScheme(String),
}

/// Registry tree errors.
#[derive(Debug)]
pub enum TreeError {
    /// The JSON document does not describe a list of cells.
    Malformed(String),
}

/// Configuration-specific errors.
#[derive(Debug)]
pub enum ConfigError {
    /// Config file not found.
    FileNotFound(String),

    /// Invalid config format.
    InvalidFormat(String),

    /// Invalid field value.
    InvalidValue { field: String, value: String },
}

/// Errors from invoking the external `nix` evaluator.
#[derive(Debug)]
pub enum EvalError {
    /// The `nix` binary could not be located.
    NixNotFound(String),

    /// A `nix` invocation exited unsuccessfully.
    CommandFailed { command: String, stderr: String },

    /// `nix` produced output we could not interpret.
    InvalidOutput(String),
}

/* ========================= Display & Error impls ========================= */

impl fmt::Display for PaisanoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PaisanoError::Spec(e) => write!(f, "{e}"),
            PaisanoError::Reference(e) => write!(f, "{e}"),
            PaisanoError::Tree(e) => write!(f, "Registry tree error: {e}"),
            PaisanoError::Config(e) => write!(f, "Configuration error: {e}"),
            PaisanoError::Eval(e) => write!(f, "Evaluation error: {e}"),
            PaisanoError::Io(e) => write!(f, "I/O error: {e}"),
        }
    }
}

impl fmt::Display for SpecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpecError::MalformedSpec { input, reason } => {
                write!(f, "Invalid argument format: {input}: {reason}")
            }
            SpecError::MalformedShorthandRef(input) => write!(
                f,
                "Invalid flakehub shorthand '{input}': expected fh:org/repo[/semver]"
            ),
            SpecError::MalformedRegistryRef(input) => write!(
                f,
                "Invalid registry reference '{input}': expected [flakeref][#registry]"
            ),
        }
    }
}

impl fmt::Display for ReferenceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReferenceError::Malformed { input, reason } => {
                write!(f, "Invalid flake reference '{input}': {reason}")
            }
            ReferenceError::UnsupportedScheme(scheme) => {
                write!(f, "Unsupported flake reference scheme: {scheme}")
            }
        }
    }
}

impl fmt::Display for TreeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TreeError::Malformed(msg) => write!(f, "malformed registry tree: {msg}"),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::FileNotFound(path) => write!(f, "Config file not found: {path}"),
            ConfigError::InvalidFormat(msg) => write!(f, "Invalid config format: {msg}"),
            ConfigError::InvalidValue { field, value } => {
                write!(f, "Invalid value '{value}' for field '{field}'")
            }
        }
    }
}

impl fmt::Display for EvalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EvalError::NixNotFound(binary) => write!(
                f,
                "You need to install '{binary}' in order to use this tool"
            ),
            EvalError::CommandFailed { command, stderr } => {
                write!(f, "'{command}' failed, stderr:\n{stderr}")
            }
            EvalError::InvalidOutput(msg) => write!(f, "Unexpected evaluator output: {msg}"),
        }
    }
}

impl std::error::Error for PaisanoError {}
impl std::error::Error for SpecError {}
impl std::error::Error for ReferenceError {}
impl std::error::Error for TreeError {}
impl std::error::Error for ConfigError {}
impl std::error::Error for EvalError {}

/* ========================= Conversions to PaisanoError ========================= */

impl From<io::Error> for PaisanoError {
    fn from(err: io::Error) -> Self {
        PaisanoError::Io(err)
    }
}

impl From<SpecError> for PaisanoError {
    fn from(err: SpecError) -> Self {
        PaisanoError::Spec(err)
    }
}

impl From<ReferenceError> for PaisanoError {
    fn from(err: ReferenceError) -> Self {
        PaisanoError::Reference(err)
    }
}

impl From<TreeError> for PaisanoError {
    fn from(err: TreeError) -> Self {
        PaisanoError::Tree(err)
    }
}

impl From<ConfigError> for PaisanoError {
    fn from(err: ConfigError) -> Self {
        PaisanoError::Config(err)
    }
}

impl From<EvalError> for PaisanoError {
    fn from(err: EvalError) -> Self {
        PaisanoError::Eval(err)
    }
}
