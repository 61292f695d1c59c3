//! Command-line interface for paisano
//!
//! This module handles:
//! - Command-line argument parsing using clap
//! - Configuration loading and validation
//! - Direct execution of a target spec's action
//! - The `re-cache`, `list` and `check` registry subcommands
//! - Shell completion, both script generation and the hidden callback

mod completion;

pub use completion::generate_completion;

use clap::{CommandFactory, Parser, Subcommand};
use std::io::IsTerminal;
use std::path::{Path, PathBuf};

use crate::cache::{ByteCache, FileCache, cached_system, store_system};
use crate::completion::{Completions, Diagnostic, complete_from_cache};
use crate::config::{Config, LogLevel};
use crate::error::Result;
use crate::formatter::{Formatter, TableFormatter};
use crate::nix::Evaluator;
use crate::parser::{RegistryRef, SPEC_USAGE, parse_reference, parse_registry_ref, parse_spec};
use crate::registry::{Root, load_json};

/// Name used when the invoked program name cannot be determined
const DEFAULT_PROGRAM: &str = "paisano";

/// Paisano - run and complete registry actions
#[derive(Parser, Debug)]
#[command(
    name = "paisano",
    version,
    about = "CLI companion for Paisano registries",
    long_about = "CLI companion for Paisano registries.

Invoke with a target spec to run a known target's action directly:

    paisano [flakeref]#[registry]//[cell]/[block]/[target]:[action] [args...]

Enable shell completion via 'paisano completion <shell>'; completion reads
the cache written by 're-cache'.",
    args_conflicts_with_subcommands = true
)]
pub struct CliArgs {
    /// Target spec: [flakeref]#[registry]//[cell]/[block]/[target]:[action]
    #[arg(value_name = "SPEC")]
    pub spec: Option<String>,

    /// Arguments forwarded to the action
    #[arg(
        value_name = "ARGS",
        trailing_var_arg = true,
        allow_hyphen_values = true
    )]
    pub args: Vec<String>,

    /// System for which the target will be built (e.g. 'x86_64-linux')
    #[arg(long = "for", value_name = "SYSTEM", global = true)]
    pub for_system: Option<String>,

    /// Configuration file path
    #[arg(short = 'c', long = "config", value_name = "FILE", global = true)]
    pub config_file: Option<PathBuf>,

    /// Disable colored output
    #[arg(long = "no-color", global = true)]
    pub no_color: bool,

    /// Quiet mode (errors only)
    #[arg(short = 'q', long, global = true)]
    pub quiet: bool,

    /// Verbose mode (detailed logging)
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    /// Very verbose mode (trace logging)
    #[arg(long = "vv", global = true)]
    pub very_verbose: bool,

    /// Subcommands
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Subcommands for paisano
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show version information
    Version,

    /// Refresh the completion cache
    ///
    /// Evaluates the registry and stores its tree for shell completion.
    ReCache {
        /// Registry reference: [flakeref][#registry]
        #[arg(value_name = "REGISTRY")]
        registry: Option<String>,
    },

    /// List available targets
    ///
    /// Reads the completion cache, evaluating and caching the registry on a
    /// miss.
    List {
        /// Registry reference: [flakeref][#registry]
        #[arg(value_name = "REGISTRY")]
        registry: Option<String>,
    },

    /// Validate the repository
    ///
    /// Exits non-zero with the evaluator's trace if the registry does not
    /// evaluate.
    Check {
        /// Registry reference: [flakeref][#registry]
        #[arg(value_name = "REGISTRY")]
        registry: Option<String>,
    },

    /// Generate shell completion script
    Completion {
        /// Shell type (bash, zsh, fish)
        #[arg(value_name = "SHELL")]
        shell: String,
    },

    /// Show configuration
    Config {
        /// Show effective configuration
        #[arg(long)]
        show: bool,

        /// Validate configuration file
        #[arg(long)]
        validate: bool,
    },

    /// Complete a partially typed spec (used by the shell hooks)
    #[command(name = "__complete", hide = true)]
    Complete {
        /// The word under the cursor
        #[arg(value_name = "VALUE", default_value = "", allow_hyphen_values = true)]
        value: String,
    },
}

/// CLI interface handler
pub struct CliInterface {
    /// Parsed command-line arguments
    args: CliArgs,

    /// Loaded configuration
    config: Config,
}

impl CliInterface {
    /// Create a new CLI interface
    ///
    /// # Returns
    /// * `Result<Self>` - New CLI interface or error
    pub fn new() -> Result<Self> {
        let args = CliArgs::parse();
        let config = Self::load_config(&args)?;

        Ok(Self { args, config })
    }

    /// Load configuration from file and merge with arguments
    ///
    /// # Arguments
    /// * `args` - Command-line arguments
    ///
    /// # Returns
    /// * `Result<Config>` - Loaded configuration or error
    fn load_config(args: &CliArgs) -> Result<Config> {
        let mut config = Config::load_from_file(args.config_file.as_deref())?;

        if let Err(e) = config.validate() {
            eprintln!("Warning: Configuration validation failed: {}", e);
            eprintln!("Using default configuration instead.");
            config = Config::default();
        }

        Self::apply_args_to_config(&mut config, args);

        Ok(config)
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Override configuration values with CLI arguments where provided
    fn apply_args_to_config(config: &mut Config, args: &CliArgs) {
        config.logging.level = if args.very_verbose {
            LogLevel::Trace
        } else if args.verbose {
            LogLevel::Debug
        } else if args.quiet {
            LogLevel::Error
        } else {
            config.logging.level
        };

        if let Some(system) = &args.for_system {
            config.nix.system = Some(system.clone());
        }
    }

    fn use_colors(&self) -> bool {
        !self.args.no_color && std::io::stdout().is_terminal()
    }

    fn formatter(&self) -> Formatter {
        Formatter::new(self.use_colors())
    }

    fn cache(&self) -> FileCache {
        FileCache::new(&self.config.cache.dir)
    }

    fn evaluator(&self) -> Result<Evaluator> {
        Evaluator::locate(&self.config.nix.binary)
    }

    /// The system to evaluate for: `--for`, then the config file, then the
    /// evaluator's native system.
    fn system(&self, evaluator: &Evaluator) -> Result<String> {
        match &self.config.nix.system {
            Some(system) => Ok(system.clone()),
            None => evaluator.current_system(),
        }
    }

    /// Dispatch the invocation
    ///
    /// # Returns
    /// * `Result<i32>` - Process exit code
    pub fn run(&self) -> Result<i32> {
        match &self.args.command {
            Some(Commands::Version) => {
                self.show_version();
                Ok(0)
            }
            Some(Commands::ReCache { registry }) => self.re_cache(registry.as_deref()),
            Some(Commands::List { registry }) => self.list(registry.as_deref()),
            Some(Commands::Check { registry }) => self.check(registry.as_deref()),
            Some(Commands::Completion { shell }) => {
                generate_completion(shell, &program_name())?;
                Ok(0)
            }
            Some(Commands::Config { show, validate }) => {
                self.handle_config_command(*show, *validate)?;
                Ok(0)
            }
            Some(Commands::Complete { value }) => {
                print!("{}", self.complete_output(value));
                Ok(0)
            }
            None => match &self.args.spec {
                Some(spec) => self.run_spec(spec, &self.args.args),
                None => {
                    CliArgs::command().print_help()?;
                    Ok(0)
                }
            },
        }
    }

    /// Show version information
    fn show_version(&self) {
        println!("paisano version {}", env!("CARGO_PKG_VERSION"));
        println!("Rust version: {}", env!("CARGO_PKG_RUST_VERSION"));
        match self.evaluator() {
            Ok(evaluator) => println!("Evaluator: {}", evaluator.binary().display()),
            Err(e) => println!("Evaluator: {}", e),
        }
    }

    /// Run the action a spec names
    ///
    /// A malformed spec is reported with the expected grammar.
    fn run_spec(&self, input: &str, forwarded: &[String]) -> Result<i32> {
        let spec = match parse_spec(input) {
            Ok(spec) => spec,
            Err(e) => {
                let formatter = self.formatter();
                eprintln!("{}", formatter.format_error(&e.to_string()));
                eprintln!("usage: {} {}", program_name(), SPEC_USAGE);
                return Ok(1);
            }
        };

        let evaluator = self.evaluator()?;
        let system = self.system(&evaluator)?;
        evaluator.run_action(&spec, &system, forwarded)
    }

    /// Evaluate a registry and store its tree
    fn re_cache(&self, registry: Option<&str>) -> Result<i32> {
        let registry = registry_ref(registry)?;
        let evaluator = self.evaluator()?;
        let system = self.system(&evaluator)?;
        let cache = self.cache();

        let root = refresh(&evaluator, &cache, &registry, &system)?;
        store_system(&cache, &system)?;

        println!(
            "{}",
            self.formatter().format_success(&format!(
                "Cached {} actions of {} for {}",
                root.actions().count(),
                registry,
                system
            ))
        );
        Ok(0)
    }

    /// Print every action of a registry
    fn list(&self, registry: Option<&str>) -> Result<i32> {
        let registry = registry_ref(registry)?;
        let cache = self.cache();

        // The evaluator is only needed on a cache miss or without a known system.
        let mut evaluator = None;
        let system = match self.config.nix.system.clone() {
            Some(system) => system,
            None => match cached_system(&cache)? {
                Some(system) => system,
                None => {
                    let located = self.evaluator()?;
                    let system = located.current_system()?;
                    evaluator = Some(located);
                    system
                }
            },
        };

        let root = match cache.get_bytes(&registry.cache_key(&system))? {
            Some(bytes) => load_json(&bytes)?,
            None => {
                let evaluator = match evaluator {
                    Some(e) => e,
                    None => self.evaluator()?,
                };
                refresh(&evaluator, &cache, &registry, &system)?
            }
        };

        println!("{}", TableFormatter::new(self.use_colors()).format_actions(&root));
        Ok(0)
    }

    /// Validate a registry by evaluating it with traces
    fn check(&self, registry: Option<&str>) -> Result<i32> {
        let registry = registry_ref(registry)?;
        match parse_reference(&registry.flake_ref).and_then(|r| r.kind()) {
            Ok(kind) => tracing::info!(flake_ref = %registry.flake_ref, kind = kind.label(), "checking"),
            Err(e) => tracing::warn!(error = %e, "unrecognized flake reference"),
        }

        let evaluator = self.evaluator()?;
        let system = self.system(&evaluator)?;

        let prefetched = evaluator.prefetch(&registry.flake_ref)?;
        let localized = RegistryRef {
            flake_ref: prefetched.store_path.clone(),
            registry: registry.registry.clone(),
        };
        evaluator.check_registry(&localized, &system)?;

        println!("note: {} -> {}", registry.flake_ref, prefetched.store_path);
        match evaluator.cells_from(&localized) {
            Ok(dir) => println!("note: cells are read from {}", dir.trim()),
            Err(e) => tracing::debug!(error = %e, "cellsFrom not available"),
        }
        println!(
            "{}",
            self.formatter()
                .format_success("Valid Paisano repository ✓")
        );
        Ok(0)
    }

    /// Completions for the word under the cursor, from the local registry's
    /// cached tree. Never runs the evaluator.
    pub fn complete(&self, value: &str) -> Completions {
        let cache = self.cache();
        let program = program_name();

        let system = match &self.config.nix.system {
            Some(system) => Some(system.clone()),
            None => cached_system(&cache).unwrap_or_else(|e| {
                tracing::warn!(error = %e, "cannot read cached system");
                None
            }),
        };
        let Some(system) = system else {
            return Diagnostic::NoCache { program }.into();
        };

        complete_from_cache(
            &cache,
            &RegistryRef::local(),
            &system,
            &self.config.registries,
            &program,
            value,
        )
    }

    /// What `__complete` prints: plain when piped into a shell hook, with
    /// coloured messages on a terminal unless `--no-color` is given.
    fn complete_output(&self, value: &str) -> String {
        self.formatter().format_completions(&self.complete(value))
    }

    /// Handle config subcommand
    ///
    /// # Arguments
    /// * `show` - Whether to show configuration
    /// * `validate` - Whether to validate configuration
    fn handle_config_command(&self, show: bool, validate: bool) -> Result<()> {
        if validate {
            self.validate_config_file();
        }

        if show {
            self.show_config()?;
        }

        Ok(())
    }

    /// Validate configuration file
    fn validate_config_file(&self) {
        let path = self.get_config_path();
        println!("Validating configuration file: {}", path.display());

        if !path.exists() {
            println!("❌ Configuration file does not exist");
            return;
        }

        match Config::load_from_file(Some(&path)) {
            Ok(config) => match config.validate() {
                Ok(_) => println!("✅ Configuration is valid"),
                Err(e) => println!("❌ Configuration validation failed: {}", e),
            },
            Err(e) => println!("❌ Failed to load configuration: {}", e),
        }
    }

    /// Show effective configuration
    fn show_config(&self) -> Result<()> {
        let path = self.get_config_path();
        println!("Configuration file: {}", path.display());
        println!();
        println!("=== Effective Configuration ===");
        println!();
        println!("{}", self.config.to_toml()?);
        Ok(())
    }

    /// Get configuration file path (from args or default)
    fn get_config_path(&self) -> PathBuf {
        self.args
            .config_file
            .clone()
            .unwrap_or_else(Config::default_config_path)
    }
}

/// Evaluate `registry` and store the validated tree under its cache key
fn refresh(
    evaluator: &Evaluator,
    cache: &dyn ByteCache,
    registry: &RegistryRef,
    system: &str,
) -> Result<Root> {
    let localized = evaluator.localize(registry);
    let bytes = evaluator.eval_registry(&localized, system)?;
    let root = load_json(&bytes)?;

    cache.put_bytes(&registry.cache_key(system), &bytes)?;
    tracing::info!(registry = %registry, system, "registry cached");
    Ok(root)
}

/// The registry a subcommand argument names; the local flake when omitted
fn registry_ref(arg: Option<&str>) -> Result<RegistryRef> {
    match arg {
        Some(raw) => parse_registry_ref(raw),
        None => Ok(RegistryRef::local()),
    }
}

/// Name the program was invoked as, for messages that tell the user what to run
fn program_name() -> String {
    std::env::args_os()
        .next()
        .and_then(|arg0| {
            Path::new(&arg0)
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
        })
        .unwrap_or_else(|| DEFAULT_PROGRAM.to_string())
}
