//! Paisano - CLI companion for Paisano registries
//!
//! Runs the actions of a Paisano registry by target spec, and completes
//! those specs in the shell from a cached copy of the registry tree.
//!
//! # Usage
//!
//! ```bash
//! # Run an action, forwarding arguments
//! paisano //automation/jobs/docs:run --watch
//!
//! # Refresh the completion cache, then enable completion
//! paisano re-cache
//! source <(paisano completion bash)
//! ```

use paisano::cli::CliInterface;
use paisano::error::Result;

/// Application entry point
fn main() {
    match run() {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

/// Main application logic
///
/// This function orchestrates the application startup:
/// 1. Parse command-line arguments
/// 2. Load configuration
/// 3. Initialize logging
/// 4. Dispatch the subcommand or target spec
///
/// # Returns
/// * `Result<i32>` - Process exit code or error
fn run() -> Result<i32> {
    // Parse command-line arguments and load configuration
    let cli = CliInterface::new()?;

    // Initialize logging based on verbosity
    initialize_logging(&cli);

    cli.run()
}

/// Initialize logging system based on verbosity level
///
/// Logs go to stderr: stdout belongs to the actions and the completion hooks.
///
/// # Arguments
/// * `cli` - CLI interface with verbosity settings
fn initialize_logging(cli: &CliInterface) {
    let level = cli.config().logging.level.to_tracing_level();

    // Build subscriber with level filter
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr);

    // Configure timestamps
    if cli.config().logging.timestamps {
        subscriber.init();
    } else {
        subscriber.without_time().init();
    }
}
