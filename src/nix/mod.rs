//! Invocation of the external `nix` evaluator
//!
//! Every call shells out synchronously. Nothing is memoized here: callers
//! compute the current system once per invocation and pass it down.

use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};

use serde::Deserialize;

use crate::error::{EvalError, Result};
use crate::parser::{RegistryRef, Spec};

/// Output of `nix flake prefetch --json`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Prefetched {
    pub hash: String,
    pub store_path: String,
}

/// Handle on a located `nix` binary
#[derive(Debug, Clone)]
pub struct Evaluator {
    binary: PathBuf,
}

impl Evaluator {
    /// Locate `binary` (a name looked up on `PATH`, or a path).
    ///
    /// # Returns
    /// * `Result<Evaluator>` - `EvalError::NixNotFound` when it cannot be found
    pub fn locate(binary: &str) -> Result<Self> {
        let path = which::which(binary).map_err(|e| {
            tracing::debug!(binary, error = %e, "evaluator lookup failed");
            EvalError::NixNotFound(binary.to_string())
        })?;
        tracing::debug!(path = %path.display(), "using evaluator");
        Ok(Self { binary: path })
    }

    pub fn binary(&self) -> &Path {
        &self.binary
    }

    fn command(&self, args: &[&str]) -> Command {
        let mut cmd = Command::new(&self.binary);
        cmd.args(args);
        cmd
    }

    /// Run to completion, capturing stdout. Stderr is captured for the error.
    fn output(&self, args: &[&str]) -> Result<Vec<u8>> {
        let rendered = render(&self.binary, args);
        tracing::debug!(command = %rendered, "running evaluator");

        let Output {
            status,
            stdout,
            stderr,
        } = self.command(args).output()?;

        if !status.success() {
            return Err(EvalError::CommandFailed {
                command: rendered,
                stderr: String::from_utf8_lossy(&stderr).into_owned(),
            }
            .into());
        }
        Ok(stdout)
    }

    /// The system the evaluator builds for natively, e.g. `x86_64-linux`.
    pub fn current_system(&self) -> Result<String> {
        let out = self.output(&[
            "eval",
            "--raw",
            "--impure",
            "--expr",
            "builtins.currentSystem",
        ])?;
        let system = String::from_utf8(out)
            .map_err(|e| EvalError::InvalidOutput(e.to_string()))?
            .trim()
            .to_string();
        if system.is_empty() {
            return Err(EvalError::InvalidOutput("empty current system".to_string()).into());
        }
        Ok(system)
    }

    /// Evaluate the registry tree of `registry` for `system` as JSON.
    pub fn eval_registry(&self, registry: &RegistryRef, system: &str) -> Result<Vec<u8>> {
        let attr = registry.init_attr(system);
        self.output(&["eval", "--json", attr.as_str()])
    }

    /// Evaluate the tree with verbose traces streamed to the terminal.
    ///
    /// Used by `check`, where the evaluator's own diagnostics are the report.
    pub fn check_registry(&self, registry: &RegistryRef, system: &str) -> Result<()> {
        let attr = registry.init_attr(system);
        let args = ["eval", "--json", attr.as_str(), "--trace-verbose"];
        let rendered = render(&self.binary, &args);
        tracing::debug!(command = %rendered, "checking registry");

        let status = self
            .command(&args)
            .stdout(Stdio::null())
            .stderr(Stdio::inherit())
            .status()?;
        if !status.success() {
            return Err(EvalError::CommandFailed {
                command: rendered,
                stderr: "see above".to_string(),
            }
            .into());
        }
        Ok(())
    }

    /// Directory the registry's cells are read from.
    pub fn cells_from(&self, registry: &RegistryRef) -> Result<String> {
        let attr = registry.cells_from_attr();
        let out = self.output(&["eval", "--raw", attr.as_str()])?;
        String::from_utf8(out).map_err(|e| EvalError::InvalidOutput(e.to_string()).into())
    }

    /// Copy `flake_ref` into the store.
    pub fn prefetch(&self, flake_ref: &str) -> Result<Prefetched> {
        let out = self.output(&["flake", "prefetch", "--json", flake_ref])?;
        serde_json::from_slice(&out).map_err(|e| {
            EvalError::InvalidOutput(format!("failed to parse prefetch output: {e}")).into()
        })
    }

    /// The same registry, addressed through its store path.
    ///
    /// Falls back to `registry` unchanged when prefetching fails.
    pub fn localize(&self, registry: &RegistryRef) -> RegistryRef {
        match self.prefetch(&registry.flake_ref) {
            Ok(p) => RegistryRef {
                flake_ref: p.store_path,
                registry: registry.registry.clone(),
            },
            Err(e) => {
                tracing::warn!(flake_ref = %registry.flake_ref, error = %e, "prefetch failed");
                registry.clone()
            }
        }
    }

    /// Run the action `spec` names, forwarding `args`.
    ///
    /// Stdio is inherited; the action's exit code is returned.
    pub fn run_action(&self, spec: &Spec, system: &str, args: &[String]) -> Result<i32> {
        let attr = spec.action_attr(system);
        let mut cmd = self.command(&["run", attr.as_str(), "--"]);
        cmd.args(args);
        tracing::info!(action = %spec, system, "running action");

        let status = cmd.status()?;
        // Killed by a signal
        Ok(status.code().unwrap_or(1))
    }
}

fn render(binary: &Path, args: &[&str]) -> String {
    let mut out = binary.display().to_string();
    for arg in args {
        out.push(' ');
        out.push_str(arg);
    }
    out
}
