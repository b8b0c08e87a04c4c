//! Argument accumulation for one engine invocation.
//!
//! The engine's syntax is positional, so assembly order is a contract:
//!
//! ```text
//! -i <input> [-i <input> ...] <flags in insertion order> [-filter_complex <a,b,...>] <output>
//! ```

use crate::error::{CoreError, CoreResult};
use crate::external::render_command_line;

use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Ordered flag tokens with a guard against adding the same flag twice.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandLine {
    tokens: Vec<String>,
    flags: HashSet<String>,
}

impl CommandLine {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `flag` and its optional argument.
    ///
    /// Fails with `DuplicateCommand` when `flag` was already added; the
    /// existing tokens are left untouched.
    pub fn push(&mut self, flag: &str, argument: Option<String>) -> CoreResult<()> {
        if !self.flags.insert(flag.to_string()) {
            return Err(CoreError::DuplicateCommand(flag.to_string()));
        }
        self.tokens.push(flag.to_string());
        if let Some(argument) = argument {
            self.tokens.push(argument);
        }
        Ok(())
    }

    #[must_use]
    pub fn contains(&self, flag: &str) -> bool {
        self.flags.contains(flag)
    }

    #[must_use]
    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    pub fn clear(&mut self) {
        self.tokens.clear();
        self.flags.clear();
    }
}

/// Filter-graph fragments consolidated into one `-filter_complex` value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterGraph {
    fragments: Vec<String>,
}

impl FilterGraph {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a fragment; empty fragments are ignored.
    pub fn add(&mut self, fragment: impl Into<String>) {
        let fragment = fragment.into();
        if !fragment.is_empty() {
            self.fragments.push(fragment);
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    #[must_use]
    pub fn fragments(&self) -> &[String] {
        &self.fragments
    }

    /// Joins the fragments with `,`, or `None` when there are none.
    #[must_use]
    pub fn build(&self) -> Option<String> {
        if self.fragments.is_empty() {
            None
        } else {
            Some(self.fragments.join(","))
        }
    }

    pub fn clear(&mut self) {
        self.fragments.clear();
    }
}

/// A fully assembled argument vector ready to hand to the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledCommand {
    pub args: Vec<String>,
    pub output: PathBuf,
}

impl CompiledCommand {
    /// Assembles inputs, flags, filters and output in engine order.
    pub fn assemble(
        inputs: &[PathBuf],
        commands: &CommandLine,
        filters: &FilterGraph,
        output: &Path,
    ) -> Self {
        let mut args = Vec::with_capacity(inputs.len() * 2 + commands.tokens().len() + 3);
        for input in inputs {
            args.push("-i".to_string());
            args.push(input.to_string_lossy().into_owned());
        }
        args.extend(commands.tokens().iter().cloned());
        if let Some(graph) = filters.build() {
            args.push("-filter_complex".to_string());
            args.push(graph);
        }
        args.push(output.to_string_lossy().into_owned());
        Self {
            args,
            output: output.to_path_buf(),
        }
    }

    /// Shell-quoted rendering for logs and `--dry-run` style output.
    #[must_use]
    pub fn to_command_line(&self, program: &Path) -> String {
        render_command_line(program, &self.args)
    }
}
