//! Runtime abstraction for system operations.
//!
//! Every side effect the tool performs goes through [`Runtime`], so the
//! scanning and planning logic can be exercised against a mock.
//!
//! # Structure
//!
//! - `env` - Environment variables
//! - `fs` - File system operations (read, list, remove)
//! - `process` - External command execution
//! - `user` - User interaction (confirmation prompts)

mod env;
mod fs;
mod process;
mod user;

use anyhow::Result;
use std::env as std_env;
use std::path::{Path, PathBuf};

/// Outcome of running an external command.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CommandOutput {
    /// Whether the process exited with status 0
    pub success: bool,
    /// Exit code, if the process was not killed by a signal
    pub code: Option<i32>,
    /// Captured standard output (empty when stdio is inherited)
    pub stdout: String,
    /// Captured standard error (empty when stdio is inherited)
    pub stderr: String,
}

#[cfg_attr(test, mockall::automock)]
pub trait Runtime: Send + Sync {
    // Environment
    fn env_var(&self, key: &str) -> Result<String, std_env::VarError>;

    // File System
    fn read_to_string(&self, path: &Path) -> Result<String>;
    fn read_dir(&self, path: &Path) -> Result<Vec<PathBuf>>;
    fn exists(&self, path: &Path) -> bool;
    fn is_dir(&self, path: &Path) -> bool;
    fn is_file(&self, path: &Path) -> bool;
    fn remove_dir_all(&self, path: &Path) -> Result<()>;

    // Processes
    /// Run a command and capture its output.
    fn command_output(&self, program: &str, args: &[String]) -> Result<CommandOutput>;

    /// Run a command with stdin/stdout/stderr inherited from this process.
    /// Only `success` and `code` are populated in the result.
    fn command_status(&self, program: &str, args: &[String]) -> Result<CommandOutput>;

    // User interaction
    /// Ask a yes/no question. Re-prompts until the answer is y/yes or n/no.
    fn confirm(&self, prompt: &str) -> Result<bool>;
}

pub struct RealRuntime;

impl Runtime for RealRuntime {
    fn env_var(&self, key: &str) -> Result<String, std_env::VarError> {
        self.env_var_impl(key)
    }

    fn read_to_string(&self, path: &Path) -> Result<String> {
        self.read_to_string_impl(path)
    }

    fn read_dir(&self, path: &Path) -> Result<Vec<PathBuf>> {
        self.read_dir_impl(path)
    }

    fn exists(&self, path: &Path) -> bool {
        self.exists_impl(path)
    }

    fn is_dir(&self, path: &Path) -> bool {
        self.is_dir_impl(path)
    }

    fn is_file(&self, path: &Path) -> bool {
        self.is_file_impl(path)
    }

    fn remove_dir_all(&self, path: &Path) -> Result<()> {
        self.remove_dir_all_impl(path)
    }

    fn command_output(&self, program: &str, args: &[String]) -> Result<CommandOutput> {
        self.command_output_impl(program, args)
    }

    fn command_status(&self, program: &str, args: &[String]) -> Result<CommandOutput> {
        self.command_status_impl(program, args)
    }

    fn confirm(&self, prompt: &str) -> Result<bool> {
        self.confirm_impl(prompt)
    }
}
