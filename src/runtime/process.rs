//! External command execution.

use anyhow::{Context, Result};
use std::process::{Command, ExitStatus};

use super::{CommandOutput, RealRuntime};

fn from_status(status: ExitStatus) -> CommandOutput {
    CommandOutput {
        success: status.success(),
        code: status.code(),
        ..Default::default()
    }
}

impl RealRuntime {
    #[tracing::instrument(skip(self))]
    pub(crate) fn command_output_impl(&self, program: &str, args: &[String]) -> Result<CommandOutput> {
        let output = Command::new(program)
            .args(args)
            .output()
            .with_context(|| format!("Failed to run {}", program))?;

        Ok(CommandOutput {
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            ..from_status(output.status)
        })
    }

    #[tracing::instrument(skip(self))]
    pub(crate) fn command_status_impl(&self, program: &str, args: &[String]) -> Result<CommandOutput> {
        let status = Command::new(program)
            .args(args)
            .status()
            .with_context(|| format!("Failed to run {}", program))?;

        Ok(from_status(status))
    }
}

#[cfg(all(test, unix))]
mod tests {
    use crate::runtime::{RealRuntime, Runtime};

    #[test]
    fn test_command_output_captures_stdout() {
        let runtime = RealRuntime;
        let output = runtime
            .command_output("echo", &["/opt/homebrew".to_string()])
            .unwrap();

        assert!(output.success);
        assert_eq!(output.code, Some(0));
        assert_eq!(output.stdout.trim(), "/opt/homebrew");
    }

    #[test]
    fn test_command_status_reports_failure() {
        let runtime = RealRuntime;
        let output = runtime.command_status("false", &[]).unwrap();

        assert!(!output.success);
        assert_eq!(output.code, Some(1));
        assert!(output.stdout.is_empty());
    }

    #[test]
    fn test_missing_program_is_an_error() {
        let runtime = RealRuntime;
        let err = runtime
            .command_output("caskup-no-such-program", &[])
            .unwrap_err();
        assert!(err.to_string().contains("caskup-no-such-program"));
    }
}
