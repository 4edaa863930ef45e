//! User interaction operations (confirmation prompts).

use anyhow::{Result, bail};

use super::RealRuntime;

use std::io::{self, BufRead, Write};

/// Core, testable implementation that reads from any BufRead and writes to any Write.
///
/// Keeps asking until the answer is one of y/yes/n/no (case-insensitive).
/// Running out of input is an error.
pub(crate) fn confirm_with_io<R: BufRead, W: Write>(
    prompt: &str,
    input: &mut R,
    output: &mut W,
) -> Result<bool> {
    loop {
        write!(output, "{} [y/n] ", prompt)?;
        output.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            bail!("No answer given to \"{}\"", prompt);
        }

        match line.trim().to_lowercase().as_str() {
            "y" | "yes" => return Ok(true),
            "n" | "no" => return Ok(false),
            _ => writeln!(output, "Please answer yes or no.")?,
        }
    }
}

impl RealRuntime {
    pub(crate) fn confirm_impl(&self, prompt: &str) -> Result<bool> {
        let stdin = io::stdin();
        let mut stdout = io::stdout();
        let mut stdin_lock = stdin.lock();
        confirm_with_io(prompt, &mut stdin_lock, &mut stdout)
    }
}

#[cfg(test)]
mod tests {
    use super::confirm_with_io;
    use anyhow::Result;
    use std::io::Cursor;

    #[test]
    fn confirms_yes_and_short_y() -> Result<()> {
        let cases = vec!["y\n", "Y\n", "yes\n", " YES \n", "  y  \n"];
        for case in cases {
            let mut input = Cursor::new(case.as_bytes());
            let mut output = Vec::new();
            let ok = confirm_with_io("Upgrade?", &mut input, &mut output)?;
            assert!(ok, "expected '{}' to be accepted as yes", case);
            let out = String::from_utf8(output)?;
            assert!(out.contains("Upgrade? [y/n]"));
        }
        Ok(())
    }

    #[test]
    fn rejects_no_and_short_n() -> Result<()> {
        let cases = vec!["n\n", "N\n", "no\n", " No \n"];
        for case in cases {
            let mut input = Cursor::new(case.as_bytes());
            let mut output = Vec::new();
            let ok = confirm_with_io("Delete?", &mut input, &mut output)?;
            assert!(!ok, "expected '{}' to be rejected as no", case);
        }
        Ok(())
    }

    #[test]
    fn reprompts_on_invalid_answer() -> Result<()> {
        let mut input = Cursor::new(b"maybe\n\nyes\n");
        let mut output = Vec::new();
        let ok = confirm_with_io("Delete?", &mut input, &mut output)?;
        assert!(ok);

        let out = String::from_utf8(output)?;
        assert_eq!(out.matches("Delete? [y/n] ").count(), 3);
        assert_eq!(out.matches("Please answer yes or no.").count(), 2);
        Ok(())
    }

    #[test]
    fn end_of_input_is_an_error() {
        let mut input = Cursor::new(b"what\n");
        let mut output = Vec::new();
        let result = confirm_with_io("Delete?", &mut input, &mut output);
        assert!(result.is_err());
    }

    #[test]
    fn prompt_is_written_before_reading() -> Result<()> {
        let mut input = Cursor::new(b"n\n");
        let mut output = Vec::new();
        let _ = confirm_with_io("Are you sure", &mut input, &mut output)?;
        let out = String::from_utf8(output)?;
        assert_eq!(out, "Are you sure [y/n] ");
        Ok(())
    }
}
