use std::process::{Command, Output, Stdio};

use super::Tokenizer;
use crate::config::DEFAULT_GETOPT_CMD;
use crate::error::{ParseError, ParseResult};
use crate::optspec::OptionSpec;

/// Exit status of `getopt -T` for the util-linux (enhanced) implementation.
const ENHANCED_TEST_STATUS: i32 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GetoptFlavor {
    /// util-linux getopt: long options, quoted output.
    Enhanced,
    /// Traditional getopt: short options only, whitespace-separated output.
    Standard,
}

/// Tokenizer backed by an external `getopt(1)` binary.
#[derive(Debug, Clone)]
pub struct GetoptCommand {
    program: String,
    flavor: Option<GetoptFlavor>,
}

impl Default for GetoptCommand {
    fn default() -> Self {
        Self::new(DEFAULT_GETOPT_CMD)
    }
}

impl GetoptCommand {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            flavor: None,
        }
    }

    /// Skip flavor detection.
    pub fn with_flavor(mut self, flavor: GetoptFlavor) -> Self {
        self.flavor = Some(flavor);
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    /// Probe the binary with `-T`.
    pub fn detect_flavor(&self) -> ParseResult<GetoptFlavor> {
        let status = Command::new(&self.program)
            .arg("-T")
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map_err(|e| self.spawn_error(e))?;
        let flavor = if status.code() == Some(ENHANCED_TEST_STATUS) {
            GetoptFlavor::Enhanced
        } else {
            GetoptFlavor::Standard
        };
        tracing::debug!(program = %self.program, ?flavor, "detected getopt flavor");
        Ok(flavor)
    }

    fn spawn_error(&self, e: std::io::Error) -> ParseError {
        ParseError::Tokenizer(format!("failed to run {}: {e}", self.program))
    }

    fn run(&self, cmd: &mut Command) -> ParseResult<String> {
        let Output {
            status,
            stdout,
            stderr,
        } = cmd.stdin(Stdio::null()).output().map_err(|e| self.spawn_error(e))?;

        if !status.success() {
            let msg = String::from_utf8_lossy(&stderr).trim().to_string();
            let msg = if msg.is_empty() {
                format!("{} exited with {status}", self.program)
            } else {
                msg
            };
            return Err(ParseError::Tokenizer(msg));
        }
        String::from_utf8(stdout).map_err(|_| {
            ParseError::Tokenizer(format!("{} produced non UTF-8 output", self.program))
        })
    }
}

impl Tokenizer for GetoptCommand {
    fn tokenize(&self, spec: &OptionSpec, argv: &[String]) -> ParseResult<Vec<String>> {
        let flavor = match self.flavor {
            Some(f) => f,
            None => self.detect_flavor()?,
        };

        match flavor {
            GetoptFlavor::Enhanced => {
                let out = self.run(
                    Command::new(&self.program)
                        .env_remove("GETOPT_COMPATIBLE")
                        .env_remove("POSIXLY_CORRECT")
                        .arg("-o")
                        .arg(&spec.short)
                        .arg("-l")
                        .arg(spec.long_with_negations())
                        .arg("--")
                        .args(argv),
                )?;
                unquote_shell_words(&out)
            }
            GetoptFlavor::Standard => {
                // Output is split on whitespace, so embedded spaces cannot survive.
                if argv.iter().any(|a| a.chars().any(char::is_whitespace)) {
                    return Err(ParseError::Tokenizer(
                        "the available getopt does not support spaces in options".to_string(),
                    ));
                }
                let out = self.run(Command::new(&self.program).arg(&spec.short).args(argv))?;
                Ok(out.split_whitespace().map(str::to_string).collect())
            }
        }
    }
}

/// Split the single-quoted output of enhanced getopt back into words.
///
/// Handles `'...'` quoting and backslash escapes outside quotes, which covers
/// the `'\''` sequence getopt emits for embedded single quotes.
pub fn unquote_shell_words(s: &str) -> ParseResult<Vec<String>> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut in_word = false;
    let mut chars = s.chars();

    while let Some(c) = chars.next() {
        match c {
            '\'' => {
                in_word = true;
                loop {
                    match chars.next() {
                        Some('\'') => break,
                        Some(ch) => current.push(ch),
                        None => {
                            return Err(ParseError::Tokenizer(
                                "unterminated quote in getopt output".to_string(),
                            ));
                        }
                    }
                }
            }
            '\\' => {
                in_word = true;
                if let Some(ch) = chars.next() {
                    current.push(ch);
                }
            }
            c if c.is_whitespace() => {
                if in_word {
                    words.push(std::mem::take(&mut current));
                    in_word = false;
                }
            }
            c => {
                in_word = true;
                current.push(c);
            }
        }
    }
    if in_word {
        words.push(current);
    }
    Ok(words)
}
