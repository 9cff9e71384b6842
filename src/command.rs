use crate::env::Environment;
use crate::lexer::Token;
use anyhow::Result;
use std::io::{self, BufRead, Write};

/// Source side of a pipeline stage: terminal stdin or the previous stage's output.
///
/// A blanket implementation exists for any type that implements [`BufRead`]
/// (e.g. `StdinLock` or `Cursor<Vec<u8>>`).
pub trait InChannel {
    /// Read one line without its terminator. Returns an empty string at end of input.
    fn readline(&mut self) -> io::Result<String>;
}

impl<T: BufRead> InChannel for T {
    fn readline(&mut self) -> io::Result<String> {
        let mut line = String::new();
        self.read_line(&mut line)?;
        if line.ends_with('\n') {
            line.pop();
            if line.ends_with('\r') {
                line.pop();
            }
        }
        Ok(line)
    }
}

/// Sink side of a pipeline stage: terminal stdout or the next stage's input.
///
/// A blanket implementation exists for any type that implements [`Write`].
pub trait OutChannel {
    /// Write `line` followed by a newline, unless it already ends with one.
    fn writeline(&mut self, line: &str) -> io::Result<()>;
}

impl<T: Write> OutChannel for T {
    fn writeline(&mut self, line: &str) -> io::Result<()> {
        self.write_all(line.as_bytes())?;
        if !line.ends_with('\n') {
            self.write_all(b"\n")?;
        }
        self.flush()
    }
}

/// Control signal returned by `exit`.
///
/// It travels through the error channel so that `?` carries it past every
/// caller up to the session loop, which must check for it with
/// `err.is::<ExitRequested>()` before treating the error as a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("session exit requested")]
pub struct ExitRequested;

/// Returns true when `err` is the session-exit signal rather than a failure.
pub fn is_exit_request(err: &anyhow::Error) -> bool {
    err.is::<ExitRequested>()
}

/// Argument slot of a single-operand command.
///
/// Starts as `Unresolved` and becomes `Resolved` during substitution, except
/// for a `$name` whose lookup misses, which stays `Unresolved`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Arg {
    Unresolved(Token),
    Resolved(String),
}

impl Arg {
    /// Default substitution shared by `echo`, `cat` and `wc`.
    pub fn substitute(&mut self, env: &Environment) {
        let Arg::Unresolved(token) = self else {
            return;
        };

        if let Token::Interpret(text) = token {
            if let Some(name) = text.strip_prefix('$') {
                match env.get_var(name) {
                    Some(value) => {
                        log::debug!("substituted ${} -> {:?}", name, value);
                        *self = Arg::Resolved(value.to_string());
                    }
                    None => log::debug!("${} is unset, keeping token", name),
                }
                return;
            }
        }

        *self = Arg::Resolved(token.text().to_string());
    }

    /// Text to use at execution time. An unresolved token contributes its raw text.
    pub fn as_str(&self) -> &str {
        match self {
            Arg::Unresolved(token) => token.text(),
            Arg::Resolved(s) => s,
        }
    }
}

impl From<Token> for Arg {
    fn from(token: Token) -> Self {
        Arg::Unresolved(token)
    }
}

/// Object-safe trait for any command the shell can run.
///
/// Each instance goes through exactly one cycle: [`Command::substitute_vars`]
/// first, then [`Command::execute`].
pub trait Command {
    /// Keyword the command was registered under.
    fn name(&self) -> &'static str;

    /// Resolve variable references against the session environment.
    fn substitute_vars(&mut self, env: &mut Environment);

    /// Run the command, reading from `input` and writing to `output`.
    fn execute(&mut self, input: &mut dyn InChannel, output: &mut dyn OutChannel) -> Result<()>;
}
