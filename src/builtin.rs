use crate::command::{Arg, Command, ExitRequested, InChannel, OutChannel};
use crate::env::Environment;
use crate::error::ParseError;
use crate::external::capture_stdout;
use crate::lexer::{ASSIGNMENT_SIGIL, Token};
use anyhow::Result;

/// Built-in commands known to the shell at compile time.
///
/// Each builtin is registered in the parser's command table under
/// [`BuiltinCommand::keyword`] and constructed from the tokens that follow it.
pub(crate) trait BuiltinCommand: Command + Sized + 'static {
    /// Canonical keyword of the command, e.g. "echo" or "=".
    fn keyword() -> &'static str;

    /// Build the command from its operands, checking their count.
    fn from_tokens(args: Vec<Token>) -> Result<Self, ParseError>;
}

fn single_operand(keyword: &'static str, args: Vec<Token>) -> Result<Arg, ParseError> {
    let [arg]: [Token; 1] = args
        .try_into()
        .map_err(|args: Vec<Token>| ParseError::Construction {
            keyword,
            expected: 1,
            actual: args.len(),
        })?;
    Ok(Arg::from(arg))
}

/// Runs `program`, blocking, and forwards its captured stdout as one line.
fn forward_output(program: &str, args: &[&str], output: &mut dyn OutChannel) -> Result<()> {
    let stdout = capture_stdout(program, args)?;
    output.writeline(&stdout)?;
    Ok(())
}

/// Write the argument to the output; an empty argument echoes one line of input instead.
#[derive(Debug)]
pub struct Echo {
    arg: Arg,
}

impl BuiltinCommand for Echo {
    fn keyword() -> &'static str {
        "echo"
    }

    fn from_tokens(args: Vec<Token>) -> Result<Self, ParseError> {
        Ok(Self {
            arg: single_operand(Self::keyword(), args)?,
        })
    }
}

impl Command for Echo {
    fn name(&self) -> &'static str {
        Self::keyword()
    }

    fn substitute_vars(&mut self, env: &mut Environment) {
        self.arg.substitute(env);
    }

    fn execute(&mut self, input: &mut dyn InChannel, output: &mut dyn OutChannel) -> Result<()> {
        let line = match &self.arg {
            Arg::Resolved(s) if s.is_empty() => input.readline()?,
            arg => arg.as_str().to_string(),
        };
        output.writeline(&line)?;
        Ok(())
    }
}

/// End the session.
#[derive(Debug)]
pub struct Exit;

impl BuiltinCommand for Exit {
    fn keyword() -> &'static str {
        "exit"
    }

    fn from_tokens(_args: Vec<Token>) -> Result<Self, ParseError> {
        Ok(Self)
    }
}

impl Command for Exit {
    fn name(&self) -> &'static str {
        Self::keyword()
    }

    fn substitute_vars(&mut self, _env: &mut Environment) {}

    fn execute(&mut self, _input: &mut dyn InChannel, _output: &mut dyn OutChannel) -> Result<()> {
        Err(ExitRequested.into())
    }
}

/// Print the current working directory via the external `pwd` program.
#[derive(Debug)]
pub struct Pwd;

impl BuiltinCommand for Pwd {
    fn keyword() -> &'static str {
        "pwd"
    }

    fn from_tokens(_args: Vec<Token>) -> Result<Self, ParseError> {
        Ok(Self)
    }
}

impl Command for Pwd {
    fn name(&self) -> &'static str {
        Self::keyword()
    }

    fn substitute_vars(&mut self, _env: &mut Environment) {}

    fn execute(&mut self, _input: &mut dyn InChannel, output: &mut dyn OutChannel) -> Result<()> {
        forward_output("pwd", &[], output)
    }
}

/// Print a file via the external `cat` program.
#[derive(Debug)]
pub struct Cat {
    path: Arg,
}

impl BuiltinCommand for Cat {
    fn keyword() -> &'static str {
        "cat"
    }

    fn from_tokens(args: Vec<Token>) -> Result<Self, ParseError> {
        Ok(Self {
            path: single_operand(Self::keyword(), args)?,
        })
    }
}

impl Command for Cat {
    fn name(&self) -> &'static str {
        Self::keyword()
    }

    fn substitute_vars(&mut self, env: &mut Environment) {
        self.path.substitute(env);
    }

    fn execute(&mut self, _input: &mut dyn InChannel, output: &mut dyn OutChannel) -> Result<()> {
        forward_output("cat", &[self.path.as_str()], output)
    }
}

/// Count lines, words and bytes of a file via the external `wc` program.
#[derive(Debug)]
pub struct Wc {
    path: Arg,
}

impl BuiltinCommand for Wc {
    fn keyword() -> &'static str {
        "wc"
    }

    fn from_tokens(args: Vec<Token>) -> Result<Self, ParseError> {
        Ok(Self {
            path: single_operand(Self::keyword(), args)?,
        })
    }
}

impl Command for Wc {
    fn name(&self) -> &'static str {
        Self::keyword()
    }

    fn substitute_vars(&mut self, env: &mut Environment) {
        self.path.substitute(env);
    }

    fn execute(&mut self, _input: &mut dyn InChannel, output: &mut dyn OutChannel) -> Result<()> {
        forward_output("wc", &[self.path.as_str()], output)
    }
}

/// `name=value`. The variable is written during substitution; execution does nothing.
#[derive(Debug)]
pub struct Assignment {
    name: String,
    value: String,
}

impl Assignment {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

impl BuiltinCommand for Assignment {
    fn keyword() -> &'static str {
        ASSIGNMENT_SIGIL
    }

    fn from_tokens(args: Vec<Token>) -> Result<Self, ParseError> {
        let [name, value]: [Token; 2] = args
            .try_into()
            .map_err(|args: Vec<Token>| ParseError::Construction {
                keyword: Self::keyword(),
                expected: 2,
                actual: args.len(),
            })?;
        Ok(Self::new(name.into_text(), value.into_text()))
    }
}

impl Command for Assignment {
    fn name(&self) -> &'static str {
        Self::keyword()
    }

    fn substitute_vars(&mut self, env: &mut Environment) {
        log::debug!("assigning {}={:?}", self.name, self.value);
        env.set_var(self.name.clone(), self.value.clone());
    }

    fn execute(&mut self, _input: &mut dyn InChannel, _output: &mut dyn OutChannel) -> Result<()> {
        Ok(())
    }
}
