//! Core of a minimal line-oriented shell.
//!
//! A raw line is split into quote-aware tokens by [`lex`], mapped onto a
//! command by [`parse`], and run in two phases: [`Command::substitute_vars`]
//! resolves `$name` references against the session [`Environment`], then
//! [`Command::execute`] reads and writes through the stage's channels.
//!
//! The built-in commands are `echo`, `exit`, `pwd`, `cat`, `wc` and the
//! assignment form `name=value`. [`Interpreter`] ties the pieces together
//! for a session and provides a small interactive loop.

mod builtin;
pub mod command;
pub mod env;
mod error;
mod external;
mod interpreter;
pub mod lexer;
pub mod parser;

pub use command::{Arg, Command, ExitRequested, InChannel, OutChannel};
pub use env::Environment;
pub use error::ParseError;
pub use interpreter::{Interpreter, Status, report};
pub use lexer::{Stage, Token, lex};
pub use parser::{CommandTable, Parser, parse};
