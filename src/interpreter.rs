use crate::command::{InChannel, OutChannel, is_exit_request};
use crate::env::Environment;
use crate::error::ParseError;
use crate::lexer;
use crate::parser::Parser;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;

/// What the session should do after a line has run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Continue,
    /// `exit` was executed.
    Exit,
}

/// A minimal line interpreter owning the session [`Environment`].
///
/// Every line goes through lex, parse, substitution and execution. The
/// `exit` signal is turned into [`Status::Exit`] here and never reported as
/// an error.
///
/// Example
/// ```
/// use line_shell::{Environment, Interpreter, Status};
/// let mut sh = Interpreter::new(Environment::default());
/// let mut out = Vec::new();
/// sh.run_line("greeting=hello", &mut std::io::empty(), &mut out).unwrap();
/// let status = sh.run_line("echo $greeting", &mut std::io::empty(), &mut out).unwrap();
/// assert_eq!(status, Status::Continue);
/// assert_eq!(out, b"hello\n");
/// ```
pub struct Interpreter {
    env: Environment,
    parser: Parser,
    prompt: String,
}

impl Interpreter {
    /// Create an interpreter over the given environment with the built-in commands.
    pub fn new(env: Environment) -> Self {
        Self {
            env,
            parser: Parser::default(),
            prompt: "$ ".to_string(),
        }
    }

    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = prompt.into();
        self
    }

    pub fn env(&self) -> &Environment {
        &self.env
    }

    /// Run every stage of one input line against the given channels.
    ///
    /// Blank stages are skipped. Parse failures and execution errors are
    /// returned to the caller, which may report them and keep going.
    pub fn run_line(
        &mut self,
        line: &str,
        input: &mut dyn InChannel,
        output: &mut dyn OutChannel,
    ) -> anyhow::Result<Status> {
        for stage in lexer::lex(line) {
            if stage.is_empty() {
                continue;
            }

            let mut cmd = self.parser.parse(stage)?;
            cmd.substitute_vars(&mut self.env);
            match cmd.execute(input, output) {
                Ok(()) => {}
                Err(e) if is_exit_request(&e) => {
                    log::debug!("`{}` requested session exit", cmd.name());
                    return Ok(Status::Exit);
                }
                Err(e) => return Err(e.context(format!("{} failed", cmd.name()))),
            }
        }
        Ok(Status::Continue)
    }

    /// Interactive read-eval-print loop on the terminal.
    ///
    /// Ends on `exit`, end of input, or Ctrl-C.
    pub fn repl(&mut self) -> rustyline::Result<()> {
        let mut rl = DefaultEditor::new()?;
        log::info!("session started");

        loop {
            match rl.readline(&self.prompt) {
                Ok(line) => {
                    if !line.trim().is_empty() {
                        rl.add_history_entry(line.as_str())?;
                    }
                    let mut stdin = std::io::stdin().lock();
                    let mut stdout = std::io::stdout();
                    match self.run_line(&line, &mut stdin, &mut stdout) {
                        Ok(Status::Continue) => {}
                        Ok(Status::Exit) => break,
                        Err(e) => report(&e),
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    println!("Interrupted");
                    break;
                }
                Err(ReadlineError::Eof) => break,
                Err(err) => {
                    log::error!("readline failed: {:?}", err);
                    return Err(err);
                }
            }
        }

        log::info!("session ended");
        Ok(())
    }
}

impl Default for Interpreter {
    /// Interpreter seeded with the current process environment.
    fn default() -> Self {
        Self::new(Environment::new())
    }
}

/// Print a failed line to stderr. Parse failures are user mistakes and only warrant a warning.
pub fn report(err: &anyhow::Error) {
    if let Some(parse_err) = err.downcast_ref::<ParseError>() {
        log::warn!("{}", parse_err);
        eprintln!("{}", parse_err);
    } else {
        log::error!("{:#}", err);
        eprintln!("Error: {:#}", err);
    }
}
