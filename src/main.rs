use argh::FromArgs;
use line_shell::{Environment, Interpreter, Status, report};
use std::process::ExitCode;

#[derive(FromArgs)]
/// A minimal line-oriented shell supporting echo, pwd, cat, wc, exit and name=value.
struct Args {
    #[argh(option, short = 'c')]
    /// run a single line and exit instead of starting the interactive loop.
    command: Option<String>,

    #[argh(option, default = "String::from(\"$ \")")]
    /// prompt shown by the interactive loop.
    prompt: String,

    #[argh(switch)]
    /// start with an empty environment instead of copying the process environment.
    clean_env: bool,
}

fn main() -> ExitCode {
    env_logger::init();
    let args: Args = argh::from_env();

    let env = if args.clean_env {
        Environment::default()
    } else {
        Environment::new()
    };
    let mut sh = Interpreter::new(env).with_prompt(args.prompt);

    if let Some(line) = args.command {
        let mut stdin = std::io::stdin().lock();
        let mut stdout = std::io::stdout();
        return match sh.run_line(&line, &mut stdin, &mut stdout) {
            Ok(Status::Continue | Status::Exit) => ExitCode::SUCCESS,
            Err(e) => {
                report(&e);
                ExitCode::FAILURE
            }
        };
    }

    match sh.repl() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("interactive loop failed: {}", e);
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
