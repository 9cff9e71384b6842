//! Blocking invocation of external programs with captured output.

use anyhow::{Context, Result};
use std::borrow::Cow;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::process::{Child, Stdio};

/// Owns a spawned child until it has been reaped.
///
/// Dropping the guard before [`ScopedChild::wait_for_stdout`] completes kills
/// and waits for the child, so no zombie outlives the command.
struct ScopedChild {
    child: Option<Child>,
}

impl ScopedChild {
    fn spawn(cmd: &mut std::process::Command) -> std::io::Result<Self> {
        Ok(Self {
            child: Some(cmd.spawn()?),
        })
    }

    /// Block until the child exits and return everything it wrote to stdout.
    ///
    /// Stderr is drained and discarded. The exit status is not inspected.
    fn wait_for_stdout(mut self) -> std::io::Result<Vec<u8>> {
        let Some(child) = self.child.take() else {
            return Ok(Vec::new());
        };
        let output = child.wait_with_output()?;
        log::debug!("child exited with {}", output.status);
        Ok(output.stdout)
    }
}

impl Drop for ScopedChild {
    fn drop(&mut self) {
        if let Some(mut child) = self.child.take() {
            let _ = child.kill();
            let _ = child.wait();
        }
    }
}

/// Run `program` with `args`, wait for it, and return its stdout decoded as UTF-8.
///
/// Invalid UTF-8 is replaced rather than rejected, and a non-zero exit status
/// is not an error: whatever the program printed is returned.
pub fn capture_stdout(program: &str, args: &[&str]) -> Result<String> {
    let search_paths = std::env::var_os("PATH").unwrap_or_default();
    let executable = find_command_path(&search_paths, Path::new(program))
        .with_context(|| format!("{}: command not found in PATH", program))?;

    log::debug!("spawning {} {:?}", executable.display(), args);
    let mut cmd = std::process::Command::new(executable.as_os_str());
    cmd.args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());

    let child =
        ScopedChild::spawn(&mut cmd).with_context(|| format!("{}: failed to spawn", program))?;
    let stdout = child
        .wait_for_stdout()
        .with_context(|| format!("{}: failed to collect output", program))?;
    Ok(String::from_utf8_lossy(&stdout).into_owned())
}

/// Resolve a command path the way a typical shell would.
///
/// Behavior:
/// - Absolute path: returns it if it exists.
/// - Relative with multiple components (e.g., `bin/sh`) or `./`-prefixed: returns it if it exists.
/// - Single path component: search each directory in `search_paths` (PATH)
///   and return the first existing match.
/// - Empty path: returns `None`.
pub fn find_command_path<'a>(search_paths: &OsStr, path: &'a Path) -> Option<Cow<'a, Path>> {
    if path.is_absolute() || path.starts_with("./") {
        return find_by_path(path).map(Cow::Borrowed);
    }

    let mut components = path.components();
    match (components.next(), components.next()) {
        (None, _) => None,
        (Some(x), None) => find_in_path(search_paths, x.as_os_str()).map(Cow::Owned),
        _ => find_by_path(path).map(Cow::Borrowed),
    }
}

fn find_in_path(search_paths: &OsStr, cmd: &OsStr) -> Option<PathBuf> {
    std::env::split_paths(search_paths)
        .map(|dir| dir.join(cmd))
        .find(|path| path.is_file())
}

fn find_by_path(path: &Path) -> Option<&Path> {
    if path.exists() { Some(path) } else { None }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(unix)]
    fn osstr(s: &str) -> &OsStr {
        OsStr::new(s)
    }

    #[test]
    #[cfg(unix)]
    fn absolute_existing_true() {
        let path = Path::new("/bin/sh");
        let found = find_command_path(osstr("/bin"), path).expect("Expected to find /bin/sh");
        assert_eq!(found.as_ref(), path);
    }

    #[test]
    #[cfg(unix)]
    fn absolute_nonexisting() {
        let res = find_command_path(osstr("/bin"), Path::new("/bin/nonexisting"));
        assert!(res.is_none());
    }

    #[test]
    #[cfg(unix)]
    fn single_component_found_in_path() {
        let found = find_command_path(osstr("/bin"), Path::new("sh"))
            .expect("Expected to find 'sh' in /bin via PATH search");
        assert!(found.as_ref().starts_with("/bin"));
        assert!(found.as_ref().ends_with("sh"));
    }

    #[test]
    #[cfg(unix)]
    fn single_component_not_found_in_path() {
        let res = find_command_path(osstr("/bin"), Path::new("nonexisting"));
        assert!(res.is_none());
    }

    #[test]
    fn empty_path_is_none() {
        let res = find_command_path(OsStr::new("/bin"), Path::new(""));
        assert!(res.is_none());
    }

    #[test]
    #[cfg(unix)]
    fn capture_stdout_returns_output_even_on_failure() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.txt");
        let out = capture_stdout("cat", &[missing.to_str().unwrap()]).unwrap();
        assert_eq!(out, "");
    }

    #[test]
    fn capture_stdout_unknown_program_errors() {
        let res = capture_stdout("definitely-not-a-real-program-42", &[]);
        assert!(res.is_err());
    }
}
