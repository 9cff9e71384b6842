use std::collections::HashMap;
use std::env as stdenv;

/// Session-scoped variable store used by the substitution phase.
///
/// The interpreter owns one instance per session and lends it to every
/// command by mutable reference. Only assignment writes to it.
///
/// `Default` yields an empty environment; [`Environment::new`] seeds it from
/// the current process.
#[derive(Debug, Clone, Default)]
pub struct Environment {
    /// Key-value store of shell variables (e.g., PATH, HOME).
    pub vars: HashMap<String, String>,
}

impl Environment {
    /// Capture the current process environment variables into a new `Environment`.
    pub fn new() -> Self {
        Self {
            vars: stdenv::vars().collect(),
        }
    }

    /// Get the value of a variable. Only the session map is consulted.
    pub fn get_var(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(String::as_str)
    }

    /// Set or override a variable.
    pub fn set_var(&mut self, key: impl Into<String>, val: impl Into<String>) {
        self.vars.insert(key.into(), val.into());
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Environment {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self {
            vars: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::env::Environment;

    #[test]
    fn test_env_set_and_get_var() {
        let mut env = Environment::default();

        // initially absent
        assert_eq!(env.get_var("SOME_RANDOM_ENV_VAR_12345"), None);

        env.set_var("KEY", "VALUE");
        assert_eq!(env.get_var("KEY"), Some("VALUE"));

        env.set_var("KEY", "OTHER");
        assert_eq!(env.get_var("KEY"), Some("OTHER"));
    }

    #[test]
    fn test_env_reads_from_process_env() {
        let env = Environment::new();
        assert!(env.get_var("PATH").is_some());
    }

    #[test]
    fn test_empty_env_does_not_fall_back_to_process() {
        let env = Environment::default();
        assert_eq!(env.get_var("PATH"), None);
    }

    #[test]
    fn test_collect_from_pairs() {
        let env: Environment = [("FOO", "bar")].into_iter().collect();
        assert_eq!(env.get_var("FOO"), Some("bar"));
    }
}
