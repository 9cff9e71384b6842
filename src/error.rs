/// Errors that can occur while turning a token list into a command.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// The stage was empty or its first token is not a known keyword.
    #[error("Command not found: {0}")]
    CommandNotFound(String),
    /// The keyword is known but got the wrong number of operands.
    #[error("{keyword}: expected {expected} argument(s), got {actual}")]
    Construction {
        keyword: &'static str,
        expected: usize,
        actual: usize,
    },
}
