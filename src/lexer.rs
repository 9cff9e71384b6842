//! A module implementing lexical analysis (tokenization) for the shell's line format.

/// Sigil that the lexer emits in front of a `name=value` word.
pub const ASSIGNMENT_SIGIL: &str = "=";

/// Represents a token resulting from lexical analysis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// Raw text eligible for `$name` substitution. Produced for unquoted and
    /// double-quoted text.
    Interpret(String),
    /// Raw text that is never substituted. Produced only from single-quoted spans.
    Literal(String),
}

impl Token {
    /// The raw text of the token, regardless of its kind.
    pub fn text(&self) -> &str {
        match self {
            Token::Interpret(s) | Token::Literal(s) => s,
        }
    }

    pub fn into_text(self) -> String {
        match self {
            Token::Interpret(s) | Token::Literal(s) => s,
        }
    }
}

/// Tokens of one pipeline stage.
pub type Stage = Vec<Token>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LexingState {
    Normal,
    /// Inside a span opened by the contained quote character.
    InsideQuote(char),
}

struct LexingFSM {
    state: LexingState,
    pending: String,
    out: Vec<Token>,
}

impl LexingFSM {
    fn new() -> Self {
        LexingFSM {
            state: LexingState::Normal,
            pending: String::new(),
            out: Vec::new(),
        }
    }

    /// Scans a line that contains at least one quote character.
    ///
    /// Whatever is pending when the input runs out is dropped: an unterminated
    /// quote loses its span, and unquoted text after the last closing quote is
    /// not emitted either.
    fn make_tokens(mut self, line: &str) -> Vec<Token> {
        for ch in line.chars() {
            match self.state {
                LexingState::Normal => self.handle_normal(ch),
                LexingState::InsideQuote(quote) => self.handle_quote(ch, quote),
            }
        }

        if !self.pending.is_empty() {
            log::debug!("dropping unflushed text at end of line: {:?}", self.pending);
        }
        self.out
    }

    fn handle_normal(&mut self, ch: char) {
        match ch {
            '\'' | '"' => {
                if !self.pending.is_empty() {
                    let text = self.take_trimmed();
                    self.out.push(Token::Interpret(text));
                }
                self.state = LexingState::InsideQuote(ch);
            }
            c => self.pending.push(c),
        }
    }

    fn handle_quote(&mut self, ch: char, quote: char) {
        if ch != quote {
            self.pending.push(ch);
            return;
        }

        let text = self.take_trimmed();
        self.out.push(if quote == '\'' {
            Token::Literal(text)
        } else {
            Token::Interpret(text)
        });
        self.state = LexingState::Normal;
    }

    fn take_trimmed(&mut self) -> String {
        let mut text = std::mem::take(&mut self.pending);
        text.truncate(text.trim_end().len());
        text
    }
}

fn has_quotes(line: &str) -> bool {
    line.contains(['\'', '"'])
}

/// Splits an unquoted line on whitespace, rewriting a lone `name=value` word
/// into the assignment triple `=`, `name`, `value`.
fn split_words(line: &str) -> Vec<Token> {
    let words: Vec<&str> = line.split_whitespace().collect();

    if let [word] = words.as_slice() {
        if let Some((name, value)) = word.split_once('=') {
            return [ASSIGNMENT_SIGIL, name, value]
                .into_iter()
                .map(|w| Token::Interpret(w.to_string()))
                .collect();
        }
    }

    words
        .into_iter()
        .map(|w| Token::Interpret(w.to_string()))
        .collect()
}

/// The main entry point function to perform lexical analysis.
///
/// Returns one token list per pipeline stage. Pipe segmentation is not
/// performed, so the result always holds exactly one stage, possibly empty.
pub fn lex(line: &str) -> Vec<Stage> {
    let tokens = if has_quotes(line) {
        LexingFSM::new().make_tokens(line)
    } else {
        split_words(line)
    };
    log::debug!("lexed {:?} into {:?}", line, tokens);
    vec![tokens]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn i(s: &str) -> Token {
        Token::Interpret(s.to_string())
    }

    fn l(s: &str) -> Token {
        Token::Literal(s.to_string())
    }

    #[test]
    fn test_plain_words() {
        assert_eq!(lex("echo hello"), vec![vec![i("echo"), i("hello")]]);
        assert_eq!(lex("  cat   file.txt \t"), vec![vec![i("cat"), i("file.txt")]]);
    }

    #[test]
    fn test_single_quotes_make_literal() {
        assert_eq!(lex("echo 'a b'"), vec![vec![i("echo"), l("a b")]]);
        assert_eq!(lex("echo '$HOME'"), vec![vec![i("echo"), l("$HOME")]]);
    }

    #[test]
    fn test_double_quotes_make_interpret() {
        assert_eq!(lex("echo \"a b\""), vec![vec![i("echo"), i("a b")]]);
    }

    #[test]
    fn test_other_quote_kind_inside_span_is_text() {
        assert_eq!(lex("echo \"it's\""), vec![vec![i("echo"), i("it's")]]);
        assert_eq!(lex("echo 'say \"hi\"'"), vec![vec![i("echo"), l("say \"hi\"")]]);
    }

    #[test]
    fn test_spans_are_right_trimmed() {
        assert_eq!(lex("echo 'a b  '"), vec![vec![i("echo"), l("a b")]]);
        assert_eq!(lex("echo \"  x \""), vec![vec![i("echo"), i("  x")]]);
    }

    #[test]
    fn test_empty_quotes_yield_empty_token() {
        assert_eq!(lex("echo \"\""), vec![vec![i("echo"), i("")]]);
    }

    #[test]
    fn test_assignment_form() {
        assert_eq!(lex("x=5"), vec![vec![i("="), i("x"), i("5")]]);
        assert_eq!(lex("x=a=b"), vec![vec![i("="), i("x"), i("a=b")]]);
        assert_eq!(lex("x="), vec![vec![i("="), i("x"), i("")]]);
    }

    #[test]
    fn test_equals_among_several_words_is_not_assignment() {
        assert_eq!(lex("echo x=5"), vec![vec![i("echo"), i("x=5")]]);
    }

    #[test]
    fn test_unterminated_quote_is_dropped() {
        assert_eq!(lex("echo 'abc"), vec![vec![i("echo")]]);
        assert_eq!(lex("cat \"file"), vec![vec![i("cat")]]);
    }

    #[test]
    fn test_text_after_last_quote_is_dropped() {
        assert_eq!(lex("echo 'a' b"), vec![vec![i("echo"), l("a")]]);
    }

    #[test]
    fn test_empty_line_is_one_empty_stage() {
        assert_eq!(lex(""), vec![Vec::<Token>::new()]);
        assert_eq!(lex("   "), vec![Vec::<Token>::new()]);
    }

    #[test]
    fn test_pipe_is_not_segmented() {
        let stages = lex("echo a | wc");
        assert_eq!(stages.len(), 1);
        assert_eq!(stages[0], vec![i("echo"), i("a"), i("|"), i("wc")]);
    }
}
