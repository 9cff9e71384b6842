use crate::builtin::{Assignment, BuiltinCommand, Cat, Echo, Exit, Pwd, Wc};
use crate::command::Command;
use crate::error::ParseError;
use crate::lexer::{Stage, Token};
use std::collections::HashMap;

/// Builds a command from the tokens following its keyword.
pub type Constructor = fn(Vec<Token>) -> Result<Box<dyn Command>, ParseError>;

fn construct<T: BuiltinCommand>(args: Vec<Token>) -> Result<Box<dyn Command>, ParseError> {
    Ok(Box::new(T::from_tokens(args)?))
}

/// Keyword → constructor dispatch table.
pub struct CommandTable {
    constructors: HashMap<&'static str, Constructor>,
}

impl CommandTable {
    /// A table with no commands registered.
    pub fn empty() -> Self {
        Self {
            constructors: HashMap::new(),
        }
    }

    /// Register `constructor` under `keyword`, replacing any previous entry.
    pub fn insert(&mut self, keyword: &'static str, constructor: Constructor) -> &mut Self {
        self.constructors.insert(keyword, constructor);
        self
    }

    pub(crate) fn register<T: BuiltinCommand>(&mut self) -> &mut Self {
        self.insert(T::keyword(), construct::<T>)
    }

    pub fn get(&self, keyword: &str) -> Option<Constructor> {
        self.constructors.get(keyword).copied()
    }

    pub fn contains(&self, keyword: &str) -> bool {
        self.constructors.contains_key(keyword)
    }
}

impl Default for CommandTable {
    /// The built-in command set: `echo`, `exit`, `pwd`, `cat`, `wc` and `=`.
    fn default() -> Self {
        let mut table = Self::empty();
        table
            .register::<Echo>()
            .register::<Exit>()
            .register::<Pwd>()
            .register::<Cat>()
            .register::<Wc>()
            .register::<Assignment>();
        table
    }
}

/// Maps one pipeline stage onto a command using a [`CommandTable`].
#[derive(Default)]
pub struct Parser {
    table: CommandTable,
}

impl Parser {
    pub fn new(table: CommandTable) -> Self {
        Self { table }
    }

    /// Parse a stage. The first token selects the command, the rest are its operands.
    pub fn parse(&self, stage: Stage) -> Result<Box<dyn Command>, ParseError> {
        let mut tokens = stage.into_iter();
        let Some(head) = tokens.next() else {
            return Err(ParseError::CommandNotFound(String::new()));
        };

        let constructor = self
            .table
            .get(head.text())
            .ok_or_else(|| ParseError::CommandNotFound(head.text().to_string()))?;
        let command = constructor(tokens.collect())?;
        log::debug!("parsed command `{}`", command.name());
        Ok(command)
    }
}

/// Parse a stage with the built-in command set.
pub fn parse(stage: Stage) -> Result<Box<dyn Command>, ParseError> {
    Parser::default().parse(stage)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::Environment;
    use crate::lexer::lex;
    use std::io::Cursor;

    fn i(s: &str) -> Token {
        Token::Interpret(s.to_string())
    }

    #[test]
    fn test_empty_stage_is_not_found() {
        assert!(matches!(parse(vec![]), Err(ParseError::CommandNotFound(_))));
    }

    #[test]
    fn test_unknown_keyword_is_not_found() {
        assert!(matches!(
            parse(vec![i("bogus")]),
            Err(ParseError::CommandNotFound(name)) if name == "bogus"
        ));
    }

    #[test]
    fn test_quoted_keyword_is_matched_by_text() {
        let cmd = parse(vec![Token::Literal("pwd".to_string())]).unwrap();
        assert_eq!(cmd.name(), "pwd");
    }

    #[test]
    fn test_all_keywords_dispatch() {
        let cases = [
            (vec![i("echo"), i("x")], "echo"),
            (vec![i("exit")], "exit"),
            (vec![i("pwd")], "pwd"),
            (vec![i("cat"), i("f")], "cat"),
            (vec![i("wc"), i("f")], "wc"),
            (vec![i("="), i("x"), i("5")], "="),
        ];
        for (stage, expected) in cases {
            assert_eq!(parse(stage).unwrap().name(), expected);
        }
    }

    #[test]
    fn test_exit_and_pwd_ignore_operands() {
        assert!(parse(vec![i("exit"), i("1"), i("2")]).is_ok());
        assert!(parse(vec![i("pwd"), i("-L")]).is_ok());
    }

    #[test]
    fn test_arity_violation_reports_keyword() {
        assert_eq!(
            parse(vec![i("cat")]).err(),
            Some(ParseError::Construction {
                keyword: "cat",
                expected: 1,
                actual: 0
            })
        );
        assert_eq!(
            parse(vec![i("wc"), i("a"), i("b")]).err(),
            Some(ParseError::Construction {
                keyword: "wc",
                expected: 1,
                actual: 2
            })
        );
    }

    #[test]
    fn test_echo_end_to_end() {
        let mut cmd = parse(vec![i("echo"), i("hi")]).unwrap();
        cmd.substitute_vars(&mut Environment::default());
        let mut out = Vec::new();
        cmd.execute(&mut Cursor::new(Vec::new()), &mut out).unwrap();
        assert_eq!(out, b"hi\n");
    }

    #[test]
    fn test_lexed_assignment_updates_env() {
        let stage = lex("x=5").remove(0);
        let mut cmd = parse(stage).unwrap();
        let mut env = Environment::default();
        cmd.substitute_vars(&mut env);
        assert_eq!(env.get_var("x"), Some("5"));
    }

    #[test]
    fn test_custom_table_registration() {
        let mut table = CommandTable::empty();
        table.register::<Echo>();
        let parser = Parser::new(table);
        assert!(parser.parse(vec![i("echo"), i("a")]).is_ok());
        assert!(matches!(
            parser.parse(vec![i("pwd")]),
            Err(ParseError::CommandNotFound(_))
        ));
    }
}
