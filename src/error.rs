use std::{collections::HashSet, fmt};
use thiserror::Error as ThisError;
use crate::{
    lex::Lexeme,
    util::SrcRegion,
};

#[derive(Copy, Clone, Debug, Hash, Eq, PartialEq)]
pub enum Thing {
    Lexeme(Lexeme),
    Expr,
    List,
    Quoted,
    End,
}

impl From<Lexeme> for Thing {
    fn from(lexeme: Lexeme) -> Self {
        Thing::Lexeme(lexeme)
    }
}

impl fmt::Display for Thing {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Thing::Lexeme(lexeme) => write!(f, "{}", lexeme),
            Thing::Expr => write!(f, "expression"),
            Thing::List => write!(f, "list"),
            Thing::Quoted => write!(f, "quoted form"),
            Thing::End => write!(f, "end of input"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, ThisError)]
pub enum ErrorKind {
    #[error("unclosed delimiter '{0}'")]
    UnclosedDelimiter(char),
    #[error("unexpected end of input")]
    UnexpectedEof,
    #[error("unexpected {0}")]
    Unexpected(Thing),
    #[error("number literal '{0}' does not fit in a 64-bit integer")]
    InvalidNumber(String),
}

/// A syntax error: something in the token stream that cannot form a value.
#[derive(Clone, Debug, PartialEq)]
pub struct Error {
    kind: ErrorKind,
    region: Option<SrcRegion>,
    while_parsing: Vec<Thing>,
    expected: HashSet<Thing>,
    hint: Option<&'static str>,
}

impl Error {
    pub fn unexpected(thing: impl Into<Thing>) -> Self {
        Self::from(ErrorKind::Unexpected(thing.into()))
    }

    pub fn unclosed_delimiter(c: char) -> Self {
        Self::from(ErrorKind::UnclosedDelimiter(c))
    }

    pub fn unexpected_eof() -> Self {
        Self::from(ErrorKind::UnexpectedEof)
    }

    pub fn invalid_number(text: impl Into<String>) -> Self {
        Self::from(ErrorKind::InvalidNumber(text.into()))
    }

    pub fn at(mut self, region: impl Into<Option<SrcRegion>>) -> Self {
        self.region = region.into();
        self
    }

    pub fn while_parsing(mut self, thing: impl Into<Thing>) -> Self {
        self.while_parsing.push(thing.into());
        self
    }

    pub fn expected(mut self, thing: impl Into<Thing>) -> Self {
        self.expected.insert(thing.into());
        self
    }

    pub fn hint(mut self, hint: &'static str) -> Self {
        self.hint = Some(hint);
        self
    }

    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    pub fn region(&self) -> Option<SrcRegion> {
        self.region
    }

    pub fn is_expected(&self, thing: impl Into<Thing>) -> bool {
        self.expected.contains(&thing.into())
    }

    /// Render the error with 1-based line and column numbers taken from `code`.
    pub fn in_context(&self, code: &str) -> String {
        match self.region.and_then(|region| region.in_context(code)) {
            Some(((line, col), _)) => format!("{}:{}: {}", line + 1, col + 1, self),
            None => self.to_string(),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.kind)?;

        let mut expected = self.expected
            .iter()
            .map(|thing| thing.to_string())
            .collect::<Vec<_>>();
        if !expected.is_empty() {
            expected.sort();
            write!(f, ", expected {}", expected.join(" or "))?;
        }

        if let Some(thing) = self.while_parsing.last() {
            write!(f, " while parsing {}", thing)?;
        }

        if let Some(hint) = self.hint {
            write!(f, " (hint: {})", hint)?;
        }

        Ok(())
    }
}

impl std::error::Error for Error {}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Self {
        Self {
            kind,
            region: None,
            while_parsing: Vec::new(),
            expected: HashSet::default(),
            hint: None,
        }
    }
}
