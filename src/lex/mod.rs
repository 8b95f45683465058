use std::fmt;
use log::debug;
use crate::util::{SrcLoc, SrcRegion};

#[derive(Copy, Clone, Debug, Hash, Eq, PartialEq)]
pub enum Lexeme {
    LParen,
    RParen,
    Number,
    Ident,
    True,
    False,
    Quote,
}

impl Lexeme {
    pub fn name(&self) -> &'static str {
        match self {
            Lexeme::LParen => "'('",
            Lexeme::RParen => "')'",
            Lexeme::Number => "number",
            Lexeme::Ident => "identifier",
            Lexeme::True => "'#t'",
            Lexeme::False => "'#f'",
            Lexeme::Quote => "quote mark",
        }
    }
}

impl fmt::Display for Lexeme {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A lexeme plus the region of source text it was scanned from. Tokens never
/// copy their text; use [`Token::as_str`] with the code that was lexed.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Token {
    lexeme: Lexeme,
    region: SrcRegion,
}

impl Token {
    pub fn new(lexeme: Lexeme, region: SrcRegion) -> Self {
        Self {
            lexeme,
            region,
        }
    }

    pub fn lexeme(&self) -> Lexeme {
        self.lexeme
    }

    pub fn region(&self) -> SrcRegion {
        self.region
    }

    pub fn as_str<'a>(&self, code: &'a str) -> &'a str {
        self.region.as_str(code)
    }

    pub fn print_debug(&self, code: &str) {
        debug!("{:?}: {} '{}'", self.region, self.lexeme, self.as_str(code))
    }
}

pub fn print_debug(tokens: &[Token], code: &str) {
    debug!("--- Tokens ---");
    for token in tokens {
        token.print_debug(code);
    }
}

/// Punctuation allowed both to start and to continue an identifier.
fn is_ident_punct(c: char) -> bool {
    match c {
        '!' | '$' | '%' | '&' | '*' | '+' | '-' | '.' | '/' | ':' => true,
        '<' | '=' | '>' | '?' | '^' | '_' | '~' => true,
        _ => false,
    }
}

fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || is_ident_punct(c)
}

fn is_ident_part(c: char) -> bool {
    c.is_ascii_alphanumeric() || is_ident_punct(c)
}

/// Scan `code` into tokens. Never fails: characters that cannot start a token
/// are skipped (and logged), leaving the parser to report anything malformed.
///
/// Numbers are unsigned digit runs only. `-5` scans as the identifier `-5`.
pub fn lex(code: &str) -> Vec<Token> {
    #[derive(Copy, Clone)]
    enum State {
        Default,
        Comment,
        Hash(SrcLoc),
        Ident(SrcLoc),
        Number(SrcLoc),
    }

    let mut tokens = Vec::new();
    let mut chars = code.char_indices().peekable();
    let mut state = State::Default;

    loop {
        let (loc, c) = match chars.peek() {
            Some((idx, c)) => (SrcLoc::from(*idx), Some(*c)),
            None => (SrcLoc::from(code.len()), None),
        };

        let mut to_next = true;
        match state {
            State::Default => match c {
                Some(c) if c.is_whitespace() => {},
                Some(';') => state = State::Comment,
                Some('(') => tokens.push(Token::new(Lexeme::LParen, SrcRegion::single(loc, 1))),
                Some(')') => tokens.push(Token::new(Lexeme::RParen, SrcRegion::single(loc, 1))),
                Some('\'') => tokens.push(Token::new(Lexeme::Quote, SrcRegion::single(loc, 1))),
                Some('#') => state = State::Hash(loc),
                Some(c) if c.is_ascii_digit() => state = State::Number(loc),
                Some(c) if is_ident_start(c) => state = State::Ident(loc),
                Some(c) => debug!("skipping unrecognised character {:?} at {:?}", c, loc),
                None => break,
            },
            State::Comment => match c {
                Some('\n') => state = State::Default,
                Some(_) => {},
                None => break,
            },
            // Whatever follows '#' is consumed; only 't' makes it true.
            State::Hash(start) => {
                let lexeme = if c == Some('t') { Lexeme::True } else { Lexeme::False };
                let until = loc.advance(c.map(char::len_utf8).unwrap_or(0));
                tokens.push(Token::new(lexeme, SrcRegion::range(start, until)));
                state = State::Default;
                if c.is_none() {
                    break;
                }
            },
            State::Ident(start) => match c {
                Some(c) if is_ident_part(c) => {},
                _ => {
                    tokens.push(Token::new(Lexeme::Ident, SrcRegion::range(start, loc)));
                    to_next = false;
                    state = State::Default;
                },
            },
            State::Number(start) => match c {
                Some(c) if c.is_ascii_digit() => {},
                _ => {
                    tokens.push(Token::new(Lexeme::Number, SrcRegion::range(start, loc)));
                    to_next = false;
                    state = State::Default;
                },
            },
        }

        if to_next {
            chars.next();
        }
    }

    tokens
}
