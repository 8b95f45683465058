use std::iter::Peekable;
use log::debug;
use crate::{
    error::{Error, Thing},
    lex::{Lexeme, Token},
    util::SrcLoc,
    walker::value::{Symbol, Value},
};

/// Parse exactly one form from `tokens` and require that nothing follows it.
pub fn parse(tokens: &[Token], code: &str) -> Result<Value, Error> {
    let mut tokens = tokens.iter().copied().peekable();
    let expr = parse_expr(&mut tokens, code)?;
    match tokens.next() {
        None => Ok(expr),
        Some(tok) => {
            // Point at everything left over, not just the first stray token.
            let rest = tokens.fold(tok.region(), |region, tok| region.union(tok.region()));
            Err(Error::unexpected(tok.lexeme())
                .at(rest)
                .expected(Thing::End)
                .hint("only one top-level form is evaluated"))
        },
    }
}

/// Log the parsed tree, one node per line.
pub fn print_debug(expr: &Value) {
    fn print_depth(expr: &Value, depth: usize) {
        let indent = "  ".repeat(depth);
        match expr {
            Value::Pair(_, _) => match expr.to_vec() {
                Some(items) => {
                    debug!("{}LIST", indent);
                    for item in &items {
                        print_depth(item, depth + 1);
                    }
                },
                None => debug!("{}PAIR: {}", indent, expr),
            },
            atom => debug!("{}{:?}", indent, atom),
        }
    }

    debug!("--- Syntax Tree ---");
    print_depth(expr, 0);
}

fn parse_expr<I>(tokens: &mut Peekable<I>, code: &str) -> Result<Value, Error>
where
    I: Iterator<Item=Token>,
{
    let tok = tokens
        .next()
        .ok_or_else(|| Error::unexpected_eof().expected(Thing::Expr))?;

    match tok.lexeme() {
        Lexeme::LParen => parse_list(tokens, code, tok),
        Lexeme::RParen => Err(Error::unexpected(Lexeme::RParen)
            .at(tok.region())
            .expected(Thing::Expr)
            .hint("this ')' has no matching '('")),
        Lexeme::Number => {
            let text = tok.as_str(code);
            text.parse::<i64>()
                .map(Value::Number)
                .map_err(|_| Error::invalid_number(text).at(tok.region()))
        },
        Lexeme::Ident => Ok(Value::Symbol(Symbol::new(tok.as_str(code)))),
        Lexeme::True => Ok(Value::Bool(true)),
        Lexeme::False => Ok(Value::Bool(false)),
        Lexeme::Quote => {
            let quoted = parse_expr(tokens, code)
                .map_err(|e| e.while_parsing(Thing::Quoted))?;
            Ok(Value::list(vec![Value::Symbol(Symbol::quote()), quoted]))
        },
    }
}

fn parse_list<I>(tokens: &mut Peekable<I>, code: &str, open: Token) -> Result<Value, Error>
where
    I: Iterator<Item=Token>,
{
    let mut items = Vec::new();
    loop {
        match tokens.peek().map(|tok| tok.lexeme()) {
            Some(Lexeme::RParen) => {
                tokens.next();
                return Ok(Value::list(items));
            },
            Some(_) => items.push(parse_expr(tokens, code)
                .map_err(|e| e.while_parsing(Thing::List))?),
            None => return Err(Error::unclosed_delimiter('(')
                .at(open.region().extend_to(SrcLoc::from(code.len())))
                .while_parsing(Thing::List)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{error::ErrorKind, lex::lex, util::SrcRegion};

    fn parse_str(code: &str) -> Result<Value, Error> {
        parse(&lex(code), code)
    }

    #[test]
    fn atoms() {
        assert_eq!(parse_str("42"), Ok(Value::Number(42)));
        assert_eq!(parse_str("#t"), Ok(Value::Bool(true)));
        assert_eq!(parse_str("#f"), Ok(Value::Bool(false)));
        assert_eq!(parse_str("foo?"), Ok(Value::symbol("foo?")));
    }

    #[test]
    fn nested_lists() {
        let expected = Value::list(vec![
            Value::symbol("+"),
            Value::Number(1),
            Value::list(vec![Value::symbol("*"), Value::Number(2), Value::Number(3)]),
        ]);
        assert_eq!(parse_str("(+ 1 (* 2 3))"), Ok(expected));
    }

    #[test]
    fn empty_list_is_nil() {
        assert_eq!(parse_str("()"), Ok(Value::Nil));
        assert_eq!(parse_str("(())"), Ok(Value::list(vec![Value::Nil])));
    }

    #[test]
    fn quote_mark_expands() {
        let expected = Value::list(vec![
            Value::symbol("quote"),
            Value::list(vec![Value::symbol("a"), Value::symbol("b")]),
        ]);
        assert_eq!(parse_str("'(a b)"), Ok(expected));
        assert_eq!(
            parse_str("''x"),
            Ok(Value::list(vec![
                Value::symbol("quote"),
                Value::list(vec![Value::symbol("quote"), Value::symbol("x")]),
            ])),
        );
    }

    #[test]
    fn stray_close_paren() {
        let err = parse_str(")").unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::Unexpected(Thing::Lexeme(Lexeme::RParen)));
        assert_eq!(err.region(), Some(SrcRegion::from((0, 1))));
    }

    #[test]
    fn unclosed_list() {
        let err = parse_str("(+ 1 (* 2").unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::UnclosedDelimiter('('));
        assert_eq!(err.region(), Some(SrcRegion::from((5, 9))));
    }

    #[test]
    fn empty_input_and_dangling_quote() {
        assert_eq!(parse_str("").unwrap_err().kind(), &ErrorKind::UnexpectedEof);
        assert_eq!(parse_str("  ; only a comment").unwrap_err().kind(), &ErrorKind::UnexpectedEof);
        assert_eq!(parse_str("'").unwrap_err().kind(), &ErrorKind::UnexpectedEof);
    }

    #[test]
    fn trailing_forms_are_rejected() {
        let err = parse_str("(+ 1 2) 3").unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::Unexpected(Thing::Lexeme(Lexeme::Number)));
        assert!(err.is_expected(Thing::End));
        assert_eq!(err.region(), Some(SrcRegion::from((8, 9))));
        let err = parse_str("x 1 (a b)").unwrap_err();
        assert_eq!(err.region(), Some(SrcRegion::from((2, 9))));
        assert_eq!(parse_str("(a))").unwrap_err().kind(), &ErrorKind::Unexpected(Thing::Lexeme(Lexeme::RParen)));
    }

    #[test]
    fn oversized_number() {
        let err = parse_str("99999999999999999999").unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::InvalidNumber("99999999999999999999".into()));
    }

    #[test]
    fn error_message_mentions_location() {
        let code = "(car\n  ))";
        let err = parse_str(code).unwrap_err();
        assert!(err.in_context(code).starts_with("2:4: unexpected ')'"));
    }
}
