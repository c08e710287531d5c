// ABOUTME: Recursive-descent parser: tokens to atoms, including pairs, dotted pairs and quote shorthand.

use crate::error::ErrorKind;
use crate::interpreter::Interpreter;
use crate::lexer::{next_token, LexResult};
use crate::value::Atom;

/// What one recursive-descent step produced. `ParenEnd` isn't an error --
/// it's how a list parse learns it has reached its closing `)`.
enum Parsed {
    Atom(Atom),
    ParenEnd,
}

impl Interpreter {
    /// Parses one top-level form. Returns `None` when the remainder of
    /// `input` is only whitespace (the `EMPTY_LINE` sentinel). Callers
    /// drive a loop over the returned rest-of-input to consume multiple
    /// top-level forms.
    pub fn parse_expr<'a>(&mut self, input: &'a str) -> Result<Option<(Atom, &'a str)>, ErrorKind> {
        match next_token(input, 0) {
            LexResult::Empty => Ok(None),
            LexResult::Token { start, .. } => {
                let (parsed, rest_pos) = self.parse_one(input, start)?;
                match parsed {
                    Parsed::Atom(atom) => Ok(Some((atom, &input[rest_pos..]))),
                    Parsed::ParenEnd => Err(ErrorKind::Syntax("unexpected ')'".to_string())),
                }
            }
        }
    }

    /// Parses the atom (or `ParenEnd`) starting at the token beginning at
    /// `pos`. Returns the position just past what was consumed.
    fn parse_one(&mut self, input: &str, pos: usize) -> Result<(Parsed, usize), ErrorKind> {
        let (start, end) = match next_token(input, pos) {
            LexResult::Empty => {
                return Err(ErrorKind::Syntax("unexpected end of input".to_string()))
            }
            LexResult::Token { start, end } => (start, end),
        };
        let token = &input[start..end];
        match token {
            "(" => self.parse_list(input, end),
            ")" => Ok((Parsed::ParenEnd, end)),
            "'" => {
                let (inner, next_pos) = self.parse_one(input, end)?;
                let inner_atom = match inner {
                    Parsed::Atom(a) => a,
                    Parsed::ParenEnd => {
                        return Err(ErrorKind::Syntax("unexpected ')' after quote".to_string()))
                    }
                };
                if matches!(inner_atom, Atom::Pair(_)) {
                    // Quoting a list with '( is rejected: the host must
                    // spell out (QUOTE ...). Preserved verbatim from the
                    // source design.
                    return Err(ErrorKind::Syntax(
                        "quoting a list with ' is not supported; use (QUOTE ...)".to_string(),
                    ));
                }
                let quote_sym = self.symbols.intern("QUOTE");
                let inner_cell = self.pairs.alloc(inner_atom, Atom::Nil);
                let quoted = self.pairs.alloc(Atom::Symbol(quote_sym), Atom::Pair(inner_cell));
                Ok((Parsed::Atom(Atom::Pair(quoted)), next_pos))
            }
            "\"" => self.parse_string(input, end),
            _ if token.starts_with('#') => self.parse_hash(token, end),
            _ => self.parse_number_or_symbol(token, end),
        }
    }

    fn parse_list(&mut self, input: &str, mut pos: usize) -> Result<(Parsed, usize), ErrorKind> {
        let mut items: Vec<Atom> = Vec::new();
        let mut tail = Atom::Nil;
        loop {
            let (start, end) = match next_token(input, pos) {
                LexResult::Empty => {
                    return Err(ErrorKind::Syntax("unterminated list".to_string()))
                }
                LexResult::Token { start, end } => (start, end),
            };
            if &input[start..end] == "." {
                if items.is_empty() {
                    return Err(ErrorKind::Syntax(
                        "dotted pair '.' cannot be the first list element".to_string(),
                    ));
                }
                let (dotted, next_pos) = self.parse_one(input, end)?;
                tail = match dotted {
                    Parsed::Atom(a) => a,
                    Parsed::ParenEnd => {
                        return Err(ErrorKind::Syntax(
                            "'.' must be followed by exactly one atom".to_string(),
                        ))
                    }
                };
                let (close, next_pos2) = self.parse_one(input, next_pos)?;
                if !matches!(close, Parsed::ParenEnd) {
                    return Err(ErrorKind::Syntax(
                        "'.' must be followed by exactly one atom before ')'".to_string(),
                    ));
                }
                pos = next_pos2;
                break;
            }
            let (parsed, next_pos) = self.parse_one(input, pos)?;
            pos = next_pos;
            match parsed {
                Parsed::ParenEnd => break,
                Parsed::Atom(atom) => items.push(atom),
            }
        }
        let mut list = tail;
        for atom in items.into_iter().rev() {
            list = Atom::Pair(self.pairs.alloc(atom, list));
        }
        Ok((Parsed::Atom(list), pos))
    }

    fn parse_string(&mut self, input: &str, start: usize) -> Result<(Parsed, usize), ErrorKind> {
        let bytes = input.as_bytes();
        let mut i = start;
        let mut text = String::new();
        loop {
            if i >= bytes.len() {
                return Err(ErrorKind::Syntax("unterminated string literal".to_string()));
            }
            let ch = bytes[i];
            if ch == b'"' {
                i += 1;
                break;
            }
            if ch == b'\\' && i + 1 < bytes.len() {
                // Copied verbatim: the backslash does not start an escape
                // sequence, it only keeps the following '"' from
                // terminating the string.
                text.push(bytes[i] as char);
                text.push(bytes[i + 1] as char);
                i += 2;
                continue;
            }
            text.push(ch as char);
            i += 1;
        }
        let id = self.strings.alloc(text);
        Ok((Parsed::Atom(Atom::Str(id)), i))
    }

    fn parse_hash(&mut self, token: &str, end: usize) -> Result<(Parsed, usize), ErrorKind> {
        match token {
            "#t" | "#T" => Ok((Parsed::Atom(Atom::Boolean(true)), end)),
            "#f" | "#F" => Ok((Parsed::Atom(Atom::Boolean(false)), end)),
            _ => Err(ErrorKind::Syntax(format!("invalid hash literal: {token}"))),
        }
    }

    fn parse_number_or_symbol(&mut self, token: &str, end: usize) -> Result<(Parsed, usize), ErrorKind> {
        if looks_numeric(token) {
            match token.parse::<i64>() {
                Ok(n) => return Ok((Parsed::Atom(Atom::Integer(n)), end)),
                Err(e) => {
                    if matches!(e.kind(), std::num::IntErrorKind::PosOverflow) {
                        return Err(ErrorKind::NumOverflow(token.to_string()));
                    }
                    if matches!(e.kind(), std::num::IntErrorKind::NegOverflow) {
                        return Err(ErrorKind::NumUnderflow(token.to_string()));
                    }
                    // Falls through to float on a plain parse failure
                    // (e.g. "1.5"), per the "try int, then float" rule.
                }
            }
            if let Ok(f) = token.parse::<f64>() {
                return Ok((Parsed::Atom(Atom::Float(f)), end));
            }
        }
        // A lone '+'/'-' (or anything else) falls through to a symbol.
        let upper = token.to_uppercase();
        if upper == "NIL" {
            return Ok((Parsed::Atom(Atom::Nil), end));
        }
        let sym = self.symbols.intern(token);
        Ok((Parsed::Atom(Atom::Symbol(sym)), end))
    }
}

/// A leading digit, or `+`/`-` followed by a digit, is tried as a number.
fn looks_numeric(token: &str) -> bool {
    let mut chars = token.chars();
    match chars.next() {
        Some(c) if c.is_ascii_digit() => true,
        Some('+') | Some('-') => chars.next().is_some_and(|c| c.is_ascii_digit()),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    fn parse(interp: &mut Interpreter, src: &str) -> Atom {
        interp.parse_expr(src).unwrap().unwrap().0
    }

    #[test]
    fn integers_and_floats() {
        let mut interp = Interpreter::new(Config::default());
        assert_eq!(parse(&mut interp, "42"), Atom::Integer(42));
        assert_eq!(parse(&mut interp, "-7"), Atom::Integer(-7));
        assert_eq!(parse(&mut interp, "3.5"), Atom::Float(3.5));
    }

    #[test]
    fn integer_overflow_is_distinguished() {
        let mut interp = Interpreter::new(Config::default());
        let huge = "99999999999999999999";
        assert!(matches!(
            interp.parse_expr(huge),
            Err(ErrorKind::NumOverflow(_))
        ));
    }

    #[test]
    fn booleans_case_insensitive() {
        let mut interp = Interpreter::new(Config::default());
        assert_eq!(parse(&mut interp, "#t"), Atom::Boolean(true));
        assert_eq!(parse(&mut interp, "#F"), Atom::Boolean(false));
        assert!(interp.parse_expr("#x").is_err());
    }

    #[test]
    fn symbols_case_fold_to_upper() {
        let mut interp = Interpreter::new(Config::default());
        let a = parse(&mut interp, "foo");
        let b = parse(&mut interp, "FOO");
        assert_eq!(a, b);
    }

    #[test]
    fn nil_literal() {
        let mut interp = Interpreter::new(Config::default());
        assert_eq!(parse(&mut interp, "nil"), Atom::Nil);
    }

    #[test]
    fn proper_list() {
        let mut interp = Interpreter::new(Config::default());
        let atom = parse(&mut interp, "(1 2 3)");
        let items = interp.list_to_vec(atom).unwrap();
        assert_eq!(items, vec![Atom::Integer(1), Atom::Integer(2), Atom::Integer(3)]);
    }

    #[test]
    fn dotted_pair() {
        let mut interp = Interpreter::new(Config::default());
        let atom = parse(&mut interp, "(1 . 2)");
        match atom {
            Atom::Pair(id) => {
                let cell = interp.pair_cell(id);
                assert_eq!(cell.head, Atom::Integer(1));
                assert_eq!(cell.tail, Atom::Integer(2));
            }
            _ => panic!("expected pair"),
        }
    }

    #[test]
    fn dotted_pair_requires_exactly_one_trailing_atom() {
        let mut interp = Interpreter::new(Config::default());
        assert!(interp.parse_expr("(1 . )").is_err());
        assert!(interp.parse_expr("(. 1)").is_err());
    }

    #[test]
    fn quote_shorthand_on_atom() {
        let mut interp = Interpreter::new(Config::default());
        let atom = parse(&mut interp, "'x");
        match atom {
            Atom::Pair(id) => {
                let cell = interp.pair_cell(id);
                assert!(matches!(cell.head, Atom::Symbol(_)));
            }
            _ => panic!("expected (QUOTE x)"),
        }
    }

    #[test]
    fn quote_shorthand_rejects_lists() {
        let mut interp = Interpreter::new(Config::default());
        assert!(interp.parse_expr("'(1 2)").is_err());
    }

    #[test]
    fn unterminated_string_is_syntax_error() {
        let mut interp = Interpreter::new(Config::default());
        assert!(matches!(interp.parse_expr("\"abc"), Err(ErrorKind::Syntax(_))));
    }

    #[test]
    fn whitespace_only_is_empty_line() {
        let mut interp = Interpreter::new(Config::default());
        assert_eq!(interp.parse_expr("   ").unwrap(), None);
    }

    #[test]
    fn multiple_top_level_forms_via_rest() {
        let mut interp = Interpreter::new(Config::default());
        let (a, rest) = interp.parse_expr("1 2 3").unwrap().unwrap();
        assert_eq!(a, Atom::Integer(1));
        let (b, rest2) = interp.parse_expr(rest).unwrap().unwrap();
        assert_eq!(b, Atom::Integer(2));
        let (c, _) = interp.parse_expr(rest2).unwrap().unwrap();
        assert_eq!(c, Atom::Integer(3));
    }
}
