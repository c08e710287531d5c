// ABOUTME: =, <, > -- numeric comparisons holding pairwise over every adjacent pair.

use crate::error::{ErrorKind, ARITY_AT_LEAST_TWO};
use crate::interpreter::Interpreter;
use crate::value::Atom;

fn as_f64(name: &str, atom: Atom) -> Result<f64, ErrorKind> {
    match atom {
        Atom::Integer(n) => Ok(n as f64),
        Atom::Float(f) => Ok(f),
        other => Err(ErrorKind::wrong_type(name, "number", other.type_name())),
    }
}

/// True iff `cmp` holds for every adjacent pair in `args`.
fn pairwise(name: &str, args: &[Atom], cmp: fn(f64, f64) -> bool) -> Result<Atom, ErrorKind> {
    if args.len() < 2 {
        return Err(ErrorKind::arguments(name, ARITY_AT_LEAST_TWO, args.len()));
    }
    let mut prev = as_f64(name, args[0])?;
    for &arg in &args[1..] {
        let cur = as_f64(name, arg)?;
        if !cmp(prev, cur) {
            return Ok(Atom::Boolean(false));
        }
        prev = cur;
    }
    Ok(Atom::Boolean(true))
}

/// `(= a b ...)`: numeric equality over every adjacent pair.
pub fn num_eq(_interp: &mut Interpreter, args: &[Atom]) -> Result<Atom, ErrorKind> {
    pairwise("=", args, |a, b| a == b)
}

/// `(< a b ...)`: strictly increasing.
pub fn lt(_interp: &mut Interpreter, args: &[Atom]) -> Result<Atom, ErrorKind> {
    pairwise("<", args, |a, b| a < b)
}

/// `(> a b ...)`: strictly decreasing.
pub fn gt(_interp: &mut Interpreter, args: &[Atom]) -> Result<Atom, ErrorKind> {
    pairwise(">", args, |a, b| a > b)
}

pub fn install(interp: &mut Interpreter, env: Atom) {
    interp.env_set_builtin(env, "=", num_eq);
    interp.env_set_builtin(env, "<", lt);
    interp.env_set_builtin(env, ">", gt);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    #[test]
    fn equality_over_every_adjacent_pair() {
        let mut interp = Interpreter::new(Config::default());
        let result = num_eq(&mut interp, &[Atom::Integer(5), Atom::Integer(5), Atom::Integer(5)]).unwrap();
        assert_eq!(result, Atom::Boolean(true));
        let result = num_eq(&mut interp, &[Atom::Integer(5), Atom::Integer(5), Atom::Integer(6)]).unwrap();
        assert_eq!(result, Atom::Boolean(false));
    }

    #[test]
    fn less_than_chain() {
        let mut interp = Interpreter::new(Config::default());
        assert_eq!(
            lt(&mut interp, &[Atom::Integer(1), Atom::Integer(2), Atom::Integer(3)]).unwrap(),
            Atom::Boolean(true)
        );
        assert_eq!(
            lt(&mut interp, &[Atom::Integer(1), Atom::Integer(1)]).unwrap(),
            Atom::Boolean(false)
        );
    }

    #[test]
    fn greater_than_mixed_numeric_types() {
        let mut interp = Interpreter::new(Config::default());
        assert_eq!(
            gt(&mut interp, &[Atom::Float(3.5), Atom::Integer(2)]).unwrap(),
            Atom::Boolean(true)
        );
    }

    #[test]
    fn arity_below_two_errors() {
        let mut interp = Interpreter::new(Config::default());
        assert!(lt(&mut interp, &[Atom::Integer(1)]).is_err());
    }

    #[test]
    fn non_numeric_is_wrong_type() {
        let mut interp = Interpreter::new(Config::default());
        assert!(matches!(
            num_eq(&mut interp, &[Atom::Integer(1), Atom::Nil]),
            Err(ErrorKind::WrongType { .. })
        ));
    }
}
