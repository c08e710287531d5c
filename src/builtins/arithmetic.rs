// ABOUTME: +, -, *, / -- left-folding numeric operations with integer/float promotion.

use crate::error::{ErrorKind, ARITY_AT_LEAST_TWO};
use crate::interpreter::Interpreter;
use crate::value::Atom;

#[derive(Clone, Copy)]
enum Num {
    Int(i64),
    Float(f64),
}

fn as_num(name: &str, atom: Atom) -> Result<Num, ErrorKind> {
    match atom {
        Atom::Integer(n) => Ok(Num::Int(n)),
        Atom::Float(f) => Ok(Num::Float(f)),
        other => Err(ErrorKind::wrong_type(name, "number", other.type_name())),
    }
}

fn to_atom(n: Num) -> Atom {
    match n {
        Num::Int(n) => Atom::Integer(n),
        Num::Float(f) => Atom::Float(f),
    }
}

/// Left-folds `args` through `int_op`/`float_op`. The accumulator starts
/// integer and only ever promotes to float, never back.
fn fold(
    name: &str,
    args: &[Atom],
    int_op: fn(i64, i64) -> i64,
    float_op: fn(f64, f64) -> f64,
) -> Result<Atom, ErrorKind> {
    if args.len() < 2 {
        return Err(ErrorKind::arguments(name, ARITY_AT_LEAST_TWO, args.len()));
    }
    let mut acc = as_num(name, args[0])?;
    for &arg in &args[1..] {
        let rhs = as_num(name, arg)?;
        acc = match (acc, rhs) {
            (Num::Int(a), Num::Int(b)) => Num::Int(int_op(a, b)),
            (Num::Int(a), Num::Float(b)) => Num::Float(float_op(a as f64, b)),
            (Num::Float(a), Num::Int(b)) => Num::Float(float_op(a, b as f64)),
            (Num::Float(a), Num::Float(b)) => Num::Float(float_op(a, b)),
        };
    }
    Ok(to_atom(acc))
}

/// `(+ a b c ...)`, left-folded (equivalent to ordinary sum).
pub fn add(_interp: &mut Interpreter, args: &[Atom]) -> Result<Atom, ErrorKind> {
    fold("+", args, |a, b| a.wrapping_add(b), |a, b| a + b)
}

/// `(- a b c ...) = ((a - b) - c)`.
pub fn sub(_interp: &mut Interpreter, args: &[Atom]) -> Result<Atom, ErrorKind> {
    fold("-", args, |a, b| a.wrapping_sub(b), |a, b| a - b)
}

/// `(* a b c ...)`, left-folded (equivalent to ordinary product).
pub fn mul(_interp: &mut Interpreter, args: &[Atom]) -> Result<Atom, ErrorKind> {
    fold("*", args, |a, b| a.wrapping_mul(b), |a, b| a * b)
}

/// `(/ a b c ...) = ((a / b) / c)`. Division always yields a `Float`, even
/// when every argument is an `Integer`.
pub fn div(_interp: &mut Interpreter, args: &[Atom]) -> Result<Atom, ErrorKind> {
    if args.len() < 2 {
        return Err(ErrorKind::arguments("/", ARITY_AT_LEAST_TWO, args.len()));
    }
    let mut acc = match as_num("/", args[0])? {
        Num::Int(n) => n as f64,
        Num::Float(f) => f,
    };
    for &arg in &args[1..] {
        let rhs = match as_num("/", arg)? {
            Num::Int(n) => n as f64,
            Num::Float(f) => f,
        };
        acc /= rhs;
    }
    Ok(Atom::Float(acc))
}

pub fn install(interp: &mut Interpreter, env: Atom) {
    interp.env_set_builtin(env, "+", add);
    interp.env_set_builtin(env, "-", sub);
    interp.env_set_builtin(env, "*", mul);
    interp.env_set_builtin(env, "/", div);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    #[test]
    fn add_sums_integers() {
        let mut interp = Interpreter::new(Config::default());
        let result = add(&mut interp, &[Atom::Integer(1), Atom::Integer(2), Atom::Integer(3)]).unwrap();
        assert_eq!(result, Atom::Integer(6));
    }

    #[test]
    fn mixed_types_promote_to_float() {
        let mut interp = Interpreter::new(Config::default());
        let result = add(&mut interp, &[Atom::Integer(1), Atom::Float(2.5)]).unwrap();
        assert_eq!(result, Atom::Float(3.5));
    }

    #[test]
    fn sub_left_folds() {
        let mut interp = Interpreter::new(Config::default());
        let result = sub(
            &mut interp,
            &[Atom::Integer(10), Atom::Integer(3), Atom::Integer(2)],
        )
        .unwrap();
        assert_eq!(result, Atom::Integer(5));
    }

    #[test]
    fn division_always_yields_float() {
        let mut interp = Interpreter::new(Config::default());
        let result = div(&mut interp, &[Atom::Integer(20), Atom::Integer(4)]).unwrap();
        assert_eq!(result, Atom::Float(5.0));
    }

    #[test]
    fn arity_below_two_errors() {
        let mut interp = Interpreter::new(Config::default());
        assert!(add(&mut interp, &[Atom::Integer(1)]).is_err());
    }

    #[test]
    fn non_numeric_is_wrong_type() {
        let mut interp = Interpreter::new(Config::default());
        assert!(matches!(
            add(&mut interp, &[Atom::Integer(1), Atom::Nil]),
            Err(ErrorKind::WrongType { .. })
        ));
    }
}
