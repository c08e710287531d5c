// ABOUTME: AND, OR, NOT -- arguments are pre-evaluated by the trampoline, so these never short-circuit.

use crate::error::{ErrorKind, ARITY_AT_LEAST_TWO, ARITY_ONE};
use crate::interpreter::Interpreter;
use crate::value::Atom;

/// `(NOT x)`: truthiness inverse. `#f` is the only falsy value, so `NOT`
/// returns `#t` for it and `#f` for everything else.
pub fn not(_interp: &mut Interpreter, args: &[Atom]) -> Result<Atom, ErrorKind> {
    if args.len() != 1 {
        return Err(ErrorKind::arguments("NOT", ARITY_ONE, args.len()));
    }
    Ok(Atom::Boolean(!args[0].is_truthy()))
}

/// `(AND a b ...)`: NOT classical conjunction. True iff every *consecutive
/// pair* of arguments has equal truthiness, not iff every argument is
/// truthy on its own.
pub fn and(_interp: &mut Interpreter, args: &[Atom]) -> Result<Atom, ErrorKind> {
    if args.len() < 2 {
        return Err(ErrorKind::arguments("AND", ARITY_AT_LEAST_TWO, args.len()));
    }
    let all_equal = args
        .windows(2)
        .all(|pair| pair[0].is_truthy() == pair[1].is_truthy());
    Ok(Atom::Boolean(all_equal))
}

/// `(OR a b ...)`: true iff at least one consecutive pair has at least one
/// truthy member. Not classical disjunction of all arguments.
pub fn or(_interp: &mut Interpreter, args: &[Atom]) -> Result<Atom, ErrorKind> {
    if args.len() < 2 {
        return Err(ErrorKind::arguments("OR", ARITY_AT_LEAST_TWO, args.len()));
    }
    let any_truthy_pair = args
        .windows(2)
        .any(|pair| pair[0].is_truthy() || pair[1].is_truthy());
    Ok(Atom::Boolean(any_truthy_pair))
}

pub fn install(interp: &mut Interpreter, env: Atom) {
    interp.env_set_builtin(env, "NOT", not);
    interp.env_set_builtin(env, "AND", and);
    interp.env_set_builtin(env, "OR", or);
}
