// ABOUTME: CAR, CDR, CONS -- the pair-cell primitives every other list operation builds on.

use crate::error::{ErrorKind, ARITY_ONE, ARITY_TWO};
use crate::interpreter::Interpreter;
use crate::value::Atom;

/// `(CAR x)`: `Nil` passes through unchanged; any other non-`Pair` is a
/// type error.
pub fn car(interp: &mut Interpreter, args: &[Atom]) -> Result<Atom, ErrorKind> {
    if args.len() != 1 {
        return Err(ErrorKind::arguments("CAR", ARITY_ONE, args.len()));
    }
    match args[0] {
        Atom::Nil => Ok(Atom::Nil),
        Atom::Pair(id) => Ok(interp.pair_cell(id).head),
        other => Err(ErrorKind::wrong_type("CAR", "pair or nil", other.type_name())),
    }
}

/// `(CDR x)`: same passthrough/error rule as `CAR`.
pub fn cdr(interp: &mut Interpreter, args: &[Atom]) -> Result<Atom, ErrorKind> {
    if args.len() != 1 {
        return Err(ErrorKind::arguments("CDR", ARITY_ONE, args.len()));
    }
    match args[0] {
        Atom::Nil => Ok(Atom::Nil),
        Atom::Pair(id) => Ok(interp.pair_cell(id).tail),
        other => Err(ErrorKind::wrong_type("CDR", "pair or nil", other.type_name())),
    }
}

/// `(CONS a b)`: builds a new pair cell.
pub fn cons(interp: &mut Interpreter, args: &[Atom]) -> Result<Atom, ErrorKind> {
    if args.len() != 2 {
        return Err(ErrorKind::arguments("CONS", ARITY_TWO, args.len()));
    }
    Ok(Atom::Pair(interp.pairs.alloc(args[0], args[1])))
}

pub fn install(interp: &mut Interpreter, env: Atom) {
    interp.env_set_builtin(env, "CAR", car);
    interp.env_set_builtin(env, "CDR", cdr);
    interp.env_set_builtin(env, "CONS", cons);
}
