// ABOUTME: DISPLAY, CONCAT, NEWLINE, DISPLAY-ENV -- the interpreter's only output surface.

use crate::diagnostics::render_float;
use crate::error::{ErrorKind, ARITY_ZERO};
use crate::interpreter::Interpreter;
use crate::value::Atom;

/// The "printed representation" rule shared by `DISPLAY` and `CONCAT`:
/// strings unquoted, symbols by name, numbers in their usual form,
/// booleans as `TRUE`/`FALSE`, `Nil` as empty. This is deliberately not
/// the same rendering `expr_str`/`print_expr` use -- those quote strings
/// and print `#t`/`#f`, which would look wrong spliced into running text.
fn display_repr(interp: &Interpreter, atom: Atom) -> String {
    match atom {
        Atom::Nil => String::new(),
        Atom::Symbol(id) => interp.symbols.name(id).to_string(),
        Atom::Integer(n) => n.to_string(),
        Atom::Float(f) => render_float(f),
        Atom::Boolean(true) => "TRUE".to_string(),
        Atom::Boolean(false) => "FALSE".to_string(),
        Atom::Str(id) => interp.strings.get(id).to_string(),
        other => interp.expr_str(other),
    }
}

fn concat_repr(interp: &Interpreter, args: &[Atom]) -> String {
    args.iter().map(|&a| display_repr(interp, a)).collect()
}

/// `(DISPLAY ...)`: prints the concatenation of its arguments followed by
/// a line break.
pub fn display(interp: &mut Interpreter, args: &[Atom]) -> Result<Atom, ErrorKind> {
    println!("{}", concat_repr(interp, args));
    Ok(Atom::Nil)
}

/// `(CONCAT ...)`: returns a new `String` atom, the concatenation of the
/// printed representations of its arguments.
pub fn concat(interp: &mut Interpreter, args: &[Atom]) -> Result<Atom, ErrorKind> {
    let text = concat_repr(interp, args);
    Ok(interp.alloc_string(text))
}

/// `(NEWLINE)`: prints a line break, no arguments.
pub fn newline(_interp: &mut Interpreter, args: &[Atom]) -> Result<Atom, ErrorKind> {
    if !args.is_empty() {
        return Err(ErrorKind::arguments("NEWLINE", ARITY_ZERO, args.len()));
    }
    println!();
    Ok(Atom::Nil)
}

/// `(DISPLAY-ENV)`: prints the user-level (non-builtin) bindings of the
/// root environment, one per line.
pub fn display_env(interp: &mut Interpreter, args: &[Atom]) -> Result<Atom, ErrorKind> {
    if !args.is_empty() {
        return Err(ErrorKind::arguments("DISPLAY-ENV", ARITY_ZERO, args.len()));
    }
    let root = interp.root_env();
    let bindings = match root {
        Atom::Pair(id) => interp.pair_cell(id).tail,
        _ => Atom::Nil,
    };
    let mut cur = bindings;
    while let Atom::Pair(id) = cur {
        let cell = interp.pair_cell(id);
        if let Atom::Pair(bind_id) = cell.head {
            let binding = interp.pair_cell(bind_id);
            if let Atom::Symbol(sym) = binding.head {
                if !matches!(binding.tail, Atom::Builtin(_)) {
                    println!("{} = {}", interp.symbols.name(sym), interp.expr_str(binding.tail));
                }
            }
        }
        cur = cell.tail;
    }
    Ok(Atom::Nil)
}

pub fn install(interp: &mut Interpreter, env: Atom) {
    interp.env_set_builtin(env, "DISPLAY", display);
    interp.env_set_builtin(env, "CONCAT", concat);
    interp.env_set_builtin(env, "NEWLINE", newline);
    interp.env_set_builtin(env, "DISPLAY-ENV", display_env);
}
