// ABOUTME: Installs the arithmetic/predicate/list/console built-in library into an environment.

pub mod arithmetic;
pub mod comparison;
pub mod console;
pub mod lists;
pub mod logic;
pub mod types;

use crate::interpreter::Interpreter;

/// Registers the arithmetic/predicate/list/console built-ins into the root
/// environment. Not called automatically by `init` -- an embedding host
/// that wants a bare environment with only its own native operations can
/// skip this.
pub fn install(interp: &mut Interpreter) {
    let env = interp.root_env();
    arithmetic::install(interp, env);
    comparison::install(interp, env);
    logic::install(interp, env);
    types::install(interp, env);
    lists::install(interp, env);
    console::install(interp, env);
}
