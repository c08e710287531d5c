// ABOUTME: Environment frames as plain pair cells: (parent_env . bindings).

use crate::error::ErrorKind;
use crate::interpreter::Interpreter;
use crate::value::{Atom, BuiltinFn, SymbolId};

impl Interpreter {
    /// Allocates a new frame `(parent . Nil)`. `parent` is `Nil` for the
    /// root frame.
    pub fn env_new(&mut self, parent: Atom) -> Atom {
        Atom::Pair(self.pairs.alloc(parent, Atom::Nil))
    }

    /// Walks `env` child-first, then parents. Equality is canonical symbol
    /// identity, not text comparison.
    pub fn env_get(&self, env: Atom, symbol: SymbolId) -> Result<Atom, ErrorKind> {
        let mut frame = env;
        loop {
            match frame {
                Atom::Nil => {
                    return Err(ErrorKind::Unbound(self.symbols.name(symbol).to_string()))
                }
                Atom::Pair(frame_id) => {
                    let cell = self.pairs.get(frame_id);
                    if let Some(value) = self.lookup_binding(cell.tail, symbol) {
                        return Ok(value);
                    }
                    frame = cell.head;
                }
                other => {
                    return Err(ErrorKind::wrong_type("env_get", "environment", other.type_name()))
                }
            }
        }
    }

    fn lookup_binding(&self, mut bindings: Atom, symbol: SymbolId) -> Option<Atom> {
        while let Atom::Pair(id) = bindings {
            let cell = self.pairs.get(id);
            if let Atom::Pair(bind_id) = cell.head {
                let binding = self.pairs.get(bind_id);
                if let Atom::Symbol(s) = binding.head {
                    if s == symbol {
                        return Some(binding.tail);
                    }
                }
            }
            bindings = cell.tail;
        }
        None
    }

    /// Scans the *current* frame's bindings only; overwrites on hit,
    /// prepends on miss. `DEFINE` always targets the frame it evaluates in.
    pub fn env_set(&mut self, env: Atom, symbol: SymbolId, value: Atom) -> Result<(), ErrorKind> {
        let frame_id = match env {
            Atom::Pair(id) => id,
            other => {
                return Err(ErrorKind::wrong_type("env_set", "environment", other.type_name()))
            }
        };
        let mut bindings = self.pairs.tail(frame_id);
        let head = bindings;
        while let Atom::Pair(id) = bindings {
            let cell = self.pairs.get(id);
            if let Atom::Pair(bind_id) = cell.head {
                let binding = self.pairs.get(bind_id);
                if let Atom::Symbol(s) = binding.head {
                    if s == symbol {
                        self.pairs.set_tail(bind_id, value);
                        return Ok(());
                    }
                }
            }
            bindings = cell.tail;
        }
        let binding_cell = self.pairs.alloc(Atom::Symbol(symbol), value);
        let new_bindings = self.pairs.alloc(Atom::Pair(binding_cell), head);
        self.pairs.set_tail(frame_id, Atom::Pair(new_bindings));
        Ok(())
    }

    /// Interns `name` and binds it to a native function in `env`.
    pub fn env_set_builtin(&mut self, env: Atom, name: &str, f: BuiltinFn) {
        let symbol = self.symbols.intern(name);
        self.env_set(env, symbol, Atom::Builtin(f))
            .expect("env_set_builtin target must be a frame");
    }
}
