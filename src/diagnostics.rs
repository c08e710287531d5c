// ABOUTME: Human-readable rendering of atoms, used by expr_str/print_expr and the REPL contract.

use crate::interpreter::Interpreter;
use crate::value::Atom;

impl Interpreter {
    /// Turns any atom into a human-readable string. Pairs print with `(…)`
    /// or `(a . b)`; closures/macros as `#<FUNCTION: ...>`/`#<MACRO: ...>`;
    /// booleans as `#t`/`#f`; strings quoted.
    pub(crate) fn render(&self, atom: Atom) -> String {
        match atom {
            Atom::Nil => "NIL".to_string(),
            Atom::Symbol(id) => self.symbols.name(id).to_string(),
            Atom::Integer(n) => n.to_string(),
            Atom::Float(f) => render_float(f),
            Atom::Boolean(true) => "#t".to_string(),
            Atom::Boolean(false) => "#f".to_string(),
            Atom::Str(id) => format!("\"{}\"", self.strings.get(id)),
            Atom::Pair(id) => self.render_pair(id),
            Atom::Builtin(_) => "#<BUILTIN>".to_string(),
            Atom::Closure(id) => self.render_lambda(id, "FUNCTION"),
            Atom::Macro(id) => self.render_lambda(id, "MACRO"),
        }
    }

    fn render_pair(&self, id: crate::value::PairId) -> String {
        let cell = self.pairs.get(id);
        // Proper-list fast path: walk the spine, collecting rendered
        // elements, until Nil (print as "(a b c)") or a non-pair tail
        // (print as "(a b . c)").
        let mut parts = vec![self.render(cell.head)];
        let mut tail = cell.tail;
        loop {
            match tail {
                Atom::Nil => return format!("({})", parts.join(" ")),
                Atom::Pair(next_id) => {
                    let next = self.pairs.get(next_id);
                    parts.push(self.render(next.head));
                    tail = next.tail;
                }
                other => return format!("({} . {})", parts.join(" "), self.render(other)),
            }
        }
    }

    fn render_lambda(&self, id: crate::value::PairId, label: &str) -> String {
        let outer = self.pairs.get(id);
        let inner = match outer.tail {
            Atom::Pair(inner_id) => self.pairs.get(inner_id),
            _ => return format!("#<{label}>"),
        };
        format!(
            "#<{}: {} {}>",
            label,
            self.render(inner.head),
            self.render(inner.tail)
        )
    }
}

pub(crate) fn render_float(f: f64) -> String {
    if f.fract() == 0.0 && f.is_finite() {
        format!("{f:.1}")
    } else {
        f.to_string()
    }
}
