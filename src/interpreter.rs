// ABOUTME: The embedding surface: Interpreter owns the arenas, the symbol table and the root environment.

use crate::config::Config;
use crate::error::ErrorKind;
use crate::eval::Frame;
use crate::interner::SymbolTable;
use crate::value::{Atom, Cell, PairArena, PairId, StringArena, SymbolId};

/// A single embedded interpreter instance. All state here is per-instance
/// and not thread-safe across concurrent use of the same instance -- a
/// host that wants concurrency runs one `Interpreter` per thread.
pub struct Interpreter {
    pub(crate) pairs: PairArena,
    pub(crate) strings: StringArena,
    pub(crate) symbols: SymbolTable,
    pub(crate) eval_stack: Vec<Frame>,
    pub(crate) config: Config,
    pub(crate) iterations: usize,
    root_env: Atom,
    last_error: String,

    // Canonical ids of the special-form keywords, cached once at startup so
    // dispatch in the evaluator is an integer compare, not a string match.
    pub(crate) sym_quote: SymbolId,
    pub(crate) sym_if: SymbolId,
    pub(crate) sym_define: SymbolId,
    pub(crate) sym_lambda: SymbolId,
    pub(crate) sym_defmacro: SymbolId,
    pub(crate) sym_apply: SymbolId,
}

impl Interpreter {
    /// `init`: creates the root environment. Built-ins are not installed
    /// automatically -- call `install_builtins` (or register a host's own
    /// native operations via `env_set_builtin`) when the embedding host
    /// wants them.
    pub fn new(config: Config) -> Self {
        let mut pairs = PairArena::default();
        let strings = StringArena::default();
        let mut symbols = SymbolTable::default();

        let sym_quote = symbols.intern("QUOTE");
        let sym_if = symbols.intern("IF");
        let sym_define = symbols.intern("DEFINE");
        let sym_lambda = symbols.intern("LAMBDA");
        let sym_defmacro = symbols.intern("DEFMACRO");
        let sym_apply = symbols.intern("APPLY");

        let root_env = Atom::Pair(pairs.alloc(Atom::Nil, Atom::Nil));

        Interpreter {
            pairs,
            strings,
            symbols,
            eval_stack: Vec::new(),
            config,
            iterations: 0,
            root_env,
            last_error: String::new(),
            sym_quote,
            sym_if,
            sym_define,
            sym_lambda,
            sym_defmacro,
            sym_apply,
        }
    }

    pub fn init() -> Self {
        Self::new(Config::default())
    }

    /// `destroy`: unconditional sweep, frees everything regardless of
    /// marks. Consumes `self` -- the interpreter is unusable afterwards.
    pub fn destroy(mut self) {
        self.sweep_all();
    }

    pub fn install_builtins(&mut self) {
        crate::builtins::install(self);
    }

    pub fn root_env(&self) -> Atom {
        self.root_env
    }

    pub fn get_root_env(&self) -> Atom {
        self.root_env
    }

    pub fn config(&self) -> Config {
        self.config
    }

    pub(crate) fn intern(&mut self, name: &str) -> SymbolId {
        self.symbols.intern(name)
    }

    pub(crate) fn pair_cell(&self, id: PairId) -> Cell {
        self.pairs.get(id)
    }

    pub(crate) fn alloc_string(&mut self, text: String) -> Atom {
        Atom::Str(self.strings.alloc(text))
    }

    pub(crate) fn string_text(&self, id: crate::value::StringId) -> &str {
        self.strings.get(id)
    }

    /// `EQ?`'s identity rule, not `Atom`'s derived structural `PartialEq`:
    /// strings compare by content (there is no string interning), symbols
    /// and pairs/closures/macros by canonical id, scalars by value.
    pub(crate) fn atoms_eq(&self, a: Atom, b: Atom) -> bool {
        match (a, b) {
            (Atom::Nil, Atom::Nil) => true,
            (Atom::Symbol(x), Atom::Symbol(y)) => x == y,
            (Atom::Integer(x), Atom::Integer(y)) => x == y,
            (Atom::Float(x), Atom::Float(y)) => x == y,
            (Atom::Boolean(x), Atom::Boolean(y)) => x == y,
            (Atom::Str(x), Atom::Str(y)) => self.strings.get(x) == self.strings.get(y),
            (Atom::Pair(x), Atom::Pair(y)) => x == y,
            (Atom::Closure(x), Atom::Closure(y)) => x == y,
            (Atom::Macro(x), Atom::Macro(y)) => x == y,
            (Atom::Builtin(x), Atom::Builtin(y)) => x == y,
            _ => false,
        }
    }

    // ---- Diagnostics ----

    pub(crate) fn record_error(&mut self, detail: impl Into<String>) {
        let mut detail = detail.into();
        detail.truncate(self.config.last_error_capacity);
        self.last_error = detail;
    }

    pub fn error_detail(&self) -> &str {
        &self.last_error
    }

    pub fn error_type_str(kind: &ErrorKind) -> &'static str {
        kind.kind_str()
    }

    pub fn print_error(&mut self, kind: &ErrorKind) {
        self.record_error(kind.to_string());
        eprintln!("[{}] {}", kind.kind_str(), kind);
    }

    pub fn expr_str(&self, atom: Atom) -> String {
        self.render(atom)
    }

    pub fn print_expr(&self, atom: Atom) {
        println!("{}", self.expr_str(atom));
    }
}
