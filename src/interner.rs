// ABOUTME: Process-wide symbol interning: name-equal symbols share one id forever.

use crate::value::SymbolId;
use std::collections::HashMap;

/// Maps symbol text to its canonical id. Entries are never removed -- the
/// table pins every symbol for the lifetime of the interpreter so identity
/// comparisons (`eq?`, environment lookup) stay valid across collections.
#[derive(Debug, Default)]
pub struct SymbolTable {
    names: Vec<String>,
    index: HashMap<String, SymbolId>,
}

impl SymbolTable {
    /// Interns `name`, case-folded to upper case per the read-time
    /// convention every built-in identifier relies on.
    pub fn intern(&mut self, name: &str) -> SymbolId {
        let folded = name.to_uppercase();
        if let Some(&id) = self.index.get(&folded) {
            return id;
        }
        let id = self.names.len() as SymbolId;
        self.names.push(folded.clone());
        self.index.insert(folded, id);
        id
    }

    pub fn name(&self, id: SymbolId) -> &str {
        &self.names[id as usize]
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
