use std::collections::HashMap;
use std::fmt;

use crate::vm::Word;

/// Namespace of a symbol: branch targets and function entries live in
/// separate key spaces, so a label may share its name with a function.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SymKind {
    Label,
    Func,
}

impl fmt::Display for SymKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SymKind::Label => f.write_str("label"),
            SymKind::Func => f.write_str("function"),
        }
    }
}

/// Where a symbol points: the index of the first instruction after its
/// definition, plus the declared local count for functions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SymVal {
    pub inst_addr: usize,
    pub nlocals: Word,
}

/// Per-file mapping from `(identifier, kind)` to its definition.
///
/// Keys are unique within a file; the parser rejects duplicates so lookup
/// never has to disambiguate.
#[derive(Debug, Default)]
pub struct SymbolTable {
    labels: HashMap<String, SymVal>,
    funcs: HashMap<String, SymVal>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a definition. Returns `false` if `(ident, kind)` is already
    /// defined in this table.
    pub fn define(&mut self, ident: &str, kind: SymKind, val: SymVal) -> bool {
        let map = match kind {
            SymKind::Label => &mut self.labels,
            SymKind::Func => &mut self.funcs,
        };
        if map.contains_key(ident) {
            return false;
        }
        map.insert(ident.to_string(), val);
        true
    }

    pub fn lookup(&self, ident: &str, kind: SymKind) -> Option<SymVal> {
        let map = match kind {
            SymKind::Label => &self.labels,
            SymKind::Func => &self.funcs,
        };
        map.get(ident).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty() && self.funcs.is_empty()
    }

    /// All definitions, for diagnostic listings.
    pub fn iter(&self) -> impl Iterator<Item = (&str, SymKind, SymVal)> {
        let labels = self
            .labels
            .iter()
            .map(|(k, v)| (k.as_str(), SymKind::Label, *v));
        let funcs = self
            .funcs
            .iter()
            .map(|(k, v)| (k.as_str(), SymKind::Func, *v));
        labels.chain(funcs)
    }
}
