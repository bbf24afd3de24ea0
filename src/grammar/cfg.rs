//! The `Cfg` value type: finite sets of variables,
//! terminals and productions, plus a start symbol.
use ahash::AHashMap;
use string_interner::{symbol::SymbolU32, StringInterner};

/// A dense id for a CFG variable (nonterminal).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VarId(pub(crate) SymbolU32);

/// One symbol in a production body: either a variable or a terminal.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Symbol {
    /// A nonterminal reference.
    Var(VarId),
    /// A terminal token. The grammar text format treats any maximal
    /// lowercase-initial token as a terminal; this crate stores terminals as
    /// plain interned strings rather than a numeric id, since unlike the
    /// teacher's vocabulary-sized terminal alphabet, grammars here have few
    /// distinct terminals and the strings are used directly as graph edge
    /// labels in CFPQ seeding.
    Term(String),
}

/// A single production `head -> body`, where an empty `body` denotes `head
/// -> epsilon`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Production {
    /// The left-hand side.
    pub head: VarId,
    /// The right-hand side; empty means epsilon.
    pub body: Vec<Symbol>,
}

/// A context-free grammar: `(Variables, Terminals, Productions, Start)`.
#[derive(Debug, Clone)]
pub struct Cfg {
    interner: StringInterner<string_interner::backend::StringBackend<SymbolU32>>,
    productions: Vec<Production>,
    start: VarId,
}

impl Cfg {
    /// An empty grammar whose start symbol is `start_symbol`.
    pub fn new(start_symbol: &str) -> Self {
        let mut interner = StringInterner::new();
        let start = VarId(interner.get_or_intern(start_symbol));
        Self {
            interner,
            productions: Vec::new(),
            start,
        }
    }

    /// Intern (or look up) a variable name, returning its id.
    pub fn intern_var(&mut self, name: &str) -> VarId {
        VarId(self.interner.get_or_intern(name))
    }

    /// The id of a variable, if it has been interned.
    pub fn var_id(&self, name: &str) -> Option<VarId> {
        self.interner.get(name).map(VarId)
    }

    /// Resolve a variable id back to its name.
    pub fn var_name(&self, id: VarId) -> &str {
        self.interner.resolve(id.0).unwrap()
    }

    /// The start symbol.
    pub fn start(&self) -> VarId {
        self.start
    }

    /// Clone this grammar with a different start symbol, without mutating
    /// `self`. The sanctioned way to query from a different start symbol
    /// (see DESIGN.md).
    pub fn with_start(&self, start_symbol: &str) -> Cfg {
        let mut clone = self.clone();
        clone.start = clone.intern_var(start_symbol);
        clone
    }

    /// Add a production.
    pub fn add_production(&mut self, head: VarId, body: Vec<Symbol>) {
        self.productions.push(Production { head, body });
    }

    /// Clone this grammar's variable/terminal interner and start symbol but
    /// drop all productions. Used by the normalizer's intermediate passes,
    /// which rebuild the production set from scratch while new fresh
    /// variables may still need interning into the same namespace.
    pub(crate) fn clone_shell(&self) -> Cfg {
        Cfg {
            interner: self.interner.clone(),
            productions: Vec::new(),
            start: self.start,
        }
    }

    /// Drop all productions in place, keeping the interner and start symbol.
    pub(crate) fn clear_productions(&mut self) {
        self.productions.clear();
    }

    /// All productions.
    pub fn productions(&self) -> &[Production] {
        &self.productions
    }

    /// All distinct variable ids mentioned as a production head or body
    /// symbol, plus the start symbol.
    pub fn variables(&self) -> Vec<VarId> {
        let mut vars: Vec<VarId> = vec![self.start];
        for p in &self.productions {
            vars.push(p.head);
            for s in &p.body {
                if let Symbol::Var(v) = s {
                    vars.push(*v);
                }
            }
        }
        vars.sort();
        vars.dedup();
        vars
    }

    /// Group production indices by head, for algorithms that iterate a
    /// variable's alternatives.
    pub fn productions_by_head(&self) -> AHashMap<VarId, Vec<usize>> {
        let mut map: AHashMap<VarId, Vec<usize>> = AHashMap::default();
        for (idx, p) in self.productions.iter().enumerate() {
            map.entry(p.head).or_default().push(idx);
        }
        map
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn with_start_does_not_mutate_original() {
        let mut cfg = Cfg::new("S");
        let a = cfg.intern_var("A");
        cfg.add_production(cfg.start(), vec![Symbol::Var(a)]);
        let renamed = cfg.with_start("A");
        assert_eq!(cfg.var_name(cfg.start()), "S");
        assert_eq!(renamed.var_name(renamed.start()), "A");
    }
}
