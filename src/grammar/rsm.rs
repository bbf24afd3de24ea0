//! ECFG and RSM construction: exactly one regex-bodied
//! production per variable, and the Recursive State Machine built from it.
use ahash::AHashMap;

use crate::automaton::dfa::Dfa;
use crate::automaton::regex::Regex;
use crate::grammar::cfg::{Cfg, Symbol, VarId};

/// An Extended CFG: exactly one production per variable, body is a regex
/// over terminals and nonterminal references.
#[derive(Debug, Clone)]
pub struct Ecfg {
    start: VarId,
    bodies: AHashMap<VarId, Regex>,
    names: AHashMap<VarId, String>,
}

impl Ecfg {
    /// The start variable.
    pub fn start(&self) -> VarId {
        self.start
    }

    /// The regex body for a variable, if defined.
    pub fn body(&self, var: VarId) -> Option<&Regex> {
        self.bodies.get(&var)
    }

    /// All variables with a defined body.
    pub fn variables(&self) -> impl Iterator<Item = VarId> + '_ {
        self.bodies.keys().copied()
    }

    /// The display name of a variable.
    pub fn var_name(&self, var: VarId) -> &str {
        &self.names[&var]
    }

    /// Build an `Ecfg` directly from a one-regex-per-head parse: `cfg` is
    /// used only as the variable namespace (its productions, if any, are
    /// ignored), `bodies` is the head's regex, already using the
    /// [`NONTERMINAL_PREFIX`] convention for nonterminal references.
    pub(crate) fn from_parts(cfg: Cfg, bodies: Vec<(VarId, Regex)>) -> Ecfg {
        let mut names = AHashMap::default();
        let mut body_map = AHashMap::default();
        for (v, re) in bodies {
            names.insert(v, cfg.var_name(v).to_string());
            body_map.insert(v, re);
        }
        Ecfg {
            start: cfg.start(),
            bodies: body_map,
            names,
        }
    }
}

/// Regex over (terminal | nonterminal) tokens, used while building an ECFG
/// body before it is handed to `Regex::to_nfa`. Nonterminal references are
/// represented the same way terminals are in [`Regex::Literal`], prefixed so
/// they cannot collide with a terminal spelled the same way; the prefix is
/// stripped again in [`crate::grammar::rsm::ecfg_to_rsm`] when distinguishing
/// terminal-letter matrices from nonterminal matrices.
pub(crate) const NONTERMINAL_PREFIX: char = '\u{1}';

fn symbol_to_literal(cfg: &Cfg, symbol: &Symbol) -> Regex {
    match symbol {
        Symbol::Term(t) => Regex::Literal(t.clone()),
        Symbol::Var(v) => Regex::Literal(format!("{NONTERMINAL_PREFIX}{}", cfg.var_name(*v))),
    }
}

/// Group `cfg`'s productions by head; the body regex of each head is the
/// union of the (concatenated) bodies of its alternatives, epsilon
/// represented explicitly.
pub fn cfg_to_ecfg(cfg: &Cfg) -> Ecfg {
    let by_head = cfg.productions_by_head();
    let mut bodies = AHashMap::default();
    let mut names = AHashMap::default();
    for v in cfg.variables() {
        names.insert(v, cfg.var_name(v).to_string());
        let alt_regexes: Vec<Regex> = by_head
            .get(&v)
            .map(|idxs| {
                idxs.iter()
                    .map(|&idx| {
                        let body = &cfg.productions()[idx].body;
                        if body.is_empty() {
                            Regex::Epsilon
                        } else {
                            body.iter()
                                .map(|s| symbol_to_literal(cfg, s))
                                .reduce(Regex::concat)
                                .unwrap()
                        }
                    })
                    .collect()
            })
            .unwrap_or_default();
        if let Some(combined) = alt_regexes.into_iter().reduce(Regex::union) {
            bodies.insert(v, combined);
        }
    }
    Ecfg {
        start: cfg.start(),
        bodies,
        names,
    }
}

/// One RSM box: a variable and the minimized DFA accepting its body
/// language, where nonterminal references appear as distinguished "letters"
/// alongside ordinary terminal letters.
#[derive(Debug, Clone)]
pub struct RsmBox {
    /// The variable this box is for.
    pub variable: VarId,
    /// The minimized DFA of the variable's regex body.
    pub dfa: Dfa,
}

/// A Recursive State Machine: a start variable plus one box per variable.
#[derive(Debug, Clone)]
pub struct Rsm {
    start: VarId,
    boxes: AHashMap<VarId, RsmBox>,
    names: AHashMap<VarId, String>,
}

impl Rsm {
    /// The start variable.
    pub fn start(&self) -> VarId {
        self.start
    }

    /// The box for a variable, if one was built.
    pub fn get_box(&self, var: VarId) -> Option<&RsmBox> {
        self.boxes.get(&var)
    }

    /// All boxes.
    pub fn boxes(&self) -> impl Iterator<Item = &RsmBox> {
        self.boxes.values()
    }

    /// The display name of a variable.
    pub fn var_name(&self, var: VarId) -> &str {
        &self.names[&var]
    }

    /// Re-minimize each box's DFA. Idempotent and language-preserving.
    pub fn minimize(&self) -> Rsm {
        let boxes = self
            .boxes
            .iter()
            .map(|(&v, b)| {
                (
                    v,
                    RsmBox {
                        variable: v,
                        dfa: b.dfa.minimize(),
                    },
                )
            })
            .collect();
        Rsm {
            start: self.start,
            boxes,
            names: self.names.clone(),
        }
    }

    /// Two RSMs are equal iff their boxes pairwise agree on variable name and
    /// language equivalence.
    pub fn language_equivalent(&self, other: &Rsm) -> bool {
        if self.boxes.len() != other.boxes.len() {
            return false;
        }
        for (v, b) in &self.boxes {
            let name = &self.names[v];
            let Some((_, ob)) = other
                .boxes
                .iter()
                .find(|(ov, _)| &other.names[ov] == name)
            else {
                return false;
            };
            if !b.dfa.language_equivalent(&ob.dfa) {
                return false;
            }
        }
        true
    }
}

/// For each `(A -> R)` in `ecfg`, minimize the DFA for `R` and produce
/// `Box(A, DFA)`. The RSM's start symbol inherits from the ECFG.
pub fn ecfg_to_rsm(ecfg: &Ecfg) -> Rsm {
    let boxes = ecfg
        .bodies
        .iter()
        .map(|(&v, regex)| {
            let dfa = Dfa::from_nfa(&regex.to_nfa()).minimize();
            (v, RsmBox { variable: v, dfa })
        })
        .collect();
    Rsm {
        start: ecfg.start,
        boxes,
        names: ecfg.names.clone(),
    }
}
