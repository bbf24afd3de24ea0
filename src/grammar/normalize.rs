//! Grammar normalizer: CFG -> Weak Chomsky Normal Form.
//! Sequence: remove useless symbols, eliminate unit productions, remove
//! useless symbols again, decompose long bodies into binary productions.
//! Every epsilon production reachable in the original grammar survives
//! (the "weak" distinction from strict CNF).
use ahash::{AHashMap, AHashSet};

use crate::grammar::cfg::{Cfg, Production, Symbol, VarId};

/// A `Cfg` known to satisfy the three WCNF shapes of the data model:
/// `A -> B C`, `A -> a`, or `A -> epsilon`.
#[derive(Debug, Clone)]
pub struct Wcnf(Cfg);

impl Wcnf {
    /// The underlying grammar.
    pub fn cfg(&self) -> &Cfg {
        &self.0
    }

    /// Checks every production against the three WCNF shapes, for use in
    /// tests and debug assertions.
    pub fn is_well_formed(&self) -> bool {
        self.0.productions().iter().all(|p| match p.body.as_slice() {
            [] => true,
            [Symbol::Term(_)] => true,
            [Symbol::Var(_), Symbol::Var(_)] => true,
            _ => false,
        })
    }
}

/// Normalize `cfg` into Weak Chomsky Normal Form.
pub fn to_wcnf(cfg: &Cfg) -> Wcnf {
    let start = cfg.start();
    let generates_epsilon = generates_epsilon(cfg, start);

    let cfg = remove_useless_symbols(cfg);
    let cfg = eliminate_unit_productions(&cfg);
    let mut cfg = remove_useless_symbols(&cfg);
    decompose_long_bodies(&mut cfg);

    if generates_epsilon && !has_epsilon_production(&cfg, cfg.start()) {
        cfg.add_production(cfg.start(), vec![]);
    }

    Wcnf(cfg)
}

fn has_epsilon_production(cfg: &Cfg, head: VarId) -> bool {
    cfg.productions()
        .iter()
        .any(|p| p.head == head && p.body.is_empty())
}

/// Whether `start` can derive the empty word in `cfg` (used to preserve the
/// "weak" epsilon even when unit-elimination or useless-symbol removal would
/// otherwise lose track of it). A variable is nullable if it has a direct
/// epsilon production, or a production whose body is all nullable variables.
fn generates_epsilon(cfg: &Cfg, start: VarId) -> bool {
    let mut nullable: AHashSet<VarId> = AHashSet::default();
    loop {
        let mut changed = false;
        for p in cfg.productions() {
            if nullable.contains(&p.head) {
                continue;
            }
            let is_nullable = p.body.is_empty()
                || p.body
                    .iter()
                    .all(|s| matches!(s, Symbol::Var(v) if nullable.contains(v)));
            if is_nullable {
                nullable.insert(p.head);
                changed = true;
            }
        }
        if !changed {
            break;
        }
    }
    nullable.contains(&start)
}

/// Which variables are *generating* (derive at least one terminal string,
/// where epsilon counts) and *reachable* (from the start symbol).
fn generating_vars(cfg: &Cfg) -> AHashSet<VarId> {
    let mut generating: AHashSet<VarId> = AHashSet::default();
    loop {
        let mut changed = false;
        for p in cfg.productions() {
            if generating.contains(&p.head) {
                continue;
            }
            let ok = p.body.iter().all(|s| match s {
                Symbol::Term(_) => true,
                Symbol::Var(v) => generating.contains(v),
            });
            if ok {
                generating.insert(p.head);
                changed = true;
            }
        }
        if !changed {
            break;
        }
    }
    generating
}

fn reachable_vars(cfg: &Cfg, start: VarId) -> AHashSet<VarId> {
    let by_head = cfg.productions_by_head();
    let mut reachable: AHashSet<VarId> = [start].into_iter().collect();
    let mut stack = vec![start];
    while let Some(v) = stack.pop() {
        if let Some(idxs) = by_head.get(&v) {
            for &idx in idxs {
                for s in &cfg.productions()[idx].body {
                    if let Symbol::Var(u) = s {
                        if reachable.insert(*u) {
                            stack.push(*u);
                        }
                    }
                }
            }
        }
    }
    reachable
}

fn remove_useless_symbols(cfg: &Cfg) -> Cfg {
    let generating = generating_vars(cfg);
    let mut trimmed = cfg.clone_shell();
    let kept: Vec<Production> = cfg
        .productions()
        .iter()
        .filter(|p| {
            generating.contains(&p.head)
                && p.body.iter().all(|s| match s {
                    Symbol::Var(v) => generating.contains(v),
                    Symbol::Term(_) => true,
                })
        })
        .cloned()
        .collect();
    for p in &kept {
        trimmed.add_production(p.head, p.body.clone());
    }
    let reachable = reachable_vars(&trimmed, trimmed.start());
    let mut result = trimmed.clone_shell();
    for p in trimmed.productions() {
        if reachable.contains(&p.head) {
            result.add_production(p.head, p.body.clone());
        }
    }
    result
}

fn eliminate_unit_productions(cfg: &Cfg) -> Cfg {
    let by_head = cfg.productions_by_head();
    let vars = cfg.variables();
    // Unit closure: A =>* B via a chain of unit productions A -> B.
    let mut unit_closure: AHashMap<VarId, AHashSet<VarId>> = AHashMap::default();
    for &v in &vars {
        unit_closure.insert(v, [v].into_iter().collect());
    }
    loop {
        let mut changed = false;
        for &v in &vars {
            let current: Vec<VarId> = unit_closure[&v].iter().copied().collect();
            for u in current {
                if let Some(idxs) = by_head.get(&u) {
                    for &idx in idxs {
                        let p = &cfg.productions()[idx];
                        if let [Symbol::Var(target)] = p.body.as_slice() {
                            if unit_closure.get_mut(&v).unwrap().insert(*target) {
                                changed = true;
                            }
                        }
                    }
                }
            }
        }
        if !changed {
            break;
        }
    }

    let mut result = cfg.clone_shell();
    for &v in &vars {
        for &u in &unit_closure[&v] {
            if let Some(idxs) = by_head.get(&u) {
                for &idx in idxs {
                    let p = &cfg.productions()[idx];
                    if !matches!(p.body.as_slice(), [Symbol::Var(_)]) {
                        result.add_production(v, p.body.clone());
                    }
                }
            }
        }
    }
    result
}

fn decompose_long_bodies(cfg: &mut Cfg) {
    let mut fresh_counter = 0usize;
    let mut term_proxies: AHashMap<String, VarId> = AHashMap::default();
    let productions = cfg.productions().to_vec();
    cfg.clear_productions();
    for p in productions {
        match p.body.len() {
            0 | 1 => cfg.add_production(p.head, p.body),
            _ => {
                // WCNF's binary shape is all-variable, so any terminal inside a
                // body of length >= 2 is routed through a fresh proxy variable
                // before the body is chained into binary productions.
                let body: Vec<Symbol> = p
                    .body
                    .into_iter()
                    .map(|s| match s {
                        Symbol::Term(t) => {
                            let proxy = *term_proxies.entry(t.clone()).or_insert_with(|| {
                                let fresh_name = format!("#term{fresh_counter}");
                                fresh_counter += 1;
                                cfg.intern_var(&fresh_name)
                            });
                            Symbol::Var(proxy)
                        }
                        Symbol::Var(v) => Symbol::Var(v),
                    })
                    .collect();

                if body.len() == 2 {
                    cfg.add_production(p.head, body);
                    continue;
                }
                // A -> B1 B2 ... Bk  becomes a chain of fresh binary productions.
                let mut current_head = p.head;
                let mut remaining = body;
                while remaining.len() > 2 {
                    let first = remaining.remove(0);
                    let fresh_name = format!("#cnf{fresh_counter}");
                    fresh_counter += 1;
                    let fresh = cfg.intern_var(&fresh_name);
                    cfg.add_production(current_head, vec![first, Symbol::Var(fresh)]);
                    current_head = fresh;
                }
                cfg.add_production(current_head, remaining);
            }
        }
    }
    for (term, proxy) in term_proxies {
        cfg.add_production(proxy, vec![Symbol::Term(term)]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn var_cfg() -> Cfg {
        // S -> a S b S | epsilon   (the CYK bonus example, also a WCNF test)
        let mut cfg = Cfg::new("S");
        let s = cfg.start();
        cfg.add_production(
            s,
            vec![
                Symbol::Term("a".to_string()),
                Symbol::Var(s),
                Symbol::Term("b".to_string()),
                Symbol::Var(s),
            ],
        );
        cfg.add_production(s, vec![]);
        cfg
    }

    #[test]
    fn wcnf_productions_match_the_three_shapes() {
        let wcnf = to_wcnf(&var_cfg());
        assert!(wcnf.is_well_formed());
    }

    #[test]
    fn wcnf_preserves_reachable_epsilon() {
        let wcnf = to_wcnf(&var_cfg());
        assert!(has_epsilon_production(wcnf.cfg(), wcnf.cfg().start()));
    }

    #[test]
    fn unit_chain_is_eliminated() {
        // S -> A ; A -> B ; B -> "a"
        let mut cfg = Cfg::new("S");
        let s = cfg.start();
        let a = cfg.intern_var("A");
        let b = cfg.intern_var("B");
        cfg.add_production(s, vec![Symbol::Var(a)]);
        cfg.add_production(a, vec![Symbol::Var(b)]);
        cfg.add_production(b, vec![Symbol::Term("a".to_string())]);
        let wcnf = to_wcnf(&cfg);
        assert!(wcnf.is_well_formed());
        assert!(wcnf
            .cfg()
            .productions()
            .iter()
            .any(|p| p.head == s && p.body == vec![Symbol::Term("a".to_string())]));
    }

    #[test]
    fn useless_symbols_are_removed() {
        // S -> "a" ; Dead -> Dead (non-generating, unreachable)
        let mut cfg = Cfg::new("S");
        let s = cfg.start();
        let dead = cfg.intern_var("Dead");
        cfg.add_production(s, vec![Symbol::Term("a".to_string())]);
        cfg.add_production(dead, vec![Symbol::Var(dead)]);
        let wcnf = to_wcnf(&cfg);
        assert!(wcnf.cfg().productions().iter().all(|p| p.head != dead));
    }
}
