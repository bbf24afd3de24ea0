//! CYK membership testing: does a specific word belong to the language of a
//! grammar already in Weak Chomsky Normal Form? A bonus algorithm alongside
//! the three path-query engines; it answers "is this word in the language"
//! rather than "which nodes does this graph connect".
use ahash::AHashSet;

use crate::grammar::cfg::{Symbol, VarId};
use crate::grammar::normalize::Wcnf;

/// True iff `word` is generated by `wcnf`'s grammar.
///
/// The empty word is a special case: it is accepted iff the start symbol
/// carries a (reachable) epsilon production, which is exactly what
/// [`crate::grammar::normalize::to_wcnf`] preserves.
pub fn cyk(wcnf: &Wcnf, word: &[String]) -> bool {
    let cfg = wcnf.cfg();
    let start = cfg.start();

    if word.is_empty() {
        return cfg
            .productions()
            .iter()
            .any(|p| p.head == start && p.body.is_empty());
    }

    let n = word.len();
    let binary: Vec<(VarId, VarId, VarId)> = cfg
        .productions()
        .iter()
        .filter_map(|p| match p.body.as_slice() {
            [Symbol::Var(m), Symbol::Var(r)] => Some((p.head, *m, *r)),
            _ => None,
        })
        .collect();

    // table[len][start_index] = set of variables generating
    // word[start_index .. start_index + len + 1].
    let mut table: Vec<Vec<AHashSet<VarId>>> = vec![vec![AHashSet::default(); n]; n];
    for (i, token) in word.iter().enumerate() {
        for p in cfg.productions() {
            if let [Symbol::Term(t)] = p.body.as_slice() {
                if t == token {
                    table[0][i].insert(p.head);
                }
            }
        }
    }

    for span in 2..=n {
        for i in 0..=n - span {
            for split in 1..span {
                let left = &table[split - 1][i];
                let right = &table[span - split - 1][i + split];
                if left.is_empty() || right.is_empty() {
                    continue;
                }
                let mut derived = Vec::new();
                for &(head, m, r) in &binary {
                    if left.contains(&m) && right.contains(&r) {
                        derived.push(head);
                    }
                }
                table[span - 1][i].extend(derived);
            }
        }
    }

    table[n - 1][0].contains(&start)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::cfg::Cfg;
    use crate::grammar::normalize::to_wcnf;

    fn dyck_like_grammar() -> Cfg {
        // S -> a S b S | epsilon
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

    fn word(s: &str) -> Vec<String> {
        s.chars().map(|c| c.to_string()).collect()
    }

    #[test]
    fn accepts_empty_word() {
        let wcnf = to_wcnf(&dyck_like_grammar());
        assert!(cyk(&wcnf, &[]));
    }

    #[test]
    fn accepts_balanced_words() {
        let wcnf = to_wcnf(&dyck_like_grammar());
        assert!(cyk(&wcnf, &word("ab")));
        assert!(cyk(&wcnf, &word("aabb")));
        assert!(cyk(&wcnf, &word("abab")));
    }

    #[test]
    fn rejects_unbalanced_words() {
        let wcnf = to_wcnf(&dyck_like_grammar());
        assert!(!cyk(&wcnf, &word("a")));
        assert!(!cyk(&wcnf, &word("ba")));
        assert!(!cyk(&wcnf, &word("aab")));
    }
}
