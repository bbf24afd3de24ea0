//! Regex AST: literals, epsilon, concatenation,
//! alternation and Kleene star. Convertible to an epsilon-NFA via
//! [`Regex::to_nfa`], thence determinized and minimized.
use crate::automaton::nfa::Nfa;

/// A regular expression over string literals.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Regex {
    /// The empty word.
    Epsilon,
    /// A single literal token (the atomic alphabet symbol of this crate is a
    /// string, not a character, matching edge labels).
    Literal(String),
    /// `a ++ b`.
    Concat(Box<Regex>, Box<Regex>),
    /// `a | b`.
    Union(Box<Regex>, Box<Regex>),
    /// `a*`.
    Star(Box<Regex>),
}

impl Regex {
    /// Build a Thompson-style epsilon-NFA for this regex.
    pub fn to_nfa(&self) -> Nfa {
        let mut nfa = Nfa::new();
        let (start, end) = Self::build(self, &mut nfa);
        nfa.set_start(start);
        nfa.set_final(end);
        nfa
    }

    fn build(regex: &Regex, nfa: &mut Nfa) -> (u32, u32) {
        match regex {
            Regex::Epsilon => {
                let s = nfa.new_state();
                let e = nfa.new_state();
                nfa.add_epsilon(s, e);
                (s, e)
            }
            Regex::Literal(lit) => {
                let s = nfa.new_state();
                let e = nfa.new_state();
                nfa.add_transition(s, lit, e);
                (s, e)
            }
            Regex::Concat(a, b) => {
                let (s1, e1) = Self::build(a, nfa);
                let (s2, e2) = Self::build(b, nfa);
                nfa.add_epsilon(e1, s2);
                (s1, e2)
            }
            Regex::Union(a, b) => {
                let s = nfa.new_state();
                let e = nfa.new_state();
                let (s1, e1) = Self::build(a, nfa);
                let (s2, e2) = Self::build(b, nfa);
                nfa.add_epsilon(s, s1);
                nfa.add_epsilon(s, s2);
                nfa.add_epsilon(e1, e);
                nfa.add_epsilon(e2, e);
                (s, e)
            }
            Regex::Star(a) => {
                let s = nfa.new_state();
                let e = nfa.new_state();
                let (s1, e1) = Self::build(a, nfa);
                nfa.add_epsilon(s, s1);
                nfa.add_epsilon(e1, s1);
                nfa.add_epsilon(e1, e);
                nfa.add_epsilon(s, e);
                (s, e)
            }
        }
    }

    /// `self | other`.
    pub fn union(self, other: Regex) -> Regex {
        Regex::Union(Box::new(self), Box::new(other))
    }

    /// `self ++ other`.
    pub fn concat(self, other: Regex) -> Regex {
        Regex::Concat(Box::new(self), Box::new(other))
    }

    /// `self*`.
    pub fn star(self) -> Regex {
        Regex::Star(Box::new(self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::automaton::dfa::Dfa;

    #[test]
    fn star_of_literal_accepts_any_repetition() {
        let re = Regex::Literal("a".to_string()).star();
        let dfa = Dfa::from_nfa(&re.to_nfa()).minimize();
        assert!(dfa.accepts(&[]));
        assert!(dfa.accepts(&["a".to_string()]));
        assert!(dfa.accepts(&["a".to_string(), "a".to_string(), "a".to_string()]));
        assert!(!dfa.accepts(&["b".to_string()]));
    }

    #[test]
    fn union_accepts_either_branch() {
        let re = Regex::Literal("a".to_string()).union(Regex::Literal("b".to_string()));
        let dfa = Dfa::from_nfa(&re.to_nfa()).minimize();
        assert!(dfa.accepts(&["a".to_string()]));
        assert!(dfa.accepts(&["b".to_string()]));
        assert!(!dfa.accepts(&["c".to_string()]));
        assert!(!dfa.accepts(&[]));
    }
}
