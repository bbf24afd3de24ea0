//! Automaton primitives: sparse boolean matrices, the NFA/DFA value type,
//! and the boolean-matrix automaton built on top of them.
pub mod bma;
pub mod dfa;
pub mod nfa;
pub mod regex;
pub mod sbm;
