//! Text-format readers built on `nom`: grammar text, regex text, and ECFG
//! text. Kept separate from the value types they build so the core
//! algorithms never depend on a particular surface syntax.
pub mod ecfg;
pub mod grammar;
pub mod regex;
