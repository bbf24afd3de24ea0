//! Grammar value types and transforms: the CFG itself, the WCNF
//! normalizer, and ECFG/RSM construction.
pub mod cfg;
pub mod normalize;
pub mod rsm;
