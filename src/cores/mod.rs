//! Conflict core extraction.
//!
//! When a day's subproblem leaves packets undone, each undone packet seeds a
//! conflict core: the smallest group of same-day obligations entangled with
//! it through shared care-unit capacity. The group is canonicalized into
//! multipacket signatures and applied to every day the failing day
//! dominates on all affected care units, yielding a cut for the master
//! problem.
//!
//! # Modules
//!
//! - `closure`: arena-indexed two-worklist closure over obligations and care units
//! - `signature`: per-patient grouping into multipacket signatures
//! - `extractor`: seed enumeration, day propagation, core assembly

mod closure;
mod extractor;
mod signature;

pub use extractor::{extract_cores, propagate_days, CoreExtractor, CoreInputs};
pub use signature::{multipackets, signature};
