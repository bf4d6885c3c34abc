//! Cutting-plane analyses for the outpatient care-scheduling master problem.
//!
//! A decomposed scheduler splits the problem into a master (which patients
//! get which packets on which day) and per-day subproblems (who treats whom,
//! and when). When a subproblem fails to place some packets, this crate turns
//! the failure into reusable knowledge for the master:
//!
//! - **Dominance**: day A dominates day B on a care unit when any service mix
//!   that fits into B's operator windows also fits into A's. Computed once per
//!   instance from the operator calendar.
//! - **Conflict cores**: the minimal group of demand that competes with an
//!   undone packet for care-unit capacity, extended to every day on which the
//!   same group cannot succeed either.
//!
//! # Modules
//!
//! - **`models`**: Domain types: `Window`, `OperatorCalendar`, `Services`,
//!   `Packets`, `Requests`, `Results`, `SubsumptionRelation`, `ConflictCores`
//! - **`matching`**: The window-assignment oracle behind the dominance test
//! - **`dominance`**: Pairwise day comparison and the subsumption relation
//! - **`cores`**: Closure over shared care units, multipackets, day propagation
//! - **`repository`**: Instance directories and their JSON files
//! - **`validation`**: Input integrity checks (window bounds, dangling references)
//! - **`config`**: Analysis tuning knobs
//!
//! # Example
//!
//! ```
//! use u_carecut::dominance::compute_subsumptions;
//! use u_carecut::models::{OperatorCalendar, Window};
//!
//! let calendar = OperatorCalendar::new()
//!     .with_operator("0", "cu00", "op0", Window::new(0, 10))
//!     .with_operator("1", "cu00", "op0", Window::new(2, 5));
//!
//! let relation = compute_subsumptions(&calendar);
//! assert!(relation.dominates("cu00", "0", "1"));
//! assert!(!relation.dominates("cu00", "1", "0"));
//! ```
//!
//! # References
//!
//! - Hooker & Ottosson (2003), "Logic-based Benders decomposition"
//! - Kuhn (1955), "The Hungarian method for the assignment problem"

pub mod config;
pub mod cores;
pub mod dominance;
pub mod error;
mod exec;
pub mod matching;
pub mod models;
pub mod repository;
pub mod validation;

pub use config::AnalysisConfig;
pub use error::{Error, Result};
