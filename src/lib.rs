//! Dominance-based ranking and bounded Pareto archives for multi-objective optimisation.
//!
//! This library implements the solution-comparison core a multi-objective metaheuristic builds
//! on: pairwise [Pareto dominance](comparison::ParetoDominance) with constraint handling,
//! [non-dominated sorting](ranking) of a population into fronts, a family of
//! [density estimators](density) measuring how crowded each region of a front is, and a
//! [`BoundedArchive`](archive::BoundedArchive) that keeps the best trade-off surface found so
//! far within a fixed capacity by pruning the most crowded members.
//!
//! All objectives are minimised; a maximised objective must be stored with its sign inverted.
//! Every operation is synchronous and deterministic: equal density scores are resolved by
//! insertion order, so replaying the same additions always produces the same archive.
//!
//! # Example
//! ```
//! use pareto_archive::archive::BoundedArchive;
//! use pareto_archive::core::{Candidate, Solution};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut archive = BoundedArchive::crowding_distance(2)?;
//!     archive.add(&Candidate::new(vec![0.0, 1.0])?)?;
//!     archive.add(&Candidate::new(vec![0.5, 0.5])?)?;
//!     archive.add(&Candidate::new(vec![1.0, 0.0])?)?;
//!
//!     // the interior solution was pruned to stay within capacity
//!     assert_eq!(archive.size(), 2);
//!     assert_eq!(archive.solutions()[0].objectives(), &[0.0, 1.0]);
//!     assert_eq!(archive.solutions()[1].objectives(), &[1.0, 0.0]);
//!     Ok(())
//! }
//! ```

pub mod archive;
pub mod comparison;
pub mod core;
pub mod density;
pub mod ranking;
