use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::core::error::CoreError;

/// The capability set a candidate solution must expose to be ranked or archived. The library
/// consumes solutions by reference and never mutates them; rank and density values computed
/// during a pass are stored in pass-scoped results keyed by population index, not on the
/// solution itself. Archives store clones so that the caller is free to mutate or drop the
/// original afterwards.
///
/// All objectives follow a minimisation convention; a maximised objective must be stored with
/// its sign inverted by the caller. Objective values must be finite.
pub trait Solution: Clone {
    /// Get the objective vector. The length must be the same for every solution compared
    /// together.
    ///
    /// return: `&[f64]`
    fn objectives(&self) -> &[f64];

    /// Get the optional constraint-violation vector. A component equal to or above `0` is
    /// feasible; a negative component measures the infeasibility degree.
    ///
    /// return: `Option<&[f64]>`
    fn constraints(&self) -> Option<&[f64]> {
        None
    }

    /// Get the number of objectives.
    ///
    /// return: `usize`
    fn number_of_objectives(&self) -> usize {
        self.objectives().len()
    }

    /// Calculate the overall amount of violation of the solution constraints. This is a measure
    /// about how close (or far) the solution is from meeting the constraints. If the solution is
    /// feasible, then the violation is 0.0. Otherwise, a positive number is returned.
    ///
    /// return: `f64`
    fn constraint_violation(&self) -> f64 {
        match self.constraints() {
            None => 0.0,
            Some(values) => -values.iter().filter(|value| value.is_sign_negative()).sum::<f64>(),
        }
    }

    /// Return whether the solution meets all constraints.
    ///
    /// return: `bool`
    fn is_feasible(&self) -> bool {
        self.constraint_violation() == 0.0
    }
}

/// An owned candidate solution holding an objective vector and an optional constraint-violation
/// vector. This is the concrete [`Solution`] implementation used when the caller does not carry
/// its own solution type.
///
/// # Example
/// ```
/// use pareto_archive::core::{Candidate, Solution};
///
/// fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let candidate = Candidate::with_constraints(vec![1.0, 2.0], vec![0.0, -0.5])?;
///     assert_eq!(candidate.objectives(), &[1.0, 2.0]);
///     assert_eq!(candidate.constraint_violation(), 0.5);
///     Ok(())
/// }
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    /// The values of the objectives.
    objectives: Vec<f64>,
    /// The values of the constraint violations.
    constraints: Option<Vec<f64>>,
}

impl Candidate {
    /// Create a new unconstrained candidate. This returns an error if the objective vector is
    /// empty or contains a non-finite value.
    ///
    /// # Arguments
    ///
    /// * `objectives`: The objective values, one per problem objective.
    ///
    /// returns: `Result<Candidate, CoreError>`
    pub fn new(objectives: Vec<f64>) -> Result<Self, CoreError> {
        Self::build(objectives, None)
    }

    /// Create a new candidate with constraint violations. This returns an error if the objective
    /// vector is empty or either vector contains a non-finite value.
    ///
    /// # Arguments
    ///
    /// * `objectives`: The objective values.
    /// * `constraints`: The signed violation degrees (`0` or positive = feasible component).
    ///
    /// returns: `Result<Candidate, CoreError>`
    pub fn with_constraints(objectives: Vec<f64>, constraints: Vec<f64>) -> Result<Self, CoreError> {
        Self::build(objectives, Some(constraints))
    }

    fn build(objectives: Vec<f64>, constraints: Option<Vec<f64>>) -> Result<Self, CoreError> {
        if objectives.is_empty() {
            return Err(CoreError::EmptyObjectives);
        }
        if objectives.iter().any(|value| !value.is_finite()) {
            return Err(CoreError::NaN("objective".to_string()));
        }
        if let Some(values) = &constraints {
            if values.iter().any(|value| !value.is_finite()) {
                return Err(CoreError::NaN("constraint".to_string()));
            }
        }
        Ok(Self {
            objectives,
            constraints,
        })
    }
}

impl Solution for Candidate {
    fn objectives(&self) -> &[f64] {
        &self.objectives
    }

    fn constraints(&self) -> Option<&[f64]> {
        self.constraints.as_deref()
    }
}

impl Display for Candidate {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Candidate(objectives={:?}, constraints={:?})",
            self.objectives, self.constraints
        )
    }
}
