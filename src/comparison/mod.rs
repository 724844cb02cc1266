use crate::core::{CoreError, Solution};

/// The outcome of a dominance comparison between two solutions.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Dominance {
    /// The first solution dominates.
    First,
    /// The two solutions are incomparable.
    Neither,
    /// The second solution dominates.
    Second,
}

impl Dominance {
    /// Get the conventional ordering value of the outcome: `-1` when the first solution
    /// dominates, `0` when the solutions are incomparable and `1` when the second dominates.
    ///
    /// return: `i8`
    pub fn as_i8(&self) -> i8 {
        match self {
            Dominance::First => -1,
            Dominance::Neither => 0,
            Dominance::Second => 1,
        }
    }

    /// Get the outcome with the solution roles swapped.
    ///
    /// return: `Dominance`
    pub fn reverse(&self) -> Self {
        match self {
            Dominance::First => Dominance::Second,
            Dominance::Neither => Dominance::Neither,
            Dominance::Second => Dominance::First,
        }
    }
}

/// A trait to implement a pairwise dominance relation between two solutions. Comparators are
/// stateless and chosen once when an archive or ranking algorithm is built.
pub trait DominanceComparator<S: Solution> {
    /// Compare two solutions and establish the dominance relation. This returns an error if a
    /// solution has no objectives or the objective counts differ; the vectors are never silently
    /// truncated.
    ///
    /// # Arguments
    ///
    /// * `first`: The first solution to compare.
    /// * `second`: The second solution to compare.
    ///
    /// returns: `Result<Dominance, CoreError>`
    fn compare(&self, first: &S, second: &S) -> Result<Dominance, CoreError>;

    /// Get the comparator name.
    ///
    /// return: `String`
    fn name(&self) -> String;
}

/// Check that two solutions carry non-empty objective vectors of the same length.
pub(crate) fn check_solution_pair<S: Solution>(first: &S, second: &S) -> Result<(), CoreError> {
    if first.objectives().is_empty() || second.objectives().is_empty() {
        return Err(CoreError::EmptyObjectives);
    }
    if first.number_of_objectives() != second.number_of_objectives() {
        return Err(CoreError::DimensionMismatch(
            second.number_of_objectives(),
            first.number_of_objectives(),
        ));
    }
    Ok(())
}

/// This assesses the Pareto dominance between two solutions $S_1$ and $S_2$ and their constraint
/// violations in constrained multi-objective optimisation problems. A solution $S_1$ is
/// constraint-dominated if:
/// 1) both solutions carry constraints and $CV(S_1) < CV(S_2)$ (where $CV$ is the overall
///    constraint violation), regardless of the objective values; or
/// 2) the violations are tied (or no constraints are set) and $S_1$ Pareto-dominates $S_2$
///    under a minimisation convention ($S_1 \prec S_2$).
///
/// See:
///  - Kalyanmoy Deb & Samir Agrawal. (2002). <https://doi.org/10.1007/978-3-7091-6384-9_40>.
#[derive(Clone, Copy, Debug, Default)]
pub struct ParetoDominance;

impl ParetoDominance {
    /// Create the constrained Pareto dominance comparator.
    ///
    /// returns: `ParetoDominance`
    pub fn new() -> Self {
        Self
    }
}

impl<S: Solution> DominanceComparator<S> for ParetoDominance {
    fn compare(&self, first: &S, second: &S) -> Result<Dominance, CoreError> {
        check_solution_pair(first, second)?;

        // the solution with the smaller violation dominates, independently of the objectives
        let cv1 = first.constraint_violation();
        let cv2 = second.constraint_violation();
        if cv1 != cv2 {
            return if cv1 < cv2 {
                Ok(Dominance::First)
            } else {
                Ok(Dominance::Second)
            };
        }

        // check Pareto dominance using all the objectives
        let mut relation = Dominance::Neither;
        for (value1, value2) in first.objectives().iter().zip(second.objectives()) {
            if value1 < value2 {
                if relation == Dominance::Second {
                    return Ok(Dominance::Neither);
                }
                relation = Dominance::First;
            } else if value1 > value2 {
                if relation == Dominance::First {
                    return Ok(Dominance::Neither);
                }
                relation = Dominance::Second;
            }
        }

        Ok(relation)
    }

    fn name(&self) -> String {
        "Pareto dominance".to_string()
    }
}

/// The g-dominance relation, a reference-point-biased variant of Pareto dominance. A solution is
/// flagged when it lies in the region of interest of the `reference_point` (all its objectives
/// are smaller than or equal to the point's coordinates, or all are larger than or equal to
/// them). A flagged solution dominates an unflagged one; when the flags are tied, the relation
/// falls back to the wrapped base comparator, so the dominance cone is shifted without
/// re-implementing the base rule.
///
/// Implemented based on:
/// > J. Molina, L.V. Santana, A.G. Hernández-Díaz, C.A. Coello Coello, R. Caballero.
/// > "g-dominance: Reference point based dominance for multiobjective metaheuristics".
/// > European Journal of Operational Research 197(2), 2009.
pub struct GDominance<C = ParetoDominance> {
    /// The reference point defining the region of interest.
    reference_point: Vec<f64>,
    /// The base dominance rule applied on flag ties.
    base: C,
}

impl GDominance<ParetoDominance> {
    /// Create a g-dominance comparator delegating to [`ParetoDominance`] on flag ties. This
    /// returns an error if the reference point is empty or contains a non-finite value.
    ///
    /// # Arguments
    ///
    /// * `reference_point`: The reference point coordinates, one per objective.
    ///
    /// returns: `Result<GDominance<ParetoDominance>, CoreError>`
    pub fn new(reference_point: Vec<f64>) -> Result<Self, CoreError> {
        Self::with_comparator(reference_point, ParetoDominance::new())
    }
}

impl<C> GDominance<C> {
    /// Create a g-dominance comparator delegating to a custom base comparator on flag ties.
    ///
    /// # Arguments
    ///
    /// * `reference_point`: The reference point coordinates, one per objective.
    /// * `base`: The base dominance rule.
    ///
    /// returns: `Result<GDominance<C>, CoreError>`
    pub fn with_comparator(reference_point: Vec<f64>, base: C) -> Result<Self, CoreError> {
        if reference_point.is_empty() {
            return Err(CoreError::EmptyObjectives);
        }
        if reference_point.iter().any(|value| !value.is_finite()) {
            return Err(CoreError::NaN("reference point".to_string()));
        }
        Ok(Self {
            reference_point,
            base,
        })
    }

    /// Whether a solution lies in the region of interest of the reference point.
    fn flag<S: Solution>(&self, solution: &S) -> Result<bool, CoreError> {
        let objectives = solution.objectives();
        if objectives.len() != self.reference_point.len() {
            return Err(CoreError::DimensionMismatch(
                objectives.len(),
                self.reference_point.len(),
            ));
        }
        let all_below = objectives
            .iter()
            .zip(&self.reference_point)
            .all(|(value, coordinate)| value <= coordinate);
        let all_above = objectives
            .iter()
            .zip(&self.reference_point)
            .all(|(value, coordinate)| value >= coordinate);
        Ok(all_below || all_above)
    }
}

impl<S, C> DominanceComparator<S> for GDominance<C>
where
    S: Solution,
    C: DominanceComparator<S>,
{
    fn compare(&self, first: &S, second: &S) -> Result<Dominance, CoreError> {
        check_solution_pair(first, second)?;

        let first_flag = self.flag(first)?;
        let second_flag = self.flag(second)?;
        if first_flag != second_flag {
            return if first_flag {
                Ok(Dominance::First)
            } else {
                Ok(Dominance::Second)
            };
        }

        self.base.compare(first, second)
    }

    fn name(&self) -> String {
        format!("g-dominance with {}", self.base.name())
    }
}

#[cfg(test)]
mod test {
    use crate::comparison::{Dominance, DominanceComparator, GDominance, ParetoDominance};
    use crate::core::{Candidate, CoreError};

    #[test]
    /// Scenario from a two-objective minimisation problem where one point is strictly better.
    fn test_strict_dominance() {
        let comparator = ParetoDominance::new();
        let a = Candidate::new(vec![1.0, 1.0]).unwrap();
        let b = Candidate::new(vec![2.0, 2.0]).unwrap();

        assert_eq!(comparator.compare(&a, &b).unwrap(), Dominance::First);
        assert_eq!(comparator.compare(&a, &b).unwrap().as_i8(), -1);
        assert_eq!(comparator.compare(&b, &a).unwrap(), Dominance::Second);
    }

    #[test]
    /// Dominance needs a strict improvement in at least one objective.
    fn test_weak_and_equal_vectors() {
        let comparator = ParetoDominance::new();
        let a = Candidate::new(vec![0.0, 1.0]).unwrap();
        let b = Candidate::new(vec![0.0, 2.0]).unwrap();
        assert_eq!(comparator.compare(&a, &b).unwrap(), Dominance::First);

        // duplicated objective vectors are mutually non-dominating
        let c = Candidate::new(vec![0.0, 1.0]).unwrap();
        assert_eq!(comparator.compare(&a, &c).unwrap(), Dominance::Neither);
        assert_eq!(comparator.compare(&a, &a).unwrap(), Dominance::Neither);
    }

    #[test]
    /// `compare(a, b)` must always mirror `compare(b, a)`.
    fn test_antisymmetry() {
        let comparator = ParetoDominance::new();
        let points = vec![
            vec![0.0, 1.0],
            vec![0.5, 0.5],
            vec![1.0, 0.0],
            vec![1.0, 1.0],
            vec![0.0, 1.0],
        ];
        let candidates: Vec<Candidate> = points
            .into_iter()
            .map(|p| Candidate::new(p).unwrap())
            .collect();

        for a in &candidates {
            for b in &candidates {
                let forward = comparator.compare(a, b).unwrap();
                let backward = comparator.compare(b, a).unwrap();
                assert_eq!(forward, backward.reverse());
                assert_eq!(forward.as_i8(), -backward.as_i8());
            }
        }
    }

    #[test]
    /// The constraint violation determines the dominance relation before the objectives.
    fn test_constrained_solutions() {
        let comparator = ParetoDominance::new();

        // the feasible solution dominates despite the worse objectives
        let a = Candidate::with_constraints(vec![15.0, 15.0], vec![0.0]).unwrap();
        let b = Candidate::with_constraints(vec![1.0, 1.0], vec![-1.0]).unwrap();
        assert_eq!(comparator.compare(&a, &b).unwrap(), Dominance::First);

        // both unfeasible, the smaller violation dominates
        let a = Candidate::with_constraints(vec![15.0, 15.0], vec![-0.5]).unwrap();
        let b = Candidate::with_constraints(vec![1.0, 1.0], vec![-3.0]).unwrap();
        assert_eq!(comparator.compare(&a, &b).unwrap(), Dominance::First);

        // tied violation falls back to Pareto dominance
        let a = Candidate::with_constraints(vec![15.0, 15.0], vec![-0.5]).unwrap();
        let b = Candidate::with_constraints(vec![1.0, 1.0], vec![-0.5]).unwrap();
        assert_eq!(comparator.compare(&a, &b).unwrap(), Dominance::Second);
    }

    #[test]
    /// Mismatched objective counts raise an error instead of truncating.
    fn test_dimension_mismatch() {
        let comparator = ParetoDominance::new();
        let a = Candidate::new(vec![1.0, 1.0]).unwrap();
        let b = Candidate::new(vec![1.0, 1.0, 1.0]).unwrap();
        assert!(matches!(
            comparator.compare(&a, &b),
            Err(CoreError::DimensionMismatch(3, 2))
        ));
    }

    #[test]
    /// A solution in the region of interest is preferred; ties delegate to Pareto dominance.
    fn test_g_dominance() {
        let comparator = GDominance::new(vec![0.5, 0.5]).unwrap();

        // `a` weakly dominates the reference point, `b` straddles it
        let a = Candidate::new(vec![0.3, 0.3]).unwrap();
        let b = Candidate::new(vec![0.6, 0.4]).unwrap();
        assert_eq!(comparator.compare(&a, &b).unwrap(), Dominance::First);
        assert_eq!(comparator.compare(&b, &a).unwrap(), Dominance::Second);

        // both flagged: the base Pareto rule decides
        let c = Candidate::new(vec![0.2, 0.2]).unwrap();
        assert_eq!(comparator.compare(&c, &a).unwrap(), Dominance::First);

        // both unflagged and incomparable
        let d = Candidate::new(vec![0.4, 0.6]).unwrap();
        assert_eq!(comparator.compare(&b, &d).unwrap(), Dominance::Neither);
    }
}
