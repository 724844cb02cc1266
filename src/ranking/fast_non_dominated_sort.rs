use log::debug;

use crate::comparison::{Dominance, DominanceComparator, ParetoDominance};
use crate::core::{CoreError, Solution};
use crate::ranking::{check_population, DominanceRanking, Ranking};

/// Non-dominated fast sorting from the NSGA2 paper (with complexity $O(M * N^2)$, where `M` is
/// the number of objectives and `N` the population size).
///
/// This sorts solutions into fronts by counting, for each solution, the number of solutions
/// dominating it. Solutions that are not dominated by any other belong to the first front; the
/// remaining fronts are peeled off by decrementing the counters of the solutions each front
/// member dominates.
///
/// Implemented based on paragraph 3A in:
/// > K. Deb, A. Pratap, S. Agarwal and T. Meyarivan, "A fast and elitist multi-objective genetic
/// > algorithm: NSGA-II," in IEEE Transactions on Evolutionary Computation, vol. 6, no. 2, pp.
/// > 182-197, April 2002, doi: 10.1109/4235.996017.
pub struct FastNonDominatedRanking<S: Solution> {
    /// The dominance relation used to compare solution pairs.
    comparator: Box<dyn DominanceComparator<S>>,
}

impl<S: Solution> FastNonDominatedRanking<S> {
    /// Create the algorithm with the constrained Pareto dominance relation.
    ///
    /// returns: `FastNonDominatedRanking<S>`
    pub fn new() -> Self {
        Self::with_comparator(Box::new(ParetoDominance::new()))
    }

    /// Create the algorithm with a custom dominance relation.
    ///
    /// # Arguments
    ///
    /// * `comparator`: The dominance relation used to compare solution pairs.
    ///
    /// returns: `FastNonDominatedRanking<S>`
    pub fn with_comparator(comparator: Box<dyn DominanceComparator<S>>) -> Self {
        Self { comparator }
    }
}

impl<S: Solution> Default for FastNonDominatedRanking<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: Solution> Ranking<S> for FastNonDominatedRanking<S> {
    fn rank(&self, population: &[S]) -> Result<DominanceRanking, CoreError> {
        check_population(population)?;
        let population_size = population.len();
        if population_size == 0 {
            return Ok(DominanceRanking::from_fronts(vec![], 0));
        }

        // this set contains all the solutions being dominated by a solution `p`. This is `S_p`
        // in the paper
        let mut dominated_solutions: Vec<Vec<usize>> = vec![Vec::new(); population_size];
        // number of solutions that dominate `p`. When the counter is 0, `p` is non-dominated.
        // This is `n_p` in the paper
        let mut domination_counter: Vec<usize> = vec![0; population_size];

        for pi in 0..population_size {
            for qi in (pi + 1)..population_size {
                match self.comparator.compare(&population[pi], &population[qi])? {
                    Dominance::First => {
                        dominated_solutions[pi].push(qi);
                        domination_counter[qi] += 1;
                    }
                    Dominance::Second => {
                        dominated_solutions[qi].push(pi);
                        domination_counter[pi] += 1;
                    }
                    Dominance::Neither => {}
                }
            }
        }

        // solutions with a zero counter are dominated by no other and form the first front
        let mut current_front: Vec<usize> = domination_counter
            .iter()
            .enumerate()
            .filter_map(|(index, counter)| (*counter == 0).then_some(index))
            .collect();

        let mut all_fronts: Vec<Vec<usize>> = vec![current_front.clone()];
        loop {
            let mut next_front: Vec<usize> = Vec::new();
            for pi in current_front.iter() {
                for qi in dominated_solutions[*pi].iter() {
                    domination_counter[*qi] -= 1;
                    // none of the remaining solutions dominate `q`, it belongs to the next front
                    if domination_counter[*qi] == 0 {
                        next_front.push(*qi);
                    }
                }
            }

            if next_front.is_empty() {
                break;
            }
            all_fronts.push(next_front.clone());
            current_front = next_front;
        }

        debug!(
            "Sorted {} solutions into {} fronts",
            population_size,
            all_fronts.len()
        );
        Ok(DominanceRanking::from_fronts(all_fronts, population_size))
    }
}

#[cfg(test)]
mod test {
    use crate::core::test_utils::candidates_from_objectives;
    use crate::ranking::{FastNonDominatedRanking, Ranking};

    #[test]
    /// Test the non-dominated sorting. The resulting fronts and ranks were manually calculated
    /// by plotting the objective values.
    fn test_sorting_2obj() {
        let objectives = vec![
            vec![1.1, 8.1],
            vec![2.1, 6.1],
            vec![3.1, 4.1],
            vec![3.1, 7.1],
            vec![5.1, 3.1],
            vec![5.1, 5.1],
            vec![7.1, 7.1],
            vec![8.1, 2.1],
            vec![10.1, 6.1],
            vec![11.1, 1.1],
            vec![11.1, 3.1],
        ];
        let population = candidates_from_objectives(&objectives);
        let ranking = FastNonDominatedRanking::new().rank(&population).unwrap();

        let expected_first = vec![0, 1, 2, 4, 7, 9];
        assert_eq!(ranking.front(0).unwrap(), expected_first.as_slice());
        for index in &expected_first {
            assert_eq!(ranking.rank_of(*index).unwrap(), 0);
        }

        let expected_second = vec![3, 5, 10];
        assert_eq!(ranking.front(1).unwrap(), expected_second.as_slice());
        for index in expected_second {
            assert_eq!(ranking.rank_of(index).unwrap(), 1);
        }

        let expected_third = vec![6, 8];
        assert_eq!(ranking.front(2).unwrap(), expected_third.as_slice());
        for index in expected_third {
            assert_eq!(ranking.rank_of(index).unwrap(), 2);
        }

        assert_eq!(ranking.number_of_fronts(), 3);
        assert!(ranking.front(3).is_err());
    }

    #[test]
    /// Test the non-dominated sorting with three objectives.
    fn test_sorting_3obj() {
        let objectives = vec![
            vec![2.1, 3.1, 4.1],
            vec![-1.1, 4.1, 8.1],
            vec![0.1, -1.1, -2.1],
            vec![0.1, 0.1, 0.1],
        ];
        let population = candidates_from_objectives(&objectives);
        let ranking = FastNonDominatedRanking::new().rank(&population).unwrap();

        assert_eq!(ranking.front(0).unwrap(), &[1, 2]);
        assert_eq!(ranking.front(1).unwrap(), &[3]);
        assert_eq!(ranking.front(2).unwrap(), &[0]);
        assert_eq!(ranking.rank_of(0).unwrap(), 2);
        assert_eq!(ranking.rank_of(3).unwrap(), 1);
    }

    #[test]
    /// Solutions with a smaller constraint violation outrank feasible-objective improvements.
    fn test_sorting_with_constraints() {
        use crate::core::Candidate;

        let population = vec![
            Candidate::with_constraints(vec![5.0, 5.0], vec![0.0]).unwrap(),
            Candidate::with_constraints(vec![1.0, 1.0], vec![-2.0]).unwrap(),
            Candidate::with_constraints(vec![2.0, 2.0], vec![-1.0]).unwrap(),
        ];
        let ranking = FastNonDominatedRanking::new().rank(&population).unwrap();

        assert_eq!(ranking.front(0).unwrap(), &[0]);
        assert_eq!(ranking.front(1).unwrap(), &[2]);
        assert_eq!(ranking.front(2).unwrap(), &[1]);
    }

    #[test]
    /// A population with mismatched objective counts is rejected.
    fn test_mismatched_population() {
        let population = vec![
            crate::core::Candidate::new(vec![1.0, 2.0]).unwrap(),
            crate::core::Candidate::new(vec![1.0]).unwrap(),
        ];
        assert!(FastNonDominatedRanking::new().rank(&population).is_err());
    }
}
