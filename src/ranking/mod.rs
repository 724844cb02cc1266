pub use fast_non_dominated_sort::FastNonDominatedRanking;
pub use merge_non_dominated_sort::MergeNonDominatedRanking;

mod fast_non_dominated_sort;
mod merge_non_dominated_sort;

use crate::core::{CoreError, Solution};

/// The outcome of a non-dominated sorting pass. The fronts partition the ranked population:
/// front 0 contains the globally non-dominated solutions, front `k` the solutions that become
/// non-dominated once fronts `0..k-1` are removed. Solutions are referred to by their index in
/// the population passed to [`Ranking::rank`]; the ranks are only valid for that call.
#[derive(Debug, Clone)]
pub struct DominanceRanking {
    /// The fronts of increasing rank, each holding population indexes.
    front_indexes: Vec<Vec<usize>>,
    /// The front rank of each population index.
    ranks: Vec<usize>,
}

impl DominanceRanking {
    /// Build a ranking from a front partition.
    ///
    /// # Arguments
    ///
    /// * `front_indexes`: The fronts of increasing rank with the population indexes.
    /// * `population_size`: The size of the ranked population.
    ///
    /// returns: `DominanceRanking`
    pub(crate) fn from_fronts(front_indexes: Vec<Vec<usize>>, population_size: usize) -> Self {
        let mut ranks = vec![0; population_size];
        for (rank, front) in front_indexes.iter().enumerate() {
            for index in front {
                ranks[*index] = rank;
            }
        }
        Self {
            front_indexes,
            ranks,
        }
    }

    /// Get the number of fronts.
    ///
    /// return: `usize`
    pub fn number_of_fronts(&self) -> usize {
        self.front_indexes.len()
    }

    /// Whether the ranking contains no solutions.
    ///
    /// return: `bool`
    pub fn is_empty(&self) -> bool {
        self.front_indexes.is_empty()
    }

    /// Get all the fronts as population indexes.
    ///
    /// return: `&[Vec<usize>]`
    pub fn fronts(&self) -> &[Vec<usize>] {
        &self.front_indexes
    }

    /// Get the population indexes in the front of a given rank. This returns an error if the
    /// rank does not exist.
    ///
    /// # Arguments
    ///
    /// * `rank`: The front rank, starting from 0 for the non-dominated front.
    ///
    /// returns: `Result<&[usize], CoreError>`
    pub fn front(&self, rank: usize) -> Result<&[usize], CoreError> {
        self.front_indexes
            .get(rank)
            .map(|front| front.as_slice())
            .ok_or(CoreError::NonExistingIndex("front".to_string(), rank))
    }

    /// Get the front rank of a solution by its population index. This is only valid for the
    /// population the ranking was computed from. This returns an error if the index does not
    /// exist.
    ///
    /// # Arguments
    ///
    /// * `solution_index`: The index of the solution in the ranked population.
    ///
    /// returns: `Result<usize, CoreError>`
    pub fn rank_of(&self, solution_index: usize) -> Result<usize, CoreError> {
        self.ranks
            .get(solution_index)
            .copied()
            .ok_or(CoreError::NonExistingIndex(
                "solution".to_string(),
                solution_index,
            ))
    }

    /// Borrow the solutions in the front of a given rank. This returns an error if the rank does
    /// not exist or the population does not match the ranked one.
    ///
    /// # Arguments
    ///
    /// * `population`: The population the ranking was computed from.
    /// * `rank`: The front rank.
    ///
    /// returns: `Result<Vec<&S>, CoreError>`
    pub fn front_solutions<'a, S: Solution>(
        &self,
        population: &'a [S],
        rank: usize,
    ) -> Result<Vec<&'a S>, CoreError> {
        self.front(rank)?
            .iter()
            .map(|index| {
                population
                    .get(*index)
                    .ok_or(CoreError::NonExistingIndex("solution".to_string(), *index))
            })
            .collect()
    }
}

/// A trait to implement a non-dominated sorting algorithm. All implementations must produce the
/// same front membership for any population; they only differ in how the partition is computed.
pub trait Ranking<S: Solution> {
    /// Partition a population into fronts of decreasing dominance. An empty population yields an
    /// empty ranking; a population of mutually non-dominating solutions yields a single front.
    ///
    /// # Arguments
    ///
    /// * `population`: The solutions to sort by dominance.
    ///
    /// returns: `Result<DominanceRanking, CoreError>`
    fn rank(&self, population: &[S]) -> Result<DominanceRanking, CoreError>;
}

/// Check that all solutions carry non-empty objective vectors of the same length.
pub(crate) fn check_population<S: Solution>(population: &[S]) -> Result<(), CoreError> {
    let Some(first) = population.first() else {
        return Ok(());
    };
    let expected = first.number_of_objectives();
    if expected == 0 {
        return Err(CoreError::EmptyObjectives);
    }
    for solution in population {
        if solution.number_of_objectives() != expected {
            return Err(CoreError::DimensionMismatch(
                solution.number_of_objectives(),
                expected,
            ));
        }
    }
    Ok(())
}
