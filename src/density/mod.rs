pub use angle::AngleDensity;
pub use cosine_similarity::CosineSimilarityDensity;
pub use crowding_distance::CrowdingDistance;
pub use grid::GridDensity;
pub use hypervolume::HypervolumeContribution;

mod angle;
mod cosine_similarity;
mod crowding_distance;
mod grid;
mod hypervolume;

use std::cmp::Ordering;

use crate::core::{CoreError, Solution};

/// The density scores of a front of mutually non-dominating solutions. Scores are comparable
/// only within the pass that produced them: a larger score always marks a solution in a sparser,
/// more valuable region of objective space regardless of the estimator that computed it.
#[derive(Debug, Clone, PartialEq)]
pub struct DensityScores(Vec<f64>);

impl DensityScores {
    /// Get the scores in front order.
    ///
    /// return: `&[f64]`
    pub fn values(&self) -> &[f64] {
        &self.0
    }

    /// Get the score of a solution by its front index. This returns an error if the index does
    /// not exist.
    ///
    /// # Arguments
    ///
    /// * `solution_index`: The index of the solution in the scored front.
    ///
    /// returns: `Result<f64, CoreError>`
    pub fn value(&self, solution_index: usize) -> Result<f64, CoreError> {
        self.0
            .get(solution_index)
            .copied()
            .ok_or(CoreError::NonExistingIndex(
                "density score".to_string(),
                solution_index,
            ))
    }

    /// Get the number of scored solutions.
    ///
    /// return: `usize`
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the scored front was empty.
    ///
    /// return: `bool`
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Order two scored solutions by their value to the front. `Ordering::Greater` marks the
    /// first solution as more valuable to keep. This returns an error if either index does not
    /// exist.
    ///
    /// # Arguments
    ///
    /// * `first`: The front index of the first solution.
    /// * `second`: The front index of the second solution.
    ///
    /// returns: `Result<Ordering, CoreError>`
    pub fn compare(&self, first: usize, second: usize) -> Result<Ordering, CoreError> {
        Ok(self.value(first)?.total_cmp(&self.value(second)?))
    }

    /// Get the front index with the smallest score. Ties resolve to the smallest index so that
    /// repeated passes over equal scores stay deterministic.
    ///
    /// return: `Option<usize>`
    pub fn lowest(&self) -> Option<usize> {
        let mut lowest: Option<(usize, f64)> = None;
        for (index, score) in self.0.iter().enumerate() {
            match lowest {
                Some((_, lowest_score)) if *score >= lowest_score => {}
                _ => lowest = Some((index, *score)),
            }
        }
        lowest.map(|(index, _)| index)
    }
}

/// A trait to implement a density estimator. An estimator scores a front of mutually
/// non-dominating solutions by how isolated each solution is; a bounded archive evicts the
/// member with the smallest score when it exceeds its capacity.
///
/// All estimators share three rules: an empty front yields empty scores, a front with one or two
/// solutions gets infinite scores, and the solutions holding the smallest or largest value of
/// any objective always score infinity so that the extent of the front is never discarded. When
/// several solutions tie for an objective's extreme value only the first holder is protected;
/// the others are scored like any interior solution, so a crowd of duplicated boundary points
/// can still be pruned down to one representative.
pub trait DensityEstimator<S: Solution> {
    /// Score a front of mutually non-dominating solutions. The scores are aligned with the front
    /// indexes.
    ///
    /// # Arguments
    ///
    /// * `front`: The solutions to score.
    ///
    /// returns: `Result<DensityScores, CoreError>`
    fn compute(&mut self, front: &[S]) -> Result<DensityScores, CoreError>;

    /// The estimator name.
    ///
    /// return: `String`
    fn name(&self) -> String;
}

/// Collect the objective matrix of a front, checking that all solutions carry non-empty
/// objective vectors of the same length.
///
/// # Arguments
///
/// * `front`: The solutions to collect the objectives from.
///
/// returns: `Result<Vec<Vec<f64>>, CoreError>`
pub(crate) fn front_objectives<S: Solution>(front: &[S]) -> Result<Vec<Vec<f64>>, CoreError> {
    let Some(first) = front.first() else {
        return Ok(vec![]);
    };
    let expected = first.number_of_objectives();
    if expected == 0 {
        return Err(CoreError::EmptyObjectives);
    }
    front
        .iter()
        .map(|solution| {
            if solution.number_of_objectives() != expected {
                return Err(CoreError::DimensionMismatch(
                    solution.number_of_objectives(),
                    expected,
                ));
            }
            Ok(solution.objectives().to_vec())
        })
        .collect()
}

/// Scores for a front too small to measure density on. Fronts with up to two solutions get
/// infinite scores so that an archive never evicts from them by density alone.
///
/// # Arguments
///
/// * `front_size`: The number of solutions in the front.
///
/// returns: `Option<DensityScores>`. `None` when the front is large enough to score.
pub(crate) fn small_front_scores(front_size: usize) -> Option<DensityScores> {
    (front_size <= 2).then(|| DensityScores(vec![f64::INFINITY; front_size]))
}

/// Raise the score of the per-objective extreme solutions to infinity. For every objective the
/// first solution holding its minimum and the first holding its maximum are protected.
///
/// # Arguments
///
/// * `objectives`: The objective matrix of the front.
/// * `scores`: The scores to adjust in place.
pub(crate) fn protect_extremes(objectives: &[Vec<f64>], scores: &mut [f64]) {
    let Some(first) = objectives.first() else {
        return;
    };
    for objective_index in 0..first.len() {
        let mut min_index = 0;
        let mut max_index = 0;
        for (index, values) in objectives.iter().enumerate() {
            if values[objective_index] < objectives[min_index][objective_index] {
                min_index = index;
            }
            if values[objective_index] > objectives[max_index][objective_index] {
                max_index = index;
            }
        }
        scores[min_index] = f64::INFINITY;
        scores[max_index] = f64::INFINITY;
    }
}

/// Build the scores from raw values. This is the constructor the estimators use.
pub(crate) fn scores_from_values(values: Vec<f64>) -> DensityScores {
    DensityScores(values)
}
