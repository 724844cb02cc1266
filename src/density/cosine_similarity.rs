use crate::core::{CoreError, Solution};
use crate::density::{
    front_objectives, protect_extremes, scores_from_values, small_front_scores, DensityEstimator,
    DensityScores,
};

/// Norm threshold below which a translated vector is considered to sit on the reference point.
const EPSILON: f64 = 1e-10;

/// The cosine similarity density estimator. Like [`crate::density::AngleDensity`] the front is
/// translated by a reference point, but a solution is scored by how dissimilar its direction is
/// from its most similar front member: the score is one minus the largest cosine similarity to
/// any other solution. Two solutions pointing the same way have similarity 1 and score 0.
///
/// When no reference point is given the ideal point of the front is used. A solution lying on
/// the reference point is treated as fully similar to every other and scores zero.
pub struct CosineSimilarityDensity {
    /// The point the front is translated by before measuring similarities.
    reference_point: Option<Vec<f64>>,
}

impl CosineSimilarityDensity {
    /// Create the estimator using the ideal point of each scored front as reference.
    ///
    /// returns: `CosineSimilarityDensity`
    pub fn new() -> Self {
        Self {
            reference_point: None,
        }
    }

    /// Create the estimator with a fixed reference point.
    ///
    /// # Arguments
    ///
    /// * `reference_point`: The point the front is translated by.
    ///
    /// returns: `CosineSimilarityDensity`
    pub fn with_reference_point(reference_point: Vec<f64>) -> Self {
        Self {
            reference_point: Some(reference_point),
        }
    }

    /// The cosine similarity between two translated vectors. A vector with a vanishing norm is
    /// fully similar to any other.
    fn similarity(first: &[f64], second: &[f64]) -> f64 {
        let dot: f64 = first.iter().zip(second).map(|(a, b)| a * b).sum();
        let norm1 = first.iter().map(|value| value * value).sum::<f64>().sqrt();
        let norm2 = second.iter().map(|value| value * value).sum::<f64>().sqrt();
        if norm1 < EPSILON || norm2 < EPSILON {
            return 1.0;
        }
        (dot / (norm1 * norm2)).clamp(-1.0, 1.0)
    }
}

impl Default for CosineSimilarityDensity {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: Solution> DensityEstimator<S> for CosineSimilarityDensity {
    fn compute(&mut self, front: &[S]) -> Result<DensityScores, CoreError> {
        let objectives = front_objectives(front)?;
        let total_solutions = objectives.len();
        if let Some(scores) = small_front_scores(total_solutions) {
            return Ok(scores);
        }

        let number_of_objectives = objectives[0].len();
        let reference_point = match &self.reference_point {
            Some(point) => {
                if point.len() != number_of_objectives {
                    return Err(CoreError::DimensionMismatch(
                        point.len(),
                        number_of_objectives,
                    ));
                }
                point.clone()
            }
            // ideal point of the front
            None => (0..number_of_objectives)
                .map(|objective_index| {
                    objectives
                        .iter()
                        .map(|values| values[objective_index])
                        .fold(f64::INFINITY, f64::min)
                })
                .collect(),
        };

        let translated: Vec<Vec<f64>> = objectives
            .iter()
            .map(|values| {
                values
                    .iter()
                    .zip(&reference_point)
                    .map(|(value, reference)| value - reference)
                    .collect()
            })
            .collect();

        let mut scores = Vec::with_capacity(total_solutions);
        for (index, vector) in translated.iter().enumerate() {
            let mut max_similarity = f64::NEG_INFINITY;
            for (other_index, other) in translated.iter().enumerate() {
                if index == other_index {
                    continue;
                }
                max_similarity = max_similarity.max(Self::similarity(vector, other));
            }
            scores.push(1.0 - max_similarity);
        }

        protect_extremes(&objectives, &mut scores);
        Ok(scores_from_values(scores))
    }

    fn name(&self) -> String {
        "CosineSimilarityDensity".to_string()
    }
}
