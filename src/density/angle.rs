use crate::core::{CoreError, Solution};
use crate::density::{
    front_objectives, protect_extremes, scores_from_values, small_front_scores, DensityEstimator,
    DensityScores,
};

/// Norm threshold below which a translated vector is considered to sit on the reference point.
const EPSILON: f64 = 1e-10;

/// The angle-based density estimator. Solutions are translated by a reference point and a
/// solution's score is the smallest angle between its translated vector and that of any other
/// front member. A small angle means another solution points in almost the same direction of
/// objective space, so the solution adds little to the spread of the front.
///
/// When no reference point is given the ideal point of the front is used, built from the
/// per-objective minima. A solution lying on the reference point scores zero, as its direction
/// is undefined and it cannot widen the front.
pub struct AngleDensity {
    /// The point the front is translated by before measuring angles.
    reference_point: Option<Vec<f64>>,
}

impl AngleDensity {
    /// Create the estimator using the ideal point of each scored front as reference.
    ///
    /// returns: `AngleDensity`
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
    /// returns: `AngleDensity`
    pub fn with_reference_point(reference_point: Vec<f64>) -> Self {
        Self {
            reference_point: Some(reference_point),
        }
    }

    /// The angle in radians between two translated vectors. A vector with a vanishing norm has
    /// no direction and yields a zero angle.
    fn angle(first: &[f64], second: &[f64]) -> f64 {
        let dot: f64 = first.iter().zip(second).map(|(a, b)| a * b).sum();
        let norm1 = first.iter().map(|value| value * value).sum::<f64>().sqrt();
        let norm2 = second.iter().map(|value| value * value).sum::<f64>().sqrt();
        if norm1 < EPSILON || norm2 < EPSILON {
            return 0.0;
        }
        (dot / (norm1 * norm2)).clamp(-1.0, 1.0).acos()
    }
}

impl Default for AngleDensity {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: Solution> DensityEstimator<S> for AngleDensity {
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
            let mut min_angle = f64::INFINITY;
            for (other_index, other) in translated.iter().enumerate() {
                if index == other_index {
                    continue;
                }
                min_angle = min_angle.min(Self::angle(vector, other));
            }
            scores.push(min_angle);
        }

        protect_extremes(&objectives, &mut scores);
        Ok(scores_from_values(scores))
    }

    fn name(&self) -> String {
        "AngleDensity".to_string()
    }
}
