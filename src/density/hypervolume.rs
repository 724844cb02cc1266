use crate::core::{CoreError, Solution};
use crate::density::{
    front_objectives, protect_extremes, scores_from_values, small_front_scores, DensityEstimator,
    DensityScores,
};

/// The exact hypervolume of a set of points against a reference point, with all objectives
/// minimised. The reference point must be at least as bad as every point in every objective;
/// points outside the reference box contribute no volume. Dominated points are allowed and do
/// not change the result.
///
/// Two objectives use a linear sweep over the points sorted by the first objective. Three or
/// more objectives use the exclusive volume recursion in:
/// > L. While, L. Bradstreet and L. Barone, "A Fast Way of Calculating Exact Hypervolumes," in
/// > IEEE Transactions on Evolutionary Computation, vol. 16, no. 1, pp. 86-95, Feb. 2012, doi:
/// > 10.1109/TEVC.2010.2077298.
///
/// # Arguments
///
/// * `points`: The objective vectors to measure.
/// * `reference_point`: The point bounding the dominated region.
///
/// returns: `Result<f64, CoreError>`
pub fn hypervolume(points: &[Vec<f64>], reference_point: &[f64]) -> Result<f64, CoreError> {
    if reference_point.is_empty() {
        return Err(CoreError::EmptyObjectives);
    }
    for point in points {
        if point.len() != reference_point.len() {
            return Err(CoreError::DimensionMismatch(
                point.len(),
                reference_point.len(),
            ));
        }
    }
    if points.is_empty() {
        return Ok(0.0);
    }
    if reference_point.len() == 2 {
        return Ok(hypervolume_2d(points, reference_point));
    }
    Ok(exclusive_volume_sum(points, reference_point))
}

/// Sweep the points sorted by the first objective, accumulating the rectangle each point adds
/// below the best second objective seen so far.
fn hypervolume_2d(points: &[Vec<f64>], reference_point: &[f64]) -> f64 {
    let mut sorted: Vec<&Vec<f64>> = points.iter().collect();
    sorted.sort_by(|a, b| a[0].total_cmp(&b[0]).then(a[1].total_cmp(&b[1])));

    let mut volume = 0.0;
    let mut best_y = reference_point[1];
    for point in sorted {
        let width = reference_point[0] - point[0];
        let height = best_y - point[1];
        if width > 0.0 && height > 0.0 {
            volume += width * height;
            best_y = point[1];
        }
    }
    volume
}

/// Sum the volume each point exclusively dominates with respect to the points after it.
fn exclusive_volume_sum(points: &[Vec<f64>], reference_point: &[f64]) -> f64 {
    let mut volume = 0.0;
    for (index, point) in points.iter().enumerate() {
        volume += exclusive_volume(point, &points[index + 1..], reference_point);
    }
    volume
}

/// The volume dominated by `point` and by no point in `others`. This is the inclusive volume of
/// the point minus the volume of `others` limited to the point's dominated region.
fn exclusive_volume(point: &[f64], others: &[Vec<f64>], reference_point: &[f64]) -> f64 {
    let inclusive: f64 = point
        .iter()
        .zip(reference_point)
        .map(|(value, reference)| (reference - value).max(0.0))
        .product();
    if others.is_empty() {
        return inclusive;
    }

    // clip every other point to the region dominated by `point`
    let limited: Vec<Vec<f64>> = others
        .iter()
        .map(|other| {
            other
                .iter()
                .zip(point)
                .map(|(a, b)| a.max(*b))
                .collect()
        })
        .collect();
    inclusive - exclusive_volume_sum(&limited, reference_point)
}

/// The hypervolume contribution density estimator. A solution's score is the volume of objective
/// space that would stop being dominated if the solution were removed from the front, measured
/// against a fixed reference point. The reference point must be strictly worse than every scored
/// solution in every objective.
pub struct HypervolumeContribution {
    /// The point bounding the dominated region.
    reference_point: Vec<f64>,
}

impl HypervolumeContribution {
    /// Create the estimator.
    ///
    /// # Arguments
    ///
    /// * `reference_point`: The point bounding the dominated region.
    ///
    /// returns: `HypervolumeContribution`
    pub fn new(reference_point: Vec<f64>) -> Self {
        Self { reference_point }
    }

    /// Check that the reference point is strictly worse than every front member.
    fn check_reference_point(&self, objectives: &[Vec<f64>]) -> Result<(), CoreError> {
        for values in objectives {
            if values.len() != self.reference_point.len() {
                return Err(CoreError::DimensionMismatch(
                    values.len(),
                    self.reference_point.len(),
                ));
            }
            for (objective_index, (value, reference)) in
                values.iter().zip(&self.reference_point).enumerate()
            {
                if value >= reference {
                    return Err(CoreError::Metric(
                        "Hypervolume".to_string(),
                        format!(
                            "The coordinate #{} of the reference point ({}) must be strictly larger than all values of the objective, but {} was found",
                            objective_index + 1,
                            reference,
                            value
                        ),
                    ));
                }
            }
        }
        Ok(())
    }
}

impl<S: Solution> DensityEstimator<S> for HypervolumeContribution {
    fn compute(&mut self, front: &[S]) -> Result<DensityScores, CoreError> {
        let objectives = front_objectives(front)?;
        self.check_reference_point(&objectives)?;
        if let Some(scores) = small_front_scores(objectives.len()) {
            return Ok(scores);
        }

        let total_volume = hypervolume(&objectives, &self.reference_point)?;
        let mut scores = Vec::with_capacity(objectives.len());
        for index in 0..objectives.len() {
            let mut remaining = objectives.clone();
            remaining.remove(index);
            scores.push(total_volume - hypervolume(&remaining, &self.reference_point)?);
        }

        protect_extremes(&objectives, &mut scores);
        Ok(scores_from_values(scores))
    }

    fn name(&self) -> String {
        "HypervolumeContribution".to_string()
    }
}

#[cfg(test)]
mod test {
    use float_cmp::assert_approx_eq;

    use crate::core::test_utils::{assert_approx_array_eq, candidates_from_objectives};
    use crate::density::hypervolume::hypervolume;
    use crate::density::{DensityEstimator, HypervolumeContribution};

    #[test]
    /// All non-dominated solutions with both objectives being minimised.
    fn test_hypervolume_2d() {
        let points = vec![vec![1.0, 2.0], vec![0.5, 4.0], vec![0.0, 6.0]];
        let volume = hypervolume(&points, &[10.0, 10.0]).unwrap();
        assert_eq!(volume, 77.0);
    }

    #[test]
    /// Dominated points and points outside the reference box add no volume.
    fn test_hypervolume_2d_dominated_points() {
        let points = vec![vec![1.0, 2.0], vec![2.0, 3.0]];
        let volume = hypervolume(&points, &[10.0, 10.0]).unwrap();
        assert_eq!(volume, 72.0);

        let points = vec![vec![1.0, 2.0], vec![11.0, 1.0]];
        let volume = hypervolume(&points, &[10.0, 10.0]).unwrap();
        assert_eq!(volume, 72.0);
    }

    #[test]
    /// The exclusive volume recursion on three objectives.
    fn test_hypervolume_3d() {
        let points = vec![vec![1.0, 1.0, 3.0], vec![3.0, 3.0, 1.0]];
        let volume = hypervolume(&points, &[4.0, 4.0, 4.0]).unwrap();
        // 3*3*1 + 1*1*3 minus the 1*1*1 overlap from (3, 3, 3)
        assert_approx_eq!(f64, volume, 11.0, epsilon = 1e-9);
    }

    #[test]
    fn test_hypervolume_empty_set() {
        assert_eq!(hypervolume(&[], &[10.0, 10.0]).unwrap(), 0.0);
        assert!(hypervolume(&[vec![1.0]], &[10.0, 10.0]).is_err());
    }

    #[test]
    /// The contribution of an inner solution is the volume only it dominates.
    fn test_contribution() {
        let front = candidates_from_objectives(&[
            vec![1.0, 2.0],
            vec![0.5, 4.0],
            vec![0.0, 6.0],
        ]);
        let scores = HypervolumeContribution::new(vec![10.0, 10.0])
            .compute(&front)
            .unwrap();

        assert_approx_array_eq(scores.values(), &[f64::INFINITY, 1.0, f64::INFINITY]);
    }

    #[test]
    /// A reference point not strictly worse than every member is rejected.
    fn test_invalid_reference_point() {
        let front = candidates_from_objectives(&[
            vec![1.0, 2.0],
            vec![0.5, 4.0],
            vec![0.0, 6.0],
        ]);
        let mut estimator = HypervolumeContribution::new(vec![10.0, 6.0]);
        assert!(estimator.compute(&front).is_err());

        let mut estimator = HypervolumeContribution::new(vec![10.0]);
        assert!(estimator.compute(&front).is_err());
    }

    #[test]
    /// Fronts with up to two solutions are infinitely sparse.
    fn test_small_front() {
        let front = candidates_from_objectives(&[vec![1.0, 2.0], vec![0.0, 6.0]]);
        let scores = HypervolumeContribution::new(vec![10.0, 10.0])
            .compute(&front)
            .unwrap();
        assert_eq!(scores.values(), &[f64::INFINITY, f64::INFINITY]);
    }
}
