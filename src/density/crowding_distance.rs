use log::debug;

use crate::core::{CoreError, Solution};
use crate::density::{
    front_objectives, protect_extremes, scores_from_values, small_front_scores, DensityEstimator,
    DensityScores,
};

/// The crowding distance density estimator from the NSGA2 paper. A solution's score is the sum,
/// over all objectives, of the normalised distance between its two neighbours in the front
/// sorted by that objective. Boundary solutions get an infinite score.
///
/// Implemented based on paragraph 3B in:
/// > K. Deb, A. Pratap, S. Agarwal and T. Meyarivan, "A fast and elitist multi-objective genetic
/// > algorithm: NSGA-II," in IEEE Transactions on Evolutionary Computation, vol. 6, no. 2, pp.
/// > 182-197, April 2002, doi: 10.1109/4235.996017.
#[derive(Debug, Default)]
pub struct CrowdingDistance;

impl CrowdingDistance {
    /// Create the estimator.
    ///
    /// returns: `CrowdingDistance`
    pub fn new() -> Self {
        Self
    }
}

impl<S: Solution> DensityEstimator<S> for CrowdingDistance {
    fn compute(&mut self, front: &[S]) -> Result<DensityScores, CoreError> {
        let objectives = front_objectives(front)?;
        let total_solutions = objectives.len();

        // if there are not enough points set the distance to + infinite
        if let Some(scores) = small_front_scores(total_solutions) {
            debug!("Setting the crowding distance to Inf for all solutions. At least 3 solutions are needed");
            return Ok(scores);
        }

        let mut distances = vec![0.0; total_solutions];
        let number_of_objectives = objectives[0].len();
        for objective_index in 0..number_of_objectives {
            let mut objective_values: Vec<f64> = objectives
                .iter()
                .map(|values| values[objective_index])
                .collect();

            // sort the objective and get the indexes to map solutions to sorted values
            let sorted_idx = sorted_front_indexes(&objective_values);
            objective_values.sort_by(|a, b| a.total_cmp(b));
            let delta_range = objective_values[total_solutions - 1] - objective_values[0];

            // set all to infinite if the range is too small
            if delta_range.abs() < f64::EPSILON {
                debug!("Setting the crowding distance to Inf for all solutions. The min/max range is too small");
                return Ok(scores_from_values(vec![f64::INFINITY; total_solutions]));
            }

            // assign an infinite distance to the boundary points
            distances[sorted_idx[0]] = f64::INFINITY;
            distances[sorted_idx[total_solutions - 1]] = f64::INFINITY;

            for obj_i in 1..(total_solutions - 1) {
                let delta = (objective_values[obj_i + 1] - objective_values[obj_i - 1]) / delta_range;
                if delta.is_nan() {
                    return Err(CoreError::NaN(format!(
                        "The calculated crowding distance increment was NaN likely due to wrong objective values. Numerator: {}, denominator: {}",
                        objective_values[obj_i + 1] - objective_values[obj_i - 1],
                        delta_range
                    )));
                }
                distances[sorted_idx[obj_i]] += delta;
            }
        }

        protect_extremes(&objectives, &mut distances);
        Ok(scores_from_values(distances))
    }

    fn name(&self) -> String {
        "CrowdingDistance".to_string()
    }
}

/// The front indexes ordered by one objective, smallest value first.
fn sorted_front_indexes(objective_values: &[f64]) -> Vec<usize> {
    let mut indexes: Vec<usize> = (0..objective_values.len()).collect();
    indexes.sort_by(|a, b| objective_values[*a].total_cmp(&objective_values[*b]));
    indexes
}

#[cfg(test)]
mod test {
    use crate::core::test_utils::{assert_approx_array_eq, candidates_from_objectives};
    use crate::density::{CrowdingDistance, DensityEstimator};

    #[test]
    fn test_sorted_front_indexes() {
        use crate::density::crowding_distance::sorted_front_indexes;

        let values = [99.0, 11.0, 456.2, 19.0, 0.5];
        assert_eq!(sorted_front_indexes(&values), vec![4, 1, 3, 0, 2]);
    }

    #[test]
    /// An empty front yields empty scores; up to two solutions get infinite scores.
    fn test_crowding_distance_small_fronts() {
        let mut estimator = CrowdingDistance::new();

        let scores = estimator.compute(&candidates_from_objectives(&[])).unwrap();
        assert!(scores.is_empty());

        let front = candidates_from_objectives(&[vec![0.0, 0.0], vec![50.0, 50.0]]);
        let scores = estimator.compute(&front).unwrap();
        assert_eq!(scores.values(), &[f64::INFINITY, f64::INFINITY]);
    }

    #[test]
    /// Test the crowding distance algorithm (3 points).
    fn test_crowding_distance_3_points() {
        let scenarios = vec![
            vec![vec![0.0, 0.0], vec![-100.0, 100.0], vec![200.0, -200.0]],
            vec![vec![25.0, 25.0], vec![-100.0, 100.0], vec![200.0, -200.0]],
        ];
        let mut estimator = CrowdingDistance::new();
        for objectives in scenarios {
            let front = candidates_from_objectives(&objectives);
            let scores = estimator.compute(&front).unwrap();

            assert_approx_array_eq(
                scores.values(),
                &[2.0, f64::INFINITY, f64::INFINITY],
            );
        }
    }

    #[test]
    /// Test the crowding distance algorithm (3 objectives).
    fn test_crowding_distance_3_obj() {
        let objectives = vec![
            vec![0.0, 0.0, 0.0],
            vec![-1.0, 1.0, 2.0],
            vec![2.0, -2.0, -2.0],
        ];
        let front = candidates_from_objectives(&objectives);
        let scores = CrowdingDistance::new().compute(&front).unwrap();

        assert_approx_array_eq(scores.values(), &[3.0, f64::INFINITY, f64::INFINITY]);
    }

    #[test]
    /// Test the crowding distance algorithm (4 points).
    fn test_crowding_distance_4points() {
        let objectives = vec![
            vec![0.0, 0.0],
            vec![100.0, -100.0],
            vec![200.0, -200.0],
            vec![400.0, -400.0],
        ];
        let front = candidates_from_objectives(&objectives);
        let scores = CrowdingDistance::new().compute(&front).unwrap();

        assert_approx_array_eq(
            scores.values(),
            &[f64::INFINITY, 1.0, 1.5, f64::INFINITY],
        );
    }

    #[test]
    /// Test the crowding distance algorithm (6 points).
    fn test_crowding_distance_6points() {
        let objectives = vec![
            vec![1.1, 8.1],
            vec![2.1, 6.1],
            vec![3.1, 4.1],
            vec![5.1, 3.1],
            vec![8.1, 2.1],
            vec![11.1, 1.1],
        ];
        let front = candidates_from_objectives(&objectives);
        let scores = CrowdingDistance::new().compute(&front).unwrap();

        let expected = [
            f64::INFINITY,
            0.7714285714285714,
            0.728571429,
            0.785714286,
            0.885714286,
            f64::INFINITY,
        ];
        assert_approx_array_eq(scores.values(), &expected);
    }

    #[test]
    /// A degenerate objective range marks the whole front as infinitely sparse.
    fn test_crowding_distance_degenerate_range() {
        let objectives = vec![
            vec![1.0, 5.0],
            vec![1.0, 3.0],
            vec![1.0, 1.0],
        ];
        let front = candidates_from_objectives(&objectives);
        let scores = CrowdingDistance::new().compute(&front).unwrap();
        assert!(scores.values().iter().all(|score| score.is_infinite()));
    }
}
