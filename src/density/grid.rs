use std::collections::HashMap;

use log::debug;

use crate::core::{CoreError, Solution};
use crate::density::{
    front_objectives, protect_extremes, scores_from_values, small_front_scores, DensityEstimator,
    DensityScores,
};

/// A hyper-rectangular partition of objective space. Each objective range is split into
/// `bisections` equal divisions, giving `bisections^number_of_objectives` cells, and the grid
/// tracks how many solutions occupy each cell. Cells are addressed by a flat index; only the
/// occupied ones are stored.
#[derive(Debug, Clone)]
pub(crate) struct Grid {
    /// The number of divisions per objective.
    bisections: usize,
    /// The smallest value of each objective when the grid was built.
    lower_limits: Vec<f64>,
    /// The largest value of each objective when the grid was built.
    upper_limits: Vec<f64>,
    /// The width of one division per objective.
    division_sizes: Vec<f64>,
    /// The flat-index multiplier of each objective.
    strides: Vec<usize>,
    /// The number of solutions in each occupied cell.
    occupancy: HashMap<usize, usize>,
}

impl Grid {
    /// Build a grid spanning the extremes of an objective matrix and count the occupants of each
    /// cell.
    ///
    /// # Arguments
    ///
    /// * `objectives`: The objective matrix the grid must span.
    /// * `bisections`: The number of divisions per objective.
    ///
    /// returns: `Result<Grid, CoreError>`
    fn build(objectives: &[Vec<f64>], bisections: usize) -> Result<Self, CoreError> {
        let number_of_objectives = objectives[0].len();
        let (lower_limits, upper_limits) = objective_extremes(objectives);

        let division_sizes: Vec<f64> = lower_limits
            .iter()
            .zip(&upper_limits)
            .map(|(lower, upper)| (upper - lower) / bisections as f64)
            .collect();

        let mut strides = Vec::with_capacity(number_of_objectives);
        let mut stride: usize = 1;
        for _ in 0..number_of_objectives {
            strides.push(stride);
            stride = stride
                .checked_mul(bisections)
                .ok_or(CoreError::InvalidBisections(bisections))?;
        }

        let mut grid = Self {
            bisections,
            lower_limits,
            upper_limits,
            division_sizes,
            strides,
            occupancy: HashMap::new(),
        };
        for values in objectives {
            if let Some(cell) = grid.location(values) {
                *grid.occupancy.entry(cell).or_insert(0) += 1;
            }
        }
        Ok(grid)
    }

    /// Whether the grid still spans the extremes of an objective matrix.
    fn spans(&self, objectives: &[Vec<f64>]) -> bool {
        let (lower_limits, upper_limits) = objective_extremes(objectives);
        self.lower_limits == lower_limits && self.upper_limits == upper_limits
    }

    /// The flat cell index of a point, or `None` when the point falls outside the grid. Points
    /// on the upper boundary belong to the last division of each objective.
    ///
    /// # Arguments
    ///
    /// * `values`: The objective values of the point.
    ///
    /// returns: `Option<usize>`
    fn location(&self, values: &[f64]) -> Option<usize> {
        let mut cell = 0;
        for (objective_index, value) in values.iter().enumerate() {
            if *value < self.lower_limits[objective_index]
                || *value > self.upper_limits[objective_index]
            {
                return None;
            }
            let size = self.division_sizes[objective_index];
            // a degenerate objective range collapses to the first division
            let division = if size > 0.0 {
                (((value - self.lower_limits[objective_index]) / size) as usize)
                    .min(self.bisections - 1)
            } else {
                0
            };
            cell += division * self.strides[objective_index];
        }
        Some(cell)
    }

    /// The number of solutions in the cell of a point.
    fn occupants(&self, values: &[f64]) -> usize {
        self.location(values)
            .and_then(|cell| self.occupancy.get(&cell).copied())
            .unwrap_or(0)
    }
}

/// Collect the per-objective minima and maxima of an objective matrix.
fn objective_extremes(objectives: &[Vec<f64>]) -> (Vec<f64>, Vec<f64>) {
    let number_of_objectives = objectives[0].len();
    let mut lower_limits = vec![f64::INFINITY; number_of_objectives];
    let mut upper_limits = vec![f64::NEG_INFINITY; number_of_objectives];
    for values in objectives {
        for (objective_index, value) in values.iter().enumerate() {
            lower_limits[objective_index] = lower_limits[objective_index].min(*value);
            upper_limits[objective_index] = upper_limits[objective_index].max(*value);
        }
    }
    (lower_limits, upper_limits)
}

/// The grid density estimator. The objective space spanned by the front is partitioned into a
/// grid and a solution's score is the inverse of the number of solutions sharing its cell:
/// solutions alone in their cell score 1, solutions in crowded cells score less. The grid is
/// kept between passes and rebuilt whenever the per-objective extremes of the front change.
///
/// Based on the adaptive grid archive in:
/// > J. Knowles and D. Corne, "Properties of an adaptive archiving algorithm for storing
/// > nondominated vectors," in IEEE Transactions on Evolutionary Computation, vol. 7, no. 2,
/// > pp. 100-116, April 2003, doi: 10.1109/TEVC.2003.810755.
pub struct GridDensity {
    /// The number of divisions per objective.
    bisections: usize,
    /// The grid built on the last scored front.
    grid: Option<Grid>,
}

impl GridDensity {
    /// Create the estimator. At least two divisions per objective are required.
    ///
    /// # Arguments
    ///
    /// * `bisections`: The number of divisions per objective.
    ///
    /// returns: `Result<GridDensity, CoreError>`
    pub fn new(bisections: usize) -> Result<Self, CoreError> {
        if bisections < 2 {
            return Err(CoreError::InvalidBisections(bisections));
        }
        Ok(Self {
            bisections,
            grid: None,
        })
    }
}

impl<S: Solution> DensityEstimator<S> for GridDensity {
    fn compute(&mut self, front: &[S]) -> Result<DensityScores, CoreError> {
        let objectives = front_objectives(front)?;
        if let Some(scores) = small_front_scores(objectives.len()) {
            return Ok(scores);
        }

        let grid = match self.grid.take() {
            // same extremes, recount the occupants of the current front
            Some(mut grid) if grid.spans(&objectives) => {
                grid.occupancy.clear();
                for values in &objectives {
                    if let Some(cell) = grid.location(values) {
                        *grid.occupancy.entry(cell).or_insert(0) += 1;
                    }
                }
                grid
            }
            _ => {
                debug!("Rebuilding the grid, the front extremes changed");
                Grid::build(&objectives, self.bisections)?
            }
        };

        let mut scores: Vec<f64> = objectives
            .iter()
            .map(|values| {
                let occupants = grid.occupants(values);
                if occupants == 0 {
                    1.0
                } else {
                    1.0 / occupants as f64
                }
            })
            .collect();
        self.grid = Some(grid);

        protect_extremes(&objectives, &mut scores);
        Ok(scores_from_values(scores))
    }

    fn name(&self) -> String {
        "GridDensity".to_string()
    }
}
