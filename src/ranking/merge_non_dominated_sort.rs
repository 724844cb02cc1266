use std::cmp::Ordering;

use log::debug;

use crate::comparison::{Dominance, DominanceComparator, ParetoDominance};
use crate::core::{CoreError, Solution};
use crate::ranking::{check_population, DominanceRanking, Ranking};

/// Merge-based non-dominated sorting (with amortised complexity $O(N \log N * M)$, where `M` is
/// the number of objectives and `N` the population size).
///
/// The population is first ordered with a recursive merge sort keyed by the overall constraint
/// violation and then the lexicographic objective values. Under the constrained Pareto rule a
/// solution can never dominate one that precedes it in this order, so each solution is then
/// placed with a binary search over the growing front list: it joins the first front in which no
/// member dominates it, preserving the front boundaries built so far. Front membership is
/// identical to [`crate::ranking::FastNonDominatedRanking`] for any population.
///
/// Based on the sorting schemes in:
/// > J. Moreno, G. Miranda, C. León, "Solving the Non-dominated Sorting Problem with Merge
/// > Sort", 2020; and X. Zhang, Y. Tian, R. Cheng, Y. Jin, "An Efficient Approach to
/// > Nondominated Sorting for Evolutionary Multiobjective Optimization", IEEE TEVC 19(2), 2015.
///
/// Unlike the naive algorithm this implementation is fixed to the constrained Pareto dominance
/// relation: the sort key is what makes the front search sound, and it must agree with the
/// dominance rule.
#[derive(Debug, Default)]
pub struct MergeNonDominatedRanking;

impl MergeNonDominatedRanking {
    /// Create the algorithm.
    ///
    /// returns: `MergeNonDominatedRanking`
    pub fn new() -> Self {
        Self
    }

    /// Compare two solutions by overall constraint violation and then lexicographically by
    /// objective values.
    fn compare_key<S: Solution>(population: &[S], first: usize, second: usize) -> Ordering {
        let violation = population[first]
            .constraint_violation()
            .total_cmp(&population[second].constraint_violation());
        if violation != Ordering::Equal {
            return violation;
        }
        for (value1, value2) in population[first]
            .objectives()
            .iter()
            .zip(population[second].objectives())
        {
            let objective = value1.total_cmp(value2);
            if objective != Ordering::Equal {
                return objective;
            }
        }
        Ordering::Equal
    }

    /// Whether any member of a front dominates the solution at `index`.
    fn dominated_by_front<S: Solution>(
        comparator: &ParetoDominance,
        population: &[S],
        front: &[usize],
        index: usize,
    ) -> Result<bool, CoreError> {
        for member in front {
            if comparator.compare(&population[*member], &population[index])? == Dominance::First {
                return Ok(true);
            }
        }
        Ok(false)
    }
}

impl<S: Solution> Ranking<S> for MergeNonDominatedRanking {
    fn rank(&self, population: &[S]) -> Result<DominanceRanking, CoreError> {
        check_population(population)?;
        let population_size = population.len();
        if population_size == 0 {
            return Ok(DominanceRanking::from_fronts(vec![], 0));
        }

        let mut order: Vec<usize> = (0..population_size).collect();
        merge_sort_by(&mut order, &|a, b| Self::compare_key(population, a, b));

        let comparator = ParetoDominance::new();
        let mut fronts: Vec<Vec<usize>> = Vec::new();
        for index in order {
            // binary search for the first front whose members do not dominate the solution; if a
            // member of front `k` dominates it, so does a member of every front before `k`
            let mut low = 0;
            let mut high = fronts.len();
            while low < high {
                let mid = (low + high) / 2;
                if Self::dominated_by_front(&comparator, population, &fronts[mid], index)? {
                    low = mid + 1;
                } else {
                    high = mid;
                }
            }

            if low == fronts.len() {
                fronts.push(vec![index]);
            } else {
                fronts[low].push(index);
            }
        }

        debug!(
            "Sorted {} solutions into {} fronts",
            population_size,
            fronts.len()
        );
        Ok(DominanceRanking::from_fronts(fronts, population_size))
    }
}

/// Sort an index vector with a stable, recursive merge sort.
///
/// # Arguments
///
/// * `indexes`: The indexes to sort in place.
/// * `compare`: The index comparison function.
fn merge_sort_by<F: Fn(usize, usize) -> Ordering>(indexes: &mut [usize], compare: &F) {
    let mut buffer = indexes.to_vec();
    split_and_merge(indexes, &mut buffer, compare);
}

fn split_and_merge<F: Fn(usize, usize) -> Ordering>(
    items: &mut [usize],
    buffer: &mut [usize],
    compare: &F,
) {
    let length = items.len();
    if length <= 1 {
        return;
    }
    let mid = length / 2;
    {
        let (left, right) = items.split_at_mut(mid);
        let (left_buffer, right_buffer) = buffer.split_at_mut(mid);
        split_and_merge(left, left_buffer, compare);
        split_and_merge(right, right_buffer, compare);
    }

    // merge the sorted halves into the buffer, taking the left item on ties for stability
    let mut left = 0;
    let mut right = mid;
    for slot in buffer.iter_mut().take(length) {
        if right >= length
            || (left < mid && compare(items[left], items[right]) != Ordering::Greater)
        {
            *slot = items[left];
            left += 1;
        } else {
            *slot = items[right];
            right += 1;
        }
    }
    items.copy_from_slice(&buffer[..length]);
}

#[cfg(test)]
mod test {
    use std::cmp::Ordering;

    use crate::core::test_utils::candidates_from_objectives;
    use crate::core::Candidate;
    use crate::ranking::merge_non_dominated_sort::merge_sort_by;
    use crate::ranking::{MergeNonDominatedRanking, Ranking};

    #[test]
    fn test_merge_sort_by() {
        let values: [f64; 5] = [99.0, 11.0, 456.2, 19.0, 0.5];
        let mut indexes: Vec<usize> = (0..values.len()).collect();
        merge_sort_by(&mut indexes, &|a, b| values[a].total_cmp(&values[b]));
        assert_eq!(indexes, vec![4, 1, 3, 0, 2]);

        // stability on equal keys
        let keys = [1, 0, 1, 0];
        let mut indexes: Vec<usize> = (0..keys.len()).collect();
        merge_sort_by(&mut indexes, &|a, b| {
            if keys[a] < keys[b] {
                Ordering::Less
            } else if keys[a] > keys[b] {
                Ordering::Greater
            } else {
                Ordering::Equal
            }
        });
        assert_eq!(indexes, vec![1, 3, 0, 2]);
    }

    #[test]
    /// Test the sorting against the fronts calculated by plotting the objective values.
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
        let ranking = MergeNonDominatedRanking::new().rank(&population).unwrap();

        assert_eq!(ranking.number_of_fronts(), 3);
        let mut first = ranking.front(0).unwrap().to_vec();
        first.sort_unstable();
        assert_eq!(first, vec![0, 1, 2, 4, 7, 9]);
        let mut second = ranking.front(1).unwrap().to_vec();
        second.sort_unstable();
        assert_eq!(second, vec![3, 5, 10]);
        let mut third = ranking.front(2).unwrap().to_vec();
        third.sort_unstable();
        assert_eq!(third, vec![6, 8]);
    }

    #[test]
    /// Duplicated objective vectors never dominate each other and share a front.
    fn test_duplicated_vectors() {
        let objectives = vec![
            vec![1.0, 1.0],
            vec![2.0, 2.0],
            vec![1.0, 1.0],
            vec![1.0, 1.0],
        ];
        let population = candidates_from_objectives(&objectives);
        let ranking = MergeNonDominatedRanking::new().rank(&population).unwrap();

        assert_eq!(ranking.number_of_fronts(), 2);
        let mut first = ranking.front(0).unwrap().to_vec();
        first.sort_unstable();
        assert_eq!(first, vec![0, 2, 3]);
        assert_eq!(ranking.front(1).unwrap(), &[1]);
    }

    #[test]
    /// The violation-first sort key keeps the constrained dominance rule sound.
    fn test_sorting_with_constraints() {
        let population = vec![
            Candidate::with_constraints(vec![5.0, 5.0], vec![0.0]).unwrap(),
            Candidate::with_constraints(vec![1.0, 1.0], vec![-2.0]).unwrap(),
            Candidate::with_constraints(vec![2.0, 2.0], vec![-1.0]).unwrap(),
        ];
        let ranking = MergeNonDominatedRanking::new().rank(&population).unwrap();

        assert_eq!(ranking.front(0).unwrap(), &[0]);
        assert_eq!(ranking.front(1).unwrap(), &[2]);
        assert_eq!(ranking.front(2).unwrap(), &[1]);
    }
}
