use log::debug;
use ordered_float::OrderedFloat;
use serde::Serialize;

use crate::comparison::{Dominance, DominanceComparator, ParetoDominance};
use crate::core::{CoreError, Solution};
use crate::density::{
    AngleDensity, CosineSimilarityDensity, CrowdingDistance, DensityEstimator, GridDensity,
    HypervolumeContribution,
};

/// How the archive decides that a candidate duplicates a current member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EqualityPolicy {
    /// Candidates with the same objective values as a member are rejected.
    #[default]
    ObjectiveValues,
    /// Duplicated objective values may coexist in the archive.
    AllowDuplicates,
}

/// A capacity-bounded archive of mutually non-dominating solutions. The archive keeps the best
/// trade-off surface seen so far: a candidate dominated by a member is rejected, a candidate
/// dominating members replaces them, and when the archive exceeds its capacity the member with
/// the lowest density score is pruned. Equal scores are resolved by evicting the member inserted
/// first, so a sequence of additions always produces the same archive.
///
/// The archive stores copies of the added solutions and is mutated only through [`Self::add`]
/// and [`Self::remove`]. It is a single-writer structure with no internal locking; callers
/// running evaluations in parallel must serialise their `add` calls.
pub struct BoundedArchive<S: Solution> {
    /// The maximum number of stored solutions.
    maximum_size: usize,
    /// How duplicated candidates are handled.
    equality_policy: EqualityPolicy,
    /// The dominance relation used to compare candidates with members.
    comparator: Box<dyn DominanceComparator<S>>,
    /// The density estimator scoring members when the archive must be pruned.
    estimator: Box<dyn DensityEstimator<S>>,
    /// The current members.
    solutions: Vec<S>,
    /// The insertion order of each member, aligned with `solutions`.
    insertion_indexes: Vec<u64>,
    /// The next insertion order value.
    insertion_counter: u64,
}

impl<S: Solution> BoundedArchive<S> {
    /// Create an archive with a custom dominance relation and density estimator.
    ///
    /// # Arguments
    ///
    /// * `maximum_size`: The maximum number of stored solutions. This must be at least 1.
    /// * `comparator`: The dominance relation used to compare candidates with members.
    /// * `estimator`: The density estimator scoring members when the archive must be pruned.
    ///
    /// returns: `Result<BoundedArchive<S>, CoreError>`
    pub fn new(
        maximum_size: usize,
        comparator: Box<dyn DominanceComparator<S>>,
        estimator: Box<dyn DensityEstimator<S>>,
    ) -> Result<Self, CoreError> {
        if maximum_size == 0 {
            return Err(CoreError::InvalidCapacity);
        }
        Ok(Self {
            maximum_size,
            equality_policy: EqualityPolicy::default(),
            comparator,
            estimator,
            solutions: Vec::new(),
            insertion_indexes: Vec::new(),
            insertion_counter: 0,
        })
    }

    /// Create an archive pruned by crowding distance.
    ///
    /// # Arguments
    ///
    /// * `maximum_size`: The maximum number of stored solutions.
    ///
    /// returns: `Result<BoundedArchive<S>, CoreError>`
    pub fn crowding_distance(maximum_size: usize) -> Result<Self, CoreError> {
        Self::new(
            maximum_size,
            Box::new(ParetoDominance::new()),
            Box::new(CrowdingDistance::new()),
        )
    }

    /// Create an archive pruned by hypervolume contribution.
    ///
    /// # Arguments
    ///
    /// * `maximum_size`: The maximum number of stored solutions.
    /// * `reference_point`: The point bounding the dominated region. This must be strictly worse
    ///   than every solution added to the archive in every objective.
    ///
    /// returns: `Result<BoundedArchive<S>, CoreError>`
    pub fn hypervolume(maximum_size: usize, reference_point: Vec<f64>) -> Result<Self, CoreError> {
        Self::new(
            maximum_size,
            Box::new(ParetoDominance::new()),
            Box::new(HypervolumeContribution::new(reference_point)),
        )
    }

    /// Create an archive pruned by grid cell occupancy.
    ///
    /// # Arguments
    ///
    /// * `maximum_size`: The maximum number of stored solutions.
    /// * `bisections`: The number of grid divisions per objective. This must be at least 2.
    ///
    /// returns: `Result<BoundedArchive<S>, CoreError>`
    pub fn adaptive_grid(maximum_size: usize, bisections: usize) -> Result<Self, CoreError> {
        Self::new(
            maximum_size,
            Box::new(ParetoDominance::new()),
            Box::new(GridDensity::new(bisections)?),
        )
    }

    /// Create an archive pruned by the angle to the closest member direction.
    ///
    /// # Arguments
    ///
    /// * `maximum_size`: The maximum number of stored solutions.
    ///
    /// returns: `Result<BoundedArchive<S>, CoreError>`
    pub fn angle(maximum_size: usize) -> Result<Self, CoreError> {
        Self::new(
            maximum_size,
            Box::new(ParetoDominance::new()),
            Box::new(AngleDensity::new()),
        )
    }

    /// Create an archive pruned by cosine similarity to the closest member direction.
    ///
    /// # Arguments
    ///
    /// * `maximum_size`: The maximum number of stored solutions.
    ///
    /// returns: `Result<BoundedArchive<S>, CoreError>`
    pub fn cosine_similarity(maximum_size: usize) -> Result<Self, CoreError> {
        Self::new(
            maximum_size,
            Box::new(ParetoDominance::new()),
            Box::new(CosineSimilarityDensity::new()),
        )
    }

    /// Change how duplicated candidates are handled.
    ///
    /// # Arguments
    ///
    /// * `equality_policy`: The policy to apply to future additions.
    pub fn set_equality_policy(&mut self, equality_policy: EqualityPolicy) {
        self.equality_policy = equality_policy;
    }

    /// Offer a solution to the archive. A copy of the solution is stored when it is accepted.
    /// This returns `true` when the membership changed: the candidate was dominated by no member
    /// and was not a duplicate. Pruning a different member afterwards does not change the
    /// outcome.
    ///
    /// The operation is atomic. When the density estimator fails during pruning the archive is
    /// restored to its previous state and the error is returned.
    ///
    /// # Arguments
    ///
    /// * `solution`: The candidate solution.
    ///
    /// returns: `Result<bool, CoreError>`
    pub fn add(&mut self, solution: &S) -> Result<bool, CoreError> {
        // classify all members before touching the archive
        let mut dominated_members: Vec<usize> = Vec::new();
        for (index, member) in self.solutions.iter().enumerate() {
            match self.comparator.compare(member, solution)? {
                Dominance::First => {
                    debug!("Rejecting the candidate, it is dominated by a member");
                    return Ok(false);
                }
                Dominance::Second => dominated_members.push(index),
                Dominance::Neither => {}
            }
        }

        // the duplicate check must skip the members the candidate dominates: with constraints
        // a candidate can dominate a member carrying its same objective values
        if self.equality_policy == EqualityPolicy::ObjectiveValues
            && self.solutions.iter().enumerate().any(|(index, member)| {
                !dominated_members.contains(&index)
                    && member.objectives() == solution.objectives()
            })
        {
            debug!("Rejecting the candidate, it duplicates a member");
            return Ok(false);
        }

        let previous_solutions = self.solutions.clone();
        let previous_indexes = self.insertion_indexes.clone();
        let previous_counter = self.insertion_counter;

        for index in dominated_members.iter().rev() {
            self.solutions.remove(*index);
            self.insertion_indexes.remove(*index);
        }
        self.solutions.push(solution.clone());
        self.insertion_indexes.push(self.insertion_counter);
        self.insertion_counter += 1;

        while self.solutions.len() > self.maximum_size {
            if let Err(error) = self.prune() {
                self.solutions = previous_solutions;
                self.insertion_indexes = previous_indexes;
                self.insertion_counter = previous_counter;
                return Err(error);
            }
        }
        Ok(true)
    }

    /// Remove one member with the lowest density score. This is a no-op when the archive is not
    /// over capacity. Members with an equal score are resolved by evicting the one inserted
    /// first; a member with an infinite score is never evicted before a finite-scored one.
    ///
    /// returns: `Result<(), CoreError>`
    pub fn prune(&mut self) -> Result<(), CoreError> {
        if self.solutions.len() <= self.maximum_size {
            return Ok(());
        }

        let scores = self.estimator.compute(&self.solutions)?;
        let evicted = (0..self.solutions.len())
            .min_by_key(|index| {
                (
                    OrderedFloat(scores.values()[*index]),
                    self.insertion_indexes[*index],
                )
            })
            .ok_or(CoreError::Archive(
                "Cannot prune an empty archive".to_string(),
            ))?;

        debug!(
            "Evicting the member at index {} with density score {}",
            evicted,
            scores.value(evicted)?
        );
        self.solutions.remove(evicted);
        self.insertion_indexes.remove(evicted);
        Ok(())
    }

    /// Remove the first member with the same objective values as a solution.
    ///
    /// # Arguments
    ///
    /// * `solution`: The solution to remove.
    ///
    /// returns: `bool`. Whether a member was removed.
    pub fn remove(&mut self, solution: &S) -> bool {
        let found = self
            .solutions
            .iter()
            .position(|member| member.objectives() == solution.objectives());
        match found {
            Some(index) => {
                self.solutions.remove(index);
                self.insertion_indexes.remove(index);
                true
            }
            None => false,
        }
    }

    /// Get the current members. The order is stable between calls without intervening mutation.
    ///
    /// return: `&[S]`
    pub fn solutions(&self) -> &[S] {
        &self.solutions
    }

    /// Get the number of stored solutions.
    ///
    /// return: `usize`
    pub fn size(&self) -> usize {
        self.solutions.len()
    }

    /// Get the maximum number of stored solutions.
    ///
    /// return: `usize`
    pub fn maximum_size(&self) -> usize {
        self.maximum_size
    }

    /// Whether the archive has no members.
    ///
    /// return: `bool`
    pub fn is_empty(&self) -> bool {
        self.solutions.is_empty()
    }
}

impl<S: Solution + Serialize> BoundedArchive<S> {
    /// Export the current members as a JSON value.
    ///
    /// returns: `Result<serde_json::Value, CoreError>`
    pub fn to_json(&self) -> Result<serde_json::Value, CoreError> {
        serde_json::to_value(&self.solutions)
            .map_err(|error| CoreError::Archive(error.to_string()))
    }
}
