//! # Collocation set algebra
//!
//! Lists of [`Collocation`]s keyed by occultation identifier, as produced by a matching pass
//! (rotation or brute force), and the operations used to score one pass against the other.
//!
//! Operations
//! -----------------
//! * [`CollocationList::union`], [`CollocationList::intersection`] – sorted by `occid`; on a
//!   shared identifier the candidate of `self` is kept. Identifiers must be unique within
//!   each list.
//! * [`collocation_confusion`] – [`ConfusionMatrix`] of a rotation run against a brute-force
//!   run, the brute-force run being the ground truth.
//! * [`CollocationList::sort`] – stable ordering by [`SortMethod`].
//! * [`CollocationList::refine_all`] – parallel refinement on the rayon thread pool.
//!
//! Identities
//! -----------------
//! * `|A ∪ B| = |A| + |B| − |A ∩ B|`
//! * `TP + FN = |brute force|`, `TP + FP = |rotation|`, `TP + FN + FP + TN = N`

use std::cmp::Ordering;
use std::collections::BTreeMap;

use hifitime::Epoch;
use rayon::prelude::*;
use serde::Serialize;

use crate::collocation::{Collocation, RefineParams};
use crate::collocation_errors::CollocationError;
use crate::occultation::OccList;

/// Ordering key of [`CollocationList::sort`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortMethod {
    /// Occultation identifier
    OccId,
    /// Reference time of the occultation
    OccTime,
    /// Time of the collocated nadir-scanner sounding
    SounderTime,
}

#[derive(Debug, Clone, Default)]
pub struct CollocationList(Vec<Collocation>);

impl CollocationList {
    pub fn new(collocations: Vec<Collocation>) -> Self {
        CollocationList(collocations)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, i: usize) -> Option<&Collocation> {
        self.0.get(i)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Collocation> {
        self.0.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Collocation> {
        self.0.iter_mut()
    }

    pub fn push(&mut self, collocation: Collocation) {
        self.0.push(collocation)
    }

    pub fn into_inner(self) -> Vec<Collocation> {
        self.0
    }

    pub fn occids(&self) -> Vec<&str> {
        self.0.iter().map(Collocation::occid).collect()
    }

    fn require_non_empty(&self, other: &Self, operation: &str) -> Result<(), CollocationError> {
        if self.is_empty() || other.is_empty() {
            return Err(CollocationError::InvalidArgument(format!(
                "{operation} requires two non-empty collocation lists, got {} and {}",
                self.len(),
                other.len()
            )));
        }
        Ok(())
    }

    fn by_occid(&self) -> Result<BTreeMap<&str, &Collocation>, CollocationError> {
        let mut map = BTreeMap::new();
        for c in &self.0 {
            if map.insert(c.occid(), c).is_some() {
                return Err(CollocationError::InvalidArgument(format!(
                    "occultation {} appears more than once in a collocation list",
                    c.occid()
                )));
            }
        }
        Ok(map)
    }

    /// Candidates present in `self` or `other`, sorted by occultation identifier.
    ///
    /// When an identifier appears in both lists the candidate of `self` is kept.
    ///
    /// Errors
    /// ----------
    /// * [`CollocationError::InvalidArgument`] if either list is empty or repeats an
    ///   occultation identifier.
    pub fn union(&self, other: &Self) -> Result<Self, CollocationError> {
        self.require_non_empty(other, "union")?;
        let mut merged = self.by_occid()?;
        for (occid, c) in other.by_occid()? {
            merged.entry(occid).or_insert(c);
        }
        Ok(CollocationList(merged.into_values().cloned().collect()))
    }

    /// Candidates of `self` whose identifier also appears in `other`, sorted by identifier.
    ///
    /// Errors
    /// ----------
    /// * [`CollocationError::InvalidArgument`] if either list is empty or repeats an
    ///   occultation identifier.
    pub fn intersection(&self, other: &Self) -> Result<Self, CollocationError> {
        self.require_non_empty(other, "intersection")?;
        let theirs = other.by_occid()?;
        Ok(CollocationList(
            self.by_occid()?
                .into_iter()
                .filter(|(occid, _)| theirs.contains_key(occid))
                .map(|(_, c)| c.clone())
                .collect(),
        ))
    }

    /// Stable sort of the list in place.
    ///
    /// Errors
    /// ----------
    /// * [`CollocationError::MissingData`] if a candidate lacks the sounder time required by
    ///   [`SortMethod::SounderTime`]; the list is left unchanged.
    /// * [`CollocationError::InvalidArgument`] on a malformed occultation datetime.
    pub fn sort(&mut self, method: SortMethod) -> Result<(), CollocationError> {
        match method {
            SortMethod::OccId => {
                self.0.sort_by(|a, b| a.occid().cmp(b.occid()));
                Ok(())
            }
            SortMethod::OccTime => {
                let keys = self
                    .0
                    .iter()
                    .map(|c| c.occultation_record().time())
                    .collect::<Result<Vec<_>, _>>()?;
                self.sort_by_epochs(keys);
                Ok(())
            }
            SortMethod::SounderTime => {
                let keys = self
                    .0
                    .iter()
                    .map(|c| {
                        c.time().ok_or_else(|| {
                            CollocationError::MissingData(format!(
                                "collocation {} has no sounder time to sort by",
                                c.name()
                            ))
                        })
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                self.sort_by_epochs(keys);
                Ok(())
            }
        }
    }

    fn sort_by_epochs(&mut self, keys: Vec<Epoch>) {
        let mut keyed: Vec<(Epoch, Collocation)> =
            keys.into_iter().zip(self.0.drain(..)).collect();
        keyed.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(Ordering::Equal));
        self.0 = keyed.into_iter().map(|(_, c)| c).collect();
    }

    /// Refine every candidate on the rayon thread pool.
    ///
    /// Candidates share no mutable state; each result slot matches the candidate at the same
    /// position. A failed refinement leaves its candidate unchanged.
    pub fn refine_all(&mut self, params: &RefineParams) -> Vec<Result<(), CollocationError>> {
        self.0
            .par_iter_mut()
            .map(|c| c.refine_with(params).map(|_| ()))
            .collect()
    }
}

impl From<Vec<Collocation>> for CollocationList {
    fn from(collocations: Vec<Collocation>) -> Self {
        CollocationList(collocations)
    }
}

impl FromIterator<Collocation> for CollocationList {
    fn from_iter<I: IntoIterator<Item = Collocation>>(iter: I) -> Self {
        CollocationList(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a CollocationList {
    type Item = &'a Collocation;
    type IntoIter = std::slice::Iter<'a, Collocation>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl IntoIterator for CollocationList {
    type Item = Collocation;
    type IntoIter = std::vec::IntoIter<Collocation>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// Confusion matrix of an approximate collocation run against brute-force ground truth.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ConfusionMatrix {
    pub true_positive: usize,
    pub false_negative: usize,
    pub false_positive: usize,
    pub true_negative: usize,
}

impl ConfusionMatrix {
    /// Build the matrix from set sizes.
    ///
    /// Arguments
    /// -----------------
    /// * `n`: number of candidate-eligible occultations.
    /// * `brute_force`: size of the ground-truth list.
    /// * `rotation`: size of the approximate list.
    /// * `intersection`: size of their intersection.
    ///
    /// Errors
    /// ----------
    /// * [`CollocationError::InvalidArgument`] if the counts cannot come from sets, i.e.
    ///   `intersection > min(brute_force, rotation)` or `brute_force + rotation − intersection > n`.
    pub fn from_counts(
        n: usize,
        brute_force: usize,
        rotation: usize,
        intersection: usize,
    ) -> Result<Self, CollocationError> {
        if intersection > brute_force.min(rotation) {
            return Err(CollocationError::InvalidArgument(format!(
                "intersection size {intersection} exceeds list sizes {brute_force} and {rotation}"
            )));
        }
        let collocated = brute_force + rotation - intersection;
        if collocated > n {
            return Err(CollocationError::InvalidArgument(format!(
                "{collocated} collocated occultations out of only {n}"
            )));
        }

        Ok(ConfusionMatrix {
            true_positive: intersection,
            false_negative: brute_force - intersection,
            false_positive: rotation - intersection,
            true_negative: n - collocated,
        })
    }

    pub fn total(&self) -> usize {
        self.true_positive + self.false_negative + self.false_positive + self.true_negative
    }
}

/// Confusion matrix of `rotation` against the ground truth `brute_force`, over the
/// occultations `occultations`.
///
/// Errors
/// ----------
/// * [`CollocationError::InvalidArgument`] if either list is empty, repeats an occultation
///   identifier, or the counts are inconsistent with `occultations.len()`.
pub fn collocation_confusion(
    occultations: &OccList,
    brute_force: &CollocationList,
    rotation: &CollocationList,
) -> Result<ConfusionMatrix, CollocationError> {
    let intersection = brute_force.intersection(rotation)?;
    ConfusionMatrix::from_counts(
        occultations.len(),
        brute_force.len(),
        rotation.len(),
        intersection.len(),
    )
}
