//! Sparse storage of system matrix rows.
//!
//! The system matrix has one row per ray and one column per voxel. Only one
//! row is relevant at any single time, and only a few of its elements are
//! non-zero: those belonging to voxels which the ray passes through or near.

// Sparse storage of the slice through the system matrix which corresponds to
// the current ray. Allocating these anew for each ray has a noticeable runtime
// cost, so they are created up-front and reused.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SystemMatrixRow(pub Vec<SystemMatrixElement>);

impl SystemMatrixRow {
    pub fn with_capacity(n: usize) -> Self { Self(Vec::with_capacity(n)) }

    pub fn iter(&self) -> std::slice::Iter<SystemMatrixElement> { self.0.iter() }
    pub fn clear(&mut self) { self.0.clear(); }
    pub fn len(&self) -> usize { self.0.len() }
    pub fn is_empty(&self) -> bool { self.0.is_empty() }

    /// Sum of the weights: the length of the row's ray as seen by the
    /// projector.
    pub fn weight_sum(&self) -> Weightf32 { self.0.iter().map(|&(_, w)| w).sum() }

    pub fn squared_norm(&self) -> Weightf32 { self.0.iter().map(|&(_, w)| w * w).sum() }
}

impl Extend<SystemMatrixElement> for SystemMatrixRow {
    fn extend<I: IntoIterator<Item = SystemMatrixElement>>(&mut self, iter: I) {
        self.0.extend(iter)
    }
}

impl FromIterator<SystemMatrixElement> for SystemMatrixRow {
    fn from_iter<I: IntoIterator<Item = SystemMatrixElement>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for SystemMatrixRow {
    type Item = SystemMatrixElement;
    type IntoIter = std::vec::IntoIter<Self::Item>;
    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a SystemMatrixRow {
    type Item = SystemMatrixElement;
    type IntoIter = std::iter::Cloned<std::slice::Iter<'a, Self::Item>>;
    fn into_iter(self) -> Self::IntoIter {
        self.0.iter().cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sums_over_weights() {
        let row: SystemMatrixRow = [(0, 1.0), (3, 2.0), (3, 0.5)].into_iter().collect();
        assert_eq!(row.len(), 3);
        assert_eq!(row.weight_sum(), 3.5);
        assert_eq!(row.squared_norm(), 5.25);
    }

    #[test]
    fn cleared_row_keeps_its_allocation() {
        let mut row = SystemMatrixRow::with_capacity(10);
        row.extend([(1, 1.0), (2, 1.0)]);
        row.clear();
        assert!(row.is_empty());
        assert!(row.0.capacity() >= 10);
        assert_eq!(row.weight_sum(), 0.0);
    }
}

// ----- Imports ------------------------------------------------------------------------------------------
use crate::types::{SystemMatrixElement, Weightf32};
