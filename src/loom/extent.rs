use std::{
    cmp::Ordering,
    hash::{Hash, Hasher},
    ops::Index,
};

use derive_more::Display;
use itertools::Itertools;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::tensor::TensorError;

/// Ordered dimension sizes of a tensor.
///
/// Indexing past the declared rank yields `1`, so code written for a fixed number of axes
/// works on lower-rank extents unchanged.
#[derive(Debug, Clone, Display)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(from = "Vec<usize>", into = "Vec<usize>"))]
#[display("({})", dims.iter().format(", "))]
pub struct Extent {
    dims: Vec<usize>,
    elements: usize,
    span: usize,
}

impl Extent {
    pub fn new(dims: impl Into<Vec<usize>>) -> Self {
        let dims = dims.into();
        let elements = dims.iter().product();
        let span = dims.iter().filter(|&&dim| dim > 1).count();
        Self {
            dims,
            elements,
            span,
        }
    }

    /// Total number of elements. An extent of rank 0 holds one element.
    #[inline]
    pub fn elements(&self) -> usize {
        self.elements
    }

    /// Number of non-unit dimensions.
    #[inline]
    pub fn span(&self) -> usize {
        self.span
    }

    /// Number of declared dimensions.
    #[inline]
    pub fn len(&self) -> usize {
        self.dims.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.dims.is_empty()
    }

    #[inline]
    pub fn dims(&self) -> &[usize] {
        &self.dims
    }

    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, usize> {
        self.dims.iter()
    }

    /// Sets the size of a declared dimension, recomputing `elements` and `span`.
    ///
    /// # Panics
    /// Panics if `index` is not a declared dimension.
    pub fn set(&mut self, index: usize, value: usize) {
        self.dims[index] = value;
        *self = Self::new(std::mem::take(&mut self.dims));
    }

    /// Pads the extent with trailing unit dimensions until it has `rank` dimensions.
    pub fn extend(&self, rank: usize) -> Result<Self, TensorError> {
        if rank < self.len() {
            return Err(TensorError::Extend {
                rank: self.len(),
                to: rank,
            });
        }
        let dims = self
            .dims
            .iter()
            .copied()
            .pad_using(rank, |_| 1)
            .collect_vec();
        Ok(Self::new(dims))
    }

    /// Returns a copy with the axis order reversed.
    pub fn reversed(&self) -> Self {
        Self::new(self.dims.iter().rev().copied().collect_vec())
    }

    /// Returns whichever extent holds more elements, preferring `rhs` on ties.
    pub fn max(lhs: Self, rhs: Self) -> Self {
        if lhs.elements > rhs.elements { lhs } else { rhs }
    }

    /// Index of the largest dimension; the first one wins on ties.
    pub fn largest_axis(&self) -> Option<usize> {
        self.dims
            .iter()
            .enumerate()
            .rev()
            .max_by_key(|&(_, dim)| dim)
            .map(|(index, _)| index)
    }
}

impl Default for Extent {
    fn default() -> Self {
        Self::new(Vec::<usize>::new())
    }
}

impl Index<usize> for Extent {
    type Output = usize;

    #[inline]
    fn index(&self, index: usize) -> &Self::Output {
        self.dims.get(index).unwrap_or(&1)
    }
}

impl<'a> IntoIterator for &'a Extent {
    type Item = &'a usize;
    type IntoIter = std::slice::Iter<'a, usize>;

    fn into_iter(self) -> Self::IntoIter {
        self.dims.iter()
    }
}

impl From<Vec<usize>> for Extent {
    fn from(value: Vec<usize>) -> Self {
        Self::new(value)
    }
}

impl From<Extent> for Vec<usize> {
    fn from(value: Extent) -> Self {
        value.dims
    }
}

/// Compares element counts and every dimension up to the larger rank, padding with units.
///
/// With positive dimensions this agrees with comparing only up to the left rank: equal
/// element counts force any extra dimensions on either side to be `1`.
impl PartialEq for Extent {
    fn eq(&self, other: &Self) -> bool {
        let rank = self.len().max(other.len());
        self.elements == other.elements && (0..rank).all(|index| self[index] == other[index])
    }
}

impl Eq for Extent {}

impl Hash for Extent {
    fn hash<H: Hasher>(&self, state: &mut H) {
        let rank = self
            .dims
            .iter()
            .rposition(|&dim| dim != 1)
            .map_or(0, |index| index + 1);
        self.elements.hash(state);
        self.dims[..rank].hash(state);
    }
}

/// Orders extents by element count only. Distinct extents of equal size are unordered.
impl PartialOrd for Extent {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match self.elements.cmp(&other.elements) {
            Ordering::Equal if self != other => None,
            ordering => Some(ordering),
        }
    }
}

/// Conversion into an [`Extent`], accepted wherever a shape is expected.
pub trait IntoExtent {
    fn into_extent(self) -> Extent;
}

impl IntoExtent for Extent {
    #[inline]
    fn into_extent(self) -> Extent {
        self
    }
}

impl IntoExtent for &Extent {
    #[inline]
    fn into_extent(self) -> Extent {
        self.clone()
    }
}

impl IntoExtent for usize {
    #[inline]
    fn into_extent(self) -> Extent {
        Extent::new(vec![self])
    }
}

impl IntoExtent for Vec<usize> {
    #[inline]
    fn into_extent(self) -> Extent {
        Extent::new(self)
    }
}

impl IntoExtent for &[usize] {
    #[inline]
    fn into_extent(self) -> Extent {
        Extent::new(self.to_vec())
    }
}

impl<const N: usize> IntoExtent for [usize; N] {
    #[inline]
    fn into_extent(self) -> Extent {
        Extent::new(self.to_vec())
    }
}

impl<const N: usize> From<[usize; N]> for Extent {
    #[inline]
    fn from(value: [usize; N]) -> Self {
        Self::new(value.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use std::{collections::HashSet, error::Error};

    use super::Extent;
    use crate::loom::tensor::TensorError;

    #[test]
    fn test_elements_and_span() {
        let extent = Extent::from([2, 1, 3]);
        assert_eq!(extent.elements(), 6);
        assert_eq!(extent.span(), 2);
        assert_eq!(extent.len(), 3);

        let scalar = Extent::default();
        assert_eq!(scalar.elements(), 1);
        assert_eq!(scalar.span(), 0);
    }

    #[test]
    fn test_random_elements() {
        fastrand::seed(42);
        for _ in 0..64 {
            let rank = fastrand::usize(0..5);
            let dims: Vec<_> = (0..rank).map(|_| fastrand::usize(1..6)).collect();
            let extent = Extent::new(dims.clone());
            assert_eq!(extent.elements(), dims.iter().product::<usize>());
            for index in rank..rank + 4 {
                assert_eq!(extent[index], 1);
            }
        }
    }

    #[test]
    fn test_set_recomputes() {
        let mut extent = Extent::from([2, 1]);
        extent.set(1, 4);
        assert_eq!(extent.elements(), 8);
        assert_eq!(extent.span(), 2);
        assert_eq!(extent, Extent::from([2, 4]));
    }

    #[test]
    fn test_extend() -> Result<(), Box<dyn Error>> {
        let extent = Extent::from([2, 3]);
        assert_eq!(extent.extend(4)?.dims(), &[2, 3, 1, 1]);
        assert_eq!(extent.extend(4)?, Extent::from([2, 3, 1, 1]));
        assert_eq!(extent.extend(2)?.dims(), &[2, 3]);
        assert!(matches!(
            extent.extend(1),
            Err(TensorError::Extend { rank: 2, to: 1 })
        ));
        Ok(())
    }

    #[test]
    fn test_equality_pads_units() {
        let lhs = Extent::from([2, 3]);
        let rhs = Extent::from([2, 3, 1]);
        assert_eq!(lhs, rhs);
        assert_eq!(rhs, lhs);
        assert_ne!(Extent::from([2, 3]), Extent::from([3, 2]));
        assert_ne!(Extent::from([2, 3]), Extent::from([2, 3, 2]));

        let set: HashSet<_> = [lhs, rhs].into_iter().collect();
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_ordering_by_elements() {
        let small = Extent::from([2, 2]);
        let large = Extent::from([3, 3]);
        assert!(small < large);
        assert!(large > small);
        assert_eq!(Extent::from([2, 3]).partial_cmp(&Extent::from([3, 2])), None);

        assert_eq!(Extent::max(small.clone(), large.clone()), large);
        assert_eq!(Extent::max(large.clone(), small), large);
    }

    #[test]
    fn test_largest_axis() {
        assert_eq!(Extent::from([2, 7, 7, 3]).largest_axis(), Some(1));
        assert_eq!(Extent::default().largest_axis(), None);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_serde() -> Result<(), Box<dyn Error>> {
        let extent = Extent::from([4, 1, 5]);
        let json = serde_json::to_string(&extent)?;
        assert_eq!(json, "[4,1,5]");

        let output: Extent = serde_json::from_str(&json)?;
        assert_eq!(output.elements(), 20);
        assert_eq!(output.span(), 2);
        Ok(())
    }

    #[test]
    fn test_display() {
        assert_eq!(Extent::from([4, 5]).to_string(), "(4, 5)");
    }
}
