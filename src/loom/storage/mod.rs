//! Linear buffers that back tensors.
//!
//! A [`Storage`] is a flat, size-addressable, reference-counted buffer. It never knows the
//! dimensional structure of the data it holds; it only declares the [`AxisOrder`] in which
//! it lays out dimensions, from which tensors derive their strides.

use derive_more::Display;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::{extent::Extent, num::Scalar};

pub use native::NativeStorage;

pub mod native;

/// The order in which a backend lays out the dimensions of a shape in memory.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum AxisOrder {
    /// The last axis is contiguous; walking proceeds from the last axis to the first.
    #[default]
    RowMajor,
    /// The first axis is contiguous; walking proceeds from the first axis to the last.
    ColumnMajor,
}

impl AxisOrder {
    /// Axes of a shape of the given rank, from the fastest varying to the slowest.
    pub fn walk(self, rank: usize) -> Vec<usize> {
        match self {
            AxisOrder::RowMajor => (0..rank).rev().collect(),
            AxisOrder::ColumnMajor => (0..rank).collect(),
        }
    }
}

/// Capability every tensor backend provides.
///
/// Storages are handles: [`Clone`] aliases the same buffer, so writes through one clone are
/// visible through all of them. Use [`Storage::duplicate`] for an independent copy.
///
/// Element access takes `&self`; backends provide the interior mutability. Accesses are not
/// synchronized across aliasing handles beyond what a single get or set guarantees.
pub trait Storage: Clone {
    type Element: Scalar;

    /// Allocates a zero-filled buffer of `size` elements.
    fn alloc(size: usize) -> Self;

    /// Takes ownership of a flat sequence of elements.
    fn from_vec(data: Vec<Self::Element>) -> Self;

    /// Allocates a new buffer holding a copy of every element.
    fn duplicate(&self) -> Self;

    /// Returns `true` if both handles alias the same buffer.
    fn same_buffer(&self, other: &Self) -> bool;

    /// Reads the element at a linear offset.
    ///
    /// # Panics
    /// Panics if `index >= self.size()`.
    fn get(&self, index: usize) -> Self::Element;

    /// Writes the element at a linear offset.
    ///
    /// # Panics
    /// Panics if `index >= self.size()`.
    fn set(&self, index: usize, value: Self::Element);

    /// Number of elements in the buffer.
    fn size(&self) -> usize;

    /// The layout order of this backend.
    fn order(&self) -> AxisOrder;

    /// Computes strides for `shape`, one per physical axis.
    ///
    /// Physical axis `d` pairs with logical axis `rank - 1 - d` under the default
    /// dimension index, so `stride[d]` is the step of that logical axis in this backend's
    /// layout. For [`AxisOrder::RowMajor`] this yields `[1, shape[rank - 1], ...]`.
    fn stride(&self, shape: &Extent) -> Vec<usize> {
        let rank = shape.len();
        let mut steps = vec![0; rank];
        let mut step = 1;
        for axis in self.order().walk(rank) {
            steps[axis] = step;
            step *= shape[axis];
        }
        (0..rank).map(|index| steps[rank - 1 - index]).collect()
    }

    /// Maps every element into a new buffer of another backend or element type.
    ///
    /// Elements are visited in buffer order, so the result keeps this buffer's layout.
    fn transform<U, F>(&self, mut f: F) -> U
    where
        U: Storage,
        F: FnMut(Self::Element) -> U::Element,
    {
        let data = (0..self.size()).map(|index| f(self.get(index))).collect();
        U::from_vec(data)
    }
}

#[cfg(test)]
mod tests {
    use super::{AxisOrder, NativeStorage, Storage};
    use crate::loom::extent::Extent;

    #[test]
    fn test_walk() {
        assert_eq!(AxisOrder::RowMajor.walk(3), vec![2, 1, 0]);
        assert_eq!(AxisOrder::ColumnMajor.walk(3), vec![0, 1, 2]);
        assert!(AxisOrder::RowMajor.walk(0).is_empty());
    }

    #[test]
    fn test_row_major_stride() {
        let storage = NativeStorage::<f32>::alloc(0);
        assert_eq!(storage.stride(&Extent::from([2, 5])), vec![1, 5]);
        assert_eq!(storage.stride(&Extent::from([2, 3, 4])), vec![1, 4, 12]);
        assert!(storage.stride(&Extent::default()).is_empty());
    }

    #[test]
    fn test_transform() {
        let storage = NativeStorage::from_vec(vec![1u8, 2, 3]);
        let output: NativeStorage<f64> = storage.transform(|x| x as f64 * 0.5);
        assert_eq!(output.to_vec(), vec![0.5, 1.0, 1.5]);
    }
}
