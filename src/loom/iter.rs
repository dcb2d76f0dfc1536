use std::iter::FusedIterator;

use super::{storage::Storage, tensor::Tensor};

/// Odometer over the logical indices of a tensor's view, yielding storage offsets.
///
/// Indices advance last axis fastest; a counter that reaches its bound resets to `0` and
/// carries into the next slower axis. Every element of the view is visited exactly once,
/// so two traversals of equally shaped tensors pair up elements regardless of layout.
#[derive(Debug, Clone)]
pub struct StorageIndices<'a, S> {
    tensor: &'a Tensor<S>,
    indices: Vec<usize>,
    remaining: usize,
}

impl<'a, S: Storage> StorageIndices<'a, S> {
    pub(crate) fn new(tensor: &'a Tensor<S>) -> Self {
        let indices = vec![0; tensor.rank()];
        let remaining = tensor.shape().elements();
        Self {
            tensor,
            indices,
            remaining,
        }
    }

    /// The logical index the next call to [`Iterator::next`] will translate.
    ///
    /// Counters may sit one past the bound of the last axis until the carry is applied.
    #[inline]
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }
}

impl<S: Storage> Iterator for StorageIndices<'_, S> {
    type Item = usize;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }

        let shape = self.tensor.shape();
        let Some(last) = self.indices.len().checked_sub(1) else {
            // rank 0 holds a single element
            self.remaining = 0;
            return Some(self.tensor.offset_of(&[]));
        };

        if self.indices[last] >= shape[last] {
            let mut axis = last;
            while self.indices[axis] >= shape[axis] {
                if axis == 0 {
                    self.remaining = 0;
                    return None;
                }
                self.indices[axis] = 0;
                self.indices[axis - 1] += 1;
                axis -= 1;
            }
        }

        let offset = self.tensor.offset_of(&self.indices);
        self.indices[last] += 1;
        self.remaining -= 1;
        Some(offset)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<S: Storage> ExactSizeIterator for StorageIndices<'_, S> {}

impl<S: Storage> FusedIterator for StorageIndices<'_, S> {}

#[cfg(test)]
mod tests {
    use std::{collections::HashSet, error::Error};

    use itertools::Itertools;

    use crate::loom::{extent::Extent, storage::Storage, tensor::NativeTensor};

    #[test]
    fn test_contiguous_order() -> Result<(), Box<dyn Error>> {
        let data = (0..20).map(|x| x as f32).collect_vec();
        let tensor = NativeTensor::from_data(data, [2, 10])?;
        let indices = tensor.storage_indices();
        assert_eq!(indices.len(), 20);
        for (i, index) in indices.enumerate() {
            assert_eq!(i, index);
        }
        Ok(())
    }

    #[test]
    fn test_restartable() -> Result<(), Box<dyn Error>> {
        let tensor = NativeTensor::<u32>::zeros([3, 2]);
        let mut indices = tensor.storage_indices();
        indices.next();
        let rest = indices.clone().collect_vec();
        assert_eq!(rest, vec![1, 2, 3, 4, 5]);
        assert_eq!(indices.collect_vec(), rest);
        assert_eq!(tensor.storage_indices().count(), 6);
        Ok(())
    }

    #[test]
    fn test_random_shapes() -> Result<(), Box<dyn Error>> {
        fastrand::seed(42);
        for _ in 0..32 {
            let rank = fastrand::usize(1..5);
            let dims = (0..rank).map(|_| fastrand::usize(1..6)).collect_vec();
            let shape = Extent::new(dims);
            let tensor = NativeTensor::<f32>::zeros(shape.clone());

            let indices = tensor.storage_indices().collect_vec();
            assert_eq!(indices.len(), shape.elements());
            assert!(indices.iter().copied().eq(0..shape.elements()));

            let transposed = tensor.transpose();
            let indices: HashSet<_> = transposed.storage_indices().collect();
            assert_eq!(indices.len(), shape.elements());
            assert!(indices.iter().all(|&index| index < tensor.storage().size()));
        }
        Ok(())
    }

    #[test]
    fn test_rank_zero() -> Result<(), Box<dyn Error>> {
        let tensor = NativeTensor::from_data(vec![4.0f64, 5.0], Extent::default())?;
        assert_eq!(tensor.storage_indices().collect_vec(), vec![0]);

        let tensor = NativeTensor::from_data_at(vec![4.0f64, 5.0], Extent::default(), 1)?;
        assert_eq!(tensor.to_vec(), vec![5.0]);
        Ok(())
    }

    #[test]
    fn test_unit_axes() -> Result<(), Box<dyn Error>> {
        let data = (0..6).collect_vec();
        let tensor = NativeTensor::from_data(data, [1, 3, 1, 2])?;
        assert_eq!(tensor.to_vec(), (0..6).collect_vec());
        assert_eq!(tensor.storage_indices().indices(), &[0, 0, 0, 0]);
        Ok(())
    }
}
