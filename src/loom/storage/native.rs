use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use super::{AxisOrder, Storage};
use crate::loom::{num::Scalar, tensor::TensorError};

/// Plain host buffer laid out in [`AxisOrder::RowMajor`].
#[derive(Debug, Clone)]
pub struct NativeStorage<T> {
    data: Arc<RwLock<Vec<T>>>,
}

impl<T: Scalar> NativeStorage<T> {
    #[inline]
    fn read(&self) -> RwLockReadGuard<'_, Vec<T>> {
        self.data.read().unwrap_or_else(PoisonError::into_inner)
    }

    #[inline]
    fn write(&self) -> RwLockWriteGuard<'_, Vec<T>> {
        self.data.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Reads elements from raw bytes in native endianness.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, TensorError> {
        if bytes.len() % size_of::<T>() != 0 {
            return Err(TensorError::Bytes(T::DATA_TYPE, bytes.len()));
        }
        let data = bytemuck::pod_collect_to_vec::<u8, T>(bytes);
        Ok(Self::from_vec(data))
    }

    /// Copies the buffer out as raw bytes in native endianness.
    pub fn to_bytes(&self) -> Vec<u8> {
        bytemuck::cast_slice::<T, u8>(&self.read()[..]).to_vec()
    }

    /// Copies the buffer out in storage order.
    pub fn to_vec(&self) -> Vec<T> {
        self.read().clone()
    }

    /// Number of handles sharing this buffer.
    #[inline]
    pub fn ref_count(&self) -> usize {
        Arc::strong_count(&self.data)
    }
}

impl<T: Scalar> Storage for NativeStorage<T> {
    type Element = T;

    fn alloc(size: usize) -> Self {
        log::trace!("allocate native storage of {size} × {}", T::DATA_TYPE);
        Self::from_vec(vec![T::zero(); size])
    }

    #[inline]
    fn from_vec(data: Vec<T>) -> Self {
        let data = Arc::new(RwLock::new(data));
        Self { data }
    }

    fn duplicate(&self) -> Self {
        log::trace!("duplicate native storage of {} × {}", self.size(), T::DATA_TYPE);
        Self::from_vec(self.to_vec())
    }

    #[inline]
    fn same_buffer(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.data, &other.data)
    }

    #[inline]
    fn get(&self, index: usize) -> T {
        self.read()[index]
    }

    #[inline]
    fn set(&self, index: usize, value: T) {
        self.write()[index] = value;
    }

    #[inline]
    fn size(&self) -> usize {
        self.read().len()
    }

    #[inline]
    fn order(&self) -> AxisOrder {
        AxisOrder::RowMajor
    }
}

impl<T: Scalar> From<Vec<T>> for NativeStorage<T> {
    #[inline]
    fn from(value: Vec<T>) -> Self {
        Self::from_vec(value)
    }
}
