use derive_more::Display;
use itertools::Itertools;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{
    extent::{Extent, IntoExtent},
    iter::StorageIndices,
    num::{DataType, Scalar},
    ops,
    slice::Slice,
    storage::{NativeStorage, Storage},
};

#[derive(Debug, Error)]
pub enum TensorError {
    #[error("tensor shape error: extent {0} mismatches {1}")]
    Mismatch(Extent, Extent),
    #[error("tensor axis error: axis {axis} is out of range for rank {rank}")]
    Axis { axis: usize, rank: usize },
    #[error("tensor reshape error: extent {0}'s size not match extent {1}'s")]
    Reshape(Extent, Extent),
    #[error("tensor reshape error: view of extent {0} is not contiguous")]
    NonContiguous(Extent),
    #[error("extent error: cannot extend rank {rank} to {to}")]
    Extend { rank: usize, to: usize },
    #[error("tensor slice error: slice {1} is not compatible with extent {0}")]
    Slice(Extent, Slice),
    #[error("tensor creation error: extent {shape} at offset {offset} exceeds storage of {size}")]
    Create {
        shape: Extent,
        offset: usize,
        size: usize,
    },
    #[error("tensor view error: view {1} exceeds extent {0}")]
    View(Extent, StorageView),
    #[error("tensor view error: {0:?} is not a permutation of axes")]
    DimIndex(Vec<usize>),
    #[error("storage error: {1} bytes cannot hold whole elements of {0}")]
    Bytes(DataType, usize),
    #[error("tensor concat error: no tensors given")]
    Empty,
}

/// A rectangular window over the addressable space of a tensor.
///
/// Both `shape` and `offset` are logical: entry `k` describes the `k`-th externally visible axis.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Display)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[display("{shape}@[{}]", offset.iter().format(", "))]
pub struct StorageView {
    pub shape: Extent,
    pub offset: Vec<usize>,
}

impl StorageView {
    /// A view covering all of `shape`.
    pub fn full(shape: Extent) -> Self {
        let offset = vec![0; shape.len()];
        Self { shape, offset }
    }

    /// The same window with the axis order reversed.
    pub fn reversed(&self) -> Self {
        let shape = self.shape.reversed();
        let offset = self.offset.iter().rev().copied().collect();
        Self { shape, offset }
    }
}

/// An N-dimensional strided tensor over a shared [`Storage`].
///
/// Address translation is split three ways:
/// - `stride` is fixed to the allocation (`internal_shape`) and indexed by physical axis;
/// - `dim_index` maps each logical axis position to the physical stride slot it uses;
/// - `view` holds the logical shape and per-axis offset of the visible window.
///
/// Windows and transposes only touch `dim_index` and `view`, so they never copy data.
/// Cloning a tensor produces another view of the same storage.
#[derive(Debug, Clone)]
pub struct Tensor<S> {
    storage: S,
    internal_shape: Extent,
    offset: usize,
    stride: Vec<usize>,
    dim_index: Vec<usize>,
    view: StorageView,
}

/// A tensor backed by [`NativeStorage`].
pub type NativeTensor<T> = Tensor<NativeStorage<T>>;

#[inline]
fn default_dim_index(rank: usize) -> Vec<usize> {
    (0..rank).rev().collect()
}

impl<S: Storage> Tensor<S> {
    /// Wraps `storage` with a contiguous layout of `shape` starting at `offset`.
    fn wrap(storage: S, shape: Extent, offset: usize) -> Self {
        let stride = storage.stride(&shape);
        let dim_index = default_dim_index(shape.len());
        let view = StorageView::full(shape.clone());
        Self {
            storage,
            internal_shape: shape,
            offset,
            stride,
            dim_index,
            view,
        }
    }

    fn check_fit(storage: &S, shape: &Extent, offset: usize) -> Result<(), TensorError> {
        let end = offset.checked_add(shape.elements());
        if end.is_some_and(|end| end <= storage.size()) {
            return Ok(());
        }
        Err(TensorError::Create {
            shape: shape.clone(),
            offset,
            size: storage.size(),
        })
    }

    /// Creates a tensor from flat data laid out in the storage's order.
    pub fn from_data(
        data: impl Into<Vec<S::Element>>,
        shape: impl IntoExtent,
    ) -> Result<Self, TensorError> {
        Self::from_data_at(data, shape, 0)
    }

    /// Creates a tensor from flat data, starting `offset` elements into it.
    pub fn from_data_at(
        data: impl Into<Vec<S::Element>>,
        shape: impl IntoExtent,
        offset: usize,
    ) -> Result<Self, TensorError> {
        let storage = S::from_vec(data.into());
        let shape = shape.into_extent();
        Self::check_fit(&storage, &shape, offset)?;
        Ok(Self::wrap(storage, shape, offset))
    }

    /// Creates a matrix from equally sized rows.
    pub fn from_rows(rows: Vec<Vec<S::Element>>) -> Result<Self, TensorError> {
        let cols = rows.first().map_or(0, Vec::len);
        if let Some(row) = rows.iter().find(|row| row.len() != cols) {
            let expected = Extent::from([cols]);
            let found = Extent::from([row.len()]);
            return Err(TensorError::Mismatch(expected, found));
        }
        let shape = Extent::from([rows.len(), cols]);
        Self::from_data(rows.concat(), shape)
    }

    /// Wraps existing storage without copying it.
    pub fn from_storage(storage: S, shape: impl IntoExtent) -> Result<Self, TensorError> {
        Self::from_storage_with(storage, shape, None, 0)
    }

    /// Wraps existing storage with an optional window and a base offset.
    ///
    /// Without a view the whole of `shape` is visible.
    pub fn from_storage_with(
        storage: S,
        shape: impl IntoExtent,
        view: Option<StorageView>,
        offset: usize,
    ) -> Result<Self, TensorError> {
        let shape = shape.into_extent();
        Self::check_fit(&storage, &shape, offset)?;
        let tensor = Self::wrap(storage, shape, offset);
        match view {
            Some(view) => tensor.derive(None, Some(view)),
            None => Ok(tensor),
        }
    }

    /// Creates a zero-filled tensor in fresh storage.
    pub fn zeros(shape: impl IntoExtent) -> Self {
        let shape = shape.into_extent();
        let storage = S::alloc(shape.elements());
        Self::wrap(storage, shape, 0)
    }

    /// Takes a window of this tensor, sharing its storage.
    ///
    /// One selector applies to each leading axis; missing selectors take the axis in full.
    /// The window keeps the axis order of this tensor and is placed relative to its view.
    pub fn window(&self, slice: impl Into<Slice>) -> Result<Self, TensorError> {
        let slice = slice.into();
        let shape = self.shape();
        if slice.len() > shape.len() {
            return Err(TensorError::Slice(shape.clone(), slice));
        }

        let mut dims = Vec::with_capacity(shape.len());
        let mut offset = Vec::with_capacity(shape.len());
        for (axis, &dim) in shape.iter().enumerate() {
            let selector = slice.get(axis).copied().unwrap_or_default();
            let Some((start, len)) = selector.resolve(dim) else {
                return Err(TensorError::Slice(shape.clone(), slice));
            };
            dims.push(len);
            offset.push(self.view.offset[axis] + start);
        }

        let shape = Extent::new(dims);
        let view = StorageView { shape, offset };
        Ok(self.derive_unchecked(self.dim_index.clone(), view))
    }

    /// Derives a tensor sharing storage, shape and stride, with a replacement axis order
    /// and/or window. Omitted parts are inherited.
    pub fn derive(
        &self,
        dim_index: Option<Vec<usize>>,
        view: Option<StorageView>,
    ) -> Result<Self, TensorError> {
        let rank = self.internal_shape.len();
        let dim_index = dim_index.unwrap_or_else(|| self.dim_index.clone());
        let view = view.unwrap_or_else(|| self.view.clone());

        if dim_index.len() != rank || !dim_index.iter().copied().sorted().eq(0..rank) {
            return Err(TensorError::DimIndex(dim_index));
        }
        let fits = view.shape.len() == rank
            && view.offset.len() == rank
            && (0..rank).all(|axis| {
                let physical = dim_index.iter().position(|&d| d == axis).unwrap_or(axis);
                let bound = self.internal_shape[rank - 1 - physical];
                view.offset[axis] + view.shape[axis] <= bound
            });
        if !fits {
            return Err(TensorError::View(self.internal_shape.clone(), view));
        }

        Ok(self.derive_unchecked(dim_index, view))
    }

    fn derive_unchecked(&self, dim_index: Vec<usize>, view: StorageView) -> Self {
        Self {
            storage: self.storage.clone(),
            internal_shape: self.internal_shape.clone(),
            offset: self.offset,
            stride: self.stride.clone(),
            dim_index,
            view,
        }
    }

    #[inline]
    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// The externally visible shape.
    #[inline]
    pub fn shape(&self) -> &Extent {
        &self.view.shape
    }

    /// The shape of the allocation this tensor addresses.
    #[inline]
    pub fn internal_shape(&self) -> &Extent {
        &self.internal_shape
    }

    #[inline]
    pub fn rank(&self) -> usize {
        self.view.shape.len()
    }

    #[inline]
    pub fn stride(&self) -> &[usize] {
        &self.stride
    }

    #[inline]
    pub fn dim_index(&self) -> &[usize] {
        &self.dim_index
    }

    #[inline]
    pub fn view(&self) -> &StorageView {
        &self.view
    }

    /// Base offset into the storage.
    #[inline]
    pub fn offset(&self) -> usize {
        self.offset
    }

    #[inline]
    pub fn data_type(&self) -> DataType {
        <S::Element as Scalar>::DATA_TYPE
    }

    /// Returns `true` if both tensors address the same buffer.
    #[inline]
    pub fn shares_storage(&self, other: &Self) -> bool {
        self.storage.same_buffer(&other.storage)
    }

    /// Storage address of the first element of the view.
    pub fn view_offset(&self) -> usize {
        self.dim_index
            .iter()
            .zip_eq(self.stride.iter())
            .map(|(&axis, &stride)| self.view.offset[axis] * stride)
            .sum::<usize>()
            + self.offset
    }

    /// Storage address of the element at logical `indices`.
    ///
    /// Missing trailing indices count as `0`. Indices are not bounds checked; an index
    /// outside the view addresses whatever element the stride arithmetic lands on.
    pub fn offset_of(&self, indices: &[usize]) -> usize {
        debug_assert!(indices.len() <= self.rank());
        self.dim_index
            .iter()
            .zip_eq(self.stride.iter())
            .map(|(&axis, &stride)| {
                let index = indices.get(axis).copied().unwrap_or(0);
                (index + self.view.offset[axis]) * stride
            })
            .sum::<usize>()
            + self.offset
    }

    #[inline]
    pub fn get(&self, indices: &[usize]) -> S::Element {
        self.storage.get(self.offset_of(indices))
    }

    #[inline]
    pub fn set(&self, indices: &[usize], value: S::Element) {
        self.storage.set(self.offset_of(indices), value)
    }

    /// Copies `source` into the window selected by `slice`.
    pub fn assign(&self, slice: impl Into<Slice>, source: &Self) -> Result<(), TensorError> {
        let window = self.window(slice)?;
        ops::copy(source, &window)
    }

    /// Returns a view with the axis order reversed. Applying it twice restores the tensor.
    pub fn transpose(&self) -> Self {
        let dim_index = self.dim_index.iter().rev().copied().collect();
        let view = self.view.reversed();
        self.derive_unchecked(dim_index, view)
    }

    /// Shorthand for [`Tensor::transpose`].
    #[inline]
    pub fn t(&self) -> Self {
        self.transpose()
    }

    /// Returns `true` if the view covers the whole allocation in storage order.
    pub fn is_contiguous(&self) -> bool {
        self.dim_index == default_dim_index(self.internal_shape.len())
            && self.view.offset.iter().all(|&offset| offset == 0)
            && self.view.shape.dims() == self.internal_shape.dims()
    }

    /// Reinterprets the storage under a new shape with the same number of elements.
    ///
    /// Only contiguous tensors can be reshaped; transposed or windowed views fail with
    /// [`TensorError::NonContiguous`]. Elements are laid out in the storage's order.
    pub fn reshape(&self, shape: impl IntoExtent) -> Result<Self, TensorError> {
        let shape = shape.into_extent();
        if shape.elements() != self.internal_shape.elements() {
            return Err(TensorError::Reshape(self.internal_shape.clone(), shape));
        }
        if !self.is_contiguous() {
            return Err(TensorError::NonContiguous(self.shape().clone()));
        }
        log::debug!("reshape tensor {} into {shape}", self.internal_shape);
        Ok(Self::wrap(self.storage.clone(), shape, self.offset))
    }

    /// Reshapes into a single axis holding every element.
    pub fn ravel(&self) -> Result<Self, TensorError> {
        self.reshape([self.internal_shape.elements()])
    }

    /// Storage addresses of every element of the view, last axis fastest.
    #[inline]
    pub fn storage_indices(&self) -> StorageIndices<'_, S> {
        StorageIndices::new(self)
    }

    /// Copies the view into a tensor with fresh storage.
    pub fn deep_copy(&self) -> Self {
        log::debug!("deep copy tensor {}", self.shape());
        let output = Self::zeros(self.shape().clone());
        ops::copy_elements(self, &output);
        output
    }

    /// Converts into a tensor over another backend or element type.
    pub fn convert<U, F>(&self, mut f: F) -> Tensor<U>
    where
        U: Storage,
        F: FnMut(S::Element) -> U::Element,
    {
        let output = Tensor::<U>::zeros(self.shape().clone());
        for (src, dst) in self.storage_indices().zip_eq(output.storage_indices()) {
            output.storage.set(dst, f(self.storage.get(src)));
        }
        output
    }

    /// Collects the elements of the view, last axis fastest.
    pub fn to_vec(&self) -> Vec<S::Element> {
        self.storage_indices()
            .map(|index| self.storage.get(index))
            .collect()
    }
}
