//! The `loom` module provides the strided tensor engine every higher layer builds on.
//! It separates where elements live (storage) from how they are addressed (shape, stride, axis order and view),
//! so that slicing and transposition never move data.
//!
//! ## Key Components
//! 1. **Shapes**:
//!    - [`Extent`](extent::Extent) describes dimension sizes, with derived element count and span.
//!    - Axes past the declared rank read as `1`, letting code ignore trailing unit axes.
//!
//! 2. **Storage**:
//!    - The [`Storage`](storage::Storage) capability abstracts a reference-counted linear buffer.
//!    - [`NativeStorage`](storage::NativeStorage) is the plain host buffer, laid out row-major.
//!    - Backends declare their axis order; tensors derive strides from it.
//!
//! 3. **Tensors**:
//!    - [`Tensor`](tensor::Tensor) composes storage, allocation shape, stride, axis order and view.
//!    - Windows, transposes and reshapes alias the same storage.
//!    - [`StorageIndices`](iter::StorageIndices) walks any view in canonical order.
//!
//! 4. **Operations**:
//!    - Copy, fill, concat and map in [`ops`], all driven by the canonical traversal.
//!
//! ## Design Principles
//! - **Zero-copy views**: metadata-only windows and transposes, O(1) to construct.
//! - **Layout independence**: bulk operations never re-derive offsets by hand.
//! - **Typed failures**: shape, axis and reshape violations surface as [`TensorError`](tensor::TensorError).
//!
//! Aliasing views share mutable storage on purpose. Writes through one view are visible through every other;
//! callers serialize concurrent writers themselves.

pub mod display;
pub mod extent;
pub mod iter;
pub mod num;
pub mod ops;
pub mod slice;
pub mod storage;
pub mod tensor;
