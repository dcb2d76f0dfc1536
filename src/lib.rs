//! N-dimensional strided tensors with zero-copy windows and transposes.
//!
//! ```
//! use stem::{NativeTensor, ops};
//!
//! let data: Vec<f64> = (0..100).map(|x| x as f64).collect();
//! let tensor = NativeTensor::from_data(data, [10, 10])?;
//!
//! let window = tensor.window((1..3, 1..3))?;
//! assert_eq!(window.to_vec(), vec![11.0, 12.0, 21.0, 22.0]);
//!
//! ops::fill(&window.transpose(), -1.0);
//! assert_eq!(tensor.get(&[2, 1]), -1.0);
//! # Ok::<(), stem::TensorError>(())
//! ```

pub mod loom;

pub use loom::{
    extent::{Extent, IntoExtent},
    iter::StorageIndices,
    num::{DataType, One, Scalar, Zero},
    ops,
    slice::{Axis, Slice},
    storage::{AxisOrder, NativeStorage, Storage},
    tensor::{NativeTensor, StorageView, Tensor, TensorError},
};
