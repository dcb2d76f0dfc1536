//! Bulk operations over tensors.
//!
//! Every operation here walks tensors with [`Tensor::storage_indices`], so it is correct for
//! any combination of windows, transposes and storage orders.

use itertools::Itertools;

use super::{
    slice::Slice,
    storage::Storage,
    tensor::{Tensor, TensorError},
};

/// Pairs up elements of two equally sized tensors in canonical order.
pub(crate) fn copy_elements<S: Storage>(from: &Tensor<S>, to: &Tensor<S>) {
    for (src, dst) in from.storage_indices().zip_eq(to.storage_indices()) {
        to.storage().set(dst, from.storage().get(src));
    }
}

/// Copies every element of `from` into `to`, which must have the same shape.
///
/// If both tensors alias overlapping storage, elements are copied one at a time in
/// canonical order and later reads may observe earlier writes.
#[cfg_attr(feature = "trace", tracing::instrument(level = "trace", skip_all))]
pub fn copy<S: Storage>(from: &Tensor<S>, to: &Tensor<S>) -> Result<(), TensorError> {
    if from.shape() != to.shape() {
        return Err(TensorError::Mismatch(from.shape().clone(), to.shape().clone()));
    }
    copy_elements(from, to);
    Ok(())
}

/// Sets every element of the view to `value`.
#[cfg_attr(feature = "trace", tracing::instrument(level = "trace", skip_all))]
pub fn fill<S: Storage>(tensor: &Tensor<S>, value: S::Element) {
    for index in tensor.storage_indices() {
        tensor.storage().set(index, value);
    }
}

/// Joins two tensors along `axis` into fresh storage.
///
/// All other dimensions must agree. The lower-rank input is padded with unit axes.
#[cfg_attr(feature = "trace", tracing::instrument(level = "trace", skip_all))]
pub fn concat<S: Storage>(
    lhs: &Tensor<S>,
    rhs: &Tensor<S>,
    axis: usize,
) -> Result<Tensor<S>, TensorError> {
    let rank = lhs.rank().max(rhs.rank());
    if axis >= rank {
        return Err(TensorError::Axis { axis, rank });
    }
    let (x, y) = (lhs.shape(), rhs.shape());
    if (0..rank).any(|index| index != axis && x[index] != y[index]) {
        return Err(TensorError::Mismatch(x.clone(), y.clone()));
    }

    let mut shape = x.extend(rank)?;
    shape.set(axis, x[axis] + y[axis]);
    log::debug!("concat {x} and {y} along axis {axis} into {shape}");

    let output: Tensor<S> = Tensor::zeros(shape);
    let lead = x[axis];
    copy(lhs, &output.window(Slice::along(axis, ..lead))?)?;
    copy(rhs, &output.window(Slice::along(axis, lead..))?)?;
    Ok(output)
}

/// Joins tensors along `axis`, folding pairwise from left to right.
pub fn concat_all<S: Storage>(
    tensors: &[Tensor<S>],
    axis: usize,
) -> Result<Tensor<S>, TensorError> {
    match tensors {
        [] => Err(TensorError::Empty),
        [tensor] => Ok(tensor.deep_copy()),
        [first, second, rest @ ..] => rest
            .iter()
            .try_fold(concat(first, second, axis)?, |output, tensor| {
                concat(&output, tensor, axis)
            }),
    }
}

/// Stacks rows: [`concat`] along axis 0.
#[inline]
pub fn vstack<S: Storage>(lhs: &Tensor<S>, rhs: &Tensor<S>) -> Result<Tensor<S>, TensorError> {
    concat(lhs, rhs, 0)
}

/// Stacks columns: [`concat`] along axis 1.
#[inline]
pub fn hstack<S: Storage>(lhs: &Tensor<S>, rhs: &Tensor<S>) -> Result<Tensor<S>, TensorError> {
    concat(lhs, rhs, 1)
}

/// Applies `f` to every element, returning the results in a tensor of the same shape.
#[cfg_attr(feature = "trace", tracing::instrument(level = "trace", skip_all))]
pub fn map<S, F>(tensor: &Tensor<S>, mut f: F) -> Tensor<S>
where
    S: Storage,
    F: FnMut(S::Element) -> S::Element,
{
    let output: Tensor<S> = Tensor::zeros(tensor.shape().clone());
    for (src, dst) in tensor.storage_indices().zip_eq(output.storage_indices()) {
        output.storage().set(dst, f(tensor.storage().get(src)));
    }
    output
}
