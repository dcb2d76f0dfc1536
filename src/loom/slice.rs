use std::{
    ops::{Range, RangeFrom, RangeFull, RangeTo},
    sync::Arc,
};

use casey::snake;
use derive_more::{Deref, DerefMut, Display, From, Into};
use itertools::Itertools;

/// Selects part of one axis when taking a window of a tensor.
///
/// A selected axis keeps its place in the window: [`Axis::One`] yields a unit dimension
/// rather than dropping the axis.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum Axis {
    #[default]
    #[display("..")]
    Full,
    #[display("{_0}")]
    One(usize),
    #[display("{start}..{end}")]
    Range { start: usize, end: usize },
    #[display("{_0}..")]
    From(usize),
    #[display("..{_0}")]
    To(usize),
}

impl Axis {
    /// Resolves the selector against an axis of size `dim`, returning its start and length.
    ///
    /// Returns `None` if the selection is empty or runs past the axis.
    pub fn resolve(self, dim: usize) -> Option<(usize, usize)> {
        let (start, end) = match self {
            Axis::Full => (0, dim),
            Axis::One(index) => (index, index.checked_add(1)?),
            Axis::Range { start, end } => (start, end),
            Axis::From(start) => (start, dim),
            Axis::To(end) => (0, end),
        };
        (start < end && end <= dim).then_some((start, end - start))
    }
}

impl From<usize> for Axis {
    #[inline]
    fn from(value: usize) -> Self {
        Self::One(value)
    }
}

impl From<RangeFull> for Axis {
    #[inline]
    fn from(_: RangeFull) -> Self {
        Self::Full
    }
}

impl From<Range<usize>> for Axis {
    #[inline]
    fn from(value: Range<usize>) -> Self {
        let Range { start, end } = value;
        Self::Range { start, end }
    }
}

impl From<RangeFrom<usize>> for Axis {
    #[inline]
    fn from(value: RangeFrom<usize>) -> Self {
        Self::From(value.start)
    }
}

impl From<RangeTo<usize>> for Axis {
    #[inline]
    fn from(value: RangeTo<usize>) -> Self {
        Self::To(value.end)
    }
}

/// One selector per leading axis. Axes past the end of the slice are taken in full.
#[derive(Debug, Default, Clone, PartialEq, Eq, Hash, Deref, DerefMut, From, Into, Display)]
#[display("[{}]", _0.iter().format(", "))]
pub struct Slice(Arc<[Axis]>);

impl From<Vec<Axis>> for Slice {
    #[inline]
    fn from(value: Vec<Axis>) -> Self {
        Self(value.into())
    }
}

macro_rules! impl_slice_from {
    ($t:ident) => {
        impl<$t: Into<Axis>> From<$t> for Slice {
            #[inline]
            fn from(snake!($t): $t) -> Self {
                Self([snake!($t).into()].into())
            }
        }
    };
    ($($t:ident),+) => {
        impl<$($t),+> From<($($t),+)> for Slice
        where
            $($t: Into<Axis>),+
        {
            #[inline]
            fn from(($(snake!($t)),+): ($($t),+)) -> Self {
                Self([$(snake!($t).into()),+].into())
            }
        }
    };
}

impl_slice_from!(T0);
impl_slice_from!(T0, T1);
impl_slice_from!(T0, T1, T2);
impl_slice_from!(T0, T1, T2, T3);
impl_slice_from!(T0, T1, T2, T3, T4);
impl_slice_from!(T0, T1, T2, T3, T4, T5);
impl_slice_from!(T0, T1, T2, T3, T4, T5, T6);
impl_slice_from!(T0, T1, T2, T3, T4, T5, T6, T7);

impl Slice {
    /// Creates a slice taking every one of `rank` axes in full.
    #[inline]
    pub fn full(rank: usize) -> Self {
        Self::from(vec![Axis::Full; rank])
    }

    /// Creates a slice that selects `range` on `axis` and every other axis in full.
    pub fn along(axis: usize, range: impl Into<Axis>) -> Self {
        let mut axes = vec![Axis::Full; axis + 1];
        axes[axis] = range.into();
        Self::from(axes)
    }

    /// Returns `true` if the slice contains only full axes.
    #[inline]
    pub fn is_full(&self) -> bool {
        self.iter().all(|&axis| matches!(axis, Axis::Full))
    }
}

#[cfg(test)]
mod tests {
    use super::{Axis, Slice};

    #[test]
    fn test_resolve() {
        assert_eq!(Axis::Full.resolve(4), Some((0, 4)));
        assert_eq!(Axis::One(3).resolve(4), Some((3, 1)));
        assert_eq!(Axis::One(usize::MAX).resolve(4), None);
        assert_eq!(Axis::One(4).resolve(4), None);
        assert_eq!(Axis::from(1..3).resolve(4), Some((1, 2)));
        assert_eq!(Axis::from(2..2).resolve(4), None);
        assert_eq!(Axis::from(1..5).resolve(4), None);
        assert_eq!(Axis::from(1..).resolve(4), Some((1, 3)));
        assert_eq!(Axis::from(..2).resolve(4), Some((0, 2)));
    }

    #[test]
    fn test_slice_from() {
        let slice = Slice::from((1..3, .., 2));
        assert_eq!(slice.len(), 3);
        assert_eq!(slice.to_string(), "[1..3, .., 2]");
        assert!(!slice.is_full());
        assert!(Slice::full(3).is_full());
        assert!(Slice::from(..).is_full());

        let slice = Slice::along(2, 4..);
        assert_eq!(&slice[..], &[Axis::Full, Axis::Full, Axis::From(4)]);
    }
}
