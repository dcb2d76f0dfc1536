use std::{
    fmt::{Debug, Formatter, Result as FmtResult},
    ops::{Add, Mul},
};

use bytemuck::Pod;
use derive_more::Display;
use half::f16;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum DataType {
    F16,
    F32,
    F64,
    U8,
    U16,
    U32,
    I32,
    I64,
}

impl DataType {
    /// Returns the size of one element in bytes.
    pub const fn size(self) -> usize {
        match self {
            DataType::F16 => 2,
            DataType::F32 => 4,
            DataType::F64 => 8,
            DataType::U8 => 1,
            DataType::U16 => 2,
            DataType::U32 => 4,
            DataType::I32 => 4,
            DataType::I64 => 8,
        }
    }

    /// Returns `true` for floating point element types.
    pub const fn is_float(self) -> bool {
        matches!(self, DataType::F16 | DataType::F32 | DataType::F64)
    }
}

pub trait Zero {
    fn zero() -> Self;
}

pub trait One {
    fn one() -> Self;
}

/// Element type of a tensor.
///
/// Carries the arithmetic a storage backend relies on (zero value, addition,
/// multiplication, copy) plus a data type tag and a renderer used by [`Display`](std::fmt::Display).
pub trait Scalar:
    Sized
    + Pod
    + Zero
    + One
    + Add<Output = Self>
    + Mul<Output = Self>
    + PartialEq
    + Debug
    + Send
    + Sync
    + 'static
{
    const DATA_TYPE: DataType;

    /// Writes a single element the way tensors print it.
    fn render(self, f: &mut Formatter<'_>) -> FmtResult;
}

macro_rules! impl_int {
    ($ty:ty, $data_type:ident) => {
        impl Zero for $ty {
            fn zero() -> Self {
                0
            }
        }

        impl One for $ty {
            fn one() -> Self {
                1
            }
        }

        impl Scalar for $ty {
            const DATA_TYPE: DataType = DataType::$data_type;

            fn render(self, f: &mut Formatter<'_>) -> FmtResult {
                write!(f, "{}", self)
            }
        }
    };
}

macro_rules! impl_float {
    ($ty:ty, $data_type:ident) => {
        impl Zero for $ty {
            fn zero() -> Self {
                0.0
            }
        }

        impl One for $ty {
            fn one() -> Self {
                1.0
            }
        }

        impl Scalar for $ty {
            const DATA_TYPE: DataType = DataType::$data_type;

            fn render(self, f: &mut Formatter<'_>) -> FmtResult {
                write!(f, "{:.3}", self)
            }
        }
    };
}

impl_float!(f32, F32);
impl_float!(f64, F64);
impl_int!(u8, U8);
impl_int!(u16, U16);
impl_int!(u32, U32);
impl_int!(i32, I32);
impl_int!(i64, I64);

impl Zero for f16 {
    fn zero() -> Self {
        Self::ZERO
    }
}

impl One for f16 {
    fn one() -> Self {
        Self::ONE
    }
}

impl Scalar for f16 {
    const DATA_TYPE: DataType = DataType::F16;

    fn render(self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{:.3}", self.to_f32())
    }
}

#[cfg(test)]
mod tests {
    use half::f16;

    use super::{DataType, One, Scalar, Zero};

    #[test]
    fn test_data_type_size() {
        assert_eq!(DataType::F16.size(), size_of::<f16>());
        assert_eq!(DataType::F64.size(), size_of::<f64>());
        assert_eq!(DataType::I64.size(), size_of::<i64>());
        assert_eq!(<u16 as Scalar>::DATA_TYPE.size(), size_of::<u16>());
        assert!(DataType::F16.is_float());
        assert!(!DataType::U32.is_float());
    }

    #[test]
    fn test_identities() {
        assert_eq!(f32::zero() + f32::one(), 1.0);
        assert_eq!(i64::one() * 7, 7);
        assert_eq!(f16::one() * f16::from_f32(2.5), f16::from_f32(2.5));
    }
}
