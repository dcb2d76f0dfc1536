use std::fmt::{Display, Formatter, Result};

use super::{num::Scalar, storage::Storage, tensor::Tensor};

impl<S: Storage> Tensor<S> {
    fn render_axis(&self, f: &mut Formatter<'_>, indices: &mut [usize], axis: usize) -> Result {
        let last = axis + 1 == indices.len();
        write!(f, "[")?;
        for index in 0..self.shape()[axis] {
            indices[axis] = index;
            if index > 0 && last {
                write!(f, ",\t")?;
            } else if index > 0 {
                write!(f, "\n{}", " ".repeat(axis + 1))?;
            }
            if last {
                self.get(indices).render(f)?;
            } else {
                self.render_axis(f, indices, axis + 1)?;
            }
        }
        write!(f, "]")
    }
}

/// Nested brackets per axis, innermost elements separated by tabs. Debugging aid only.
impl<S: Storage> Display for Tensor<S> {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        let mut indices = vec![0; self.rank()];
        match self.rank() {
            0 => self.get(&indices).render(f),
            _ => self.render_axis(f, &mut indices, 0),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::error::Error;

    use crate::loom::tensor::NativeTensor;

    #[test]
    fn test_vector_to_string() -> Result<(), Box<dyn Error>> {
        let vector = NativeTensor::from_data(vec![1.0f64, 2.0, 3.0, 4.0, 5.0], [5])?;
        let expected = "[1.000,\t2.000,\t3.000,\t4.000,\t5.000]";
        assert_eq!(vector.to_string(), expected);
        Ok(())
    }

    #[test]
    fn test_matrix_to_string() -> Result<(), Box<dyn Error>> {
        let matrix = NativeTensor::from_rows(vec![
            vec![1.0f32, 2.0, 3.0, 4.0],
            vec![5.0, 6.0, 7.0, 8.0],
        ])?;
        let expected = "[[1.000,\t2.000,\t3.000,\t4.000]\n [5.000,\t6.000,\t7.000,\t8.000]]";
        assert_eq!(matrix.to_string(), expected);

        let expected = "[[1.000,\t5.000]\n [2.000,\t6.000]\n [3.000,\t7.000]\n [4.000,\t8.000]]";
        assert_eq!(matrix.transpose().to_string(), expected);
        Ok(())
    }

    #[test]
    fn test_integer_to_string() -> Result<(), Box<dyn Error>> {
        let tensor = NativeTensor::from_data((0..8).collect::<Vec<u32>>(), [2, 2, 2])?;
        let expected = "[[[0,\t1]\n  [2,\t3]]\n [[4,\t5]\n  [6,\t7]]]";
        assert_eq!(tensor.to_string(), expected);

        let scalar = NativeTensor::from_data(vec![3i32], Vec::<usize>::new())?;
        assert_eq!(scalar.to_string(), "3");
        Ok(())
    }
}
