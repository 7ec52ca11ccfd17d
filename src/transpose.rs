//! Zero-copy transpose views.
//!
//! Wrapping an operand never touches its storage: the wrapper swaps the
//! logical roles of rows and columns and reports the flip through
//! [`Matrix::is_transposed`] so the engine can pass the stored layout to a
//! transposing kernel.

use crate::raw::RawVector;
use crate::traits::{Matrix, RawForm, Vector};

/// The transpose of a matrix.
///
/// ```
/// use mat32::{Dense, Matrix, Transpose};
///
/// let a = Dense::new(2, 3, Some(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0])).unwrap();
/// let t = Transpose(&a);
/// assert_eq!(t.dims(), (3, 2));
/// assert_eq!(t.at(2, 1), 6.0);
/// ```
#[derive(Clone, Copy, Debug)]
pub struct Transpose<M>(pub M);

impl<M: Matrix> Transpose<M> {
    /// The wrapped matrix.
    pub fn untranspose(self) -> M {
        self.0
    }
}

impl<M: Matrix> Matrix for Transpose<M> {
    #[inline]
    fn dims(&self) -> (usize, usize) {
        let (r, c) = self.0.dims();
        (c, r)
    }

    #[inline]
    fn at(&self, i: usize, j: usize) -> f32 {
        self.0.at(j, i)
    }

    fn raw_form(&self) -> RawForm {
        self.0.raw_form()
    }

    fn is_transposed(&self) -> bool {
        !self.0.is_transposed()
    }

    fn as_vector(&self) -> Option<&dyn Vector> {
        self.0.as_vector()
    }
}

/// A vector viewed as a single row.
#[derive(Clone, Copy, Debug)]
pub struct TransposeVec<V>(pub V);

impl<V: Vector> TransposeVec<V> {
    /// The wrapped vector.
    pub fn untranspose(self) -> V {
        self.0
    }
}

impl<V: Vector> Matrix for TransposeVec<V> {
    #[inline]
    fn dims(&self) -> (usize, usize) {
        (1, self.0.len())
    }

    #[inline]
    fn at(&self, i: usize, j: usize) -> f32 {
        assert!(i == 0, "mat32: index out of range");
        self.0.at_vec(j)
    }

    fn raw_form(&self) -> RawForm {
        self.0.raw_form()
    }

    fn is_transposed(&self) -> bool {
        !self.0.is_transposed()
    }

    fn as_vector(&self) -> Option<&dyn Vector> {
        Some(&self.0)
    }
}

impl<V: Vector> Vector for TransposeVec<V> {
    #[inline]
    fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    fn at_vec(&self, i: usize) -> f32 {
        self.0.at_vec(i)
    }

    fn raw_vector(&self) -> Option<RawVector> {
        self.0.raw_vector()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Dense, VecDense};

    #[test]
    fn transpose_swaps_roles() {
        let a = Dense::new(2, 3, Some(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0])).unwrap();
        let t = Transpose(&a);
        assert_eq!(t.dims(), (3, 2));
        for i in 0..2 {
            for j in 0..3 {
                assert_eq!(t.at(j, i), a.at(i, j));
            }
        }
        assert!(t.is_transposed());
        assert!(!Transpose(t).is_transposed());
    }

    #[test]
    fn transpose_shares_storage() {
        let a = Dense::new(2, 2, None).unwrap();
        let RawForm::General(raw) = Transpose(&a).raw_form() else {
            panic!("dense transpose lost its raw form");
        };
        assert!(raw.buffer.ptr_eq(&a.raw_matrix().buffer));
    }

    #[test]
    fn transpose_vec_is_a_row() {
        let v = VecDense::from_slice(&[1.0, 2.0, 3.0]);
        let t = TransposeVec(&v);
        assert_eq!(t.dims(), (1, 3));
        assert_eq!(t.at(0, 2), 3.0);
        assert_eq!(t.at_vec(1), 2.0);
        assert_eq!(t.len(), 3);
        assert!(t.as_vector().is_some());
        assert_eq!(t.untranspose().dims(), (3, 1));
    }

    #[test]
    #[should_panic]
    fn transpose_vec_rejects_second_row() {
        let v = VecDense::from_slice(&[1.0, 2.0]);
        TransposeVec(&v).at(1, 0);
    }
}
