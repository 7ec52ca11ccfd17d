use crate::raw::{RawGeneral, RawTriangular, RawVector};

/// Storage layout a matrix operand exposes to the vector engine.
///
/// Returning anything other than [`RawForm::Opaque`] opts a type into the
/// fast path: the engine hands the descriptor straight to the kernels instead
/// of reading elements one at a time through [`Matrix::at`].
#[derive(Clone, Debug)]
pub enum RawForm {
    Vector(RawVector),
    General(RawGeneral),
    Triangular(RawTriangular),
    Opaque,
}

/// Read-only access to a matrix-like operand.
///
/// Only `dims` and `at` are required. Every engine operation works against
/// such a minimal implementation through its element-wise fallback.
pub trait Matrix {
    /// `(rows, cols)`.
    fn dims(&self) -> (usize, usize);

    /// Element at row `i`, column `j`. Panics when out of range.
    fn at(&self, i: usize, j: usize) -> f32;

    /// Raw storage of the operand with any transpose wrapper removed.
    fn raw_form(&self) -> RawForm {
        RawForm::Opaque
    }

    /// Whether `raw_form` describes the transpose of this operand.
    fn is_transposed(&self) -> bool {
        false
    }

    /// The operand as a vector, with any transpose wrapper removed.
    fn as_vector(&self) -> Option<&dyn Vector> {
        None
    }
}

/// A matrix with a single column (or a transposed single row).
pub trait Vector: Matrix {
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Element `i`. Panics when out of range.
    fn at_vec(&self, i: usize) -> f32;

    /// Strided storage descriptor, when the vector has one.
    fn raw_vector(&self) -> Option<RawVector> {
        None
    }
}

impl<M: Matrix + ?Sized> Matrix for &M {
    #[inline]
    fn dims(&self) -> (usize, usize) {
        (**self).dims()
    }

    #[inline]
    fn at(&self, i: usize, j: usize) -> f32 {
        (**self).at(i, j)
    }

    #[inline]
    fn raw_form(&self) -> RawForm {
        (**self).raw_form()
    }

    #[inline]
    fn is_transposed(&self) -> bool {
        (**self).is_transposed()
    }

    #[inline]
    fn as_vector(&self) -> Option<&dyn Vector> {
        (**self).as_vector()
    }
}

impl<V: Vector + ?Sized> Vector for &V {
    #[inline]
    fn len(&self) -> usize {
        (**self).len()
    }

    #[inline]
    fn at_vec(&self, i: usize) -> f32 {
        (**self).at_vec(i)
    }

    #[inline]
    fn raw_vector(&self) -> Option<RawVector> {
        (**self).raw_vector()
    }
}
