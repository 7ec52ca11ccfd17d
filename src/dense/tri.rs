use crate::error::{MatError, Result};
use crate::raw::{Buffer, Diag, RawTriangular, Uplo};
use crate::traits::{Matrix, RawForm};
use crate::transpose::Transpose;

/// Square triangular matrix in full row-major storage.
///
/// Only the `uplo` triangle is ever read; elements outside it read as zero
/// whatever the storage holds.
///
/// ```
/// use mat32::{TriDense, Uplo};
///
/// let t = TriDense::new(2, Uplo::Upper, Some(vec![1.0, 2.0, 3.0, 4.0])).unwrap();
/// assert_eq!(t.at(0, 1), 2.0);
/// assert_eq!(t.at(1, 0), 0.0);
/// ```
#[derive(Debug)]
pub struct TriDense {
    mat: RawTriangular,
}

impl TriDense {
    /// Create an `n x n` triangular matrix, zero-filled when `data` is `None`.
    pub fn new(n: usize, uplo: Uplo, data: Option<Vec<f32>>) -> Result<Self> {
        Self::with_diag(n, uplo, Diag::NonUnit, data)
    }

    /// Like [`new`](Self::new), choosing how the diagonal is read.
    ///
    /// With [`Diag::Unit`] the diagonal reads as one and the stored diagonal
    /// is never touched.
    ///
    /// ```
    /// use mat32::{Diag, TriDense, Uplo};
    ///
    /// let t = TriDense::with_diag(2, Uplo::Lower, Diag::Unit, Some(vec![9.0, 0.0, 2.0, 9.0])).unwrap();
    /// assert_eq!(t.at(0, 0), 1.0);
    /// assert_eq!(t.at(1, 0), 2.0);
    /// ```
    pub fn with_diag(n: usize, uplo: Uplo, diag: Diag, data: Option<Vec<f32>>) -> Result<Self> {
        if n == 0 {
            return Err(MatError::ZeroLength);
        }
        let len = n.checked_mul(n).ok_or(MatError::Shape)?;
        let data = match data {
            Some(d) if d.len() != len => return Err(MatError::Shape),
            Some(d) => d,
            None => vec![0.0; len],
        };
        Ok(Self {
            mat: RawTriangular {
                buffer: Buffer::new(data),
                offset: 0,
                n,
                stride: n,
                uplo,
                diag,
            },
        })
    }

    #[inline]
    pub fn dims(&self) -> (usize, usize) {
        (self.mat.n, self.mat.n)
    }

    #[inline]
    fn in_triangle(&self, i: usize, j: usize) -> bool {
        match self.mat.uplo {
            Uplo::Upper => i <= j,
            Uplo::Lower => i >= j,
        }
    }

    /// Element `(i, j)`; zero outside the stored triangle.
    pub fn at(&self, i: usize, j: usize) -> f32 {
        assert!(i < self.mat.n && j < self.mat.n, "mat32: index out of range");
        if !self.in_triangle(i, j) {
            return 0.0;
        }
        if i == j && self.mat.diag == Diag::Unit {
            return 1.0;
        }
        self.mat.buffer.get(self.mat.offset + i * self.mat.stride + j)
    }

    /// Set element `(i, j)`. Panics outside the stored triangle, and on the
    /// diagonal of a unit-diagonal matrix.
    pub fn set(&mut self, i: usize, j: usize, v: f32) {
        assert!(i < self.mat.n && j < self.mat.n, "mat32: index out of range");
        assert!(self.in_triangle(i, j), "mat32: triangular set out of bounds");
        assert!(i != j || self.mat.diag == Diag::NonUnit, "mat32: unit diagonal is not stored");
        self.mat.buffer.set(self.mat.offset + i * self.mat.stride + j, v);
    }

    pub fn raw_triangular(&self) -> RawTriangular {
        self.mat.clone()
    }

    /// Transpose view: an upper matrix reads as lower and vice versa.
    pub fn t(&self) -> Transpose<&TriDense> {
        Transpose(self)
    }
}

impl Matrix for TriDense {
    #[inline]
    fn dims(&self) -> (usize, usize) {
        TriDense::dims(self)
    }

    #[inline]
    fn at(&self, i: usize, j: usize) -> f32 {
        TriDense::at(self, i, j)
    }

    fn raw_form(&self) -> RawForm {
        RawForm::Triangular(self.mat.clone())
    }
}
