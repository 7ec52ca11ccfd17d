mod tri;

pub use tri::TriDense;

use core::fmt;

use crate::error::{MatError, Result};
use crate::raw::{Buffer, RawGeneral};
use crate::traits::{Matrix, RawForm};
use crate::transpose::Transpose;
use crate::vecdense::VecDense;

/// Dense row-major single-precision matrix.
///
/// Element `(i, j)` is stored at `i * stride + j`. A matrix created by
/// [`Dense::new`] has `stride == cols`; a [`slice`](Dense::slice) keeps the
/// parent's stride and shares its storage.
///
/// ```
/// use mat32::Dense;
///
/// let a = Dense::new(2, 2, Some(vec![1.0, 2.0, 3.0, 4.0])).unwrap();
/// assert_eq!(a.at(1, 0), 3.0);
/// assert_eq!(a.dims(), (2, 2));
/// ```
pub struct Dense {
    mat: RawGeneral,
}

impl Dense {
    /// Create an `r x c` matrix, zero-filled when `data` is `None`.
    pub fn new(r: usize, c: usize, data: Option<Vec<f32>>) -> Result<Self> {
        if r == 0 || c == 0 {
            return Err(MatError::ZeroLength);
        }
        let len = r.checked_mul(c).ok_or(MatError::Shape)?;
        let data = match data {
            Some(d) if d.len() != len => return Err(MatError::Shape),
            Some(d) => d,
            None => vec![0.0; len],
        };
        Ok(Self {
            mat: RawGeneral {
                buffer: Buffer::new(data),
                offset: 0,
                rows: r,
                cols: c,
                stride: c,
            },
        })
    }

    /// `n x n` identity.
    pub fn eye(n: usize) -> Result<Self> {
        let mut m = Self::new(n, n, None)?;
        for i in 0..n {
            m.set(i, i, 1.0);
        }
        Ok(m)
    }

    /// `(rows, cols)`.
    #[inline]
    pub fn dims(&self) -> (usize, usize) {
        (self.mat.rows, self.mat.cols)
    }

    #[inline]
    fn index(&self, i: usize, j: usize) -> usize {
        assert!(i < self.mat.rows && j < self.mat.cols, "mat32: index out of range");
        self.mat.offset + i * self.mat.stride + j
    }

    /// Element `(i, j)`. Panics when out of range.
    #[inline]
    pub fn at(&self, i: usize, j: usize) -> f32 {
        self.mat.buffer.get(self.index(i, j))
    }

    /// Set element `(i, j)`. Panics when out of range.
    #[inline]
    pub fn set(&mut self, i: usize, j: usize, v: f32) {
        let k = self.index(i, j);
        self.mat.buffer.set(k, v);
    }

    /// The storage descriptor of this matrix.
    pub fn raw_matrix(&self) -> RawGeneral {
        self.mat.clone()
    }

    /// Rows `[i, k)` and columns `[j, l)` as a view sharing storage.
    pub fn slice(&self, i: usize, k: usize, j: usize, l: usize) -> Result<Dense> {
        if k <= i || l <= j || k > self.mat.rows || l > self.mat.cols {
            return Err(MatError::IndexOutOfRange);
        }
        Ok(Self {
            mat: RawGeneral {
                buffer: self.mat.buffer.clone(),
                offset: self.mat.offset + i * self.mat.stride + j,
                rows: k - i,
                cols: l - j,
                stride: self.mat.stride,
            },
        })
    }

    /// Column `j` as a vector view.
    pub fn col_view(&self, j: usize) -> Result<VecDense> {
        VecDense::col_view_of(self, j)
    }

    /// Row `i` as a vector view.
    pub fn row_view(&self, i: usize) -> Result<VecDense> {
        VecDense::row_view_of(self, i)
    }

    /// Transpose view.
    pub fn t(&self) -> Transpose<&Dense> {
        Transpose(self)
    }

    fn rows_vec(&self) -> Vec<f32> {
        let data = self.mat.buffer.borrow();
        let mut out = Vec::with_capacity(self.mat.rows * self.mat.cols);
        for i in 0..self.mat.rows {
            let start = self.mat.offset + i * self.mat.stride;
            out.extend_from_slice(&data[start..start + self.mat.cols]);
        }
        out
    }
}

impl Clone for Dense {
    /// Deep copy with a compact stride.
    fn clone(&self) -> Self {
        Self {
            mat: RawGeneral {
                buffer: Buffer::new(self.rows_vec()),
                offset: 0,
                rows: self.mat.rows,
                cols: self.mat.cols,
                stride: self.mat.cols,
            },
        }
    }
}

impl fmt::Debug for Dense {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dense")
            .field("rows", &self.mat.rows)
            .field("cols", &self.mat.cols)
            .field("data", &self.rows_vec())
            .finish()
    }
}

impl Matrix for Dense {
    #[inline]
    fn dims(&self) -> (usize, usize) {
        Dense::dims(self)
    }

    #[inline]
    fn at(&self, i: usize, j: usize) -> f32 {
        Dense::at(self, i, j)
    }

    fn raw_form(&self) -> RawForm {
        RawForm::General(self.mat.clone())
    }
}
