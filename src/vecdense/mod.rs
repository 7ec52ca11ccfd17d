mod mul;
mod norm;
mod ops;

pub use norm::{dot, l2_distance};

use core::fmt;

use crate::dense::Dense;
use crate::error::{MatError, Result};
use crate::raw::{Buffer, RawGeneral, RawVector};
use crate::simd;
use crate::traits::{Matrix, RawForm, Vector};
use crate::transpose::{Transpose, TransposeVec};

/// Dense single-precision column vector with an explicit increment.
///
/// A `VecDense` either owns its storage or is a view sharing storage with
/// other vectors (see [`slice_vec`](Self::slice_vec),
/// [`col_view_of`](Self::col_view_of), [`view`](Self::view)). Writes through
/// any handle are visible through every other handle on the same elements.
///
/// The zero value ([`VecDense::empty`], `Default`) has no length and no
/// increment. The first arithmetic operation on it sizes it to the result;
/// an already sized receiver must match the result length.
///
/// ```
/// use mat32::VecDense;
///
/// let a = VecDense::from_slice(&[1.0, 2.0, 3.0]);
/// let b = VecDense::from_slice(&[4.0, 5.0, 6.0]);
///
/// let mut c = VecDense::empty();
/// c.add_vec(&a, &b).unwrap();
/// assert_eq!(c.to_vec(), vec![5.0, 7.0, 9.0]);
///
/// // A sized receiver rejects a result of a different length.
/// let mut d = VecDense::zeros(2);
/// assert!(d.add_vec(&a, &b).is_err());
/// ```
pub struct VecDense {
    pub(crate) mat: RawVector,
}

impl VecDense {
    /// Create a vector of length `n`.
    ///
    /// With `data == None` the vector is zero-filled; otherwise `data` becomes
    /// the backing storage and must hold exactly `n` elements. `n == 0` without
    /// data yields the zero value.
    ///
    /// ```
    /// use mat32::{MatError, VecDense};
    ///
    /// let v = VecDense::new(3, Some(vec![1.0, 2.0, 3.0])).unwrap();
    /// assert_eq!(v.len(), 3);
    /// assert_eq!(VecDense::new(3, Some(vec![1.0, 2.0])).unwrap_err(), MatError::Shape);
    /// ```
    pub fn new(n: usize, data: Option<Vec<f32>>) -> Result<Self> {
        let data = match data {
            Some(d) if d.len() != n => return Err(MatError::Shape),
            Some(d) => d,
            None => vec![0.0; n],
        };
        Ok(Self::from_buffer(data))
    }

    /// Zero vector of length `n`.
    pub fn zeros(n: usize) -> Self {
        Self::from_buffer(vec![0.0; n])
    }

    /// Create a vector holding a copy of `data`.
    pub fn from_slice(data: &[f32]) -> Self {
        Self::from_buffer(data.to_vec())
    }

    /// Create a vector backed by `data`.
    pub fn from_vec(data: Vec<f32>) -> Self {
        Self::from_buffer(data)
    }

    /// The zero value: no length, no increment, no storage.
    pub fn empty() -> Self {
        Self {
            mat: RawVector {
                buffer: Buffer::default(),
                offset: 0,
                inc: 0,
                len: 0,
            },
        }
    }

    pub(crate) fn from_buffer(data: Vec<f32>) -> Self {
        if data.is_empty() {
            return Self::empty();
        }
        let len = data.len();
        Self {
            mat: RawVector {
                buffer: Buffer::new(data),
                offset: 0,
                inc: 1,
                len,
            },
        }
    }

    /// Wrap an existing descriptor; the vector shares its storage.
    pub(crate) fn from_raw(mat: RawVector) -> Self {
        if mat.len == 0 {
            return Self::empty();
        }
        Self { mat }
    }

    /// The backing storage, if this vector owns all of it exclusively with
    /// unit increment.
    pub(crate) fn into_buffer(self) -> Option<Vec<f32>> {
        let RawVector { buffer, offset, inc, len } = self.mat;
        if offset != 0 || inc != 1 || len != buffer.len() {
            return None;
        }
        buffer.try_into_inner()
    }

    /// Number of elements.
    #[inline]
    pub fn len(&self) -> usize {
        self.mat.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.mat.len == 0
    }

    /// Whether the vector is the zero value (no length, no increment).
    #[inline]
    pub fn is_zero(&self) -> bool {
        self.mat.inc == 0
    }

    /// Number of elements reachable from the first element at the current
    /// increment.
    pub fn cap(&self) -> usize {
        if self.is_zero() {
            return 0;
        }
        let avail = self.mat.buffer.len().saturating_sub(self.mat.offset);
        if avail == 0 {
            return 0;
        }
        (avail - 1) / self.mat.inc + 1
    }

    /// `(len, 1)`.
    #[inline]
    pub fn dims(&self) -> (usize, usize) {
        if self.is_zero() {
            return (0, 0);
        }
        (self.mat.len, 1)
    }

    /// `(cap, 1)`.
    pub fn caps(&self) -> (usize, usize) {
        if self.is_zero() {
            return (0, 0);
        }
        (self.cap(), 1)
    }

    /// Return the vector to the zero value.
    ///
    /// Storage owned exclusively is kept for the next sizing. Storage shared
    /// with other handles is released, so the vector can never write into
    /// another handle's elements after a reset.
    pub fn reset(&mut self) {
        if self.mat.buffer.exclusive_mut().is_none() {
            self.mat.buffer = Buffer::default();
        }
        self.mat.offset = 0;
        self.mat.inc = 0;
        self.mat.len = 0;
    }

    /// Size the zero value to `r` zeroed elements, or check that a sized
    /// vector already has length `r`.
    pub(crate) fn reuse_as(&mut self, r: usize) -> Result<()> {
        if r == 0 {
            return Err(MatError::ZeroLength);
        }
        if !self.is_zero() {
            if r != self.mat.len {
                return Err(MatError::Shape);
            }
            return Ok(());
        }
        match self.mat.buffer.exclusive_mut() {
            Some(data) => {
                data.clear();
                data.resize(r, 0.0);
            }
            None => self.mat.buffer = Buffer::new(vec![0.0; r]),
        }
        self.mat.offset = 0;
        self.mat.inc = 1;
        self.mat.len = r;
        Ok(())
    }

    /// A view of elements `[i, k)`, sharing storage with `self`.
    ///
    /// `k` may reach past `len` up to [`cap`](Self::cap).
    ///
    /// ```
    /// use mat32::VecDense;
    ///
    /// let v = VecDense::from_slice(&[0.0, 1.0, 2.0, 3.0]);
    /// let mut s = v.slice_vec(1, 3).unwrap();
    /// assert_eq!(s.to_vec(), vec![1.0, 2.0]);
    /// s.set_vec(0, 10.0);
    /// assert_eq!(v.at_vec(1), 10.0);
    /// ```
    pub fn slice_vec(&self, i: usize, k: usize) -> Result<VecDense> {
        if k <= i || self.cap() < k {
            return Err(MatError::IndexOutOfRange);
        }
        Ok(Self {
            mat: RawVector {
                buffer: self.mat.buffer.clone(),
                offset: self.mat.offset + i * self.mat.inc,
                inc: self.mat.inc,
                len: k - i,
            },
        })
    }

    /// A second handle on exactly the elements of `self`.
    ///
    /// This is how a receiver names itself as an operand:
    ///
    /// ```
    /// use mat32::VecDense;
    ///
    /// let mut v = VecDense::from_slice(&[1.0, 2.0]);
    /// let w = v.view();
    /// v.add_vec(&w, &w).unwrap();
    /// assert_eq!(v.to_vec(), vec![2.0, 4.0]);
    /// ```
    pub fn view(&self) -> VecDense {
        Self {
            mat: self.mat.clone(),
        }
    }

    /// Column `j` of `a` as a view.
    pub fn col_view_of(a: &Dense, j: usize) -> Result<VecDense> {
        let raw = a.raw_matrix();
        if j >= raw.cols {
            return Err(MatError::IndexOutOfRange);
        }
        Ok(Self::from_raw(RawVector {
            buffer: raw.buffer,
            offset: raw.offset + j,
            inc: raw.stride,
            len: raw.rows,
        }))
    }

    /// Row `i` of `a` as a view.
    pub fn row_view_of(a: &Dense, i: usize) -> Result<VecDense> {
        let raw = a.raw_matrix();
        if i >= raw.rows {
            return Err(MatError::IndexOutOfRange);
        }
        Ok(Self::from_raw(RawVector {
            buffer: raw.buffer,
            offset: raw.offset + i * raw.stride,
            inc: 1,
            len: raw.cols,
        }))
    }

    /// Element `i`. Panics when `i >= len`.
    #[inline]
    pub fn at_vec(&self, i: usize) -> f32 {
        assert!(i < self.mat.len, "mat32: index out of range");
        self.mat.buffer.get(self.mat.offset + i * self.mat.inc)
    }

    /// Set element `i`. Panics when `i >= len`.
    #[inline]
    pub fn set_vec(&mut self, i: usize, v: f32) {
        assert!(i < self.mat.len, "mat32: index out of range");
        self.mat.buffer.set(self.mat.offset + i * self.mat.inc, v);
    }

    /// The elements as a contiguous `Vec`.
    pub fn to_vec(&self) -> Vec<f32> {
        self.mat.gather()
    }

    /// The storage descriptor of this vector.
    pub fn raw_vector(&self) -> RawVector {
        self.mat.clone()
    }

    /// The vector as a `len x 1` general matrix over the same storage.
    pub fn as_general(&self) -> RawGeneral {
        RawGeneral {
            buffer: self.mat.buffer.clone(),
            offset: self.mat.offset,
            rows: self.mat.len,
            cols: 1,
            stride: self.mat.inc,
        }
    }

    /// The vector as a `1 x len` matrix.
    pub fn t(&self) -> Transpose<&VecDense> {
        Transpose(self)
    }

    /// The vector as a `1 x len` row vector.
    pub fn t_vec(&self) -> TransposeVec<&VecDense> {
        TransposeVec(self)
    }

    /// Make `self` a unit-stride copy of `a`, resizing it to `a.len()`.
    ///
    /// Storage shared with other handles is not written; the receiver gets
    /// storage of its own instead.
    pub fn clone_vec(&mut self, a: &dyn Vector) {
        if let Some(raw) = a.raw_vector() {
            if raw.same_region(&self.mat) {
                return;
            }
        }
        let values = gather(a);
        if values.is_empty() {
            self.reset();
            return;
        }
        let len = values.len();
        match self.mat.buffer.exclusive_mut() {
            Some(data) => {
                data.clear();
                data.extend_from_slice(&values);
            }
            None => self.mat.buffer = Buffer::new(values),
        }
        self.mat.offset = 0;
        self.mat.inc = 1;
        self.mat.len = len;
    }

    /// Copy the first `min(self.len(), a.len())` elements of `a` into `self`
    /// and return how many were copied.
    ///
    /// ```
    /// use mat32::VecDense;
    ///
    /// let mut v = VecDense::zeros(2);
    /// let n = v.copy_vec(&VecDense::from_slice(&[7.0, 8.0, 9.0]));
    /// assert_eq!(n, 2);
    /// assert_eq!(v.to_vec(), vec![7.0, 8.0]);
    /// ```
    pub fn copy_vec(&mut self, a: &dyn Vector) -> usize {
        let n = self.len().min(a.len());
        if n == 0 {
            return 0;
        }
        let Some(src) = a.raw_vector() else {
            for i in 0..n {
                let v = a.at_vec(i);
                self.set_vec(i, v);
            }
            return n;
        };
        if src.same_region(&self.mat) {
            return n;
        }
        if src.buffer.ptr_eq(&self.mat.buffer) {
            // Overlapping strided runs: read everything before writing.
            let values = src.gather();
            let mut data = self.mat.buffer.borrow_mut();
            let dst = self.mat.window_mut(&mut data);
            simd::copy_inc(&values, dst, n, 1, self.mat.inc);
            return n;
        }
        let sd = src.buffer.borrow();
        let mut data = self.mat.buffer.borrow_mut();
        let dst = self.mat.window_mut(&mut data);
        simd::copy_inc(src.window(&sd), dst, n, src.inc, self.mat.inc);
        n
    }

    /// A new vector holding a copy of `a`.
    pub fn copy_of(a: &dyn Vector) -> VecDense {
        let mut v = VecDense::empty();
        v.clone_vec(a);
        v
    }
}

/// Elements of any vector, in order.
pub(crate) fn gather(a: &dyn Vector) -> Vec<f32> {
    match a.raw_vector() {
        Some(raw) => raw.gather(),
        None => (0..a.len()).map(|i| a.at_vec(i)).collect(),
    }
}

impl Default for VecDense {
    fn default() -> Self {
        Self::empty()
    }
}

impl Clone for VecDense {
    /// Deep copy. Use [`VecDense::view`] for a handle on the same storage.
    fn clone(&self) -> Self {
        Self::from_buffer(self.to_vec())
    }
}

impl PartialEq for VecDense {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && (0..self.len()).all(|i| self.at_vec(i) == other.at_vec(i))
    }
}

impl fmt::Debug for VecDense {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VecDense")
            .field("data", &self.to_vec())
            .field("inc", &self.mat.inc)
            .finish()
    }
}

impl From<Vec<f32>> for VecDense {
    fn from(data: Vec<f32>) -> Self {
        Self::from_vec(data)
    }
}

impl Matrix for VecDense {
    #[inline]
    fn dims(&self) -> (usize, usize) {
        VecDense::dims(self)
    }

    #[inline]
    fn at(&self, i: usize, j: usize) -> f32 {
        assert!(j == 0, "mat32: index out of range");
        self.at_vec(i)
    }

    fn raw_form(&self) -> RawForm {
        RawForm::Vector(self.mat.clone())
    }

    fn as_vector(&self) -> Option<&dyn Vector> {
        Some(self)
    }
}

impl Vector for VecDense {
    #[inline]
    fn len(&self) -> usize {
        self.mat.len
    }

    #[inline]
    fn at_vec(&self, i: usize) -> f32 {
        VecDense::at_vec(self, i)
    }

    fn raw_vector(&self) -> Option<RawVector> {
        Some(self.mat.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_checks_length() {
        assert_eq!(VecDense::new(3, Some(vec![1.0, 2.0])).unwrap_err(), MatError::Shape);
        let v = VecDense::new(3, None).unwrap();
        assert_eq!(v.to_vec(), vec![0.0; 3]);
        assert!(VecDense::new(0, None).unwrap().is_zero());
    }

    #[test]
    fn zero_value_has_no_increment() {
        let v = VecDense::empty();
        assert!(v.is_zero());
        assert_eq!(v.len(), 0);
        assert_eq!(v.cap(), 0);
        assert_eq!(v.dims(), (0, 0));
        assert!(VecDense::default().is_zero());
    }

    #[test]
    fn reuse_as_sizes_zero_value_once() {
        let mut v = VecDense::empty();
        v.reuse_as(4).unwrap();
        assert_eq!((v.len(), v.mat.inc), (4, 1));
        assert_eq!(v.reuse_as(4), Ok(()));
        assert_eq!(v.reuse_as(3), Err(MatError::Shape));
        assert_eq!(v.reuse_as(0), Err(MatError::ZeroLength));
    }

    #[test]
    fn reset_clears_length_and_increment_together() {
        let mut v = VecDense::from_slice(&[1.0, 2.0, 3.0]);
        v.reset();
        assert!(v.is_zero());
        assert_eq!(v.len(), 0);
        v.reuse_as(2).unwrap();
        assert_eq!(v.to_vec(), vec![0.0, 0.0]);
    }

    #[test]
    fn reset_view_detaches() {
        let owner = VecDense::from_slice(&[1.0, 2.0, 3.0, 4.0]);
        let mut s = owner.slice_vec(1, 3).unwrap();
        s.reset();
        s.reuse_as(2).unwrap();
        s.set_vec(0, 99.0);
        assert_eq!(owner.to_vec(), vec![1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn slice_bounds() {
        let v = VecDense::from_slice(&[0.0, 1.0, 2.0, 3.0]);
        assert_eq!(v.slice_vec(2, 2).unwrap_err(), MatError::IndexOutOfRange);
        assert_eq!(v.slice_vec(3, 1).unwrap_err(), MatError::IndexOutOfRange);
        assert_eq!(v.slice_vec(0, 5).unwrap_err(), MatError::IndexOutOfRange);
        assert_eq!(VecDense::empty().slice_vec(0, 1).unwrap_err(), MatError::IndexOutOfRange);
    }

    #[test]
    fn slice_up_to_capacity() {
        let v = VecDense::from_slice(&[0.0, 1.0, 2.0, 3.0]);
        let head = v.slice_vec(0, 2).unwrap();
        assert_eq!(head.cap(), 4);
        // Re-slicing past the view's length but within its capacity.
        let wide = head.slice_vec(1, 4).unwrap();
        assert_eq!(wide.to_vec(), vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn strided_capacity() {
        let d = Dense::new(3, 3, Some((0..9).map(|i| i as f32).collect())).unwrap();
        let col = VecDense::col_view_of(&d, 1).unwrap();
        assert_eq!(col.to_vec(), vec![1.0, 4.0, 7.0]);
        // 8 storage elements after offset 1: (8 - 1) / 3 + 1
        assert_eq!(col.cap(), 3);
        let s = col.slice_vec(1, 3).unwrap();
        assert_eq!(s.to_vec(), vec![4.0, 7.0]);
    }

    #[test]
    fn views_of_dense() {
        let d = Dense::new(2, 3, Some(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0])).unwrap();
        let mut row = VecDense::row_view_of(&d, 1).unwrap();
        assert_eq!(row.to_vec(), vec![4.0, 5.0, 6.0]);
        row.set_vec(2, -6.0);
        assert_eq!(d.at(1, 2), -6.0);
        assert_eq!(VecDense::row_view_of(&d, 2).unwrap_err(), MatError::IndexOutOfRange);
        assert_eq!(VecDense::col_view_of(&d, 3).unwrap_err(), MatError::IndexOutOfRange);
    }

    #[test]
    fn clone_is_deep_view_is_shared() {
        let mut v = VecDense::from_slice(&[1.0, 2.0]);
        let c = v.clone();
        let w = v.view();
        v.set_vec(0, 5.0);
        assert_eq!(c.at_vec(0), 1.0);
        assert_eq!(w.at_vec(0), 5.0);
    }

    #[test]
    fn clone_vec_resizes_and_detaches() {
        let owner = VecDense::from_slice(&[1.0, 2.0, 3.0]);
        let mut s = owner.slice_vec(0, 1).unwrap();
        s.clone_vec(&VecDense::from_slice(&[7.0, 8.0]));
        assert_eq!(s.to_vec(), vec![7.0, 8.0]);
        assert_eq!(owner.to_vec(), vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn copy_vec_overlapping_shift() {
        let v = VecDense::from_slice(&[1.0, 2.0, 3.0, 4.0]);
        let mut dst = v.slice_vec(1, 4).unwrap();
        let src = v.slice_vec(0, 3).unwrap();
        assert_eq!(dst.copy_vec(&src), 3);
        assert_eq!(v.to_vec(), vec![1.0, 1.0, 2.0, 3.0]);
    }

    #[test]
    fn copy_of_strided() {
        let d = Dense::new(2, 2, Some(vec![1.0, 2.0, 3.0, 4.0])).unwrap();
        let col = VecDense::col_view_of(&d, 0).unwrap();
        let c = VecDense::copy_of(&col);
        assert_eq!(c.to_vec(), vec![1.0, 3.0]);
        assert_eq!(c.mat.inc, 1);
    }

    #[test]
    fn as_general_and_transpose() {
        let v = VecDense::from_slice(&[1.0, 2.0, 3.0]);
        let g = v.as_general();
        assert_eq!((g.rows, g.cols, g.stride), (3, 1, 1));
        assert_eq!(Matrix::dims(&v.t()), (1, 3));
        assert_eq!(Matrix::dims(&v.t_vec()), (1, 3));
    }

    #[test]
    fn into_buffer_requires_exclusive_owner() {
        let v = VecDense::from_slice(&[1.0, 2.0]);
        let w = v.view();
        assert!(v.into_buffer().is_none());
        assert_eq!(w.into_buffer(), Some(vec![1.0, 2.0]));
    }
}
