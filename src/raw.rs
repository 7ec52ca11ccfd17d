//! Raw storage descriptors.
//!
//! A [`Buffer`] is reference-counted `f32` storage. Owners and views hold
//! clones of the same `Buffer`, so two descriptors alias exactly when their
//! buffers are pointer-equal and their element ranges intersect. The
//! descriptors here are what a type hands to the vector engine to opt into
//! the fast path (see [`RawForm`](crate::RawForm)).

use core::cell::{Ref, RefCell, RefMut};
use core::fmt;
use core::ops::Range;
use std::rc::Rc;

use crate::error::{MatError, Result};

/// Shared single-precision storage.
///
/// Cloning a `Buffer` clones the handle, not the data.
///
/// ```
/// use mat32::raw::Buffer;
///
/// let a = Buffer::new(vec![1.0, 2.0]);
/// let b = a.clone();
/// b.set(0, 5.0);
/// assert_eq!(a.get(0), 5.0);
/// assert!(a.ptr_eq(&b));
/// ```
#[derive(Clone, Default)]
pub struct Buffer(Rc<RefCell<Vec<f32>>>);

impl Buffer {
    /// Wrap `data` as shared storage.
    pub fn new(data: Vec<f32>) -> Self {
        Self(Rc::new(RefCell::new(data)))
    }

    /// Number of stored elements.
    #[inline]
    pub fn len(&self) -> usize {
        self.0.borrow().len()
    }

    /// Whether the buffer holds no elements.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Read element `i` of the storage.
    #[inline]
    pub fn get(&self, i: usize) -> f32 {
        self.0.borrow()[i]
    }

    /// Write element `i` of the storage.
    #[inline]
    pub fn set(&self, i: usize, v: f32) {
        self.0.borrow_mut()[i] = v;
    }

    /// Whether both handles refer to the same storage.
    #[inline]
    pub fn ptr_eq(&self, other: &Buffer) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    #[inline]
    pub(crate) fn borrow(&self) -> Ref<'_, Vec<f32>> {
        self.0.borrow()
    }

    #[inline]
    pub(crate) fn borrow_mut(&self) -> RefMut<'_, Vec<f32>> {
        self.0.borrow_mut()
    }

    /// The storage, if this is the only handle to it.
    #[inline]
    pub(crate) fn exclusive_mut(&mut self) -> Option<&mut Vec<f32>> {
        Rc::get_mut(&mut self.0).map(RefCell::get_mut)
    }

    /// Unwrap the storage if this is the only handle to it.
    pub(crate) fn try_into_inner(self) -> Option<Vec<f32>> {
        Rc::try_unwrap(self.0).ok().map(RefCell::into_inner)
    }
}

impl fmt::Debug for Buffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Buffer").field("len", &self.len()).finish()
    }
}

/// A strided run of `len` elements starting at `offset` in `buffer`.
///
/// Logical element `i` lives at storage index `offset + i * inc`.
#[derive(Clone, Debug)]
pub struct RawVector {
    pub buffer: Buffer,
    pub offset: usize,
    pub inc: usize,
    pub len: usize,
}

impl RawVector {
    /// Number of storage elements from the first to the last logical element.
    #[inline]
    pub fn extent(&self) -> usize {
        if self.len == 0 {
            0
        } else {
            (self.len - 1) * self.inc + 1
        }
    }

    /// Half-open range of storage indices touched by this vector.
    #[inline]
    pub fn span(&self) -> Range<usize> {
        self.offset..self.offset + self.extent()
    }

    /// Whether `other` describes exactly the same elements.
    #[inline]
    pub fn same_region(&self, other: &RawVector) -> bool {
        self.buffer.ptr_eq(&other.buffer)
            && self.offset == other.offset
            && self.inc == other.inc
            && self.len == other.len
    }

    /// The storage window starting at the first logical element.
    #[inline]
    pub(crate) fn window<'a>(&self, data: &'a [f32]) -> &'a [f32] {
        &data[self.span()]
    }

    #[inline]
    pub(crate) fn window_mut<'a>(&self, data: &'a mut [f32]) -> &'a mut [f32] {
        &mut data[self.span()]
    }

    /// Copy the logical elements into a new contiguous vector.
    pub(crate) fn gather(&self) -> Vec<f32> {
        let data = self.buffer.borrow();
        let mut out = vec![0.0; self.len];
        crate::simd::copy_inc(self.window(&data), &mut out, self.len, self.inc, 1);
        out
    }

    /// A unit-stride copy of this vector in storage of its own.
    pub(crate) fn detached(&self) -> RawVector {
        RawVector {
            buffer: Buffer::new(self.gather()),
            offset: 0,
            inc: 1,
            len: self.len,
        }
    }
}

/// Row-major general matrix descriptor.
///
/// Element `(i, j)` lives at storage index `offset + i * stride + j`.
#[derive(Clone, Debug)]
pub struct RawGeneral {
    pub buffer: Buffer,
    pub offset: usize,
    pub rows: usize,
    pub cols: usize,
    pub stride: usize,
}

impl RawGeneral {
    /// Half-open range of storage indices touched by this matrix.
    pub fn span(&self) -> Range<usize> {
        if self.rows == 0 || self.cols == 0 {
            return self.offset..self.offset;
        }
        self.offset..self.offset + (self.rows - 1) * self.stride + self.cols
    }

    /// The matrix as a vector, when it has a single row or a single column.
    pub(crate) fn as_vector(&self) -> Option<RawVector> {
        if self.rows == 1 {
            Some(RawVector {
                buffer: self.buffer.clone(),
                offset: self.offset,
                inc: 1,
                len: self.cols,
            })
        } else if self.cols == 1 {
            Some(RawVector {
                buffer: self.buffer.clone(),
                offset: self.offset,
                inc: self.stride,
                len: self.rows,
            })
        } else {
            None
        }
    }
}

/// Which triangle of a square matrix is stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Uplo {
    Upper,
    Lower,
}

/// Whether the diagonal is stored or implicitly all ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Diag {
    NonUnit,
    Unit,
}

/// Row-major triangular matrix descriptor.
#[derive(Clone, Debug)]
pub struct RawTriangular {
    pub buffer: Buffer,
    pub offset: usize,
    pub n: usize,
    pub stride: usize,
    pub uplo: Uplo,
    pub diag: Diag,
}

impl RawTriangular {
    /// The full square this triangle is stored in.
    pub fn as_general(&self) -> RawGeneral {
        RawGeneral {
            buffer: self.buffer.clone(),
            offset: self.offset,
            rows: self.n,
            cols: self.n,
            stride: self.stride,
        }
    }
}

/// How a source operand's storage relates to a receiver's.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Alias {
    /// Different buffers.
    Independent,
    /// Same buffer, no element in common.
    Disjoint,
    /// Same buffer, exactly the same elements.
    Identical,
}

impl Alias {
    #[inline]
    pub(crate) fn shares_buffer(self) -> bool {
        self != Alias::Independent
    }
}

#[inline]
fn ranges_intersect(a: &Range<usize>, b: &Range<usize>) -> bool {
    a.start < b.end && b.start < a.end
}

/// Classify `src` against the receiver `dst`.
///
/// Partial overlap fails with [`MatError::Overlap`]: the kernels assume two
/// operands are either the same elements or no common elements at all.
/// Interleaved vectors (equal increments, offsets in different residue
/// classes) share no element and are accepted. Overlapping spans with
/// different increments are assumed to collide.
pub(crate) fn check_overlap(dst: &RawVector, src: &RawVector) -> Result<Alias> {
    if !dst.buffer.ptr_eq(&src.buffer) {
        return Ok(Alias::Independent);
    }
    if dst.len == 0 || src.len == 0 {
        return Ok(Alias::Disjoint);
    }
    if dst.offset == src.offset {
        if dst.inc == src.inc && dst.len == src.len {
            return Ok(Alias::Identical);
        }
        return Err(overlap());
    }
    if !ranges_intersect(&dst.span(), &src.span()) {
        return Ok(Alias::Disjoint);
    }
    if dst.inc == src.inc && dst.offset.abs_diff(src.offset) % dst.inc != 0 {
        return Ok(Alias::Disjoint);
    }
    Err(overlap())
}

/// Classify a matrix operand against the receiver `dst`.
///
/// A matrix is never the same object as a vector receiver, so any shared
/// element is an overlap. A receiver that walks one column of the matrix's
/// storage (increment equal to the row stride) is disjoint when that column
/// lies outside the matrix's column range.
pub(crate) fn check_overlap_general(dst: &RawVector, a: &RawGeneral) -> Result<Alias> {
    if !dst.buffer.ptr_eq(&a.buffer) {
        return Ok(Alias::Independent);
    }
    if dst.len == 0 || a.rows == 0 || a.cols == 0 {
        return Ok(Alias::Disjoint);
    }
    if !ranges_intersect(&dst.span(), &a.span()) {
        return Ok(Alias::Disjoint);
    }
    if dst.inc == a.stride && a.cols < a.stride {
        let col = dst.offset % a.stride;
        let first = a.offset % a.stride;
        let inside = (0..a.cols).any(|j| (first + j) % a.stride == col);
        if !inside {
            return Ok(Alias::Disjoint);
        }
    }
    Err(overlap())
}

fn overlap() -> MatError {
    tracing::debug!("rejecting partially overlapping operands");
    MatError::Overlap
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(buffer: &Buffer, offset: usize, inc: usize, len: usize) -> RawVector {
        RawVector {
            buffer: buffer.clone(),
            offset,
            inc,
            len,
        }
    }

    #[test]
    fn different_buffers_are_independent() {
        let a = Buffer::new(vec![0.0; 4]);
        let b = Buffer::new(vec![0.0; 4]);
        assert_eq!(check_overlap(&raw(&a, 0, 1, 4), &raw(&b, 0, 1, 4)), Ok(Alias::Independent));
    }

    #[test]
    fn same_region_is_identical() {
        let a = Buffer::new(vec![0.0; 8]);
        assert_eq!(check_overlap(&raw(&a, 2, 2, 3), &raw(&a, 2, 2, 3)), Ok(Alias::Identical));
    }

    #[test]
    fn same_start_different_shape_overlaps() {
        let a = Buffer::new(vec![0.0; 8]);
        assert_eq!(check_overlap(&raw(&a, 0, 1, 4), &raw(&a, 0, 1, 3)), Err(MatError::Overlap));
        assert_eq!(check_overlap(&raw(&a, 0, 1, 4), &raw(&a, 0, 2, 4)), Err(MatError::Overlap));
    }

    #[test]
    fn separated_spans_are_disjoint() {
        let a = Buffer::new(vec![0.0; 8]);
        assert_eq!(check_overlap(&raw(&a, 0, 1, 4), &raw(&a, 4, 1, 4)), Ok(Alias::Disjoint));
    }

    #[test]
    fn shifted_unit_stride_overlaps() {
        let a = Buffer::new(vec![0.0; 8]);
        assert_eq!(check_overlap(&raw(&a, 0, 1, 4), &raw(&a, 2, 1, 4)), Err(MatError::Overlap));
    }

    #[test]
    fn interleaved_columns_are_disjoint() {
        // Two columns of a 3x3 row-major matrix.
        let a = Buffer::new(vec![0.0; 9]);
        assert_eq!(check_overlap(&raw(&a, 0, 3, 3), &raw(&a, 1, 3, 3)), Ok(Alias::Disjoint));
        // Same residue class, shifted by a full row: shares elements.
        assert_eq!(check_overlap(&raw(&a, 0, 3, 2), &raw(&a, 3, 3, 2)), Err(MatError::Overlap));
    }

    #[test]
    fn mismatched_strides_assumed_overlapping() {
        let a = Buffer::new(vec![0.0; 12]);
        assert_eq!(check_overlap(&raw(&a, 0, 3, 4), &raw(&a, 1, 2, 4)), Err(MatError::Overlap));
    }

    #[test]
    fn general_overlap_rules() {
        // 3x4 buffer, matrix is the left 3x2 block; vectors walk columns.
        let buf = Buffer::new(vec![0.0; 12]);
        let a = RawGeneral {
            buffer: buf.clone(),
            offset: 0,
            rows: 3,
            cols: 2,
            stride: 4,
        };
        assert_eq!(check_overlap_general(&raw(&buf, 3, 4, 3), &a), Ok(Alias::Disjoint));
        assert_eq!(check_overlap_general(&raw(&buf, 1, 4, 3), &a), Err(MatError::Overlap));
        let other = Buffer::new(vec![0.0; 3]);
        assert_eq!(check_overlap_general(&raw(&other, 0, 1, 3), &a), Ok(Alias::Independent));
    }

    #[test]
    fn gather_and_detach() {
        let a = Buffer::new(vec![1.0, 9.0, 2.0, 9.0, 3.0]);
        let v = raw(&a, 0, 2, 3);
        assert_eq!(v.gather(), vec![1.0, 2.0, 3.0]);
        let d = v.detached();
        assert!(!d.buffer.ptr_eq(&a));
        assert_eq!((d.offset, d.inc, d.len), (0, 1, 3));
    }

    #[test]
    fn general_as_vector() {
        let buf = Buffer::new((0..6).map(|i| i as f32).collect());
        let row = RawGeneral {
            buffer: buf.clone(),
            offset: 3,
            rows: 1,
            cols: 3,
            stride: 3,
        };
        let v = row.as_vector().unwrap();
        assert_eq!(v.gather(), vec![3.0, 4.0, 5.0]);
        let col = RawGeneral {
            buffer: buf,
            offset: 1,
            rows: 2,
            cols: 1,
            stride: 3,
        };
        assert_eq!(col.as_vector().unwrap().gather(), vec![1.0, 4.0]);
    }
}
