//! Matrix-vector product.

use tracing::trace;

use super::{gather, VecDense};
use crate::blas::{self, Trans};
use crate::error::{MatError, Result};
use crate::raw::{check_overlap, check_overlap_general, Alias, RawVector};
use crate::simd;
use crate::traits::{Matrix, RawForm, Vector};
use crate::workspace::WorkspacePool;

impl VecDense {
    /// Set `self` to `a * b`, isolating through the process-wide
    /// [`WorkspacePool`] when the receiver shares storage with an operand.
    ///
    /// ```
    /// use mat32::{Dense, VecDense};
    ///
    /// let a = Dense::new(2, 3, Some(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0])).unwrap();
    /// let b = VecDense::from_slice(&[1.0, 0.0, -1.0]);
    /// let mut v = VecDense::empty();
    /// v.mul_vec(&a, &b).unwrap();
    /// assert_eq!(v.to_vec(), vec![-2.0, -2.0]);
    ///
    /// let mut w = VecDense::empty();
    /// w.mul_vec(&a.t(), &v).unwrap();
    /// assert_eq!(w.to_vec(), vec![-10.0, -14.0, -18.0]);
    /// ```
    pub fn mul_vec(&mut self, a: &dyn Matrix, b: &dyn Vector) -> Result<()> {
        self.mul_vec_in(WorkspacePool::global(), a, b)
    }

    /// [`mul_vec`](Self::mul_vec) with an explicit workspace pool.
    pub fn mul_vec_in(&mut self, pool: &WorkspacePool, a: &dyn Matrix, b: &dyn Vector) -> Result<()> {
        let (r, c) = a.dims();
        let (br, bc) = b.dims();
        if c != br || bc != 1 {
            return Err(MatError::Shape);
        }
        self.reuse_as(r)?;

        if self.shares_operand(a, b)? {
            trace!(rows = r, cols = c, "mul_vec: isolating receiver in workspace");
            let mut work = pool.checkout(r)?;
            work.mul_direct(a, b);
            self.copy_vec(&*work);
            return Ok(());
        }
        self.mul_direct(a, b);
        Ok(())
    }

    /// Whether either operand lives in the receiver's buffer. Partial overlap
    /// is an error.
    fn shares_operand(&self, a: &dyn Matrix, b: &dyn Vector) -> Result<bool> {
        let with_b = match b.raw_vector() {
            Some(raw) => check_overlap(&self.mat, &raw)?,
            None => Alias::Independent,
        };
        let vector_raw = a.as_vector().and_then(|v| v.raw_vector());
        let with_a = match (vector_raw, a.raw_form()) {
            (Some(raw), _) | (None, RawForm::Vector(raw)) => check_overlap(&self.mat, &raw)?,
            (None, RawForm::General(g)) => check_overlap_general(&self.mat, &g)?,
            (None, RawForm::Triangular(t)) => check_overlap_general(&self.mat, &t.as_general())?,
            (None, RawForm::Opaque) => Alias::Independent,
        };
        Ok(with_b.shares_buffer() || with_a.shares_buffer())
    }

    /// `self = a * b` for a sized receiver that shares no storage with either
    /// operand.
    fn mul_direct(&mut self, a: &dyn Matrix, b: &dyn Vector) {
        if let Some(av) = a.as_vector() {
            self.mul_vector_shaped(a, av.raw_vector(), b);
            return;
        }
        match a.raw_form() {
            RawForm::Vector(raw) => self.mul_vector_shaped(a, Some(raw), b),
            RawForm::General(g) if g.rows == 1 || g.cols == 1 => self.mul_vector_shaped(a, g.as_vector(), b),
            RawForm::Triangular(t) => {
                let trans = Trans::from_flag(a.is_transposed());
                trace!(branch = "trmv", n = t.n, ?trans, "mul_vec");
                self.copy_vec(b);
                let ad = t.buffer.borrow();
                let dst = &self.mat;
                let mut data = dst.buffer.borrow_mut();
                let x = dst.window_mut(&mut data);
                blas::trmv(t.uplo, trans, t.diag, t.n, &ad[t.offset..], t.stride, x, dst.inc);
            }
            RawForm::General(g) => {
                let Some(braw) = b.raw_vector() else {
                    self.mul_nested(a, b);
                    return;
                };
                let trans = Trans::from_flag(a.is_transposed());
                trace!(branch = "gemv", rows = g.rows, cols = g.cols, ?trans, "mul_vec");
                let ad = g.buffer.borrow();
                let bd = braw.buffer.borrow();
                let dst = &self.mat;
                let mut data = dst.buffer.borrow_mut();
                let y = dst.window_mut(&mut data);
                blas::gemv(
                    trans,
                    g.rows,
                    g.cols,
                    1.0,
                    &ad[g.offset..],
                    g.stride,
                    braw.window(&bd),
                    braw.inc,
                    0.0,
                    y,
                    dst.inc,
                );
            }
            RawForm::Opaque => self.mul_nested(a, b),
        }
    }

    /// `a` is a single row or a single column.
    fn mul_vector_shaped(&mut self, a: &dyn Matrix, araw: Option<RawVector>, b: &dyn Vector) {
        let (r, c) = a.dims();

        // {r,1} x {1,1}
        if c == 1 {
            let alpha = b.at_vec(0);
            trace!(branch = "scale", rows = r, "mul_vec");
            match araw {
                Some(raw) => {
                    let dst = &self.mat;
                    let ad = raw.buffer.borrow();
                    let mut data = dst.buffer.borrow_mut();
                    let d = dst.window_mut(&mut data);
                    if dst.inc == 1 && raw.inc == 1 {
                        simd::scal_unitary_to(d, alpha, raw.window(&ad));
                    } else {
                        simd::scal_inc_to(d, dst.inc, alpha, raw.window(&ad), r, raw.inc);
                    }
                }
                None => {
                    for i in 0..r {
                        let v = alpha * a.at(i, 0);
                        self.set_vec(i, v);
                    }
                }
            }
            return;
        }

        // {1,c} x {c,1}
        let sum = match (araw, b.raw_vector()) {
            (Some(x), Some(y)) => {
                let xd = x.buffer.borrow();
                let yd = y.buffer.borrow();
                if x.inc == 1 && y.inc == 1 {
                    trace!(branch = "dot", path = "unit", n = c, "mul_vec");
                    simd::dot_unitary(x.window(&xd), y.window(&yd))
                } else {
                    trace!(branch = "dot", path = "strided", n = c, "mul_vec");
                    simd::dot_inc(x.window(&xd), y.window(&yd), c, x.inc, y.inc)
                }
            }
            _ => {
                trace!(branch = "dot", path = "slow", n = c, "mul_vec");
                let mut sum = 0.0;
                for j in 0..c {
                    sum += a.at(0, j) * b.at_vec(j);
                }
                sum
            }
        };
        self.set_vec(0, sum);
    }

    fn mul_nested(&mut self, a: &dyn Matrix, b: &dyn Vector) {
        let (r, c) = a.dims();
        trace!(branch = "nested", rows = r, cols = c, "mul_vec");
        let x = gather(b);
        for i in 0..r {
            let mut sum = 0.0;
            for (j, &xj) in x.iter().enumerate() {
                sum += a.at(i, j) * xj;
            }
            self.set_vec(i, sum);
        }
    }
}
