//! Element-wise arithmetic with aliasing-aware dispatch.
//!
//! Every operation validates shapes, sizes the receiver, then classifies each
//! source against the receiver's storage. When all sources expose raw storage
//! the kernels run directly on it (unit-stride or strided); otherwise a
//! per-element loop through the [`Vector`] accessors does the work.

use tracing::trace;

use super::VecDense;
use crate::error::{MatError, Result};
use crate::raw::{check_overlap, Alias, RawVector};
use crate::simd;
use crate::traits::Vector;

/// A source operand on the fast path.
enum Operand {
    /// Exactly the receiver's elements.
    Receiver,
    /// Storage the receiver never writes.
    Raw(RawVector),
}

impl VecDense {
    /// Classify `src` against the receiver. `None` means `src` has no raw
    /// storage and the slow path must be taken.
    fn resolve(&self, src: &dyn Vector) -> Result<Option<Operand>> {
        let Some(raw) = src.raw_vector() else {
            return Ok(None);
        };
        let op = match check_overlap(&self.mat, &raw)? {
            Alias::Identical => Operand::Receiver,
            Alias::Independent => Operand::Raw(raw),
            // Interleaved with the receiver in one buffer.
            Alias::Disjoint => Operand::Raw(raw.detached()),
        };
        Ok(Some(op))
    }

    /// Resolve both operands. A receiver appearing on both sides keeps its
    /// role on the left and is snapshotted on the right.
    fn resolve_pair(&self, a: &dyn Vector, b: &dyn Vector) -> Result<Option<(Operand, Operand)>> {
        let ra = self.resolve(a)?;
        let rb = self.resolve(b)?;
        Ok(match (ra, rb) {
            (Some(Operand::Receiver), Some(Operand::Receiver)) => {
                Some((Operand::Receiver, Operand::Raw(self.mat.detached())))
            }
            (Some(ra), Some(rb)) => Some((ra, rb)),
            _ => None,
        })
    }

    /// Set `self` to `alpha * a`.
    ///
    /// ```
    /// use mat32::VecDense;
    ///
    /// let a = VecDense::from_slice(&[1.0, -2.0]);
    /// let mut v = VecDense::empty();
    /// v.scale_vec(3.0, &a).unwrap();
    /// assert_eq!(v.to_vec(), vec![3.0, -6.0]);
    /// ```
    pub fn scale_vec(&mut self, alpha: f32, a: &dyn Vector) -> Result<()> {
        let n = a.len();
        self.reuse_as(n)?;
        match self.resolve(a)? {
            Some(Operand::Receiver) => {
                let dst = &self.mat;
                let mut data = dst.buffer.borrow_mut();
                let d = dst.window_mut(&mut data);
                if dst.inc == 1 {
                    trace!(op = "scale_vec", path = "unit", n, "in place");
                    simd::scal_unitary(alpha, d);
                } else {
                    trace!(op = "scale_vec", path = "strided", n, "in place");
                    simd::scal_inc(alpha, d, n, dst.inc);
                }
            }
            Some(Operand::Raw(x)) => {
                let dst = &self.mat;
                let xd = x.buffer.borrow();
                let xs = x.window(&xd);
                let mut data = dst.buffer.borrow_mut();
                let d = dst.window_mut(&mut data);
                if dst.inc == 1 && x.inc == 1 {
                    trace!(op = "scale_vec", path = "unit", n);
                    simd::scal_unitary_to(d, alpha, xs);
                } else {
                    trace!(op = "scale_vec", path = "strided", n);
                    simd::scal_inc_to(d, dst.inc, alpha, xs, n, x.inc);
                }
            }
            None => {
                trace!(op = "scale_vec", path = "slow", n);
                for i in 0..n {
                    let v = alpha * a.at_vec(i);
                    self.set_vec(i, v);
                }
            }
        }
        Ok(())
    }

    /// Set `self` to `a + alpha * b`.
    ///
    /// `alpha == 1` and `alpha == -1` are exactly [`add_vec`](Self::add_vec)
    /// and [`sub_vec`](Self::sub_vec); `alpha == 0` copies `a`.
    ///
    /// ```
    /// use mat32::VecDense;
    ///
    /// let a = VecDense::from_slice(&[1.0, 1.0]);
    /// let b = VecDense::from_slice(&[2.0, 4.0]);
    /// let mut v = VecDense::empty();
    /// v.add_scaled_vec(&a, 0.5, &b).unwrap();
    /// assert_eq!(v.to_vec(), vec![2.0, 3.0]);
    /// ```
    pub fn add_scaled_vec(&mut self, a: &dyn Vector, alpha: f32, b: &dyn Vector) -> Result<()> {
        if alpha == 1.0 {
            return self.add_vec(a, b);
        }
        if alpha == -1.0 {
            return self.sub_vec(a, b);
        }
        if alpha != 0.0 {
            return self.axpy_dispatch("add_scaled_vec", a, alpha, b);
        }

        let n = a.len();
        if n != b.len() {
            return Err(MatError::Shape);
        }
        self.reuse_as(n)?;
        // b is never read, but its storage must still be legal.
        self.resolve(b)?;
        match self.resolve(a)? {
            Some(Operand::Receiver) => {
                trace!(op = "add_scaled_vec", path = "identity", n);
            }
            Some(Operand::Raw(x)) => {
                trace!(op = "add_scaled_vec", path = "copy", n);
                let xd = x.buffer.borrow();
                let mut data = self.mat.buffer.borrow_mut();
                let d = self.mat.window_mut(&mut data);
                simd::copy_inc(x.window(&xd), d, n, x.inc, self.mat.inc);
            }
            None => {
                trace!(op = "add_scaled_vec", path = "slow", n);
                for i in 0..n {
                    let v = a.at_vec(i);
                    self.set_vec(i, v);
                }
            }
        }
        Ok(())
    }

    /// Set `self` to `a + b`.
    pub fn add_vec(&mut self, a: &dyn Vector, b: &dyn Vector) -> Result<()> {
        self.axpy_dispatch("add_vec", a, 1.0, b)
    }

    /// Set `self` to `a - b`.
    ///
    /// ```
    /// use mat32::VecDense;
    ///
    /// let a = VecDense::from_slice(&[1.0, 2.0, 3.0]);
    /// let mut d = VecDense::empty();
    /// d.sub_vec(&a, &a).unwrap();
    /// assert_eq!(d.to_vec(), vec![0.0; 3]);
    /// ```
    pub fn sub_vec(&mut self, a: &dyn Vector, b: &dyn Vector) -> Result<()> {
        self.axpy_dispatch("sub_vec", a, -1.0, b)
    }

    /// `self = a + alpha * b` for any `alpha`.
    ///
    /// Each fast branch evaluates `alpha * b[i] + a[i]` with one rounding per
    /// operation, so `alpha = ±1` reproduces plain addition and subtraction.
    fn axpy_dispatch(&mut self, op: &'static str, a: &dyn Vector, alpha: f32, b: &dyn Vector) -> Result<()> {
        let n = a.len();
        if n != b.len() {
            return Err(MatError::Shape);
        }
        self.reuse_as(n)?;

        let Some(pair) = self.resolve_pair(a, b)? else {
            trace!(op, path = "slow", n);
            for i in 0..n {
                let v = alpha * b.at_vec(i) + a.at_vec(i);
                self.set_vec(i, v);
            }
            return Ok(());
        };

        let dst = &self.mat;
        let mut data = dst.buffer.borrow_mut();
        let d = dst.window_mut(&mut data);
        match pair {
            (Operand::Receiver, Operand::Raw(y)) => {
                let yd = y.buffer.borrow();
                let ys = y.window(&yd);
                if dst.inc == 1 && y.inc == 1 {
                    trace!(op, path = "unit", n, "accumulate into receiver");
                    simd::axpy_unitary(alpha, ys, d);
                } else {
                    trace!(op, path = "strided", n, "accumulate into receiver");
                    simd::axpy_inc(alpha, ys, d, n, y.inc, dst.inc);
                }
            }
            (Operand::Raw(x), Operand::Receiver) => {
                // self = a + alpha * self
                let xd = x.buffer.borrow();
                let xs = x.window(&xd);
                if dst.inc == 1 && x.inc == 1 {
                    trace!(op, path = "unit", n, "scale receiver then accumulate");
                    simd::scal_unitary(alpha, d);
                    simd::axpy_unitary(1.0, xs, d);
                } else {
                    trace!(op, path = "strided", n, "scale receiver then accumulate");
                    simd::scal_inc(alpha, d, n, dst.inc);
                    simd::axpy_inc(1.0, xs, d, n, x.inc, dst.inc);
                }
            }
            (Operand::Raw(x), Operand::Raw(y)) => {
                let xd = x.buffer.borrow();
                let yd = y.buffer.borrow();
                let (xs, ys) = (x.window(&xd), y.window(&yd));
                if dst.inc == 1 && x.inc == 1 && y.inc == 1 {
                    trace!(op, path = "unit", n);
                    simd::axpy_unitary_to(d, alpha, ys, xs);
                } else {
                    trace!(op, path = "strided", n);
                    simd::axpy_inc_to(d, dst.inc, alpha, ys, xs, n, y.inc, x.inc);
                }
            }
            (Operand::Receiver, Operand::Receiver) => unreachable!("resolve_pair snapshots the right operand"),
        }
        Ok(())
    }

    /// Set `self` to the element-wise product of `a` and `b`.
    pub fn mul_elem_vec(&mut self, a: &dyn Vector, b: &dyn Vector) -> Result<()> {
        self.elementwise("mul_elem_vec", a, b, |x, y| x * y)
    }

    /// Set `self` to the element-wise quotient `a / b`.
    ///
    /// ```
    /// use mat32::VecDense;
    ///
    /// let a = VecDense::from_slice(&[5.0, 10.0, 15.0, 20.0]);
    /// let b = VecDense::from_slice(&[5.0; 4]);
    /// let mut q = VecDense::empty();
    /// q.div_elem_vec(&a, &b).unwrap();
    /// assert_eq!(q.to_vec(), vec![1.0, 2.0, 3.0, 4.0]);
    /// ```
    pub fn div_elem_vec(&mut self, a: &dyn Vector, b: &dyn Vector) -> Result<()> {
        self.elementwise("div_elem_vec", a, b, |x, y| x / y)
    }

    /// `self[i] = f(a[i], b[i])`, taking exactly one of the fast or slow paths.
    fn elementwise(
        &mut self,
        op: &'static str,
        a: &dyn Vector,
        b: &dyn Vector,
        f: impl Fn(f32, f32) -> f32,
    ) -> Result<()> {
        let n = a.len();
        if n != b.len() {
            return Err(MatError::Shape);
        }
        self.reuse_as(n)?;

        let Some(pair) = self.resolve_pair(a, b)? else {
            trace!(op, path = "slow", n);
            for i in 0..n {
                let v = f(a.at_vec(i), b.at_vec(i));
                self.set_vec(i, v);
            }
            return Ok(());
        };

        let dst = &self.mat;
        let mut data = dst.buffer.borrow_mut();
        let d = dst.window_mut(&mut data);
        match pair {
            (Operand::Receiver, Operand::Raw(y)) => {
                let yd = y.buffer.borrow();
                let ys = y.window(&yd);
                if dst.inc == 1 && y.inc == 1 {
                    trace!(op, path = "unit", n, "in place");
                    simd::map_unitary(ys, d, &f);
                } else {
                    trace!(op, path = "strided", n, "in place");
                    simd::map_inc(ys, d, n, y.inc, dst.inc, &f);
                }
            }
            (Operand::Raw(x), Operand::Receiver) => {
                // The kernel passes (receiver, source); the receiver is b here.
                let swapped = |recv: f32, src: f32| f(src, recv);
                let xd = x.buffer.borrow();
                let xs = x.window(&xd);
                if dst.inc == 1 && x.inc == 1 {
                    trace!(op, path = "unit", n, "in place");
                    simd::map_unitary(xs, d, swapped);
                } else {
                    trace!(op, path = "strided", n, "in place");
                    simd::map_inc(xs, d, n, x.inc, dst.inc, swapped);
                }
            }
            (Operand::Raw(x), Operand::Raw(y)) => {
                let xd = x.buffer.borrow();
                let yd = y.buffer.borrow();
                let (xs, ys) = (x.window(&xd), y.window(&yd));
                if dst.inc == 1 && x.inc == 1 && y.inc == 1 {
                    trace!(op, path = "unit", n);
                    simd::map_unitary_to(d, xs, ys, &f);
                } else {
                    trace!(op, path = "strided", n);
                    simd::map_inc_to(d, dst.inc, xs, ys, n, x.inc, y.inc, &f);
                }
            }
            (Operand::Receiver, Operand::Receiver) => unreachable!("resolve_pair snapshots the right operand"),
        }
        Ok(())
    }
}
