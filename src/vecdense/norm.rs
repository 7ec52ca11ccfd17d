use tracing::trace;

use super::VecDense;
use crate::error::{MatError, Result};
use crate::simd;
use crate::traits::Vector;

/// Dot product of two vectors of equal length.
///
/// ```
/// use mat32::{dot, VecDense};
///
/// let a = VecDense::from_slice(&[1.0, 2.0, 3.0]);
/// assert_eq!(dot(&a, &a).unwrap(), 14.0);
/// ```
pub fn dot(a: &dyn Vector, b: &dyn Vector) -> Result<f32> {
    let n = a.len();
    if n != b.len() {
        return Err(MatError::Shape);
    }
    if let (Some(x), Some(y)) = (a.raw_vector(), b.raw_vector()) {
        let xd = x.buffer.borrow();
        let yd = y.buffer.borrow();
        let (xs, ys) = (x.window(&xd), y.window(&yd));
        if x.inc == 1 && y.inc == 1 {
            trace!(op = "dot", path = "unit", n);
            return Ok(simd::dot_unitary(xs, ys));
        }
        trace!(op = "dot", path = "strided", n);
        return Ok(simd::dot_inc(xs, ys, n, x.inc, y.inc));
    }
    trace!(op = "dot", path = "slow", n);
    let mut sum = 0.0;
    for i in 0..n {
        sum += a.at_vec(i) * b.at_vec(i);
    }
    Ok(sum)
}

/// Euclidean distance `‖a − b‖₂`.
///
/// ```
/// use mat32::{l2_distance, VecDense};
///
/// let a = VecDense::from_slice(&[1.0, 2.0, 3.0]);
/// let b = VecDense::from_slice(&[1.0, 2.0, 3.0]);
/// assert_eq!(l2_distance(&a, &b).unwrap(), 0.0);
/// ```
pub fn l2_distance(a: &dyn Vector, b: &dyn Vector) -> Result<f32> {
    if a.len() != b.len() {
        return Err(MatError::Shape);
    }
    if a.is_empty() {
        return Ok(0.0);
    }
    let mut diff = VecDense::empty();
    diff.sub_vec(a, b)?;
    Ok(diff.norm())
}

impl VecDense {
    /// Euclidean norm, computed with scaling so that large elements do not
    /// overflow.
    pub fn norm(&self) -> f32 {
        let data = self.mat.buffer.borrow();
        simd::nrm2_inc(self.mat.window(&data), self.mat.len, self.mat.inc)
    }

    /// Sum of absolute values.
    pub fn norm_l1(&self) -> f32 {
        let data = self.mat.buffer.borrow();
        simd::asum_inc(self.mat.window(&data), self.mat.len, self.mat.inc)
    }

    /// Largest absolute value.
    pub fn norm_inf(&self) -> f32 {
        let data = self.mat.buffer.borrow();
        simd::amax_inc(self.mat.window(&data), self.mat.len, self.mat.inc)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Dense;

    fn approx_eq(a: f32, b: f32, tol: f32) -> bool {
        (a - b).abs() < tol
    }

    #[test]
    fn dot_strided_and_mismatch() {
        let d = Dense::new(3, 2, Some(vec![1.0, 4.0, 2.0, 5.0, 3.0, 6.0])).unwrap();
        let c0 = VecDense::col_view_of(&d, 0).unwrap();
        let c1 = VecDense::col_view_of(&d, 1).unwrap();
        assert_eq!(dot(&c0, &c1).unwrap(), 32.0);
        assert_eq!(dot(&c0, &VecDense::zeros(2)), Err(MatError::Shape));
    }

    #[test]
    fn norms() {
        let v = VecDense::from_slice(&[3.0, -4.0]);
        assert!(approx_eq(v.norm(), 5.0, 1e-6));
        assert_eq!(v.norm_l1(), 7.0);
        assert_eq!(v.norm_inf(), 4.0);
        assert_eq!(VecDense::empty().norm(), 0.0);
    }

    #[test]
    fn self_distance_scenario() {
        let a = VecDense::from_slice(&[1.0, 2.0, 3.0]);
        let b = VecDense::from_slice(&[1.0, 2.0, 3.0]);
        assert_eq!(l2_distance(&a, &b).unwrap(), 0.0);
        let d = dot(&a, &a).unwrap();
        assert_eq!(d, 14.0);
        assert!(approx_eq(d.sqrt(), 3.741_657_5, 1e-6));
        assert!(approx_eq(a.norm(), 3.741_657_5, 1e-6));
    }

    #[test]
    fn distance_between_points() {
        let a = VecDense::from_slice(&[0.0, 0.0, 0.0]);
        let b = VecDense::from_slice(&[2.0, 3.0, 6.0]);
        assert!(approx_eq(l2_distance(&a, &b).unwrap(), 7.0, 1e-5));
        assert_eq!(l2_distance(&a, &VecDense::zeros(2)), Err(MatError::Shape));
    }
}
