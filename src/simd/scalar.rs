//! Scalar kernels.
//!
//! The unit-stride functions are the fallback for architectures without a
//! SIMD module and the reference the SIMD kernels are tested against. The
//! strided (`_inc`) functions are the only implementation of their kind: they
//! take slices that begin at the first logical element and walk them with an
//! explicit element count and increment, BLAS style.
//!
//! Element-wise kernels never reassociate, so a scalar and a SIMD kernel
//! produce bit-identical results for the same inputs.

/// Dot product of two contiguous slices.
#[inline]
pub fn dot(x: &[f32], y: &[f32]) -> f32 {
    debug_assert_eq!(x.len(), y.len());
    let mut sum = 0.0;
    for i in 0..x.len() {
        sum += x[i] * y[i];
    }
    sum
}

/// In-place scale: x[i] *= alpha.
#[inline]
pub fn scal(alpha: f32, x: &mut [f32]) {
    for v in x.iter_mut() {
        *v *= alpha;
    }
}

/// Scale into a destination: dst[i] = alpha * x[i].
#[inline]
pub fn scal_to(dst: &mut [f32], alpha: f32, x: &[f32]) {
    debug_assert_eq!(dst.len(), x.len());
    for i in 0..x.len() {
        dst[i] = alpha * x[i];
    }
}

/// AXPY: y[i] += alpha * x[i].
#[inline]
pub fn axpy(alpha: f32, x: &[f32], y: &mut [f32]) {
    debug_assert_eq!(x.len(), y.len());
    for i in 0..x.len() {
        y[i] += alpha * x[i];
    }
}

/// AXPY into a destination: dst[i] = alpha * x[i] + y[i].
#[inline]
pub fn axpy_to(dst: &mut [f32], alpha: f32, x: &[f32], y: &[f32]) {
    debug_assert_eq!(x.len(), y.len());
    debug_assert_eq!(dst.len(), x.len());
    for i in 0..x.len() {
        dst[i] = alpha * x[i] + y[i];
    }
}

/// Element-wise map in place: y[i] = f(y[i], x[i]).
#[inline]
pub fn map_unitary(x: &[f32], y: &mut [f32], f: impl Fn(f32, f32) -> f32) {
    debug_assert_eq!(x.len(), y.len());
    for (yi, &xi) in y.iter_mut().zip(x) {
        *yi = f(*yi, xi);
    }
}

/// Element-wise map into a destination: dst[i] = f(x[i], y[i]).
#[inline]
pub fn map_unitary_to(dst: &mut [f32], x: &[f32], y: &[f32], f: impl Fn(f32, f32) -> f32) {
    debug_assert_eq!(x.len(), y.len());
    debug_assert_eq!(dst.len(), x.len());
    for i in 0..x.len() {
        dst[i] = f(x[i], y[i]);
    }
}

// ── Strided ─────────────────────────────────────────────────────────

/// Strided dot product over `n` elements.
#[inline]
pub fn dot_inc(x: &[f32], y: &[f32], n: usize, inc_x: usize, inc_y: usize) -> f32 {
    let mut sum = 0.0;
    let (mut ix, mut iy) = (0, 0);
    for _ in 0..n {
        sum += x[ix] * y[iy];
        ix += inc_x;
        iy += inc_y;
    }
    sum
}

/// Strided in-place scale.
#[inline]
pub fn scal_inc(alpha: f32, x: &mut [f32], n: usize, inc_x: usize) {
    let mut ix = 0;
    for _ in 0..n {
        x[ix] *= alpha;
        ix += inc_x;
    }
}

/// Strided scale into a destination.
#[inline]
pub fn scal_inc_to(dst: &mut [f32], inc_dst: usize, alpha: f32, x: &[f32], n: usize, inc_x: usize) {
    let (mut id, mut ix) = (0, 0);
    for _ in 0..n {
        dst[id] = alpha * x[ix];
        id += inc_dst;
        ix += inc_x;
    }
}

/// Strided AXPY: y += alpha * x.
#[inline]
pub fn axpy_inc(alpha: f32, x: &[f32], y: &mut [f32], n: usize, inc_x: usize, inc_y: usize) {
    let (mut ix, mut iy) = (0, 0);
    for _ in 0..n {
        y[iy] += alpha * x[ix];
        ix += inc_x;
        iy += inc_y;
    }
}

/// Strided AXPY into a destination: dst = alpha * x + y.
#[allow(clippy::too_many_arguments)]
#[inline]
pub fn axpy_inc_to(
    dst: &mut [f32],
    inc_dst: usize,
    alpha: f32,
    x: &[f32],
    y: &[f32],
    n: usize,
    inc_x: usize,
    inc_y: usize,
) {
    let (mut id, mut ix, mut iy) = (0, 0, 0);
    for _ in 0..n {
        dst[id] = alpha * x[ix] + y[iy];
        id += inc_dst;
        ix += inc_x;
        iy += inc_y;
    }
}

/// Strided copy of `n` elements from `x` into `y`.
#[inline]
pub fn copy_inc(x: &[f32], y: &mut [f32], n: usize, inc_x: usize, inc_y: usize) {
    if inc_x == 1 && inc_y == 1 {
        y[..n].copy_from_slice(&x[..n]);
        return;
    }
    let (mut ix, mut iy) = (0, 0);
    for _ in 0..n {
        y[iy] = x[ix];
        ix += inc_x;
        iy += inc_y;
    }
}

/// Strided element-wise map in place: y[i] = f(y[i], x[i]).
#[inline]
pub fn map_inc(
    x: &[f32],
    y: &mut [f32],
    n: usize,
    inc_x: usize,
    inc_y: usize,
    f: impl Fn(f32, f32) -> f32,
) {
    let (mut ix, mut iy) = (0, 0);
    for _ in 0..n {
        y[iy] = f(y[iy], x[ix]);
        ix += inc_x;
        iy += inc_y;
    }
}

/// Strided element-wise map into a destination: dst[i] = f(x[i], y[i]).
#[allow(clippy::too_many_arguments)]
#[inline]
pub fn map_inc_to(
    dst: &mut [f32],
    inc_dst: usize,
    x: &[f32],
    y: &[f32],
    n: usize,
    inc_x: usize,
    inc_y: usize,
    f: impl Fn(f32, f32) -> f32,
) {
    let (mut id, mut ix, mut iy) = (0, 0, 0);
    for _ in 0..n {
        dst[id] = f(x[ix], y[iy]);
        id += inc_dst;
        ix += inc_x;
        iy += inc_y;
    }
}

/// Euclidean norm with scaling, so that squaring never overflows.
#[inline]
pub fn nrm2_inc(x: &[f32], n: usize, inc_x: usize) -> f32 {
    let mut scale = 0.0_f32;
    let mut sumsq = 1.0_f32;
    let mut ix = 0;
    for _ in 0..n {
        let v = x[ix];
        ix += inc_x;
        if v == 0.0 {
            continue;
        }
        if v.is_nan() {
            return f32::NAN;
        }
        let absv = v.abs();
        if scale < absv {
            sumsq = 1.0 + sumsq * (scale / absv) * (scale / absv);
            scale = absv;
        } else {
            sumsq += (absv / scale) * (absv / scale);
        }
    }
    if scale.is_infinite() {
        return f32::INFINITY;
    }
    scale * sumsq.sqrt()
}

/// Sum of absolute values.
#[inline]
pub fn asum_inc(x: &[f32], n: usize, inc_x: usize) -> f32 {
    let mut sum = 0.0;
    let mut ix = 0;
    for _ in 0..n {
        sum += x[ix].abs();
        ix += inc_x;
    }
    sum
}

/// Largest absolute value (NaN propagates).
#[inline]
pub fn amax_inc(x: &[f32], n: usize, inc_x: usize) -> f32 {
    let mut max = 0.0_f32;
    let mut ix = 0;
    for _ in 0..n {
        let v = x[ix].abs();
        if v.is_nan() {
            return f32::NAN;
        }
        if v > max {
            max = v;
        }
        ix += inc_x;
    }
    max
}
