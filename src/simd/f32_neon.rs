//! NEON-accelerated f32 kernels for aarch64.
//!
//! NEON provides 128-bit registers → 4×f32 lanes. The element-wise kernels
//! use separate multiply and add (never `vfmaq`) so their results match the
//! scalar kernels bit for bit.

use core::arch::aarch64::*;

/// Dot product of two f32 slices using NEON.
#[inline]
pub fn dot(x: &[f32], y: &[f32]) -> f32 {
    debug_assert_eq!(x.len(), y.len());
    let n = x.len();
    let chunks = n / 4;

    unsafe {
        let mut acc = vdupq_n_f32(0.0);

        for i in 0..chunks {
            let vx = vld1q_f32(x.as_ptr().add(i * 4));
            let vy = vld1q_f32(y.as_ptr().add(i * 4));
            acc = vfmaq_f32(acc, vx, vy);
        }

        let mut sum = vaddvq_f32(acc);

        for i in chunks * 4..n {
            sum += x[i] * y[i];
        }
        sum
    }
}

/// In-place scale: x[i] *= alpha.
#[inline]
pub fn scal(alpha: f32, x: &mut [f32]) {
    let n = x.len();
    let chunks = n / 4;

    unsafe {
        let va = vdupq_n_f32(alpha);
        let xp = x.as_mut_ptr();
        for i in 0..chunks {
            let off = i * 4;
            vst1q_f32(xp.add(off), vmulq_f32(va, vld1q_f32(xp.add(off))));
        }
    }

    for v in &mut x[chunks * 4..] {
        *v *= alpha;
    }
}

/// Scale into a destination: dst[i] = alpha * x[i].
#[inline]
pub fn scal_to(dst: &mut [f32], alpha: f32, x: &[f32]) {
    debug_assert_eq!(dst.len(), x.len());
    let n = x.len();
    let chunks = n / 4;

    unsafe {
        let va = vdupq_n_f32(alpha);
        for i in 0..chunks {
            let off = i * 4;
            let vx = vld1q_f32(x.as_ptr().add(off));
            vst1q_f32(dst.as_mut_ptr().add(off), vmulq_f32(va, vx));
        }
    }

    for i in chunks * 4..n {
        dst[i] = alpha * x[i];
    }
}

/// AXPY: y[i] += alpha * x[i].
#[inline]
pub fn axpy(alpha: f32, x: &[f32], y: &mut [f32]) {
    debug_assert_eq!(x.len(), y.len());
    let n = x.len();
    let chunks = n / 4;

    unsafe {
        let va = vdupq_n_f32(alpha);
        for i in 0..chunks {
            let off = i * 4;
            let vx = vld1q_f32(x.as_ptr().add(off));
            let vy = vld1q_f32(y.as_ptr().add(off));
            vst1q_f32(y.as_mut_ptr().add(off), vaddq_f32(vy, vmulq_f32(va, vx)));
        }
    }

    for i in chunks * 4..n {
        y[i] += alpha * x[i];
    }
}

/// AXPY into a destination: dst[i] = alpha * x[i] + y[i].
#[inline]
pub fn axpy_to(dst: &mut [f32], alpha: f32, x: &[f32], y: &[f32]) {
    debug_assert_eq!(x.len(), y.len());
    debug_assert_eq!(dst.len(), x.len());
    let n = x.len();
    let chunks = n / 4;

    unsafe {
        let va = vdupq_n_f32(alpha);
        for i in 0..chunks {
            let off = i * 4;
            let vx = vld1q_f32(x.as_ptr().add(off));
            let vy = vld1q_f32(y.as_ptr().add(off));
            vst1q_f32(dst.as_mut_ptr().add(off), vaddq_f32(vmulq_f32(va, vx), vy));
        }
    }

    for i in chunks * 4..n {
        dst[i] = alpha * x[i] + y[i];
    }
}
