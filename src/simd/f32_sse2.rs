//! SSE2-accelerated f32 kernels for x86_64.
//!
//! SSE2 provides 128-bit registers → 4×f32 lanes.

#[cfg(target_arch = "x86_64")]
use core::arch::x86_64::*;

/// Dot product of two f32 slices using SSE2.
///
/// Uses 4 independent accumulators (16 f32 per iteration) to hide
/// multiply-add latency.
#[inline]
pub fn dot(x: &[f32], y: &[f32]) -> f32 {
    debug_assert_eq!(x.len(), y.len());
    let n = x.len();
    let chunks = n / 16; // 4 accumulators × 4 lanes

    unsafe {
        let xp = x.as_ptr();
        let yp = y.as_ptr();

        let mut acc0 = _mm_setzero_ps();
        let mut acc1 = _mm_setzero_ps();
        let mut acc2 = _mm_setzero_ps();
        let mut acc3 = _mm_setzero_ps();

        for i in 0..chunks {
            let off = i * 16;
            acc0 = _mm_add_ps(acc0, _mm_mul_ps(_mm_loadu_ps(xp.add(off)), _mm_loadu_ps(yp.add(off))));
            acc1 = _mm_add_ps(acc1, _mm_mul_ps(_mm_loadu_ps(xp.add(off + 4)), _mm_loadu_ps(yp.add(off + 4))));
            acc2 = _mm_add_ps(acc2, _mm_mul_ps(_mm_loadu_ps(xp.add(off + 8)), _mm_loadu_ps(yp.add(off + 8))));
            acc3 = _mm_add_ps(acc3, _mm_mul_ps(_mm_loadu_ps(xp.add(off + 12)), _mm_loadu_ps(yp.add(off + 12))));
        }

        acc0 = _mm_add_ps(acc0, acc1);
        acc2 = _mm_add_ps(acc2, acc3);
        acc0 = _mm_add_ps(acc0, acc2);
        // Horizontal sum of 4 lanes
        let shuf = _mm_movehl_ps(acc0, acc0);
        let sums = _mm_add_ps(acc0, shuf);
        let shuf2 = _mm_shuffle_ps(sums, sums, 1);
        let mut sum = _mm_cvtss_f32(_mm_add_ss(sums, shuf2));

        for i in chunks * 16..n {
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
        let va = _mm_set1_ps(alpha);
        let xp = x.as_mut_ptr();
        for i in 0..chunks {
            let off = i * 4;
            _mm_storeu_ps(xp.add(off), _mm_mul_ps(va, _mm_loadu_ps(xp.add(off))));
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
        let va = _mm_set1_ps(alpha);
        for i in 0..chunks {
            let off = i * 4;
            let vx = _mm_loadu_ps(x.as_ptr().add(off));
            _mm_storeu_ps(dst.as_mut_ptr().add(off), _mm_mul_ps(va, vx));
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
        let va = _mm_set1_ps(alpha);
        for i in 0..chunks {
            let off = i * 4;
            let vx = _mm_loadu_ps(x.as_ptr().add(off));
            let vy = _mm_loadu_ps(y.as_ptr().add(off));
            _mm_storeu_ps(y.as_mut_ptr().add(off), _mm_add_ps(vy, _mm_mul_ps(va, vx)));
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
        let va = _mm_set1_ps(alpha);
        for i in 0..chunks {
            let off = i * 4;
            let vx = _mm_loadu_ps(x.as_ptr().add(off));
            let vy = _mm_loadu_ps(y.as_ptr().add(off));
            _mm_storeu_ps(dst.as_mut_ptr().add(off), _mm_add_ps(_mm_mul_ps(va, vx), vy));
        }
    }

    for i in chunks * 4..n {
        dst[i] = alpha * x[i] + y[i];
    }
}
