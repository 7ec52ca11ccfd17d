//! AVX-accelerated f32 kernels for x86_64.
//!
//! AVX provides 256-bit registers → 8×f32 lanes.
//! Only compiled when `target_feature = "avx"` is enabled
//! (e.g. via `-C target-cpu=native` on Haswell+).

#[cfg(target_arch = "x86_64")]
use core::arch::x86_64::*;

/// Dot product of two f32 slices using AVX.
#[inline]
pub fn dot(x: &[f32], y: &[f32]) -> f32 {
    debug_assert_eq!(x.len(), y.len());
    let n = x.len();
    let chunks = n / 16;
    let tail = chunks * 16;

    unsafe {
        let xp = x.as_ptr();
        let yp = y.as_ptr();
        let mut acc0 = _mm256_setzero_ps();
        let mut acc1 = _mm256_setzero_ps();

        for i in 0..chunks {
            let off = i * 16;
            acc0 = _mm256_add_ps(acc0, _mm256_mul_ps(_mm256_loadu_ps(xp.add(off)), _mm256_loadu_ps(yp.add(off))));
            acc1 = _mm256_add_ps(
                acc1,
                _mm256_mul_ps(_mm256_loadu_ps(xp.add(off + 8)), _mm256_loadu_ps(yp.add(off + 8))),
            );
        }
        let acc = _mm256_add_ps(acc0, acc1);

        // Horizontal sum: 8 lanes → 1
        let hi128 = _mm256_extractf128_ps(acc, 1);
        let lo128 = _mm256_castps256_ps128(acc);
        let sum128 = _mm_add_ps(hi128, lo128);
        let shuf = _mm_movehl_ps(sum128, sum128);
        let sums = _mm_add_ps(sum128, shuf);
        let shuf2 = _mm_shuffle_ps(sums, sums, 1);
        let mut sum = _mm_cvtss_f32(_mm_add_ss(sums, shuf2));

        for i in tail..n {
            sum += x[i] * y[i];
        }
        sum
    }
}

/// In-place scale: x[i] *= alpha.
#[inline]
pub fn scal(alpha: f32, x: &mut [f32]) {
    let n = x.len();
    let chunks = n / 8;

    unsafe {
        let va = _mm256_set1_ps(alpha);
        let xp = x.as_mut_ptr();
        for i in 0..chunks {
            let off = i * 8;
            _mm256_storeu_ps(xp.add(off), _mm256_mul_ps(va, _mm256_loadu_ps(xp.add(off))));
        }
    }

    for v in &mut x[chunks * 8..] {
        *v *= alpha;
    }
}

/// Scale into a destination: dst[i] = alpha * x[i].
#[inline]
pub fn scal_to(dst: &mut [f32], alpha: f32, x: &[f32]) {
    debug_assert_eq!(dst.len(), x.len());
    let n = x.len();
    let chunks = n / 8;

    unsafe {
        let va = _mm256_set1_ps(alpha);
        for i in 0..chunks {
            let off = i * 8;
            let vx = _mm256_loadu_ps(x.as_ptr().add(off));
            _mm256_storeu_ps(dst.as_mut_ptr().add(off), _mm256_mul_ps(va, vx));
        }
    }

    for i in chunks * 8..n {
        dst[i] = alpha * x[i];
    }
}

/// AXPY: y[i] += alpha * x[i].
#[inline]
pub fn axpy(alpha: f32, x: &[f32], y: &mut [f32]) {
    debug_assert_eq!(x.len(), y.len());
    let n = x.len();
    let chunks = n / 8;

    unsafe {
        let va = _mm256_set1_ps(alpha);
        for i in 0..chunks {
            let off = i * 8;
            let vx = _mm256_loadu_ps(x.as_ptr().add(off));
            let vy = _mm256_loadu_ps(y.as_ptr().add(off));
            _mm256_storeu_ps(y.as_mut_ptr().add(off), _mm256_add_ps(vy, _mm256_mul_ps(va, vx)));
        }
    }

    for i in chunks * 8..n {
        y[i] += alpha * x[i];
    }
}

/// AXPY into a destination: dst[i] = alpha * x[i] + y[i].
#[inline]
pub fn axpy_to(dst: &mut [f32], alpha: f32, x: &[f32], y: &[f32]) {
    debug_assert_eq!(x.len(), y.len());
    debug_assert_eq!(dst.len(), x.len());
    let n = x.len();
    let chunks = n / 8;

    unsafe {
        let va = _mm256_set1_ps(alpha);
        for i in 0..chunks {
            let off = i * 8;
            let vx = _mm256_loadu_ps(x.as_ptr().add(off));
            let vy = _mm256_loadu_ps(y.as_ptr().add(off));
            _mm256_storeu_ps(dst.as_mut_ptr().add(off), _mm256_add_ps(_mm256_mul_ps(va, vx), vy));
        }
    }

    for i in chunks * 8..n {
        dst[i] = alpha * x[i] + y[i];
    }
}
