//! Primitives layer: vectorized dot, scale and AXPY kernels.
//!
//! This module is private. The vector engine calls it once operands have been
//! validated, so every kernel assumes caller-checked lengths and only
//! `debug_assert!`s them.
//!
//! ## Dispatch strategy
//!
//! Unit-stride kernels are selected at compile time: the widest instruction
//! set enabled for the target is aliased as `isa` and every dispatch function
//! forwards to it. Enable wider sets via `-C target-cpu=native` or
//! `-C target-feature=+avx2`. Strided kernels are scalar on every target.
//!
//! ## Architecture support
//!
//! | Arch      | ISA       | f32 lanes |
//! |-----------|-----------|-----------|
//! | `aarch64` | NEON      | 4         |
//! | `x86_64`  | SSE2      | 4         |
//! | `x86_64`  | AVX       | 8         |
//! | other     | scalar    | 1         |
//!
//! Element-wise kernels (scale, AXPY) do a separate multiply and add on every
//! ISA, so their output is bit-identical to the scalar reference. Only the
//! dot product reassociates.

pub(crate) mod scalar;

#[cfg(target_arch = "aarch64")]
mod f32_neon;

#[cfg(all(target_arch = "x86_64", not(target_feature = "avx")))]
mod f32_sse2;

#[cfg(all(target_arch = "x86_64", target_feature = "avx"))]
mod f32_avx;

#[cfg(target_arch = "aarch64")]
use f32_neon as isa;

#[cfg(all(target_arch = "x86_64", target_feature = "avx"))]
use f32_avx as isa;

#[cfg(all(target_arch = "x86_64", not(target_feature = "avx")))]
use f32_sse2 as isa;

#[cfg(not(any(target_arch = "aarch64", target_arch = "x86_64")))]
use scalar as isa;

pub(crate) use scalar::{
    amax_inc, asum_inc, axpy_inc, axpy_inc_to, copy_inc, dot_inc, map_inc, map_inc_to,
    map_unitary, map_unitary_to, nrm2_inc, scal_inc, scal_inc_to,
};

/// Below this length the SIMD register setup costs more than it saves.
const SHORT: usize = 8;

/// Dot product of two contiguous slices.
#[inline]
pub(crate) fn dot_unitary(x: &[f32], y: &[f32]) -> f32 {
    debug_assert_eq!(x.len(), y.len());
    if x.len() < SHORT {
        return scalar::dot(x, y);
    }
    isa::dot(x, y)
}

/// In-place scale of a contiguous slice.
#[inline]
pub(crate) fn scal_unitary(alpha: f32, x: &mut [f32]) {
    if x.len() < SHORT {
        scalar::scal(alpha, x);
        return;
    }
    isa::scal(alpha, x);
}

/// dst = alpha * x over contiguous slices.
#[inline]
pub(crate) fn scal_unitary_to(dst: &mut [f32], alpha: f32, x: &[f32]) {
    debug_assert_eq!(dst.len(), x.len());
    if x.len() < SHORT {
        scalar::scal_to(dst, alpha, x);
        return;
    }
    isa::scal_to(dst, alpha, x);
}

/// y += alpha * x over contiguous slices.
#[inline]
pub(crate) fn axpy_unitary(alpha: f32, x: &[f32], y: &mut [f32]) {
    debug_assert_eq!(x.len(), y.len());
    if x.len() < SHORT {
        scalar::axpy(alpha, x, y);
        return;
    }
    isa::axpy(alpha, x, y);
}

/// dst = alpha * x + y over contiguous slices.
#[inline]
pub(crate) fn axpy_unitary_to(dst: &mut [f32], alpha: f32, x: &[f32], y: &[f32]) {
    debug_assert_eq!(x.len(), y.len());
    debug_assert_eq!(dst.len(), x.len());
    if x.len() < SHORT {
        scalar::axpy_to(dst, alpha, x, y);
        return;
    }
    isa::axpy_to(dst, alpha, x, y);
}

#[cfg(test)]
mod tests {
    use super::*;

    const LENGTHS: [usize; 13] = [0, 1, 2, 3, 4, 5, 7, 8, 9, 15, 16, 17, 33];

    fn ramp(n: usize, scale: f32) -> Vec<f32> {
        (0..n).map(|i| (i + 1) as f32 * scale).collect()
    }

    // ── Dot product boundary tests ─────────────────────────────────

    #[test]
    fn dot_boundary_lengths() {
        for n in LENGTHS {
            let x = ramp(n, 1.0);
            let y = ramp(n, 0.5);
            let expected = scalar::dot(&x, &y);
            let result = dot_unitary(&x, &y);
            assert!(
                (result - expected).abs() <= 1e-4 * expected.abs().max(1.0),
                "dot n={n}: got {result}, expected {expected}"
            );
        }
    }

    #[test]
    fn dot_inc_matches_gathered() {
        let x = ramp(12, 1.0);
        let y = ramp(8, 2.0);
        // x stride 3 → [1, 4, 7, 10], y stride 2 → [2, 6, 10, 14]
        let result = dot_inc(&x, &y, 4, 3, 2);
        assert_eq!(result, 1.0 * 2.0 + 4.0 * 6.0 + 7.0 * 10.0 + 10.0 * 14.0);
    }

    // ── Element-wise kernels are bit-identical to scalar ───────────

    #[test]
    fn scal_boundary_bit_identical() {
        for n in LENGTHS {
            let x = ramp(n, 0.1);
            let mut fast = vec![0.0; n];
            let mut slow = vec![0.0; n];
            scal_unitary_to(&mut fast, 1.7, &x);
            scalar::scal_to(&mut slow, 1.7, &x);
            assert_eq!(fast, slow, "scal_to n={n}");

            let mut inplace = x.clone();
            scal_unitary(1.7, &mut inplace);
            assert_eq!(inplace, slow, "scal n={n}");
        }
    }

    #[test]
    fn axpy_boundary_bit_identical() {
        for n in LENGTHS {
            let x = ramp(n, 0.3);
            let y = ramp(n, -1.1);
            let mut fast = vec![0.0; n];
            let mut slow = vec![0.0; n];
            axpy_unitary_to(&mut fast, 2.5, &x, &y);
            scalar::axpy_to(&mut slow, 2.5, &x, &y);
            assert_eq!(fast, slow, "axpy_to n={n}");

            let mut inplace = y.clone();
            axpy_unitary(2.5, &x, &mut inplace);
            assert_eq!(inplace, slow, "axpy n={n}");
        }
    }

    #[test]
    fn axpy_unit_factor_is_exact_addition() {
        for n in LENGTHS {
            let x = ramp(n, 0.37);
            let y = ramp(n, 1.13);
            let mut sum = vec![0.0; n];
            let mut diff = vec![0.0; n];
            axpy_unitary_to(&mut sum, 1.0, &x, &y);
            axpy_unitary_to(&mut diff, -1.0, &x, &y);
            for i in 0..n {
                assert_eq!(sum[i], y[i] + x[i], "add n={n} idx={i}");
                assert_eq!(diff[i], y[i] - x[i], "sub n={n} idx={i}");
            }
        }
    }

    // ── Strided kernels ────────────────────────────────────────────

    #[test]
    fn axpy_inc_to_strided() {
        let x = [1.0, -1.0, 2.0, -1.0, 3.0];
        let y = [10.0, 20.0, 30.0];
        let mut dst = [0.0; 6];
        axpy_inc_to(&mut dst, 2, 2.0, &x, &y, 3, 2, 1);
        assert_eq!(dst, [12.0, 0.0, 24.0, 0.0, 36.0, 0.0]);
    }

    #[test]
    fn scal_inc_touches_only_strided_elements() {
        let mut x = [1.0, 2.0, 3.0, 4.0, 5.0];
        scal_inc(10.0, &mut x, 3, 2);
        assert_eq!(x, [10.0, 2.0, 30.0, 4.0, 50.0]);
    }

    #[test]
    fn copy_inc_gathers() {
        let x = [1.0, 0.0, 2.0, 0.0, 3.0];
        let mut y = [0.0; 3];
        copy_inc(&x, &mut y, 3, 2, 1);
        assert_eq!(y, [1.0, 2.0, 3.0]);
    }

    #[test]
    fn map_inc_to_divides() {
        let x = [5.0, 10.0, 15.0, 20.0];
        let y = [5.0, 0.0, 5.0, 0.0, 5.0, 0.0, 5.0];
        let mut dst = [0.0; 4];
        map_inc_to(&mut dst, 1, &x, &y, 4, 1, 2, |a, b| a / b);
        assert_eq!(dst, [1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn nrm2_avoids_overflow() {
        let x = [3.0e30_f32, 4.0e30];
        let n = nrm2_inc(&x, 2, 1);
        assert!((n - 5.0e30).abs() / 5.0e30 < 1e-6, "got {n}");
        assert_eq!(nrm2_inc(&[0.0, 0.0], 2, 1), 0.0);
        assert!(nrm2_inc(&[1.0, f32::NAN], 2, 1).is_nan());
    }

    #[test]
    fn asum_and_amax() {
        let x = [1.0, -7.0, 2.0, -3.0];
        assert_eq!(asum_inc(&x, 4, 1), 13.0);
        assert_eq!(amax_inc(&x, 4, 1), 7.0);
        assert_eq!(amax_inc(&x, 2, 2), 2.0);
    }
}
