//! Level-2 routines over row-major storage.
//!
//! Inner loops run on the primitives layer: dot products for row reductions
//! and AXPY for row accumulation. Vector slices begin at the first logical
//! element and are walked with an explicit increment. Matrix slices begin at
//! element `(0, 0)` and rows are `lda` elements apart.

use crate::raw::{Diag, Uplo};
use crate::simd;

/// Whether a routine applies a matrix or its transpose.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trans {
    NoTrans,
    Trans,
}

impl Trans {
    pub(crate) fn from_flag(transposed: bool) -> Self {
        if transposed {
            Trans::Trans
        } else {
            Trans::NoTrans
        }
    }
}

/// y := alpha * op(A) * x + beta * y, with A an `m x n` row-major matrix.
///
/// With `beta == 0` the prior contents of `y` are never read, so `y` may hold
/// garbage (including NaN).
#[allow(clippy::too_many_arguments)]
pub fn gemv(
    trans: Trans,
    m: usize,
    n: usize,
    alpha: f32,
    a: &[f32],
    lda: usize,
    x: &[f32],
    incx: usize,
    beta: f32,
    y: &mut [f32],
    incy: usize,
) {
    let leny = match trans {
        Trans::NoTrans => m,
        Trans::Trans => n,
    };

    if beta == 0.0 {
        for i in 0..leny {
            y[i * incy] = 0.0;
        }
    } else if beta != 1.0 {
        if incy == 1 {
            simd::scal_unitary(beta, &mut y[..leny]);
        } else {
            simd::scal_inc(beta, y, leny, incy);
        }
    }

    if alpha == 0.0 || m == 0 || n == 0 {
        return;
    }

    match trans {
        Trans::NoTrans => {
            for i in 0..m {
                let row = &a[i * lda..i * lda + n];
                let dot = if incx == 1 {
                    simd::dot_unitary(row, &x[..n])
                } else {
                    simd::dot_inc(row, x, n, 1, incx)
                };
                y[i * incy] += alpha * dot;
            }
        }
        Trans::Trans => {
            for i in 0..m {
                let row = &a[i * lda..i * lda + n];
                let xi = alpha * x[i * incx];
                if incy == 1 {
                    simd::axpy_unitary(xi, row, &mut y[..n]);
                } else {
                    simd::axpy_inc(xi, row, y, n, 1, incy);
                }
            }
        }
    }
}

/// x := op(A) * x, with A an `n x n` row-major triangular matrix.
///
/// Elements outside the `uplo` triangle are never read. With `Diag::Unit` the
/// diagonal is not read either and is taken to be one.
#[allow(clippy::too_many_arguments)]
pub fn trmv(uplo: Uplo, trans: Trans, diag: Diag, n: usize, a: &[f32], lda: usize, x: &mut [f32], incx: usize) {
    let nonunit = diag == Diag::NonUnit;

    match (uplo, trans) {
        // x[i] depends on x[i..], which later rows never write.
        (Uplo::Upper, Trans::NoTrans) => {
            for i in 0..n {
                let row = &a[i * lda..i * lda + n];
                let mut xi = if nonunit { row[i] * x[i * incx] } else { x[i * incx] };
                let rest = n - i - 1;
                if rest > 0 {
                    xi += row_dot(&row[i + 1..], x, (i + 1) * incx, rest, incx);
                }
                x[i * incx] = xi;
            }
        }
        (Uplo::Lower, Trans::NoTrans) => {
            for i in (0..n).rev() {
                let row = &a[i * lda..i * lda + n];
                let mut xi = if nonunit { row[i] * x[i * incx] } else { x[i * incx] };
                if i > 0 {
                    xi += row_dot(&row[..i], x, 0, i, incx);
                }
                x[i * incx] = xi;
            }
        }
        // Row i scatters into x[i+1..] before x[i] itself is scaled.
        (Uplo::Upper, Trans::Trans) => {
            for i in (0..n).rev() {
                let row = &a[i * lda..i * lda + n];
                let xi = x[i * incx];
                let rest = n - i - 1;
                if rest > 0 {
                    row_axpy(xi, &row[i + 1..], x, (i + 1) * incx, rest, incx);
                }
                if nonunit {
                    x[i * incx] = row[i] * xi;
                }
            }
        }
        (Uplo::Lower, Trans::Trans) => {
            for i in 0..n {
                let row = &a[i * lda..i * lda + n];
                let xi = x[i * incx];
                if i > 0 {
                    row_axpy(xi, &row[..i], x, 0, i, incx);
                }
                if nonunit {
                    x[i * incx] = row[i] * xi;
                }
            }
        }
    }
}

#[inline]
fn row_dot(row: &[f32], x: &[f32], start: usize, len: usize, incx: usize) -> f32 {
    if incx == 1 {
        simd::dot_unitary(&row[..len], &x[start..start + len])
    } else {
        simd::dot_inc(row, &x[start..], len, 1, incx)
    }
}

#[inline]
fn row_axpy(alpha: f32, row: &[f32], x: &mut [f32], start: usize, len: usize, incx: usize) {
    if incx == 1 {
        simd::axpy_unitary(alpha, &row[..len], &mut x[start..start + len]);
    } else {
        simd::axpy_inc(alpha, row, &mut x[start..], len, 1, incx);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f32, b: f32, tol: f32) -> bool {
        (a - b).abs() < tol
    }

    // 3x4 row-major, lda 4
    const A: [f32; 12] = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0, 11.0, 12.0];

    fn naive(trans: Trans, m: usize, n: usize, a: &[f32], lda: usize, x: &[f32]) -> Vec<f32> {
        match trans {
            Trans::NoTrans => (0..m).map(|i| (0..n).map(|j| a[i * lda + j] * x[j]).sum()).collect(),
            Trans::Trans => (0..n).map(|j| (0..m).map(|i| a[i * lda + j] * x[i]).sum()).collect(),
        }
    }

    #[test]
    fn gemv_no_trans() {
        let x = [1.0, -1.0, 2.0, 0.5];
        let mut y = [f32::NAN; 3];
        gemv(Trans::NoTrans, 3, 4, 1.0, &A, 4, &x, 1, 0.0, &mut y, 1);
        let want = naive(Trans::NoTrans, 3, 4, &A, 4, &x);
        for i in 0..3 {
            assert!(approx_eq(y[i], want[i], 1e-5), "row {i}: {} vs {}", y[i], want[i]);
        }
    }

    #[test]
    fn gemv_trans_strided() {
        // x at stride 2, y at stride 3
        let x = [1.0, 0.0, -2.0, 0.0, 3.0];
        let mut y = [0.0; 10];
        gemv(Trans::Trans, 3, 4, 2.0, &A, 4, &x, 2, 0.0, &mut y, 3);
        let want = naive(Trans::Trans, 3, 4, &A, 4, &[1.0, -2.0, 3.0]);
        for j in 0..4 {
            assert!(approx_eq(y[j * 3], 2.0 * want[j], 1e-5));
        }
        assert_eq!(y[1], 0.0);
    }

    #[test]
    fn gemv_beta_accumulates() {
        let x = [1.0; 4];
        let mut y = [1.0, 2.0, 3.0];
        gemv(Trans::NoTrans, 3, 4, 1.0, &A, 4, &x, 1, 2.0, &mut y, 1);
        assert_eq!(y, [12.0, 30.0, 48.0]);
    }

    #[test]
    fn gemv_submatrix_lda() {
        // Left 2x2 block of A.
        let x = [1.0, 1.0];
        let mut y = [0.0; 2];
        gemv(Trans::NoTrans, 2, 2, 1.0, &A, 4, &x, 1, 0.0, &mut y, 1);
        assert_eq!(y, [3.0, 11.0]);
    }

    fn dense_tri(uplo: Uplo, diag: Diag, n: usize, a: &[f32]) -> Vec<f32> {
        let mut full = vec![0.0; n * n];
        for i in 0..n {
            for j in 0..n {
                let keep = match uplo {
                    Uplo::Upper => j >= i,
                    Uplo::Lower => j <= i,
                };
                if i == j && diag == Diag::Unit {
                    full[i * n + j] = 1.0;
                } else if keep {
                    full[i * n + j] = a[i * n + j];
                }
            }
        }
        full
    }

    #[test]
    fn trmv_all_variants() {
        let n = 4;
        // Junk in both triangles; the routine must ignore the other one.
        let a: Vec<f32> = (0..n * n).map(|k| (k as f32) * 0.5 - 3.0).collect();
        let x0 = [1.0, -2.0, 0.5, 3.0];
        for uplo in [Uplo::Upper, Uplo::Lower] {
            for trans in [Trans::NoTrans, Trans::Trans] {
                for diag in [Diag::NonUnit, Diag::Unit] {
                    let full = dense_tri(uplo, diag, n, &a);
                    let want = naive(trans, n, n, &full, n, &x0);

                    let mut x = x0;
                    trmv(uplo, trans, diag, n, &a, n, &mut x, 1);
                    for i in 0..n {
                        assert!(
                            approx_eq(x[i], want[i], 1e-4),
                            "{uplo:?} {trans:?} {diag:?} [{i}]: {} vs {}",
                            x[i],
                            want[i]
                        );
                    }

                    let mut xs = [0.0; 7];
                    for i in 0..n {
                        xs[i * 2] = x0[i];
                    }
                    trmv(uplo, trans, diag, n, &a, n, &mut xs, 2);
                    for i in 0..n {
                        assert!(approx_eq(xs[i * 2], want[i], 1e-4), "strided {uplo:?} {trans:?} {diag:?}");
                    }
                }
            }
        }
    }
}
