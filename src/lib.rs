//! # mat32
//!
//! Single-precision dense vector engine: strided vectors and views, matrix
//! raw forms, aliasing-safe arithmetic, and SIMD kernels. Built for
//! memory- and bandwidth-bound `f32` workloads such as embedding distance
//! computation.
//!
//! ## Quick start
//!
//! ```
//! use mat32::{dot, Dense, VecDense};
//!
//! let a = VecDense::from_slice(&[1.0, 2.0, 3.0]);
//! let b = VecDense::from_slice(&[4.0, 5.0, 6.0]);
//!
//! let mut c = VecDense::empty();
//! c.add_scaled_vec(&a, 2.0, &b).unwrap(); // c = a + 2b
//! assert_eq!(c.to_vec(), vec![9.0, 12.0, 15.0]);
//! assert_eq!(dot(&a, &b).unwrap(), 32.0);
//!
//! let m = Dense::eye(3).unwrap();
//! let mut y = VecDense::empty();
//! y.mul_vec(&m, &a).unwrap();
//! assert_eq!(y, a);
//! ```
//!
//! ## Modules
//!
//! - [`vecdense`]: [`VecDense`], an owned or view-backed vector with an
//!   explicit increment. Element-wise add, subtract, multiply, divide, scale
//!   and scaled accumulation, matrix-vector product, dot product and norms.
//!   Each operation checks the receiver against its sources: the receiver
//!   may be a source (pass [`VecDense::view`]), but a source that partially
//!   overlaps it fails with [`MatError::Overlap`].
//!
//! - [`dense`]: [`Dense`] (general, row-major) and [`TriDense`]
//!   (triangular) matrices. They expose raw storage so matrix-vector
//!   products run on the level-2 kernels.
//!
//! - [`traits`]: [`Matrix`] / [`Vector`] read access and the [`RawForm`]
//!   capability. A type that only implements element access works with every
//!   operation through the element-wise fallback; one that returns a raw
//!   form gets the kernels.
//!
//! - [`transpose`]: zero-copy [`Transpose`] and [`TransposeVec`] views.
//!
//! - [`raw`]: shared storage ([`raw::Buffer`]) and the vector, general and
//!   triangular storage descriptors.
//!
//! - [`blas`]: row-major `gemv` and `trmv`.
//!
//! - [`workspace`]: [`WorkspacePool`], reusable scratch vectors for
//!   products whose receiver is also an operand.
//!
//! ## SIMD
//!
//! Unit-stride kernels are vectorized for the widest instruction set enabled
//! at compile time:
//!
//! | Arch      | ISA    | f32 lanes |
//! |-----------|--------|-----------|
//! | `aarch64` | NEON   | 4         |
//! | `x86_64`  | SSE2   | 4         |
//! | `x86_64`  | AVX    | 8         |
//! | other     | scalar | 1         |
//!
//! Build with `-C target-cpu=native` to enable AVX where available.
//!
//! ## Logging
//!
//! Dispatch decisions are emitted as `tracing` events at `TRACE` level;
//! workspace allocations and rejected overlaps at `DEBUG`. Install a
//! subscriber in the embedding application to see them.

pub mod blas;
pub mod dense;
pub mod error;
pub mod raw;
mod simd;
pub mod traits;
pub mod transpose;
pub mod vecdense;
pub mod workspace;

pub use dense::{Dense, TriDense};
pub use error::{MatError, Result};
pub use raw::{Diag, RawGeneral, RawTriangular, RawVector, Uplo};
pub use traits::{Matrix, RawForm, Vector};
pub use transpose::{Transpose, TransposeVec};
pub use vecdense::{dot, l2_distance, VecDense};
pub use workspace::{Workspace, WorkspacePool};
