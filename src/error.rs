use thiserror::Error;

/// Errors from vector and matrix operations.
///
/// Every variant signals a programming error in the caller: operands were
/// mis-sized, a view was requested outside its backing storage, or two
/// operands alias each other in a way the kernels cannot handle. None of them
/// are transient, so no operation retries.
///
/// ```
/// use mat32::{MatError, VecDense};
///
/// let err = VecDense::new(3, Some(vec![1.0, 2.0])).unwrap_err();
/// assert_eq!(err, MatError::Shape);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MatError {
    /// Operand or receiver dimensions do not agree.
    #[error("mat32: dimension mismatch")]
    Shape,
    /// A slice or view lies outside the backing capacity.
    #[error("mat32: index out of range")]
    IndexOutOfRange,
    /// A definite, non-zero length was required.
    #[error("mat32: zero length in matrix dimension")]
    ZeroLength,
    /// The receiver partially overlaps the storage of a source operand.
    #[error("mat32: bad region: overlap")]
    Overlap,
}

/// Result alias used throughout the crate.
pub type Result<T> = core::result::Result<T, MatError>;
