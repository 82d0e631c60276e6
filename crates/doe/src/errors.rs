use thiserror::Error;

/// A result type for Latin hypercube construction and optimization
pub type Result<T> = std::result::Result<T, LhsError>;

/// An error when building, optimizing or sampling a Latin hypercube design
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LhsError {
    /// When the number of samples is too small to build a design
    #[error("number of samples must be at least 2, got {0}")]
    InvalidSampleCount(usize),
    /// When no parameter (dimension) is requested
    #[error("number of parameters must be at least 1, got {0}")]
    InvalidParameterCount(usize),
    /// When the duplication factor is zero
    #[error("duplication factor must be at least 1, got {0}")]
    InvalidDuplication(usize),
    /// When the optimizer is given no sweep to run
    #[error("maximum number of sweeps must be at least 1, got {0}")]
    InvalidSweeps(usize),
    /// When the relative improvement threshold is negative or NaN
    #[error("eps must be a non-negative number, got {0}")]
    InvalidEps(f64),
    /// When a design does not have the expected shape
    #[error("design dimension mismatch: expected {expected:?}, got {got:?}")]
    DimensionMismatch {
        /// Expected (nsamples, nparameters)
        expected: (usize, usize),
        /// Actual (nsamples, nparameters)
        got: (usize, usize),
    },
    /// When a flat buffer does not hold nsamples * nparameters values
    #[error("flat design length mismatch: expected {expected} values, got {got}")]
    InvalidLength {
        /// nsamples * nparameters
        expected: usize,
        /// Length of the given buffer
        got: usize,
    },
    /// When sampling space bounds are malformed
    #[error("InvalidBounds error: {0}")]
    InvalidBounds(String),
    /// When the exchange algorithm ends up with a less optimal design than its baseline
    #[error("algorithm produced a less optimal design: {candidate} > {baseline}")]
    WorseDesign {
        /// Optimality criterion the exchange had to beat
        baseline: f64,
        /// Best optimality criterion found by the exchange
        candidate: f64,
    },
    /// When a generated design is not a Latin hypercube
    #[error("Invalid hypercube: {0}")]
    InvalidHypercube(String),
    /// When the shared random generator cannot be locked
    #[error("random generator lock poisoned")]
    RngPoisoned,
    /// When the best exchange cannot be selected
    #[error(transparent)]
    MinMaxError(#[from] ndarray_stats::errors::MinMaxError),
}

impl LhsError {
    /// Returns `true` when the error comes from arguments rejected before any computation
    pub fn is_parameter_error(&self) -> bool {
        matches!(
            self,
            LhsError::InvalidSampleCount(_)
                | LhsError::InvalidParameterCount(_)
                | LhsError::InvalidDuplication(_)
                | LhsError::InvalidSweeps(_)
                | LhsError::InvalidEps(_)
                | LhsError::DimensionMismatch { .. }
                | LhsError::InvalidLength { .. }
                | LhsError::InvalidBounds(_)
        )
    }

    /// Returns `true` when an algorithm broke one of its own post-conditions
    pub fn is_invariant_violation(&self) -> bool {
        matches!(
            self,
            LhsError::WorseDesign { .. } | LhsError::InvalidHypercube(_)
        )
    }
}

/// Checks the design shape arguments shared by every generator
pub(crate) fn check_shape(nsamples: usize, nparameters: usize) -> Result<()> {
    if nsamples < 2 {
        return Err(LhsError::InvalidSampleCount(nsamples));
    }
    if nparameters < 1 {
        return Err(LhsError::InvalidParameterCount(nparameters));
    }
    Ok(())
}
