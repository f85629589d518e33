use thiserror::Error;

/// Errors raised while building gravity models, propagators or run
/// configurations. Evaluation itself never fails.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    #[error("requested degree {requested} exceeds model maximum {max}")]
    DegreeOutOfRange { requested: usize, max: usize },

    #[error("requested order {order} exceeds degree {degree}")]
    OrderOutOfRange { order: usize, degree: usize },

    #[error("coefficient ({degree}, {order}) lies outside a table of degree {max}")]
    CoefficientIndex {
        degree: usize,
        order: usize,
        max: usize,
    },

    #[error("degree {degree} coefficients are fixed at zero (point-mass term only)")]
    LowDegreeTerm { degree: usize },

    #[error("cosine table has degree {cosine}, sine table has degree {sine}")]
    TableMismatch { cosine: usize, sine: usize },

    #[error("state has {got} elements but the system order is {expected}")]
    StateLength { expected: usize, got: usize },

    #[error("invalid step configuration: {0}")]
    InvalidStep(String),
}

pub type Result<T> = std::result::Result<T, Error>;
