//! Errors in the library.
use thiserror::Error;

/// Errors in the library.
#[derive(Error, Debug, PartialEq)]
pub enum ImitrlError {
    /// Record key error.
    #[error("Record key error: {0}")]
    RecordKeyError(String),

    /// Record value type error.
    #[error("Record value type error: {0}")]
    RecordValueTypeError(String),

    /// Per-field arrays of a batch have different lengths.
    #[error("Length of {field} is {actual}, expected {expected}")]
    LengthMismatch {
        /// Name of the offending field.
        field: String,
        /// Length shared by the other fields.
        expected: usize,
        /// Length of the offending field.
        actual: usize,
    },

    /// A field required by an update step is not available.
    #[error("Missing field: {0}")]
    MissingField(String),

    /// Name of an adversarial imitation algorithm is not one of `GAIL`, `AIRL`.
    #[error("Unknown adversarial imitation algorithm: {0}")]
    UnknownAlgorithm(String),

    /// A discriminator was called with inputs of the other algorithm.
    #[error("Discriminator expects {expected} inputs, got {actual}")]
    UnsupportedInput {
        /// Input form accepted by the discriminator.
        expected: String,
        /// Input form that was given.
        actual: String,
    },

    /// Index out of range of a transition indexer.
    #[error("Index {index} is out of range for {len} transitions")]
    IndexOutOfRange {
        /// Requested index.
        index: usize,
        /// Number of transitions.
        len: usize,
    },

    /// Mini-batch size must be positive.
    #[error("Invalid batch size: {0}")]
    InvalidBatchSize(usize),

    /// A hyperparameter is outside of its domain.
    #[error("Invalid hyperparameter: {0}")]
    InvalidHyperparameter(String),
}
