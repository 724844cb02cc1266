use thiserror::Error;

#[derive(Error, Debug)]
/// Errors raised by the library.
pub enum CoreError {
    #[error("The solution must have at least one objective")]
    EmptyObjectives,
    #[error("The solution has {0} objectives but {1} were expected")]
    DimensionMismatch(usize, usize),
    #[error("NaN or infinite value detected in {0}. This may be an error in the user-defined evaluation function")]
    NaN(String),
    #[error("The archive capacity must be at least 1")]
    InvalidCapacity,
    #[error("The number of grid bisections is not valid ({0} given)")]
    InvalidBisections(usize),
    #[error("The {0} index {1} does not exist")]
    NonExistingIndex(String, usize),
    #[error("An error occurred in the calculation of the '{0}' metric: {1}")]
    Metric(String, String),
    #[error("An error occurred in the archive: {0}")]
    Archive(String),
}
