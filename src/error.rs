use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum KMeansError {
    /// A precondition on the input shape or parameters was violated.
    #[error("kmeans: invalid argument: {0}")]
    InvalidArgument(String),

    /// A cluster lost all of its samples while running with [`crate::EmptyClusterPolicy::Fail`].
    #[error("kmeans: cluster {cluster} has no assigned samples")]
    NumericAnomaly { cluster: usize },
}

pub type Result<T> = std::result::Result<T, KMeansError>;

macro_rules! invalid_arg {
    ($($arg:tt)*) => {
        $crate::error::KMeansError::InvalidArgument(format!($($arg)*))
    };
}
pub(crate) use invalid_arg;
