use raw_array::AllocError;
use thiserror::Error;

/// Recoverable failures of the array API.
///
/// Contract violations (bad indices, mixing descriptors) are not represented
/// here; they panic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Error {
    #[error("allocation of {requested} slots failed")]
    Alloc { requested: usize },
    #[error("capacity overflow")]
    CapacityOverflow,
    #[error("element duplication failed")]
    Duplicate,
    #[error("type descriptor is missing its `{0}` operation")]
    MissingOperation(&'static str),
}

impl From<AllocError> for Error {
    fn from(err: AllocError) -> Self {
        match err {
            AllocError::CapacityOverflow => Error::CapacityOverflow,
            AllocError::OutOfMemory { requested } => Error::Alloc { requested },
        }
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
