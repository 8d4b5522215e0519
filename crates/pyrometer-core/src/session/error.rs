//! Session errors

use thiserror::Error;

use super::SessionState;
use crate::profile::ProfileError;
use crate::sampler::SamplerConfigError;
use crate::storage::StorageError;

/// Errors raised while running a measurement session
#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Result could not be saved: {0}")]
    Storage(#[from] StorageError),

    #[error("Result saved, but the report could not be written: {0}")]
    Report(StorageError),

    #[error("Invalid vehicle profile: {0}")]
    Profile(#[from] ProfileError),

    #[error("Invalid sampler settings: {0}")]
    Sampler(#[from] SamplerConfigError),

    #[error("Wheel {wheel} is out of range for a vehicle with {count} wheels")]
    InvalidWheel { wheel: usize, count: usize },

    #[error("Cannot {action} while {state:?}")]
    InvalidState {
        action: &'static str,
        state: SessionState,
    },

    #[error("The session can only be stored from the Done row")]
    NotDone,
}
