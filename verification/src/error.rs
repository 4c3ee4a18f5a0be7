use idv_types::{ConfigError, InputError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum VerificationError {
    /// The request itself is unusable; nothing ran.
    #[error(transparent)]
    Input(#[from] InputError),

    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    /// The caller shut the evaluation down before it finished.
    #[error("evaluation cancelled")]
    Cancelled,

    #[error("internal error: {0}")]
    Internal(String),
}
