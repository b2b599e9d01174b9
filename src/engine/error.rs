use thiserror::Error;

/// Input errors surfaced by the simulation engine.
///
/// Unknown team, venue or player names are not errors: the resolver falls
/// back to neutral defaults for those.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum EngineError {
    /// Starting match state outside the legal innings range.
    #[error("invalid match state: {0}")]
    InvalidState(String),

    /// Engine constants that would make the simulation ill-defined.
    #[error("invalid simulation parameters: {0}")]
    InvalidParams(String),

    /// Reference table rows with non-positive ratings or out-of-range form.
    #[error("invalid reference data: {0}")]
    InvalidReference(String),
}

pub type EngineResult<T> = Result<T, EngineError>;
