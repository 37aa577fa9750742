use thiserror::Error;

/// Errors surfaced at the agent boundary.
///
/// The tactical core itself never fails on bad data: excluded candidates and
/// unreachable intercepts are ordinary values. These variants only describe
/// problems with requests, registration, or a crashed decision pass.
#[derive(Error, Debug)]
pub enum DecisionError {
    #[error("Unknown agent: client id {client_id}")]
    UnknownAgent { client_id: u32 },

    #[error("Agent {client_id} is registered as {role} and cannot act on the pitch")]
    NotAPlayer { client_id: u32, role: String },

    #[error("Invalid request: {0}")]
    InvalidRequest(#[from] serde_json::Error),

    #[error("Invalid snapshot: {reason}")]
    InvalidSnapshot { reason: String },

    #[error("Decision pass panicked at cycle {cycle}: {message}")]
    Panicked { cycle: u32, message: String },
}

impl DecisionError {
    /// Whether the boundary should answer with the fallback action set
    /// instead of propagating the error to the caller.
    pub fn is_recoverable(&self) -> bool {
        match self {
            DecisionError::InvalidSnapshot { .. } => true,
            DecisionError::Panicked { .. } => true,
            DecisionError::UnknownAgent { .. } => false,
            DecisionError::NotAPlayer { .. } => false,
            DecisionError::InvalidRequest(_) => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, DecisionError>;
