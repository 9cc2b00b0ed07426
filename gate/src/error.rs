use thiserror::Error;

#[derive(Error, Debug)]
pub enum GateError {
    #[error("validation failed: {0}")]
    Validation(&'static str),

    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("unauthenticated: {0}")]
    Unauthenticated(&'static str),

    /// Store failure while minting a session at login. Reported to the caller
    /// as a rejected request, not a server error.
    #[error("could not create session: {0:#}")]
    SessionNotCreated(anyhow::Error),

    /// Store failure. `message` is what the caller gets to see.
    #[error("{message}: {cause:#}")]
    Internal {
        message: &'static str,
        cause: anyhow::Error,
    },
}
