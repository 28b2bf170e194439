use thiserror::Error;

#[derive(Debug, Error)]
pub enum VentureFlowError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("storage error: {0}")]
    Storage(String),
    #[error("session error: {0}")]
    Session(String),
}
