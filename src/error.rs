use thiserror::Error;

#[derive(Error, Debug)]
pub enum SimError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Prompt error: {0}")]
    Prompt(String),

    #[error("Agent {0} panicked")]
    AgentPanicked(usize),

    #[error("Arrival generator panicked")]
    ProducerPanicked,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, SimError>;
