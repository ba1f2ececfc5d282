use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("empty deck: {0}")]
    EmptyDeck(&'static str),
    #[error("invalid input: {0}")]
    Invalid(&'static str),
    #[error("storage error: {0}")]
    Storage(&'static str),
}
