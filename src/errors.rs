/// Domain-specific error types for the game core.
/// Insufficient funds is NOT an error -- `buy` reports it as `Ok(false)` and
/// the caller decides the UX. Errors here are contract violations (bad pricing
/// inputs) or storage failures, which the session layer treats as non-fatal.
#[derive(Debug, thiserror::Error)]
pub enum GameError {
    #[error("invalid parameter: {0}")]
    InvalidParam(String),

    #[error("storage error: {0}")]
    Storage(String),

    #[error("config error: {0}")]
    Config(String),
}

impl From<rusqlite::Error> for GameError {
    fn from(e: rusqlite::Error) -> Self {
        GameError::Storage(e.to_string())
    }
}

impl From<serde_json::Error> for GameError {
    fn from(e: serde_json::Error) -> Self {
        GameError::Storage(e.to_string())
    }
}

impl From<std::io::Error> for GameError {
    fn from(e: std::io::Error) -> Self {
        GameError::Storage(e.to_string())
    }
}

pub type GameResult<T> = Result<T, GameError>;
