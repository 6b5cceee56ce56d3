use thiserror::Error;

#[derive(Debug, Error)]
pub enum SubError {
    #[error("invalid id")]
    InvalidIdentifier,
    #[error("inbound not found")]
    RecordNotFound,
    #[error("only vmess supported")]
    UnsupportedProtocol,
    #[error("speed ip not set")]
    MissingAddress,
    #[error("build yaml failed")]
    SerializationFailed(#[from] serde_yaml::Error),
}

impl SubError {
    /// 对应的http状态码
    pub fn status_code(&self) -> u16 {
        match self {
            SubError::InvalidIdentifier
            | SubError::UnsupportedProtocol
            | SubError::MissingAddress => 400,
            SubError::RecordNotFound => 404,
            SubError::SerializationFailed(_) => 500,
        }
    }
}
