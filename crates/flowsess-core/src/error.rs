use thiserror::Error;

pub type Result<T> = std::result::Result<T, SessionError>;

/// Errors raised while setting a session up.
///
/// Store operations themselves are total; a lookup miss is `None`, not an error.
#[derive(Error, Debug)]
pub enum SessionError {
    #[error("failed to read session config: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed session config: {0}")]
    Config(#[from] toml::de::Error),

    #[error("invalid session config: {0}")]
    InvalidConfig(String),
}
