use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML deserialization failed: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Environment variable error: {0}")]
    Env(#[from] std::env::VarError),

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Unknown member tier: {0}")]
    UnknownMemberTier(String),

    #[error("Database error: {message}")]
    Database { message: String },
}

pub type Result<T> = std::result::Result<T, AppError>;
