use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Core(#[from] transit_catalogue_core::Error),
    #[error("Malformed input document: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Malformed config file: {0}")]
    Config(#[from] toml::de::Error),
    #[error("Input document has no {0}")]
    Missing(&'static str),
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

impl Error {
    /// Errors the user can fix by editing the input document or config
    pub fn is_configuration(&self) -> bool {
        match self {
            Error::Core(error) => error.is_configuration(),
            Error::Json(_) | Error::Config(_) | Error::Missing(_) => true,
            Error::IoError(_) => false,
        }
    }
}
