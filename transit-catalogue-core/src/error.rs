use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Unknown stop: {0}")]
    UnknownStop(String),
    #[error("Invalid routing settings: {0}")]
    InvalidRoutingSettings(String),
    #[error("Invalid data: {0}")]
    InvalidData(String),
    #[error("Routing graph is already built")]
    GraphAlreadyBuilt,
    #[error("Routing graph is not built")]
    GraphNotBuilt,
    #[error("Index {index} is out of range for {kind} (length {len})")]
    IndexOutOfRange {
        kind: &'static str,
        index: usize,
        len: usize,
    },
    #[error("Corrupt snapshot: {0}")]
    Format(String),
    #[error("Protobuf decode error: {0}")]
    Decode(#[from] prost::DecodeError),
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

impl Error {
    /// Errors caused by the input document or settings rather than by a
    /// snapshot or a dangling reference
    pub fn is_configuration(&self) -> bool {
        matches!(self, Error::InvalidRoutingSettings(_) | Error::InvalidData(_))
    }
}
