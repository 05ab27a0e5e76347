use thiserror::Error;

/// reasons a batch can be rejected; a rejected batch leaves the registry untouched
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("Identifier source exhausted: {0}")]
    IdentifierExhausted(String),
    #[error("Invalid file handle at position {position}: no file name available")]
    InvalidHandle { position: usize },
}
