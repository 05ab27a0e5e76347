use uuid::Uuid;

use crate::errors::RegistryError;

/// where upload identifiers come from (swappable for deterministic tests)
pub trait IdSource: Send + Sync {
    /// produce a fresh random identifier
    fn next_uuid(&self) -> Result<Uuid, RegistryError>;
}

/// UUID v4 from the thread-local CSPRNG (production)
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomIds;

impl IdSource for RandomIds {
    fn next_uuid(&self) -> Result<Uuid, RegistryError> {
        Ok(Uuid::new_v4())
    }
}
