/// registry configuration loaded from environment variables
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistryConfig {
    /// publish a fresh snapshot even when add_uploads gets an empty batch
    pub notify_on_empty_batch: bool,
}

impl RegistryConfig {
    /// load configuration from environment variables with defaults
    pub fn from_env() -> Self {
        Self {
            notify_on_empty_batch: std::env::var("UPLOADS_NOTIFY_ON_EMPTY_BATCH")
                .ok()
                .and_then(|v| Self::parse_flag(&v))
                .unwrap_or(false),
        }
    }

    /// same as from_env, but reads a .env file first if one exists
    pub fn load() -> Self {
        // fails silently if not found
        let _ = dotenvy::dotenv();
        Self::from_env()
    }

    /// accepts the usual truthy/falsy spellings, anything else is ignored
    pub fn parse_flag(value: &str) -> Option<bool> {
        match value.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Some(true),
            "0" | "false" | "no" | "off" => Some(false),
            other => {
                tracing::warn!("Ignoring unrecognized boolean flag value: {:?}", other);
                None
            }
        }
    }
}
