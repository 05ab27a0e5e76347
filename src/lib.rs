//! Client-side bookkeeping for files a user has queued for upload.
//!
//! [`UploadRegistry`] mints an opaque [`UploadId`] for every file handle it
//! is given and keeps them in a copy-on-write map. Each batch is published
//! once, as a fresh [`Snapshot`], to callback subscribers and to
//! `tokio::sync::watch` receivers. Transfer, rendering and cancellation live
//! elsewhere and drive the registry through these operations.
//!
//! ```no_run
//! use std::sync::Arc;
//! use upload_registry::{LocalFile, RegistryConfig, UploadRegistry};
//!
//! let registry: UploadRegistry<LocalFile> = UploadRegistry::new(RegistryConfig::load());
//! let _sub = registry.subscribe(|snapshot| println!("{} queued", snapshot.len()));
//! registry.add_uploads([Arc::new(LocalFile::new("photos/cat.png"))])?;
//! # Ok::<(), upload_registry::RegistryError>(())
//! ```

pub mod config;
pub mod errors;
pub mod ids;
pub mod logging;
pub mod models;
pub mod state;

pub use config::RegistryConfig;
pub use errors::RegistryError;
pub use ids::{IdSource, RandomIds};
pub use models::{FileHandle, LocalFile, UploadId, UploadRecord};
pub use state::{Snapshot, Subscription, UploadRegistry};
