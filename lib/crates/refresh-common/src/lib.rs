pub mod api;
pub mod config;
pub mod secret;
pub mod status;

pub use api::{
    ActivityResponse, IngestBatch, IngestLine, IngestMeta, TokenResponse, WorkspaceResponse,
};
pub use config::{ConfigError, RefreshConfig};
pub use secret::Secret;
pub use status::WorkspaceStatus;
