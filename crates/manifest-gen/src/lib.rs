//! Generator for the nvidia-device-plugin DaemonSet manifest.

pub mod config;
pub mod customizations;
pub mod error;
pub mod template;

pub use customizations::MigStrategy;
pub use customizations::RenderConfig;
pub use error::ManifestError;
pub use template::render;
pub use template::write_manifest;
