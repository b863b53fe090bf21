use core::error::Error;

/// Errors that can occur while producing the DaemonSet manifest.
#[derive(Debug, derive_more::Display)]
pub enum ManifestError {
    /// The compiled-in template could not be parsed or rendered
    #[display("Failed to render template `{name}`")]
    Template { name: &'static str },
    /// The rendered manifest could not be written out
    #[display("Failed to write manifest")]
    Write,
}

impl Error for ManifestError {}
