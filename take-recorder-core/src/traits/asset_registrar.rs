use std::path::Path;

use crate::models::error::TakeError;

/// Host asset pipeline.
///
/// Called after a waveform file has been written successfully.
pub trait AssetRegistrar: Send {
    /// Import the file at `path` and return its persistence identifier.
    ///
    /// Re-importing a path that was registered before must return the
    /// identifier the host now associates with it.
    fn import_and_register(&mut self, path: &Path) -> Result<String, TakeError>;

    /// Let the host pick up a batch of newly written files.
    fn refresh(&mut self);
}
