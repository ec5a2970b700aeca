//! Filesystem template source.

use arbor_core::{BoxError, TemplateSource};
use std::path::Path;

/// Reads templates straight from disk.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsTemplateSource;

impl FsTemplateSource {
    /// Create a filesystem source.
    pub const fn new() -> Self {
        Self
    }
}

impl TemplateSource for FsTemplateSource {
    fn exists(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn read(&self, path: &Path) -> Result<String, BoxError> {
        Ok(std::fs::read_to_string(path)?)
    }
}
