/// Shared data structures for the application state
///
/// These types flow between the picker, the selection store, the grid and
/// the viewer.
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Name shown when a reference carries no usable last segment
pub const FALLBACK_NAME: &str = "Image";

/// Opaque handle to a user-selected image
///
/// Equality is by identifier value, so two refs built from the same path are
/// the same image. Cloning is cheap.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ImageRef(Arc<PathBuf>);

impl ImageRef {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self(Arc::new(path.into()))
    }

    pub fn path(&self) -> &Path {
        &self.0
    }

    /// Last path segment, or [`FALLBACK_NAME`] when there is none
    pub fn display_fallback(&self) -> String {
        self.0
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| FALLBACK_NAME.to_string())
    }
}

impl fmt::Display for ImageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.display())
    }
}

impl From<PathBuf> for ImageRef {
    fn from(path: PathBuf) -> Self {
        Self::new(path)
    }
}

impl From<&str> for ImageRef {
    fn from(path: &str) -> Self {
        Self::new(path)
    }
}

/// Caption data for one image. Either field may be empty when resolution
/// failed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImageInfo {
    pub display_name: String,
    pub size_label: String,
}
