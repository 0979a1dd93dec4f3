/// Media access and loading module
///
/// This module handles:
/// - Permission checks and the native image picker (picker.rs)
/// - Display name and size lookup (metadata.rs)
/// - Decoding grid thumbnails (thumbnail.rs)
/// - Decoding full images for the viewer (loader.rs)

pub mod loader;
pub mod metadata;
pub mod picker;
pub mod thumbnail;
